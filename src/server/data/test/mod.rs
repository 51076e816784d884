use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod cart;
mod order;
mod product;
mod user;

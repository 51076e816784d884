use sea_orm::DatabaseConnection;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{data::user::UserRepository, error::AppError, model::user::User};

mod cart;
mod catalog;
mod payment;
mod user;

/// Loads a factory-created user as a domain model with its role.
async fn load_user(db: &DatabaseConnection, id: i32) -> User {
    UserRepository::new(db)
        .get_with_role(id)
        .await
        .unwrap()
        .expect("user should exist")
}

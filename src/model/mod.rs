//! Request and response bodies of the HTTP API.
//!
//! All DTOs serialize with camelCase field names.

pub mod api;
pub mod auth;
pub mod cart;
pub mod category;
pub mod order;
pub mod payment;
pub mod product;
pub mod user;

//! Account registration, login and credential management.

use sea_orm::DatabaseConnection;

use crate::server::{
    model::user::User,
    service::{email::EmailService, storage::FileStorage, token::TokenService},
};

pub mod avatar;
pub mod login;
pub mod password;
pub mod register;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Authenticated user together with a freshly issued token.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub user: User,
}

pub struct AuthService<'a> {
    pub db: &'a DatabaseConnection,
    pub tokens: &'a TokenService,
    pub email: EmailService<'a>,
    pub storage: &'a FileStorage,
}

impl<'a> AuthService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        tokens: &'a TokenService,
        email: EmailService<'a>,
        storage: &'a FileStorage,
    ) -> Self {
        Self {
            db,
            tokens,
            email,
            storage,
        }
    }
}

//! Application state shared across all request handlers.
//!
//! The state is built once during startup and cloned into every handler through
//! Axum's state extraction. Every field is cheap to clone: the database connection and
//! `reqwest::Client` are pools, everything else sits behind an `Arc`.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    config::Config,
    service::{
        email::{EmailService, Mailer},
        storage::FileStorage,
        token::TokenService,
    },
};

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,

    /// Runtime configuration loaded from the environment.
    pub config: Arc<Config>,

    /// Issues and validates JWT bearer tokens.
    pub tokens: Arc<TokenService>,

    /// Outgoing mail transport, SMTP or a logging no-op.
    pub mailer: Arc<dyn Mailer>,

    /// Local storage for product images and avatars.
    pub storage: FileStorage,

    /// HTTP client for the payment providers.
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        config: Config,
        mailer: Arc<dyn Mailer>,
        http_client: reqwest::Client,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt);
        let storage = FileStorage::new(config.upload_dir.clone(), config.public_url.clone());

        Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            mailer,
            storage,
            http_client,
        }
    }

    /// Email templates bound to this state's mailer and frontend URL.
    pub fn email(&self) -> EmailService<'_> {
        EmailService::new(self.mailer.as_ref(), &self.config.frontend_url)
    }
}

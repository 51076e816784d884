use async_trait::async_trait;

use super::{Email, Mailer};
use crate::server::error::email::EmailError;

/// Mailer used when SMTP is not configured; logs instead of sending.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, email: Email) -> Result<(), EmailError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "SMTP not configured, email not sent"
        );

        Ok(())
    }
}

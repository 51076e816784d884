//! Outgoing email.
//!
//! Delivery sits behind the [`Mailer`] trait so the application can run with SMTP
//! ([`smtp::SmtpMailer`]) or without it ([`noop::NoopMailer`]). [`EmailService`] renders
//! the storefront's templates and hands them to whichever mailer is configured.
//!
//! Email is never critical to a request. Callers log failures and carry on.

pub mod noop;
pub mod smtp;
pub mod template;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::server::error::email::EmailError;

/// A rendered HTML email.
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), EmailError>;
}

/// Renders and sends the storefront's transactional emails.
pub struct EmailService<'a> {
    mailer: &'a dyn Mailer,
    frontend_url: &'a str,
}

impl<'a> EmailService<'a> {
    pub fn new(mailer: &'a dyn Mailer, frontend_url: &'a str) -> Self {
        Self {
            mailer,
            frontend_url,
        }
    }

    pub async fn send_welcome(&self, to: &str, full_name: &str) -> Result<(), EmailError> {
        self.mailer.send(template::welcome(to, full_name)).await
    }

    pub async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), EmailError> {
        let reset_url = format!("{}/reset-password?token={}", self.frontend_url, token);

        self.mailer
            .send(template::password_reset(to, &reset_url))
            .await
    }

    pub async fn send_order_confirmation(
        &self,
        to: &str,
        order_number: &str,
        total_amount: Decimal,
    ) -> Result<(), EmailError> {
        self.mailer
            .send(template::order_confirmation(to, order_number, total_amount))
            .await
    }

    pub async fn send_password_changed(&self, to: &str, full_name: &str) -> Result<(), EmailError> {
        self.mailer
            .send(template::password_changed(to, full_name, chrono::Utc::now()))
            .await
    }
}

/// Logs a failed best-effort email instead of failing the request.
pub fn log_failure(kind: &str, to: &str, result: Result<(), EmailError>) {
    if let Err(e) = result {
        tracing::warn!("Failed to send {} email to {}: {}", kind, to, e);
    }
}


#[cfg(test)]
mod tests {
    use super::{test_mailer::RecordingMailer, *};

    #[tokio::test]
    async fn password_reset_links_to_frontend() {
        let mailer = RecordingMailer::default();
        let service = EmailService::new(&mailer, "https://shop.example.com");

        service
            .send_password_reset("jane@example.com", "abc123")
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "jane@example.com");
        assert!(sent[0]
            .html_body
            .contains("https://shop.example.com/reset-password?token=abc123"));
        assert!(sent[0].html_body.contains("1 hour"));
    }

    #[tokio::test]
    async fn order_confirmation_mentions_number_and_total() {
        let mailer = RecordingMailer::default();
        let service = EmailService::new(&mailer, "https://shop.example.com");

        service
            .send_order_confirmation("jane@example.com", "ORD-20260101-1234", Decimal::new(3499, 2))
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent[0].subject, "Order Confirmation - ORD-20260101-1234");
        assert!(sent[0].html_body.contains("$34.99"));
    }
}

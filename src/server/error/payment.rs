use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum PaymentError {
    /// Provider credentials are missing from configuration.
    #[error("{0} payments are not configured")]
    NotConfigured(&'static str),

    /// `Stripe-Signature` header missing, malformed, stale or not matching the payload.
    #[error("Invalid webhook signature: {0}")]
    InvalidSignature(String),

    /// Provider answered with an error status or an unexpected body.
    ///
    /// # Fields
    /// - Provider name
    /// - Failure description, logged only
    #[error("{0} request failed: {1}")]
    Provider(&'static str, String),
}

/// Converts payment errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - Invalid webhook signature
/// - 502 Bad Gateway - Provider failure
/// - 503 Service Unavailable - Provider not configured
impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        match self {
            Self::NotConfigured(_) => {
                error_response(StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            Self::InvalidSignature(ref reason) => {
                tracing::warn!("Rejected webhook: {}", reason);
                error_response(StatusCode::BAD_REQUEST, "Invalid signature".to_string())
            }
            Self::Provider(provider, ref reason) => {
                tracing::error!("{} request failed: {}", provider, reason);
                error_response(
                    StatusCode::BAD_GATEWAY,
                    format!("{} payment request failed", provider),
                )
            }
        }
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Request carried no `Authorization: Bearer` header.
    #[error("Missing bearer token")]
    MissingToken,

    /// Token failed signature, issuer, audience or expiry validation.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    /// Token was valid but its subject no longer exists or was deleted.
    #[error("User {0} from token not found in database")]
    UserNotInDatabase(i32),

    /// Authenticated user lacks the required role or does not own the resource.
    ///
    /// # Fields
    /// - ID of the user that was denied
    /// - Description of what was attempted, logged only
    #[error("User {0} denied access: {1}")]
    AccessDenied(i32, String),
}

/// Converts authentication errors into HTTP responses.
///
/// Details are logged at debug level, clients only see a generic message.
///
/// # Returns
/// - 401 Unauthorized - Missing, invalid or orphaned token
/// - 403 Forbidden - Insufficient permissions
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::MissingToken | Self::InvalidToken(_) | Self::UserNotInDatabase(_) => {
                error_response(
                    StatusCode::UNAUTHORIZED,
                    "Authentication required".to_string(),
                )
            }
            Self::AccessDenied(_, _) => {
                error_response(StatusCode::FORBIDDEN, "Access denied".to_string())
            }
        }
    }
}

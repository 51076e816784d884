//! HTTP request handlers.
//!
//! Controllers authenticate the caller through `AuthGuard`, convert DTOs into domain
//! parameters, call a service and convert the result back into a DTO.

pub mod auth;
pub mod cart;
pub mod category;
pub mod health;
pub mod order;
pub mod payment;
pub mod product;
pub mod user;

use axum::extract::Multipart;
use utoipa::ToSchema;

use crate::server::error::AppError;

/// Multipart form carrying a single `file` field. Only used for API documentation.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct FileUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Uploaded file taken from a multipart form.
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Reads the `file` field of a multipart form.
///
/// # Returns
/// - `Ok(Upload)` - File name and contents
/// - `Err(AppError::BadRequest)` - Malformed form or no `file` field
pub async fn read_file_field(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        return Ok(Upload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::bad_request("No file uploaded"))
}

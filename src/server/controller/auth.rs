use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        auth::{
            AvatarDto, ChangePasswordDto, ForgotPasswordDto, LoginDto, LoginResponseDto,
            RegisterDto, ResetPasswordDto,
        },
        user::UserDto,
    },
    server::{
        controller::{read_file_field, FileUploadForm},
        error::AppError,
        middleware::auth::AuthGuard,
        model::user::RegisterParams,
        service::auth::{AuthService, LoginResult},
        state::AppState,
    },
};

/// Tag for grouping authentication endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(&state.db, &state.tokens, state.email(), &state.storage)
}

fn login_response(result: LoginResult) -> LoginResponseDto {
    LoginResponseDto {
        token: result.token,
        email: result.user.email,
        full_name: result.user.full_name,
        role: result.user.role,
        user_id: result.user.id,
    }
}

/// Register a new customer account.
///
/// Creates the account with the `User` role and an empty cart, then returns a bearer
/// token so the client is signed in immediately.
///
/// # Returns
/// - `201 Created` - Account created, token issued
/// - `400 Bad Request` - Invalid input or email already registered
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = LoginResponseDto),
        (status = 400, description = "Invalid input or duplicate email", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterDto>,
) -> Result<impl IntoResponse, AppError> {
    let result = auth_service(&state)
        .register(RegisterParams::from_dto(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(login_response(result))))
}

/// Sign in with email and password.
///
/// # Returns
/// - `200 OK` - Credentials valid, token issued
/// - `400 Bad Request` - Unknown email or wrong password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Signed in", body = LoginResponseDto),
        (status = 400, description = "Invalid credentials", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginDto>,
) -> Result<impl IntoResponse, AppError> {
    let result = auth_service(&state)
        .login(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(login_response(result))))
}

/// Get the signed-in user's profile.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;
    let profile = auth_service(&state).get_user(user.id).await?;

    Ok((StatusCode::OK, Json(profile.into_dto())))
}

/// Change the signed-in user's password.
///
/// # Returns
/// - `200 OK` - Password changed
/// - `400 Bad Request` - Old password wrong, or new password too short or unchanged
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = AUTH_TAG,
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageDto),
        (status = 400, description = "Password rejected", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChangePasswordDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    auth_service(&state)
        .change_password(user.id, &payload.old_password, &payload.new_password)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new("Password changed successfully")),
    ))
}

/// Request a password reset link.
///
/// Always answers 200 so the endpoint cannot be used to discover accounts.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = AUTH_TAG,
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Reset link sent if the account exists", body = MessageDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordDto>,
) -> Result<impl IntoResponse, AppError> {
    auth_service(&state).forgot_password(&payload.email).await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new(
            "If the email exists, a password reset link has been sent",
        )),
    ))
}

/// Set a new password with a reset token.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = AUTH_TAG,
    request_body = ResetPasswordDto,
    responses(
        (status = 200, description = "Password reset", body = MessageDto),
        (status = 400, description = "Invalid or expired token", body = ErrorDto)
    ),
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordDto>,
) -> Result<impl IntoResponse, AppError> {
    auth_service(&state)
        .reset_password(&payload.token, &payload.new_password)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new("Password reset successfully")),
    ))
}

/// Upload a new avatar image for the signed-in user.
///
/// Expects a multipart form with a `file` field. The previous avatar is deleted.
///
/// # Returns
/// - `200 OK` - Avatar stored, new URL returned
/// - `400 Bad Request` - Missing file, bad extension or file over 5 MB
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    post,
    path = "/api/auth/update-avatar",
    tag = AUTH_TAG,
    request_body(content = FileUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar updated", body = AvatarDto),
        (status = 400, description = "Invalid file", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn update_avatar(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;
    let upload = read_file_field(multipart).await?;

    let avatar_url = auth_service(&state)
        .update_avatar(user.id, &upload.file_name, &upload.bytes)
        .await?;

    Ok((StatusCode::OK, Json(AvatarDto { avatar_url })))
}

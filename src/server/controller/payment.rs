use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        payment::PaymentVerificationDto,
    },
    server::{
        error::AppError, middleware::auth::AuthGuard, service::payment::PaymentService,
        state::AppState,
    },
};

/// Tag for grouping payment endpoints in OpenAPI documentation
pub static PAYMENT_TAG: &str = "payment";

const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

fn payment_service(state: &AppState) -> PaymentService<'_> {
    PaymentService::new(&state.db, &state.http_client, &state.config, state.email())
}

/// Receive Stripe webhook events.
///
/// The raw body is verified against the `Stripe-Signature` header before it is parsed.
/// Completed checkout sessions mark their order as paid; other event types are
/// acknowledged and ignored.
///
/// # Returns
/// - `200 OK` - Event accepted
/// - `400 Bad Request` - Missing or invalid signature
/// - `503 Service Unavailable` - Stripe webhooks not configured
#[utoipa::path(
    post,
    path = "/api/payments/stripe/webhook",
    tag = PAYMENT_TAG,
    request_body(content = String, description = "Raw Stripe event payload"),
    responses(
        (status = 200, description = "Event accepted", body = MessageDto),
        (status = 400, description = "Invalid signature", body = ErrorDto),
        (status = 503, description = "Stripe not configured", body = ErrorDto)
    ),
)]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::bad_request("Missing Stripe-Signature header"))?;

    payment_service(&state)
        .handle_stripe_webhook(&body, signature)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Webhook processed"))))
}

/// Check whether a Stripe checkout session has been paid.
///
/// Marks the matching order as paid when Stripe reports the session as paid, so the
/// client's return page works even if the webhook has not arrived yet.
#[utoipa::path(
    get,
    path = "/api/payments/stripe/verify/{session_id}",
    tag = PAYMENT_TAG,
    params(("session_id" = String, Path, description = "Stripe checkout session ID")),
    responses(
        (status = 200, description = "Payment state", body = PaymentVerificationDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 502, description = "Stripe request failed", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn verify_stripe_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let paid = payment_service(&state)
        .verify_stripe_payment(&session_id)
        .await?;

    Ok((StatusCode::OK, Json(PaymentVerificationDto { paid })))
}

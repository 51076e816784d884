use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        order::{CreateOrderDto, OrderDto},
        payment::{CapturePayPalDto, CaptureResultDto, CheckoutSessionDto, PayPalOrderDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::order::{CreateOrderParams, Order},
        service::{order::OrderService, payment::PaymentService},
        state::AppState,
    },
};

/// Tag for grouping order endpoints in OpenAPI documentation
pub static ORDER_TAG: &str = "order";

fn order_service(state: &AppState) -> OrderService<'_> {
    OrderService::new(&state.db, state.email())
}

fn payment_service(state: &AppState) -> PaymentService<'_> {
    PaymentService::new(&state.db, &state.http_client, &state.config, state.email())
}

fn to_dtos(orders: Vec<Order>) -> Vec<OrderDto> {
    orders.into_iter().map(Order::into_dto).collect()
}

/// List the caller's orders, newest first.
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = ORDER_TAG,
    responses(
        (status = 200, description = "Caller's orders", body = Vec<OrderDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn get_my_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let orders = order_service(&state).get_for_user(user.id).await?;

    Ok((StatusCode::OK, Json(to_dtos(orders))))
}

/// Get an order by id.
///
/// # Access Control
/// - Owner of the order
/// - `Admin` - Any order
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = ORDER_TAG,
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items", body = OrderDto),
        (status = 403, description = "Order belongs to another user", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn get_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let order = order_service(&state).get_by_id(id, &user).await?;

    Ok((StatusCode::OK, Json(order.into_dto())))
}

/// Place an order from the caller's cart.
///
/// Copies the cart lines into the order at their current prices, reserves stock and
/// empties the cart in a single transaction.
///
/// # Returns
/// - `201 Created` - Order placed
/// - `400 Bad Request` - Empty cart, missing shipping details or insufficient stock
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    post,
    path = "/api/orders/create",
    tag = ORDER_TAG,
    request_body = CreateOrderDto,
    responses(
        (status = 201, description = "Order placed", body = OrderDto),
        (status = 400, description = "Cart empty or insufficient stock", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateOrderDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let order = order_service(&state)
        .create(&user, CreateOrderParams::from_dto(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(order.into_dto())))
}

/// Start a Stripe checkout for a pending order.
#[utoipa::path(
    post,
    path = "/api/orders/{id}/checkout",
    tag = ORDER_TAG,
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutSessionDto),
        (status = 400, description = "Order already processed", body = ErrorDto),
        (status = 403, description = "Order belongs to another user", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto),
        (status = 503, description = "Stripe not configured", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let url = payment_service(&state)
        .create_stripe_checkout(id, &user)
        .await?;

    Ok((StatusCode::OK, Json(CheckoutSessionDto { url })))
}

/// Create a PayPal order for a pending order.
#[utoipa::path(
    post,
    path = "/api/orders/{id}/paypal",
    tag = ORDER_TAG,
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "PayPal order created", body = PayPalOrderDto),
        (status = 400, description = "Order already processed", body = ErrorDto),
        (status = 403, description = "Order belongs to another user", body = ErrorDto),
        (status = 503, description = "PayPal not configured", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn create_paypal_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let approval_url = payment_service(&state)
        .create_paypal_order(id, &user)
        .await?;

    Ok((StatusCode::OK, Json(PayPalOrderDto { approval_url })))
}

/// Capture an approved PayPal order.
#[utoipa::path(
    post,
    path = "/api/orders/paypal/capture",
    tag = ORDER_TAG,
    request_body = CapturePayPalDto,
    responses(
        (status = 200, description = "Payment captured", body = CaptureResultDto),
        (status = 400, description = "Capture failed or order mismatch", body = ErrorDto),
        (status = 403, description = "Order belongs to another user", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn capture_paypal_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CapturePayPalDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let order_number = payment_service(&state)
        .capture_paypal_order(&payload.paypal_order_id, payload.order_id, &user)
        .await?;

    // Incomplete captures surface as 400, so a response body always reports success.
    Ok((
        StatusCode::OK,
        Json(CaptureResultDto {
            success: true,
            order_number,
        }),
    ))
}

/// Cancel an order and return its stock.
///
/// Only `Pending` and `Processing` orders can be cancelled.
#[utoipa::path(
    put,
    path = "/api/orders/{id}/cancel",
    tag = ORDER_TAG,
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled", body = OrderDto),
        (status = 400, description = "Order cannot be cancelled", body = ErrorDto),
        (status = 403, description = "Order belongs to another user", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let order = order_service(&state).cancel(id, &user).await?;

    Ok((StatusCode::OK, Json(order.into_dto())))
}

/// List every order.
///
/// # Access Control
/// - `Admin`
#[utoipa::path(
    get,
    path = "/api/orders/all",
    tag = ORDER_TAG,
    responses(
        (status = 200, description = "All orders", body = Vec<OrderDto>),
        (status = 403, description = "Not an admin", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn get_all_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Admin])
        .await?;

    let orders = order_service(&state).get_all().await?;

    Ok((StatusCode::OK, Json(to_dtos(orders))))
}

/// List orders in a given status.
///
/// # Access Control
/// - `Admin`
#[utoipa::path(
    get,
    path = "/api/orders/status/{status}",
    tag = ORDER_TAG,
    params(("status" = String, Path, description = "Order status, case-insensitive")),
    responses(
        (status = 200, description = "Orders in the status", body = Vec<OrderDto>),
        (status = 400, description = "Invalid status", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn get_orders_by_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(status): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Admin])
        .await?;

    let orders = order_service(&state).get_by_status(&status).await?;

    Ok((StatusCode::OK, Json(to_dtos(orders))))
}

/// Set an order's status.
///
/// The body is the new status as a JSON string, e.g. `"Shipped"`.
///
/// # Access Control
/// - `Admin`
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    tag = ORDER_TAG,
    params(("id" = i32, Path, description = "Order ID")),
    request_body(content = String, description = "New status"),
    responses(
        (status = 200, description = "Status updated", body = OrderDto),
        (status = 400, description = "Invalid status", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(status): Json<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Admin])
        .await?;

    let order = order_service(&state).update_status(id, &status).await?;

    Ok((StatusCode::OK, Json(order.into_dto())))
}

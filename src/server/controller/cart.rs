use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        cart::{AddToCartDto, CartDto, UpdateCartItemDto},
    },
    server::{
        error::AppError, middleware::auth::AuthGuard, service::cart::CartService,
        state::AppState,
    },
};

/// Tag for grouping cart endpoints in OpenAPI documentation
pub static CART_TAG: &str = "cart";

/// Get the caller's cart, creating it on first access.
#[utoipa::path(
    get,
    path = "/api/cart",
    tag = CART_TAG,
    responses(
        (status = 200, description = "Current cart", body = CartDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn get_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let cart = CartService::new(&state.db).get_cart(user.id).await?;

    Ok((StatusCode::OK, Json(cart.into_dto())))
}

/// Add a product to the cart.
///
/// Adding a product already in the cart increases that line's quantity. The combined
/// quantity must not exceed the product's stock.
///
/// # Returns
/// - `200 OK` - Updated cart
/// - `400 Bad Request` - Invalid quantity or insufficient stock
/// - `401 Unauthorized` - Not authenticated
/// - `404 Not Found` - Product does not exist
#[utoipa::path(
    post,
    path = "/api/cart/items",
    tag = CART_TAG,
    request_body = AddToCartDto,
    responses(
        (status = 200, description = "Updated cart", body = CartDto),
        (status = 400, description = "Invalid quantity or insufficient stock", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 404, description = "Product not found", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AddToCartDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let cart = CartService::new(&state.db)
        .add_item(user.id, payload.product_id, payload.quantity)
        .await?;

    Ok((StatusCode::OK, Json(cart.into_dto())))
}

/// Change the quantity of a cart line. A quantity of zero or less removes it.
#[utoipa::path(
    put,
    path = "/api/cart/items/{cart_item_id}",
    tag = CART_TAG,
    params(("cart_item_id" = i32, Path, description = "Cart item ID")),
    request_body = UpdateCartItemDto,
    responses(
        (status = 200, description = "Updated cart", body = CartDto),
        (status = 400, description = "Insufficient stock", body = ErrorDto),
        (status = 404, description = "Cart item not found", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(cart_item_id): Path<i32>,
    Json(payload): Json<UpdateCartItemDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let cart = CartService::new(&state.db)
        .update_item(user.id, cart_item_id, payload.quantity)
        .await?;

    Ok((StatusCode::OK, Json(cart.into_dto())))
}

/// Remove a line from the cart.
#[utoipa::path(
    delete,
    path = "/api/cart/items/{cart_item_id}",
    tag = CART_TAG,
    params(("cart_item_id" = i32, Path, description = "Cart item ID")),
    responses(
        (status = 200, description = "Updated cart", body = CartDto),
        (status = 404, description = "Cart item not found", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(cart_item_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let cart = CartService::new(&state.db)
        .remove_item(user.id, cart_item_id)
        .await?;

    Ok((StatusCode::OK, Json(cart.into_dto())))
}

/// Empty the cart.
#[utoipa::path(
    delete,
    path = "/api/cart",
    tag = CART_TAG,
    responses(
        (status = 200, description = "Cart cleared", body = MessageDto),
        (status = 404, description = "Cart not found", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    CartService::new(&state.db).clear(user.id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Cart cleared successfully"))))
}

//! Route table, OpenAPI document and HTTP layers.

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{auth, cart, category, health, order, payment, product, user},
    middleware::rate_limit::auth_rate_limiter,
    service::storage::{AVATAR_FOLDER, PRODUCT_FOLDER},
    state::AppState,
};

/// Request bodies above this size are rejected. Leaves headroom over the 5 MB upload
/// limit for multipart framing.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(title = "Storefront API", description = "Cosmetics storefront backend"),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and credentials"),
        (name = "product", description = "Product catalog"),
        (name = "category", description = "Product categories"),
        (name = "cart", description = "Shopping cart"),
        (name = "order", description = "Orders and checkout"),
        (name = "payment", description = "Payment provider callbacks"),
        (name = "user", description = "User administration and profile"),
        (name = "health", description = "Liveness")
    )
)]
struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

fn auth_routes(trust_proxy_headers: bool) -> OpenApiRouter<AppState> {
    let routes = OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::get_me))
        .routes(routes!(auth::change_password))
        .routes(routes!(auth::forgot_password))
        .routes(routes!(auth::reset_password))
        .routes(routes!(auth::update_avatar));

    match auth_rate_limiter(trust_proxy_headers) {
        Some(limiter) => routes.layer(limiter),
        None => {
            tracing::warn!("Auth rate limiter could not be configured, continuing without it");
            routes
        }
    }
}

fn catalog_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(product::get_products, product::create_product))
        .routes(routes!(
            product::get_product,
            product::update_product,
            product::delete_product
        ))
        .routes(routes!(product::get_products_by_category))
        .routes(routes!(product::get_products_by_category_slug))
        .routes(routes!(product::get_featured_products))
        .routes(routes!(product::search_products))
        .routes(routes!(product::upload_product_image))
        .routes(routes!(category::get_categories, category::create_category))
        .routes(routes!(
            category::get_category,
            category::update_category,
            category::delete_category
        ))
        .routes(routes!(category::get_category_by_slug))
}

fn shopping_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(cart::get_cart, cart::clear_cart))
        .routes(routes!(cart::add_to_cart))
        .routes(routes!(cart::update_cart_item, cart::remove_from_cart))
        .routes(routes!(order::get_my_orders))
        .routes(routes!(order::get_order))
        .routes(routes!(order::create_order))
        .routes(routes!(order::create_checkout_session))
        .routes(routes!(order::create_paypal_order))
        .routes(routes!(order::capture_paypal_order))
        .routes(routes!(order::cancel_order))
        .routes(routes!(order::get_all_orders))
        .routes(routes!(order::get_orders_by_status))
        .routes(routes!(order::update_order_status))
        .routes(routes!(payment::stripe_webhook))
        .routes(routes!(payment::verify_stripe_payment))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(user::get_all_users))
        .routes(routes!(user::get_user, user::delete_user))
        .routes(routes!(user::update_user_role))
        .routes(routes!(user::update_profile))
}

/// Builds the complete application router.
///
/// API routes are documented in the OpenAPI document served by Swagger UI at
/// `/swagger-ui`. Uploaded images are served from the upload directory, and the
/// client bundle from `STATIC_DIR` with an `index.html` fallback when configured.
pub fn router(state: AppState) -> Router {
    let (api, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health::health))
        .merge(auth_routes(state.config.trust_proxy_headers))
        .merge(catalog_routes())
        .merge(shopping_routes())
        .merge(user_routes())
        .split_for_parts();

    let upload_dir = &state.config.upload_dir;
    let mut router = api
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .nest_service(
            &format!("/{}", PRODUCT_FOLDER),
            ServeDir::new(upload_dir.join(PRODUCT_FOLDER)),
        )
        .nest_service(
            &format!("/{}", AVATAR_FOLDER),
            ServeDir::new(upload_dir.join(AVATAR_FOLDER)),
        );

    if let Some(static_dir) = &state.config.static_dir {
        router = router.fallback_service(
            ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html"))),
        );
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

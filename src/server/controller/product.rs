use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        product::{ProductDto, SaveProductDto, UploadedFileDto},
    },
    server::{
        controller::{read_file_field, FileUploadForm},
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::product::{Product, SaveProductParams},
        service::product::ProductService,
        state::AppState,
    },
};

/// Tag for grouping product endpoints in OpenAPI documentation
pub static PRODUCT_TAG: &str = "product";

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Text matched against name, description and brand
    #[serde(default)]
    pub q: String,
}

fn to_dtos(products: Vec<Product>) -> Vec<ProductDto> {
    products.into_iter().map(Product::into_dto).collect()
}

/// List all products.
#[utoipa::path(
    get,
    path = "/api/products",
    tag = PRODUCT_TAG,
    responses(
        (status = 200, description = "All live products", body = Vec<ProductDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = ProductService::new(&state.db).get_all().await?;

    Ok((StatusCode::OK, Json(to_dtos(products))))
}

/// Get a product by id.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ProductDto),
        (status = 404, description = "Product not found", body = ErrorDto)
    ),
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let product = ProductService::new(&state.db).get_by_id(id).await?;

    Ok((StatusCode::OK, Json(product.into_dto())))
}

/// List the products of a category.
#[utoipa::path(
    get,
    path = "/api/products/category/{category_id}",
    tag = PRODUCT_TAG,
    params(("category_id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Products in the category", body = Vec<ProductDto>)
    ),
)]
pub async fn get_products_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let products = ProductService::new(&state.db)
        .get_by_category(category_id)
        .await?;

    Ok((StatusCode::OK, Json(to_dtos(products))))
}

/// List the products of a category identified by slug.
#[utoipa::path(
    get,
    path = "/api/products/category/slug/{slug}",
    tag = PRODUCT_TAG,
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Products in the category", body = Vec<ProductDto>)
    ),
)]
pub async fn get_products_by_category_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let products = ProductService::new(&state.db)
        .get_by_category_slug(&slug)
        .await?;

    Ok((StatusCode::OK, Json(to_dtos(products))))
}

/// List featured products.
#[utoipa::path(
    get,
    path = "/api/products/featured",
    tag = PRODUCT_TAG,
    responses(
        (status = 200, description = "Featured products", body = Vec<ProductDto>)
    ),
)]
pub async fn get_featured_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = ProductService::new(&state.db).get_featured().await?;

    Ok((StatusCode::OK, Json(to_dtos(products))))
}

/// Search products by name, description or brand.
///
/// # Returns
/// - `200 OK` - Matching products
/// - `400 Bad Request` - Empty query
#[utoipa::path(
    get,
    path = "/api/products/search",
    tag = PRODUCT_TAG,
    params(SearchParams),
    responses(
        (status = 200, description = "Matching products", body = Vec<ProductDto>),
        (status = 400, description = "Search query is required", body = ErrorDto)
    ),
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let products = ProductService::new(&state.db).search(&params.q).await?;

    Ok((StatusCode::OK, Json(to_dtos(products))))
}

/// Create a product.
///
/// # Access Control
/// - `Admin` - Only admins can manage the catalog
///
/// # Returns
/// - `201 Created` - Product created with a generated slug
/// - `400 Bad Request` - Invalid fields or unknown category
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an admin
#[utoipa::path(
    post,
    path = "/api/products",
    tag = PRODUCT_TAG,
    request_body = SaveProductDto,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid product data", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SaveProductDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Admin])
        .await?;

    let product = ProductService::new(&state.db)
        .create(SaveProductParams::from_dto(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(product.into_dto())))
}

/// Update a product.
///
/// # Access Control
/// - `Admin` - Only admins can manage the catalog
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i32, Path, description = "Product ID")),
    request_body = SaveProductDto,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 400, description = "Invalid product data", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Product not found", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn update_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<SaveProductDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Admin])
        .await?;

    let product = ProductService::new(&state.db)
        .update(id, SaveProductParams::from_dto(payload))
        .await?;

    Ok((StatusCode::OK, Json(product.into_dto())))
}

/// Delete a product.
///
/// # Access Control
/// - `Admin` - Only admins can manage the catalog
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Product not found", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn delete_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Admin])
        .await?;

    ProductService::new(&state.db).delete(id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new("Product deleted successfully")),
    ))
}

/// Upload a product image.
///
/// Expects a multipart form with a `file` field and returns the stored image URL for
/// use in a later create or update.
///
/// # Access Control
/// - `Admin` - Only admins can manage the catalog
#[utoipa::path(
    post,
    path = "/api/products/upload",
    tag = PRODUCT_TAG,
    request_body(content = FileUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = UploadedFileDto),
        (status = 400, description = "Invalid file", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto)
    ),
    security(("bearer_auth" = [])),
)]
pub async fn upload_product_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Admin])
        .await?;
    let upload = read_file_field(multipart).await?;

    let image_url = ProductService::new(&state.db)
        .upload_image(&state.storage, &upload.file_name, &upload.bytes)
        .await?;

    Ok((StatusCode::OK, Json(UploadedFileDto { image_url })))
}

//! Catalogue management.

use rust_decimal::Decimal;
use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};

use crate::server::{
    data::{product::ProductRepository, repository::Repository},
    error::AppError,
    model::product::{Product, SaveProductParams},
    service::storage::{validate_image, FileStorage, PRODUCT_FOLDER},
    util::slug::{slugify, with_suffix},
};

pub struct ProductService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProductService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    fn products(&self) -> Repository<'a, entity::product::Entity, DatabaseConnection> {
        Repository::new(self.db)
    }

    pub async fn get_all(&self) -> Result<Vec<Product>, AppError> {
        Ok(ProductRepository::new(self.db).get_all_with_category().await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Product, AppError> {
        ProductRepository::new(self.db)
            .get_with_category(id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))
    }

    pub async fn get_by_category(&self, category_id: i32) -> Result<Vec<Product>, AppError> {
        Ok(ProductRepository::new(self.db)
            .get_by_category(category_id)
            .await?)
    }

    pub async fn get_by_category_slug(&self, slug: &str) -> Result<Vec<Product>, AppError> {
        Ok(ProductRepository::new(self.db)
            .get_by_category_slug(slug)
            .await?)
    }

    pub async fn get_featured(&self) -> Result<Vec<Product>, AppError> {
        Ok(ProductRepository::new(self.db).get_featured().await?)
    }

    /// Searches name, description and brand.
    ///
    /// # Returns
    /// - `Ok(Vec<Product>)` - Matching live products
    /// - `Err(AppError::BadRequest)` - Blank query
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::bad_request("Search query is required"));
        }

        Ok(ProductRepository::new(self.db).search(query).await?)
    }

    /// Creates a product with a slug derived from its name.
    ///
    /// # Returns
    /// - `Ok(Product)` - Created product with category name
    /// - `Err(AppError::BadRequest)` - Invalid fields or unknown category
    pub async fn create(&self, params: SaveProductParams) -> Result<Product, AppError> {
        self.validate(&params).await?;
        let slug = self.unique_slug(&params.name, None).await?;

        let product = self
            .products()
            .add(entity::product::ActiveModel {
                name: ActiveValue::Set(params.name),
                description: ActiveValue::Set(params.description),
                price: ActiveValue::Set(params.price),
                stock_quantity: ActiveValue::Set(params.stock_quantity),
                image_url: ActiveValue::Set(params.image_url),
                slug: ActiveValue::Set(slug),
                brand: ActiveValue::Set(params.brand),
                is_featured: ActiveValue::Set(params.is_featured),
                category_id: ActiveValue::Set(params.category_id),
                updated_at: ActiveValue::Set(None),
                ..Default::default()
            })
            .await?;

        tracing::info!("Created product {} ({})", product.id, product.slug);

        self.get_by_id(product.id).await
    }

    /// Replaces a product's fields and regenerates its slug from the name.
    pub async fn update(&self, id: i32, params: SaveProductParams) -> Result<Product, AppError> {
        let existing = self
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;
        self.validate(&params).await?;
        let slug = self.unique_slug(&params.name, Some(id)).await?;

        let mut active = existing.into_active_model();
        active.name = ActiveValue::Set(params.name);
        active.description = ActiveValue::Set(params.description);
        active.price = ActiveValue::Set(params.price);
        active.stock_quantity = ActiveValue::Set(params.stock_quantity);
        active.image_url = ActiveValue::Set(params.image_url);
        active.slug = ActiveValue::Set(slug);
        active.brand = ActiveValue::Set(params.brand);
        active.is_featured = ActiveValue::Set(params.is_featured);
        active.category_id = ActiveValue::Set(params.category_id);
        self.products().update(active).await?;

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.products().soft_delete(id).await? {
            return Err(AppError::not_found("Product not found"));
        }

        tracing::info!("Deleted product {}", id);

        Ok(())
    }

    /// Validates and stores a product image.
    ///
    /// # Returns
    /// - `Ok(String)` - Public URL of the stored image
    /// - `Err(AppError::BadRequest)` - Empty, oversized or non-image file
    pub async fn upload_image(
        &self,
        storage: &FileStorage,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        validate_image(file_name, bytes.len())?;

        storage.save(PRODUCT_FOLDER, file_name, bytes).await
    }

    async fn validate(&self, params: &SaveProductParams) -> Result<(), AppError> {
        if params.name.is_empty() {
            return Err(AppError::bad_request("Product name is required"));
        }
        if params.price < Decimal::ZERO {
            return Err(AppError::bad_request("Price must not be negative"));
        }
        if params.stock_quantity < 0 {
            return Err(AppError::bad_request("Stock quantity must not be negative"));
        }

        let categories = Repository::<entity::category::Entity, DatabaseConnection>::new(self.db);
        if !categories.exists(params.category_id).await? {
            return Err(AppError::bad_request("Category not found"));
        }

        Ok(())
    }

    async fn unique_slug(&self, name: &str, exclude_id: Option<i32>) -> Result<String, AppError> {
        let base = slugify(name);
        if base.is_empty() {
            return Err(AppError::bad_request(
                "Product name must contain letters or digits",
            ));
        }

        let repo = ProductRepository::new(self.db);
        let mut attempt = 0;
        loop {
            let candidate = with_suffix(&base, attempt);
            if !repo.slug_taken(&candidate, exclude_id).await? {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}

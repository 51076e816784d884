//! Product factory for creating test product entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test products with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let product = ProductFactory::new(&db, category.id)
///     .name("Vitamin C Serum")
///     .price(Decimal::new(3999, 2))
///     .stock_quantity(5)
///     .build()
///     .await?;
/// ```
pub struct ProductFactory<'a> {
    db: &'a DatabaseConnection,
    category_id: i32,
    name: String,
    slug: String,
    description: String,
    brand: Option<String>,
    price: Decimal,
    stock_quantity: i32,
    is_featured: bool,
    is_deleted: bool,
}

impl<'a> ProductFactory<'a> {
    /// Creates a new ProductFactory with default values.
    ///
    /// Defaults:
    /// - name: `"Product {id}"`
    /// - slug: `"product-{id}"`
    /// - price: `10.00`
    /// - stock_quantity: `100`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `category_id` - ID of the owning category
    pub fn new(db: &'a DatabaseConnection, category_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            category_id,
            name: format!("Product {}", id),
            slug: format!("product-{}", id),
            description: "Test product".to_string(),
            brand: None,
            price: Decimal::new(1000, 2),
            stock_quantity: 100,
            is_featured: false,
            is_deleted: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    pub fn stock_quantity(mut self, stock_quantity: i32) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    pub fn featured(mut self, is_featured: bool) -> Self {
        self.is_featured = is_featured;
        self
    }

    /// Marks the product as soft deleted.
    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    /// Builds and inserts the product entity into the database.
    pub async fn build(self) -> Result<entity::product::Model, DbErr> {
        entity::product::ActiveModel {
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(self.description),
            price: ActiveValue::Set(self.price),
            stock_quantity: ActiveValue::Set(self.stock_quantity),
            image_url: ActiveValue::Set(None),
            slug: ActiveValue::Set(self.slug),
            brand: ActiveValue::Set(self.brand),
            is_featured: ActiveValue::Set(self.is_featured),
            category_id: ActiveValue::Set(self.category_id),
            created_at: ActiveValue::Set(Utc::now()),
            updated_at: ActiveValue::Set(None),
            is_deleted: ActiveValue::Set(self.is_deleted),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a product with default values in the given category.
pub async fn create_product(
    db: &DatabaseConnection,
    category_id: i32,
) -> Result<entity::product::Model, DbErr> {
    ProductFactory::new(db, category_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use crate::factory::category::create_category;

    #[tokio::test]
    async fn creates_product_with_custom_values() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_catalog_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let category = create_category(db).await?;

        let product = ProductFactory::new(db, category.id)
            .name("Matte Lipstick Set")
            .price(Decimal::new(2499, 2))
            .stock_quantity(50)
            .featured(true)
            .build()
            .await?;

        assert_eq!(product.name, "Matte Lipstick Set");
        assert_eq!(product.price, Decimal::new(2499, 2));
        assert_eq!(product.stock_quantity, 50);
        assert!(product.is_featured);
        assert_eq!(product.category_id, category.id);

        Ok(())
    }
}

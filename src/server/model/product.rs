//! Product domain models and parameters.

use rust_decimal::Decimal;

use crate::model::product::{ProductDto, SaveProductDto};

/// Product joined with the name of its category.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub slug: String,
    pub brand: Option<String>,
    pub is_featured: bool,
    pub category_id: i32,
    pub category_name: Option<String>,
}

impl Product {
    /// Converts entity models to a domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `product` - Product entity
    /// - `category` - Related category, `None` when not loaded or soft deleted
    pub fn from_entity(
        product: entity::product::Model,
        category: Option<entity::category::Model>,
    ) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock_quantity: product.stock_quantity,
            image_url: product.image_url,
            slug: product.slug,
            brand: product.brand,
            is_featured: product.is_featured,
            category_id: product.category_id,
            category_name: category.filter(|c| !c.is_deleted).map(|c| c.name),
        }
    }

    pub fn into_dto(self) -> ProductDto {
        ProductDto {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock_quantity: self.stock_quantity,
            image_url: self.image_url,
            slug: self.slug,
            brand: self.brand,
            is_featured: self.is_featured,
            category_id: self.category_id,
            category_name: self.category_name,
        }
    }
}

/// Parameters for creating or updating a product.
#[derive(Debug, Clone)]
pub struct SaveProductParams {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub is_featured: bool,
    pub category_id: i32,
}

impl SaveProductParams {
    pub fn from_dto(dto: SaveProductDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            description: dto.description,
            price: dto.price,
            stock_quantity: dto.stock_quantity,
            image_url: dto.image_url,
            brand: dto.brand,
            is_featured: dto.is_featured,
            category_id: dto.category_id,
        }
    }
}

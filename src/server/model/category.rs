//! Category domain models and parameters.

use crate::model::category::{CategoryDto, SaveCategoryDto};

#[derive(Debug, Clone)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub slug: String,
}

impl Category {
    pub fn from_entity(entity: entity::category::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            image_url: entity.image_url,
            slug: entity.slug,
        }
    }

    pub fn into_dto(self) -> CategoryDto {
        CategoryDto {
            id: self.id,
            name: self.name,
            description: self.description,
            image_url: self.image_url,
            slug: self.slug,
        }
    }
}

/// Parameters for creating or updating a category.
#[derive(Debug, Clone)]
pub struct SaveCategoryParams {
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl SaveCategoryParams {
    pub fn from_dto(dto: SaveCategoryDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            description: dto.description,
            image_url: dto.image_url,
        }
    }
}

use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};

use crate::server::{
    data::{category::CategoryRepository, repository::Repository},
    error::AppError,
    model::category::{Category, SaveCategoryParams},
    util::slug::{slugify, with_suffix},
};

pub struct CategoryService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CategoryService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    fn repo(&self) -> Repository<'a, entity::category::Entity, DatabaseConnection> {
        Repository::new(self.db)
    }

    pub async fn get_all(&self) -> Result<Vec<Category>, AppError> {
        let categories = self.repo().get_all().await?;

        Ok(categories.into_iter().map(Category::from_entity).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Category, AppError> {
        self.repo()
            .get_by_id(id)
            .await?
            .map(Category::from_entity)
            .ok_or_else(|| AppError::not_found("Category not found"))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Category, AppError> {
        CategoryRepository::new(self.db)
            .get_by_slug(slug)
            .await?
            .map(Category::from_entity)
            .ok_or_else(|| AppError::not_found("Category not found"))
    }

    /// Creates a category with a slug derived from its name.
    pub async fn create(&self, params: SaveCategoryParams) -> Result<Category, AppError> {
        validate(&params)?;
        let slug = self.unique_slug(&params.name, None).await?;

        let category = self
            .repo()
            .add(entity::category::ActiveModel {
                name: ActiveValue::Set(params.name),
                description: ActiveValue::Set(params.description),
                image_url: ActiveValue::Set(params.image_url),
                slug: ActiveValue::Set(slug),
                updated_at: ActiveValue::Set(None),
                ..Default::default()
            })
            .await?;

        tracing::info!("Created category {} ({})", category.id, category.slug);

        Ok(Category::from_entity(category))
    }

    /// Updates a category, regenerating its slug from the new name.
    pub async fn update(&self, id: i32, params: SaveCategoryParams) -> Result<Category, AppError> {
        validate(&params)?;
        let existing = self
            .repo()
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))?;
        let slug = self.unique_slug(&params.name, Some(id)).await?;

        let mut active = existing.into_active_model();
        active.name = ActiveValue::Set(params.name);
        active.description = ActiveValue::Set(params.description);
        active.image_url = ActiveValue::Set(params.image_url);
        active.slug = ActiveValue::Set(slug);
        let updated = self.repo().update(active).await?;

        Ok(Category::from_entity(updated))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo().soft_delete(id).await? {
            return Err(AppError::not_found("Category not found"));
        }

        tracing::info!("Deleted category {}", id);

        Ok(())
    }

    /// Finds the first free slug for `name`, ignoring the category being updated.
    async fn unique_slug(&self, name: &str, exclude_id: Option<i32>) -> Result<String, AppError> {
        let base = slugify(name);
        if base.is_empty() {
            return Err(AppError::bad_request(
                "Category name must contain letters or digits",
            ));
        }

        let repo = CategoryRepository::new(self.db);
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

fn validate(params: &SaveCategoryParams) -> Result<(), AppError> {
    if params.name.is_empty() {
        return Err(AppError::bad_request("Category name is required"));
    }

    Ok(())
}

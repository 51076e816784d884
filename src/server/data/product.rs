//! Product data repository.
//!
//! Catalogue queries joining products to their category. Results are converted to the
//! `Product` domain model at this boundary.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select,
};

use crate::server::model::product::Product;

pub struct ProductRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProductRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn live() -> Select<entity::product::Entity> {
        entity::prelude::Product::find().filter(entity::product::Column::IsDeleted.eq(false))
    }

    /// Runs `query` with the category joined and converts the rows.
    async fn with_category(
        &self,
        query: Select<entity::product::Entity>,
    ) -> Result<Vec<Product>, DbErr> {
        let results = query
            .find_also_related(entity::prelude::Category)
            .order_by_asc(entity::product::Column::Id)
            .all(self.db)
            .await?;

        Ok(results
            .into_iter()
            .map(|(product, category)| Product::from_entity(product, category))
            .collect())
    }

    /// Gets a live product by id with its category name.
    pub async fn get_with_category(&self, id: i32) -> Result<Option<Product>, DbErr> {
        let products = self
            .with_category(Self::live().filter(entity::product::Column::Id.eq(id)))
            .await?;

        Ok(products.into_iter().next())
    }

    pub async fn get_all_with_category(&self) -> Result<Vec<Product>, DbErr> {
        self.with_category(Self::live()).await
    }

    pub async fn get_by_category(&self, category_id: i32) -> Result<Vec<Product>, DbErr> {
        self.with_category(
            Self::live().filter(entity::product::Column::CategoryId.eq(category_id)),
        )
        .await
    }

    /// Gets live products of the live category identified by `slug`.
    pub async fn get_by_category_slug(&self, slug: &str) -> Result<Vec<Product>, DbErr> {
        let results = Self::live()
            .find_also_related(entity::prelude::Category)
            .filter(entity::category::Column::Slug.eq(slug))
            .filter(entity::category::Column::IsDeleted.eq(false))
            .order_by_asc(entity::product::Column::Id)
            .all(self.db)
            .await?;

        Ok(results
            .into_iter()
            .map(|(product, category)| Product::from_entity(product, category))
            .collect())
    }

    pub async fn get_featured(&self) -> Result<Vec<Product>, DbErr> {
        self.with_category(Self::live().filter(entity::product::Column::IsFeatured.eq(true)))
            .await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, DbErr> {
        let products = self
            .with_category(Self::live().filter(entity::product::Column::Slug.eq(slug)))
            .await?;

        Ok(products.into_iter().next())
    }

    /// Substring search over name, description and brand.
    ///
    /// # Arguments
    /// - `keyword` - Non-empty search term
    ///
    /// # Returns
    /// - `Ok(Vec<Product>)` - Live products where any of the three fields contains `keyword`
    /// - `Err(DbErr)` - Database error
    pub async fn search(&self, keyword: &str) -> Result<Vec<Product>, DbErr> {
        let condition = Condition::any()
            .add(entity::product::Column::Name.contains(keyword))
            .add(entity::product::Column::Description.contains(keyword))
            .add(entity::product::Column::Brand.contains(keyword));

        self.with_category(Self::live().filter(condition)).await
    }

    /// Checks whether another product, deleted or not, already uses the slug.
    pub async fn slug_taken(&self, slug: &str, exclude_id: Option<i32>) -> Result<bool, DbErr> {
        let mut query =
            entity::prelude::Product::find().filter(entity::product::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(entity::product::Column::Id.ne(id));
        }

        Ok(query.count(self.db).await? > 0)
    }
}

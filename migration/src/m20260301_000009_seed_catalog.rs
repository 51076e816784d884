use sea_orm_migration::prelude::*;

use super::{
    m20260301_000001_create_role_table::Role, m20260301_000003_create_category_table::Category,
};

const ROLES: [(&str, &str); 2] = [("Admin", "Administrator"), ("User", "Regular User")];

const CATEGORIES: [(&str, &str, &str); 4] = [
    ("Skincare", "Skin care products", "skincare"),
    ("Makeup", "Makeup and cosmetics", "makeup"),
    ("Haircare", "Hair care products", "haircare"),
    ("Fragrance", "Perfumes and fragrances", "fragrance"),
];

/// Sample products inserted by category slug so the statement works on any backend.
const PRODUCTS: &str = r#"
INSERT INTO "product" ("name", "description", "price", "stock_quantity", "slug", "brand", "is_featured", "category_id")
SELECT 'Hydrating Face Cream', 'Deep moisturizing cream for all skin types', 29.99, 100, 'hydrating-face-cream', 'GlowSkin', TRUE, "id"
FROM "category" WHERE "slug" = 'skincare';
INSERT INTO "product" ("name", "description", "price", "stock_quantity", "slug", "brand", "is_featured", "category_id")
SELECT 'Vitamin C Serum', 'Brightening serum with 20% Vitamin C', 39.99, 75, 'vitamin-c-serum', 'RadiantLab', TRUE, "id"
FROM "category" WHERE "slug" = 'skincare';
INSERT INTO "product" ("name", "description", "price", "stock_quantity", "slug", "brand", "is_featured", "category_id")
SELECT 'Matte Lipstick Set', 'Set of 6 long-lasting matte lipsticks', 24.99, 50, 'matte-lipstick-set', 'ColorPop', FALSE, "id"
FROM "category" WHERE "slug" = 'makeup';
"#;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, description) in ROLES {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(Role::Table)
                        .columns([Role::Name, Role::Description])
                        .values_panic([name.into(), description.into()])
                        .to_owned(),
                )
                .await?;
        }

        for (name, description, slug) in CATEGORIES {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(Category::Table)
                        .columns([Category::Name, Category::Description, Category::Slug])
                        .values_panic([name.into(), description.into(), slug.into()])
                        .to_owned(),
                )
                .await?;
        }

        let db = manager.get_connection();
        for statement in PRODUCTS.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            db.execute_unprepared(statement).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r#"DELETE FROM "product" WHERE "slug" IN ('hydrating-face-cream', 'vitamin-c-serum', 'matte-lipstick-set')"#,
        )
        .await?;

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Category::Table)
                    .and_where(Expr::col(Category::Slug).is_in(CATEGORIES.map(|(_, _, slug)| slug)))
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Role::Table)
                    .and_where(Expr::col(Role::Name).is_in(ROLES.map(|(name, _)| name)))
                    .to_owned(),
            )
            .await
    }
}

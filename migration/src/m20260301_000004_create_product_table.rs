use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000003_create_category_table::Category;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string(Product::Name))
                    .col(text(Product::Description))
                    .col(decimal_len(Product::Price, 18, 2))
                    .col(integer(Product::StockQuantity).default(0))
                    .col(string_null(Product::ImageUrl))
                    .col(string_uniq(Product::Slug))
                    .col(string_null(Product::Brand))
                    .col(boolean(Product::IsFeatured).default(false))
                    .col(integer(Product::CategoryId))
                    .col(timestamp_with_time_zone(Product::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Product::UpdatedAt))
                    .col(boolean(Product::IsDeleted).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_category_id")
                            .from(Product::Table, Product::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_category_id")
                    .table(Product::Table)
                    .col(Product::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Product::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Product {
    Table,
    Id,
    Name,
    Description,
    Price,
    StockQuantity,
    ImageUrl,
    Slug,
    Brand,
    IsFeatured,
    CategoryId,
    CreatedAt,
    UpdatedAt,
    IsDeleted,
}

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(pk_auto(Category::Id))
                    .col(string(Category::Name))
                    .col(text(Category::Description))
                    .col(string_null(Category::ImageUrl))
                    .col(string_uniq(Category::Slug))
                    .col(timestamp_with_time_zone(Category::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Category::UpdatedAt))
                    .col(boolean(Category::IsDeleted).default(false))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Category {
    Table,
    Id,
    Name,
    Description,
    ImageUrl,
    Slug,
    CreatedAt,
    UpdatedAt,
    IsDeleted,
}

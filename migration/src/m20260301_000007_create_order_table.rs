use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000002_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(pk_auto(Order::Id))
                    .col(string_uniq(Order::OrderNumber))
                    .col(integer(Order::UserId))
                    .col(string_len(Order::Status, 20).default("Pending"))
                    .col(decimal_len(Order::TotalAmount, 18, 2))
                    .col(decimal_len(Order::ShippingFee, 18, 2))
                    .col(decimal_len(Order::TaxAmount, 18, 2))
                    .col(string(Order::RecipientName))
                    .col(string(Order::ShippingPhone))
                    .col(text(Order::ShippingAddress))
                    .col(string(Order::ShippingCity))
                    .col(string_null(Order::PaymentMethod))
                    .col(text_null(Order::Notes))
                    .col(timestamp_with_time_zone_null(Order::PaidAt))
                    .col(string_null(Order::StripeSessionId))
                    .col(string_null(Order::StripePaymentIntentId))
                    .col(string_null(Order::PaypalOrderId))
                    .col(timestamp_with_time_zone(Order::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Order::UpdatedAt))
                    .col(boolean(Order::IsDeleted).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user_id")
                            .from(Order::Table, Order::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_user_id")
                    .table(Order::Table)
                    .col(Order::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Order {
    Table,
    Id,
    OrderNumber,
    UserId,
    Status,
    TotalAmount,
    ShippingFee,
    TaxAmount,
    RecipientName,
    ShippingPhone,
    ShippingAddress,
    ShippingCity,
    PaymentMethod,
    Notes,
    PaidAt,
    StripeSessionId,
    StripePaymentIntentId,
    PaypalOrderId,
    CreatedAt,
    UpdatedAt,
    IsDeleted,
}

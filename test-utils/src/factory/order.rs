//! Order factory for creating test order entities.
//!
//! Orders built here carry no items; use `item()` to attach lines copied from products.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::order::OrderStatus;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test orders.
pub struct OrderFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: i32,
    order_number: String,
    status: OrderStatus,
    shipping_fee: Decimal,
    items: Vec<(entity::product::Model, i32)>,
}

impl<'a> OrderFactory<'a> {
    /// Creates a new OrderFactory with default values.
    ///
    /// Defaults:
    /// - order_number: `"ORD-TEST-{id}"`
    /// - status: `Pending`
    /// - shipping_fee: `5.00`
    pub fn new(db: &'a DatabaseConnection, user_id: i32) -> Self {
        Self {
            db,
            user_id,
            order_number: format!("ORD-TEST-{}", next_id()),
            status: OrderStatus::Pending,
            shipping_fee: Decimal::new(500, 2),
            items: Vec::new(),
        }
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds a line for `quantity` units of `product` at its current price.
    pub fn item(mut self, product: &entity::product::Model, quantity: i32) -> Self {
        self.items.push((product.clone(), quantity));
        self
    }

    /// Builds the order and its items.
    ///
    /// The total is computed from the items plus shipping and tax.
    ///
    /// # Returns
    /// - `Ok(entity::order::Model)` - Created order
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::order::Model, DbErr> {
        let now = Utc::now();
        let sub_total: Decimal = self
            .items
            .iter()
            .map(|(product, quantity)| product.price * Decimal::from(*quantity))
            .sum();

        let order = entity::order::ActiveModel {
            order_number: ActiveValue::Set(self.order_number),
            user_id: ActiveValue::Set(self.user_id),
            status: ActiveValue::Set(self.status),
            total_amount: ActiveValue::Set(sub_total + self.shipping_fee),
            shipping_fee: ActiveValue::Set(self.shipping_fee),
            tax_amount: ActiveValue::Set(Decimal::ZERO),
            recipient_name: ActiveValue::Set("Test Recipient".to_string()),
            shipping_phone: ActiveValue::Set("0123456789".to_string()),
            shipping_address: ActiveValue::Set("1 Test Street".to_string()),
            shipping_city: ActiveValue::Set("Testville".to_string()),
            payment_method: ActiveValue::Set(None),
            notes: ActiveValue::Set(None),
            paid_at: ActiveValue::Set(None),
            stripe_session_id: ActiveValue::Set(None),
            stripe_payment_intent_id: ActiveValue::Set(None),
            paypal_order_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(None),
            is_deleted: ActiveValue::Set(false),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        for (product, quantity) in self.items {
            entity::order_item::ActiveModel {
                order_id: ActiveValue::Set(order.id),
                product_id: ActiveValue::Set(product.id),
                quantity: ActiveValue::Set(quantity),
                unit_price: ActiveValue::Set(product.price),
                total_price: ActiveValue::Set(product.price * Decimal::from(quantity)),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(None),
                is_deleted: ActiveValue::Set(false),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }

        Ok(order)
    }
}

/// Creates an empty pending order for a user.
pub async fn create_order(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<entity::order::Model, DbErr> {
    OrderFactory::new(db, user_id).build().await
}

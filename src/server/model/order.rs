//! Order domain models and parameters.

use chrono::{DateTime, Utc};
use entity::order::OrderStatus;
use rust_decimal::Decimal;

use crate::model::order::{CreateOrderDto, OrderDto, OrderItemDto};

/// Order with its lines.
///
/// `total_amount` always equals the sum of line totals plus shipping fee and tax.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: i32,
    pub order_number: String,
    pub user_id: i32,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub shipping_fee: Decimal,
    pub tax_amount: Decimal,
    pub recipient_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub stripe_session_id: Option<String>,
    pub paypal_order_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderLine>,
}

/// Order line with the purchased product's display data.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub product_image_url: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl OrderLine {
    pub fn from_entity(
        item: entity::order_item::Model,
        product: Option<entity::product::Model>,
    ) -> Self {
        let (product_name, product_image_url) = match product {
            Some(p) => (p.name, p.image_url),
            None => ("Unknown".to_string(), None),
        };

        Self {
            id: item.id,
            product_id: item.product_id,
            product_name,
            product_image_url,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
        }
    }
}

impl Order {
    pub fn from_entity(order: entity::order::Model, items: Vec<OrderLine>) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            user_id: order.user_id,
            status: order.status,
            total_amount: order.total_amount,
            shipping_fee: order.shipping_fee,
            tax_amount: order.tax_amount,
            recipient_name: order.recipient_name,
            shipping_phone: order.shipping_phone,
            shipping_address: order.shipping_address,
            shipping_city: order.shipping_city,
            payment_method: order.payment_method,
            notes: order.notes,
            stripe_session_id: order.stripe_session_id,
            paypal_order_id: order.paypal_order_id,
            created_at: order.created_at,
            paid_at: order.paid_at,
            items,
        }
    }

    /// Sum of the line totals, excluding shipping and tax.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|line| line.total_price).sum()
    }

    pub fn into_dto(self) -> OrderDto {
        OrderDto {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            status: self.status.to_string(),
            total_amount: self.total_amount,
            shipping_fee: self.shipping_fee,
            tax_amount: self.tax_amount,
            recipient_name: self.recipient_name,
            shipping_phone: self.shipping_phone,
            shipping_address: self.shipping_address,
            shipping_city: self.shipping_city,
            payment_method: self.payment_method,
            notes: self.notes,
            created_at: self.created_at,
            paid_at: self.paid_at,
            items: self
                .items
                .into_iter()
                .map(|line| OrderItemDto {
                    id: line.id,
                    product_id: line.product_id,
                    product_name: line.product_name,
                    product_image_url: line.product_image_url,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    total_price: line.total_price,
                })
                .collect(),
        }
    }
}

/// Shipping and payment details supplied when placing an order.
#[derive(Debug, Clone)]
pub struct CreateOrderParams {
    pub recipient_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub payment_method: String,
    pub notes: Option<String>,
}

impl CreateOrderParams {
    pub fn from_dto(dto: CreateOrderDto) -> Self {
        Self {
            recipient_name: dto.recipient_name.trim().to_string(),
            shipping_phone: dto.shipping_phone.trim().to_string(),
            shipping_address: dto.shipping_address.trim().to_string(),
            shipping_city: dto.shipping_city.trim().to_string(),
            payment_method: dto.payment_method,
            notes: dto.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

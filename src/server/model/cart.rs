//! Cart domain models.

use rust_decimal::Decimal;

use crate::model::cart::{CartDto, CartItemDto};

/// A user's cart with its live lines.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<CartLine>,
}

/// Cart line joined with the product's current name, price and image.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub quantity: i32,
    pub image_url: Option<String>,
}

impl CartLine {
    pub fn from_entity(item: entity::cart_item::Model, product: entity::product::Model) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            product_name: product.name,
            price: product.price,
            stock_quantity: product.stock_quantity,
            quantity: item.quantity,
            image_url: product.image_url,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl Cart {
    pub fn from_entity(cart: entity::cart::Model, items: Vec<CartLine>) -> Self {
        Self {
            id: cart.id,
            user_id: cart.user_id,
            items,
        }
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLine::subtotal).sum()
    }

    pub fn into_dto(self) -> CartDto {
        let total_amount = self.total();

        CartDto {
            id: self.id,
            user_id: self.user_id,
            items: self
                .items
                .into_iter()
                .map(|line| CartItemDto {
                    subtotal: line.subtotal(),
                    id: line.id,
                    product_id: line.product_id,
                    product_name: line.product_name,
                    price: line.price,
                    quantity: line.quantity,
                    image_url: line.image_url,
                })
                .collect(),
            total_amount,
        }
    }
}

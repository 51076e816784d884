//! Order data repository.
//!
//! Loads orders together with their lines and the purchased products. Multi-order
//! queries fetch all lines in one batch and group them per order.

use std::collections::HashMap;

use entity::order::OrderStatus;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select,
};

use crate::server::model::order::{Order, OrderLine};

pub struct OrderRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OrderRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn live() -> Select<entity::order::Entity> {
        entity::prelude::Order::find().filter(entity::order::Column::IsDeleted.eq(false))
    }

    /// Attaches live lines (with products) to each order, preserving order sequence.
    async fn load_items(&self, orders: Vec<entity::order::Model>) -> Result<Vec<Order>, DbErr> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        let rows = entity::prelude::OrderItem::find()
            .filter(entity::order_item::Column::OrderId.is_in(order_ids))
            .filter(entity::order_item::Column::IsDeleted.eq(false))
            .find_also_related(entity::prelude::Product)
            .order_by_asc(entity::order_item::Column::Id)
            .all(self.db)
            .await?;

        let mut lines_by_order: HashMap<i32, Vec<OrderLine>> = HashMap::new();
        for (item, product) in rows {
            lines_by_order
                .entry(item.order_id)
                .or_default()
                .push(OrderLine::from_entity(item, product));
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let lines = lines_by_order.remove(&order.id).unwrap_or_default();
                Order::from_entity(order, lines)
            })
            .collect())
    }

    /// Gets a live order by id with its lines.
    pub async fn get_with_items(&self, id: i32) -> Result<Option<Order>, DbErr> {
        let Some(order) = Self::live()
            .filter(entity::order::Column::Id.eq(id))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.load_items(vec![order]).await?.into_iter().next())
    }

    /// Gets a user's orders, newest first.
    pub async fn get_by_user_id(&self, user_id: i32) -> Result<Vec<Order>, DbErr> {
        let orders = Self::live()
            .filter(entity::order::Column::UserId.eq(user_id))
            .order_by_desc(entity::order::Column::CreatedAt)
            .order_by_desc(entity::order::Column::Id)
            .all(self.db)
            .await?;

        self.load_items(orders).await
    }

    /// Gets every order, newest first.
    pub async fn get_all_with_items(&self) -> Result<Vec<Order>, DbErr> {
        let orders = Self::live()
            .order_by_desc(entity::order::Column::CreatedAt)
            .order_by_desc(entity::order::Column::Id)
            .all(self.db)
            .await?;

        self.load_items(orders).await
    }

    /// Gets orders in `status`, newest first.
    pub async fn get_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DbErr> {
        let orders = Self::live()
            .filter(entity::order::Column::Status.eq(status))
            .order_by_desc(entity::order::Column::CreatedAt)
            .order_by_desc(entity::order::Column::Id)
            .all(self.db)
            .await?;

        self.load_items(orders).await
    }

    pub async fn get_by_order_number(
        &self,
        order_number: &str,
    ) -> Result<Option<entity::order::Model>, DbErr> {
        Self::live()
            .filter(entity::order::Column::OrderNumber.eq(order_number))
            .one(self.db)
            .await
    }

    pub async fn get_by_stripe_session_id(
        &self,
        session_id: &str,
    ) -> Result<Option<entity::order::Model>, DbErr> {
        Self::live()
            .filter(entity::order::Column::StripeSessionId.eq(session_id))
            .one(self.db)
            .await
    }

    pub async fn get_by_paypal_order_id(
        &self,
        paypal_order_id: &str,
    ) -> Result<Option<entity::order::Model>, DbErr> {
        Self::live()
            .filter(entity::order::Column::PaypalOrderId.eq(paypal_order_id))
            .one(self.db)
            .await
    }

    /// Checks whether an order number is already in use, including by deleted orders.
    pub async fn order_number_exists(&self, order_number: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::Order::find()
            .filter(entity::order::Column::OrderNumber.eq(order_number))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }
}

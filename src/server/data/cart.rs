use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::server::model::cart::{Cart, CartLine};

pub struct CartRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CartRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds the live cart owned by a user.
    pub async fn get_by_user_id(&self, user_id: i32) -> Result<Option<entity::cart::Model>, DbErr> {
        entity::prelude::Cart::find()
            .filter(entity::cart::Column::UserId.eq(user_id))
            .filter(entity::cart::Column::IsDeleted.eq(false))
            .one(self.db)
            .await
    }

    /// Loads a user's cart with its live lines joined to products.
    ///
    /// Lines whose product has been soft deleted are left out.
    ///
    /// # Returns
    /// - `Ok(Some(Cart))` - The cart, possibly with no lines
    /// - `Ok(None)` - User has no cart yet
    /// - `Err(DbErr)` - Database error
    pub async fn get_cart_with_items(&self, user_id: i32) -> Result<Option<Cart>, DbErr> {
        let Some(cart) = self.get_by_user_id(user_id).await? else {
            return Ok(None);
        };

        let items = entity::prelude::CartItem::find()
            .filter(entity::cart_item::Column::CartId.eq(cart.id))
            .filter(entity::cart_item::Column::IsDeleted.eq(false))
            .find_also_related(entity::prelude::Product)
            .order_by_asc(entity::cart_item::Column::Id)
            .all(self.db)
            .await?;

        let lines = items
            .into_iter()
            .filter_map(|(item, product)| {
                product
                    .filter(|p| !p.is_deleted)
                    .map(|p| CartLine::from_entity(item, p))
            })
            .collect();

        Ok(Some(Cart::from_entity(cart, lines)))
    }

    /// Finds the live line for `product_id` in a cart.
    pub async fn get_item_for_product(
        &self,
        cart_id: i32,
        product_id: i32,
    ) -> Result<Option<entity::cart_item::Model>, DbErr> {
        entity::prelude::CartItem::find()
            .filter(entity::cart_item::Column::CartId.eq(cart_id))
            .filter(entity::cart_item::Column::ProductId.eq(product_id))
            .filter(entity::cart_item::Column::IsDeleted.eq(false))
            .one(self.db)
            .await
    }

    /// Finds a live line by id, only if it belongs to `cart_id`.
    pub async fn get_item_in_cart(
        &self,
        cart_id: i32,
        cart_item_id: i32,
    ) -> Result<Option<entity::cart_item::Model>, DbErr> {
        entity::prelude::CartItem::find_by_id(cart_item_id)
            .filter(entity::cart_item::Column::CartId.eq(cart_id))
            .filter(entity::cart_item::Column::IsDeleted.eq(false))
            .one(self.db)
            .await
    }
}

//! Shopping cart operations.
//!
//! Every user has at most one cart, created lazily on first access. Quantities are
//! checked against current stock whenever they change; stock itself is only reserved
//! when an order is placed.

use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};

use crate::server::{
    data::{cart::CartRepository, repository::Repository},
    error::AppError,
    model::cart::Cart,
};

pub struct CartService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CartService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    fn cart_items(&self) -> Repository<'a, entity::cart_item::Entity, DatabaseConnection> {
        Repository::new(self.db)
    }

    /// Gets the user's cart, creating an empty one on first access.
    pub async fn get_cart(&self, user_id: i32) -> Result<Cart, AppError> {
        if let Some(cart) = CartRepository::new(self.db)
            .get_cart_with_items(user_id)
            .await?
        {
            return Ok(cart);
        }

        let cart = self.create_cart(user_id).await?;

        Ok(Cart::from_entity(cart, Vec::new()))
    }

    /// Adds `quantity` units of a product, merging into an existing line.
    ///
    /// # Returns
    /// - `Ok(Cart)` - Updated cart
    /// - `Err(AppError::NotFound)` - Product missing or deleted
    /// - `Err(AppError::BadRequest)` - Non-positive quantity or not enough stock for the
    ///   resulting line quantity
    pub async fn add_item(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<Cart, AppError> {
        if quantity <= 0 {
            return Err(AppError::bad_request("Quantity must be greater than zero"));
        }

        let product = Repository::<entity::product::Entity, DatabaseConnection>::new(self.db)
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;

        let cart = self.get_or_create_cart(user_id).await?;
        let existing = CartRepository::new(self.db)
            .get_item_for_product(cart.id, product_id)
            .await?;

        let requested = quantity
            .checked_add(existing.as_ref().map_or(0, |item| item.quantity))
            .filter(|requested| *requested <= product.stock_quantity)
            .ok_or_else(|| AppError::bad_request("Insufficient stock"))?;

        match existing {
            Some(item) => {
                let mut active = item.into_active_model();
                active.quantity = ActiveValue::Set(requested);
                self.cart_items().update(active).await?;
            }
            None => {
                self.cart_items()
                    .add(entity::cart_item::ActiveModel {
                        cart_id: ActiveValue::Set(cart.id),
                        product_id: ActiveValue::Set(product_id),
                        quantity: ActiveValue::Set(quantity),
                        updated_at: ActiveValue::Set(None),
                        ..Default::default()
                    })
                    .await?;
            }
        }

        self.get_cart(user_id).await
    }

    /// Sets a line's quantity; zero or less removes the line.
    pub async fn update_item(
        &self,
        user_id: i32,
        cart_item_id: i32,
        quantity: i32,
    ) -> Result<Cart, AppError> {
        let item = self.find_own_item(user_id, cart_item_id).await?;

        if quantity <= 0 {
            self.cart_items().soft_delete(item.id).await?;
            return self.get_cart(user_id).await;
        }

        let product = Repository::<entity::product::Entity, DatabaseConnection>::new(self.db)
            .get_by_id(item.product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;
        if product.stock_quantity < quantity {
            return Err(AppError::bad_request("Insufficient stock"));
        }

        let mut active = item.into_active_model();
        active.quantity = ActiveValue::Set(quantity);
        self.cart_items().update(active).await?;

        self.get_cart(user_id).await
    }

    pub async fn remove_item(&self, user_id: i32, cart_item_id: i32) -> Result<Cart, AppError> {
        let item = self.find_own_item(user_id, cart_item_id).await?;
        self.cart_items().soft_delete(item.id).await?;

        self.get_cart(user_id).await
    }

    /// Removes every line from the user's cart.
    pub async fn clear(&self, user_id: i32) -> Result<(), AppError> {
        let cart = CartRepository::new(self.db)
            .get_cart_with_items(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cart not found"))?;

        for line in &cart.items {
            self.cart_items().soft_delete(line.id).await?;
        }

        tracing::debug!("Cleared {} items from cart {}", cart.items.len(), cart.id);

        Ok(())
    }

    /// Finds a live line in the user's own cart.
    async fn find_own_item(
        &self,
        user_id: i32,
        cart_item_id: i32,
    ) -> Result<entity::cart_item::Model, AppError> {
        let repo = CartRepository::new(self.db);
        let cart = repo
            .get_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cart not found"))?;

        repo.get_item_in_cart(cart.id, cart_item_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cart item not found"))
    }

    async fn get_or_create_cart(&self, user_id: i32) -> Result<entity::cart::Model, AppError> {
        match CartRepository::new(self.db).get_by_user_id(user_id).await? {
            Some(cart) => Ok(cart),
            None => self.create_cart(user_id).await,
        }
    }

    async fn create_cart(&self, user_id: i32) -> Result<entity::cart::Model, AppError> {
        let cart = Repository::<entity::cart::Entity, DatabaseConnection>::new(self.db)
            .add(entity::cart::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                updated_at: ActiveValue::Set(None),
                ..Default::default()
            })
            .await?;

        tracing::debug!("Created cart {} for user {}", cart.id, user_id);

        Ok(cart)
    }
}

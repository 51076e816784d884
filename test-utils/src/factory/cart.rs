//! Cart and cart item factories.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates an empty cart for a user.
///
/// # Arguments
/// - `db` - Database connection
/// - `user_id` - ID of the cart owner
///
/// # Returns
/// - `Ok(entity::cart::Model)` - Created cart
/// - `Err(DbErr)` - Database error during insert
pub async fn create_cart(db: &DatabaseConnection, user_id: i32) -> Result<entity::cart::Model, DbErr> {
    entity::cart::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        created_at: ActiveValue::Set(Utc::now()),
        updated_at: ActiveValue::Set(None),
        is_deleted: ActiveValue::Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Adds a line to a cart.
pub async fn create_cart_item(
    db: &DatabaseConnection,
    cart_id: i32,
    product_id: i32,
    quantity: i32,
) -> Result<entity::cart_item::Model, DbErr> {
    entity::cart_item::ActiveModel {
        cart_id: ActiveValue::Set(cart_id),
        product_id: ActiveValue::Set(product_id),
        quantity: ActiveValue::Set(quantity),
        created_at: ActiveValue::Set(Utc::now()),
        updated_at: ActiveValue::Set(None),
        is_deleted: ActiveValue::Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
}

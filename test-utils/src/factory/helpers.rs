//! Shared helper utilities for factory methods.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

/// Counter for generating unique values in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Finds a role by name, creating it when missing.
///
/// # Arguments
/// - `db` - Database connection
/// - `name` - Role name such as `"User"` or `"Admin"`
///
/// # Returns
/// - `Ok(entity::role::Model)` - Existing or newly created role
/// - `Err(DbErr)` - Database error during lookup or insert
pub async fn find_or_create_role(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entity::role::Model, DbErr> {
    if let Some(role) = entity::prelude::Role::find()
        .filter(entity::role::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(role);
    }

    crate::factory::role::RoleFactory::new(db).name(name).build().await
}

/// Creates a user holding the `User` role.
pub async fn create_customer(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    let role = find_or_create_role(db, "User").await?;
    crate::factory::user::create_user(db, role.id).await
}

/// Creates a user holding the `Admin` role.
pub async fn create_admin(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    let role = find_or_create_role(db, "Admin").await?;
    crate::factory::user::create_user(db, role.id).await
}

/// Creates a category and a product inside it.
///
/// # Returns
/// - `Ok((category, product))` - Tuple of created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_product_with_category(
    db: &DatabaseConnection,
) -> Result<(entity::category::Model, entity::product::Model), DbErr> {
    let category = crate::factory::category::create_category(db).await?;
    let product = crate::factory::product::create_product(db, category.id).await?;

    Ok((category, product))
}

/// Creates a customer with a cart holding `quantity` units of a fresh product.
///
/// # Returns
/// - `Ok((user, product, cart))` - Tuple of created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_customer_with_cart(
    db: &DatabaseConnection,
    quantity: i32,
) -> Result<
    (
        entity::user::Model,
        entity::product::Model,
        entity::cart::Model,
    ),
    DbErr,
> {
    let user = create_customer(db).await?;
    let (_, product) = create_product_with_category(db).await?;
    let cart = crate::factory::cart::create_cart(db, user.id).await?;
    crate::factory::cart::create_cart_item(db, cart.id, product.id, quantity).await?;

    Ok((user, product, cart))
}

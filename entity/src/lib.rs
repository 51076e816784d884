//! SeaORM entity models for the storefront database.
//!
//! Every table shares the same base columns: an auto-increment `id`, `created_at`,
//! a nullable `updated_at` and the `is_deleted` soft-delete flag. The [`SoftDelete`]
//! trait exposes those columns generically so a single repository implementation can
//! serve every entity.

pub mod cart;
pub mod cart_item;
pub mod category;
pub mod order;
pub mod order_item;
pub mod prelude;
pub mod product;
pub mod role;
pub mod user;

use sea_orm::EntityTrait;

/// Base columns shared by every storefront table.
pub trait SoftDelete: EntityTrait {
    fn id_column() -> Self::Column;
    fn created_at_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;
    fn is_deleted_column() -> Self::Column;
}

macro_rules! soft_delete {
    ($($module:ident),* $(,)?) => {
        $(
            impl SoftDelete for $module::Entity {
                fn id_column() -> $module::Column {
                    $module::Column::Id
                }

                fn created_at_column() -> $module::Column {
                    $module::Column::CreatedAt
                }

                fn updated_at_column() -> $module::Column {
                    $module::Column::UpdatedAt
                }

                fn is_deleted_column() -> $module::Column {
                    $module::Column::IsDeleted
                }
            }
        )*
    };
}

soft_delete!(cart, cart_item, category, order, order_item, product, role, user);

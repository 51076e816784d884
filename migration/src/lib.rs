pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_role_table;
mod m20260301_000002_create_user_table;
mod m20260301_000003_create_category_table;
mod m20260301_000004_create_product_table;
mod m20260301_000005_create_cart_table;
mod m20260301_000006_create_cart_item_table;
mod m20260301_000007_create_order_table;
mod m20260301_000008_create_order_item_table;
mod m20260301_000009_seed_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_role_table::Migration),
            Box::new(m20260301_000002_create_user_table::Migration),
            Box::new(m20260301_000003_create_category_table::Migration),
            Box::new(m20260301_000004_create_product_table::Migration),
            Box::new(m20260301_000005_create_cart_table::Migration),
            Box::new(m20260301_000006_create_cart_item_table::Migration),
            Box::new(m20260301_000007_create_order_table::Migration),
            Box::new(m20260301_000008_create_order_item_table::Migration),
            Box::new(m20260301_000009_seed_catalog::Migration),
        ]
    }
}

//! Factory methods for creating test data.
//!
//! Each entity has a `Factory` builder for customization and a `create_*` function for
//! quick default creation. Factories take foreign keys as arguments; the `helpers`
//! module wires up common dependency chains.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let category = factory::create_category(&db).await?;
//! let product = factory::product::ProductFactory::new(&db, category.id)
//!     .price(Decimal::new(1999, 2))
//!     .stock_quantity(3)
//!     .build()
//!     .await?;
//! ```

pub mod cart;
pub mod category;
pub mod helpers;
pub mod order;
pub mod product;
pub mod role;
pub mod user;

pub use cart::{create_cart, create_cart_item};
pub use category::create_category;
pub use order::create_order;
pub use product::create_product;
pub use role::create_role;
pub use user::create_user;

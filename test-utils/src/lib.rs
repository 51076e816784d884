//! Storefront Test Utils
//!
//! Shared testing utilities for the storefront backend. Provides a builder for test
//! contexts backed by an in-memory SQLite database plus factories for every entity.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_cart() -> Result<(), sea_orm::DbErr> {
//!     let test = TestBuilder::new()
//!         .with_storefront_tables()
//!         .build()
//!         .await
//!         .unwrap();
//!     let db = test.db.as_ref().unwrap();
//!
//!     let user = factory::helpers::create_customer(db).await?;
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;

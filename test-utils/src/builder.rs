use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Add entity tables with `with_table()` in dependency order, then call `build()` to
/// create an in-memory SQLite database containing them.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{Role, User};
///
/// let test = TestBuilder::new()
///     .with_table(Role)
///     .with_table(User)
///     .build()
///     .await?;
/// ```
#[derive(Default)]
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Tables with foreign keys must be added after the tables they reference.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity to create a table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the account tables: Role, User.
    pub fn with_user_tables(self) -> Self {
        self.with_table(Role).with_table(User)
    }

    /// Adds the catalogue tables: Category, Product.
    pub fn with_catalog_tables(self) -> Self {
        self.with_table(Category).with_table(Product)
    }

    /// Adds every storefront table in dependency order.
    ///
    /// Use this for cart, order and payment tests which touch most of the schema.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_storefront_tables(self) -> Self {
        self.with_user_tables()
            .with_catalog_tables()
            .with_table(Cart)
            .with_table(CartItem)
            .with_table(Order)
            .with_table(OrderItem)
    }

    /// Builds the test context and creates all configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Initialized test context with tables ready
    /// - `Err(TestError::Database)` - Failed to connect or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}

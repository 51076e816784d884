//! Transaction wrapper coordinating several repositories.

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use crate::server::data::repository::Repository;

/// Groups repository operations into one database transaction.
///
/// Repositories obtained from the accessors run on the transaction. Nothing is
/// persisted until `commit()`; dropping an uncommitted unit of work rolls it back.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    /// Starts a new transaction on the pool.
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, DbErr> {
        Ok(Self {
            txn: db.begin().await?,
        })
    }

    /// Connection for entity specific repositories that should join the transaction.
    pub fn connection(&self) -> &DatabaseTransaction {
        &self.txn
    }

    pub fn users(&self) -> Repository<'_, entity::user::Entity, DatabaseTransaction> {
        Repository::new(&self.txn)
    }

    pub fn roles(&self) -> Repository<'_, entity::role::Entity, DatabaseTransaction> {
        Repository::new(&self.txn)
    }

    pub fn categories(&self) -> Repository<'_, entity::category::Entity, DatabaseTransaction> {
        Repository::new(&self.txn)
    }

    pub fn products(&self) -> Repository<'_, entity::product::Entity, DatabaseTransaction> {
        Repository::new(&self.txn)
    }

    pub fn carts(&self) -> Repository<'_, entity::cart::Entity, DatabaseTransaction> {
        Repository::new(&self.txn)
    }

    pub fn cart_items(&self) -> Repository<'_, entity::cart_item::Entity, DatabaseTransaction> {
        Repository::new(&self.txn)
    }

    pub fn orders(&self) -> Repository<'_, entity::order::Entity, DatabaseTransaction> {
        Repository::new(&self.txn)
    }

    pub fn order_items(&self) -> Repository<'_, entity::order_item::Entity, DatabaseTransaction> {
        Repository::new(&self.txn)
    }

    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

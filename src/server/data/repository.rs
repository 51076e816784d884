//! Generic repository over any soft-deletable entity.
//!
//! Every read filters out rows whose `is_deleted` flag is set, so soft-deleted records
//! are invisible to callers without each query repeating the condition. The repository
//! works with any SeaORM connection, which lets the unit of work hand out repositories
//! bound to its transaction.

use std::marker::PhantomData;

use chrono::Utc;
use entity::SoftDelete;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Select,
};

pub struct Repository<'a, E, C> {
    db: &'a C,
    entity: PhantomData<E>,
}

impl<'a, E, C> Repository<'a, E, C>
where
    E: SoftDelete,
    C: ConnectionTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    pub fn new(db: &'a C) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }

    /// Base query restricted to rows that have not been soft deleted.
    fn live() -> Select<E> {
        E::find().filter(E::is_deleted_column().eq(false))
    }

    /// Gets a live record by primary key.
    ///
    /// # Returns
    /// - `Ok(Some(Model))` - Record exists and is not soft deleted
    /// - `Ok(None)` - Record missing or soft deleted
    /// - `Err(DbErr)` - Database error
    pub async fn get_by_id(&self, id: i32) -> Result<Option<E::Model>, DbErr> {
        Self::live()
            .filter(E::id_column().eq(id))
            .one(self.db)
            .await
    }

    /// Gets all live records ordered by id.
    pub async fn get_all(&self) -> Result<Vec<E::Model>, DbErr> {
        Self::live()
            .order_by_asc(E::id_column())
            .all(self.db)
            .await
    }

    /// Gets all live records matching `condition`, ordered by id.
    pub async fn find(&self, condition: Condition) -> Result<Vec<E::Model>, DbErr> {
        Self::live()
            .filter(condition)
            .order_by_asc(E::id_column())
            .all(self.db)
            .await
    }

    /// Gets the first live record matching `condition`.
    pub async fn find_one(&self, condition: Condition) -> Result<Option<E::Model>, DbErr> {
        Self::live()
            .filter(condition)
            .order_by_asc(E::id_column())
            .one(self.db)
            .await
    }

    /// Inserts a new record.
    ///
    /// Stamps `created_at` unless the caller set it and always clears the soft-delete
    /// flag.
    pub async fn add(&self, mut model: E::ActiveModel) -> Result<E::Model, DbErr> {
        if model.get(E::created_at_column()).is_not_set() {
            model.set(E::created_at_column(), Utc::now().into());
        }
        model.set(E::is_deleted_column(), false.into());

        model.insert(self.db).await
    }

    /// Updates the columns set on `model` and stamps `updated_at`.
    ///
    /// The primary key must be present on `model`.
    pub async fn update(&self, mut model: E::ActiveModel) -> Result<E::Model, DbErr> {
        model.set(E::updated_at_column(), Some(Utc::now()).into());

        model.update(self.db).await
    }

    /// Soft deletes a record by flagging it instead of removing the row.
    ///
    /// # Returns
    /// - `Ok(true)` - Record was live and is now flagged as deleted
    /// - `Ok(false)` - No live record with that id
    /// - `Err(DbErr)` - Database error
    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let Some(model) = self.get_by_id(id).await? else {
            return Ok(false);
        };

        let mut active = model.into_active_model();
        active.set(E::is_deleted_column(), true.into());
        active.set(E::updated_at_column(), Some(Utc::now()).into());
        active.update(self.db).await?;

        Ok(true)
    }

    /// Checks whether a live record with the id exists.
    pub async fn exists(&self, id: i32) -> Result<bool, DbErr> {
        let count = Self::live()
            .filter(E::id_column().eq(id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Counts live records, optionally restricted by `condition`.
    pub async fn count(&self, condition: Option<Condition>) -> Result<u64, DbErr> {
        let mut query = Self::live();
        if let Some(condition) = condition {
            query = query.filter(condition);
        }

        query.count(self.db).await
    }
}

//! User data repository.
//!
//! Provides the user lookups that need the role joined in or special filters (email,
//! reset token). Plain CRUD goes through the generic `Repository`.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select,
};

use crate::server::model::user::User;

pub struct UserRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn live() -> Select<entity::user::Entity> {
        entity::prelude::User::find().filter(entity::user::Column::IsDeleted.eq(false))
    }

    /// Finds a live user by email, with role.
    ///
    /// # Arguments
    /// - `email` - Already normalized (lowercase) email
    ///
    /// # Returns
    /// - `Ok(Some(User))` - Matching user
    /// - `Ok(None)` - No live user with that email
    /// - `Err(DbErr)` - Database error
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let result = Self::live()
            .filter(entity::user::Column::Email.eq(email))
            .find_also_related(entity::prelude::Role)
            .one(self.db)
            .await?;

        Ok(result.map(|(user, role)| User::from_entity(user, role)))
    }

    /// Finds a live user by id, with role.
    pub async fn get_with_role(&self, id: i32) -> Result<Option<User>, DbErr> {
        let result = Self::live()
            .filter(entity::user::Column::Id.eq(id))
            .find_also_related(entity::prelude::Role)
            .one(self.db)
            .await?;

        Ok(result.map(|(user, role)| User::from_entity(user, role)))
    }

    /// Gets all live users with roles, ordered by id.
    pub async fn get_all_with_role(&self) -> Result<Vec<User>, DbErr> {
        let results = Self::live()
            .find_also_related(entity::prelude::Role)
            .order_by_asc(entity::user::Column::Id)
            .all(self.db)
            .await?;

        Ok(results
            .into_iter()
            .map(|(user, role)| User::from_entity(user, role))
            .collect())
    }

    /// Finds a live user holding `token` that has not expired by `now`.
    pub async fn get_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<entity::user::Model>, DbErr> {
        Self::live()
            .filter(entity::user::Column::ResetPasswordToken.eq(token))
            .filter(entity::user::Column::ResetPasswordExpiry.gt(now))
            .one(self.db)
            .await
    }

    /// Checks whether any account, deleted or not, uses the email.
    ///
    /// Soft-deleted rows are included because the unique index still covers them.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }
}

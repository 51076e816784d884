//! User factory for creating test user entities.
//!
//! The default password hash is not a valid argon2 hash. Tests that log in should set a
//! real hash with `password_hash()`.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::user::UserFactory;
///
/// let user = UserFactory::new(&db, role.id)
///     .email("jane@example.com")
///     .full_name("Jane Doe")
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    role_id: i32,
    email: String,
    full_name: String,
    password_hash: String,
    phone_number: Option<String>,
    reset_password_token: Option<String>,
    reset_password_expiry: Option<DateTime<Utc>>,
    is_deleted: bool,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - email: `"user{id}@example.com"` where id is auto-incremented
    /// - full_name: `"User {id}"`
    /// - password_hash: placeholder string
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `role_id` - ID of the role the user belongs to
    pub fn new(db: &'a DatabaseConnection, role_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            role_id,
            email: format!("user{}@example.com", id),
            full_name: format!("User {}", id),
            password_hash: "unusable-password-hash".to_string(),
            phone_number: None,
            reset_password_token: None,
            reset_password_expiry: None,
            is_deleted: false,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = password_hash.into();
        self
    }

    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Sets a password reset token expiring at `expiry`.
    pub fn reset_token(mut self, token: impl Into<String>, expiry: DateTime<Utc>) -> Self {
        self.reset_password_token = Some(token.into());
        self.reset_password_expiry = Some(expiry);
        self
    }

    /// Marks the user as soft deleted.
    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    /// Builds and inserts the user entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user::Model)` - Created user entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            email: ActiveValue::Set(self.email),
            password_hash: ActiveValue::Set(self.password_hash),
            full_name: ActiveValue::Set(self.full_name),
            phone_number: ActiveValue::Set(self.phone_number),
            avatar_url: ActiveValue::Set(None),
            address: ActiveValue::Set(None),
            reset_password_token: ActiveValue::Set(self.reset_password_token),
            reset_password_expiry: ActiveValue::Set(self.reset_password_expiry),
            email_confirmed: ActiveValue::Set(false),
            role_id: ActiveValue::Set(self.role_id),
            created_at: ActiveValue::Set(Utc::now()),
            updated_at: ActiveValue::Set(None),
            is_deleted: ActiveValue::Set(self.is_deleted),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a user with default values in the given role.
///
/// Shorthand for `UserFactory::new(db, role_id).build().await`.
pub async fn create_user(
    db: &DatabaseConnection,
    role_id: i32,
) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db, role_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use crate::factory::role::create_role;

    #[tokio::test]
    async fn creates_user_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let role = create_role(db, "User").await?;

        let user = create_user(db, role.id).await?;

        assert!(user.email.ends_with("@example.com"));
        assert_eq!(user.role_id, role.id);
        assert!(!user.is_deleted);

        Ok(())
    }

    #[tokio::test]
    async fn creates_multiple_unique_users() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let role = create_role(db, "User").await?;

        let user1 = create_user(db, role.id).await?;
        let user2 = create_user(db, role.id).await?;

        assert_ne!(user1.email, user2.email);

        Ok(())
    }
}

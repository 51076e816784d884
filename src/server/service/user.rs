//! User administration and profile updates.

use sea_orm::{ActiveValue, ColumnTrait, Condition, DatabaseConnection};

use crate::server::{
    data::{repository::Repository, user::UserRepository},
    error::AppError,
    model::user::{normalize_email, UpdateProfileParams, User, ADMIN_ROLE},
    service::password::hash_password,
};

const ADMIN_FULL_NAME: &str = "System Administrator";

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_all(&self) -> Result<Vec<User>, AppError> {
        Ok(UserRepository::new(self.db).get_all_with_role().await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .get_with_role(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Assigns the role named `role_name` to a user.
    ///
    /// # Returns
    /// - `Ok(User)` - User with the new role
    /// - `Err(AppError::NotFound)` - No such user
    /// - `Err(AppError::BadRequest)` - No role with that name
    pub async fn update_role(&self, id: i32, role_name: &str) -> Result<User, AppError> {
        let user = self.get_by_id(id).await?;

        let role = Repository::<entity::role::Entity, DatabaseConnection>::new(self.db)
            .find_one(Condition::all().add(entity::role::Column::Name.eq(role_name.trim())))
            .await?
            .ok_or_else(|| AppError::bad_request("Role not found"))?;

        Repository::<entity::user::Entity, DatabaseConnection>::new(self.db)
            .update(entity::user::ActiveModel {
                id: ActiveValue::Unchanged(user.id),
                role_id: ActiveValue::Set(role.id),
                ..Default::default()
            })
            .await?;

        tracing::info!("User {} role changed from {} to {}", id, user.role, role.name);

        self.get_by_id(id).await
    }

    /// Soft deletes a user account. Admin accounts cannot be deleted.
    ///
    /// # Returns
    /// - `Ok(())` - Account deleted
    /// - `Err(AppError::NotFound)` - No such user
    /// - `Err(AppError::BadRequest)` - Target is an admin
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let user = self.get_by_id(id).await?;
        if user.is_admin() {
            return Err(AppError::bad_request("Cannot delete admin user"));
        }

        Repository::<entity::user::Entity, DatabaseConnection>::new(self.db)
            .soft_delete(id)
            .await?;

        tracing::info!("User {} ({}) deleted", id, user.email);

        Ok(())
    }

    pub async fn update_profile(
        &self,
        user_id: i32,
        params: UpdateProfileParams,
    ) -> Result<User, AppError> {
        if params.full_name.is_empty() {
            return Err(AppError::bad_request("Full name is required"));
        }

        self.get_by_id(user_id).await?;

        Repository::<entity::user::Entity, DatabaseConnection>::new(self.db)
            .update(entity::user::ActiveModel {
                id: ActiveValue::Unchanged(user_id),
                full_name: ActiveValue::Set(params.full_name),
                phone_number: ActiveValue::Set(params.phone_number),
                address: ActiveValue::Set(params.address),
                ..Default::default()
            })
            .await?;

        self.get_by_id(user_id).await
    }

    /// Makes sure the configured administrator account exists with the given password.
    ///
    /// An existing account with that email is promoted to `Admin` and its password is
    /// reset; otherwise a new confirmed account with an empty cart is created.
    ///
    /// # Returns
    /// - `Ok(User)` - The administrator account
    /// - `Err(AppError::InternalError)` - The `Admin` role has not been seeded
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);
        let password_hash = hash_password(password)?;

        let role = Repository::<entity::role::Entity, DatabaseConnection>::new(self.db)
            .find_one(Condition::all().add(entity::role::Column::Name.eq(ADMIN_ROLE)))
            .await?
            .ok_or_else(|| AppError::InternalError("Admin role has not been seeded".to_string()))?;

        let users = Repository::<entity::user::Entity, DatabaseConnection>::new(self.db);
        let id = match UserRepository::new(self.db).get_by_email(&email).await? {
            Some(existing) => {
                users
                    .update(entity::user::ActiveModel {
                        id: ActiveValue::Unchanged(existing.id),
                        password_hash: ActiveValue::Set(password_hash),
                        role_id: ActiveValue::Set(role.id),
                        ..Default::default()
                    })
                    .await?;
                tracing::info!("Admin account {} updated", email);

                existing.id
            }
            None => {
                let created = users
                    .add(entity::user::ActiveModel {
                        email: ActiveValue::Set(email.clone()),
                        password_hash: ActiveValue::Set(password_hash),
                        full_name: ActiveValue::Set(ADMIN_FULL_NAME.to_string()),
                        phone_number: ActiveValue::Set(None),
                        avatar_url: ActiveValue::Set(None),
                        address: ActiveValue::Set(None),
                        reset_password_token: ActiveValue::Set(None),
                        reset_password_expiry: ActiveValue::Set(None),
                        email_confirmed: ActiveValue::Set(true),
                        role_id: ActiveValue::Set(role.id),
                        updated_at: ActiveValue::Set(None),
                        ..Default::default()
                    })
                    .await?;
                Repository::<entity::cart::Entity, DatabaseConnection>::new(self.db)
                    .add(entity::cart::ActiveModel {
                        user_id: ActiveValue::Set(created.id),
                        updated_at: ActiveValue::Set(None),
                        ..Default::default()
                    })
                    .await?;
                tracing::info!("Admin account {} created", email);

                created.id
            }
        };

        self.get_by_id(id).await
    }
}

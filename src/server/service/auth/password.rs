use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};

use crate::server::{
    data::{repository::Repository, user::UserRepository},
    error::AppError,
    model::user::normalize_email,
    service::{
        auth::{AuthService, MIN_PASSWORD_LENGTH},
        email,
        password::{hash_password, verify_password},
    },
};

/// Reset links stay valid for one hour.
const RESET_TOKEN_LIFETIME_HOURS: i64 = 1;
const RESET_TOKEN_LENGTH: usize = 32;

impl<'a> AuthService<'a> {
    /// Changes a user's password after verifying the old one.
    ///
    /// # Returns
    /// - `Ok(())` - Password updated, notification email attempted
    /// - `Err(AppError::NotFound)` - User missing
    /// - `Err(AppError::BadRequest)` - Old password wrong or new password unchanged
    pub async fn change_password(
        &self,
        user_id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let users = Repository::<entity::user::Entity, DatabaseConnection>::new(self.db);
        let user = users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !verify_password(old_password, &user.password_hash) {
            return Err(AppError::bad_request("Old password is incorrect"));
        }
        if verify_password(new_password, &user.password_hash) {
            return Err(AppError::bad_request(
                "New password must be different from old password",
            ));
        }
        validate_new_password(new_password)?;

        let (email_to, full_name) = (user.email.clone(), user.full_name.clone());
        let mut active = user.into_active_model();
        active.password_hash = ActiveValue::Set(hash_password(new_password)?);
        users.update(active).await?;

        email::log_failure(
            "password changed",
            &email_to,
            self.email.send_password_changed(&email_to, &full_name).await,
        );

        Ok(())
    }

    /// Starts a password reset.
    ///
    /// Unknown emails succeed silently so the endpoint does not reveal which accounts
    /// exist.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);
        let Some(user) = UserRepository::new(self.db).get_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_reset_token();
        let users = Repository::<entity::user::Entity, DatabaseConnection>::new(self.db);
        users
            .update(entity::user::ActiveModel {
                id: ActiveValue::Unchanged(user.id),
                reset_password_token: ActiveValue::Set(Some(token.clone())),
                reset_password_expiry: ActiveValue::Set(Some(
                    Utc::now() + Duration::hours(RESET_TOKEN_LIFETIME_HOURS),
                )),
                ..Default::default()
            })
            .await?;

        email::log_failure(
            "password reset",
            &user.email,
            self.email.send_password_reset(&user.email, &token).await,
        );

        Ok(())
    }

    /// Sets a new password using a reset token, then clears the token.
    ///
    /// # Returns
    /// - `Ok(())` - Password replaced
    /// - `Err(AppError::BadRequest)` - Token unknown or expired, or password too short
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let user = UserRepository::new(self.db)
            .get_by_reset_token(token, Utc::now())
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid or expired reset token"))?;

        validate_new_password(new_password)?;

        let mut active = user.into_active_model();
        active.password_hash = ActiveValue::Set(hash_password(new_password)?);
        active.reset_password_token = ActiveValue::Set(None);
        active.reset_password_expiry = ActiveValue::Set(None);
        Repository::<entity::user::Entity, DatabaseConnection>::new(self.db)
            .update(active)
            .await?;

        Ok(())
    }
}

fn validate_new_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}

/// Generates a random alphanumeric reset token.
fn generate_reset_token() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                             abcdefghijklmnopqrstuvwxyz\
                             0123456789";

    let mut rng = rand::rng();

    (0..RESET_TOKEN_LENGTH)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

use sea_orm::{ActiveValue, ColumnTrait, Condition};

use crate::server::{
    data::{unit_of_work::UnitOfWork, user::UserRepository},
    error::AppError,
    model::user::{RegisterParams, User, USER_ROLE},
    service::{
        auth::{AuthService, LoginResult, MIN_PASSWORD_LENGTH},
        email,
        password::hash_password,
    },
};

impl<'a> AuthService<'a> {
    /// Creates an account with the `User` role and an empty cart.
    ///
    /// The user and cart are inserted in one transaction. A welcome email is sent
    /// afterwards on a best-effort basis.
    ///
    /// # Returns
    /// - `Ok(LoginResult)` - New user with a token
    /// - `Err(AppError::BadRequest)` - Invalid input, duplicate email or missing `User` role
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn register(&self, params: RegisterParams) -> Result<LoginResult, AppError> {
        validate_registration(&params)?;

        if UserRepository::new(self.db).email_exists(&params.email).await? {
            return Err(AppError::bad_request("Email already exists"));
        }

        let password_hash = hash_password(&params.password)?;

        let uow = UnitOfWork::begin(self.db).await?;
        let role = uow
            .roles()
            .find_one(Condition::all().add(entity::role::Column::Name.eq(USER_ROLE)))
            .await?
            .ok_or_else(|| AppError::bad_request("User role not found"))?;

        let user = uow
            .users()
            .add(entity::user::ActiveModel {
                email: ActiveValue::Set(params.email),
                password_hash: ActiveValue::Set(password_hash),
                full_name: ActiveValue::Set(params.full_name),
                phone_number: ActiveValue::Set(params.phone_number),
                avatar_url: ActiveValue::Set(None),
                address: ActiveValue::Set(None),
                reset_password_token: ActiveValue::Set(None),
                reset_password_expiry: ActiveValue::Set(None),
                email_confirmed: ActiveValue::Set(false),
                role_id: ActiveValue::Set(role.id),
                updated_at: ActiveValue::Set(None),
                ..Default::default()
            })
            .await?;

        uow.carts()
            .add(entity::cart::ActiveModel {
                user_id: ActiveValue::Set(user.id),
                updated_at: ActiveValue::Set(None),
                ..Default::default()
            })
            .await?;
        uow.commit().await?;

        tracing::info!("Registered user {} ({})", user.id, user.email);

        let user = User::from_entity(user, Some(role));
        email::log_failure(
            "welcome",
            &user.email,
            self.email.send_welcome(&user.email, &user.full_name).await,
        );

        let token = self.tokens.issue(&user)?;

        Ok(LoginResult { token, user })
    }
}

fn validate_registration(params: &RegisterParams) -> Result<(), AppError> {
    if params.email.is_empty() || !params.email.contains('@') {
        return Err(AppError::bad_request("A valid email is required"));
    }
    if params.full_name.is_empty() {
        return Err(AppError::bad_request("Full name is required"));
    }
    if params.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}

use crate::server::{
    data::user::UserRepository,
    error::AppError,
    model::user::{normalize_email, User},
    service::{
        auth::{AuthService, LoginResult},
        password::verify_password,
    },
};

impl<'a> AuthService<'a> {
    /// Verifies credentials and issues a token.
    ///
    /// # Returns
    /// - `Ok(LoginResult)` - Credentials valid
    /// - `Err(AppError::BadRequest)` - Unknown email or wrong password
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError> {
        let user = UserRepository::new(self.db)
            .get_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::bad_request("Login credentials not found"))?;

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::bad_request("Password is incorrect"));
        }

        let token = self.tokens.issue(&user)?;

        Ok(LoginResult { token, user })
    }

    /// Gets a live user with role.
    pub async fn get_user(&self, user_id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .get_with_role(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};

use crate::server::{
    data::repository::Repository,
    error::AppError,
    service::{
        auth::AuthService,
        storage::{validate_image, AVATAR_FOLDER},
    },
};

impl<'a> AuthService<'a> {
    /// Replaces a user's avatar image.
    ///
    /// The previous avatar file is deleted before the new one is stored.
    ///
    /// # Returns
    /// - `Ok(String)` - Public URL of the new avatar
    /// - `Err(AppError::BadRequest)` - File is not an acceptable image
    /// - `Err(AppError::NotFound)` - User missing
    pub async fn update_avatar(
        &self,
        user_id: i32,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        validate_image(file_name, bytes.len())?;

        let users = Repository::<entity::user::Entity, DatabaseConnection>::new(self.db);
        let user = users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if let Some(previous) = user.avatar_url.as_deref().filter(|url| !url.is_empty()) {
            if let Err(e) = self.storage.delete(previous).await {
                tracing::warn!("Failed to delete previous avatar {}: {}", previous, e);
            }
        }

        let avatar_url = self.storage.save(AVATAR_FOLDER, file_name, bytes).await?;

        let mut active = user.into_active_model();
        active.avatar_url = ActiveValue::Set(Some(avatar_url.clone()));
        users.update(active).await?;

        Ok(avatar_url)
    }
}

//! Local file storage for uploaded images.
//!
//! Files are written below the upload root in per-purpose folders (`uploads`,
//! `avatars`) that the router serves statically, so the public URL of a file is
//! `{public_url}/{folder}/{file}`.

use std::path::{Component, Path, PathBuf};

use crate::server::error::AppError;

/// Folder for product and category images.
pub const PRODUCT_FOLDER: &str = "uploads";
/// Folder for user avatars.
pub const AVATAR_FOLDER: &str = "avatars";

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Clone)]
pub struct FileStorage {
    root: PathBuf,
    public_url: String,
}

impl FileStorage {
    /// # Arguments
    /// - `root` - Directory uploads are written under
    /// - `public_url` - Base URL the root is served from, without trailing slash
    pub fn new(root: PathBuf, public_url: impl Into<String>) -> Self {
        Self {
            root,
            public_url: public_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores `bytes` under `folder` with a fresh unique name.
    ///
    /// The original file name only contributes its extension. The folder is created on
    /// demand.
    ///
    /// # Returns
    /// - `Ok(String)` - Public URL of the stored file
    /// - `Err(AppError::IoErr)` - Folder or file could not be written
    pub async fn save(
        &self,
        folder: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        let file_name = format!("{}{}", uuid::Uuid::new_v4(), extension_of(original_name));
        let dir = self.root.join(folder);

        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        tracing::debug!("Stored upload {}/{}", folder, file_name);

        Ok(format!("{}/{}/{}", self.public_url, folder, file_name))
    }

    /// Deletes the file behind a URL previously returned by [`save`](Self::save).
    ///
    /// URLs that point outside the upload root are ignored.
    ///
    /// # Returns
    /// - `Ok(true)` - File existed and was removed
    /// - `Ok(false)` - Nothing to delete
    /// - `Err(AppError::IoErr)` - Removal failed for another reason
    pub async fn delete(&self, url: &str) -> Result<bool, AppError> {
        let Some(path) = self.resolve(url) else {
            return Ok(false);
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Maps a public URL or absolute path back to a file below the root.
    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let path = match url::Url::parse(url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => url.to_string(),
        };

        let relative = Path::new(path.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !safe || relative.as_os_str().is_empty() {
            return None;
        }

        Some(self.root.join(relative))
    }
}

/// Lowercased extension including the dot, or an empty string.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// Validates an uploaded image by extension and size.
///
/// # Returns
/// - `Ok(())` - Acceptable upload
/// - `Err(AppError::BadRequest)` - Empty file, disallowed type or larger than 5 MB
pub fn validate_image(file_name: &str, len: usize) -> Result<(), AppError> {
    if len == 0 {
        return Err(AppError::bad_request("No file uploaded"));
    }
    if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension_of(file_name).as_str()) {
        return Err(AppError::bad_request(
            "Invalid file type. Only images are allowed",
        ));
    }
    if len > MAX_IMAGE_BYTES {
        return Err(AppError::bad_request("File size must not exceed 5MB"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &tempfile::TempDir) -> FileStorage {
        FileStorage::new(dir.path().to_path_buf(), "http://localhost:8080")
    }

    #[tokio::test]
    async fn save_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let url = storage
            .save(PRODUCT_FOLDER, "Photo.PNG", b"image-bytes")
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:8080/uploads/"));
        assert!(url.ends_with(".png"));
        let file_name = url.rsplit('/').next().unwrap();
        let written = std::fs::read(dir.path().join("uploads").join(file_name)).unwrap();
        assert_eq!(written, b"image-bytes");
    }

    #[tokio::test]
    async fn delete_removes_saved_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let url = storage.save(AVATAR_FOLDER, "me.jpg", b"x").await.unwrap();

        assert!(storage.delete(&url).await.unwrap());
        assert!(!storage.delete(&url).await.unwrap());
    }

    #[tokio::test]
    async fn delete_ignores_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        assert!(!storage.delete("/../etc/passwd").await.unwrap());
        assert!(!storage.delete("").await.unwrap());
    }

    #[test]
    fn validate_image_rules() {
        assert!(validate_image("a.webp", 10).is_ok());
        assert!(validate_image("a.JPEG", MAX_IMAGE_BYTES).is_ok());
        assert!(validate_image("a.png", 0).is_err());
        assert!(validate_image("a.exe", 10).is_err());
        assert!(validate_image("noext", 10).is_err());
        assert!(validate_image("a.png", MAX_IMAGE_BYTES + 1).is_err());
    }
}

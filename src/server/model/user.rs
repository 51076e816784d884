//! User domain models and parameters.

use chrono::{DateTime, Utc};

use crate::model::{
    auth::RegisterDto,
    user::{UpdateProfileDto, UserDto},
};

/// Name of the role granting administrative access.
pub const ADMIN_ROLE: &str = "Admin";
/// Role assigned to newly registered accounts.
pub const USER_ROLE: &str = "User";

/// User account joined with its role name.
///
/// Carries the password hash for authentication; `into_dto()` never exposes it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
    pub address: Option<String>,
    pub role_id: i32,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Converts entity models to a domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `user` - User entity
    /// - `role` - Related role entity, if it could be loaded
    pub fn from_entity(user: entity::user::Model, role: Option<entity::role::Model>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            phone_number: user.phone_number,
            avatar_url: user.avatar_url,
            address: user.address,
            role_id: user.role_id,
            role: role.map(|r| r.name).unwrap_or_default(),
            created_at: user.created_at,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            phone_number: self.phone_number,
            avatar_url: self.avatar_url,
            address: self.address,
            role: self.role,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterParams {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone_number: Option<String>,
}

impl RegisterParams {
    /// Normalizes the email to lowercase and trims surrounding whitespace.
    pub fn from_dto(dto: RegisterDto) -> Self {
        Self {
            email: normalize_email(&dto.email),
            password: dto.password,
            full_name: dto.full_name.trim().to_string(),
            phone_number: dto.phone_number.filter(|p| !p.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateProfileParams {
    pub full_name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl UpdateProfileParams {
    pub fn from_dto(dto: UpdateProfileDto) -> Self {
        Self {
            full_name: dto.full_name.trim().to_string(),
            phone_number: dto.phone_number,
            address: dto.address,
        }
    }
}

/// Emails are compared case-insensitively by storing them lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

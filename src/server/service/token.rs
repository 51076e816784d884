//! JWT issuing and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::server::{
    config::JwtConfig,
    error::{auth::AuthError, AppError},
    model::user::User,
};

/// Tokens stay valid for seven days.
const TOKEN_LIFETIME_DAYS: i64 = 7;

/// Claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a string.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Parses the subject back into a user id.
    pub fn user_id(&self) -> Result<i32, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidToken(format!("non-numeric subject {}", self.sub)))
    }
}

/// HS256 token service shared through application state.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Issues a signed token for `user`.
    ///
    /// # Returns
    /// - `Ok(String)` - Encoded JWT
    /// - `Err(AppError::JwtErr)` - Encoding failed
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.full_name.clone(),
            role: user.role.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Validates signature, issuer, audience and expiry with zero leeway.
    ///
    /// # Returns
    /// - `Ok(Claims)` - Token is valid
    /// - `Err(AuthError::InvalidToken)` - Any validation failure
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config(secret: &str, issuer: &str) -> JwtConfig {
        JwtConfig {
            secret: SecretString::from(secret.to_string()),
            issuer: issuer.to_string(),
            audience: "ECommerceClient".to_string(),
        }
    }

    fn user() -> User {
        User {
            id: 42,
            email: "jane@example.com".to_string(),
            password_hash: String::new(),
            full_name: "Jane Doe".to_string(),
            phone_number: None,
            avatar_url: None,
            address: None,
            role_id: 2,
            role: "User".to_string(),
            created_at: Utc::now(),
        }
    }

    const SECRET: &str = "a-test-secret-that-is-long-enough-0123";

    #[test]
    fn issued_token_round_trips_claims() {
        let service = TokenService::new(&config(SECRET, "ECommerceAPI"));

        let token = service.issue(&user()).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.name, "Jane Doe");
        assert_eq!(claims.role, "User");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let issuer = TokenService::new(&config("another-secret-that-is-long-enough-xyz", "ECommerceAPI"));
        let validator = TokenService::new(&config(SECRET, "ECommerceAPI"));

        let token = issuer.issue(&user()).unwrap();

        assert!(matches!(
            validator.validate(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_token_from_other_issuer() {
        let issuer = TokenService::new(&config(SECRET, "SomeoneElse"));
        let validator = TokenService::new(&config(SECRET, "ECommerceAPI"));

        let token = issuer.issue(&user()).unwrap();

        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let service = TokenService::new(&config(SECRET, "ECommerceAPI"));
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "42".to_string(),
            email: String::new(),
            name: String::new(),
            role: "User".to_string(),
            iss: "ECommerceAPI".to_string(),
            aud: "ECommerceClient".to_string(),
            iat: now - 120,
            exp: now - 1,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let service = TokenService::new(&config(SECRET, "ECommerceAPI"));

        assert!(service.validate("not.a.jwt").is_err());
    }
}

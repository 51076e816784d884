use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_JWT_ISSUER: &str = "ECommerceAPI";
const DEFAULT_JWT_AUDIENCE: &str = "ECommerceClient";
const DEFAULT_UPLOAD_DIR: &str = "wwwroot";
const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_PAYPAL_BASE_URL: &str = "https://api-m.sandbox.paypal.com";
const DEFAULT_PAYPAL_EXCHANGE_RATE: &str = "25000";

/// HS256 keys shorter than this are rejected.
const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Application configuration loaded from environment variables.
///
/// Optional integrations (SMTP, Stripe, PayPal, the seeded admin account) are `None`
/// when their credentials are absent; the matching features then degrade instead of
/// preventing startup.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: SocketAddr,

    /// Base URL under which this server is reachable, used to build upload URLs.
    pub public_url: String,
    /// Base URL of the single-page client, used in emails and payment redirects.
    pub frontend_url: String,

    pub upload_dir: PathBuf,
    pub static_dir: Option<PathBuf>,

    /// Key rate limits on `X-Forwarded-For`/`X-Real-IP`. Only enable behind a reverse
    /// proxy that overwrites these headers.
    pub trust_proxy_headers: bool,

    pub jwt: JwtConfig,
    pub admin: Option<AdminConfig>,
    pub smtp: Option<SmtpConfig>,
    pub stripe: Option<StripeConfig>,
    pub paypal: Option<PayPalConfig>,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub issuer: String,
    pub audience: String,
}

/// Account ensured at startup with the `Admin` role.
#[derive(Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: SecretString,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub from_address: String,
    pub from_name: String,
}

#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: SecretString,
    pub webhook_secret: Option<SecretString>,
    pub api_base: String,
}

#[derive(Clone)]
pub struct PayPalConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub base_url: String,
    /// Store currency units per US dollar.
    pub exchange_rate: Decimal,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let bind_address = parse_env("BIND_ADDRESS", DEFAULT_BIND_ADDRESS)?;
        let public_url = env_or_default("PUBLIC_URL", &format!("http://{}", bind_address));
        let frontend_url = env_or_default("FRONTEND_URL", "http://localhost:5173");

        Ok(Self {
            database_url: required_env("DATABASE_URL")?,
            bind_address,
            public_url: public_url.trim_end_matches('/').to_string(),
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
            upload_dir: PathBuf::from(env_or_default("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            static_dir: optional_env("STATIC_DIR").map(PathBuf::from),
            trust_proxy_headers: parse_env("TRUST_PROXY_HEADERS", "false")?,
            jwt: JwtConfig::from_env()?,
            admin: AdminConfig::from_env(),
            smtp: SmtpConfig::from_env()?,
            stripe: StripeConfig::from_env(),
            paypal: PayPalConfig::from_env()?,
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = SecretString::from(required_env("JWT_SECRET")?);
        if secret.expose_secret().len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::InvalidEnvVar(
                "JWT_SECRET".to_string(),
                format!("must be at least {} characters", MIN_JWT_SECRET_LENGTH),
            ));
        }

        Ok(Self {
            secret,
            issuer: env_or_default("JWT_ISSUER", DEFAULT_JWT_ISSUER),
            audience: env_or_default("JWT_AUDIENCE", DEFAULT_JWT_AUDIENCE),
        })
    }
}

impl AdminConfig {
    fn from_env() -> Option<Self> {
        Some(Self {
            email: optional_env("ADMIN_EMAIL")?,
            password: SecretString::from(optional_env("ADMIN_PASSWORD")?),
        })
    }
}

impl SmtpConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(host) = optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        Ok(Some(Self {
            host,
            port: parse_env("SMTP_PORT", "587")?,
            username: optional_env("SMTP_USERNAME"),
            password: optional_env("SMTP_PASSWORD").map(SecretString::from),
            from_address: required_env("SMTP_FROM_ADDRESS")?,
            from_name: env_or_default("SMTP_FROM_NAME", "Storefront"),
        }))
    }
}

impl StripeConfig {
    fn from_env() -> Option<Self> {
        Some(Self {
            secret_key: SecretString::from(optional_env("STRIPE_SECRET_KEY")?),
            webhook_secret: optional_env("STRIPE_WEBHOOK_SECRET").map(SecretString::from),
            api_base: env_or_default("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE),
        })
    }
}

impl PayPalConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let (Some(client_id), Some(client_secret)) = (
            optional_env("PAYPAL_CLIENT_ID"),
            optional_env("PAYPAL_CLIENT_SECRET"),
        ) else {
            return Ok(None);
        };

        let exchange_rate: Decimal =
            parse_env("PAYPAL_EXCHANGE_RATE", DEFAULT_PAYPAL_EXCHANGE_RATE)?;
        if exchange_rate <= Decimal::ZERO {
            return Err(ConfigError::InvalidEnvVar(
                "PAYPAL_EXCHANGE_RATE".to_string(),
                "must be positive".to_string(),
            ));
        }

        Ok(Some(Self {
            client_id,
            client_secret: SecretString::from(client_secret),
            base_url: env_or_default("PAYPAL_BASE_URL", DEFAULT_PAYPAL_BASE_URL),
            exchange_rate,
        }))
    }
}

fn required_env(key: &str) -> Result<String, ConfigError> {
    optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Reads a variable, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_or_default(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_or_default(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
impl Config {
    /// Configuration for tests: no SMTP, Stripe, PayPal or admin seeding.
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_address: SocketAddr::from(([127, 0, 0, 1], 0)),
            public_url: "http://localhost:8080".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            upload_dir,
            static_dir: None,
            trust_proxy_headers: false,
            jwt: JwtConfig {
                secret: SecretString::from("test-secret-key-that-is-long-enough-for-hs256".to_string()),
                issuer: DEFAULT_JWT_ISSUER.to_string(),
                audience: DEFAULT_JWT_AUDIENCE.to_string(),
            },
            admin: None,
            smtp: None,
            stripe: None,
            paypal: None,
        }
    }
}

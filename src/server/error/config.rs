use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// See `.env.example` for the list of variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but could not be parsed.
    ///
    /// # Fields
    /// - Variable name
    /// - Parse failure description
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

use std::{sync::Arc, time::Duration};

use secrecy::ExposeSecret;

use crate::server::{
    config::Config,
    error::AppError,
    service::{
        email::{noop::NoopMailer, smtp::SmtpMailer, Mailer},
        user::UserService,
    },
};

/// Timeout applied to every payment provider request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Connects to the database and runs pending migrations.
///
/// Establishes a connection pool using the connection string from configuration, then
/// runs all pending SeaORM migrations so the schema and seed data are up to date. This
/// function must complete successfully before the application can access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the HTTP client shared by the Stripe and PayPal integrations.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?)
}

/// Picks the SMTP mailer when SMTP is configured, otherwise a mailer that only logs.
pub fn build_mailer(config: &Config) -> Result<Arc<dyn Mailer>, AppError> {
    match &config.smtp {
        Some(smtp) => {
            tracing::info!("Sending email through {}:{}", smtp.host, smtp.port);
            Ok(Arc::new(SmtpMailer::new(smtp)?))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, outgoing email will only be logged");
            Ok(Arc::new(NoopMailer))
        }
    }
}

/// Ensures the configured administrator account exists.
///
/// Does nothing when `ADMIN_EMAIL`/`ADMIN_PASSWORD` are not set.
pub async fn ensure_admin(db: &sea_orm::DatabaseConnection, config: &Config) -> Result<(), AppError> {
    let Some(admin) = &config.admin else {
        tracing::info!("ADMIN_EMAIL not set, skipping admin account setup");
        return Ok(());
    };

    UserService::new(db)
        .ensure_admin(&admin.email, admin.password.expose_secret())
        .await?;

    Ok(())
}

//! User bootstrap commands.
//!
//! The admin API only lets admins create users, so the first admin is
//! created here.
//!
//! # Usage
//!
//! ```bash
//! OPTIMILE_BOOTSTRAP_PASSWORD='...' \
//!     optimile-cli user create -e admin@example.com -n "Admin Name" -r admin
//! ```
//!
//! # Environment Variables
//!
//! - `OPTIMILE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `OPTIMILE_BOOTSTRAP_PASSWORD` - Password for the new user

use optimile_admin::config::{ConfigError, get_database_url};
use optimile_admin::db::{self, PgDocumentStore};
use optimile_admin::services::{Argon2Hasher, NewUser, UserError, UserService};
use optimile_core::UserId;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const PASSWORD_ENV: &str = "OPTIMILE_BOOTSTRAP_PASSWORD";

/// Errors that can occur during user commands.
#[derive(Debug, Error)]
pub enum UserCommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation or store error from the user service.
    #[error(transparent)]
    User(#[from] UserError),
}

/// Create a user in the document store.
///
/// # Arguments
///
/// * `email` - User's email address
/// * `name` - User's display name
/// * `role` - `admin` or `driver`
/// * `phone` - Optional phone number
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns an error if the password variable is missing, the input fails
/// validation, the email is taken, or the database is unreachable.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    phone: Option<String>,
) -> Result<UserId, UserCommandError> {
    dotenvy::dotenv().ok();

    let password = std::env::var(PASSWORD_ENV)
        .map(SecretString::from)
        .map_err(|_| UserCommandError::MissingEnvVar(PASSWORD_ENV))?;
    let database_url = get_database_url("OPTIMILE_DATABASE_URL")?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;
    let store = PgDocumentStore::new(pool);

    tracing::info!("Creating user: {} ({})", email, role);
    let id = UserService::new(&store, &Argon2Hasher)
        .create(NewUser {
            name: Some(name.to_owned()),
            email: Some(email.to_owned()),
            phone,
            role: Some(role.to_owned()),
            password: Some(password.expose_secret().to_owned()),
        })
        .await?;

    Ok(id)
}

//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::config::{AdminConfig, StoreBackend};
use crate::db::{self, DocumentStore, MemoryDocumentStore, PgDocumentStore};
use crate::services::{
    Argon2Hasher, AuthError, IdentityToolkitVerifier, PasswordHasher, StaticTokenVerifier,
    TokenVerifier, UserService,
};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("identity configuration error: {0}")]
    Identity(#[from] AuthError),
    #[error("OPTIMILE_DATABASE_URL is required for the postgres store")]
    MissingDatabaseUrl,
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and holds the collaborators
/// behind trait objects so tests can substitute in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn DocumentStore>,
    verifier: Arc<dyn TokenVerifier>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AppState {
    /// Create application state from explicit collaborators.
    #[must_use]
    pub fn new(
        config: AdminConfig,
        store: Arc<dyn DocumentStore>,
        verifier: Arc<dyn TokenVerifier>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                verifier,
                hasher,
            }),
        }
    }

    /// Build the store and verifier the configuration selects.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable or the identity
    /// configuration is invalid.
    pub async fn from_config(config: AdminConfig) -> Result<Self, StateError> {
        let store: Arc<dyn DocumentStore> = match config.store {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_ref()
                    .ok_or(StateError::MissingDatabaseUrl)?;
                let pool = db::create_pool(url).await?;
                tracing::info!("Database pool created");
                Arc::new(PgDocumentStore::new(pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory document store; data is lost on exit");
                Arc::new(MemoryDocumentStore::new())
            }
        };

        let verifier = build_verifier(&config)?;

        Ok(Self::new(config, store, verifier, Arc::new(Argon2Hasher)))
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the token verifier.
    #[must_use]
    pub fn verifier(&self) -> &dyn TokenVerifier {
        self.inner.verifier.as_ref()
    }

    /// Get a reference to the password hasher.
    #[must_use]
    pub fn hasher(&self) -> &dyn PasswordHasher {
        self.inner.hasher.as_ref()
    }

    /// User service over this state's store and hasher.
    #[must_use]
    pub fn users(&self) -> UserService<'_> {
        UserService::new(self.store(), self.hasher())
    }
}

/// Pick the token verifier: static tokens when configured, else the identity toolkit.
fn build_verifier(config: &AdminConfig) -> Result<Arc<dyn TokenVerifier>, AuthError> {
    let identity = &config.identity;

    if let Some(table) = &identity.static_tokens {
        tracing::warn!("Using static bearer tokens; do not enable in production");
        return Ok(Arc::new(StaticTokenVerifier::parse(table.expose_secret())?));
    }

    let api_key = identity
        .api_key
        .as_ref()
        .ok_or(AuthError::NotConfigured)?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    Ok(Arc::new(IdentityToolkitVerifier::new(
        client,
        &identity.base_url,
        api_key,
    )))
}

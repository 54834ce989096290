//! User and driver writes.
//!
//! The store enforces no uniqueness, so every write that sets an email first
//! checks that no other user holds it. Emails are trimmed and lower-cased
//! before they are stored.

use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use optimile_core::records::USERS_COLLECTION;
use optimile_core::{Email, Role, User, UserId};

use super::auth::{AuthError, PasswordHasher, VerifiedIdentity};
use crate::db::{DocumentStore, StoreError, into_records};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Errors that can occur during user writes.
#[derive(Debug, Error)]
pub enum UserError {
    /// Input failed validation. The message is shown to the caller.
    #[error("{0}")]
    Invalid(String),

    /// Another user already holds the email.
    #[error("Email already exists")]
    EmailTaken,

    /// The user to update does not exist.
    #[error("User not found")]
    NotFound,

    /// Store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing error.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Input for creating a user.
#[derive(Debug, Default, Deserialize)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

/// Input for updating a user profile.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Left unchanged when absent.
    pub role: Option<String>,
    /// Left unchanged when absent or blank.
    pub password: Option<String>,
}

/// Input for updating a driver profile.
#[derive(Debug, Default, Deserialize)]
pub struct DriverUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// User operations over the document store.
pub struct UserService<'a> {
    store: &'a dyn DocumentStore,
    hasher: &'a dyn PasswordHasher,
}

impl<'a> UserService<'a> {
    /// Create a new user service.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, hasher: &'a dyn PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// All users in store order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store fails or a document is malformed.
    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        into_records(self.store.list(USERS_COLLECTION).await?)
    }

    /// Find the stored profile for a verified identity.
    ///
    /// Looks up the document whose id is the identity's uid, then falls back
    /// to the first user whose email equals the identity's normalized email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store fails or the document is malformed.
    pub async fn find_profile(
        &self,
        identity: &VerifiedIdentity,
    ) -> Result<Option<User>, StoreError> {
        if let Some(doc) = self.store.get(USERS_COLLECTION, &identity.uid).await? {
            return doc.into_record().map(Some);
        }

        let Some(email) = identity.email.as_deref().and_then(optimile_core::normalize_email)
        else {
            return Ok(None);
        };

        let mut docs = self
            .store
            .find_by_field(USERS_COLLECTION, "email", &email, 1)
            .await?;
        docs.pop().map(|doc| doc.into_record()).transpose()
    }

    /// Create a user and return its id.
    ///
    /// # Errors
    ///
    /// - `UserError::Invalid` if a required field is missing or malformed
    /// - `UserError::EmailTaken` if the email belongs to another user
    #[tracing::instrument(skip(self, input), fields(role = ?input.role))]
    pub async fn create(&self, input: NewUser) -> Result<UserId, UserError> {
        let (Some(name), Some(email), Some(role), Some(password)) = (
            present(input.name.as_deref()),
            present(input.email.as_deref()),
            present(input.role.as_deref()),
            input.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(UserError::Invalid(
                "name, email, role, password are required".to_owned(),
            ));
        };

        check_password_length(password)?;
        let email = parse_email(email)?;
        let role = parse_role(role)?;
        self.ensure_email_available(&email, None).await?;

        let mut data = profile_fields(name, &email, input.phone.as_deref());
        data.insert("role".to_owned(), Value::from(role.as_str()));
        data.insert(
            "password_hash".to_owned(),
            Value::from(self.hasher.hash(password)?),
        );
        data.insert("created_at".to_owned(), Value::from(now()));

        let id = self.store.add(USERS_COLLECTION, data).await?;
        tracing::info!(user_id = %id, role = %role, "User created");
        Ok(UserId::new(id))
    }

    /// Update a user profile.
    ///
    /// # Errors
    ///
    /// - `UserError::Invalid` if name or email is missing, or a field is malformed
    /// - `UserError::EmailTaken` if the email belongs to another user
    /// - `UserError::NotFound` if the user does not exist
    #[tracing::instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: UserUpdate) -> Result<(), UserError> {
        let (Some(name), Some(email)) = (
            present(input.name.as_deref()),
            present(input.email.as_deref()),
        ) else {
            return Err(UserError::Invalid("name and email are required".to_owned()));
        };

        let email = parse_email(email)?;
        let role = present(input.role.as_deref()).map(parse_role).transpose()?;
        // Blank means unchanged; otherwise the password is used as typed.
        let password = input
            .password
            .as_deref()
            .filter(|p| !p.trim().is_empty());
        if let Some(password) = password {
            check_password_length(password)?;
        }
        self.ensure_email_available(&email, Some(id)).await?;

        let mut data = profile_fields(name, &email, input.phone.as_deref());
        if let Some(role) = role {
            data.insert("role".to_owned(), Value::from(role.as_str()));
        }
        if let Some(password) = password {
            data.insert(
                "password_hash".to_owned(),
                Value::from(self.hasher.hash(password)?),
            );
        }
        data.insert("updated_at".to_owned(), Value::from(now()));

        self.write_update(id, data).await?;
        tracing::info!(user_id = %id, "User updated");
        Ok(())
    }

    /// Update a driver profile. The user's role becomes `driver`.
    ///
    /// # Errors
    ///
    /// - `UserError::Invalid` if name or email is missing or malformed
    /// - `UserError::EmailTaken` if the email belongs to another user
    /// - `UserError::NotFound` if the user does not exist
    #[tracing::instrument(skip(self, input))]
    pub async fn update_driver(&self, id: &str, input: DriverUpdate) -> Result<(), UserError> {
        let (Some(name), Some(email)) = (
            present(input.name.as_deref()),
            present(input.email.as_deref()),
        ) else {
            return Err(UserError::Invalid("name and email required".to_owned()));
        };

        let email = parse_email(email)?;
        self.ensure_email_available(&email, Some(id)).await?;

        let mut data = profile_fields(name, &email, input.phone.as_deref());
        data.insert("role".to_owned(), Value::from(Role::Driver.as_str()));
        data.insert("updated_at".to_owned(), Value::from(now()));

        self.write_update(id, data).await?;
        tracing::info!(user_id = %id, "Driver updated");
        Ok(())
    }

    /// Delete a user. Deleting a missing user succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(USERS_COLLECTION, id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn ensure_email_available(
        &self,
        email: &Email,
        except_id: Option<&str>,
    ) -> Result<(), UserError> {
        let holders = self
            .store
            .find_by_field(USERS_COLLECTION, "email", email.as_str(), 2)
            .await?;

        if holders.iter().any(|doc| Some(doc.id.as_str()) != except_id) {
            return Err(UserError::EmailTaken);
        }
        Ok(())
    }

    async fn write_update(&self, id: &str, data: Map<String, Value>) -> Result<(), UserError> {
        match self.store.update(USERS_COLLECTION, id, data).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound { .. }) => Err(UserError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

/// Trimmed value, or `None` when missing or blank.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn check_password_length(password: &str) -> Result<(), UserError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserError::Invalid(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

fn parse_email(raw: &str) -> Result<Email, UserError> {
    Email::parse(raw).map_err(|e| UserError::Invalid(format!("Invalid email: {e}")))
}

fn parse_role(raw: &str) -> Result<Role, UserError> {
    raw.parse::<Role>()
        .map_err(|e| UserError::Invalid(e.to_string()))
}

/// Name, email, and phone as stored. A missing phone is stored as empty.
fn profile_fields(name: &str, email: &Email, phone: Option<&str>) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("name".to_owned(), Value::from(name));
    data.insert("email".to_owned(), Value::from(email.as_str()));
    data.insert(
        "phone".to_owned(),
        Value::from(phone.map(str::trim).unwrap_or_default()),
    );
    data
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

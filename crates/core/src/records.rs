//! Typed views over `users` and `deliveries` documents.
//!
//! Documents in the store are schemaless JSON objects written by several
//! clients (this API, the driver app, the intake process). The record types
//! here read the fields the dashboard needs leniently. Users keep every
//! other field in `extra`; deliveries keep the whole stored document so API
//! responses pass it through unchanged.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::types::{DeliveryId, Role, UserId, normalize_email};

/// Collection holding user documents.
pub const USERS_COLLECTION: &str = "users";

/// Collection holding delivery documents.
pub const DELIVERIES_COLLECTION: &str = "deliveries";

/// Build a record from a document id and its JSON body.
///
/// The document id is authoritative: an `id` key inside the body is replaced.
///
/// # Errors
///
/// Returns `serde_json::Error` if the body does not fit the record shape.
pub fn from_document<T: DeserializeOwned>(
    id: &str,
    mut data: Map<String, Value>,
) -> Result<T, serde_json::Error> {
    data.insert("id".to_owned(), Value::String(id.to_owned()));
    serde_json::from_value(Value::Object(data))
}

/// A user document (`users` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned document id.
    pub id: UserId,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Raw stored role. Use [`User::role`] for the parsed value.
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Argon2 PHC string. Never serialized.
    #[serde(default, deserialize_with = "optional_text", skip_serializing)]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
    /// Fields this service does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Parsed role, if the stored value is a known role.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    /// Returns true if this user is a driver.
    #[must_use]
    pub fn is_driver(&self) -> bool {
        self.role() == Some(Role::Driver)
    }

    /// Returns true if this user is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// Normalized email, or `None` when missing or blank.
    #[must_use]
    pub fn normalized_email(&self) -> Option<String> {
        self.email.as_deref().and_then(normalize_email)
    }
}

/// A delivery document (`deliveries` collection).
///
/// The typed fields are read from the stored document. Serialization emits
/// the stored document itself, so responses carry every field as written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Delivery {
    /// Store-assigned document id.
    pub id: DeliveryId,
    /// Id of the assigned driver's user document.
    pub driver_id: Option<UserId>,
    /// Email of the assigned driver; fallback when `driver_id` is missing or stale.
    pub driver_email: Option<String>,
    /// Free-text status, canonically `pending` or `done`.
    pub status: Option<String>,
    /// Completion timestamp in whatever encoding the driver app wrote.
    pub completed_at: Option<Value>,
    document: Map<String, Value>,
}

/// Fields of a delivery document the dashboard interprets.
#[derive(Deserialize)]
struct DeliveryFields {
    id: DeliveryId,
    #[serde(default, deserialize_with = "optional_text")]
    driver_id: Option<UserId>,
    #[serde(default, deserialize_with = "optional_text")]
    driver_email: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    status: Option<String>,
    #[serde(default)]
    completed_at: Option<Value>,
}

impl TryFrom<Map<String, Value>> for Delivery {
    type Error = serde_json::Error;

    fn try_from(document: Map<String, Value>) -> Result<Self, Self::Error> {
        let fields: DeliveryFields = serde_json::from_value(Value::Object(document.clone()))?;
        Ok(Self {
            id: fields.id,
            driver_id: fields.driver_id,
            driver_email: fields.driver_email,
            status: fields.status,
            completed_at: fields.completed_at,
            document,
        })
    }
}

impl Serialize for Delivery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}

impl Delivery {
    /// Returns true if `completed_at` carries a value.
    ///
    /// `null`, `false` and blank strings count as absent.
    #[must_use]
    pub fn has_completion_timestamp(&self) -> bool {
        match &self.completed_at {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// The stored document, including its `id`.
    #[must_use]
    pub const fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// Normalized driver email, or `None` when missing or blank.
    #[must_use]
    pub fn normalized_driver_email(&self) -> Option<String> {
        self.driver_email.as_deref().and_then(normalize_email)
    }
}

/// Read an optional scalar field as text.
///
/// Strings pass through, numbers and booleans are rendered, and `null` or
/// structured values read as missing.
fn optional_text<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(T::from(s)),
        Some(Value::Number(n)) => Some(T::from(n.to_string())),
        Some(Value::Bool(b)) => Some(T::from(b.to_string())),
        _ => None,
    })
}

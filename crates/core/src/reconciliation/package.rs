//! Package status lookup result.

use serde::Serialize;

use crate::records::Delivery;
use crate::types::{DeliveryId, DeliveryStatus, normalize_status};

/// Status term shown to users for a completed delivery.
const DELIVERED_TERM: &str = "delivered";

/// Result of looking up a package by identifier.
///
/// Absence is a normal outcome: `found` is false and `status` is `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageStatus {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DeliveryId>,
    pub status: Option<String>,
}

impl PackageStatus {
    /// Lookup result for a matched delivery.
    #[must_use]
    pub fn found(delivery: &Delivery) -> Self {
        Self {
            found: true,
            id: Some(delivery.id.clone()),
            status: Some(package_status_term(delivery)),
        }
    }

    /// Lookup result when nothing matched.
    #[must_use]
    pub const fn not_found() -> Self {
        Self {
            found: false,
            id: None,
            status: None,
        }
    }
}

/// User-facing status of a delivery.
///
/// The stored status is lower-cased and `done` becomes `delivered`. A
/// delivery without a status is `delivered` if it has a completion timestamp
/// and `pending` otherwise.
#[must_use]
pub fn package_status_term(delivery: &Delivery) -> String {
    let raw = match delivery.status.as_deref().map(normalize_status) {
        Some(status) if !status.is_empty() => status,
        _ if delivery.has_completion_timestamp() => DeliveryStatus::Done.as_str().to_owned(),
        _ => DeliveryStatus::Pending.as_str().to_owned(),
    };

    if raw == DeliveryStatus::Done.as_str() {
        DELIVERED_TERM.to_owned()
    } else {
        raw
    }
}

//! Driver/delivery reconciliation and dashboard statistics.
//!
//! The store holds no foreign-key integrity between deliveries and drivers,
//! so assignment is derived on every request from two alternative links:
//! `delivery.driver_id` and, as a fallback, `delivery.driver_email`.
//! Completion is likewise derived from two alternative signals: a `done`
//! status or a completion timestamp.
//!
//! Every function here is a pure pass over snapshots already in memory.

mod package;
mod roster;
mod stats;

pub use package::{PackageStatus, package_status_term};
pub use roster::{DriverOverview, DriverSummary, PLACEHOLDER, build_driver_roster, summarize_drivers};
pub use stats::{DashboardStats, compute_dashboard_stats};

use crate::records::{Delivery, User};
use crate::types::DeliveryStatus;

/// Returns true if the delivery has been delivered.
///
/// Either signal is sufficient: a status of `done` (ignoring case and
/// surrounding whitespace) or a present `completed_at`.
#[must_use]
pub fn is_delivered(delivery: &Delivery) -> bool {
    DeliveryStatus::Done.matches(delivery.status.as_deref()) || delivery.has_completion_timestamp()
}

/// Returns true if the delivery is assigned to the driver.
///
/// The id link is checked first. The email link only applies when both sides
/// carry a non-blank email; emails are compared after normalization.
#[must_use]
pub fn matches_driver(delivery: &Delivery, driver: &User) -> bool {
    if delivery.driver_id.as_ref() == Some(&driver.id) {
        return true;
    }

    match (delivery.normalized_driver_email(), driver.normalized_email()) {
        (Some(delivery_email), Some(driver_email)) => delivery_email == driver_email,
        _ => false,
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::test_support::{delivery, driver};
    use super::*;

    #[test]
    fn test_is_delivered_by_status() {
        assert!(is_delivered(&delivery("d1", json!({"status": "done"}))));
        assert!(is_delivered(&delivery("d1", json!({"status": "  Done "}))));
        assert!(!is_delivered(&delivery("d1", json!({"status": "pending"}))));
    }

    #[test]
    fn test_is_delivered_by_timestamp() {
        let d = delivery("d1", json!({"status": "pending", "completed_at": "2026-03-01T09:00:00Z"}));
        assert!(is_delivered(&d));
    }

    #[test]
    fn test_is_delivered_defaults_to_false() {
        assert!(!is_delivered(&delivery("d1", json!({}))));
        assert!(!is_delivered(&delivery("d1", json!({"completed_at": null}))));
    }

    #[test]
    fn test_matches_driver_by_id() {
        let d = driver("u1", "a@x.com");
        assert!(matches_driver(&delivery("d1", json!({"driver_id": "u1"})), &d));
        assert!(!matches_driver(&delivery("d1", json!({"driver_id": "u2"})), &d));
    }

    #[test]
    fn test_matches_driver_falls_back_to_email_when_id_is_stale() {
        let d = driver("u1", "a@x.com");
        let stale = delivery("d1", json!({"driver_id": "deleted-user", "driver_email": "a@x.com"}));
        assert!(matches_driver(&stale, &d));
    }

    #[test]
    fn test_matches_driver_by_id_ignores_email_mismatch() {
        let d = driver("u1", "a@x.com");
        let by_id = delivery("d1", json!({"driver_id": "u1", "driver_email": "b@x.com"}));
        assert!(matches_driver(&by_id, &d));
    }

    #[test]
    fn test_matches_driver_normalizes_email() {
        let d = driver("u1", "A@X.com");
        assert!(matches_driver(&delivery("d1", json!({"driver_email": " a@x.COM"})), &d));
    }

    #[test]
    fn test_matches_driver_requires_both_emails() {
        let no_email = super::test_support::user("u1", json!({"role": "driver"}));
        assert!(!matches_driver(&delivery("d1", json!({"driver_email": ""})), &no_email));
        assert!(!matches_driver(&delivery("d1", json!({})), &no_email));
        assert!(!matches_driver(
            &delivery("d1", json!({})),
            &driver("u1", "a@x.com")
        ));
    }
}

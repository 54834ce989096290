//! Per-driver delivery roster.

use serde::Serialize;

use super::{is_delivered, matches_driver};
use crate::records::{Delivery, User};
use crate::types::UserId;

/// Rendered in place of a missing or blank name, email, or phone.
pub const PLACEHOLDER: &str = "-";

/// A driver with the deliveries assigned to them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub assigned_count: usize,
    pub delivered_count: usize,
    /// Assigned deliveries in delivery-snapshot order.
    pub deliveries: Vec<Delivery>,
}

/// Compact driver listing with a delivered count only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverOverview {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub packages_delivered: usize,
}

/// Build the roster for every driver in the user snapshot.
///
/// Non-driver users are skipped. Output order follows the user snapshot.
#[must_use]
pub fn build_driver_roster(users: &[User], deliveries: &[Delivery]) -> Vec<DriverSummary> {
    users
        .iter()
        .filter(|user| user.is_driver())
        .map(|driver| {
            let assigned: Vec<Delivery> = deliveries
                .iter()
                .filter(|delivery| matches_driver(delivery, driver))
                .cloned()
                .collect();
            let delivered_count = assigned.iter().filter(|d| is_delivered(d)).count();

            DriverSummary {
                id: driver.id.clone(),
                name: display(driver.name.as_deref()),
                email: display(driver.email.as_deref()),
                phone: display(driver.phone.as_deref()),
                assigned_count: assigned.len(),
                delivered_count,
                deliveries: assigned,
            }
        })
        .collect()
}

/// Summarize every driver with the number of deliveries they completed.
#[must_use]
pub fn summarize_drivers(users: &[User], deliveries: &[Delivery]) -> Vec<DriverOverview> {
    users
        .iter()
        .filter(|user| user.is_driver())
        .map(|driver| DriverOverview {
            id: driver.id.clone(),
            name: display(driver.name.as_deref()),
            email: display(driver.email.as_deref()),
            phone: display(driver.phone.as_deref()),
            packages_delivered: deliveries
                .iter()
                .filter(|d| matches_driver(d, driver) && is_delivered(d))
                .count(),
        })
        .collect()
}

fn display(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => PLACEHOLDER.to_owned(),
    }
}

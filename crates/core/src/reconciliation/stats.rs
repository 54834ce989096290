//! Dashboard aggregate counts.

use std::collections::HashSet;

use serde::Serialize;

use crate::records::{Delivery, User};
use crate::types::{DeliveryId, DeliveryStatus};

/// Figures shown on the dashboard overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_drivers: usize,
    pub total_packages: usize,
    pub pending_packages: usize,
    pub delivered_packages: usize,
}

/// Compute dashboard statistics from full user and delivery snapshots.
///
/// `delivered_packages` is the size of the union, by delivery id, of the
/// deliveries whose status is `done` and those carrying a completion
/// timestamp. A delivery with both signals is counted once.
#[must_use]
pub fn compute_dashboard_stats(users: &[User], deliveries: &[Delivery]) -> DashboardStats {
    let total_drivers = users.iter().filter(|u| u.is_driver()).count();

    let pending_packages = deliveries
        .iter()
        .filter(|d| DeliveryStatus::Pending.matches(d.status.as_deref()))
        .count();

    let done_by_status = deliveries
        .iter()
        .filter(|d| DeliveryStatus::Done.matches(d.status.as_deref()))
        .map(|d| &d.id);
    let done_by_timestamp = deliveries
        .iter()
        .filter(|d| d.has_completion_timestamp())
        .map(|d| &d.id);
    let delivered: HashSet<&DeliveryId> = done_by_status.chain(done_by_timestamp).collect();

    DashboardStats {
        total_drivers,
        total_packages: deliveries.len(),
        pending_packages,
        delivered_packages: delivered.len(),
    }
}

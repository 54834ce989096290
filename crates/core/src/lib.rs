//! Optimile Core - Shared types and reconciliation engine.
//!
//! This crate provides the types used across the Optimile admin components:
//! - `admin` - JSON API for the delivery-tracking admin dashboard
//! - `cli` - Command-line tools for migrations and user bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types and pure computations - no I/O, no
//! database access, no HTTP clients. Route handlers fetch snapshots from the
//! document store and hand them to [`reconciliation`].
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for document IDs, emails, roles, and statuses
//! - [`records`] - Typed views over `users` and `deliveries` documents
//! - [`reconciliation`] - Driver/delivery matching and dashboard statistics

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod reconciliation;
pub mod records;
pub mod types;

pub use records::{Delivery, User};
pub use reconciliation::{
    DashboardStats, DriverOverview, DriverSummary, PackageStatus, build_driver_roster,
    compute_dashboard_stats, is_delivered, matches_driver, summarize_drivers,
};
pub use types::*;

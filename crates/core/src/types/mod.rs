//! Core types for Optimile.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError, normalize_email};
pub use id::*;
pub use role::{Role, RoleParseError};
pub use status::{DeliveryStatus, normalize_status};

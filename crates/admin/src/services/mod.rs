//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Bearer token verification and Argon2 password hashing
//! - `packages` - Package status lookup across alternate identifier fields
//! - `users` - User and driver writes with validation and email uniqueness

pub mod auth;
pub mod packages;
pub mod users;

pub use auth::{
    Argon2Hasher, AuthError, IdentityToolkitVerifier, PasswordHasher, StaticTokenVerifier,
    TokenVerifier, VerifiedIdentity,
};
pub use packages::lookup_package_status;
pub use users::{DriverUpdate, NewUser, UserError, UserService, UserUpdate};

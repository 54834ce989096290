//! HTTP middleware and extractors for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (`http_request` span with status and latency)
//! 3. Auth extractors on protected handlers ([`auth::RequireAuth`], [`auth::RequireAdmin`])

pub mod auth;

pub use auth::{AuthRejection, RequireAdmin, RequireAuth};

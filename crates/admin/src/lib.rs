//! Optimile Admin library.
//!
//! JSON API behind the delivery-tracking admin dashboard: user and driver
//! management, dashboard statistics, per-driver delivery rosters, and
//! package status lookup. Reconciliation logic lives in `optimile-core`;
//! this crate wires it to a document store, a token verifier, and HTTP.
//!
//! # Security
//!
//! Every `/api` route except `health` and `logout` requires a bearer token
//! issued by the identity provider. All data routes also require the
//! caller's user document to carry the `admin` role.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;

// crates/backend-lib/src/middleware/mod.rs

//! Request middleware.

pub mod auth;

pub use auth::require_auth;

// ============================
// tasklist-backend-lib/src/auth/mod.rs
// ============================
//! Authentication: password hashing, token issue/verify, and the request gate.

mod gate;
pub mod password;
mod service;
mod service_impl;
pub mod token;

pub use gate::{bearer_token, AuthGate, AuthenticatedUser, Rejection};
pub use password::{HashError, PasswordHasher};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{Claims, TokenError, TokenService};

// ============================
// tasklist-backend-lib/src/lib.rs
// ============================
//! Core of the task list HTTP service: configuration, storage, authentication
//! and the axum router.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod telemetry;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthGate, AuthService, DefaultAuth, PasswordHasher, TokenService};
use crate::config::Settings;
use crate::storage::Storage;

pub use crate::router::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Signup and login
    pub auth: Arc<dyn AuthService>,
    /// Bearer-token gate for protected routes
    pub gate: AuthGate,
    /// Validated settings
    pub settings: Arc<Settings>,
    /// Storage backend
    pub storage: S,
}

impl<S: Storage + Clone + 'static> AppState<S> {
    /// Create the application state. Settings are validated first.
    pub fn new(storage: S, settings: Settings) -> anyhow::Result<Self> {
        settings.validate()?;

        let tokens = Arc::new(TokenService::new(
            &settings.auth.jwt_secret,
            Duration::from_secs(settings.auth.token_ttl_secs),
        ));
        let hasher = Arc::new(PasswordHasher::new(&settings.auth.hashing)?);
        let auth = DefaultAuth::new(
            storage.clone(),
            hasher,
            Arc::clone(&tokens),
            settings.auth.password.clone(),
        )?;

        Ok(Self {
            auth: Arc::new(auth),
            gate: AuthGate::new(tokens),
            settings: Arc::new(settings),
            storage,
        })
    }
}

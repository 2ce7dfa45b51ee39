// ============================
// tasklist-backend-lib/src/router.rs
// ============================
//! HTTP routes and the layers wrapped around them.
use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::CorsSettings;
use crate::handlers::{auth, health, tasks};
use crate::middleware::require_auth;
use crate::storage::Storage;
use crate::AppState;

/// Build the application router
pub fn create_router<S: Storage + Clone + 'static>(state: Arc<AppState<S>>) -> Router {
    let protected = Router::new()
        .route(
            "/api/tasks",
            get(tasks::list_tasks::<S>).post(tasks::create_task::<S>),
        )
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task::<S>)
                .put(tasks::update_task::<S>)
                .delete(tasks::delete_task::<S>),
        )
        .route_layer(from_fn_with_state(state.gate.clone(), require_auth));

    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/signup", post(auth::signup::<S>))
        .route("/api/auth/login", post(auth::login::<S>));

    let cors = cors_layer(&state.settings.cors);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS from the configured origin list. `"*"` allows any origin; an empty list
/// allows none.
pub fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if settings.allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Signup and login endpoints.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tasklist_common::{AuthResponse, Credentials};

use crate::{error::AppError, AppState};

/// `POST /api/auth/signup`
pub async fn signup<S>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let Json(credentials) = payload?;
    let response = state.auth.signup(credentials).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /api/auth/login`
pub async fn login<S>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(credentials) = payload?;
    let response = state.auth.login(credentials).await?;
    Ok(Json(response))
}

//! Shared setup for the integration tests.
//!
//! Every test gets its own in-memory database and a router wired exactly like the
//! server binary, with cheap argon2 parameters so hashing does not dominate.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tasklist_backend_lib::{
    auth::TokenService,
    config::{HashingSettings, Secret, Settings},
    create_router,
    storage::SqliteStorage,
    AppState,
};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const PASSWORD: &str = "secret123";

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = Secret::new(SECRET);
    settings.auth.hashing = HashingSettings {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
    settings
}

/// Router over a fresh in-memory store
pub fn setup_app() -> Router {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let state = AppState::new(storage, test_settings()).unwrap();
    create_router(Arc::new(state))
}

/// Token service sharing the router's secret, for minting tokens by hand
pub fn token_service(secret: &str) -> TokenService {
    TokenService::new(&Secret::new(secret), std::time::Duration::from_secs(3600))
}

/// Send one request and decode the JSON body (`Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Sign up and return the issued token
pub async fn signup(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Create a task and return its JSON
pub async fn create_task(app: &Router, token: &str, title: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/tasks",
        Some(token),
        Some(json!({ "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
}

//! Axum adapter for [`AuthGate`].
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use metrics::counter;
use tracing::debug;

use crate::auth::{AuthGate, AuthenticatedUser, Rejection};
use crate::error::AppError;
use crate::metrics::AUTH_REJECTED;

/// Reject the request unless it carries a valid bearer token. On success the
/// caller's identity is stored in the request extensions.
pub async fn require_auth(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let outcome = match request.headers().get(AUTHORIZATION) {
        None => gate.check(None),
        Some(value) => match value.to_str() {
            Ok(header) => gate.check(Some(header)),
            Err(_) => Err(Rejection::Malformed),
        },
    };

    match outcome {
        Ok(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        },
        Err(reason) => {
            debug!(
                reason = reason.as_str(),
                path = %request.uri().path(),
                "request rejected by auth gate"
            );
            counter!(AUTH_REJECTED, "reason" => reason.as_str()).increment(1);
            Err(AppError::Unauthenticated(reason))
        },
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or(AppError::Unauthenticated(Rejection::MissingCredentials))
    }
}

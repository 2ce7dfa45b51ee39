//! Bearer-token gate in front of every protected operation.
//!
//! The gate is a plain function of the `Authorization` header value so it can be
//! composed into any request pipeline; [`crate::middleware::require_auth`] is the
//! axum adapter.
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use super::TokenService;

/// Why a request was turned away. Callers only ever see a generic 401; the
/// reason is for logs and metrics.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("missing bearer credentials")]
    MissingCredentials,

    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,
}

impl Rejection {
    /// Stable label for metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::MissingCredentials => "missing_credentials",
            Rejection::Malformed => "malformed",
            Rejection::InvalidSignature => "invalid_signature",
            Rejection::Expired => "expired",
        }
    }
}

/// Identity of the caller, established by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

/// Verifies bearer tokens
#[derive(Debug, Clone)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Run the full check on a raw `Authorization` header value
    pub fn check(&self, authorization: Option<&str>) -> Result<AuthenticatedUser, Rejection> {
        let header = authorization.ok_or(Rejection::MissingCredentials)?;
        let token = bearer_token(header)?;
        let claims = self.tokens.verify(token)?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| Rejection::Malformed)?;
        Ok(AuthenticatedUser { id })
    }
}

/// Extract the token from `Bearer <token>`. The scheme is case-insensitive.
pub fn bearer_token(header: &str) -> Result<&str, Rejection> {
    let (scheme, token) = header.trim().split_once(' ').ok_or(Rejection::Malformed)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(Rejection::Malformed);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(Rejection::Malformed);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;
    use crate::config::Secret;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn gate() -> (AuthGate, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new(
            &Secret::new(SECRET),
            std::time::Duration::from_secs(3600),
        ));
        (AuthGate::new(Arc::clone(&tokens)), tokens)
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Ok("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Ok("abc"));
        assert_eq!(bearer_token("BEARER   abc  "), Ok("abc"));

        assert_eq!(bearer_token("Bearer"), Err(Rejection::Malformed));
        assert_eq!(bearer_token("Bearer    "), Err(Rejection::Malformed));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), Err(Rejection::Malformed));
        assert_eq!(bearer_token(""), Err(Rejection::Malformed));
    }

    #[test]
    fn test_gate_accepts_valid_token() {
        let (gate, tokens) = gate();
        let id = Uuid::new_v4();
        let header = format!("Bearer {}", tokens.issue(id).unwrap());

        assert_eq!(gate.check(Some(&header)), Ok(AuthenticatedUser { id }));
    }

    #[test]
    fn test_gate_rejection_reasons() {
        let (gate, tokens) = gate();

        assert_eq!(gate.check(None), Err(Rejection::MissingCredentials));
        assert_eq!(gate.check(Some("Token abc")), Err(Rejection::Malformed));
        assert_eq!(gate.check(Some("Bearer not-a-jwt")), Err(Rejection::Malformed));

        let expired = tokens
            .issue_at(Uuid::new_v4(), Utc::now() - Duration::hours(2))
            .unwrap();
        assert_eq!(
            gate.check(Some(&format!("Bearer {expired}"))),
            Err(Rejection::Expired)
        );

        let foreign = TokenService::new(
            &Secret::new("another-secret-another-secret-0000"),
            std::time::Duration::from_secs(3600),
        )
        .issue(Uuid::new_v4())
        .unwrap();
        assert_eq!(
            gate.check(Some(&format!("Bearer {foreign}"))),
            Err(Rejection::InvalidSignature)
        );
    }

    #[test]
    fn test_gate_rejects_non_uuid_subject() {
        let (gate, _) = gate();
        let now = Utc::now().timestamp();
        let token = encode(
            &Header::default(),
            &Claims {
                sub: "admin".to_string(),
                iat: now,
                exp: now + 60,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            gate.check(Some(&format!("Bearer {token}"))),
            Err(Rejection::Malformed)
        );
    }
}

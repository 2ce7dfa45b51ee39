// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
/** Signed bearer tokens.
Tokens are HS256 JWTs carrying the account id (`sub`), issue time (`iat`) and
expiry (`exp`). Nothing is stored server side; a token is valid for as long as
its signature checks out against the process secret and `exp` is in the future. */
use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::Rejection;
use crate::config::Secret;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims embedded in every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    /// Issued at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Just the algorithm of a header jsonwebtoken could not parse
#[derive(Deserialize)]
struct RawHeader {
    alg: Option<String>,
}

/// Whether the token header names an algorithm other than ours. jsonwebtoken
/// cannot represent `none`, so such headers surface as JSON errors.
fn names_foreign_algorithm(token: &str) -> bool {
    let Some(segment) = token.split('.').next() else {
        return false;
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(segment) else {
        return false;
    };
    match serde_json::from_slice::<RawHeader>(&bytes) {
        Ok(RawHeader { alg: Some(alg) }) => alg != "HS256",
        _ => false,
    }
}

/// Signing failures
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies tokens with a secret fixed at construction
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: std::time::Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &ALGORITHM)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &Secret, ttl: std::time::Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.expose()),
            decoding: DecodingKey::from_secret(secret.expose()),
            validation,
            ttl,
        }
    }

    /// Issue a token for `subject`, valid from now
    pub fn issue(&self, subject: Uuid) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token for `subject` as if it were minted at `issued_at`
    pub fn issue_at(&self, subject: Uuid, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp: iat.saturating_add(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)),
        };
        Ok(encode(&Header::new(ALGORITHM), &claims, &self.encoding)?)
    }

    /// Check structure, signature and expiry, in that order
    pub fn verify(&self, token: &str) -> Result<Claims, Rejection> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    Rejection::InvalidSignature
                },
                ErrorKind::ExpiredSignature => Rejection::Expired,
                ErrorKind::Json(_) | ErrorKind::Base64(_) if names_foreign_algorithm(token) => {
                    Rejection::InvalidSignature
                },
                _ => Rejection::Malformed,
            })
    }
}

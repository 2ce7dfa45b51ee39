use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use tasklist_common::{AuthResponse, Credentials};
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::{AuthService, HashError, PasswordHasher, TokenService};
use crate::config::PasswordRequirements;
use crate::error::AppError;
use crate::metrics::{AUTH_LOGIN, AUTH_LOGIN_FAILED, AUTH_SIGNUP, AUTH_SIGNUP_CONFLICT};
use crate::storage::{Account, Storage, StorageError};
use crate::validation::{validate_email, validate_password};

/// Verified against when the email is unknown, so both login failures cost one hash.
const DUMMY_PASSWORD: &str = "tasklist-dummy-password";

/// Auth backed by a [`Storage`] implementation
pub struct DefaultAuth<S> {
    storage: S,
    hasher: Arc<PasswordHasher>,
    tokens: Arc<TokenService>,
    requirements: PasswordRequirements,
    dummy_digest: String,
}

impl<S> DefaultAuth<S> {
    pub fn new(
        storage: S,
        hasher: Arc<PasswordHasher>,
        tokens: Arc<TokenService>,
        requirements: PasswordRequirements,
    ) -> Result<Self, HashError> {
        let dummy_digest = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            storage,
            hasher,
            tokens,
            requirements,
            dummy_digest,
        })
    }

    fn respond(&self, account: &Account) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            user: account.view(),
            token: self.tokens.issue(account.id)?,
        })
    }

    async fn hash(&self, password: Zeroizing<String>) -> Result<String, AppError> {
        let hasher = Arc::clone(&self.hasher);
        let digest = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;
        Ok(digest)
    }

    async fn verify(&self, password: Zeroizing<String>, digest: String) -> Result<bool, AppError> {
        let hasher = Arc::clone(&self.hasher);
        let ok = tokio::task::spawn_blocking(move || hasher.verify(&password, &digest)).await?;
        Ok(ok)
    }
}

#[async_trait]
impl<S: Storage> AuthService for DefaultAuth<S> {
    async fn signup(&self, credentials: Credentials) -> Result<AuthResponse, AppError> {
        let Credentials { email, password } = credentials;
        let password = Zeroizing::new(password);

        let email = validate_email(&email)?;
        validate_password(&password, &self.requirements)?;

        let digest = self.hash(password).await?;
        let account = match self.storage.insert_account(email, &digest).await {
            Ok(account) => account,
            Err(StorageError::Conflict) => {
                counter!(AUTH_SIGNUP_CONFLICT).increment(1);
                debug!("signup rejected: email already registered");
                return Err(AppError::Conflict);
            },
            Err(err) => return Err(err.into()),
        };

        counter!(AUTH_SIGNUP).increment(1);
        info!(account_id = %account.id, "account created");
        self.respond(&account)
    }

    async fn login(&self, credentials: Credentials) -> Result<AuthResponse, AppError> {
        let Credentials { email, password } = credentials;
        let password = Zeroizing::new(password);

        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }

        let account = self.storage.find_account_by_email(email).await?;
        let digest = account
            .as_ref()
            .map_or_else(|| self.dummy_digest.clone(), |a| a.password_hash.clone());
        let verified = self.verify(password, digest).await?;

        match account {
            Some(account) if verified => {
                counter!(AUTH_LOGIN).increment(1);
                info!(account_id = %account.id, "login succeeded");
                self.respond(&account)
            },
            _ => {
                counter!(AUTH_LOGIN_FAILED).increment(1);
                debug!("login failed");
                Err(AppError::InvalidCredentials)
            },
        }
    }
}

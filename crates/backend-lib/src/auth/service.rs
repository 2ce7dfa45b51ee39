use async_trait::async_trait;
use tasklist_common::{AuthResponse, Credentials};

use crate::error::AppError;

/// Account creation and credential checks. Both operations return a fresh token.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account. Fails with `InvalidInput` or `Conflict`.
    async fn signup(&self, credentials: Credentials) -> Result<AuthResponse, AppError>;

    /// Check credentials. Unknown email and wrong password both fail with
    /// `InvalidCredentials`.
    async fn login(&self, credentials: Credentials) -> Result<AuthResponse, AppError>;
}

// ============================
// tasklist-backend-lib/src/storage.rs
// ============================
//! Storage abstraction with a SQLite implementation.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tasklist_common::{Task, TaskStatus, UserView};
use thiserror::Error;
use uuid::Uuid;

mod schema;
mod sqlite;

pub use schema::{apply_migrations, latest_version};
pub use sqlite::SqliteStorage;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Email already in use")]
    Conflict,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid persisted data: {0}")]
    InvalidData(String),

    #[error("Database schema version {found} is newer than supported {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("Storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A stored account. The password digest never leaves the auth layer.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Public view of this account
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Fields of a task to create
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
}

/// Partial task update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Trait for storage backends.
///
/// Every task operation is scoped to `owner`. A task owned by another account is
/// reported exactly like a task that does not exist.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Look up an account by email, ignoring ASCII case
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StorageError>;

    /// Create an account. Fails with [`StorageError::Conflict`] if the email is taken.
    async fn insert_account(&self, email: &str, password_hash: &str) -> Result<Account, StorageError>;

    /// Create a task owned by `owner` with status `pending`
    async fn create_task(&self, owner: Uuid, task: NewTask) -> Result<Task, StorageError>;

    /// All tasks of `owner`, newest first
    async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, StorageError>;

    /// A single task of `owner`
    async fn get_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, StorageError>;

    /// Apply `patch` to a task of `owner` and return the updated row
    async fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Task>, StorageError>;

    /// Delete a task of `owner`. Returns whether a row was removed.
    async fn delete_task(&self, owner: Uuid, id: Uuid) -> Result<bool, StorageError>;
}

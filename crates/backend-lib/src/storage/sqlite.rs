//! SQLite-backed implementation of [`Storage`].
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{ffi, params, types::Type, Connection, ErrorCode, OptionalExtension, Row};
use tasklist_common::{Task, TaskStatus};
use uuid::Uuid;

use super::{apply_migrations, Account, NewTask, Storage, StorageError, TaskPatch};

const TASK_COLUMNS: &str = "id, user_id, title, description, status, created_at, updated_at";

/// One connection shared behind a mutex. Every call runs on the blocking pool.
#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open (or create) the database file at `path` and apply migrations
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(path)?;
        // WAL for concurrent readers + crash safety
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        bootstrap(&mut conn)?;

        tracing::info!(path = %path.display(), "opened database");
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let mut conn = Connection::open_in_memory()?;
        bootstrap(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn call<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard)
        })
        .await?
    }
}

fn bootstrap(conn: &mut Connection) -> Result<(), StorageError> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)
}

/// Only UNIQUE failures mean "already taken"; CHECK, NOT NULL and foreign key
/// failures are storage errors.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status: String = row.get(4)?;
    let status = status
        .parse::<TaskStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Task {
        id: uuid_column(row, 0)?,
        user_id: uuid_column(row, 1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: uuid_column(row, 0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StorageError> {
        let email = email.to_string();
        self.call(move |conn| {
            let account = conn
                .query_row(
                    "SELECT id, email, password_hash, created_at, updated_at
                     FROM users WHERE email = ?1",
                    params![email],
                    account_from_row,
                )
                .optional()?;
            Ok(account)
        })
        .await
    }

    async fn insert_account(&self, email: &str, password_hash: &str) -> Result<Account, StorageError> {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.call(move |conn| {
            let result = conn.execute(
                "INSERT INTO users (id, email, password_hash, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    account.id.to_string(),
                    account.email,
                    account.password_hash,
                    account.created_at,
                    account.updated_at
                ],
            );

            match result {
                Ok(_) => Ok(account),
                Err(e) if is_unique_violation(&e) => Err(StorageError::Conflict),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn create_task(&self, owner: Uuid, task: NewTask) -> Result<Task, StorageError> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            user_id: owner,
            title: task.title,
            description: task.description,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.call(move |conn| {
            conn.execute(
                "INSERT INTO tasks (id, user_id, title, description, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    task.id.to_string(),
                    task.user_id.to_string(),
                    task.title,
                    task.description,
                    task.status.as_str(),
                    task.created_at,
                    task.updated_at
                ],
            )?;
            Ok(task)
        })
        .await
    }

    async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, StorageError> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let tasks = stmt
                .query_map(params![owner.to_string()], task_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tasks)
        })
        .await
    }

    async fn get_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, StorageError> {
        self.call(move |conn| {
            let task = conn
                .query_row(
                    &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user_id = ?2"),
                    params![id.to_string(), owner.to_string()],
                    task_from_row,
                )
                .optional()?;
            Ok(task)
        })
        .await
    }

    async fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Task>, StorageError> {
        self.call(move |conn| {
            let task = conn
                .query_row(
                    &format!(
                        "UPDATE tasks
                         SET title = COALESCE(?1, title),
                             description = COALESCE(?2, description),
                             status = COALESCE(?3, status),
                             updated_at = ?4
                         WHERE id = ?5 AND user_id = ?6
                         RETURNING {TASK_COLUMNS}"
                    ),
                    params![
                        patch.title,
                        patch.description,
                        patch.status.map(TaskStatus::as_str),
                        Utc::now(),
                        id.to_string(),
                        owner.to_string()
                    ],
                    task_from_row,
                )
                .optional()?;
            Ok(task)
        })
        .await
    }

    async fn delete_task(&self, owner: Uuid, id: Uuid) -> Result<bool, StorageError> {
        self.call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
                params![id.to_string(), owner.to_string()],
            )?;
            Ok(removed > 0)
        })
        .await
    }
}

// ============================
// crates/backend-lib/src/handlers/tasks.rs
// ============================
//! Task CRUD. Every handler is scoped to the authenticated caller; a task that
//! belongs to someone else is answered exactly like a missing one.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use metrics::counter;
use tasklist_common::{CreateTaskRequest, Task, UpdateTaskRequest};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::metrics::{TASK_CREATED, TASK_DELETED, TASK_UPDATED};
use crate::storage::{NewTask, Storage, TaskPatch};
use crate::validation::validate_task_title;
use crate::AppState;

/// Unparseable ids cannot name an existing task
fn task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

/// `POST /api/tasks`
pub async fn create_task<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let Json(request) = payload?;
    let title = validate_task_title(&request.title)?.to_string();

    let task = state
        .storage
        .create_task(
            user.id,
            NewTask {
                title,
                description: request.description,
            },
        )
        .await?;

    counter!(TASK_CREATED).increment(1);
    info!(account_id = %user.id, task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /api/tasks`
pub async fn list_tasks<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state.storage.list_tasks(user.id).await?;
    Ok(Json(tasks))
}

/// `GET /api/tasks/{id}`
pub async fn get_task<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let id = task_id(&id)?;
    state
        .storage
        .get_task(user.id, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// `PUT /api/tasks/{id}`
pub async fn update_task<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let id = task_id(&id)?;
    let Json(request) = payload?;

    let title = match request.title.as_deref() {
        Some(title) => Some(validate_task_title(title)?.to_string()),
        None => None,
    };
    let patch = TaskPatch {
        title,
        description: request.description,
        status: request.status,
    };

    let task = state
        .storage
        .update_task(user.id, id, patch)
        .await?
        .ok_or(AppError::NotFound)?;

    counter!(TASK_UPDATED).increment(1);
    info!(account_id = %user.id, task_id = %task.id, status = %task.status, "task updated");
    Ok(Json(task))
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = task_id(&id)?;
    if !state.storage.delete_task(user.id, id).await? {
        return Err(AppError::NotFound);
    }

    counter!(TASK_DELETED).increment(1);
    info!(account_id = %user.id, task_id = %id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

//! `/api/tasks` route handlers.
//!
//! Each handler validates through the extractors, calls the store and
//! wraps the result in an [`Envelope`]. Failures go out as [`ApiError`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::validation;
use taskboard_core::Task;

use crate::envelope::Envelope;
use crate::error::{self, ApiError};
use crate::extract::{JsonBody, TaskIdParam};
use crate::server::AppState;

pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// GET /api/tasks
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Vec<Task>> {
    let tasks = state
        .store
        .list_all()
        .await
        .map_err(ApiError::store(error::FETCH_TASKS))?;
    let count = tasks.len();
    Ok(Json(Envelope::data(tasks).with_count(count)))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    TaskIdParam(id): TaskIdParam,
) -> ApiResult<Task> {
    let task = state
        .store
        .get_by_id(id)
        .await
        .map_err(ApiError::store(error::FETCH_TASK))?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(Envelope::data(task)))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Envelope<Task>>), ApiError> {
    let new_task = validation::parse_new_task(&body)?;
    let task = state
        .store
        .create(new_task)
        .await
        .map_err(ApiError::store(error::CREATE_TASK))?;
    tracing::info!(task_id = %task.id, "task created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(task).with_message("Task created successfully")),
    ))
}

/// PUT /api/tasks/{id}
///
/// Presence-based merge: fields omitted from the body keep their stored
/// value, supplied fields replace it.
pub async fn update_task(
    State(state): State<AppState>,
    TaskIdParam(id): TaskIdParam,
    JsonBody(body): JsonBody,
) -> ApiResult<Task> {
    let patch = validation::parse_task_patch(&body)?;
    let existing = state
        .store
        .get_by_id(id)
        .await
        .map_err(ApiError::store(error::UPDATE_TASK))?
        .ok_or(ApiError::NotFound)?;

    let outcome = state
        .store
        .update(id, patch.apply(&existing))
        .await
        .map_err(ApiError::store(error::UPDATE_TASK))?;
    if !outcome.changed {
        // Deleted between the existence check and the write.
        return Err(ApiError::NotFound);
    }

    let updated = state
        .store
        .get_by_id(id)
        .await
        .map_err(ApiError::store(error::UPDATE_TASK))?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(task_id = %id, status = %updated.status, "task updated");
    Ok(Json(
        Envelope::data(updated).with_message("Task updated successfully"),
    ))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    TaskIdParam(id): TaskIdParam,
) -> ApiResult<()> {
    state
        .store
        .get_by_id(id)
        .await
        .map_err(ApiError::store(error::DELETE_TASK))?
        .ok_or(ApiError::NotFound)?;

    let outcome = state
        .store
        .delete(id)
        .await
        .map_err(ApiError::store(error::DELETE_TASK))?;
    if !outcome.changed {
        return Err(ApiError::NotFound);
    }

    tracing::info!(task_id = %id, "task deleted");
    Ok(Json(Envelope::message("Task deleted successfully")))
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

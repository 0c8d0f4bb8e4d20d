//! Task API server core: routes, handlers, and startup.
//!
//! Exposes the REST surface the `TaskDeck` client consumes:
//!
//! - `GET    /api/tasks`       list tasks, filtered by `status` and `search`
//! - `POST   /api/tasks`       create a task from a `{"task": ...}` body
//! - `GET    /api/tasks/{id}`  fetch a single task
//! - `PATCH  /api/tasks/{id}`  partially update a task
//! - `DELETE /api/tasks/{id}`  remove a task
//!
//! Successful responses wrap payloads as `{"data": ...}`; failures carry an
//! error body with a `message` string or array of validation messages.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use taskdeck_proto::task::{self, TaskDraft, TaskId, TaskPatch, TaskQuery};
use taskdeck_proto::wire::{Envelope, ErrorBody, TaskPayload};

use crate::store::TaskTable;

/// Builds the API router over a shared task table.
pub fn router(state: Arc<TaskTable>) -> axum::Router {
    axum::Router::new()
        .route(
            "/api/tasks",
            axum::routing::get(list_tasks).post(create_task),
        )
        .route(
            "/api/tasks/{id}",
            axum::routing::get(get_task)
                .patch(update_task)
                .delete(delete_task),
        )
        .with_state(state)
}

async fn list_tasks(
    State(state): State<Arc<TaskTable>>,
    Query(query): Query<TaskQuery>,
) -> Response {
    let tasks = state.list(&query).await;
    tracing::debug!(
        status = %query.filter,
        search = %query.search,
        count = tasks.len(),
        "listing tasks"
    );
    (StatusCode::OK, Json(Envelope { data: tasks })).into_response()
}

async fn get_task(State(state): State<Arc<TaskTable>>, Path(id): Path<u64>) -> Response {
    match state.get(TaskId::new(id)).await {
        Some(found) => (StatusCode::OK, Json(Envelope { data: found })).into_response(),
        None => not_found(id),
    }
}

async fn create_task(
    State(state): State<Arc<TaskTable>>,
    Json(body): Json<TaskPayload<TaskDraft>>,
) -> Response {
    let violations = task::validate_draft(&body.task);
    if !violations.is_empty() {
        tracing::debug!(?violations, "rejecting task creation");
        return validation_failed(violations);
    }

    let created = state.create(body.task).await;
    tracing::info!(id = %created.id, "task created");
    (StatusCode::CREATED, Json(Envelope { data: created })).into_response()
}

async fn update_task(
    State(state): State<Arc<TaskTable>>,
    Path(id): Path<u64>,
    Json(body): Json<TaskPayload<TaskPatch>>,
) -> Response {
    let violations = task::validate_patch(&body.task);
    if !violations.is_empty() {
        tracing::debug!(id, ?violations, "rejecting task update");
        return validation_failed(violations);
    }

    match state.update(TaskId::new(id), &body.task).await {
        Some(updated) => {
            tracing::info!(id = %updated.id, "task updated");
            (StatusCode::OK, Json(Envelope { data: updated })).into_response()
        }
        None => not_found(id),
    }
}

async fn delete_task(State(state): State<Arc<TaskTable>>, Path(id): Path<u64>) -> Response {
    if state.delete(TaskId::new(id)).await {
        tracing::info!(id, "task deleted");
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found(id)
    }
}

fn not_found(id: u64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::from_message(format!("task {id} not found"))),
    )
        .into_response()
}

fn validation_failed(violations: Vec<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::from_messages(violations)),
    )
        .into_response()
}

/// Starts the task server on the given address and returns the bound address
/// and a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(TaskTable::new())).await
}

/// Starts the task server over a pre-populated [`TaskTable`].
///
/// Callers that keep a clone of the `Arc` can inspect and mutate the table
/// behind the running server, which is how tests seed and reset state.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<TaskTable>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task server error");
        }
    });

    Ok((bound_addr, handle))
}

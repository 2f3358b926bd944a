//! Background task submission and status polling.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    jobs::JobKind,
    models::{JobSubmitted, ProcessDataRequest, SendEmailRequest},
    state::AppState,
};

async fn submit(state: &AppState, kind: JobKind) -> Response {
    match state.jobs.submit(kind).await {
        Some(task_id) => {
            (StatusCode::ACCEPTED, Json(JobSubmitted { task_id })).into_response()
        }
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "detail": "Task queue is full" })),
        )
            .into_response(),
    }
}

/// Queue an email send (POST /tasks/send-email).
pub async fn send_email(
    State(state): State<AppState>,
    _current: CurrentUser,
    Json(payload): Json<SendEmailRequest>,
) -> Response {
    submit(
        &state,
        JobKind::SendEmail {
            email: payload.email,
            subject: payload.subject,
            message: payload.message,
        },
    )
    .await
}

/// Queue a data processing run (POST /tasks/process-data).
pub async fn process_data(
    State(state): State<AppState>,
    _current: CurrentUser,
    Json(payload): Json<ProcessDataRequest>,
) -> Response {
    submit(&state, JobKind::ProcessData { data: payload.data }).await
}

/// Queue a cleanup run (POST /tasks/cleanup).
pub async fn cleanup(State(state): State<AppState>, _current: CurrentUser) -> Response {
    submit(&state, JobKind::Cleanup).await
}

/// Poll a task's status (GET /tasks/status/{id}).
pub async fn task_status(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Response {
    match state.jobs.status(id).await {
        Some(status) => Json(status).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": format!("Task {id} not found") })),
        )
            .into_response(),
    }
}

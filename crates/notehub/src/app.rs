use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::{healthz, livez},
        notes::{create_note, delete_note, get_note, list_all_notes, list_notes, update_note},
        tasks::{cleanup, process_data, send_email, task_status},
        users::{get_me, list_users, login, register},
    },
    middleware::response_cache,
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        // Auth routes
        .route("/register", post(register))
        .route("/login", post(login))
        // User routes
        .route("/users", get(list_users))
        .route("/users/me", get(get_me))
        // Note routes
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/all", get(list_all_notes))
        .route(
            "/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        // Background task routes
        .route("/tasks/send-email", post(send_email))
        .route("/tasks/process-data", post(process_data))
        .route("/tasks/cleanup", post(cleanup))
        .route("/tasks/status/{id}", get(task_status))
        // Health probes
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .layer(from_fn_with_state(state.clone(), response_cache))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

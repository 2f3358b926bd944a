use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use notehub_core::storage::{repository_error_to_status_code, RepositoryError};

/// Application error type that wraps `anyhow::Error`.
///
/// This allows using `?` on functions that return `Result<_, anyhow::Error>`
/// to automatically convert them into `Result<_, AppError>`.
///
/// Repository errors keep their semantic status code (404 for missing
/// rows, 409 for duplicates, 503 for lost connections). Everything else
/// becomes a 500.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<RepositoryError>() {
            Some(repo_err) => {
                StatusCode::from_u16(repository_error_to_status_code(repo_err))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Application error");
        } else {
            tracing::debug!(error = %self.0, status = %status, "Request failed");
        }

        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let err = AppError::from(RepositoryError::NotFound {
            entity_type: "Note",
            id: "abc".to_string(),
        });

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_already_exists_maps_to_409() {
        let err = AppError::from(RepositoryError::AlreadyExists {
            entity_type: "User",
            id: "alice".to_string(),
        });

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_plain_anyhow_maps_to_500() {
        let err = AppError::from(anyhow::anyhow!("boom"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! Request authentication.
//!
//! [`CurrentUser`] is an extractor: any handler that takes it only runs
//! for requests carrying a valid bearer token whose subject still exists
//! in the user store. Everything else is rejected with a 401.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use notehub_core::auth::decode_access_token;
use notehub_core::users::User;

use crate::state::AppState;

/// The authenticated user behind the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// 401 response sent when authentication fails.
pub struct AuthRejection {
    detail: &'static str,
}

impl AuthRejection {
    fn new(detail: &'static str) -> Self {
        Self { detail }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            Json(json!({ "detail": self.detail })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AuthRejection::new("Not authenticated"))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AuthRejection::new("Invalid authentication scheme"))?;

        let claims = decode_access_token(token, &state.config.jwt_secret)
            .map_err(|_| AuthRejection::new("Could not validate credentials"))?;

        let user = state
            .user_repo
            .get_user_by_username(&claims.sub)
            .await
            .map_err(|_| AuthRejection::new("Could not validate credentials"))?
            .ok_or_else(|| AuthRejection::new("Could not validate credentials"))?;

        Ok(CurrentUser(user))
    }
}

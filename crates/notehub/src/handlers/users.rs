//! User registration, login, and listing.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use notehub_core::auth::create_access_token;
use notehub_core::users::{verify_password, User};

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{LoginUser, RegisterUser, TokenResponse, UserResponse},
    state::AppState,
};

/// Register a new user (POST /register).
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUser>,
) -> Result<impl IntoResponse, AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Username and password must not be empty" })),
        )
            .into_response());
    }

    let user = User::new(payload.username.trim(), &payload.password);
    state.user_repo.create_user(&user).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))).into_response())
}

/// Exchange credentials for an access token (POST /login).
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginUser>,
) -> Result<Response, AppError> {
    let user = state
        .user_repo
        .get_user_by_username(&payload.username)
        .await?;

    let valid = user
        .as_ref()
        .is_some_and(|u| verify_password(&payload.password, &u.password));

    if !valid {
        // The same response for unknown users and wrong passwords
        return Ok((
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            Json(json!({ "detail": "Incorrect username or password" })),
        )
            .into_response());
    }

    let token = create_access_token(
        &payload.username,
        &state.config.jwt_secret,
        state.config.access_token_expire_minutes,
    )?;

    tracing::debug!(username = %payload.username, "Access token issued");

    Ok(Json(TokenResponse::bearer(token)).into_response())
}

/// List all registered users (GET /users).
pub async fn list_users(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.user_repo.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// The caller's own profile (GET /users/me).
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

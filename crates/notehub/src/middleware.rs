//! Coarse response caching for allow-listed routes.
//!
//! Successful JSON responses to authenticated GET requests on the
//! configured route prefixes are stored under a signature of the request
//! (method, path, query, and the caller's Authorization header).
//! Unauthenticated requests are never cached: without the caller's
//! identity in the signature, two users hitting the same URL would share
//! one entry. Any successful mutation, on any route, flushes the whole
//! response cache, since a mutation outside the allow-list (registering
//! a user, say) can still change what an allow-listed GET returns.
//!
//! Allow-list entries match as path prefixes, so `/notes` covers
//! `/notes/{id}` without reaching into unrelated routes.
//!
//! Responses carry an `X-Cache` header of `HIT` or `MISS` so staleness
//! is observable from the outside.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use notehub_core::cache::{request_flush_pattern, request_signature_key};

use crate::state::AppState;

const X_CACHE: &str = "x-cache";

pub async fn response_cache(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or("").to_string();
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let cacheable_route = state
        .config
        .cache_routes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()));

    if method == Method::GET && cacheable_route {
        let Some(authorization) = authorization else {
            // Anonymous requests bypass the cache entirely
            return next.run(req).await;
        };

        let key = request_signature_key(method.as_str(), &path, &query, &authorization);

        if let Some(bytes) = state.cache.get_raw(&key).await {
            tracing::debug!(%path, "Serving cached response");
            return cached_response(bytes, "HIT");
        }

        let response = next.run(req).await;
        return store_and_forward(&state, &key, response).await;
    }

    let response = next.run(req).await;

    if is_mutation(&method) && response.status().is_success() {
        tracing::debug!(%method, %path, "Mutation succeeded, flushing response cache");
        state.cache.delete_pattern(&request_flush_pattern()).await;
    }

    response
}

fn is_mutation(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn cached_response(bytes: Vec<u8>, state: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE.as_str(), "application/json"),
            (X_CACHE, state),
        ],
        bytes,
    )
        .into_response()
}

/// Buffers a fresh response, caches it when it qualifies, and forwards
/// it with `X-Cache: MISS` either way.
async fn store_and_forward(state: &AppState, key: &str, response: Response) -> Response {
    let (mut parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let is_json = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if parts.status == StatusCode::OK && is_json {
        state.cache.set_raw(key, &bytes, None).await;
    }

    parts.headers.insert(X_CACHE, HeaderValue::from_static("MISS"));
    Response::from_parts(parts, Body::from(bytes))
}

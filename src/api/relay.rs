//! Passthrough endpoints for the external data relay.
//!
//! Both routes sit behind the auth gate and forward a single GET upstream.
//! Upstream failures surface as 502; internals go to the log, never to the
//! caller.

use crate::api::routes::AppState;
use crate::auth::middleware::extract_account;
use crate::upstream::jsonplaceholder::{Photo, Post};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Relayed photos - GET /photos
pub async fn photos(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Vec<Photo>>, RelayError> {
    let account = extract_account(&req).ok_or(RelayError::Unauthorized)?;
    let username = account.username.clone();

    state.relay.get_photos().await.map(Json).map_err(|err| {
        error!(user = %username, "Error fetching photos from upstream: {:#}", err);
        RelayError::UpstreamUnavailable
    })
}

/// Relayed posts - GET /posts
pub async fn posts(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Vec<Post>>, RelayError> {
    let account = extract_account(&req).ok_or(RelayError::Unauthorized)?;
    let username = account.username.clone();

    state.relay.get_posts().await.map(Json).map_err(|err| {
        error!(user = %username, "Error fetching posts from upstream: {:#}", err);
        RelayError::UpstreamUnavailable
    })
}

/// Relay endpoint errors
#[derive(Debug)]
pub enum RelayError {
    Unauthorized,
    UpstreamUnavailable,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RelayError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Could not validate credentials")
            }
            RelayError::UpstreamUnavailable => {
                (StatusCode::BAD_GATEWAY, "Upstream service unavailable")
            }
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_error_responses() {
        let unavailable = RelayError::UpstreamUnavailable.into_response();
        assert_eq!(unavailable.status(), StatusCode::BAD_GATEWAY);

        let unauthorized = RelayError::Unauthorized.into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            unauthorized.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}

//! Authentication Middleware
//! Mission: Resolve bearer tokens into active accounts before handlers run

use crate::auth::{jwt::TokenService, models::Account, user_store::UserStore};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// State handed to the auth gate
#[derive(Clone)]
pub struct AuthGate {
    pub store: Arc<UserStore>,
    pub tokens: Arc<TokenService>,
}

/// Auth gate that resolves the bearer token into an active account.
///
/// On success the `Account` is inserted into request extensions for handlers.
/// An unknown subject is reported identically to a bad token so the endpoint
/// cannot be used to enumerate usernames.
pub async fn require_account(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or(AuthError::MissingToken)?;

    let claims = gate
        .tokens
        .verify(&token)
        .map_err(|_| AuthError::InvalidToken)?;

    let account = gate.store.get(&claims.sub).ok_or(AuthError::InvalidToken)?;

    if account.disabled {
        return Err(AuthError::Inactive);
    }

    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}

/// Extract the resolved account from a request (use after the auth gate)
pub fn extract_account(req: &Request) -> Option<&Account> {
    req.extensions().get::<Account>()
}

/// Auth gate rejections
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    Inactive,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Not authenticated"),
            AuthError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Could not validate credentials")
            }
            AuthError::Inactive => (StatusCode::BAD_REQUEST, "Inactive user"),
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
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    #[test]
    fn test_auth_error_responses() {
        let missing = AuthError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            missing.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let invalid = AuthError::InvalidToken.into_response();
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);

        let inactive = AuthError::Inactive.into_response();
        assert_eq!(inactive.status(), StatusCode::BAD_REQUEST);
        assert!(inactive.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_extract_account_from_request() {
        let mut req = HttpRequest::new(Body::empty());
        assert!(extract_account(&req).is_none());

        let account = Account {
            username: "alice".to_string(),
            hashed_password: "hash".to_string(),
            full_name: None,
            email: None,
            disabled: false,
        };
        req.extensions_mut().insert(account);

        let extracted = extract_account(&req);
        assert!(extracted.is_some());
        assert_eq!(extracted.unwrap().username, "alice");
    }
}

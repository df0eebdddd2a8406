//! Authentication API Endpoints
//! Mission: Provide registration, login, and profile endpoints

use crate::api::routes::AppState;
use crate::auth::{
    middleware::extract_account,
    models::{Account, LoginRequest, OwnedItem, RegisterRequest, TokenResponse},
    user_store::{self, StoreError},
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::json;
use tokio::task;
use tracing::{error, info, warn};

/// Register endpoint - POST /register/
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<Account>, AuthApiError> {
    if payload.username.trim().is_empty() {
        return Err(AuthApiError::Validation("username must not be empty"));
    }
    if payload.password.is_empty() {
        return Err(AuthApiError::Validation("password must not be empty"));
    }

    // bcrypt is deliberately slow; keep it off the async dispatch path
    let password = payload.password.clone();
    let hashed = task::spawn_blocking(move || user_store::hash_password(&password))
        .await
        .map_err(|_| AuthApiError::Internal)?
        .map_err(|err| {
            error!("Password hashing failed: {:#}", err);
            AuthApiError::Internal
        })?;

    let account = Account::from_registration(&payload, hashed);
    state.store.insert(account.clone()).map_err(|err| match err {
        StoreError::UsernameTaken => AuthApiError::UsernameTaken,
    })?;

    Ok(Json(account))
}

/// Login endpoint - POST /token (form-encoded)
pub async fn login(
    State(state): State<AppState>,
    Form(payload): Form<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthApiError> {
    info!("🔐 Login attempt: {}", payload.username);

    let Some(account) = state.store.get(&payload.username) else {
        warn!("❌ Login attempt for unknown user: {}", payload.username);
        return Err(AuthApiError::InvalidCredentials);
    };

    let hashed = account.hashed_password.clone();
    let password = payload.password;
    let valid = task::spawn_blocking(move || user_store::verify_password(&password, &hashed))
        .await
        .map_err(|_| AuthApiError::Internal)?
        .map_err(|err| {
            error!("Password verification failed: {:#}", err);
            AuthApiError::Internal
        })?;

    // Disabled accounts get the same rejection as a bad password
    if !valid || account.disabled {
        warn!("❌ Failed login attempt: {}", account.username);
        return Err(AuthApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(&account.username).map_err(|err| {
        error!("Token issuance failed: {:#}", err);
        AuthApiError::Internal
    })?;

    info!("✅ Login successful: {}", account.username);

    Ok(Json(TokenResponse::bearer(token)))
}

/// Current account - GET /users/me/
pub async fn current_user(req: Request) -> Result<Json<Account>, AuthApiError> {
    let account = extract_account(&req).ok_or(AuthApiError::Unauthorized)?;
    Ok(Json(account.clone()))
}

/// Items owned by the current account - GET /users/me/items/
pub async fn current_user_items(req: Request) -> Result<Json<Vec<OwnedItem>>, AuthApiError> {
    let account = extract_account(&req).ok_or(AuthApiError::Unauthorized)?;

    Ok(Json(vec![OwnedItem {
        item_id: "Foo".to_string(),
        owner: account.username.clone(),
    }]))
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    Validation(&'static str),
    UsernameTaken,
    InvalidCredentials,
    Unauthorized,
    Internal,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthApiError::UsernameTaken => (StatusCode::BAD_REQUEST, "Username already registered"),
            AuthApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Incorrect username or password")
            }
            AuthApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Could not validate credentials")
            }
            AuthApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
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
    fn test_auth_api_error_responses() {
        let validation = AuthApiError::Validation("username must not be empty").into_response();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let taken = AuthApiError::UsernameTaken.into_response();
        assert_eq!(taken.status(), StatusCode::BAD_REQUEST);

        let creds = AuthApiError::InvalidCredentials.into_response();
        assert_eq!(creds.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            creds.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let internal = AuthApiError::Internal.into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

use axum::{
    middleware::from_fn_with_state,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::relay;
use crate::auth::{api as auth_api, jwt::TokenService, require_account, AuthGate, UserStore};
use crate::middleware::{audit_log, AuditContext};
use crate::upstream::JsonPlaceholderClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserStore>,
    pub tokens: Arc<TokenService>,
    pub relay: Arc<JsonPlaceholderClient>,
}

/// Create the API router.
///
/// The audit middleware is the outermost layer so every inbound request,
/// including rejected ones, produces exactly one audit record.
pub fn create_router(state: AppState, log_raw_tokens: bool) -> Router {
    let gate = AuthGate {
        store: state.store.clone(),
        tokens: state.tokens.clone(),
    };
    let audit = AuditContext { log_raw_tokens };

    let protected = Router::new()
        .route("/users/me/", get(auth_api::current_user))
        .route("/users/me/items/", get(auth_api::current_user_items))
        .route("/photos", get(relay::photos))
        .route("/posts", get(relay::posts))
        .route_layer(from_fn_with_state(gate, require_account));

    Router::new()
        .route("/", get(root))
        .route("/register/", post(auth_api::register))
        .route("/token", post(auth_api::login))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(from_fn_with_state(audit, audit_log))
        .with_state(state)
}

// ===== Route Handlers =====

/// Welcome endpoint
async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the JWT Authentication API!".to_string(),
    })
}

// ===== Response Types =====

#[derive(Serialize)]
struct WelcomeResponse {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_root_welcome_message() {
        let Json(body) = root().await;
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "message": "Welcome to the JWT Authentication API!" })
        );
    }
}

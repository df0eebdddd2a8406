//! Request audit middleware.
//!
//! Wraps every HTTP request and emits exactly one audit record after the
//! response is determined, success or failure: identity, raw token, method,
//! path, status code, and latency.

use crate::auth::jwt::TokenService;
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{error, info};

/// Identity logged when no Authorization header is present
pub const IDENTITY_UNAUTHENTICATED: &str = "unauthenticated";
/// Identity logged when a bearer token is present but undecodable
pub const IDENTITY_INVALID_TOKEN: &str = "invalid_token";

/// Token field logged when no bearer token is present
const TOKEN_ABSENT: &str = "N/A";
/// Token field logged when raw-token logging is disabled
const TOKEN_REDACTED: &str = "[redacted]";

/// Login/registration bodies are tiny; anything beyond this is rejected
/// outright rather than buffered.
const BODY_PEEK_LIMIT: usize = 64 * 1024;

/// State handed to the audit middleware
#[derive(Clone)]
pub struct AuditContext {
    /// Log the literal bearer token with each request. Unsafe outside of
    /// demos and explicitly intentional here for audit completeness; turn
    /// off via AUDIT_LOG_RAW_TOKENS.
    pub log_raw_tokens: bool,
}

/// Middleware that audits every request with identity and timing.
///
/// Identity extraction is a best-effort peek (`TokenService::peek_subject`)
/// and never influences authorization; the auth gate does its own full
/// validation. The middleware re-surfaces the handler's response unchanged.
pub async fn audit_log(State(ctx): State<AuditContext>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    let mut identity = classify_identity(bearer.as_deref());

    let token_display = match (&bearer, ctx.log_raw_tokens) {
        (None, _) => TOKEN_ABSENT.to_string(),
        (Some(token), true) => token.clone(),
        (Some(_), false) => TOKEN_REDACTED.to_string(),
    };

    // Login and registration attempts carry no token yet; attribute them by
    // peeking the request body's username, then hand the handler an
    // untouched reconstruction.
    let response = if method == Method::POST && (path == "/token" || path == "/register/") {
        match peek_request_username(req, &path).await {
            Ok((req, username)) => {
                if let Some(username) = username {
                    identity = username;
                }
                next.run(req).await
            }
            Err(status) => status.into_response(),
        }
    } else {
        next.run(req).await
    };

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;

    if status >= 400 {
        error!(
            user = %identity,
            token = %token_display,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "API request failed"
        );
    } else {
        info!(
            user = %identity,
            token = %token_display,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "API request succeeded"
        );
    }

    response
}

/// Identity for the audit record: the peeked token subject, or a sentinel
/// when there is no token or the token does not decode.
fn classify_identity(bearer: Option<&str>) -> String {
    match bearer {
        None => IDENTITY_UNAUTHENTICATED.to_string(),
        Some(token) => TokenService::peek_subject(token)
            .unwrap_or_else(|| IDENTITY_INVALID_TOKEN.to_string()),
    }
}

/// Buffer the request body, pull out the `username` field if there is one,
/// and rebuild the request for the handler.
async fn peek_request_username(
    req: Request,
    path: &str,
) -> Result<(Request, Option<String>), StatusCode> {
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, BODY_PEEK_LIMIT)
        .await
        .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

    let username = username_from_body(path, &bytes);
    Ok((Request::from_parts(parts, Body::from(bytes)), username))
}

/// Best-effort username extraction from a login (form) or registration
/// (JSON) body. Parse failures are not this middleware's problem to report.
fn username_from_body(path: &str, bytes: &[u8]) -> Option<String> {
    match path {
        "/register/" => serde_json::from_slice::<serde_json::Value>(bytes)
            .ok()?
            .get("username")?
            .as_str()
            .map(|s| s.to_string()),
        "/token" => {
            let mut fields: HashMap<String, String> =
                serde_urlencoded::from_bytes(bytes).ok()?;
            fields.remove("username")
        }
        _ => None,
    }
}

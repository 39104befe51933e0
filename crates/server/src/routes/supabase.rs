//! Supabase demo endpoints
//!
//! Auth and query actions proxy to the backend client when one was
//! bootstrapped. In demo or disabled mode they answer 503 without calling
//! anything.
//!
//! The backend client is shared by every caller and holds no session.
//! Sign-in hands the session tokens to the caller, who sends the access
//! token back as `Authorization: Bearer <token>`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use starter_core::config::Classification;
use supabase_client::{BackendApi, ClientError, Credentials, Session, User};

use crate::state::AppState;

const TEST_TABLE: &str = "_test";
const NOT_AUTHENTICATED: &str = "Not authenticated";

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type RouteError = (StatusCode, Json<ErrorResponse>);

fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Map a backend error to a response. Client-side (4xx) statuses from
/// Supabase pass through, anything else is a bad gateway.
fn backend_error(e: ClientError) -> RouteError {
    let status = match &e {
        ClientError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ClientError::Api { status, .. } => StatusCode::from_u16(*status)
            .ok()
            .filter(StatusCode::is_client_error)
            .unwrap_or(StatusCode::BAD_GATEWAY),
        ClientError::Http(_) | ClientError::Decode(_) => StatusCode::BAD_GATEWAY,
    };
    route_error(status, e.to_string())
}

fn require_backend(state: &AppState) -> Result<Arc<dyn BackendApi>, RouteError> {
    match state.backend() {
        Some(backend) => Ok(Arc::clone(backend)),
        None => {
            let message = match state.classification() {
                Classification::Disabled => "Supabase is disabled",
                _ => "Supabase is running in demo mode",
            };
            Err(route_error(StatusCode::SERVICE_UNAVAILABLE, message))
        }
    }
}

/// Caller's access token, if any. A present but malformed header is
/// rejected rather than silently treated as anonymous.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, RouteError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| route_error(StatusCode::UNAUTHORIZED, "Invalid Authorization header"))?;
    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(Some(token)),
        _ => Err(route_error(
            StatusCode::UNAUTHORIZED,
            "Authorization must be Bearer token",
        )),
    }
}

#[derive(Debug, Deserialize)]
struct CredentialsRequest {
    email: String,
    password: String,
}

impl From<CredentialsRequest> for Credentials {
    fn from(req: CredentialsRequest) -> Self {
        Credentials::new(req.email, req.password)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserSummary {
    id: String,
    email: Option<String>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    status: Classification,
    status_label: &'static str,
    demo_mode: bool,
    configured: bool,
    supabase_url: String,
    authenticated: bool,
    auth_status: String,
    user: Option<UserSummary>,
}

/// Tokens handed to the caller; the server keeps no copy
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionTokens {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
}

impl From<&Session> for SessionTokens {
    fn from(session: &Session) -> Self {
        Self {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    user: UserSummary,
    session: SessionTokens,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    user: Option<UserSummary>,
    session: Option<SessionTokens>,
    confirmation_required: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignOutResponse {
    signed_out: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    table: &'static str,
    data: Vec<Value>,
}

/// Resolve the caller's user. Rejected or expired tokens read as signed out.
async fn caller_user(backend: &dyn BackendApi, access_token: &str) -> Option<User> {
    match backend.current_user(access_token).await {
        Ok(user) => Some(user),
        Err(e) if matches!(e.status(), Some(401 | 403)) => {
            debug!("Access token rejected: {}", e);
            None
        }
        Err(e) => {
            warn!("Failed to resolve current user: {}", e);
            None
        }
    }
}

/// GET /api/supabase/status
async fn get_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, RouteError> {
    let classification = state.classification();
    let user = match (state.backend(), bearer_token(&headers)?) {
        (Some(backend), Some(token)) => caller_user(&**backend, token).await,
        _ => None,
    };

    let auth_status = user
        .as_ref()
        .and_then(|user| user.email.clone())
        .unwrap_or_else(|| NOT_AUTHENTICATED.to_string());

    Ok(Json(StatusResponse {
        status: classification,
        status_label: classification.label(),
        demo_mode: classification.is_demo(),
        configured: classification.is_live(),
        supabase_url: state.public_config().supabase_url.clone(),
        authenticated: user.is_some(),
        auth_status,
        user: user.map(UserSummary::from),
    }))
}

/// POST /api/supabase/sign-in
async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SignInResponse>, RouteError> {
    let backend = require_backend(&state)?;

    let credentials = Credentials::from(req);
    let session = backend
        .sign_in_with_password(&credentials)
        .await
        .map_err(|e| {
            error!("Sign in error: {}", e);
            backend_error(e)
        })?;

    Ok(Json(SignInResponse {
        session: SessionTokens::from(&session),
        user: session.user.into(),
    }))
}

/// POST /api/supabase/sign-up
async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), RouteError> {
    let backend = require_backend(&state)?;

    let credentials = Credentials::from(req);
    let response = backend.sign_up(&credentials).await.map_err(|e| {
        error!("Sign up error: {}", e);
        backend_error(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            confirmation_required: response.confirmation_required(),
            session: response.session.as_ref().map(SessionTokens::from),
            user: response.user.map(UserSummary::from),
        }),
    ))
}

/// POST /api/supabase/sign-out
///
/// Revokes only the caller's session. Without a token there is nothing to
/// revoke and the call succeeds.
async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SignOutResponse>, RouteError> {
    let backend = require_backend(&state)?;

    let Some(token) = bearer_token(&headers)? else {
        debug!("Sign out requested without an access token");
        return Ok(Json(SignOutResponse { signed_out: true }));
    };

    backend.sign_out(token).await.map_err(|e| {
        error!("Sign out error: {}", e);
        backend_error(e)
    })?;

    Ok(Json(SignOutResponse { signed_out: true }))
}

/// POST /api/supabase/test-query
async fn test_query(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<QueryResponse>, RouteError> {
    let backend = require_backend(&state)?;
    let token = bearer_token(&headers)?;

    let data = backend
        .select(token, TEST_TABLE, "*", 1)
        .await
        .map_err(|e| {
            error!("Query error: {}", e);
            backend_error(e)
        })?;

    info!("Test query returned {} row(s)", data.len());
    Ok(Json(QueryResponse {
        table: TEST_TABLE,
        data,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/supabase/status", get(get_status))
        .route("/api/supabase/sign-in", post(sign_in))
        .route("/api/supabase/sign-up", post(sign_up))
        .route("/api/supabase/sign-out", post(sign_out))
        .route("/api/supabase/test-query", post(test_query))
}

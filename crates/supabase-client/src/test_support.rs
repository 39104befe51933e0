//! In-process stand-in for the Supabase HTTP APIs

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;

pub const ANON_KEY: &str = "test-anon-key";

/// Access token the fake issues for `email`
pub fn access_token_for(email: &str) -> String {
    format!("token-{}", email)
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub apikey: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Live access token -> user JSON
    sessions: Arc<Mutex<HashMap<String, Value>>>,
}

impl Recorder {
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

fn user_json(email: &str) -> Value {
    json!({ "id": format!("user-{}", email), "email": email })
}

async fn issue_session(recorder: &Recorder, email: &str) -> Value {
    let access_token = access_token_for(email);
    let user = user_json(email);
    recorder
        .sessions
        .lock()
        .await
        .insert(access_token.clone(), user.clone());

    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_900_000_000,
        "refresh_token": format!("refresh-{}", email),
        "user": user
    })
}

fn invalid_jwt() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "invalid JWT" }))).into_response()
}

async fn handle(State(recorder): State<Recorder>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        apikey: header("apikey"),
        authorization: header("authorization"),
    };
    recorder.requests.lock().await.push(recorded.clone());

    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let email = payload["email"].as_str().unwrap_or_default().to_string();
    let bearer = recorded
        .authorization
        .as_deref()
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();

    match (recorded.method.as_str(), recorded.path.as_str()) {
        ("POST", "/auth/v1/token") => {
            if payload["password"] == "correct" {
                Json(issue_session(&recorder, &email).await).into_response()
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_grant",
                        "error_description": "Invalid login credentials"
                    })),
                )
                    .into_response()
            }
        }
        ("POST", "/auth/v1/signup") => {
            if email == "confirm@example.com" {
                Json(json!({ "id": "user-confirm", "email": email })).into_response()
            } else {
                Json(issue_session(&recorder, &email).await).into_response()
            }
        }
        ("POST", "/auth/v1/logout") => {
            let revoked = recorder.sessions.lock().await.remove(&bearer);
            match revoked {
                Some(_) => StatusCode::NO_CONTENT.into_response(),
                None => invalid_jwt(),
            }
        }
        ("GET", "/auth/v1/user") => {
            let user = recorder.sessions.lock().await.get(&bearer).cloned();
            match user {
                Some(user) => Json(user).into_response(),
                None => invalid_jwt(),
            }
        }
        ("GET", "/rest/v1/_test") => Json(json!([{ "id": 1 }])).into_response(),
        ("GET", path) if path.starts_with("/rest/v1/") => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "code": "42P01",
                "details": null,
                "hint": null,
                "message": "Table does not exist"
            })),
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Start the fake on an ephemeral port and return its base URL
pub async fn spawn_fake_supabase() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new().fallback(handle).with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), recorder)
}

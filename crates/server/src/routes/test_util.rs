//! Shared helpers for route tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use starter_core::analytics::AnalyticsTracker;
use starter_core::config::{AnalyticsConfig, Classification, RuntimeConfig, SupabaseConfig};
use starter_core::counter::ExampleStore;
use supabase_client::{
    bootstrap_with, BackendApi, ClientError, Credentials, Session, SignUpResponse, User,
};
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::state::AppState;

pub const REAL_URL: &str = "https://real-project.supabase.co";

/// In-memory backend recording every call. Sessions are keyed by access
/// token, like the real auth server.
#[derive(Default)]
pub struct MockBackend {
    pub sessions: Mutex<HashMap<String, User>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_sign_out: bool,
    pub missing_tables: bool,
}

impl MockBackend {
    pub fn signed_in(email: &str) -> Self {
        let sessions = HashMap::from([(token_for(email), test_user(email))]);
        Self {
            sessions: Mutex::new(sessions),
            ..Default::default()
        }
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

/// Access token the mock issues for `email`
pub fn token_for(email: &str) -> String {
    format!("token-{}", email)
}

pub fn test_user(email: &str) -> User {
    User {
        id: format!("id-{}", email),
        email: Some(email.to_string()),
        created_at: None,
        email_confirmed_at: None,
    }
}

fn invalid_jwt() -> ClientError {
    ClientError::Api {
        status: 401,
        message: "invalid JWT".to_string(),
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn sign_in_with_password(&self, credentials: &Credentials) -> supabase_client::Result<Session> {
        self.calls.lock().await.push(format!("sign_in:{}", credentials.email));
        if credentials.email.is_empty() {
            return Err(ClientError::invalid_input("Email is required"));
        }
        if credentials.password != "password123" {
            return Err(ClientError::Api {
                status: 400,
                message: "Invalid login credentials".to_string(),
            });
        }

        let user = test_user(&credentials.email);
        let access_token = token_for(&credentials.email);
        self.sessions
            .lock()
            .await
            .insert(access_token.clone(), user.clone());
        Ok(Session {
            access_token,
            token_type: Some("bearer".to_string()),
            expires_in: Some(3600),
            expires_at: Some(1_900_000_000),
            refresh_token: Some(format!("refresh-{}", credentials.email)),
            user,
        })
    }

    async fn sign_up(&self, credentials: &Credentials) -> supabase_client::Result<SignUpResponse> {
        self.calls.lock().await.push(format!("sign_up:{}", credentials.email));
        Ok(SignUpResponse {
            user: Some(test_user(&credentials.email)),
            session: None,
        })
    }

    async fn sign_out(&self, access_token: &str) -> supabase_client::Result<()> {
        self.calls.lock().await.push(format!("sign_out:{}", access_token));
        if self.fail_sign_out {
            return Err(ClientError::Api {
                status: 500,
                message: "Sign out failed".to_string(),
            });
        }
        match self.sessions.lock().await.remove(access_token) {
            Some(_) => Ok(()),
            None => Err(invalid_jwt()),
        }
    }

    async fn current_user(&self, access_token: &str) -> supabase_client::Result<User> {
        self.sessions
            .lock()
            .await
            .get(access_token)
            .cloned()
            .ok_or_else(invalid_jwt)
    }

    async fn select(
        &self,
        access_token: Option<&str>,
        table: &str,
        columns: &str,
        limit: usize,
    ) -> supabase_client::Result<Vec<Value>> {
        self.calls.lock().await.push(format!(
            "select:{}:{}:{}:{}",
            access_token.unwrap_or("anon"),
            table,
            columns,
            limit
        ));
        if self.missing_tables {
            return Err(ClientError::Api {
                status: 404,
                message: "Table does not exist".to_string(),
            });
        }
        Ok(vec![json!({ "id": 1 })])
    }
}

fn supabase_config(classification: Classification) -> SupabaseConfig {
    match classification {
        Classification::Disabled => SupabaseConfig::new(false, REAL_URL, "real-key"),
        Classification::Demo => SupabaseConfig::default(),
        Classification::Live => SupabaseConfig::new(true, REAL_URL, "real-key"),
    }
}

/// Build state through the real bootstrap; `backend` is only used when live
pub fn build_state(
    classification: Classification,
    backend: Option<Arc<MockBackend>>,
    tracker: AnalyticsTracker,
) -> AppState {
    let supabase = supabase_config(classification);
    let backend: Arc<dyn BackendApi> = backend.unwrap_or_default();
    let bootstrap = bootstrap_with(&supabase, move |_, _| backend);

    let config = RuntimeConfig {
        supabase,
        analytics: AnalyticsConfig {
            gtag_id: tracker.gtag_id().map(str::to_string),
            api_secret: None,
        },
        ..Default::default()
    };

    AppState::new(config.public(), bootstrap, tracker, ExampleStore::new())
}

pub fn state_with(
    classification: Classification,
    backend: Option<Arc<MockBackend>>,
    gtag_id: Option<&str>,
) -> AppState {
    build_state(
        classification,
        backend,
        AnalyticsTracker::new(gtag_id.map(str::to_string), None),
    )
}

pub async fn send_as(
    app: Router,
    method: Method,
    uri: &str,
    access_token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = access_token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(body) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let payload = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, payload)
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send_as(app, method, uri, None, body).await
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

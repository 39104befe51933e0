//! Auth API (GoTrue)

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::SupabaseClient;
use crate::error::{ClientError, Result};

/// Email + password pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(ClientError::invalid_input("Email is required"));
        }
        if self.password.is_empty() {
            return Err(ClientError::invalid_input("Password is required"));
        }
        Ok(())
    }
}

/// Authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
}

/// Session returned by a successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

/// Result of a sign-up.
///
/// `session` is absent when the project requires email confirmation.
#[derive(Debug, Clone)]
pub struct SignUpResponse {
    pub user: Option<User>,
    pub session: Option<Session>,
}

impl SignUpResponse {
    pub fn confirmation_required(&self) -> bool {
        self.session.is_none()
    }

    fn from_value(value: Value) -> Result<Self> {
        if value.get("access_token").is_some() {
            let session: Session = serde_json::from_value(value)?;
            return Ok(Self {
                user: Some(session.user.clone()),
                session: Some(session),
            });
        }

        let user = if let Some(user) = value.get("user").filter(|user| !user.is_null()) {
            Some(serde_json::from_value(user.clone())?)
        } else if value.get("id").is_some() {
            Some(serde_json::from_value(value)?)
        } else {
            None
        };

        Ok(Self {
            user,
            session: None,
        })
    }
}

/// Auth operations on a [`SupabaseClient`].
///
/// Nothing is remembered between calls: sign-in hands the session back and
/// later calls take the access token explicitly.
pub struct AuthClient<'a> {
    client: &'a SupabaseClient,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(client: &'a SupabaseClient) -> Self {
        Self { client }
    }

    /// Sign in with email and password
    pub async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session> {
        credentials.validate()?;

        let url = self.client.endpoint("/auth/v1/token");
        let req = self
            .client
            .request(Method::POST, url, None)
            .query(&[("grant_type", "password")])
            .json(credentials);

        let session: Session = self.client.send_json(req).await?;
        info!("Signed in as {}", session.user.email.as_deref().unwrap_or(&session.user.id));
        Ok(session)
    }

    /// Register a new user
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResponse> {
        credentials.validate()?;

        let url = self.client.endpoint("/auth/v1/signup");
        let req = self.client.request(Method::POST, url, None).json(credentials);

        let value: Value = self.client.send_json(req).await?;
        let response = SignUpResponse::from_value(value)?;

        debug!(
            "Signed up {} (confirmation required: {})",
            credentials.email,
            response.confirmation_required()
        );
        Ok(response)
    }

    /// Revoke the session owning `access_token`
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let access_token = require_token(access_token)?;

        let url = self.client.endpoint("/auth/v1/logout");
        let req = self.client.request(Method::POST, url, Some(access_token));

        if let Err(e) = self.client.send_empty(req).await {
            warn!("Sign out request failed: {}", e);
            return Err(e);
        }

        info!("Signed out");
        Ok(())
    }

    /// User owning `access_token`
    pub async fn get_user(&self, access_token: &str) -> Result<User> {
        let access_token = require_token(access_token)?;

        let url = self.client.endpoint("/auth/v1/user");
        let req = self.client.request(Method::GET, url, Some(access_token));
        self.client.send_json(req).await
    }
}

fn require_token(access_token: &str) -> Result<&str> {
    let access_token = access_token.trim();
    if access_token.is_empty() {
        return Err(ClientError::invalid_input("Access token is required"));
    }
    Ok(access_token)
}

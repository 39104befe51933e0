//! Backend seam used by the server

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::{Credentials, Session, SignUpResponse, User};
use crate::client::SupabaseClient;
use crate::error::Result;

/// Operations the demo API needs from the backend.
///
/// Implementations are shared by every caller, so user-scoped calls take
/// the caller's access token instead of relying on stored state.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session>;

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResponse>;

    async fn sign_out(&self, access_token: &str) -> Result<()>;

    async fn current_user(&self, access_token: &str) -> Result<User>;

    async fn select(
        &self,
        access_token: Option<&str>,
        table: &str,
        columns: &str,
        limit: usize,
    ) -> Result<Vec<Value>>;
}

#[async_trait]
impl BackendApi for SupabaseClient {
    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session> {
        self.auth().sign_in_with_password(credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResponse> {
        self.auth().sign_up(credentials).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        self.auth().sign_out(access_token).await
    }

    async fn current_user(&self, access_token: &str) -> Result<User> {
        self.auth().get_user(access_token).await
    }

    async fn select(
        &self,
        access_token: Option<&str>,
        table: &str,
        columns: &str,
        limit: usize,
    ) -> Result<Vec<Value>> {
        let query = self.from(table).select(columns).limit(limit);
        match access_token {
            Some(token) => query.with_access_token(token).execute().await,
            None => query.execute().await,
        }
    }
}

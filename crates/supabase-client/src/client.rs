use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::query::QueryBuilder;

/// Handle to a Supabase project.
///
/// The client holds no user session. Callers keep the [`Session`] returned
/// by sign-in and pass its access token to calls that act as that user, so
/// one client can serve many users. Clones share the connection pool.
///
/// [`Session`]: crate::auth::Session
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: Client,
    url: String,
    key: String,
}

impl SupabaseClient {
    /// Create a client for the given project URL and anon key.
    ///
    /// Nothing is validated here; a bad URL shows up as an error on the
    /// first request.
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        let url = url.into().trim().trim_end_matches('/').to_string();
        Self {
            inner: Arc::new(ClientInner {
                http: Client::new(),
                url,
                key: key.into(),
            }),
        }
    }

    /// Project URL
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Auth API
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(self)
    }

    /// Start a query against a table
    pub fn from(&self, table: impl Into<String>) -> QueryBuilder<'_> {
        QueryBuilder::new(self, table.into())
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.inner.url, path)
    }

    /// Request carrying the anon key, authorized as the user owning
    /// `access_token` when one is given
    pub(crate) fn request(
        &self,
        method: Method,
        url: String,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        self.inner
            .http
            .request(method, url)
            .header("apikey", &self.inner.key)
            .bearer_auth(access_token.unwrap_or(self.inner.key.as_str()))
    }

    /// Send a request and decode a JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let body = Self::checked(req.send().await?).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request and ignore the body
    pub(crate) async fn send_empty(&self, req: RequestBuilder) -> Result<()> {
        Self::checked(req.send().await?).await?;
        Ok(())
    }

    async fn checked(res: Response) -> Result<String> {
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(ClientError::from_response(status, &body));
        }
        Ok(body)
    }
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("url", &self.inner.url)
            .finish_non_exhaustive()
    }
}

//! PostgREST query builder

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::client::SupabaseClient;
use crate::error::Result;

/// `from(table).select(columns).limit(n)` style query
pub struct QueryBuilder<'a> {
    client: &'a SupabaseClient,
    table: String,
    columns: String,
    limit: Option<usize>,
    access_token: Option<String>,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(client: &'a SupabaseClient, table: String) -> Self {
        Self {
            client,
            table,
            columns: "*".to_string(),
            limit: None,
            access_token: None,
        }
    }

    /// Columns to return, PostgREST syntax
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    /// Maximum number of rows
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run as the user owning `access_token` instead of the anon role
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", self.columns.clone())];
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }

    /// Run the query and return the rows
    pub async fn execute(self) -> Result<Vec<Value>> {
        let url = self.client.endpoint(&format!(
            "/rest/v1/{}",
            urlencoding::encode(&self.table)
        ));
        debug!("Querying table {} (limit {:?})", self.table, self.limit);

        let req = self
            .client
            .request(Method::GET, url, self.access_token.as_deref())
            .query(&self.query_params());

        self.client.send_json(req).await
    }
}

//! Event sinks
//!
//! [`EventSink`] is the server-side stand-in for the browser's global
//! `gtag` function. [`MeasurementProtocolSink`] forwards events to Google
//! Analytics 4 through the Measurement Protocol.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::event::AnalyticsEvent;
use crate::config::AnalyticsConfig;
use crate::{Error, Result};

pub const MEASUREMENT_PROTOCOL_URL: &str = "https://www.google-analytics.com/mp/collect";

/// Destination for analytics events
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver a single event
    async fn send(&self, event: &AnalyticsEvent) -> Result<()>;
}

#[derive(Serialize)]
struct CollectRequest<'a> {
    client_id: &'a str,
    events: [CollectEvent<'a>; 1],
}

#[derive(Serialize)]
struct CollectEvent<'a> {
    name: &'a str,
    params: &'a Map<String, Value>,
}

/// GA4 Measurement Protocol client
pub struct MeasurementProtocolSink {
    client: Client,
    endpoint: String,
    measurement_id: String,
    api_secret: String,
    client_id: String,
}

impl MeasurementProtocolSink {
    pub fn new(measurement_id: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: MEASUREMENT_PROTOCOL_URL.to_string(),
            measurement_id: measurement_id.into(),
            api_secret: api_secret.into(),
            // One pseudonymous client per process
            client_id: Uuid::new_v4().to_string(),
        }
    }

    /// Build a sink when both the measurement ID and the API secret are set
    pub fn from_config(config: &AnalyticsConfig) -> Option<Self> {
        match (&config.gtag_id, &config.api_secret) {
            (Some(id), Some(secret)) => Some(Self::new(id.clone(), secret.clone())),
            _ => None,
        }
    }

    /// Override the collect endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn measurement_id(&self) -> &str {
        &self.measurement_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    fn collect_url(&self) -> String {
        format!(
            "{}?measurement_id={}&api_secret={}",
            self.endpoint,
            urlencoding::encode(&self.measurement_id),
            urlencoding::encode(&self.api_secret)
        )
    }
}

#[async_trait]
impl EventSink for MeasurementProtocolSink {
    async fn send(&self, event: &AnalyticsEvent) -> Result<()> {
        let body = CollectRequest {
            client_id: &self.client_id,
            events: [CollectEvent {
                name: &event.name,
                params: &event.params,
            }],
        };

        debug!("Sending analytics event {} to {}", event.name, self.endpoint);

        // The collect URL carries the API secret; keep it out of errors
        let res = self
            .client
            .post(self.collect_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Analytics(format!(
                "Measurement Protocol returned {}: {}",
                status, text
            )));
        }

        Ok(())
    }
}

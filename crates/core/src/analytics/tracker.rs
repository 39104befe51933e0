//! Analytics tracker

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::event::AnalyticsEvent;
use super::sink::{EventSink, MeasurementProtocolSink};
use crate::config::AnalyticsConfig;

pub const NOT_CONFIGURED: &str = "Not configured";

/// How an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Handed to the sink successfully
    Sent,
    /// No sink configured, only logged
    Simulated,
    /// The sink rejected the event
    Failed,
}

/// Result of tracking one event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackOutcome {
    pub event: String,
    pub params: Map<String, Value>,
    pub delivery: Delivery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
    pub tracked_at: DateTime<Utc>,
}

/// Tracks events through an optional sink and remembers the last one
#[derive(Clone)]
pub struct AnalyticsTracker {
    gtag_id: Option<String>,
    sink: Option<Arc<dyn EventSink>>,
    last_event: Arc<RwLock<Option<TrackOutcome>>>,
}

impl AnalyticsTracker {
    pub fn new(gtag_id: Option<String>, sink: Option<Arc<dyn EventSink>>) -> Self {
        Self {
            gtag_id,
            sink,
            last_event: Arc::new(RwLock::new(None)),
        }
    }

    /// Build a tracker, wiring a Measurement Protocol sink when possible
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        let sink = MeasurementProtocolSink::from_config(config)
            .map(|sink| Arc::new(sink) as Arc<dyn EventSink>);

        match (&config.gtag_id, &sink) {
            (Some(id), Some(_)) => info!("Google Analytics events will be sent for {}", id),
            (Some(id), None) => warn!(
                "GTAG_ID {} is set but GTAG_API_SECRET is missing; events will be simulated",
                id
            ),
            (None, _) => info!("Google Analytics not configured; events will be simulated"),
        }

        Self::new(config.gtag_id.clone(), sink)
    }

    pub fn gtag_id(&self) -> Option<&str> {
        self.gtag_id.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.gtag_id.is_some()
    }

    /// Measurement ID, or `Not configured`
    pub fn status_label(&self) -> &str {
        self.gtag_id.as_deref().unwrap_or(NOT_CONFIGURED)
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Track an event. Sink failures are logged, never returned.
    pub async fn track(&self, event: AnalyticsEvent) -> TrackOutcome {
        let (delivery, error) = match &self.sink {
            Some(sink) => match sink.send(&event).await {
                Ok(()) => {
                    info!("Event tracked: {}", event.name);
                    (Delivery::Sent, None)
                }
                Err(e) => {
                    warn!("Failed to deliver analytics event {}: {}", event.name, e);
                    (Delivery::Failed, Some(e.to_string()))
                }
            },
            None => {
                info!("Google Analytics not configured. Event: {}", event.name);
                (Delivery::Simulated, None)
            }
        };

        let message = match delivery {
            Delivery::Sent => format!("Event tracked: {}", event.name),
            Delivery::Simulated => format!("Event tracked: {} (simulated)", event.name),
            Delivery::Failed => format!("Event tracked: {} (delivery failed)", event.name),
        };

        let outcome = TrackOutcome {
            event: event.name,
            params: event.params,
            delivery,
            error,
            message,
            tracked_at: Utc::now(),
        };

        *self.last_event.write().await = Some(outcome.clone());
        outcome
    }

    pub async fn last_event(&self) -> Option<TrackOutcome> {
        self.last_event.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    use super::*;
    use crate::analytics::DemoEvent;
    use crate::{Error, Result};

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<AnalyticsEvent>>,
        fail: bool,
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn send(&self, event: &AnalyticsEvent) -> Result<()> {
            if self.fail {
                return Err(Error::Analytics("collector unavailable".into()));
            }
            self.events.lock().await.push(event.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_track_with_sink() {
        let sink = Arc::new(RecordingSink::default());
        let tracker = AnalyticsTracker::new(Some("G-XXXXXXXXXX".into()), Some(sink.clone()));

        let outcome = tracker.track(DemoEvent::ButtonClick.to_event()).await;
        assert_eq!(outcome.delivery, Delivery::Sent);
        assert_eq!(outcome.message, "Event tracked: button_click");
        assert!(outcome.error.is_none());

        let events = sink.events.lock().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "button_click");
        assert_eq!(events[0].params["event_category"], json!("engagement"));
        assert_eq!(events[0].params["event_label"], json!("Demo Button"));
        assert_eq!(events[0].params["value"], json!(1));
    }

    #[tokio::test]
    async fn test_track_without_sink_is_simulated() {
        let tracker = AnalyticsTracker::new(None, None);
        assert!(!tracker.is_configured());
        assert_eq!(tracker.status_label(), "Not configured");

        let outcome = tracker.track(DemoEvent::ButtonClick.to_event()).await;
        assert_eq!(outcome.delivery, Delivery::Simulated);
        assert_eq!(outcome.message, "Event tracked: button_click (simulated)");
    }

    #[tokio::test]
    async fn test_sink_failure_is_not_an_error() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let tracker = AnalyticsTracker::new(Some("G-XXXXXXXXXX".into()), Some(sink));

        let outcome = tracker.track(DemoEvent::Share.to_event()).await;
        assert_eq!(outcome.delivery, Delivery::Failed);
        assert!(outcome.error.unwrap().contains("collector unavailable"));
        assert_eq!(outcome.message, "Event tracked: share (delivery failed)");
    }

    #[tokio::test]
    async fn test_last_event_is_remembered() {
        let tracker = AnalyticsTracker::new(Some("G-XXXXXXXXXX".into()), None);
        assert!(tracker.last_event().await.is_none());
        assert_eq!(tracker.status_label(), "G-XXXXXXXXXX");

        tracker.track(DemoEvent::CustomEvent.to_event()).await;
        tracker.track(DemoEvent::FileDownload.to_event()).await;

        let last = tracker.last_event().await.unwrap();
        assert_eq!(last.event, "file_download");
        assert_eq!(last.params["event_category"], json!("downloads"));
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_expose_api_secret() {
        // Bind and drop a listener to get a port nobody answers on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = MeasurementProtocolSink::new("G-ABC123", "TOP-SECRET-MP")
            .with_endpoint(format!("http://{}/mp/collect", addr));
        let tracker = AnalyticsTracker::new(Some("G-ABC123".into()), Some(Arc::new(sink)));

        let outcome = tracker.track(DemoEvent::ButtonClick.to_event()).await;
        assert_eq!(outcome.delivery, Delivery::Failed);
        assert!(outcome.error.is_some());

        let serialized = serde_json::to_string(&outcome).unwrap();
        assert!(!serialized.contains("TOP-SECRET-MP"), "{}", serialized);

        let last = serde_json::to_string(&tracker.last_event().await.unwrap()).unwrap();
        assert!(!last.contains("TOP-SECRET-MP"), "{}", last);
    }

    #[test]
    fn test_from_config_without_secret_has_no_sink() {
        let tracker = AnalyticsTracker::from_config(&AnalyticsConfig {
            gtag_id: Some("G-XXXXXXXXXX".into()),
            api_secret: None,
        });
        assert!(tracker.is_configured());
        assert!(!tracker.has_sink());

        let tracker = AnalyticsTracker::from_config(&AnalyticsConfig {
            gtag_id: Some("G-XXXXXXXXXX".into()),
            api_secret: Some("secret".into()),
        });
        assert!(tracker.has_sink());
    }
}

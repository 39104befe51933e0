//! Analytics event model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named event with free-form parameters, as passed to `gtag('event', ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl AnalyticsEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Map::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Page view event
    pub fn page_view(path: impl Into<String>, title: impl Into<String>) -> Self {
        let path: String = path.into();
        let title: String = title.into();
        Self::new("page_view")
            .with_param("page_location", path)
            .with_param("page_title", title)
    }
}

/// The canned events offered by the analytics demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoEvent {
    ButtonClick,
    CustomEvent,
    FileDownload,
    Share,
}

impl DemoEvent {
    pub const ALL: [DemoEvent; 4] = [
        DemoEvent::ButtonClick,
        DemoEvent::CustomEvent,
        DemoEvent::FileDownload,
        DemoEvent::Share,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DemoEvent::ButtonClick => "button_click",
            DemoEvent::CustomEvent => "custom_event",
            DemoEvent::FileDownload => "file_download",
            DemoEvent::Share => "share",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == name)
    }

    pub fn to_event(self) -> AnalyticsEvent {
        let event = AnalyticsEvent::new(self.as_str());
        match self {
            DemoEvent::ButtonClick => event
                .with_param("event_category", "engagement")
                .with_param("event_label", "Demo Button")
                .with_param("value", 1),
            DemoEvent::CustomEvent => event
                .with_param("event_category", "demo")
                .with_param("event_label", "Custom Demo Event")
                .with_param("value", 42),
            DemoEvent::FileDownload => event
                .with_param("event_category", "downloads")
                .with_param("event_label", "Demo File")
                .with_param("value", 1),
            DemoEvent::Share => event
                .with_param("event_category", "social")
                .with_param("event_label", "Demo Share")
                .with_param("method", "demo"),
        }
    }
}

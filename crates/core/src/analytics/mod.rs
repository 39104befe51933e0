//! Analytics event tracking
//!
//! Events are handed to an [`EventSink`] when one is configured. Without a
//! sink the tracker logs the event and reports it as simulated.

mod event;
mod sink;
mod tracker;

pub use event::{AnalyticsEvent, DemoEvent};
pub use sink::{EventSink, MeasurementProtocolSink, MEASUREMENT_PROTOCOL_URL};
pub use tracker::{AnalyticsTracker, Delivery, TrackOutcome, NOT_CONFIGURED};

//! Application state
//!
//! Everything handlers need is injected here once at startup; there is no
//! ambient lookup of the backend client.

use std::sync::Arc;

use starter_core::analytics::AnalyticsTracker;
use starter_core::config::{Classification, PublicRuntimeConfig, RuntimeConfig};
use starter_core::counter::ExampleStore;
use supabase_client::{BackendApi, Bootstrap};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    public_config: PublicRuntimeConfig,
    classification: Classification,
    backend: Option<Arc<dyn BackendApi>>,
    analytics: AnalyticsTracker,
    counter: ExampleStore,
}

impl AppState {
    /// Assemble state from already-built parts
    pub fn new(
        public_config: PublicRuntimeConfig,
        bootstrap: Bootstrap<Arc<dyn BackendApi>>,
        analytics: AnalyticsTracker,
        counter: ExampleStore,
    ) -> Self {
        let (classification, backend) = bootstrap.into_parts();
        Self {
            inner: Arc::new(AppStateInner {
                public_config,
                classification,
                backend,
                analytics,
                counter,
            }),
        }
    }

    /// Build state from runtime configuration, bootstrapping the Supabase
    /// client when the configuration is live
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let bootstrap = supabase_client::bootstrap(&config.supabase)
            .map_client(|client| Arc::new(client) as Arc<dyn BackendApi>);

        Self::new(
            config.public(),
            bootstrap,
            AnalyticsTracker::from_config(&config.analytics),
            ExampleStore::new(),
        )
    }

    pub fn public_config(&self) -> &PublicRuntimeConfig {
        &self.inner.public_config
    }

    pub fn classification(&self) -> Classification {
        self.inner.classification
    }

    /// Backend client, present only for live configurations
    pub fn backend(&self) -> Option<&Arc<dyn BackendApi>> {
        self.inner.backend.as_ref()
    }

    pub fn analytics(&self) -> &AnalyticsTracker {
        &self.inner.analytics
    }

    pub fn counter(&self) -> &ExampleStore {
        &self.inner.counter
    }
}

//! Environment-driven client bootstrap

use starter_core::config::{classify, Classification, SupabaseConfig};
use tracing::{debug, info, warn};

use crate::client::SupabaseClient;

/// Outcome of the startup bootstrap: the classification and, for live
/// configurations only, the constructed client.
#[derive(Debug)]
pub struct Bootstrap<C> {
    classification: Classification,
    client: Option<C>,
}

impl<C> Bootstrap<C> {
    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn client(&self) -> Option<&C> {
        self.client.as_ref()
    }

    pub fn into_parts(self) -> (Classification, Option<C>) {
        (self.classification, self.client)
    }

    /// Convert the client handle, e.g. into a trait object
    pub fn map_client<D, F>(self, f: F) -> Bootstrap<D>
    where
        F: FnOnce(C) -> D,
    {
        Bootstrap {
            classification: self.classification,
            client: self.client.map(f),
        }
    }
}

/// Classify `config` and build a client with `connect` when it is live.
///
/// `connect` is called at most once, and only for [`Classification::Live`].
pub fn bootstrap_with<C, F>(config: &SupabaseConfig, connect: F) -> Bootstrap<C>
where
    F: FnOnce(&str, &str) -> C,
{
    let classification = classify(config);

    let client = match classification {
        Classification::Disabled => {
            debug!("Supabase disabled, skipping client initialization");
            None
        }
        Classification::Demo => {
            warn!("Supabase is using demo credentials, skipping client initialization");
            None
        }
        Classification::Live => {
            info!("Initializing Supabase client for {}", config.url);
            Some(connect(&config.url, &config.key))
        }
    };

    Bootstrap {
        classification,
        client,
    }
}

/// Bootstrap a [`SupabaseClient`] from configuration
pub fn bootstrap(config: &SupabaseConfig) -> Bootstrap<SupabaseClient> {
    bootstrap_with(config, |url, key| SupabaseClient::new(url, key))
}

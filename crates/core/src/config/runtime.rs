//! Environment-backed runtime configuration

use serde::Serialize;

use super::classification::{PLACEHOLDER_SUPABASE_KEY, PLACEHOLDER_SUPABASE_URL};
use super::env::{is_false_flag, non_empty};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Supabase connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub enabled: bool,
    pub url: String,
    pub key: String,
}

impl SupabaseConfig {
    pub fn new(enabled: bool, url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            enabled,
            url: url.into(),
            key: key.into(),
        }
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self::new(true, PLACEHOLDER_SUPABASE_URL, PLACEHOLDER_SUPABASE_KEY)
    }
}

/// Google Analytics settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Measurement ID (`G-XXXXXXXXXX`)
    pub gtag_id: Option<String>,
    /// Measurement Protocol API secret, required to send events server-side
    pub api_secret: Option<String>,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Full runtime configuration, read once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub supabase: SupabaseConfig,
    pub analytics: AnalyticsConfig,
    pub server: ServerConfig,
}

impl RuntimeConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase = SupabaseConfig {
            enabled: !is_false_flag(lookup("ENABLE_SUPABASE").as_deref()),
            url: non_empty(lookup("SUPABASE_URL"))
                .unwrap_or_else(|| PLACEHOLDER_SUPABASE_URL.to_string()),
            key: non_empty(lookup("SUPABASE_KEY"))
                .unwrap_or_else(|| PLACEHOLDER_SUPABASE_KEY.to_string()),
        };

        let analytics = AnalyticsConfig {
            gtag_id: non_empty(lookup("GTAG_ID")),
            api_secret: non_empty(lookup("GTAG_API_SECRET")),
        };

        let server = ServerConfig {
            host: non_empty(lookup("HOST")).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("PORT")
                .and_then(|port| port.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
        };

        Self {
            supabase,
            analytics,
            server,
        }
    }

    /// Snapshot of the values that are safe to hand to clients
    pub fn public(&self) -> PublicRuntimeConfig {
        PublicRuntimeConfig {
            enable_supabase: self.supabase.enabled,
            supabase_url: self.supabase.url.clone(),
            gtag_id: self.analytics.gtag_id.clone(),
        }
    }
}

/// Public runtime configuration. Credentials are never included.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicRuntimeConfig {
    pub enable_supabase: bool,
    pub supabase_url: String,
    pub gtag_id: Option<String>,
}

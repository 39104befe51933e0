//! Demo-mode classification of the Supabase configuration

use serde::Serialize;

use super::runtime::SupabaseConfig;

/// URL shipped as the default when `SUPABASE_URL` is not set
pub const PLACEHOLDER_SUPABASE_URL: &str = "https://demo.supabase.co";

/// Key shipped as the default when `SUPABASE_KEY` is not set
pub const PLACEHOLDER_SUPABASE_KEY: &str = "demo-anon-key";

/// Three-way state of the Supabase integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Turned off via `ENABLE_SUPABASE`
    Disabled,
    /// Enabled, but running on placeholder credentials
    Demo,
    /// Enabled with real credentials
    Live,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Disabled => "disabled",
            Classification::Demo => "demo",
            Classification::Live => "live",
        }
    }

    /// Human readable status line
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Disabled => "Disabled",
            Classification::Demo => "Enabled (Demo Mode)",
            Classification::Live => "Enabled & Configured",
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, Classification::Demo)
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Classification::Live)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_placeholder_url(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || url == PLACEHOLDER_SUPABASE_URL
}

fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || key == PLACEHOLDER_SUPABASE_KEY
}

/// Classify a Supabase configuration.
///
/// `Disabled` wins over everything else. Either a placeholder URL or a
/// placeholder key is enough to land in `Demo`.
pub fn classify(config: &SupabaseConfig) -> Classification {
    if !config.enabled {
        return Classification::Disabled;
    }

    if is_placeholder_url(&config.url) || is_placeholder_key(&config.key) {
        return Classification::Demo;
    }

    Classification::Live
}

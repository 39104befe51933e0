//! Runtime configuration
//!
//! Configuration is read once at startup from the environment and is
//! immutable afterwards. The Supabase section is classified into
//! disabled / demo / live to decide whether a backend client is built.

mod classification;
mod env;
mod runtime;

pub use classification::{classify, Classification, PLACEHOLDER_SUPABASE_KEY, PLACEHOLDER_SUPABASE_URL};
pub use env::{is_false_flag, non_empty};
pub use runtime::{
    AnalyticsConfig, PublicRuntimeConfig, RuntimeConfig, ServerConfig, SupabaseConfig,
};

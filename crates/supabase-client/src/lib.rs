//! Supabase client
//!
//! A small client for the Supabase auth (GoTrue) and PostgREST APIs, plus
//! the bootstrap that decides from configuration whether a client should be
//! built at all.

mod api;
mod auth;
mod bootstrap;
mod client;
mod error;
mod query;

#[cfg(test)]
mod test_support;

pub use api::BackendApi;
pub use auth::{AuthClient, Credentials, Session, SignUpResponse, User};
pub use bootstrap::{bootstrap, bootstrap_with, Bootstrap};
pub use client::SupabaseClient;
pub use error::{ClientError, Result};
pub use query::QueryBuilder;

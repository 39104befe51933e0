//! Core library for the Supabase / analytics starter
//!
//! This crate contains the logic shared by the server, including:
//! - Runtime configuration and demo-mode classification
//! - The example counter store
//! - Analytics event tracking

pub mod analytics;
pub mod config;
pub mod counter;
pub mod error;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

//! Route handlers

pub mod analytics;
pub mod config;
pub mod counter;
pub mod health;
pub mod supabase;

#[cfg(test)]
pub(crate) mod test_util;

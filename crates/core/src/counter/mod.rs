//! Example counter store
//!
//! A small shared state container with derived getters, used by the
//! demo API to show request-spanning state.

mod model;
mod store;

pub use model::*;
pub use store::*;

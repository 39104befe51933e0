//! Shared counter store

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::model::{CounterSnapshot, ExampleState};

/// Thread-safe counter store. Clones share the same state.
#[derive(Clone, Default)]
pub struct ExampleStore {
    state: Arc<RwLock<ExampleState>>,
}

impl ExampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store starting from the given state
    pub fn with_state(state: ExampleState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn snapshot(&self) -> CounterSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn increment(&self) -> CounterSnapshot {
        self.update(|state| state.count = state.count.saturating_add(1))
            .await
    }

    pub async fn decrement(&self) -> CounterSnapshot {
        self.update(|state| state.count = state.count.saturating_sub(1))
            .await
    }

    pub async fn reset(&self) -> CounterSnapshot {
        self.update(|state| state.count = 0).await
    }

    pub async fn set_message(&self, message: impl Into<String>) -> CounterSnapshot {
        let message = message.into();
        self.update(move |state| state.message = message).await
    }

    async fn update<F>(&self, apply: F) -> CounterSnapshot
    where
        F: FnOnce(&mut ExampleState),
    {
        let mut state = self.state.write().await;
        apply(&mut state);
        debug!("Counter updated: count={}", state.count);
        state.snapshot()
    }
}

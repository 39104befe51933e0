//! Counter state definitions

use serde::{Deserialize, Serialize};

pub const DEFAULT_MESSAGE: &str = "Hello from Pinia!";

/// Raw counter state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleState {
    pub count: i64,
    pub message: String,
}

impl Default for ExampleState {
    fn default() -> Self {
        Self {
            count: 0,
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

impl ExampleState {
    pub fn double_count(&self) -> i64 {
        self.count.saturating_mul(2)
    }

    pub fn greeting(&self) -> String {
        format!("{} Count: {}", self.message, self.count)
    }

    /// State plus derived values, in the shape handed to clients
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            count: self.count,
            double_count: self.double_count(),
            message: self.message.clone(),
            greeting: self.greeting(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSnapshot {
    pub count: i64,
    pub double_count: i64,
    pub message: String,
    pub greeting: String,
}

//! Correlation types for change-event tracking
//!
//! Every configuration-change event handled by the dispatcher is tagged with
//! an [`EventId`] so that diff, priority assignment and each callback
//! invocation can be correlated in structured logs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single configuration-change event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    /// Generate a new EventId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (e.g. an id assigned by the event source)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

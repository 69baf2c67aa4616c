//! Identifiers shared between the simulation engine and the trace
//!
//! Event identifiers are opaque strings assigned by the simulation engine.
//! They are wrapped in a newtype so they cannot be mixed up with labels or
//! month keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a simulation event, as reported by the engine
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

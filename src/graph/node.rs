//! Location nodes

use serde::{Deserialize, Serialize};

/// A location in the trip graph
///
/// Identity is the name alone. Callers may hang an opaque JSON payload
/// off a location; the analytics never look at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique name (e.g. a taxi zone id)
    pub name: String,

    /// Caller-defined data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Location {
            name: name.into(),
            payload: None,
        }
    }

    pub fn with_payload(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Location {
            name: name.into(),
            payload: Some(payload),
        }
    }
}

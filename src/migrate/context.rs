//! The stream document: read-only entity content for data-dependent steps.
//!
//! Transforms that fan a node out (one card per directory child, say) need
//! to see the entity's content data. The engine threads the same snapshot
//! by reference into every transform of a run and never looks inside it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamDocument(Value);

impl StreamDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// A null snapshot for documents migrated without entity data.
    pub fn empty() -> Self {
        Self(Value::Null)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// JSON-pointer lookup (`/a/b/0`).
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

//! The persisted document.
//!
//! `content` is the legacy top-level zone from pre-slot documents; newer
//! documents compose the page from named `zones` and slot props. The
//! engine migrates whichever is populated, so both eras load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::CoreError;
use super::identity::ZoneId;
use super::node::{Node, Props};

/// The document root: page-level props, no id, no component type.
///
/// Slot-shaped props directly on the root are recursed into like any other
/// slot; the root itself is never subject to migration steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Root {
    #[serde(default)]
    pub props: Props,
}

impl Root {
    pub fn new(props: Props) -> Self {
        Self { props }
    }
}

/// The top-level persisted artifact.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub root: Root,

    /// Legacy top-level zone.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,

    /// Named zones. `BTreeMap` keeps iteration and serialization order
    /// deterministic regardless of input key order.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub zones: BTreeMap<ZoneId, Vec<Node>>,
}

impl Document {
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value).map_err(|err| CoreError::MalformedDocument {
            reason: err.to_string(),
        })
    }

    pub fn to_value(&self) -> Result<serde_json::Value, CoreError> {
        serde_json::to_value(self).map_err(|err| CoreError::MalformedDocument {
            reason: err.to_string(),
        })
    }

    pub fn zone(&self, id: &ZoneId) -> Option<&[Node]> {
        self.zones.get(id).map(Vec::as_slice)
    }
}

//! Identity atoms
//!
//! NodeId: stable node identity within a document
//! ComponentType: names a component kind
//! ZoneId: names a top-level zone

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{CoreError, InvalidId};

/// Stable node identifier - non-empty string.
///
/// Assigned at creation and preserved across migrations. Split migrations
/// mint derived ids; see [`NodeId::derived`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn parse(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidId::Node {
                raw: s,
                reason: "empty".into(),
            }
            .into());
        }
        if s.chars().any(char::is_control) {
            return Err(InvalidId::Node {
                raw: s,
                reason: "contains control character".into(),
            }
            .into());
        }
        Ok(Self(s))
    }

    /// Derive a deterministic id for a node produced by a split.
    ///
    /// `{parent}-{discriminator}-{index}` is collision-free as long as the
    /// parent's id was unique and the parent splits once per run.
    pub fn derived(parent: &NodeId, discriminator: &str, index: usize) -> Self {
        Self(format!("{}-{}-{}", parent.0, discriminator, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:?})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Component type name - non-empty string.
///
/// Determines which migration steps apply to a node and which field
/// definitions govern it once migrated.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentType(String);

impl ComponentType {
    pub fn parse(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidId::Component {
                raw: s,
                reason: "empty".into(),
            }
            .into());
        }
        if s.chars().any(char::is_whitespace) {
            return Err(InvalidId::Component {
                raw: s,
                reason: "contains whitespace".into(),
            }
            .into());
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentType({:?})", self.0)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zone identifier - non-empty string.
///
/// Newer documents key zones as `{parent-id}:{slot}`; older ones use bare
/// names. Both are accepted, the compound form is merely recognized.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn parse(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidId::Zone {
                raw: s,
                reason: "empty".into(),
            }
            .into());
        }
        Ok(Self(s))
    }

    /// Split a compound `{parent-id}:{slot}` key, if this is one.
    pub fn parent_and_slot(&self) -> Option<(&str, &str)> {
        self.0
            .split_once(':')
            .filter(|(parent, slot)| !parent.is_empty() && !slot.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZoneId({:?})", self.0)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_rejects_empty_and_control() {
        assert!(NodeId::parse("").is_err());
        assert!(NodeId::parse("a\nb").is_err());
        assert!(NodeId::parse("block-7f").is_ok());
    }

    #[test]
    fn derived_ids_are_deterministic() {
        let parent = NodeId::parse("a").unwrap();
        assert_eq!(NodeId::derived(&parent, "Card", 0).as_str(), "a-Card-0");
        assert_eq!(NodeId::derived(&parent, "Card", 1).as_str(), "a-Card-1");
    }

    #[test]
    fn component_type_rejects_whitespace() {
        assert!(ComponentType::parse("Hero Banner").is_err());
        assert!(ComponentType::parse("HeroBanner").is_ok());
    }

    #[test]
    fn zone_id_compound_form() {
        let zone = ZoneId::parse("grid-1:items").unwrap();
        assert_eq!(zone.parent_and_slot(), Some(("grid-1", "items")));

        let bare = ZoneId::parse("sidebar").unwrap();
        assert_eq!(bare.parent_and_slot(), None);

        let odd = ZoneId::parse(":items").unwrap();
        assert_eq!(odd.parent_and_slot(), None);
    }
}

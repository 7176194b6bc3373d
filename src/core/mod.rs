//! Core document model
//!
//! Module hierarchy follows type dependency order:
//! - identity: NodeId, ComponentType, ZoneId
//! - node: Node, Props, slot-shape predicates
//! - document: Root, Document
//! - walk: read-only traversal and id audits
//! - json_canon: canonical JSON bytes and document digests

pub mod document;
pub mod error;
pub mod identity;
pub mod json_canon;
pub mod node;
pub mod walk;

pub use document::{Document, Root};
pub use error::{CoreError, InvalidId};
pub use identity::{ComponentType, NodeId, ZoneId};
pub use json_canon::{CanonJsonError, DocDigest, digest_document, to_canon_json_bytes};
pub use node::{Node, Props, is_node_shaped, looks_like_slot};
pub use walk::{collect_ids, duplicate_ids, visit_nodes};

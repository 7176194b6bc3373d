//! Parse and validation errors for document atoms.
//!
//! These are bounded and stable: they represent refused input, not engine
//! failures. The engine itself never surfaces errors past its entry point.

use thiserror::Error;

/// Invalid identifier string.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum InvalidId {
    #[error("node id `{raw}` is invalid: {reason}")]
    Node { raw: String, reason: String },
    #[error("component type `{raw}` is invalid: {reason}")]
    Component { raw: String, reason: String },
    #[error("zone id `{raw}` is invalid: {reason}")]
    Zone { raw: String, reason: String },
}

/// Canonical error enum for the document model.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum CoreError {
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    #[error("document is malformed: {reason}")]
    MalformedDocument { reason: String },
}

#![forbid(unsafe_code)]

pub mod core;
pub mod error;
pub mod migrate;
pub mod schema;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

// Re-export the working set at crate root for convenience
pub use crate::core::{
    CanonJsonError, ComponentType, CoreError, DocDigest, Document, InvalidId, Node, NodeId, Props,
    Root, ZoneId, digest_document, to_canon_json_bytes,
};
pub use crate::migrate::{
    Diagnostic, DiagnosticKind, MigrationAction, MigrationRegistry, MigrationRegistryBuilder,
    MigrationReport, MigrationStep, NodeSeed, StreamDocument, TransformError, is_settled,
    migrate_document,
};
pub use crate::schema::{ComponentDef, FieldKind, PropClass, SchemaCatalog, classify_prop};

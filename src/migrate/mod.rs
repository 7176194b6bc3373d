//! Registry-driven document migration.
//!
//! - context: the read-only stream document handed to transforms
//! - registry: ordered per-type migration steps
//! - engine: the application loop
//! - report: per-run counters and diagnostics

pub mod context;
pub mod engine;
pub mod registry;
pub mod report;

pub use context::StreamDocument;
pub use engine::{is_settled, migrate_document};
pub use registry::{
    MigrationAction, MigrationRegistry, MigrationRegistryBuilder, MigrationStep, NodeSeed,
    TransformError,
};
pub use report::{Diagnostic, DiagnosticKind, MigrationReport};

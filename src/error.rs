use thiserror::Error;

use crate::core::{CanonJsonError, CoreError};

/// Crate-level convenience error.
///
/// A thin wrapper over the per-module error enums. Migration itself never
/// returns this: `migrate_document` is total and reports problems through
/// diagnostics instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Canon(#[from] CanonJsonError),
}

//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by `OverrideResolver` writes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OverrideError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DeckHandle`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DriverError {
    #[error("deck driver has stopped")]
    Closed,
}

//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors raised while decoding inbound adapter payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EventError {
    #[error("event payload is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Errors emitted by `ChecklistService`.
///
/// A failure is fatal for the current interaction only: nothing is rendered
/// and the user's last successfully published view stays on screen.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChecklistError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Event(#[from] EventError),
}

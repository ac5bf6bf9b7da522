//! The module contains the errors the ledger can return.
//!
//! Adapter failures are reported as [`StoreError`] and surfaced unchanged
//! through [`LedgerError::Store`]; every other variant is raised locally,
//! before anything is sent to the remote store.
use thiserror::Error;

/// Failures a [`DocumentStore`] call can end with.
///
/// [`DocumentStore`]: crate::DocumentStore
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The call could not complete (transport, server or decoding error).
    #[error("network failure: {0}")]
    Network(String),
    /// The mutation targets a document that no longer exists.
    #[error("document \"{0}\" not found")]
    NotFound(String),
}

/// Ledger custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("record at index {0} has no identifier")]
    MissingIdentifier(usize),
    #[error("\"{0}\" category not found!")]
    UnknownCategory(String),
    #[error("index {index} out of range for {len} records")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no draft in progress")]
    NoDraft,
    #[error("invalid field: {0}")]
    Validation(String),
}

impl LedgerError {
    /// Returns `true` when the error came back from the remote store.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

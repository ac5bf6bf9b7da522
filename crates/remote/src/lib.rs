//! Network adapters for the ledger.
//!
//! [`FirestoreStore`] is the production [`engine::DocumentStore`]; it talks to
//! the Firestore REST API and never retries. [`ContactClient`] forwards
//! contact-form messages to the dispatch endpoint.

pub use contact::{ContactClient, ContactError};
pub use firestore::{DEFAULT_BASE_URL, FirestoreStore, FirestoreStoreBuilder};

mod codec;
mod contact;
mod firestore;

/// Errors raised while constructing a client.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

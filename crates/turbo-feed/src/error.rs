//! Feed error types.

use thiserror::Error;

/// Errors surfaced by a storage collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Query layer error.
    #[error(transparent)]
    Db(#[from] turbo_db::DbError),

    /// Backend-reported failure (network, auth, validation).
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors that can occur while composing a feed.
#[derive(Error, Debug)]
pub enum FeedError {
    /// The storage collaborator failed; propagated unmodified.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A fetched row could not be converted to a product.
    #[error("Invalid product row {id}: {reason}")]
    InvalidRow { id: String, reason: String },

    /// Unknown tab name.
    #[error("Invalid feed tab: {0}")]
    InvalidTab(String),

    /// Unknown sort option name.
    #[error("Invalid sort option: {0}")]
    InvalidSort(String),

    /// Unknown content type name.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Configuration rejected.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Dataset could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Serialization(e.to_string())
    }
}

impl From<turbo_db::DbError> for FeedError {
    fn from(e: turbo_db::DbError) -> Self {
        FeedError::Store(StoreError::Db(e))
    }
}

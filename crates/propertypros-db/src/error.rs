use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No document matched the id or natural-key filter.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A document matched but the write left it unchanged.
    #[error("{0} matched but was not modified")]
    UpdateFailed(&'static str),

    /// The write would break a role rule, e.g. a listing by a fraud agent.
    #[error("{0} not permitted")]
    Forbidden(&'static str),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("document encoding: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored document {0} is not a JSON object")]
    Corrupt(String),

    #[error("update must be a JSON object, got {0}")]
    InvalidUpdate(String),

    #[error("database lock poisoned")]
    LockPoisoned,
}

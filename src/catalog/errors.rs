use thiserror::Error;

use crate::storage::StoreError;

/// Errors surfaced by catalog operations.
///
/// A missing target id is not an error: moves and removals report it by
/// returning `false`.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The persistent store could not be opened or read at startup.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] StoreError),

    /// A new game was rejected before any mutation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An import document was rejected; the catalog is untouched.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// A store write failed after startup. The in-memory lists still match the
    /// last successful write.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Field combinations rejected when adding a game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("game name must not be empty")]
    EmptyName,

    #[error("minimum players ({min}) cannot be greater than maximum players ({max})")]
    PlayerRange { min: i64, max: i64 },
}

/// Reasons an import document is refused.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("document too large (limit {limit} bytes)")]
    TooLarge { limit: usize },

    #[error("'{key}' must be a list of games")]
    WrongShape { key: &'static str },

    #[error("'{key}' entry {index} is not a valid game: {source}")]
    Record {
        key: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("game id {0} appears more than once")]
    DuplicateId(i64),
}

//! # Storage Module - Catalog Persistence Layer
//!
//! The catalog keeps two named collections, `games` (owned) and `wishlist`,
//! each an ordered list of [`Game`] records. Every backend implements the same
//! small contract through [`GameStore`]:
//!
//! - **exists**: has this collection ever been written (first-run seeding)
//! - **read_all**: every record, in display order
//! - **replace_all**: clear the collection and rewrite it
//!
//! ## Backends
//!
//! ```text
//! sled   data/catalog.sled/     ← indexed object store, one tree per collection
//! json   data/games.json        ← flat serialized blob per collection
//!        data/wishlist.json
//! ```
//!
//! The sled backend writes both collections in a single transaction when a
//! move touches both lists. The json backend writes each file atomically
//! (exclusive lock, temp file, rename) but two files are never updated as one
//! unit, so writers order their batches destination-first.
//!
//! ## Configuration
//!
//! ```toml
//! [storage]
//! backend = "sled"
//! data_dir = "./data"
//! ```

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::catalog::{Game, ListKind};
use crate::config::StorageConfig;

pub mod json_store;
pub mod sled_store;

pub use json_store::JsonFileStore;
pub use sled_store::SledStore;

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A record was written by an incompatible version of this program.
    #[error("schema mismatch in {collection}: expected {expected}, got {found}")]
    SchemaMismatch {
        collection: Collection,
        expected: u8,
        found: u8,
    },

    #[error("transaction aborted: {0}")]
    Transaction(String),
}

/// The two named collections held by every store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Games,
    Wishlist,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Games => "games",
            Collection::Wishlist => "wishlist",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ListKind> for Collection {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::Owned => Collection::Games,
            ListKind::Wishlist => Collection::Wishlist,
        }
    }
}

/// Available persistence backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sled,
    Json,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageBackend::Sled => "sled",
            StorageBackend::Json => "json",
        })
    }
}

/// Asynchronous key-value contract shared by all catalog backends.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Short backend identifier for logs and status output.
    fn backend(&self) -> StorageBackend;

    /// Whether `collection` has ever been written.
    async fn exists(&self, collection: Collection) -> Result<bool, StoreError>;

    /// All records of `collection` in stored order; empty when absent.
    async fn read_all(&self, collection: Collection) -> Result<Vec<Game>, StoreError>;

    /// Clear `collection` and write `games` in order.
    async fn replace_all(&self, collection: Collection, games: &[Game]) -> Result<(), StoreError>;

    /// Replace several collections, in the order given. Backends that can
    /// write them atomically override this.
    async fn replace_many(&self, batches: &[(Collection, &[Game])]) -> Result<(), StoreError> {
        for (collection, games) in batches {
            self.replace_all(*collection, games).await?;
        }
        Ok(())
    }
}

/// Open the backend selected in the storage configuration.
pub async fn open_store(config: &StorageConfig) -> Result<Box<dyn GameStore>, StoreError> {
    let data_dir = Path::new(&config.data_dir);
    let store: Box<dyn GameStore> = match config.backend {
        StorageBackend::Sled => Box::new(SledStore::open(data_dir.join(sled_store::DB_DIR_NAME))?),
        StorageBackend::Json => Box::new(JsonFileStore::open(data_dir).await?),
    };
    debug!("Opened {} store under {}", config.backend, config.data_dir);
    Ok(store)
}

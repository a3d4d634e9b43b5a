//! # Gameshelf - Board Game Collection and Wishlist Manager
//!
//! Gameshelf keeps two lists of board games: the ones you own and the ones you
//! want. Games move between the lists without losing any field, can be
//! searched by name, player count and play time, and the whole catalog can be
//! exported to a JSON document and imported again elsewhere.
//!
//! ## Features
//!
//! - **Two lists, one owner**: every game id is in at most one list at a time.
//! - **Accent-insensitive search**: "codigo" finds "Código Secreto".
//! - **Portable documents**: export/import in the same layout as the browser app.
//! - **Pluggable storage**: an embedded sled database or plain JSON files.
//! - **Write-then-commit**: a failed write never leaves memory ahead of disk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gameshelf::catalog::{Catalog, CatalogOptions, FilterSpec, ListKind, NewGame};
//! use gameshelf::config::Config;
//! use gameshelf::storage::open_store;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("gameshelf.toml").await?;
//!     let store = open_store(&config.storage).await?;
//!     let mut catalog = Catalog::initialize(store, CatalogOptions::from(&config.catalog)).await?;
//!
//!     let azul = catalog.add(NewGame::new("Azul", 2, 4, 45), ListKind::Wishlist).await?;
//!     catalog.move_to_owned(azul.id).await?;
//!
//!     let spec = FilterSpec { player_count: Some(4), ..Default::default() };
//!     for game in catalog.search_all(&spec) {
//!         println!("{}", game.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`catalog`] - game records, the catalog state manager, filters, import/export
//! - [`storage`] - the store contract and its sled and JSON backends
//! - [`config`] - configuration loading and validation
//! - [`validation`] - input cleaning for new games and imported documents
//! - [`view`] - plain-text rendering
//! - [`shell`] - the interactive command loop
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Shell    │ ← Commands and rendering
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │    Catalog      │ ← Owned list, wishlist, invariants
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   GameStore     │ ← sled or JSON files
//! └─────────────────┘
//! ```

pub mod catalog;
pub mod config;
pub mod logutil;
pub mod shell;
pub mod storage;
pub mod validation;
pub mod view;

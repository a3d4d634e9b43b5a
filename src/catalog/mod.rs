//! # Catalog Module - Owned Games and Wishlist
//!
//! The catalog is two ordered lists of [`Game`] records. A game id lives in at
//! most one of them at any time; moving a game appends it to the other list
//! with every field unchanged.
//!
//! ## Layout
//!
//! - [`types`]: the game record, list and section identifiers
//! - [`state`]: [`Catalog`], the single owner of both lists
//! - [`filter`]: name, player count and duration predicates
//! - [`codec`]: the import/export document
//! - [`seed`]: example games written on first start
//!
//! All writes go through [`Catalog`], which persists a change before it
//! becomes visible in memory.

pub mod codec;
pub mod errors;
pub mod filter;
pub mod ids;
pub mod seed;
pub mod state;
pub mod types;

pub use codec::{export_document, parse_document, ImportDocument, ImportPolicy, KeyShape};
pub use errors::{CatalogError, ImportError, ValidationError};
pub use filter::{normalize_text, DurationBand, FilterSpec};
pub use ids::IdAllocator;
pub use seed::example_games;
pub use state::{Catalog, CatalogOptions, ImportSummary};
pub use types::{Game, ImageRef, ListKind, NewGame, Section, Snapshot, GAME_SCHEMA_VERSION};

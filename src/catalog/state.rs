//! The in-memory catalog and the only code path that mutates it.
//!
//! Every mutation builds the new list contents, persists them, and only then
//! commits them to memory. A failed write therefore leaves the catalog equal
//! to what the store last accepted. The `&mut self` receivers mean a second
//! command cannot start while one is still awaiting the store.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::catalog::codec::{self, ImportPolicy, KeyShape};
use crate::catalog::errors::{CatalogError, ImportError};
use crate::catalog::filter::FilterSpec;
use crate::catalog::ids::IdAllocator;
use crate::catalog::seed::example_games;
use crate::catalog::types::{Game, ListKind, NewGame, Section, Snapshot};
use crate::config::CatalogConfig;
use crate::logutil::preview;
use crate::storage::{Collection, GameStore};
use crate::validation::validate_new_game;

/// Behavior knobs taken from the `[catalog]` config section.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub seed_examples: bool,
    pub import_policy: ImportPolicy,
    pub max_import_bytes: usize,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self::from(&CatalogConfig::default())
    }
}

impl From<&CatalogConfig> for CatalogOptions {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            seed_examples: config.seed_examples,
            import_policy: config.import_policy,
            max_import_bytes: config.max_import_bytes,
        }
    }
}

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub owned: usize,
    pub wishlist: usize,
    pub owned_replaced: bool,
    pub wishlist_replaced: bool,
}

pub struct Catalog {
    store: Box<dyn GameStore>,
    owned: Vec<Game>,
    wishlist: Vec<Game>,
    section: Section,
    ids: IdAllocator,
    options: CatalogOptions,
}

impl Catalog {
    /// Load both lists from `store`, seeding the example collection when the
    /// `games` collection is missing or empty.
    pub async fn initialize(
        store: Box<dyn GameStore>,
        options: CatalogOptions,
    ) -> Result<Self, CatalogError> {
        let mut owned = if store
            .exists(Collection::Games)
            .await
            .map_err(CatalogError::StorageUnavailable)?
        {
            store
                .read_all(Collection::Games)
                .await
                .map_err(CatalogError::StorageUnavailable)?
        } else {
            Vec::new()
        };

        if owned.is_empty() && options.seed_examples {
            owned = example_games();
            store
                .replace_all(Collection::Games, &owned)
                .await
                .map_err(CatalogError::StorageUnavailable)?;
            info!("Seeded {} example games", owned.len());
        }

        let wishlist = store
            .read_all(Collection::Wishlist)
            .await
            .map_err(CatalogError::StorageUnavailable)?;

        // A move interrupted between its two writes can leave a game in both
        // lists; the wishlist copy wins, matching toggle precedence.
        let wished: HashSet<i64> = wishlist.iter().map(|g| g.id).collect();
        let before = owned.len();
        owned.retain(|g| !wished.contains(&g.id));
        if owned.len() != before {
            warn!(
                "Dropped {} owned games also present in the wishlist",
                before - owned.len()
            );
            store
                .replace_all(Collection::Games, &owned)
                .await
                .map_err(CatalogError::StorageUnavailable)?;
        }

        info!(
            "Catalog loaded from {} store: {} owned, {} wishlist",
            store.backend(),
            owned.len(),
            wishlist.len()
        );
        Ok(Self {
            store,
            owned,
            wishlist,
            section: Section::default(),
            ids: IdAllocator::new(),
            options,
        })
    }

    pub fn owned(&self) -> &[Game] {
        &self.owned
    }

    pub fn wishlist(&self) -> &[Game] {
        &self.wishlist
    }

    pub fn list(&self, kind: ListKind) -> &[Game] {
        match kind {
            ListKind::Owned => &self.owned,
            ListKind::Wishlist => &self.wishlist,
        }
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    pub fn store(&self) -> &dyn GameStore {
        self.store.as_ref()
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn set_section(&mut self, section: Section) {
        debug!("Active section: {}", section);
        self.section = section;
    }

    /// Which list holds `id`. The wishlist is checked first.
    pub fn locate(&self, id: i64) -> Option<ListKind> {
        if self.wishlist.iter().any(|g| g.id == id) {
            Some(ListKind::Wishlist)
        } else if self.owned.iter().any(|g| g.id == id) {
            Some(ListKind::Owned)
        } else {
            None
        }
    }

    pub fn find(&self, id: i64) -> Option<(&Game, ListKind)> {
        self.owned
            .iter()
            .find(|g| g.id == id)
            .map(|g| (g, ListKind::Owned))
            .or_else(|| {
                self.wishlist
                    .iter()
                    .find(|g| g.id == id)
                    .map(|g| (g, ListKind::Wishlist))
            })
    }

    pub fn len(&self) -> usize {
        self.owned.len() + self.wishlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty() && self.wishlist.is_empty()
    }

    /// Owned games matching `spec`.
    pub fn filter(&self, spec: &FilterSpec) -> Vec<&Game> {
        spec.select(&self.owned)
    }

    /// Matches across both lists: all owned matches first, then wishlist.
    pub fn search_all(&self, spec: &FilterSpec) -> Vec<&Game> {
        spec.select(self.owned.iter().chain(self.wishlist.iter()))
    }

    /// Deep copy of both lists for export.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            owned: self.owned.clone(),
            wishlist: self.wishlist.clone(),
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut Vec<Game> {
        match kind {
            ListKind::Owned => &mut self.owned,
            ListKind::Wishlist => &mut self.wishlist,
        }
    }

    pub async fn move_to_wishlist(&mut self, id: i64) -> Result<bool, CatalogError> {
        self.transfer(id, ListKind::Owned).await
    }

    pub async fn move_to_owned(&mut self, id: i64) -> Result<bool, CatalogError> {
        self.transfer(id, ListKind::Wishlist).await
    }

    /// Move `id` to whichever list does not currently hold it.
    pub async fn toggle(&mut self, id: i64) -> Result<bool, CatalogError> {
        match self.locate(id) {
            Some(ListKind::Wishlist) => self.move_to_owned(id).await,
            Some(ListKind::Owned) => self.move_to_wishlist(id).await,
            None => {
                debug!("toggle: no game with id {}", id);
                Ok(false)
            }
        }
    }

    async fn transfer(&mut self, id: i64, from: ListKind) -> Result<bool, CatalogError> {
        let to = from.other();
        let Some(index) = self.list(from).iter().position(|g| g.id == id) else {
            debug!("move: game {} is not in {}", id, from);
            return Ok(false);
        };

        let mut source = self.list(from).to_vec();
        let game = source.remove(index);
        let name = preview(&game.name);
        let mut destination = self.list(to).to_vec();
        destination.push(game);

        // Destination first: an interrupted move duplicates rather than loses
        self.store
            .replace_many(&[
                (Collection::from(to), destination.as_slice()),
                (Collection::from(from), source.as_slice()),
            ])
            .await?;

        *self.list_mut(from) = source;
        *self.list_mut(to) = destination;
        info!("Moved '{}' ({}) from {} to {}", name, id, from, to);
        Ok(true)
    }

    /// Validate, assign a fresh id and append to `target`.
    pub async fn add(&mut self, new_game: NewGame, target: ListKind) -> Result<Game, CatalogError> {
        let new_game = validate_new_game(new_game)?;

        let owned = &self.owned;
        let wishlist = &self.wishlist;
        let id = self
            .ids
            .next(|candidate| owned.iter().chain(wishlist.iter()).any(|g| g.id == candidate));
        let game = new_game.into_game(id);

        let mut updated = self.list(target).to_vec();
        updated.push(game.clone());
        self.store
            .replace_all(Collection::from(target), &updated)
            .await?;
        *self.list_mut(target) = updated;

        info!("Added '{}' ({}) to {}", preview(&game.name), id, target);
        Ok(game)
    }

    /// Remove `id` from whichever list holds it (owned checked first).
    pub async fn remove(&mut self, id: i64) -> Result<bool, CatalogError> {
        let Some((kind, index)) = [ListKind::Owned, ListKind::Wishlist]
            .into_iter()
            .find_map(|kind| self.list(kind).iter().position(|g| g.id == id).map(|i| (kind, i)))
        else {
            debug!("remove: no game with id {}", id);
            return Ok(false);
        };

        let mut updated = self.list(kind).to_vec();
        let removed = updated.remove(index);
        self.store.replace_all(Collection::from(kind), &updated).await?;
        *self.list_mut(kind) = updated;

        info!("Removed '{}' ({}) from {}", preview(&removed.name), id, kind);
        Ok(true)
    }

    /// Replace both lists wholesale.
    ///
    /// An absent side keeps its current list. A side that is present but not a
    /// list rejects the whole call before anything is written, as do ids that
    /// would appear more than once across the resulting lists.
    pub async fn replace_all(
        &mut self,
        owned: KeyShape,
        wishlist: KeyShape,
    ) -> Result<ImportSummary, CatalogError> {
        let resolve = |shape: KeyShape, key: &'static str, current: &[Game]| match shape {
            KeyShape::Absent => Ok((current.to_vec(), false)),
            KeyShape::WrongShape => Err(ImportError::WrongShape { key }),
            KeyShape::Sequence(games) => Ok((games, true)),
        };
        let (new_owned, owned_replaced) = resolve(owned, codec::OWNED_KEY, self.owned.as_slice())?;
        let (new_wishlist, wishlist_replaced) = resolve(wishlist, codec::WISHLIST_KEY, self.wishlist.as_slice())?;

        let mut seen = HashSet::with_capacity(new_owned.len() + new_wishlist.len());
        for game in new_owned.iter().chain(new_wishlist.iter()) {
            if !seen.insert(game.id) {
                return Err(ImportError::DuplicateId(game.id).into());
            }
        }

        self.store
            .replace_many(&[
                (Collection::Games, new_owned.as_slice()),
                (Collection::Wishlist, new_wishlist.as_slice()),
            ])
            .await?;

        let summary = ImportSummary {
            owned: new_owned.len(),
            wishlist: new_wishlist.len(),
            owned_replaced,
            wishlist_replaced,
        };
        self.owned = new_owned;
        self.wishlist = new_wishlist;
        info!(
            "Replaced catalog: {} owned{}, {} wishlist{}",
            summary.owned,
            if owned_replaced { "" } else { " (kept)" },
            summary.wishlist,
            if wishlist_replaced { "" } else { " (kept)" }
        );
        Ok(summary)
    }

    /// Parse an export document and apply it under the configured policy.
    pub async fn import_document(&mut self, content: &str) -> Result<ImportSummary, CatalogError> {
        let doc = codec::parse_document(content, self.options.max_import_bytes)?;
        let policy = self.options.import_policy;
        if policy == ImportPolicy::Lenient {
            for (shape, key) in [(&doc.owned, codec::OWNED_KEY), (&doc.wishlist, codec::WISHLIST_KEY)] {
                if *shape == KeyShape::WrongShape {
                    warn!("Import: '{}' is not a list, keeping current entries", key);
                }
            }
        }
        let doc = doc.apply_policy(policy);
        self.replace_all(doc.owned, doc.wishlist).await
    }

    /// Serialize the current catalog as an export document.
    pub fn export_document(&self, byte_order_mark: bool) -> Result<String, CatalogError> {
        codec::export_document(&self.snapshot(), byte_order_mark)
            .map_err(|e| CatalogError::Store(e.into()))
    }
}

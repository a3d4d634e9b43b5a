use std::path::Path;

use async_trait::async_trait;
use log::trace;
use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError, TransactionResult};
use sled::{IVec, Transactional};

use crate::catalog::{Game, GAME_SCHEMA_VERSION};
use crate::storage::{Collection, GameStore, StorageBackend, StoreError};

/// Directory name of the sled database inside the data directory.
pub const DB_DIR_NAME: &str = "catalog.sled";

const TREE_GAMES: &str = "games";
const TREE_WISHLIST: &str = "wishlist";
const TREE_META: &str = "meta";

/// Value layout of one record. The version byte guards against reading
/// records written by an incompatible build.
#[derive(Serialize, Deserialize)]
struct StoredGame {
    schema_version: u8,
    game: Game,
}

/// Sled-backed catalog store: one tree per collection, keyed by position so
/// iteration order is display order.
pub struct SledStore {
    db: sled::Db,
    games: sled::Tree,
    wishlist: sled::Tree,
    meta: sled::Tree,
}

impl SledStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let games = db.open_tree(TREE_GAMES)?;
        let wishlist = db.open_tree(TREE_WISHLIST)?;
        let meta = db.open_tree(TREE_META)?;
        Ok(Self {
            db,
            games,
            wishlist,
            meta,
        })
    }

    fn tree(&self, collection: Collection) -> &sled::Tree {
        match collection {
            Collection::Games => &self.games,
            Collection::Wishlist => &self.wishlist,
        }
    }

    fn written_marker(collection: Collection) -> Vec<u8> {
        format!("written:{}", collection.name()).into_bytes()
    }

    fn position_key(index: usize) -> [u8; 8] {
        (index as u64).to_be_bytes()
    }

    fn serialize(game: &Game) -> Result<Vec<u8>, StoreError> {
        Ok(bincode::serialize(&StoredGame {
            schema_version: GAME_SCHEMA_VERSION,
            game: game.clone(),
        })?)
    }

    fn deserialize(collection: Collection, bytes: IVec) -> Result<Game, StoreError> {
        let record: StoredGame = bincode::deserialize(&bytes)?;
        if record.schema_version != GAME_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                collection,
                expected: GAME_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record.game)
    }

    /// Encoded rows for `games` plus the keys that will be left over from a
    /// longer previous list.
    fn plan(&self, collection: Collection, games: &[Game]) -> Result<WritePlan, StoreError> {
        let mut rows = Vec::with_capacity(games.len());
        for (index, game) in games.iter().enumerate() {
            rows.push((Self::position_key(index).to_vec(), Self::serialize(game)?));
        }
        let mut stale = Vec::new();
        for key in self.tree(collection).range(Self::position_key(games.len())..).keys() {
            stale.push(key?);
        }
        Ok(WritePlan {
            collection,
            rows,
            stale,
        })
    }
}

struct WritePlan {
    collection: Collection,
    rows: Vec<(Vec<u8>, Vec<u8>)>,
    stale: Vec<IVec>,
}

#[async_trait]
impl GameStore for SledStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Sled
    }

    async fn exists(&self, collection: Collection) -> Result<bool, StoreError> {
        Ok(self.meta.contains_key(Self::written_marker(collection))?)
    }

    async fn read_all(&self, collection: Collection) -> Result<Vec<Game>, StoreError> {
        let mut games = Vec::new();
        for entry in self.tree(collection).iter() {
            let (_key, value) = entry?;
            games.push(Self::deserialize(collection, value)?);
        }
        Ok(games)
    }

    async fn replace_all(&self, collection: Collection, games: &[Game]) -> Result<(), StoreError> {
        self.replace_many(&[(collection, games)]).await
    }

    async fn replace_many(&self, batches: &[(Collection, &[Game])]) -> Result<(), StoreError> {
        let mut plans = Vec::with_capacity(batches.len());
        for (collection, games) in batches {
            plans.push(self.plan(*collection, games)?);
        }

        let result: TransactionResult<(), ()> =
            (&self.games, &self.wishlist).transaction(|(games, wishlist)| {
                for plan in &plans {
                    let tree = match plan.collection {
                        Collection::Games => games,
                        Collection::Wishlist => wishlist,
                    };
                    for key in &plan.stale {
                        tree.remove(key.clone())?;
                    }
                    for (key, value) in &plan.rows {
                        tree.insert(key.as_slice(), value.as_slice())?;
                    }
                }
                Ok::<(), ConflictableTransactionError<()>>(())
            });
        result.map_err(|e| match e {
            TransactionError::Abort(()) => StoreError::Transaction("catalog write aborted".into()),
            TransactionError::Storage(err) => StoreError::Sled(err),
        })?;

        for plan in &plans {
            self.meta.insert(Self::written_marker(plan.collection), vec![1u8])?;
            trace!("Wrote {} rows to {}", plan.rows.len(), plan.collection);
        }
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::example_games;
    use tempfile::TempDir;

    #[tokio::test]
    async fn round_trip_preserves_order() {
        let dir = TempDir::new().expect("tempdir");
        let store = SledStore::open(dir.path()).expect("store");
        let mut games = example_games();
        games.reverse();
        store.replace_all(Collection::Games, &games).await.expect("write");
        let read = store.read_all(Collection::Games).await.expect("read");
        assert_eq!(read, games);
        assert!(store.read_all(Collection::Wishlist).await.expect("read").is_empty());
    }

    #[tokio::test]
    async fn shrinking_a_collection_drops_stale_rows() {
        let dir = TempDir::new().expect("tempdir");
        let store = SledStore::open(dir.path()).expect("store");
        store.replace_all(Collection::Games, &example_games()).await.expect("write");
        let fewer: Vec<Game> = example_games().into_iter().take(2).collect();
        store.replace_all(Collection::Games, &fewer).await.expect("rewrite");
        assert_eq!(store.read_all(Collection::Games).await.expect("read"), fewer);
    }

    #[tokio::test]
    async fn exists_tracks_first_write_even_when_empty() {
        let dir = TempDir::new().expect("tempdir");
        let store = SledStore::open(dir.path()).expect("store");
        assert!(!store.exists(Collection::Wishlist).await.expect("exists"));
        store.replace_all(Collection::Wishlist, &[]).await.expect("write");
        assert!(store.exists(Collection::Wishlist).await.expect("exists"));
        assert!(!store.exists(Collection::Games).await.expect("exists"));
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = TempDir::new().expect("tempdir");
        {
            let store = SledStore::open(dir.path()).expect("store");
            let games = example_games();
            store
                .replace_many(&[
                    (Collection::Wishlist, &games[..1]),
                    (Collection::Games, &games[1..]),
                ])
                .await
                .expect("write both");
        }
        let store = SledStore::open(dir.path()).expect("reopen");
        assert_eq!(store.read_all(Collection::Wishlist).await.expect("read").len(), 1);
        assert_eq!(store.read_all(Collection::Games).await.expect("read").len(), 4);
    }
}

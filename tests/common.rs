//! Test utilities & fixtures.
//! Provides access to static import documents under `tests/test-data-int`.

use std::path::{Path, PathBuf};

use gameshelf::catalog::{Catalog, CatalogOptions};
use gameshelf::config::StorageConfig;
use gameshelf::storage::{open_store, StorageBackend};

/// Return the path to the static integration test fixture directory.
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test-data-int")
}

#[allow(dead_code)]
pub fn fixture(name: &str) -> String {
    fixture_root().join(name).to_string_lossy().into_owned()
}

#[allow(dead_code)]
pub fn storage_config(backend: StorageBackend, dir: &Path) -> StorageConfig {
    StorageConfig {
        backend,
        data_dir: dir.to_string_lossy().into_owned(),
    }
}

/// Open a catalog over `dir` the same way the binary does.
#[allow(dead_code)]
pub async fn open_catalog(backend: StorageBackend, dir: &Path, options: CatalogOptions) -> Catalog {
    let store = open_store(&storage_config(backend, dir))
        .await
        .expect("open store");
    Catalog::initialize(store, options).await.expect("initialize")
}

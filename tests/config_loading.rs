use gameshelf::catalog::{CatalogOptions, ImportPolicy};
use gameshelf::config::Config;
use gameshelf::storage::StorageBackend;

#[tokio::test]
async fn example_config_parses_and_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.toml");
    let config = Config::load(path).await.expect("example config loads");
    let defaults = Config::default();

    assert_eq!(config.storage.backend, StorageBackend::Sled);
    assert_eq!(config.storage.data_dir, defaults.storage.data_dir);
    assert_eq!(config.catalog.import_policy, ImportPolicy::Lenient);
    assert_eq!(config.catalog.max_import_bytes, defaults.catalog.max_import_bytes);
    assert_eq!(config.export.file, defaults.export.file);
    assert_eq!(config.logging.file, defaults.logging.file);
}

#[tokio::test]
async fn invalid_config_is_rejected_on_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[storage]\nbackend = \"postgres\"\n").expect("write");
    assert!(Config::load(path.to_str().unwrap()).await.is_err());

    std::fs::write(&path, "[logging]\nlevel = \"chatty\"\n").expect("write");
    assert!(Config::load(path.to_str().unwrap()).await.is_err());
}

#[test]
fn catalog_options_follow_config() {
    let mut config = Config::default();
    config.catalog.seed_examples = false;
    config.catalog.import_policy = ImportPolicy::Strict;
    let options = CatalogOptions::from(&config.catalog);
    assert!(!options.seed_examples);
    assert_eq!(options.import_policy, ImportPolicy::Strict);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nope.toml");
    let config = tokio_test::block_on(Config::load_or_default(path.to_str().unwrap()))
        .expect("defaults");
    assert!(config.catalog.seed_examples);
    assert!(config.export.byte_order_mark);
}

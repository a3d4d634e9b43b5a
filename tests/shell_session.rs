mod common;

use gameshelf::catalog::{CatalogOptions, ListKind, Section};
use gameshelf::config::ExportConfig;
use gameshelf::shell::Shell;
use gameshelf::storage::StorageBackend;

async fn shell_in(dir: &std::path::Path) -> Shell {
    let catalog = common::open_catalog(StorageBackend::Sled, &dir.join("db"), CatalogOptions::default()).await;
    Shell::new(
        catalog,
        ExportConfig {
            file: dir.join("my-games.json").to_string_lossy().into_owned(),
            byte_order_mark: false,
        },
    )
}

#[tokio::test]
async fn scripted_session() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut shell = shell_in(tmp.path()).await;

    let out = shell.handle_line("owned").await;
    assert!(out.starts_with("My games (5)"));

    let out = shell.handle_line("filter players=8").await;
    assert!(out.contains("[3] Código Secreto"));
    assert!(!out.contains("Catan"));

    let out = shell
        .handle_line(r#"add name="Ticket to Ride" min=2 max=5 duration=60 list=wishlist category=Familiar"#)
        .await;
    assert!(out.contains("to your wishlist"));
    let added = shell.catalog().wishlist()[0].id;

    shell.handle_line("search name=ticket").await;
    assert_eq!(shell.catalog().section(), Section::Search);
    let out = shell.handle_line(&format!("own {}", added)).await;
    assert!(out.contains("1 result(s)"), "search re-run after the move: {}", out);
    assert_eq!(shell.catalog().locate(added), Some(ListKind::Owned));

    let out = shell.handle_line(&format!("show {}", added)).await;
    assert!(out.contains("Category: Familiar"));

    let out = shell.handle_line("rm 1").await;
    assert!(out.contains("(y/N)"));
    let out = shell.handle_line("n").await;
    assert_eq!(out, "Delete cancelled.\n");

    let out = shell.handle_line("export").await;
    assert!(out.starts_with("Exported 6 games"));
    let text = std::fs::read_to_string(tmp.path().join("my-games.json")).expect("export file");
    assert!(text.starts_with('{'), "no BOM when disabled");

    let out = shell.handle_line("frobnicate").await;
    assert!(out.contains("Unknown command"));
    shell.handle_line("exit").await;
    assert!(shell.is_finished());
}

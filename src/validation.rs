//! Input validation and sanitization for user-entered games and imported documents

use std::path::Path;

use anyhow::{anyhow, Result};
use tokio::fs;

use crate::catalog::{ImageRef, ImportError, NewGame, ValidationError};

/// Strip control characters from user text. Newlines and tabs survive only
/// when `keep_layout` is set (descriptions); single-line fields lose them.
pub fn sanitize_text(content: &str, keep_layout: bool) -> String {
    content
        .chars()
        .filter(|&c| !c.is_control() || (keep_layout && (c == '\n' || c == '\t')))
        .collect()
}

fn sanitize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| sanitize_text(v.trim(), false))
        .filter(|v| !v.is_empty())
}

/// Validate and clean a game before it is assigned an id.
///
/// Only creation is checked; imported records are taken as they are.
pub fn validate_new_game(game: NewGame) -> Result<NewGame, ValidationError> {
    let name = sanitize_text(game.name.trim(), false);
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if game.min_players > game.max_players {
        return Err(ValidationError::PlayerRange {
            min: game.min_players,
            max: game.max_players,
        });
    }
    Ok(NewGame {
        name,
        description: sanitize_text(game.description.trim(), true),
        image: game.image.filter(|image| !image.as_str().trim().is_empty()),
        link: sanitize_optional(game.link),
        category: sanitize_optional(game.category),
        ..game
    })
}

/// Parse an import document with a size limit.
///
/// Exports carry a UTF-8 byte-order mark, and interrupted writes have been
/// seen to leave leading NULs; both are stripped before parsing.
pub fn bounded_json_parse(content: &str, max_bytes: usize) -> Result<serde_json::Value, ImportError> {
    if content.len() > max_bytes {
        return Err(ImportError::TooLarge { limit: max_bytes });
    }
    let normalized = content.trim_start_matches(['\u{feff}', '\0']);
    serde_json::from_str(normalized).map_err(ImportError::Malformed)
}

/// MIME type for an image file we are willing to inline, by extension.
pub fn image_mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Read a local image and inline it as a `data:` URI.
pub async fn load_image_file(path: &Path) -> Result<ImageRef> {
    let mime = image_mime_for_path(path)
        .ok_or_else(|| anyhow!("{} is not a supported image type", path.display()))?;
    let bytes = fs::read(path)
        .await
        .map_err(|e| anyhow!("Failed to read image {}: {}", path.display(), e))?;
    Ok(ImageRef::embed(&bytes, mime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_player_range() {
        let err = validate_new_game(NewGame::new("Bad", 5, 2, 30)).unwrap_err();
        assert_eq!(err, ValidationError::PlayerRange { min: 5, max: 2 });
    }

    #[test]
    fn rejects_blank_name() {
        assert_eq!(
            validate_new_game(NewGame::new("  \t ", 1, 2, 30)).unwrap_err(),
            ValidationError::EmptyName
        );
    }

    #[test]
    fn equal_player_bounds_are_fine() {
        assert!(validate_new_game(NewGame::new("Hive", 2, 2, 20)).is_ok());
    }

    #[test]
    fn cleans_text_fields() {
        let game = NewGame::new("  Azul\u{7}  ", 2, 4, 45)
            .with_description("Line 1\nLine 2\u{0}")
            .with_link("   ")
            .with_category(" Abstract\r\n");
        let cleaned = validate_new_game(game).expect("valid");
        assert_eq!(cleaned.name, "Azul");
        assert_eq!(cleaned.description, "Line 1\nLine 2");
        assert_eq!(cleaned.link, None);
        assert_eq!(cleaned.category.as_deref(), Some("Abstract"));
    }

    #[test]
    fn blank_image_is_dropped() {
        let game = NewGame::new("Azul", 2, 4, 45).with_image(ImageRef::from(" ".to_string()));
        assert_eq!(validate_new_game(game).expect("valid").image, None);
    }

    #[test]
    fn json_parse_strips_bom_and_nul() {
        let value = bounded_json_parse("\u{feff}{\"games\":[]}", 1024).expect("parse");
        assert!(value["games"].is_array());
        let value = bounded_json_parse("\0\0[1]", 1024).expect("parse");
        assert!(value.is_array());
    }

    #[test]
    fn json_parse_enforces_limit_and_syntax() {
        assert!(matches!(
            bounded_json_parse("{\"games\": []}", 4),
            Err(ImportError::TooLarge { limit: 4 })
        ));
        assert!(matches!(
            bounded_json_parse("{not json", 1024),
            Err(ImportError::Malformed(_))
        ));
    }

    #[test]
    fn image_mime_lookup() {
        assert_eq!(image_mime_for_path(Path::new("cover.JPG")), Some("image/jpeg"));
        assert_eq!(image_mime_for_path(Path::new("box.webp")), Some("image/webp"));
        assert_eq!(image_mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(image_mime_for_path(Path::new("noext")), None);
    }

    #[tokio::test]
    async fn image_files_are_inlined() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png = dir.path().join("cover.png");
        std::fs::write(&png, [0x89, b'P', b'N', b'G']).expect("write");
        let image = load_image_file(&png).await.expect("load");
        assert_eq!(image.mime(), Some("image/png"));

        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, "hello").expect("write");
        assert!(load_image_file(&txt).await.is_err());
    }
}

//! JSON import/export of the whole catalog.
//!
//! Documents use the browser app's layout so exports from either side can be
//! imported by the other:
//!
//! ```json
//! { "games": [ ... ], "wishlistGames": [ ... ] }
//! ```
//!
//! `owned` and `wishlist` are accepted as alternative key names on import.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::errors::ImportError;
use crate::catalog::types::{Game, Snapshot};
use crate::validation::bounded_json_parse;

pub const OWNED_KEY: &str = "games";
pub const WISHLIST_KEY: &str = "wishlistGames";

const OWNED_ALIASES: [&str; 2] = [OWNED_KEY, "owned"];
const WISHLIST_ALIASES: [&str; 2] = [WISHLIST_KEY, "wishlist"];

/// How an import treats a key that is present but not a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportPolicy {
    /// Ignore the malformed key and keep that list as it is.
    #[default]
    Lenient,
    /// Refuse the whole document.
    Strict,
}

/// Classification of one top-level key of an import document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyShape {
    Absent,
    WrongShape,
    Sequence(Vec<Game>),
}

impl KeyShape {
    /// Under the lenient policy a malformed key is treated as missing.
    pub fn relax(self) -> Self {
        match self {
            KeyShape::WrongShape => KeyShape::Absent,
            other => other,
        }
    }
}

/// A parsed import document, one classification per list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDocument {
    pub owned: KeyShape,
    pub wishlist: KeyShape,
}

impl ImportDocument {
    pub fn apply_policy(self, policy: ImportPolicy) -> Self {
        match policy {
            ImportPolicy::Strict => self,
            ImportPolicy::Lenient => Self {
                owned: self.owned.relax(),
                wishlist: self.wishlist.relax(),
            },
        }
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    #[serde(rename = "games")]
    owned: &'a [Game],
    #[serde(rename = "wishlistGames")]
    wishlist: &'a [Game],
}

/// Pretty-printed export document, optionally prefixed with a UTF-8 BOM.
pub fn export_document(snapshot: &Snapshot, byte_order_mark: bool) -> Result<String, serde_json::Error> {
    let body = serde_json::to_string_pretty(&ExportDocument {
        owned: &snapshot.owned,
        wishlist: &snapshot.wishlist,
    })?;
    if byte_order_mark {
        Ok(format!("\u{feff}{}", body))
    } else {
        Ok(body)
    }
}

fn classify(doc: &Value, aliases: &[&'static str]) -> Result<KeyShape, ImportError> {
    let Some((key, value)) = aliases
        .iter()
        .find_map(|k| doc.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)))
    else {
        return Ok(KeyShape::Absent);
    };
    let Some(items) = value.as_array() else {
        return Ok(KeyShape::WrongShape);
    };
    let mut games = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let game = Game::deserialize(item)
            .map_err(|source| ImportError::Record { key, index, source })?;
        games.push(game);
    }
    Ok(KeyShape::Sequence(games))
}

/// Parse and classify an import document without touching any state.
///
/// A document whose top level is not an object has neither key and
/// classifies as absent on both sides.
pub fn parse_document(content: &str, max_bytes: usize) -> Result<ImportDocument, ImportError> {
    let doc = bounded_json_parse(content, max_bytes)?;
    Ok(ImportDocument {
        owned: classify(&doc, &OWNED_ALIASES)?,
        wishlist: classify(&doc, &WISHLIST_ALIASES)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::example_games;

    #[test]
    fn export_uses_browser_key_names() {
        let snapshot = Snapshot {
            owned: example_games(),
            wishlist: Vec::new(),
        };
        let text = export_document(&snapshot, false).expect("export");
        let value: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value[OWNED_KEY].as_array().map(Vec::len), Some(5));
        assert!(value[WISHLIST_KEY].as_array().expect("array").is_empty());
        assert!(text.contains("\n  \""), "pretty printed");
    }

    #[test]
    fn export_bom_is_accepted_back() {
        let snapshot = Snapshot {
            owned: example_games(),
            wishlist: example_games().split_off(3),
        };
        let text = export_document(&snapshot, true).expect("export");
        assert!(text.starts_with('\u{feff}'));
        let doc = parse_document(&text, usize::MAX).expect("parse");
        assert_eq!(doc.owned, KeyShape::Sequence(snapshot.owned.clone()));
        assert_eq!(doc.wishlist, KeyShape::Sequence(snapshot.wishlist.clone()));
    }

    #[test]
    fn classifies_each_key_independently() {
        let doc = parse_document(r#"{"games": {"oops": 1}}"#, 1024).expect("parse");
        assert_eq!(doc.owned, KeyShape::WrongShape);
        assert_eq!(doc.wishlist, KeyShape::Absent);

        let doc = parse_document(r#"{"owned": [], "wishlist": "nope"}"#, 1024).expect("parse");
        assert_eq!(doc.owned, KeyShape::Sequence(vec![]));
        assert_eq!(doc.wishlist, KeyShape::WrongShape);
    }

    #[test]
    fn null_and_non_object_documents_are_absent() {
        let doc = parse_document(r#"{"games": null}"#, 1024).expect("parse");
        assert_eq!(doc.owned, KeyShape::Absent);
        let doc = parse_document("[1, 2, 3]", 1024).expect("parse");
        assert_eq!(doc.owned, KeyShape::Absent);
        assert_eq!(doc.wishlist, KeyShape::Absent);
    }

    #[test]
    fn undecodable_record_is_reported_with_position() {
        let err = parse_document(
            r#"{"wishlistGames": [{"id": 1, "name": "Ok", "minPlayers": 1, "maxPlayers": 2, "duration": 5}, {"name": 3}]}"#,
            1024,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::Record { key: WISHLIST_KEY, index: 1, .. }));
    }

    #[test]
    fn lenient_policy_relaxes_wrong_shapes_only() {
        let doc = ImportDocument {
            owned: KeyShape::WrongShape,
            wishlist: KeyShape::Sequence(vec![]),
        };
        let relaxed = doc.clone().apply_policy(ImportPolicy::Lenient);
        assert_eq!(relaxed.owned, KeyShape::Absent);
        assert_eq!(relaxed.wishlist, KeyShape::Sequence(vec![]));
        assert_eq!(doc.clone().apply_policy(ImportPolicy::Strict), doc);
    }
}

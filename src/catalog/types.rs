use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const GAME_SCHEMA_VERSION: u8 = 1;

/// Which of the two catalog lists a game lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Owned,
    Wishlist,
}

impl ListKind {
    pub fn other(self) -> Self {
        match self {
            ListKind::Owned => ListKind::Wishlist,
            ListKind::Wishlist => ListKind::Owned,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListKind::Owned => "owned",
            ListKind::Wishlist => "wishlist",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owned" | "games" | "my-games" | "collection" => Ok(ListKind::Owned),
            "wishlist" | "wish" | "wanted" => Ok(ListKind::Wishlist),
            other => Err(format!("unknown list '{}' (expected owned or wishlist)", other)),
        }
    }
}

/// The view currently displayed by the presentation layer. Mutations re-render
/// whichever section is active.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[default]
    Owned,
    Wishlist,
    Search,
    Add,
    Export,
    Import,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Owned => "owned",
            Section::Wishlist => "wishlist",
            Section::Search => "search",
            Section::Add => "add",
            Section::Export => "export",
            Section::Import => "import",
        };
        f.write_str(name)
    }
}

/// Cover art for a game: either a remote URL or an inlined `data:` URI.
///
/// Serialized as the bare string in both cases so documents stay compatible
/// with the plain `"image": "..."` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageRef {
    Remote(String),
    Embedded(String),
}

impl ImageRef {
    /// Inline raw image bytes as a base64 `data:` URI.
    pub fn embed(bytes: &[u8], mime: &str) -> Self {
        let payload = general_purpose::STANDARD.encode(bytes);
        ImageRef::Embedded(format!("data:{};base64,{}", mime, payload))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImageRef::Remote(url) | ImageRef::Embedded(url) => url,
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, ImageRef::Embedded(_))
    }

    /// MIME type of an embedded payload, if declared.
    pub fn mime(&self) -> Option<&str> {
        match self {
            ImageRef::Remote(_) => None,
            ImageRef::Embedded(uri) => uri
                .strip_prefix("data:")
                .and_then(|rest| rest.split([';', ',']).next())
                .filter(|m| !m.is_empty()),
        }
    }

    /// Approximate decoded size of an embedded payload in bytes.
    pub fn embedded_len(&self) -> Option<usize> {
        match self {
            ImageRef::Remote(_) => None,
            ImageRef::Embedded(uri) => uri
                .split_once(',')
                .map(|(_, payload)| payload.trim_end_matches('=').len() * 3 / 4),
        }
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        if value.starts_with("data:") {
            ImageRef::Embedded(value)
        } else {
            ImageRef::Remote(value)
        }
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        match value {
            ImageRef::Remote(url) | ImageRef::Embedded(url) => url,
        }
    }
}

/// Optional text fields are persisted by the browser app as `""` when unset.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(T::from))
}

/// A board game held in either the owned list or the wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub min_players: i64,
    pub max_players: i64,
    /// Typical play time in minutes.
    pub duration: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image: Option<ImageRef>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<String>,
}

impl Game {
    pub fn supports_players(&self, count: i64) -> bool {
        self.min_players <= count && count <= self.max_players
    }
}

/// Field values for a game that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewGame {
    pub name: String,
    pub min_players: i64,
    pub max_players: i64,
    pub duration: i64,
    pub description: String,
    pub image: Option<ImageRef>,
    pub link: Option<String>,
    pub category: Option<String>,
}

impl NewGame {
    pub fn new(name: impl Into<String>, min_players: i64, max_players: i64, duration: i64) -> Self {
        Self {
            name: name.into(),
            min_players,
            max_players,
            duration,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn into_game(self, id: i64) -> Game {
        Game {
            id,
            name: self.name,
            min_players: self.min_players,
            max_players: self.max_players,
            duration: self.duration,
            description: self.description,
            image: self.image,
            link: self.link,
            category: self.category,
        }
    }
}

/// Deep copy of both lists, independent of the live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub owned: Vec<Game>,
    pub wishlist: Vec<Game>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_fields_decode_as_none() {
        let json = r#"{"id":7,"name":"Azul","minPlayers":2,"maxPlayers":4,"duration":45,
            "description":"","image":"","link":"  ","category":"Abstract"}"#;
        let game: Game = serde_json::from_str(json).expect("decode");
        assert_eq!(game.image, None);
        assert_eq!(game.link, None);
        assert_eq!(game.category.as_deref(), Some("Abstract"));
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"id":1,"name":"Hive","minPlayers":2,"maxPlayers":2,"duration":20}"#;
        let game: Game = serde_json::from_str(json).expect("decode");
        assert_eq!(game.description, "");
        assert!(game.image.is_none());
    }

    #[test]
    fn image_classification() {
        assert!(!ImageRef::from("https://example.org/x.jpg".to_string()).is_embedded());
        let embedded = ImageRef::embed(b"\x89PNG....", "image/png");
        assert!(embedded.is_embedded());
        assert_eq!(embedded.mime(), Some("image/png"));
        assert!(embedded.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(embedded.embedded_len(), Some(8));
    }

    #[test]
    fn image_serializes_as_plain_string() {
        let game = NewGame::new("Dixit", 3, 6, 30)
            .with_image(ImageRef::Remote("https://example.org/dixit.jpg".into()))
            .into_game(2);
        let value = serde_json::to_value(&game).expect("encode");
        assert_eq!(value["image"], "https://example.org/dixit.jpg");
        assert_eq!(value["minPlayers"], 3);
    }

    #[test]
    fn list_kind_parsing() {
        assert_eq!("games".parse::<ListKind>(), Ok(ListKind::Owned));
        assert_eq!("Wishlist".parse::<ListKind>(), Ok(ListKind::Wishlist));
        assert!("shelf".parse::<ListKind>().is_err());
        assert_eq!(ListKind::Owned.other(), ListKind::Wishlist);
    }
}

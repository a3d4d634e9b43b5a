//! Search predicates over games.
//!
//! Name matching folds accents and punctuation away so "codigo" finds
//! "Código Secreto". Player count and duration band are plain range checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

use crate::catalog::types::Game;

/// Play-time bands. Every duration falls into exactly one band: 30 and 60
/// both belong to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationBand {
    Short,
    Medium,
    Long,
}

impl DurationBand {
    pub fn of(duration: i64) -> Self {
        if duration < 30 {
            DurationBand::Short
        } else if duration <= 60 {
            DurationBand::Medium
        } else {
            DurationBand::Long
        }
    }

    pub fn contains(self, duration: i64) -> bool {
        Self::of(duration) == self
    }
}

impl fmt::Display for DurationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DurationBand::Short => "short",
            DurationBand::Medium => "medium",
            DurationBand::Long => "long",
        })
    }
}

impl FromStr for DurationBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(DurationBand::Short),
            "medium" => Ok(DurationBand::Medium),
            "long" => Ok(DurationBand::Long),
            other => Err(format!(
                "unknown duration '{}' (expected short, medium or long)",
                other
            )),
        }
    }
}

/// Fold text for comparison: decompose, drop combining marks, keep only
/// ASCII word characters and whitespace, lowercase.
pub fn normalize_text(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Optional constraints; an unset field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub name_contains: Option<String>,
    /// Zero is treated as unset.
    pub player_count: Option<i64>,
    pub duration_band: Option<DurationBand>,
}

impl FilterSpec {
    pub fn is_unconstrained(&self) -> bool {
        self.matcher().is_unconstrained()
    }

    /// Pre-normalize the name filter once for repeated evaluation.
    pub fn matcher(&self) -> Matcher {
        Matcher {
            name: self
                .name_contains
                .as_deref()
                .map(normalize_text)
                .filter(|n| !n.is_empty()),
            players: self.player_count.filter(|n| *n > 0),
            band: self.duration_band,
        }
    }

    pub fn matches(&self, game: &Game) -> bool {
        self.matcher().matches(game)
    }

    /// Games satisfying every constraint, in input order.
    pub fn select<'a, I>(&self, games: I) -> Vec<&'a Game>
    where
        I: IntoIterator<Item = &'a Game>,
    {
        let matcher = self.matcher();
        games.into_iter().filter(|g| matcher.matches(g)).collect()
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(name) = self.name_contains.as_deref().filter(|n| !n.trim().is_empty()) {
            parts.push(format!("name~\"{}\"", name));
        }
        if let Some(n) = self.player_count.filter(|n| *n > 0) {
            parts.push(format!("players={}", n));
        }
        if let Some(band) = self.duration_band {
            parts.push(format!("duration={}", band));
        }
        if parts.is_empty() {
            f.write_str("everything")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

#[derive(Debug, Clone)]
pub struct Matcher {
    name: Option<String>,
    players: Option<i64>,
    band: Option<DurationBand>,
}

impl Matcher {
    pub fn is_unconstrained(&self) -> bool {
        self.name.is_none() && self.players.is_none() && self.band.is_none()
    }

    pub fn matches(&self, game: &Game) -> bool {
        if let Some(needle) = &self.name {
            if !normalize_text(&game.name).contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(count) = self.players {
            if !game.supports_players(count) {
                return false;
            }
        }
        if let Some(band) = self.band {
            if !band.contains(game.duration) {
                return false;
            }
        }
        true
    }
}

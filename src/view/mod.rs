//! Plain-text rendering of catalog views for the CLI and the shell.
//!
//! Every function returns a `String`; callers decide where it goes.

use std::fmt::Write;

use crate::catalog::{Catalog, FilterSpec, Game, ImageRef, ImportSummary, ListKind};

/// Card descriptions are cut after this many characters.
pub const CARD_DESCRIPTION_LIMIT: usize = 200;

/// Description truncated for a card, with a placeholder when empty.
pub fn short_description(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return "No description".to_string();
    }
    let mut chars = trimmed.chars();
    let short: String = chars.by_ref().take(CARD_DESCRIPTION_LIMIT).collect();
    if chars.next().is_some() {
        format!("{}…", short)
    } else {
        short
    }
}

fn image_label(image: &Option<ImageRef>) -> String {
    match image {
        None => "no image".to_string(),
        Some(ImageRef::Remote(url)) => url.clone(),
        Some(embedded @ ImageRef::Embedded(_)) => format!(
            "embedded {} ({} bytes)",
            embedded.mime().unwrap_or("image"),
            embedded.embedded_len().unwrap_or(0)
        ),
    }
}

/// One card: header line with id, name, players and duration, then the
/// shortened description. `tag` marks which list a search hit came from.
pub fn card(game: &Game, tag: Option<ListKind>) -> String {
    let mut out = String::new();
    let marker = match tag {
        Some(ListKind::Wishlist) => " ★",
        Some(ListKind::Owned) => " ✓",
        None => "",
    };
    let _ = writeln!(
        out,
        "[{}] {}{}  ({}-{} players, {} min)",
        game.id, game.name, marker, game.min_players, game.max_players, game.duration
    );
    if let Some(category) = &game.category {
        let _ = writeln!(out, "    {}", category);
    }
    for line in short_description(&game.description).lines() {
        let _ = writeln!(out, "    {}", line);
    }
    out
}

/// A whole list, or its empty state.
pub fn render_list(kind: ListKind, games: &[Game]) -> String {
    if games.is_empty() {
        return match kind {
            ListKind::Owned => {
                "No games in your collection.\nUse `add` to add your first game.\n".to_string()
            }
            ListKind::Wishlist => "Your wishlist is empty.\nUse `wish <id>` on any owned game to add it here.\n".to_string(),
        };
    }
    let title = match kind {
        ListKind::Owned => "My games",
        ListKind::Wishlist => "Wishlist",
    };
    let mut out = format!("{} ({})\n\n", title, games.len());
    for game in games {
        out.push_str(&card(game, None));
        out.push('\n');
    }
    out
}

/// Search hits tagged with the list each one lives in.
pub fn render_search(catalog: &Catalog, spec: &FilterSpec, hits: &[&Game]) -> String {
    if hits.is_empty() {
        return format!("No games match {}.\n", spec);
    }
    let mut out = format!("{} result(s) for {}\n\n", hits.len(), spec);
    for game in hits {
        out.push_str(&card(game, catalog.locate(game.id)));
        out.push('\n');
    }
    out
}

/// Owned games narrowed by a filter.
pub fn render_filtered(spec: &FilterSpec, hits: &[&Game]) -> String {
    if hits.is_empty() {
        return format!("No games in your collection match {}.\n", spec);
    }
    let mut out = format!("My games matching {} ({})\n\n", spec, hits.len());
    for game in hits {
        out.push_str(&card(game, None));
        out.push('\n');
    }
    out
}

/// Prompt shown in the search section before any search has run.
pub fn search_hint() -> String {
    "Search across your games and wishlist: search [name=..] [players=N] [duration=short|medium|long]\n"
        .to_string()
}

/// Full detail view of one game.
pub fn render_details(game: &Game, kind: ListKind) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{}, {})", game.name, game.id, kind);
    let _ = writeln!(out, "Players:  {}-{}", game.min_players, game.max_players);
    let _ = writeln!(out, "Duration: {} minutes", game.duration);
    if let Some(category) = &game.category {
        let _ = writeln!(out, "Category: {}", category);
    }
    let _ = writeln!(out, "Image:    {}", image_label(&game.image));
    if let Some(link) = &game.link {
        let _ = writeln!(out, "More:     {}", link);
    }
    out.push('\n');
    if game.description.trim().is_empty() {
        out.push_str("No description available.\n");
    } else {
        out.push_str(game.description.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_status(catalog: &Catalog, data_dir: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Backend:  {} ({})", catalog.store().backend(), data_dir);
    let _ = writeln!(out, "Owned:    {}", catalog.owned().len());
    let _ = writeln!(out, "Wishlist: {}", catalog.wishlist().len());
    let _ = writeln!(out, "Import:   {:?} policy", catalog.options().import_policy);
    out
}

pub fn render_import_summary(summary: &ImportSummary) -> String {
    let side = |replaced: bool, count: usize| {
        if replaced {
            format!("{} imported", count)
        } else {
            format!("{} kept", count)
        }
    };
    format!(
        "Import complete: owned {}, wishlist {}.\n",
        side(summary.owned_replaced, summary.owned),
        side(summary.wishlist_replaced, summary.wishlist)
    )
}

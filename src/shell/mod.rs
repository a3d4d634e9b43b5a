//! Interactive catalog shell.
//!
//! The shell keeps track of the active section and re-renders it after every
//! change, re-running the last search when the search section is showing.
//! Deleting is a two-step exchange: `rm <id>` asks, and only a `y` on the next
//! line confirms it.

pub mod parser;

use std::path::Path;

use anyhow::{anyhow, Result};
use log::{debug, info};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::catalog::{Catalog, FilterSpec, ListKind, Section};
use crate::config::ExportConfig;
use crate::view;

pub use parser::{parse, tokenize, ShellCommand};

const HELP: &str = "\
Commands:
  owned | wishlist                 show a list
  filter [name=..] [players=N] [duration=short|medium|long]
                                   narrow your games
  search [name=..] [players=N] [duration=..]
                                   search both lists
  show <id>                        game details
  wish <id> | own <id> | toggle <id>
                                   move a game between lists
  rm <id>                          delete (asks for confirmation)
  add name=\"..\" min=N max=N duration=N [description=..] [image=..]
      [link=..] [category=..] [list=owned|wishlist]
  export [path] | import <path>
  help | quit
";

pub struct Shell {
    catalog: Catalog,
    export: ExportConfig,
    last_search: Option<FilterSpec>,
    pending_delete: Option<i64>,
    finished: bool,
}

impl Shell {
    pub fn new(catalog: Catalog, export: ExportConfig) -> Self {
        Self {
            catalog,
            export,
            last_search: None,
            pending_delete: None,
            finished: false,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.pending_delete.is_some()
    }

    /// Render whatever section is active. Non-list sections render nothing.
    pub fn render_active(&self) -> String {
        match self.catalog.section() {
            Section::Owned => view::render_list(ListKind::Owned, self.catalog.owned()),
            Section::Wishlist => view::render_list(ListKind::Wishlist, self.catalog.wishlist()),
            Section::Search => match &self.last_search {
                Some(spec) => {
                    let hits = self.catalog.search_all(spec);
                    view::render_search(&self.catalog, spec, &hits)
                }
                None => view::search_hint(),
            },
            Section::Add | Section::Export | Section::Import => String::new(),
        }
    }

    fn after_change(&self, message: String) -> String {
        let rendered = self.render_active();
        if rendered.is_empty() {
            message
        } else {
            format!("{}\n{}", message, rendered)
        }
    }

    /// Handle one input line and return the text to display.
    pub async fn handle_line(&mut self, line: &str) -> String {
        if let Some(id) = self.pending_delete.take() {
            return self.confirm_delete(id, line).await;
        }
        match self.dispatch(parse(line)).await {
            Ok(out) => out,
            Err(e) => format!("Error: {}\n", e),
        }
    }

    async fn confirm_delete(&mut self, id: i64, answer: &str) -> String {
        let answer = answer.trim();
        if !(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")) {
            debug!("Delete of {} cancelled", id);
            return "Delete cancelled.\n".to_string();
        }
        match self.catalog.remove(id).await {
            Ok(true) => self.after_change(format!("Deleted game #{}.\n", id)),
            Ok(false) => format!("Game #{} no longer exists.\n", id),
            Err(e) => format!("Error: {}\n", e),
        }
    }

    async fn dispatch(&mut self, command: ShellCommand) -> Result<String> {
        match command {
            ShellCommand::Empty => Ok(String::new()),
            ShellCommand::Help => Ok(HELP.to_string()),
            ShellCommand::Quit => {
                self.finished = true;
                Ok("Bye.\n".to_string())
            }
            ShellCommand::Unknown(word) => Ok(format!("Unknown command '{}'. Type help.\n", word)),
            ShellCommand::Invalid(msg) => Ok(format!("{}\n", msg)),
            ShellCommand::Show(kind) => {
                self.catalog.set_section(match kind {
                    ListKind::Owned => Section::Owned,
                    ListKind::Wishlist => Section::Wishlist,
                });
                Ok(self.render_active())
            }
            ShellCommand::Filter(spec) => {
                self.catalog.set_section(Section::Owned);
                let hits = self.catalog.filter(&spec);
                Ok(view::render_filtered(&spec, &hits))
            }
            ShellCommand::Search(spec) => {
                self.catalog.set_section(Section::Search);
                self.last_search = Some(spec);
                Ok(self.render_active())
            }
            ShellCommand::Details(id) => Ok(match self.catalog.find(id) {
                Some((game, kind)) => view::render_details(game, kind),
                None => format!("No game with id {}.\n", id),
            }),
            ShellCommand::Wish(id) => {
                let moved = self.catalog.move_to_wishlist(id).await?;
                Ok(self.moved(id, moved, ListKind::Wishlist))
            }
            ShellCommand::Own(id) => {
                let moved = self.catalog.move_to_owned(id).await?;
                Ok(self.moved(id, moved, ListKind::Owned))
            }
            ShellCommand::Toggle(id) => {
                let moved = self.catalog.toggle(id).await?;
                let target = self.catalog.locate(id).unwrap_or(ListKind::Owned);
                Ok(self.moved(id, moved, target))
            }
            ShellCommand::Remove(id) => Ok(match self.catalog.find(id) {
                Some((game, kind)) => {
                    let prompt = format!("Delete '{}' from your {}? (y/N)\n", game.name, kind);
                    self.pending_delete = Some(id);
                    prompt
                }
                None => format!("No game with id {}.\n", id),
            }),
            ShellCommand::Add { game, list } => {
                self.catalog.set_section(Section::Add);
                let added = self.catalog.add(game, list).await?;
                self.catalog.set_section(Section::Owned);
                Ok(self.after_change(format!(
                    "Added '{}' (#{}) to your {}.\n",
                    added.name, added.id, list
                )))
            }
            ShellCommand::Export(path) => {
                self.catalog.set_section(Section::Export);
                let path = path.unwrap_or_else(|| self.export.file.clone());
                let count = self.catalog.len();
                export_to_file(&self.catalog, &path, self.export.byte_order_mark).await?;
                Ok(format!("Exported {} games to {}.\n", count, path))
            }
            ShellCommand::Import(path) => {
                self.catalog.set_section(Section::Import);
                let summary = import_from_file(&mut self.catalog, &path).await?;
                self.catalog.set_section(Section::Owned);
                Ok(self.after_change(view::render_import_summary(&summary)))
            }
        }
    }

    fn moved(&self, id: i64, moved: bool, to: ListKind) -> String {
        if moved {
            self.after_change(format!("Moved game #{} to your {}.\n", id, to))
        } else {
            format!("Nothing to move: no matching game #{}.\n", id)
        }
    }

    /// Read commands from stdin until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        stdout.write_all(self.render_active().as_bytes()).await?;
        while !self.finished {
            let prompt = if self.awaiting_confirmation() { "confirm> " } else { "gameshelf> " };
            stdout.write_all(prompt.as_bytes()).await?;
            stdout.flush().await?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let out = self.handle_line(&line).await;
            stdout.write_all(out.as_bytes()).await?;
        }
        stdout.flush().await?;
        info!("Shell closed");
        Ok(())
    }
}

/// Write the catalog export document to `path`.
pub async fn export_to_file(catalog: &Catalog, path: &str, byte_order_mark: bool) -> Result<()> {
    let document = catalog.export_document(byte_order_mark)?;
    fs::write(path, document)
        .await
        .map_err(|e| anyhow!("Failed to write export file {}: {}", path, e))?;
    info!("Exported catalog to {}", path);
    Ok(())
}

/// Read an export document from `path` and replace the catalog with it.
pub async fn import_from_file(
    catalog: &mut Catalog,
    path: &str,
) -> Result<crate::catalog::ImportSummary> {
    if !Path::new(path).is_file() {
        return Err(anyhow!("Import file {} does not exist", path));
    }
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| anyhow!("Failed to read import file {}: {}", path, e))?;
    Ok(catalog.import_document(&content).await?)
}

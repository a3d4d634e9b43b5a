//! Binary entrypoint for the gameshelf CLI.
//!
//! Commands:
//! - `init` - write a starter `gameshelf.toml` and create the store
//! - `status` - backend and list sizes
//! - `list [--wishlist]`, `show <id>` - browse the catalog
//! - `add ...`, `wish <id>`, `own <id>`, `toggle <id>`, `remove <id>` - edit it
//! - `filter ...`, `search ...` - query it
//! - `export`, `import <path>` - move it between machines
//! - `shell` - interactive session
//!
//! See the library crate docs for module-level details: `gameshelf::`.
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info};

use gameshelf::catalog::{Catalog, CatalogOptions, DurationBand, FilterSpec, ImageRef, ListKind, NewGame};
use gameshelf::config::{Config, DEFAULT_CONFIG_PATH};
use gameshelf::shell::{export_to_file, import_from_file, Shell};
use gameshelf::storage::open_store;
use gameshelf::validation::load_image_file;
use gameshelf::view;

#[derive(Parser)]
#[command(name = "gameshelf")]
#[command(about = "Keep track of the board games you own and the ones you want")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Part of the game name; accents and punctuation are ignored
    #[arg(short, long)]
    name: Option<String>,
    /// Number of players the game must support
    #[arg(short, long)]
    players: Option<i64>,
    /// Play time: short (<30), medium (30-60) or long (>60)
    #[arg(short, long)]
    duration: Option<DurationBand>,
}

impl From<FilterArgs> for FilterSpec {
    fn from(args: FilterArgs) -> Self {
        FilterSpec {
            name_contains: args.name,
            player_count: args.players,
            duration_band: args.duration,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file and initialize the store
    Init,
    /// Show storage backend and catalog size
    Status,
    /// List owned games (or the wishlist)
    List {
        #[arg(short, long)]
        wishlist: bool,
    },
    /// Show all details of one game
    Show { id: i64 },
    /// Add a new game
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "min")]
        min_players: i64,
        #[arg(long = "max")]
        max_players: i64,
        /// Play time in minutes
        #[arg(long)]
        duration: i64,
        #[arg(long, default_value = "")]
        description: String,
        /// Image URL
        #[arg(long, conflicts_with = "image_file")]
        image: Option<String>,
        /// Local image to embed in the record
        #[arg(long)]
        image_file: Option<PathBuf>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Add to the wishlist instead of your collection
        #[arg(short, long)]
        wishlist: bool,
    },
    /// Move an owned game to the wishlist
    Wish { id: i64 },
    /// Move a wishlist game to your collection
    Own { id: i64 },
    /// Move a game to whichever list it is not in
    Toggle { id: i64 },
    /// Delete a game from either list
    Remove {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Filter your owned games
    Filter(FilterArgs),
    /// Search both lists
    Search(FilterArgs),
    /// Export both lists as JSON
    Export {
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<String>,
        /// Print the document instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Replace the catalog with an exported document
    Import { path: String },
    /// Start an interactive session
    Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        info!("Initializing new gameshelf configuration");
        if std::path::Path::new(&cli.config).exists() {
            info!("Keeping existing configuration at {}", cli.config);
        } else {
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        let config = Config::load(&cli.config).await?;
        let catalog = open_catalog(&config).await?;
        println!(
            "Catalog ready in {} ({} owned, {} wishlist)",
            config.storage.data_dir,
            catalog.owned().len(),
            catalog.wishlist().len()
        );
        return Ok(());
    }

    let config = Config::load_or_default(&cli.config).await?;
    init_logging(&Some(config.clone()), cli.verbose);
    let mut catalog = open_catalog(&config).await?;

    match cli.command {
        // Handled before the catalog is opened
        Commands::Init => {}
        Commands::Status => print!("{}", view::render_status(&catalog, &config.storage.data_dir)),
        Commands::List { wishlist } => {
            let kind = if wishlist { ListKind::Wishlist } else { ListKind::Owned };
            print!("{}", view::render_list(kind, catalog.list(kind)));
        }
        Commands::Show { id } => match catalog.find(id) {
            Some((game, kind)) => print!("{}", view::render_details(game, kind)),
            None => return Err(anyhow!("No game with id {}", id)),
        },
        Commands::Add {
            name,
            min_players,
            max_players,
            duration,
            description,
            image,
            image_file,
            link,
            category,
            wishlist,
        } => {
            let mut game = NewGame::new(name, min_players, max_players, duration).with_description(description);
            game.image = match (image, image_file) {
                (_, Some(path)) => Some(load_image_file(&path).await?),
                (Some(url), None) => Some(ImageRef::from(url)),
                (None, None) => None,
            };
            game.link = link;
            game.category = category;
            let target = if wishlist { ListKind::Wishlist } else { ListKind::Owned };
            let added = catalog.add(game, target).await?;
            println!("Added '{}' (#{}) to your {}", added.name, added.id, target);
        }
        Commands::Wish { id } => report_move(catalog.move_to_wishlist(id).await?, id, ListKind::Wishlist),
        Commands::Own { id } => report_move(catalog.move_to_owned(id).await?, id, ListKind::Owned),
        Commands::Toggle { id } => {
            let moved = catalog.toggle(id).await?;
            report_move(moved, id, catalog.locate(id).unwrap_or(ListKind::Owned));
        }
        Commands::Remove { id, yes } => {
            let Some((game, kind)) = catalog.find(id) else {
                println!("No game with id {}", id);
                return Ok(());
            };
            let question = format!("Delete '{}' from your {}?", game.name, kind);
            if !yes && !confirm(&question)? {
                println!("Delete cancelled");
                return Ok(());
            }
            if catalog.remove(id).await? {
                println!("Deleted game #{}", id);
            }
        }
        Commands::Filter(args) => {
            let spec = FilterSpec::from(args);
            let hits = catalog.filter(&spec);
            print!("{}", view::render_filtered(&spec, &hits));
        }
        Commands::Search(args) => {
            let spec = FilterSpec::from(args);
            let hits = catalog.search_all(&spec);
            print!("{}", view::render_search(&catalog, &spec, &hits));
        }
        Commands::Export { output, stdout } => {
            if stdout {
                print!("{}", catalog.export_document(false)?);
            } else {
                let path = output.unwrap_or_else(|| config.export.file.clone());
                export_to_file(&catalog, &path, config.export.byte_order_mark).await?;
                println!("Exported {} games to {}", catalog.len(), path);
            }
        }
        Commands::Import { path } => {
            let summary = import_from_file(&mut catalog, &path).await?;
            print!("{}", view::render_import_summary(&summary));
        }
        Commands::Shell => {
            let mut shell = Shell::new(catalog, config.export.clone());
            shell.run().await?;
        }
    }
    Ok(())
}

async fn open_catalog(config: &Config) -> Result<Catalog> {
    let store = open_store(&config.storage).await?;
    let catalog = Catalog::initialize(store, CatalogOptions::from(&config.catalog)).await?;
    Ok(catalog)
}

fn report_move(moved: bool, id: i64, to: ListKind) {
    if moved {
        println!("Moved game #{} to your {}", id, to);
    } else {
        println!("Nothing to move: no matching game #{}", id);
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Warn),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Mirror to the console only when stderr is a terminal and the user
        // asked for more output
        let mirror = atty::is(atty::Stream::Stderr) && verbosity > 0;
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if mirror {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}

//! # Movie Finder CLI (`movie-finder`)
//!
//! ## Usage
//!
//! ```bash
//! movie-finder --config ./config/movie-finder.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `movie-finder lookup <name>` | Look a movie up, scraping it if it is not stored |
//! | `movie-finder list` | List stored records |
//! | `movie-finder show <name>` | Print a stored record without going online |

use anyhow::bail;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use movie_finder::config;
use movie_finder::error::LookupError;
use movie_finder::fetch::HttpFetcher;
use movie_finder::lookup::{Lookup, LookupOutcome};
use movie_finder::menu;
use movie_finder::progress::ProgressMode;
use movie_finder::prompt::{MessageKind, Prompter, TerminalPrompter};
use movie_finder::store::RecordStore;

/// Movie Finder CLI — look movies up in a local store, falling back to the web.
#[derive(Parser)]
#[command(
    name = "movie-finder",
    about = "Movie Finder — local-first movie lookup with web fallback",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/movie-finder.toml`. Built-in defaults are used
    /// when the file does not exist.
    #[arg(long, global = true, default_value = "./config/movie-finder.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Look a movie up by name.
    ///
    /// Checks the local store first (case-insensitive title match). On a
    /// miss, searches the source site, asks which result is meant, scrapes
    /// its detail page, and saves the new record.
    Lookup {
        /// Movie name.
        name: String,

        /// Print the full summary instead of opening the detail menu.
        #[arg(long)]
        no_menu: bool,

        /// Progress output on stderr: `off`, `human`, or `json`.
        /// Defaults to `human` when stderr is a terminal.
        #[arg(long)]
        progress: Option<String>,
    },

    /// List stored records in insertion order.
    List,

    /// Print a stored record. Never goes online.
    Show {
        /// Movie title (case-insensitive).
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config_or_default(&cli.config)?;
    let store = RecordStore::new(&cfg.store.path);

    match cli.command {
        Commands::Lookup {
            name,
            no_menu,
            progress,
        } => {
            let mode = match progress.as_deref() {
                Some(s) => match ProgressMode::parse(s) {
                    Some(mode) => mode,
                    None => bail!("Unknown progress mode: '{}'. Must be off, human, or json.", s),
                },
                None => ProgressMode::default_for_tty(),
            };
            let reporter = mode.reporter();
            let prompter = TerminalPrompter::stdio();
            let fetcher = HttpFetcher::new(&cfg.source)?;
            let base_url = cfg.source.base()?;

            let lookup = Lookup {
                store: &store,
                fetcher: &fetcher,
                prompter: &prompter,
                reporter: reporter.as_ref(),
                base_url: &base_url,
            };

            let outcome = match lookup.run(&name).await {
                Ok(outcome) => outcome,
                Err(LookupError::EmptyQuery) => {
                    prompter.show_message(MessageKind::Warning, "Please enter a movie name.");
                    std::process::exit(2);
                }
                Err(e) => {
                    prompter.show_message(MessageKind::Error, &e.to_string());
                    std::process::exit(1);
                }
            };

            match &outcome {
                LookupOutcome::Cached { record, .. } => {
                    prompter.show_message(
                        MessageKind::Info,
                        &format!("Found '{}' in database!", record.title),
                    );
                }
                LookupOutcome::Fetched {
                    record,
                    persist_error,
                    ..
                } => match persist_error {
                    None => prompter.show_message(
                        MessageKind::Info,
                        &format!("Successfully added '{}' to database!", record.title),
                    ),
                    Some(e) => prompter.show_message(
                        MessageKind::Error,
                        &format!("Failed to save database: {}", e),
                    ),
                },
                LookupOutcome::NoResults => {
                    prompter.show_message(MessageKind::Info, "No search results found.");
                }
                LookupOutcome::Cancelled => {}
            }

            if let Some((key, record)) = outcome.record() {
                if no_menu {
                    println!("{}", menu::full_summary(record));
                } else {
                    menu::run_menu(&prompter, key, record);
                }
            }
        }
        Commands::List => {
            let map = store.load();
            if map.is_empty() {
                println!("No movies stored in {}", store.path().display());
            } else {
                println!("{:<40} {:<6} TITLE", "KEY", "YEAR");
                for (key, record) in &map {
                    println!("{:<40} {:<6} {}", key, record.year, record.title);
                }
            }
        }
        Commands::Show { name } => match store.find(name.trim()) {
            Some((key, record)) => {
                println!("--- {} ---", key);
                println!("{}", menu::full_summary(&record));
            }
            None => {
                eprintln!("Error: '{}' not found in {}", name, store.path().display());
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

//! Terminal flashcard manager.
//!
//! Opens the flashcard database and runs the interactive menu on
//! stdin/stdout. Logs go to stderr.

mod console;

use std::path::PathBuf;

use cardflash::{Config, FlashcardStore};
use clap::Parser;
use tracing::{debug, info};

use crate::console::Console;

// ============================================================================
// CLI Arguments
// ============================================================================

/// Terminal flashcard manager backed by SQLite.
#[derive(Parser, Debug)]
#[command(name = "cardflash")]
#[command(version, about, long_about = None)]
struct Args {
    /// Settings file (TOML). Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Number of cards shown in a random review
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    review_size: Option<u16>,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Settings file values with command-line overrides applied.
    fn resolve_config(&self) -> cardflash::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(size) = self.review_size {
            config.review_size = usize::from(size);
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = args.resolve_config()?;
    info!(
        database = %config.database.display(),
        review_size = config.review_size,
        "Starting cardflash"
    );

    if let Some(parent) = config.database.parent() {
        if !parent.as_os_str().is_empty() {
            debug!(dir = %parent.display(), "Ensuring database directory");
            std::fs::create_dir_all(parent)?;
        }
    }

    let store = FlashcardStore::open(&config.database)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Console::new(&store, stdin.lock(), stdout.lock(), config.review_size).run()?;

    info!("Goodbye");
    Ok(())
}

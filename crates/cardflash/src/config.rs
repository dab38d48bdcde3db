//! Settings file for the flashcard tools.
//!
//! # Example TOML
//!
//! ```toml
//! # Where the SQLite file lives (relative paths resolve against the
//! # working directory).
//! database = "database/db.sqlite"
//!
//! # How many cards a random review shows.
//! review_size = 10
//! ```
//!
//! Every key is optional; missing keys fall back to the defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default database location.
pub const DEFAULT_DATABASE: &str = "database/db.sqlite";

/// Default number of cards in a random review.
pub const DEFAULT_REVIEW_SIZE: usize = 10;

/// Flashcard tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path of the SQLite database file.
    pub database: PathBuf,

    /// Number of cards drawn for a random review.
    pub review_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            review_size: DEFAULT_REVIEW_SIZE,
        }
    }
}

impl Config {
    /// Load settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse settings from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.review_size == 0 {
            return Err(Error::Validation("review_size must be at least 1".to_string()));
        }
        if self.database.as_os_str().is_empty() {
            return Err(Error::Validation("database path must not be empty".to_string()));
        }
        Ok(())
    }
}

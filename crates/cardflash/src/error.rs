//! Error types for cardflash.
//!
//! Store operations separate three kinds of failure:
//!
//! 1. **Validation**: the caller handed in something the store refuses to
//!    write (empty text, a malformed id).
//! 2. **Availability**: the database could not be opened or its schema could
//!    not be created. Nothing else can proceed after this.
//! 3. **Read/write failures**: SQLite failed during a single call.
//!
//! A card that does not exist is *not* an error. Lookups return `None` and
//! updates/deletes report `false`.
//!
//! # Example
//!
//! ```no_run
//! use cardflash::{Error, FlashcardStore};
//!
//! # fn example() -> cardflash::Result<()> {
//! let store = FlashcardStore::open("cards.sqlite")?;
//!
//! match store.insert("", "Paris") {
//!     Ok(id) => println!("created card {}", id),
//!     Err(Error::Validation(msg)) => eprintln!("rejected: {}", msg),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Result type for cardflash operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while working with a flashcard store.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied input was rejected.
    #[error("validation error: {0}")]
    Validation(String),

    /// The database could not be opened or its schema could not be ensured.
    #[error("storage unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        /// Location that was being opened.
        path: PathBuf,
        /// Underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// A query failed for a reason other than "no such card".
    #[error("storage read failed: {0}")]
    StorageRead(#[source] rusqlite::Error),

    /// A mutation failed and was rolled back.
    #[error("storage write failed: {0}")]
    StorageWrite(#[source] rusqlite::Error),

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::Validation`] from anything printable.
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

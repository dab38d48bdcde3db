//! A small, durable flashcard store backed by SQLite.
//!
//! Cards are question/answer pairs with creation and update timestamps.
//! The store assigns ids, keeps the timestamps honest and draws random
//! review sequences.
//!
//! # Quick Start
//!
//! ```no_run
//! use cardflash::FlashcardStore;
//!
//! # fn main() -> cardflash::Result<()> {
//! let store = FlashcardStore::open("database/db.sqlite")?;
//!
//! let france = store.insert("Capital of France?", "Paris")?;
//! let germany = store.insert("Capital of Germany?", "Berlin")?;
//!
//! store.update(france, "Capitale de la France?", "Paris")?;
//! store.delete(germany)?;
//!
//! assert_eq!(store.all_ids()?, vec![france]);
//!
//! for card in store.random(10)? {
//!     println!("{} -> {}", card.question(), card.answer());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Storage Layout
//!
//! A single `flashcards` table:
//!
//! | column | type |
//! |--------|------|
//! | `id` | `INTEGER PRIMARY KEY AUTOINCREMENT` |
//! | `question` | `TEXT NOT NULL` |
//! | `answer` | `TEXT NOT NULL` |
//! | `created_on` | `TEXT NOT NULL` |
//! | `updated_on` | `TEXT NOT NULL` |
//!
//! Timestamps are UTC in the fixed-width form `2024-01-02T03:04:05.000000Z`,
//! so comparing the text compares the times. A card that was never edited
//! has `updated_on == created_on`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod card;
pub mod config;
pub mod error;
pub mod sql;
pub mod store;

pub use card::{CardId, Flashcard};
pub use config::Config;
pub use error::{Error, Result};
pub use store::FlashcardStore;

//! The SQLite-backed flashcard store.

use std::path::{Path, PathBuf};

use chrono::Duration;
use rand::Rng;
use rand::seq::index;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::card::{CardId, Flashcard, now, validate_text};
use crate::error::{Error, Result};
use crate::sql::{CARD_COLUMNS, SCHEMA, card_from_row, format_timestamp, timestamp_column};

/// Durable CRUD and random sampling over flashcards.
///
/// Every write runs in its own transaction: it either fully applies or
/// leaves the table untouched. Cards that don't exist are reported as
/// `None`/`false`, never as errors.
///
/// The store owns its connection and is not `Sync`. Wrap it in a
/// `Mutex` to share it between threads.
///
/// # Example
///
/// ```no_run
/// use cardflash::FlashcardStore;
///
/// # fn main() -> cardflash::Result<()> {
/// let store = FlashcardStore::open("database/db.sqlite")?;
///
/// let id = store.insert("Capital of France?", "Paris")?;
/// store.update(id, "Capitale de la France?", "Paris")?;
///
/// for line in store.render_all()? {
///     println!("{}", line);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FlashcardStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl FlashcardStore {
    /// Open (or create) the store at `path` and ensure its table exists.
    ///
    /// The parent directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the file cannot be opened
    /// or the schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!(path = %path.display(), "Opening flashcard database");

        let conn = Connection::open(&path).map_err(|source| Error::StorageUnavailable {
            path: path.clone(),
            source,
        })?;
        let store = Self::with_connection(conn, Some(path))?;

        info!("Flashcard store ready");
        Ok(store)
    }

    /// Open a store that lives only as long as the returned value.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::StorageUnavailable {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::with_connection(conn, None)
    }

    fn with_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|source| Error::StorageUnavailable {
                path: path.clone().unwrap_or_else(|| PathBuf::from(":memory:")),
                source,
            })?;
        Ok(Self { conn, path })
    }

    /// Backing file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create a card and return its new id.
    ///
    /// Both timestamps are set to the current time.
    pub fn insert(&self, question: &str, answer: &str) -> Result<CardId> {
        let mut card = Flashcard::new(question, answer)?;
        self.insert_card(&mut card)
    }

    /// Persist a card built by the caller and assign its id in place.
    ///
    /// The card's own timestamps are stored as they are.
    pub fn insert_card(&self, card: &mut Flashcard) -> Result<CardId> {
        validate_text("question", card.question())?;
        validate_text("answer", card.answer())?;

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(Error::StorageWrite)?;
        tx.execute(
            "INSERT INTO flashcards (question, answer, created_on, updated_on)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                card.question(),
                card.answer(),
                format_timestamp(card.created_on()),
                format_timestamp(card.updated_on()),
            ],
        )
        .map_err(Error::StorageWrite)?;
        let id = CardId::from_row(tx.last_insert_rowid());
        tx.commit().map_err(Error::StorageWrite)?;

        card.assign_id(id);
        info!(card_id = %id, "Flashcard created");
        Ok(id)
    }

    /// Remove a card. Returns `false` if there was no such card.
    pub fn delete(&self, id: CardId) -> Result<bool> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(Error::StorageWrite)?;
        let removed = tx
            .execute("DELETE FROM flashcards WHERE id = ?1", params![id.get()])
            .map_err(Error::StorageWrite)?;
        tx.commit().map_err(Error::StorageWrite)?;

        if removed > 0 {
            info!(card_id = %id, "Flashcard deleted");
        } else {
            debug!(card_id = %id, "Delete skipped, no such flashcard");
        }
        Ok(removed > 0)
    }

    /// Replace a card's question and answer and refresh `updated_on`.
    ///
    /// Returns `false` if there was no such card. The new `updated_on` is
    /// always strictly later than the previous one, even if the clock has
    /// not moved.
    pub fn update(&self, id: CardId, question: &str, answer: &str) -> Result<bool> {
        validate_text("question", question)?;
        validate_text("answer", answer)?;

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(Error::StorageWrite)?;

        let previous = match tx
            .query_row(
                "SELECT updated_on FROM flashcards WHERE id = ?1",
                params![id.get()],
                |row| timestamp_column(row, 0),
            )
            .optional()
        {
            Ok(Some(previous)) => previous,
            Ok(None) => {
                debug!(card_id = %id, "Update skipped, no such flashcard");
                return Ok(false);
            }
            Err(e @ rusqlite::Error::FromSqlConversionFailure(..)) => {
                return Err(Error::StorageRead(e));
            }
            Err(e) => return Err(Error::StorageWrite(e)),
        };

        let mut updated_on = now();
        if updated_on <= previous {
            updated_on = previous + Duration::microseconds(1);
        }

        tx.execute(
            "UPDATE flashcards SET question = ?1, answer = ?2, updated_on = ?3 WHERE id = ?4",
            params![question, answer, format_timestamp(updated_on), id.get()],
        )
        .map_err(Error::StorageWrite)?;
        tx.commit().map_err(Error::StorageWrite)?;

        info!(card_id = %id, "Flashcard updated");
        Ok(true)
    }

    /// Look up a card by id.
    pub fn get(&self, id: CardId) -> Result<Option<Flashcard>> {
        let sql = format!("SELECT {} FROM flashcards WHERE id = ?1", CARD_COLUMNS);
        self.conn
            .query_row(&sql, params![id.get()], card_from_row)
            .optional()
            .map_err(Error::StorageRead)
    }

    /// Ids of all stored cards, ascending.
    pub fn all_ids(&self) -> Result<Vec<CardId>> {
        read_ids(&self.conn).map_err(Error::StorageRead)
    }

    /// All stored cards, ascending by id.
    pub fn all(&self) -> Result<Vec<Flashcard>> {
        let sql = format!("SELECT {} FROM flashcards ORDER BY id", CARD_COLUMNS);
        let mut stmt = self.conn.prepare(&sql).map_err(Error::StorageRead)?;
        let cards = stmt
            .query_map([], card_from_row)
            .map_err(Error::StorageRead)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::StorageRead)?;
        Ok(cards)
    }

    /// Number of stored cards.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM flashcards", [], |row| row.get(0))
            .map_err(Error::StorageRead)?;
        Ok(count as usize)
    }

    /// Up to `limit` distinct cards chosen uniformly at random.
    ///
    /// Returns every card (shuffled) when the store holds fewer than
    /// `limit`, and an empty list when it holds none.
    pub fn random(&self, limit: usize) -> Result<Vec<Flashcard>> {
        self.random_with(limit, &mut rand::thread_rng())
    }

    /// [`random`](Self::random) with a caller-supplied generator.
    pub fn random_with<R: Rng + ?Sized>(
        &self,
        limit: usize,
        rng: &mut R,
    ) -> Result<Vec<Flashcard>> {
        // One read transaction so the id list and the rows agree.
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(Error::StorageRead)?;

        let ids = read_ids(&tx).map_err(Error::StorageRead)?;
        let amount = limit.min(ids.len());
        let picked = index::sample(rng, ids.len(), amount);

        let sql = format!("SELECT {} FROM flashcards WHERE id = ?1", CARD_COLUMNS);
        let mut stmt = tx.prepare(&sql).map_err(Error::StorageRead)?;
        let mut cards = Vec::with_capacity(amount);
        for i in picked.iter() {
            let card = stmt
                .query_row(params![ids[i].get()], card_from_row)
                .map_err(Error::StorageRead)?;
            cards.push(card);
        }
        drop(stmt);
        tx.finish().map_err(Error::StorageRead)?;

        debug!(requested = limit, returned = cards.len(), "Sampled flashcards");
        Ok(cards)
    }

    /// One listing line for a card, or a not-found message.
    pub fn render_one(&self, id: CardId) -> Result<String> {
        Ok(match self.get(id)? {
            Some(card) => card.to_string(),
            None => format!("no flashcard found with ID {}", id),
        })
    }

    /// One listing line per card, ascending by id.
    pub fn render_all(&self) -> Result<Vec<String>> {
        Ok(self.all()?.iter().map(ToString::to_string).collect())
    }
}

fn read_ids(conn: &Connection) -> rusqlite::Result<Vec<CardId>> {
    let mut stmt = conn.prepare("SELECT id FROM flashcards ORDER BY id")?;
    stmt.query_map([], |row| row.get::<_, i64>(0))?
        .map(|r| r.map(CardId::from_row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let store = FlashcardStore::in_memory().unwrap();
        let a = store.insert("Q1", "A1").unwrap();
        let b = store.insert("Q2", "A2").unwrap();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(store.count().unwrap(), 2);
        assert!(store.path().is_none());
    }

    #[test]
    fn test_insert_card_assigns_id_in_place() {
        let store = FlashcardStore::in_memory().unwrap();
        let mut card = Flashcard::new("Q", "A").unwrap();
        let id = store.insert_card(&mut card).unwrap();

        assert_eq!(card.id(), Some(id));
        let stored = store.get(id).unwrap().unwrap();
        assert_eq!(stored, card);
    }

    #[test]
    fn test_update_is_strictly_monotonic() {
        let store = FlashcardStore::in_memory().unwrap();
        let id = store.insert("Q", "A").unwrap();

        let mut last = store.get(id).unwrap().unwrap().updated_on();
        for i in 0..5 {
            assert!(store.update(id, &format!("Q{}", i), "A").unwrap());
            let current = store.get(id).unwrap().unwrap().updated_on();
            assert!(current > last);
            last = current;
        }
    }

    #[test]
    fn test_update_missing_card_is_noop() {
        let store = FlashcardStore::in_memory().unwrap();
        let id = CardId::new(99).unwrap();
        assert!(!store.update(id, "Q", "A").unwrap());
        assert!(store.all_ids().unwrap().is_empty());
    }

    #[test]
    fn test_random_with_seed_is_reproducible() {
        let store = FlashcardStore::in_memory().unwrap();
        for i in 0..20 {
            store.insert(&format!("Q{}", i), "A").unwrap();
        }

        let first = store.random_with(5, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = store.random_with(5, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_one_not_found() {
        let store = FlashcardStore::in_memory().unwrap();
        let line = store.render_one(CardId::new(4).unwrap()).unwrap();
        assert_eq!(line, "no flashcard found with ID 4");
    }

    #[test]
    fn test_corrupt_timestamp_is_read_error() {
        let store = FlashcardStore::in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO flashcards (question, answer, created_on, updated_on)
                 VALUES ('q', 'a', 'garbage', 'garbage')",
                [],
            )
            .unwrap();

        let err = store.get(CardId::new(1).unwrap()).unwrap_err();
        assert!(matches!(err, Error::StorageRead(_)));
    }
}

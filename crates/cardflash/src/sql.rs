//! SQLite schema and row mapping for the flashcard table.
//!
//! Everything that knows about column order lives here: the schema, the
//! select list, the one row-to-card function and the timestamp text codec.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

use crate::card::{CardId, Flashcard};

/// SQL to create the flashcard table.
///
/// `AUTOINCREMENT` keeps SQLite from handing a deleted id to a new row.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS flashcards (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    question        TEXT NOT NULL,
    answer          TEXT NOT NULL,
    created_on      TEXT NOT NULL,
    updated_on      TEXT NOT NULL
);
"#;

/// Column list matching [`card_from_row`].
pub const CARD_COLUMNS: &str = "id, question, answer, created_on, updated_on";

/// Stored timestamp layout. Fixed width, so text order is time order.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Zone-less layouts written by older tools against the same table.
const LEGACY_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Encode a timestamp for storage.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Decode a stored timestamp.
///
/// Accepts RFC 3339 and the zone-less legacy layouts (read as UTC).
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => LEGACY_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(|naive| naive.and_utc())
            .ok_or(rfc_err),
    }
}

/// Map a row selected with [`CARD_COLUMNS`] to a card.
pub fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Flashcard> {
    let id: i64 = row.get(0)?;
    let question: String = row.get(1)?;
    let answer: String = row.get(2)?;
    let created_on = timestamp_column(row, 3)?;
    let updated_on = timestamp_column(row, 4)?;

    Ok(Flashcard::from_parts(
        CardId::from_row(id),
        question,
        answer,
        created_on,
        updated_on,
    ))
}

/// Decode the timestamp text in column `idx`.
pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    parse_timestamp(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

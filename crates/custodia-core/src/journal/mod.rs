//! `SQLite`-backed append-only journal of committed ledger events.
//!
//! The journal stores every committed [`LedgerEvent`] as one row, in
//! commit order, using `SQLite` with WAL mode. It persists events, never
//! derived state: on open, the service replays the journal from genesis
//! through the ledger to rebuild identical state.
//!
//! # Append-Only Semantics
//!
//! Events can only be added, never modified or deleted. The API exposes
//! no update path, and the schema installs `BEFORE UPDATE` / `BEFORE
//! DELETE` triggers so the contract holds even against direct database
//! access.

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, params};
use thiserror::Error;

use crate::event::LedgerEvent;

/// Schema SQL embedded at compile time.
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Errors that can occur during journal operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JournalError {
    /// Database error from `SQLite`.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error during database operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Event payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored payload could not be decoded.
    #[error("corrupt journal entry at seq={seq}: {details}")]
    Corrupt {
        /// The sequence number of the corrupt row.
        seq: u64,
        /// Details about the failure.
        details: String,
    },

    /// The connection lock was poisoned by a panic in another thread.
    #[error("journal lock poisoned")]
    LockPoisoned,
}

/// A journal row: a committed event plus its assigned sequence number.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    /// Sequence number assigned on append, starting at 1.
    pub seq: u64,
    /// The committed event.
    pub event: LedgerEvent,
}

/// Append-only event journal.
#[derive(Debug)]
pub struct Journal {
    conn: Mutex<Connection>,
}

// SQLite returns i64 for row IDs and counts, but they're always
// non-negative here.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
impl Journal {
    /// Opens (or creates) a journal at `path` with WAL mode enabled.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] if the database cannot be opened
    /// or the schema cannot be applied.
    pub fn open(path: &Path) -> Result<Self, JournalError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory journal. State is lost on drop; intended for
    /// tests.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] if the schema cannot be applied.
    pub fn in_memory() -> Result<Self, JournalError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Appends a committed event and returns its sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Serialization`] if the payload cannot be
    /// encoded, or [`JournalError::Database`] on insert failure.
    pub fn append(&self, event: &LedgerEvent) -> Result<u64, JournalError> {
        let payload = serde_json::to_string(event)?;
        let conn = self.conn.lock().map_err(|_| JournalError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO events (event_type, actor, timestamp_ns, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                event.event_type(),
                event.actor().as_str(),
                event.timestamp_ns() as i64,
                payload
            ],
        )?;
        Ok(conn.last_insert_rowid() as u64)
    }

    /// Reads up to `limit` events with `seq > cursor`, in sequence order.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Corrupt`] if a stored payload fails to
    /// decode, or [`JournalError::Database`] on query failure.
    pub fn read_from(&self, cursor: u64, limit: usize) -> Result<Vec<JournalEntry>, JournalError> {
        let conn = self.conn.lock().map_err(|_| JournalError::LockPoisoned)?;
        let mut stmt = conn.prepare(
            "SELECT seq, payload FROM events
             WHERE seq > ?1 ORDER BY seq ASC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![cursor as i64, limit as i64], |row| {
            let seq: i64 = row.get(0)?;
            let payload: String = row.get(1)?;
            Ok((seq as u64, payload))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (seq, payload) = row?;
            let event =
                serde_json::from_str(&payload).map_err(|err| JournalError::Corrupt {
                    seq,
                    details: err.to_string(),
                })?;
            entries.push(JournalEntry { seq, event });
        }
        Ok(entries)
    }

    /// Total number of events in the journal.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] on query failure.
    pub fn event_count(&self) -> Result<u64, JournalError> {
        let conn = self.conn.lock().map_err(|_| JournalError::LockPoisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

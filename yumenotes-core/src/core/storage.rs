//! Snapshot persistence for local edits.
//!
//! The notebook writes its full state through a [`SnapshotStore`] at the end
//! of every mutating operation and reads it back once at startup, where it is
//! reconciled with the baseline dataset. [`Storage`] is the shipped
//! implementation, a single SQLite file; anything else (an in-memory store in
//! tests, a platform keychain, ...) can stand in by implementing the trait.

use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::core::category::Category;
use crate::core::document::Document;
use crate::core::note::{parse_timestamp, Note};
use crate::Result;

/// Where the notebook persists its snapshot of local edits.
///
/// `load` distinguishes "nothing was ever saved" (`None`) from a saved
/// snapshot, so a fresh profile starts from the baseline alone. Errors from
/// `load` mean the stored snapshot is unreadable; the caller treats that the
/// same as absent rather than trusting a corrupt store.
pub trait SnapshotStore {
    fn load(&mut self) -> Result<Option<Document>>;
    fn save(&mut self, notes: &[Note], categories: &[Category]) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// SQLite-backed snapshot store.
///
/// Notes and categories live in two independent tables, ordered by an
/// explicit `position` column so the stored array order (meaningful under
/// custom sort) survives the round trip. Category counts have no column;
/// they are derived state and are recomputed on load.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the snapshot database at `path` and ensures the
    /// schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotebookError::Database`] if the file cannot be
    /// opened or is not a SQLite database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }
}

impl SnapshotStore for Storage {
    fn load(&mut self) -> Result<Option<Document>> {
        let saved_at: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM snapshot_meta WHERE key = 'saved_at'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if saved_at.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now();
        let mut stmt = self.conn.prepare(
            "SELECT id, title, category, content, created_at, updated_at
             FROM notes ORDER BY position ASC",
        )?;
        let notes = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(id, title, category, content, created, updated)| {
                // Timestamps went through sanitization on the way in; a
                // malformed one here still degrades to "now" rather than
                // rejecting the row.
                let created_at = parse_timestamp(&created).unwrap_or(now);
                let updated_at = parse_timestamp(&updated).unwrap_or(now).max(created_at);
                Note {
                    id,
                    title,
                    category,
                    content,
                    created_at,
                    updated_at,
                }
            })
            .collect();

        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY position ASC")?;
        let categories = stmt
            .query_map([], |row| {
                Ok(Category::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Some(Document { notes, categories }))
    }

    fn save(&mut self, notes: &[Note], categories: &[Category]) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM notes", [])?;
        for (position, note) in notes.iter().enumerate() {
            tx.execute(
                "INSERT INTO notes (id, title, category, content, created_at, updated_at, position)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    note.id,
                    note.title,
                    note.category,
                    note.content,
                    note.created_at.to_rfc3339(),
                    note.updated_at.to_rfc3339(),
                    position as i64,
                ],
            )?;
        }

        tx.execute("DELETE FROM categories", [])?;
        for (position, category) in categories.iter().enumerate() {
            tx.execute(
                "INSERT INTO categories (id, name, position) VALUES (?, ?, ?)",
                rusqlite::params![category.id, category.name, position as i64],
            )?;
        }

        tx.execute(
            "INSERT OR REPLACE INTO snapshot_meta (key, value) VALUES ('saved_at', ?)",
            [chrono::Utc::now().to_rfc3339()],
        )?;

        tx.commit()?;
        log::debug!("snapshot saved: {} notes, {} categories", notes.len(), categories.len());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM notes", [])?;
        tx.execute("DELETE FROM categories", [])?;
        tx.execute("DELETE FROM snapshot_meta", [])?;
        tx.commit()?;
        Ok(())
    }
}

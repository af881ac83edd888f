//! Error types for the YumeNotes core library.

use thiserror::Error;

/// All errors that can occur within the YumeNotes core library.
#[derive(Debug, Error)]
pub enum NotebookError {
    /// A SQLite operation on the snapshot store failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A document could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation was rejected before any mutation was applied.
    ///
    /// The payload is the message shown to the user.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A note ID was requested that does not exist in the notebook.
    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    /// A category ID was requested that does not exist in the notebook.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// A reorder request is not valid in the current view state.
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// Fetching the baseline document over HTTP failed.
    #[cfg(feature = "remote")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Convenience alias that pins the error type to [`NotebookError`].
pub type Result<T> = std::result::Result<T, NotebookError>;

impl NotebookError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Validation(msg) => msg.clone(),
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::CategoryNotFound(_) => "Category no longer exists".to_string(),
            Self::InvalidMove(msg) => msg.clone(),
            #[cfg(feature = "remote")]
            Self::Network(_) => "Could not reach the notes server".to_string(),
        }
    }
}

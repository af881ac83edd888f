//! Core library for YumeNotes — a local-first note-taking data engine.
//!
//! The primary entry point is [`Notebook`], which owns the authoritative
//! in-memory dataset of notes and categories. A notebook is built by
//! reconciling a baseline document (fetched once from a [`BaselineSource`])
//! with the locally persisted snapshot of edits (a [`SnapshotStore`]); all
//! later mutations go through `Notebook` methods and are written back to the
//! store synchronously.
//!
//! Rendering, rich-text editing and file pickers are presentation concerns
//! and live outside this crate; the core only consumes their outcomes (a
//! save request, a move request, an import payload).
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    baseline::{BaselineSource, FileBaselineSource},
    category::{Category, FALLBACK_CATEGORY_ID, FALLBACK_CATEGORY_NAME},
    document::Document,
    error::{NotebookError, Result},
    export::{ExportDocument, ImportSummary},
    note::Note,
    notebook::Notebook,
    storage::{SnapshotStore, Storage},
    view::{CategoryFilter, SortMode, ViewState, PAGE_SIZE},
};

#[cfg(feature = "remote")]
#[doc(inline)]
pub use core::baseline::RemoteBaselineSource;

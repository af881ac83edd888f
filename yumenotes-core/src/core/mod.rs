//! Internal domain modules for the YumeNotes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod baseline;
pub mod category;
pub mod document;
pub mod error;
pub mod export;
pub mod merge;
pub mod note;
pub mod notebook;
pub mod reorder;
pub mod storage;
pub mod view;

#[doc(inline)]
pub use baseline::{BaselineSource, FileBaselineSource};
#[cfg(feature = "remote")]
#[doc(inline)]
pub use baseline::RemoteBaselineSource;
#[doc(inline)]
pub use category::{
    sanitize_category, slug_from_name, Category, FALLBACK_CATEGORY_ID, FALLBACK_CATEGORY_NAME,
};
#[doc(inline)]
pub use document::{sanitize_document, Document};
#[doc(inline)]
pub use error::{NotebookError, Result};
#[doc(inline)]
pub use export::{parse_import_document, ExportDocument, ImportSummary};
#[doc(inline)]
pub use merge::{default_document, merge_by_id, reconcile};
#[doc(inline)]
pub use note::{next_note_id, sanitize_note, Note};
#[doc(inline)]
pub use notebook::Notebook;
#[doc(inline)]
pub use reorder::move_item;
#[doc(inline)]
pub use storage::{SnapshotStore, Storage};
#[doc(inline)]
pub use view::{filter_and_sort, CategoryFilter, SortMode, ViewState, PAGE_SIZE};

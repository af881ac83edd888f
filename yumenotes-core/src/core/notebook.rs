//! High-level notebook operations over the merged note dataset.

use chrono::Utc;

use crate::core::baseline::BaselineSource;
use crate::core::category::{
    ensure_fallback_category, recompute_counts, slug_from_name, Category, FALLBACK_CATEGORY_ID,
    FALLBACK_CATEGORY_NAME,
};
use crate::core::export::{parse_import_document, ExportDocument, ImportSummary};
use crate::core::merge::{default_document, reconcile};
use crate::core::note::{next_note_id, Note};
use crate::core::reorder::move_item;
use crate::core::storage::SnapshotStore;
use crate::core::view::{filter_and_sort, CategoryFilter, SortMode, ViewState, PAGE_SIZE};
use crate::{NotebookError, Result};

/// The authoritative, in-memory note dataset and the single writer to it.
///
/// A `Notebook` is produced by [`initialize`](Self::initialize), which
/// reconciles the baseline dataset with the persisted snapshot; no mutating
/// operation exists before that point. Every mutation runs to completion on
/// the calling thread and ends with a synchronous snapshot write, so the
/// store always reflects the latest in-memory state.
///
/// Failure handling follows one rule: nothing here is fatal. An unavailable
/// baseline degrades to a built-in dataset, an unreadable snapshot is
/// treated as absent, and invalid operations are rejected before any
/// mutation is applied.
pub struct Notebook<S: SnapshotStore> {
    notes: Vec<Note>,
    categories: Vec<Category>,
    view: ViewState,
    store: S,
}

impl<S: SnapshotStore> Notebook<S> {
    /// Fetches the baseline from `source`, reconciles it with the snapshot
    /// in `store`, and returns the ready-to-use notebook.
    ///
    /// With `force_refresh` set, the stored snapshot is cleared and the
    /// baseline is taken as-is, discarding local edits.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotebookError::Database`] if the snapshot store
    /// cannot be written. Baseline and snapshot *read* failures are degraded
    /// paths, not errors.
    pub fn initialize<B: BaselineSource>(
        source: &B,
        store: S,
        force_refresh: bool,
    ) -> Result<Self> {
        let mut notebook = Self {
            notes: Vec::new(),
            categories: Vec::new(),
            view: ViewState::default(),
            store,
        };
        notebook.reload(source, force_refresh)?;
        Ok(notebook)
    }

    /// Re-runs the baseline/snapshot reconciliation in place.
    ///
    /// This is the "refresh from file" entry point: with `force_refresh` the
    /// snapshot store is cleared first and the result is the sanitized
    /// baseline alone. The merged dataset is persisted back immediately so
    /// the stored shape is normalized for the next load.
    pub fn reload<B: BaselineSource>(&mut self, source: &B, force_refresh: bool) -> Result<()> {
        let baseline = match source.fetch() {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("baseline source unavailable, using built-in defaults: {e}");
                default_document(Utc::now())
            }
        };

        let snapshot = if force_refresh {
            self.store.clear()?;
            None
        } else {
            match self.store.load() {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::warn!("stored snapshot is unreadable, using baseline alone: {e}");
                    None
                }
            }
        };

        let doc = reconcile(baseline, snapshot, force_refresh);
        self.notes = doc.notes;
        self.categories = doc.categories;
        self.persist()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save(&self.notes, &self.categories)
    }

    fn refresh_counts(&mut self) {
        recompute_counts(&self.notes, &mut self.categories);
    }

    // ---- View ----------------------------------------------------------

    /// All notes matching the current filter and search, in display order.
    pub fn matching_notes(&self) -> Vec<&Note> {
        filter_and_sort(&self.notes, &self.view.filter, &self.view.search, self.view.sort)
    }

    /// The currently revealed page of [`matching_notes`](Self::matching_notes).
    pub fn visible_notes(&self) -> Vec<&Note> {
        let mut matching = self.matching_notes();
        matching.truncate(self.view.display_count);
        matching
    }

    /// Whether more matching notes exist beyond the revealed page.
    pub fn has_more(&self) -> bool {
        self.matching_notes().len() > self.view.display_count
    }

    /// Reveals one more page of matching notes. Monotonic: previously
    /// visible notes stay visible.
    pub fn load_more(&mut self) {
        self.view.display_count += PAGE_SIZE;
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.view.filter = filter;
        self.view.display_count = PAGE_SIZE;
    }

    pub fn set_search(&mut self, term: &str) {
        self.view.search = term.trim().to_string();
        self.view.display_count = PAGE_SIZE;
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.view.sort = sort;
    }

    /// Resolves a note's category for presentation, falling back to
    /// `"other"` when the reference dangles. The note itself is never
    /// rewritten here; only an explicit category delete does that.
    pub fn display_category_id(&self, note: &Note) -> &str {
        if self.categories.iter().any(|c| c.id == note.category) {
            &note.category
        } else {
            FALLBACK_CATEGORY_ID
        }
    }

    /// Display name for [`display_category_id`](Self::display_category_id).
    pub fn display_category_name(&self, note: &Note) -> &str {
        let id = self.display_category_id(note);
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or(FALLBACK_CATEGORY_NAME)
    }

    // ---- Notes ---------------------------------------------------------

    /// Creates a new note at the front of the dataset and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotebookError::Validation`] if `title` is blank.
    pub fn create_note(&mut self, title: &str, category: &str, content: &str) -> Result<i64> {
        let title = title.trim();
        if title.is_empty() {
            return Err(NotebookError::Validation(
                "Note title must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let id = next_note_id(&self.notes, now);
        self.notes.insert(
            0,
            Note {
                id,
                title: title.to_string(),
                category: category.to_string(),
                content: content.to_string(),
                created_at: now,
                updated_at: now,
            },
        );

        self.refresh_counts();
        self.persist()?;
        Ok(id)
    }

    /// Replaces a note's title, category and content, advancing `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotebookError::Validation`] if `title` is blank, or
    /// [`crate::NotebookError::NoteNotFound`] for an unknown ID.
    pub fn update_note(
        &mut self,
        id: i64,
        title: &str,
        category: &str,
        content: &str,
    ) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(NotebookError::Validation(
                "Note title must not be empty".to_string(),
            ));
        }
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(NotebookError::NoteNotFound(id))?;

        note.title = title.to_string();
        note.category = category.to_string();
        note.content = content.to_string();
        note.updated_at = Utc::now();

        self.refresh_counts();
        self.persist()
    }

    /// Removes a note.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotebookError::NoteNotFound`] for an unknown ID.
    pub fn delete_note(&mut self, id: i64) -> Result<()> {
        let position = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(NotebookError::NoteNotFound(id))?;
        self.notes.remove(position);

        self.refresh_counts();
        self.persist()
    }

    // ---- Categories ----------------------------------------------------

    /// Creates a category named `name`, deriving its ID from the name, and
    /// returns the ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotebookError::Validation`] if the name is blank, or
    /// if the derived ID or the name (case-insensitively) collides with an
    /// existing category.
    pub fn create_category(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NotebookError::Validation(
                "Category name must not be empty".to_string(),
            ));
        }

        let id = slug_from_name(name);
        let lower = name.to_lowercase();
        if self
            .categories
            .iter()
            .any(|c| c.id == id || c.name.to_lowercase() == lower)
        {
            return Err(NotebookError::Validation(
                "A category with this name already exists".to_string(),
            ));
        }

        self.categories.push(Category::new(id.clone(), name));
        self.persist()?;
        Ok(id)
    }

    /// Renames a category. The ID is immutable; only the display name changes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotebookError::Validation`] if the new name is blank
    /// or collides (case-insensitively) with another category's name, or
    /// [`crate::NotebookError::CategoryNotFound`] for an unknown ID.
    pub fn rename_category(&mut self, id: &str, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(NotebookError::Validation(
                "Category name must not be empty".to_string(),
            ));
        }

        let lower = new_name.to_lowercase();
        if self
            .categories
            .iter()
            .any(|c| c.id != id && c.name.to_lowercase() == lower)
        {
            return Err(NotebookError::Validation(
                "A category with this name already exists".to_string(),
            ));
        }

        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| NotebookError::CategoryNotFound(id.to_string()))?;
        category.name = new_name.to_string();

        self.persist()
    }

    /// Deletes a category, reassigning its notes to `"other"`.
    ///
    /// A no-op for an unknown ID. If the active filter pointed at the
    /// deleted category it is reset to "all". Deleting `"other"` itself
    /// effectively resets it: the entry is recreated with its default name
    /// so the fallback target always exists.
    pub fn delete_category(&mut self, id: &str) -> Result<()> {
        let Some(position) = self.categories.iter().position(|c| c.id == id) else {
            return Ok(());
        };

        ensure_fallback_category(&mut self.categories);
        for note in self.notes.iter_mut().filter(|n| n.category == id) {
            note.category = FALLBACK_CATEGORY_ID.to_string();
        }
        self.categories.remove(position);
        ensure_fallback_category(&mut self.categories);

        if self.view.filter == CategoryFilter::Category(id.to_string()) {
            self.view.filter = CategoryFilter::All;
        }

        self.refresh_counts();
        self.persist()
    }

    // ---- Reordering ----------------------------------------------------

    /// Moves a category to `target_index` in the category bar, clamped to
    /// bounds. Counts are unaffected.
    pub fn move_category(&mut self, moved_id: &str, target_index: usize) -> Result<()> {
        let categories = std::mem::take(&mut self.categories);
        self.categories = move_item(categories, |c| c.id == moved_id, target_index);
        self.persist()
    }

    /// Moves a note to `target_index` within the currently visible sequence
    /// and commits the resulting order into the dataset.
    ///
    /// The reordered notes are placed at the front of the dataset with
    /// `updated_at` advanced to now, which keeps the manual order stable
    /// under the default updated-first sort; notes outside the visible
    /// sequence follow unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotebookError::InvalidMove`] unless the active sort
    /// mode is [`SortMode::Custom`] and the note is part of the visible
    /// sequence.
    pub fn move_note(&mut self, moved_id: i64, target_index: usize) -> Result<()> {
        if self.view.sort != SortMode::Custom {
            return Err(NotebookError::InvalidMove(
                "Notes can only be reordered in custom sort mode".to_string(),
            ));
        }

        let visible: Vec<i64> = self.visible_notes().iter().map(|n| n.id).collect();
        if !visible.contains(&moved_id) {
            return Err(NotebookError::InvalidMove(
                "Note is not part of the current view".to_string(),
            ));
        }
        let order = move_item(visible, |id| *id == moved_id, target_index);

        let now = Utc::now();
        let mut remaining = std::mem::take(&mut self.notes);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(position) = remaining.iter().position(|n| n.id == id) {
                let mut note = remaining.remove(position);
                note.updated_at = now;
                reordered.push(note);
            }
        }
        reordered.extend(remaining);
        self.notes = reordered;

        self.persist()
    }

    // ---- Import / export -----------------------------------------------

    /// Merges an exported JSON document into the notebook.
    ///
    /// Notes merge by ID with a timestamp tie-break: an incoming note
    /// replaces an existing one only if it is strictly newer. Categories
    /// merge by ID with the imported name always winning. The document is
    /// validated up front; a rejected import leaves the dataset untouched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotebookError::Validation`] if the payload is not
    /// JSON or has no notes list.
    pub fn import_json(&mut self, json: &str) -> Result<ImportSummary> {
        let existing_ids: Vec<i64> = self.notes.iter().map(|n| n.id).collect();
        let incoming = parse_import_document(json, Utc::now(), &existing_ids)?;
        let note_count = incoming.notes.len();

        for note in incoming.notes {
            match self.notes.iter_mut().find(|n| n.id == note.id) {
                Some(existing) => {
                    if note.updated_at > existing.updated_at {
                        *existing = note;
                    }
                }
                None => self.notes.push(note),
            }
        }
        for category in incoming.categories {
            match self.categories.iter_mut().find(|c| c.id == category.id) {
                Some(existing) => existing.name = category.name,
                None => self.categories.push(category),
            }
        }

        ensure_fallback_category(&mut self.categories);
        self.refresh_counts();
        self.persist()?;
        Ok(ImportSummary { note_count })
    }

    /// Builds the export document for the current dataset.
    pub fn export_document(&self) -> ExportDocument {
        ExportDocument {
            notes: self.notes.clone(),
            categories: self.categories.clone(),
            export_date: Utc::now(),
        }
    }

    /// The export document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotebookError::Json`] if serialization fails.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_document())?)
    }
}

//! Notebook export and import as JSON documents.
//!
//! An export must round-trip through import without data loss, with one
//! deliberate exception: category counts are derived state and are never
//! written to either side of the contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::core::category::{Category, FALLBACK_CATEGORY_ID};
use crate::core::document::Document;
use crate::core::note::{parse_timestamp, Note};
use crate::{NotebookError, Result};

/// The JSON document produced by an export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub notes: Vec<Note>,
    /// Serialized as `{ id, name }` pairs; counts are recomputed on import.
    pub categories: Vec<Category>,
    pub export_date: DateTime<Utc>,
}

impl ExportDocument {
    /// Download name matching the export date, e.g.
    /// `yume-notes-export-2024-05-01.json`.
    #[must_use]
    pub fn suggested_filename(&self) -> String {
        format!(
            "yume-notes-export-{}.json",
            self.export_date.format("%Y-%m-%d")
        )
    }
}

/// Result returned after a successful import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// How many notes the imported document carried.
    pub note_count: usize,
}

/// Parses and sanitizes an import payload.
///
/// Import is all-or-nothing: a document that is not JSON, or whose `notes`
/// field is missing or not a list, is rejected before any entry is looked
/// at. Individual entries are coerced more forgivingly than the baseline
/// shape: a note without a usable ID receives a fresh one (unique against
/// `existing_ids` and the rest of the batch), a blank title gets a
/// placeholder, and a blank category lands in `"other"`.
///
/// # Errors
///
/// Returns [`NotebookError::Validation`] with a displayable message when the
/// document is rejected.
pub fn parse_import_document(
    json: &str,
    now: DateTime<Utc>,
    existing_ids: &[i64],
) -> Result<Document> {
    let value: Value = serde_json::from_str(json).map_err(|_| {
        NotebookError::Validation("Import failed: the file is not valid JSON".to_string())
    })?;
    let notes_value = value.get("notes").and_then(Value::as_array).ok_or_else(|| {
        NotebookError::Validation("Import failed: the document has no notes list".to_string())
    })?;

    let mut taken: HashSet<i64> = existing_ids.iter().copied().collect();
    let mut candidate = now.timestamp_millis();
    let mut fresh_id = move |taken: &mut HashSet<i64>| {
        while taken.contains(&candidate) {
            candidate += 1;
        }
        taken.insert(candidate);
        candidate
    };

    let mut notes = Vec::with_capacity(notes_value.len());
    for entry in notes_value {
        let id = match entry.get("id").and_then(Value::as_i64) {
            Some(id) => {
                taken.insert(id);
                id
            }
            None => fresh_id(&mut taken),
        };
        let text = |key: &str| {
            entry
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let timestamp = |key: &str| {
            entry
                .get(key)
                .and_then(Value::as_str)
                .and_then(parse_timestamp)
        };
        // Same rule as the baseline shape: a lone updatedAt also serves as
        // createdAt, keeping the merge tie-break honest for old entries.
        let updated = timestamp("updatedAt");
        let created_at = timestamp("createdAt").or(updated).unwrap_or(now);
        let updated_at = updated.unwrap_or(created_at).max(created_at);

        notes.push(Note {
            id,
            title: text("title")
                .unwrap_or_else(|| format!("导入的笔记 {}", now.timestamp_millis())),
            category: text("category").unwrap_or_else(|| FALLBACK_CATEGORY_ID.to_string()),
            content: text("content").unwrap_or_default(),
            created_at,
            updated_at,
        });
    }

    let categories = value
        .get("categories")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| {
            let id = entry.get("id").and_then(Value::as_str)?;
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(id);
            Some(Category::new(id, name))
        })
        .collect();

    Ok(Document { notes, categories })
}

//! The canonical notes-plus-categories document shape.
//!
//! External sources (the baseline file, the persisted snapshot, import
//! payloads) all carry some variation of `{ notes: [...], categories: [...] }`.
//! Nothing from outside enters the notebook without first passing through
//! [`sanitize_document`], which maps untrusted JSON onto strict records and
//! drops whatever does not fit.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::core::category::{sanitize_category, Category};
use crate::core::note::{sanitize_note, Note};

/// A sanitized set of notes and categories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub notes: Vec<Note>,
    pub categories: Vec<Category>,
}

/// Maps an untrusted JSON document onto the canonical [`Document`] shape.
///
/// A missing or non-array `notes`/`categories` field is treated as empty;
/// entries that cannot be coerced (no usable ID) are dropped.
pub fn sanitize_document(value: &Value, now: DateTime<Utc>) -> Document {
    let entries = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    };

    Document {
        notes: entries("notes")
            .iter()
            .filter_map(|v| sanitize_note(v, now))
            .collect(),
        categories: entries("categories")
            .iter()
            .filter_map(sanitize_category)
            .collect(),
    }
}

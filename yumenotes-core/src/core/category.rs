use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::note::Note;

/// ID of the fallback category that orphaned notes are reassigned to.
pub const FALLBACK_CATEGORY_ID: &str = "other";

/// Display name of the fallback category.
pub const FALLBACK_CATEGORY_NAME: &str = "其他";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Number of notes currently assigned to this category.
    ///
    /// Derived from the live note set and recomputed before every read;
    /// it is never persisted and never trusted from any external source.
    #[serde(skip)]
    pub count: usize,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            count: 0,
        }
    }

    /// The `"other"` category every notebook is guaranteed to contain.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_CATEGORY_ID, FALLBACK_CATEGORY_NAME)
    }
}

/// Derives a category ID from its display name: lower-cased, with
/// whitespace runs collapsed to a single hyphen.
pub fn slug_from_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Maps one untrusted JSON object onto the canonical [`Category`] shape.
///
/// A missing `name` defaults to the empty string; an incoming `count` is
/// ignored. An entry without a string `id` yields `None`.
pub fn sanitize_category(value: &Value) -> Option<Category> {
    let id = value.get("id").and_then(Value::as_str)?;
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some(Category::new(id, name))
}

/// Recomputes every category's `count` from the live note set.
pub fn recompute_counts(notes: &[Note], categories: &mut [Category]) {
    for category in categories.iter_mut() {
        category.count = notes.iter().filter(|n| n.category == category.id).count();
    }
}

/// Appends the fallback category if it is missing.
pub fn ensure_fallback_category(categories: &mut Vec<Category>) {
    if !categories.iter().any(|c| c.id == FALLBACK_CATEGORY_ID) {
        categories.push(Category::fallback());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn note(id: i64, category: &str) -> Note {
        let now = chrono::Utc::now();
        Note {
            id,
            title: format!("note {id}"),
            category: category.to_string(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_slug_from_name() {
        assert_eq!(slug_from_name("Work"), "work");
        assert_eq!(slug_from_name("My  Reading   List"), "my-reading-list");
        assert_eq!(slug_from_name("  Spaced  Out  "), "spaced-out");
        assert_eq!(slug_from_name("工作"), "工作");
    }

    #[test]
    fn test_sanitize_ignores_incoming_count() {
        let category = sanitize_category(&json!({ "id": "work", "name": "Work", "count": 99 }))
            .unwrap();
        assert_eq!(category.count, 0);
    }

    #[test]
    fn test_sanitize_rejects_missing_id() {
        assert!(sanitize_category(&json!({ "name": "Work" })).is_none());
    }

    #[test]
    fn test_count_is_never_serialized() {
        let mut category = Category::new("work", "Work");
        category.count = 7;
        let json = serde_json::to_string(&category).unwrap();
        assert_eq!(json, r#"{"id":"work","name":"Work"}"#);
    }

    #[test]
    fn test_recompute_counts() {
        let notes = vec![note(1, "work"), note(2, "work"), note(3, "life")];
        let mut categories = vec![Category::new("work", "工作"), Category::new("other", "其他")];
        categories[1].count = 42;

        recompute_counts(&notes, &mut categories);

        assert_eq!(categories[0].count, 2);
        assert_eq!(categories[1].count, 0);
    }

    #[test]
    fn test_ensure_fallback_category() {
        let mut categories = vec![Category::new("work", "工作")];
        ensure_fallback_category(&mut categories);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].id, FALLBACK_CATEGORY_ID);

        // Idempotent.
        ensure_fallback_category(&mut categories);
        assert_eq!(categories.len(), 2);
    }
}

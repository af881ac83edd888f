use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parses an ISO-8601/RFC 3339 timestamp from an untrusted string.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Maps one untrusted JSON object onto the canonical [`Note`] shape.
///
/// Missing or malformed `title`/`category`/`content` default to the empty
/// string, missing or malformed timestamps default to `now`, and unknown
/// fields are dropped. `updated_at` is clamped so it never precedes
/// `created_at`. An entry without a usable numeric `id` is unusable and
/// yields `None`.
pub fn sanitize_note(value: &Value, now: DateTime<Utc>) -> Option<Note> {
    let id = value.get("id").and_then(Value::as_i64)?;
    let field = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let timestamp = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
    };
    // A lone updatedAt also serves as createdAt, so a missing creation time
    // never pushes an old entry's updatedAt forward through the clamp.
    let updated = timestamp("updatedAt");
    let created_at = timestamp("createdAt").or(updated).unwrap_or(now);
    let updated_at = updated.unwrap_or(created_at).max(created_at);

    Some(Note {
        id,
        title: field("title"),
        category: field("category"),
        content: field("content"),
        created_at,
        updated_at,
    })
}

/// Returns a fresh note ID: the current millisecond timestamp, bumped past
/// any ID already present so that same-millisecond creations stay unique.
pub fn next_note_id(existing: &[Note], now: DateTime<Utc>) -> i64 {
    let mut id = now.timestamp_millis();
    while existing.iter().any(|n| n.id == id) {
        id += 1;
    }
    id
}

//! Pure derivation of the displayed note list: category filter, text
//! search, sort, and pagination. Nothing here mutates the dataset.

use serde::{Deserialize, Serialize};

use crate::core::note::Note;

/// Number of notes revealed per "load more" step.
pub const PAGE_SIZE: usize = 9;

/// Sort modes, serialized as the kebab-case strings used on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Most recently updated first.
    #[default]
    UpdatedDesc,
    /// Least recently updated first.
    UpdatedAsc,
    /// Title, A to Z.
    TitleAsc,
    /// Title, Z to A.
    TitleDesc,
    /// Keep the dataset's stored order, as committed by manual reordering.
    Custom,
}

/// Which notes the view keeps: everything, or a single category by ID.
///
/// Filtering by ID is exact; a note whose category reference dangles is
/// excluded from every single-category view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub fn matches(&self, note: &Note) -> bool {
        match self {
            Self::All => true,
            Self::Category(id) => note.category == *id,
        }
    }
}

/// The caller-visible view parameters, owned by the notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub filter: CategoryFilter,
    pub search: String,
    pub sort: SortMode,
    /// How many of the matching notes are currently revealed.
    pub display_count: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filter: CategoryFilter::All,
            search: String::new(),
            sort: SortMode::default(),
            display_count: PAGE_SIZE,
        }
    }
}

/// Applies the filter → search → sort pipeline and returns the matching
/// notes in display order.
///
/// The sort is stable, so notes comparing equal (same timestamp, same
/// lower-cased title) keep their stored relative order; repeated calls over
/// an unchanged dataset return the same sequence.
pub fn filter_and_sort<'a>(
    notes: &'a [Note],
    filter: &CategoryFilter,
    search: &str,
    sort: SortMode,
) -> Vec<&'a Note> {
    let needle = search.to_lowercase();
    let mut matching: Vec<&Note> = notes
        .iter()
        .filter(|n| filter.matches(n))
        .filter(|n| {
            needle.is_empty()
                || n.title.to_lowercase().contains(&needle)
                || n.content.to_lowercase().contains(&needle)
        })
        .collect();

    match sort {
        SortMode::UpdatedDesc => matching.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortMode::UpdatedAsc => matching.sort_by(|a, b| a.updated_at.cmp(&b.updated_at)),
        SortMode::TitleAsc => {
            matching.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
        SortMode::TitleDesc => {
            matching.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
        }
        SortMode::Custom => {}
    }
    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn note(id: i64, title: &str, category: &str, content: &str, updated: &str) -> Note {
        let updated: DateTime<Utc> = updated.parse().unwrap();
        Note {
            id,
            title: title.to_string(),
            category: category.to_string(),
            content: content.to_string(),
            created_at: updated,
            updated_at: updated,
        }
    }

    fn dataset() -> Vec<Note> {
        vec![
            note(1, "Beta", "work", "<p>quarterly report</p>", "2024-03-01T00:00:00Z"),
            note(2, "alpha", "life", "<p>groceries</p>", "2024-03-03T00:00:00Z"),
            note(3, "Gamma", "ghost", "<p>Report draft</p>", "2024-03-02T00:00:00Z"),
        ]
    }

    #[test]
    fn test_category_filter_excludes_dangling_references() {
        let notes = dataset();
        let all = filter_and_sort(&notes, &CategoryFilter::All, "", SortMode::Custom);
        assert_eq!(all.len(), 3);

        let work = filter_and_sort(
            &notes,
            &CategoryFilter::Category("work".to_string()),
            "",
            SortMode::Custom,
        );
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].id, 1);
    }

    #[test]
    fn test_search_matches_title_or_content_case_insensitively() {
        let notes = dataset();
        let hits = filter_and_sort(&notes, &CategoryFilter::All, "REPORT", SortMode::Custom);
        let ids: Vec<i64> = hits.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_sort_modes() {
        let notes = dataset();
        let by = |sort| -> Vec<i64> {
            filter_and_sort(&notes, &CategoryFilter::All, "", sort)
                .iter()
                .map(|n| n.id)
                .collect()
        };

        assert_eq!(by(SortMode::UpdatedDesc), vec![2, 3, 1]);
        assert_eq!(by(SortMode::UpdatedAsc), vec![1, 3, 2]);
        assert_eq!(by(SortMode::TitleAsc), vec![2, 1, 3]);
        assert_eq!(by(SortMode::TitleDesc), vec![3, 1, 2]);
        assert_eq!(by(SortMode::Custom), vec![1, 2, 3]);
    }

    #[test]
    fn test_view_is_deterministic() {
        let notes = dataset();
        let first = filter_and_sort(&notes, &CategoryFilter::All, "", SortMode::UpdatedDesc);
        let second = filter_and_sort(&notes, &CategoryFilter::All, "", SortMode::UpdatedDesc);
        assert_eq!(
            first.iter().map(|n| n.id).collect::<Vec<_>>(),
            second.iter().map(|n| n.id).collect::<Vec<_>>(),
        );
    }

    #[test]
    fn test_equal_sort_keys_keep_stored_order() {
        let notes = vec![
            note(1, "same", "work", "", "2024-03-01T00:00:00Z"),
            note(2, "same", "work", "", "2024-03-01T00:00:00Z"),
            note(3, "same", "work", "", "2024-03-01T00:00:00Z"),
        ];
        let ordered = filter_and_sort(&notes, &CategoryFilter::All, "", SortMode::UpdatedDesc);
        assert_eq!(ordered.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_mode_wire_strings() {
        assert_eq!(
            serde_json::to_string(&SortMode::UpdatedDesc).unwrap(),
            r#""updated-desc""#
        );
        let parsed: SortMode = serde_json::from_str(r#""title-asc""#).unwrap();
        assert_eq!(parsed, SortMode::TitleAsc);
    }
}

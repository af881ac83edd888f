//! Reconciliation of the baseline dataset with the locally persisted snapshot.
//!
//! The baseline is the canonical starting document fetched once at startup;
//! the snapshot carries the user's local edits. [`reconcile`] combines the
//! two by ID, snapshot entries winning on conflict, so that local edits
//! survive a restart while entries added to the baseline still appear.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;

use crate::core::category::{ensure_fallback_category, recompute_counts, Category};
use crate::core::document::Document;
use crate::core::note::Note;

/// Merges `overlay` onto `base` by key, right-biased: on a key collision the
/// overlay entry replaces the base entry in place, and overlay-only entries
/// are appended after the base ordering.
pub fn merge_by_id<T, K, F>(base: Vec<T>, overlay: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut order: Vec<K> = Vec::with_capacity(base.len() + overlay.len());
    let mut map: HashMap<K, T> = HashMap::with_capacity(base.len() + overlay.len());

    for item in base.into_iter().chain(overlay) {
        let k = key(&item);
        if !map.contains_key(&k) {
            order.push(key(&item));
        }
        map.insert(k, item);
    }

    order.into_iter().filter_map(|k| map.remove(&k)).collect()
}

/// Combines the baseline document with the persisted snapshot into the
/// authoritative dataset.
///
/// With `force_refresh` set (or no snapshot available) the baseline is taken
/// as-is. Either way the result is normalized: the `"other"` category exists
/// and every category count reflects the merged note set.
pub fn reconcile(baseline: Document, snapshot: Option<Document>, force_refresh: bool) -> Document {
    let mut doc = match snapshot {
        Some(snap) if !force_refresh => Document {
            notes: merge_by_id(baseline.notes, snap.notes, |n| n.id),
            categories: merge_by_id(baseline.categories, snap.categories, |c| c.id.clone()),
        },
        _ => baseline,
    };

    ensure_fallback_category(&mut doc.categories);
    recompute_counts(&doc.notes, &mut doc.categories);
    doc
}

/// The built-in dataset used when the baseline source is unavailable:
/// a fixed category set with one example note in each.
pub fn default_document(now: DateTime<Utc>) -> Document {
    let seeds = [
        ("work", "工作", "本周工作安排", "<p>整理项目排期，周五前同步进展。</p>"),
        (
            "study",
            "学习",
            "JavaScript 学习笔记",
            "<h2>JavaScript 基础</h2><p>这是一门用于网页交互的编程语言。</p>",
        ),
        ("life", "生活", "周末购物清单", "<ul><li>牛奶</li><li>面包</li></ul>"),
        ("other", "其他", "随手记", "<p>一些还没归类的想法。</p>"),
    ];

    let mut doc = Document::default();
    for (i, (id, name, title, content)) in seeds.iter().enumerate() {
        doc.categories.push(Category::new(*id, *name));
        let stamp = now - Duration::days((seeds.len() - i) as i64);
        doc.notes.push(Note {
            id: (i + 1) as i64,
            title: (*title).to_string(),
            category: (*id).to_string(),
            content: (*content).to_string(),
            created_at: stamp,
            updated_at: stamp,
        });
    }
    recompute_counts(&doc.notes, &mut doc.categories);
    doc
}

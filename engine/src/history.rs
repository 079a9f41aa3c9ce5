//! Linear undo/redo log.
//!
//! Entries are stored newest-first. `index` points at the entry the next
//! undo applies; `0` means nothing has been undone. Appending while some
//! entries are undone discards them.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::element::{Element, ElementId, FieldMap};
use crate::scene::Scene;

/// One reversible change to the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// Elements that were created, by value.
    Create { elements: Vec<Element> },
    /// Elements that were removed, by value, with the order they had.
    Remove { elements: Vec<Element> },
    /// Field changes on existing elements. `prev[i]` and `next[i]` belong
    /// to `ids[i]` and hold exactly `keys`.
    Update {
        ids: Vec<ElementId>,
        keys: Vec<String>,
        prev: Vec<FieldMap>,
        next: Vec<FieldMap>,
    },
}

impl HistoryEntry {
    /// Build an UPDATE from before/after states of the same elements.
    ///
    /// Pairs are matched by position. Only elements that changed are kept;
    /// keys are the sorted union of the fields that changed on any of them.
    /// Returns `None` when nothing changed.
    #[must_use]
    pub fn update(before: &[Element], after: &[Element]) -> Option<Self> {
        let mut keys: Vec<String> = Vec::new();
        let mut changed: Vec<(&Element, &Element)> = Vec::new();
        for (b, a) in before.iter().zip(after) {
            let diff = Element::changed_keys(b, a);
            if !diff.is_empty() {
                keys.extend(diff);
                changed.push((b, a));
            }
        }
        if changed.is_empty() {
            return None;
        }
        keys.sort();
        keys.dedup();
        Some(Self::Update {
            ids: changed.iter().map(|(_, a)| a.id).collect(),
            prev: changed.iter().map(|(b, _)| b.fields(&keys)).collect(),
            next: changed.iter().map(|(_, a)| a.fields(&keys)).collect(),
            keys,
        })
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Remove { .. } => "remove",
            Self::Update { .. } => "update",
        }
    }
}

/// What an undo or redo did to the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Created(Vec<ElementId>),
    Removed(Vec<ElementId>),
    Updated(Vec<ElementId>),
}

/// The undo/redo log.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_undo_disabled(&self) -> bool {
        self.index >= self.entries.len()
    }

    #[must_use]
    pub fn is_redo_disabled(&self) -> bool {
        self.index == 0 || self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }

    /// Append an entry, dropping any undone entries first.
    ///
    /// An UPDATE touching the same ids and keys as the newest entry is
    /// merged into it by taking over its `next` values, matched by id.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.drain(..self.index);
        self.index = 0;

        if let (
            HistoryEntry::Update { ids, keys, next, .. },
            Some(HistoryEntry::Update { ids: last_ids, keys: last_keys, next: last_next, .. }),
        ) = (&entry, self.entries.first_mut())
        {
            if join_sorted(keys) == join_sorted(last_keys) && join_ids(ids) == join_ids(last_ids) {
                trace!(keys = %join_sorted(keys), "coalescing update");
                let by_id: HashMap<&ElementId, &FieldMap> = ids.iter().zip(next).collect();
                *last_next = last_ids.iter().filter_map(|id| by_id.get(id).map(|f| (*f).clone())).collect();
                return;
            }
        }

        debug!(kind = entry.kind(), len = self.entries.len() + 1, "history append");
        self.entries.insert(0, entry);
    }

    /// Reverse the entry at `index`. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> Option<Change> {
        let entry = self.entries.get(self.index)?;
        let change = match entry {
            HistoryEntry::Create { elements } => Change::Removed(remove_all(scene, elements)),
            HistoryEntry::Remove { elements } => Change::Created(reinsert(scene, elements)),
            HistoryEntry::Update { ids, prev, .. } => Change::Updated(apply_all(scene, ids, prev)),
        };
        self.index += 1;
        settle(scene);
        debug!(index = self.index, "undo");
        Some(change)
    }

    /// Reapply the most recently undone entry. Returns `None` when there is
    /// nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> Option<Change> {
        if self.is_redo_disabled() {
            return None;
        }
        self.index -= 1;
        let entry = self.entries.get(self.index)?;
        let change = match entry {
            HistoryEntry::Create { elements } => Change::Created(reinsert(scene, elements)),
            HistoryEntry::Remove { elements } => Change::Removed(remove_all(scene, elements)),
            HistoryEntry::Update { ids, next, .. } => Change::Updated(apply_all(scene, ids, next)),
        };
        settle(scene);
        debug!(index = self.index, "redo");
        Some(change)
    }
}

fn join_sorted(items: &[String]) -> String {
    let mut sorted: Vec<&str> = items.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join(",")
}

fn join_ids(ids: &[ElementId]) -> String {
    let strings: Vec<String> = ids.iter().map(ToString::to_string).collect();
    join_sorted(&strings)
}

fn ids_of(elements: &[Element]) -> Vec<ElementId> {
    elements.iter().map(|el| el.id).collect()
}

fn remove_all(scene: &mut Scene, snapshots: &[Element]) -> Vec<ElementId> {
    ids_of(&scene.remove(&ids_of(snapshots)))
}

/// Insert snapshots at their recorded order, lowest first, so each lands
/// where it was.
fn reinsert(scene: &mut Scene, snapshots: &[Element]) -> Vec<ElementId> {
    let mut ordered: Vec<&Element> = snapshots.iter().collect();
    ordered.sort_by_key(|el| el.order);
    for snapshot in ordered {
        let mut el = snapshot.clone();
        el.selected = false;
        scene.insert(el);
    }
    ids_of(snapshots)
}

fn apply_all(scene: &mut Scene, ids: &[ElementId], values: &[FieldMap]) -> Vec<ElementId> {
    ids.iter()
        .zip(values)
        .filter(|(id, fields)| scene.apply_fields(**id, fields))
        .map(|(id, _)| *id)
        .collect()
}

fn settle(scene: &mut Scene) {
    scene.clear_selection();
    scene.active_group = None;
    scene.sort_by_order();
}

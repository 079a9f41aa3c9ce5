//! Selection and group queries.
//!
//! Groups are never stored as entities; a group is the set of elements
//! sharing a `group` id. Everything here is computed on demand from the
//! scene.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::HashSet;

use crate::element::{Element, ElementId, GroupId};
use crate::geom::Rect;
use crate::registry::behavior;
use crate::scene::Scene;

/// World bounds of one element.
#[must_use]
pub fn element_bounds(el: &Element) -> Rect {
    behavior(el.kind).bounds(el)
}

/// Union of the bounds of `elements`, or `None` when empty.
#[must_use]
pub fn union_bounds<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Rect> {
    elements
        .into_iter()
        .map(element_bounds)
        .reduce(|acc, r| acc.union(&r))
}

/// Bounds of the current selection.
#[must_use]
pub fn selection_bounds(scene: &Scene) -> Option<Rect> {
    union_bounds(scene.elements().iter().filter(|el| el.selected))
}

/// Bounds of all members of `group`.
#[must_use]
pub fn group_bounds(scene: &Scene, group: GroupId) -> Option<Rect> {
    union_bounds(scene.elements().iter().filter(|el| el.group == Some(group)))
}

/// Add every sibling of the groups touched by `ids`.
///
/// The active group does not expand: inside it members are picked one by
/// one. Groups are flat, so one collect-then-rescan pass reaches the
/// closure.
#[must_use]
pub fn expand_to_groups(scene: &Scene, ids: &[ElementId]) -> Vec<ElementId> {
    let wanted: HashSet<ElementId> = ids.iter().copied().collect();
    let groups: HashSet<GroupId> = scene
        .elements()
        .iter()
        .filter(|el| wanted.contains(&el.id))
        .filter_map(|el| el.group)
        .filter(|g| scene.active_group != Some(*g))
        .collect();
    scene
        .elements()
        .iter()
        .filter(|el| wanted.contains(&el.id) || el.group.is_some_and(|g| groups.contains(&g)))
        .map(|el| el.id)
        .collect()
}

/// Elements a marquee over `rect` selects.
///
/// An element qualifies when its bounds lie fully inside `rect` (closed
/// intervals). While a group is active only its members are candidates and
/// no group expansion happens.
#[must_use]
pub fn marquee_ids(scene: &Scene, rect: &Rect) -> Vec<ElementId> {
    let inside: Vec<ElementId> = scene
        .elements()
        .iter()
        .filter(|el| scene.active_group.is_none_or(|g| el.group == Some(g)))
        .filter(|el| rect.contains_rect(&element_bounds(el)))
        .map(|el| el.id)
        .collect();
    if scene.active_group.is_some() {
        inside
    } else {
        expand_to_groups(scene, &inside)
    }
}

/// `true` when the selection is non-empty and every member is locked.
#[must_use]
pub fn is_selection_locked(scene: &Scene) -> bool {
    let mut selected = scene.elements().iter().filter(|el| el.selected).peekable();
    selected.peek().is_some() && selected.all(|el| el.locked)
}

/// The group shared by all of `ids`, if they all carry the same one.
#[must_use]
pub fn shared_group(scene: &Scene, ids: &[ElementId]) -> Option<GroupId> {
    let mut groups = ids.iter().map(|id| scene.get(*id).and_then(|el| el.group));
    let first = groups.next()??;
    groups.all(|g| g == Some(first)).then_some(first)
}

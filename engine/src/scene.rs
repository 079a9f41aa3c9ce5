//! Scene store: the ordered element list plus the document-level state
//! around it (active group, camera, background, grid, assets).
//!
//! Position in `elements` always equals `order` at rest. The store knows
//! nothing about element kinds; kind-specific work goes through the registry.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::{BTreeMap, HashSet};

use crate::camera::Camera;
use crate::consts::DEFAULT_BACKGROUND;
use crate::element::{Element, ElementId, FieldMap, GroupId};

/// Document state edited by the engine.
#[derive(Debug, Clone)]
pub struct Scene {
    elements: Vec<Element>,
    /// Group the user has entered by double-click, if any.
    pub active_group: Option<GroupId>,
    pub camera: Camera,
    pub background: String,
    /// Grid display; while on, gesture coordinates snap to the grid.
    pub grid: bool,
    /// Embedded image data keyed by asset id.
    pub assets: BTreeMap<String, String>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            active_group: None,
            camera: Camera::default(),
            background: DEFAULT_BACKGROUND.to_owned(),
            grid: false,
            assets: BTreeMap::new(),
        }
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements in stacking order, bottom first.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Append an element on top of the stack.
    pub fn add(&mut self, mut el: Element) -> ElementId {
        el.order = self.elements.len();
        let id = el.id;
        self.elements.push(el);
        id
    }

    /// Insert an element at its recorded `order`, shifting the elements above it.
    pub fn insert(&mut self, el: Element) {
        let at = el.order.min(self.elements.len());
        self.elements.insert(at, el);
        self.renumber();
    }

    /// Remove the given elements and return their snapshots in ascending
    /// order. Snapshots keep the `order` they had before removal.
    pub fn remove(&mut self, ids: &[ElementId]) -> Vec<Element> {
        let wanted: HashSet<ElementId> = ids.iter().copied().collect();
        let (removed, kept): (Vec<Element>, Vec<Element>) =
            std::mem::take(&mut self.elements).into_iter().partition(|el| wanted.contains(&el.id));
        self.elements = kept;
        self.renumber();
        removed
    }

    /// Drop every element and asset.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.assets.clear();
        self.active_group = None;
    }

    /// Replace the element list, e.g. after loading a file.
    pub fn load(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        for el in &mut self.elements {
            el.selected = false;
        }
        self.active_group = None;
        self.sort_by_order();
    }

    /// Rewrite `order` so it matches position.
    pub fn renumber(&mut self) {
        for (i, el) in self.elements.iter_mut().enumerate() {
            el.order = i;
        }
    }

    /// Stable sort by `order`, then renumber densely.
    pub fn sort_by_order(&mut self) {
        self.elements.sort_by_key(|el| el.order);
        self.renumber();
    }

    /// Write a field snapshot onto an element. Returns `false` when the
    /// element is gone.
    pub fn apply_fields(&mut self, id: ElementId, fields: &FieldMap) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.apply_fields(fields);
                true
            }
            None => false,
        }
    }

    // =============================================================
    // Selection flags
    // =============================================================

    /// Selected elements in stacking order.
    #[must_use]
    pub fn selection(&self) -> Vec<&Element> {
        self.elements.iter().filter(|el| el.selected).collect()
    }

    #[must_use]
    pub fn selected_ids(&self) -> Vec<ElementId> {
        self.elements.iter().filter(|el| el.selected).map(|el| el.id).collect()
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.elements.iter().any(|el| el.selected)
    }

    pub fn set_selected(&mut self, id: ElementId, selected: bool) {
        if let Some(el) = self.get_mut(id) {
            el.selected = selected;
        }
    }

    pub fn clear_selection(&mut self) {
        for el in &mut self.elements {
            el.selected = false;
        }
    }

    /// Select exactly `ids`.
    pub fn select_only(&mut self, ids: &[ElementId]) {
        for el in &mut self.elements {
            el.selected = ids.contains(&el.id);
        }
    }

    pub fn select_all(&mut self) {
        for el in &mut self.elements {
            el.selected = true;
        }
    }

    // =============================================================
    // Stacking
    // =============================================================

    /// Move `ids` to the top, keeping their relative order.
    pub fn bring_to_front(&mut self, ids: &[ElementId]) {
        let (moved, rest): (Vec<Element>, Vec<Element>) =
            std::mem::take(&mut self.elements).into_iter().partition(|el| ids.contains(&el.id));
        self.elements = rest;
        self.elements.extend(moved);
        self.renumber();
    }

    /// Move `ids` to the bottom, keeping their relative order.
    pub fn send_to_back(&mut self, ids: &[ElementId]) {
        let (mut moved, rest): (Vec<Element>, Vec<Element>) =
            std::mem::take(&mut self.elements).into_iter().partition(|el| ids.contains(&el.id));
        moved.extend(rest);
        self.elements = moved;
        self.renumber();
    }
}

//! Interaction engine: the single command surface hosts drive.
//!
//! Raw pointer, keyboard and wheel events come in through the `on_*`
//! methods; editor commands (clipboard, grouping, locking, stacking, style)
//! are plain methods. Every entry point returns the [`Action`]s the host
//! should react to. Scene mutation happens here or in registry behaviors,
//! and every user-visible change lands in the history log exactly once.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::consts::ZOOM_STEP;
use crate::element::{Element, ElementId, ElementKind, FieldMap, GroupId};
use crate::file::{self, FolioFile};
use crate::geom::{Point, Rect, snap};
use crate::history::{Change, History, HistoryEntry};
use crate::hit::{Handle, HitPart, ResizeAnchor, handle_at, hit_test};
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::registry::{ApproxMeasure, Context, Gesture, TextMeasure, behavior, create};
use crate::scene::Scene;
use crate::selection::{expand_to_groups, is_selection_locked, marquee_ids, shared_group};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    SetCursor(String),
    ElementsCreated(Vec<ElementId>),
    ElementsUpdated(Vec<ElementId>),
    ElementsRemoved(Vec<ElementId>),
    /// Open a text editor over the element, prefilled with `text`.
    EditTextRequested { id: ElementId, text: String },
    HistoryChanged { can_undo: bool, can_redo: bool },
    ToolChanged(Tool),
}

/// The editing engine. Holds the scene, its history and the gesture in progress.
pub struct Engine {
    pub scene: Scene,
    pub history: History,
    pub ui: UiState,
    pub input: InputState,
    pub config: EditorConfig,
    measure: Box<dyn TextMeasure>,
    clipboard: Vec<Element>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

fn context<'a>(measure: &'a dyn TextMeasure, config: &EditorConfig) -> Context<'a> {
    Context { measure, simplify_tolerance: config.simplify_tolerance }
}

impl Engine {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::with_measure(config, Box::new(ApproxMeasure))
    }

    /// Build an engine that measures text with a host-provided implementation.
    #[must_use]
    pub fn with_measure(config: EditorConfig, measure: Box<dyn TextMeasure>) -> Self {
        Self {
            scene: Scene::new(),
            history: History::new(),
            ui: UiState { tool_lock: config.tool_lock, ..UiState::default() },
            input: InputState::Idle,
            config,
            measure,
            clipboard: Vec::new(),
        }
    }

    // --- Queries ---

    /// Ids of the selected elements in stacking order.
    #[must_use]
    pub fn selection(&self) -> Vec<ElementId> {
        self.scene.selected_ids()
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.scene.get(id)
    }

    #[must_use]
    pub fn text_measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    fn history_changed(&self) -> Action {
        Action::HistoryChanged {
            can_undo: !self.history.is_undo_disabled(),
            can_redo: !self.history.is_redo_disabled(),
        }
    }

    fn record(&mut self, entry: HistoryEntry) -> Action {
        self.history.push(entry);
        self.history_changed()
    }

    fn to_world(&self, screen: Point) -> Point {
        self.scene.camera.screen_to_world(screen)
    }

    fn snapped(&self, world: Point) -> Point {
        if self.scene.grid {
            let step = self.config.grid_size;
            Point::new(snap(world.x, step), snap(world.y, step))
        } else {
            world
        }
    }

    // --- Tool / viewport ---

    /// Set the active tool. Commits any open text edit first.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = self.commit_text();
        self.ui.tool = tool;
        actions.push(Action::ToolChanged(tool));
        actions.push(Action::SetCursor(tool_cursor(tool).into()));
        actions
    }

    pub fn set_tool_lock(&mut self, locked: bool) {
        self.ui.tool_lock = locked;
    }

    /// Record the viewport size in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.ui.viewport = (width, height);
        vec![Action::RenderNeeded]
    }

    /// Toggle grid display and snapping.
    pub fn set_grid(&mut self, grid: bool) -> Vec<Action> {
        self.scene.grid = grid;
        vec![Action::RenderNeeded]
    }

    /// Zoom by `factor` around the viewport center.
    pub fn zoom(&mut self, factor: f64) -> Vec<Action> {
        let (w, h) = self.ui.viewport;
        let anchor = Point::new(w / 2.0, h / 2.0);
        let zoom = self.scene.camera.zoom * factor;
        self.scene.camera.zoom_at(anchor, zoom);
        vec![Action::RenderNeeded]
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = self.commit_text();
        if !matches!(self.input, InputState::Idle) {
            actions.extend(self.finish_gesture(screen_pt, modifiers));
        }

        if button == Button::Middle || (button == Button::Primary && self.ui.tool == Tool::Pan) {
            self.input = InputState::Panning { last_screen: screen_pt };
            actions.push(Action::SetCursor("grabbing".into()));
            return actions;
        }
        if button != Button::Primary {
            return actions;
        }

        let world = self.to_world(screen_pt);
        let handle = handle_at(world, &self.scene, &self.scene.camera, self.config.hit_tolerance);
        match (handle, self.ui.tool.element_kind()) {
            (Some((id, handle)), _) => self.begin_resize(id, handle, world),
            (None, Some(kind)) => self.begin_create(kind, world, modifiers),
            (None, None) => self.begin_select(world, modifiers),
        }
        debug!(state = self.input.name(), "pointer down");
        actions.push(Action::RenderNeeded);
        actions
    }

    fn begin_create(&mut self, kind: ElementKind, world: Point, modifiers: Modifiers) {
        let origin = self.snapped(world);
        let mut overrides = self.ui.style.clone();
        overrides.extend(self.ui.tool.overrides());
        let mut el = create(kind, &overrides);
        let g = Gesture { origin, current: origin, shift: modifiers.shift };
        behavior(kind).on_create_start(&mut el, &g, &context(self.measure.as_ref(), &self.config));

        self.scene.clear_selection();
        self.scene.active_group = None;
        let id = self.scene.add(el);
        self.input = InputState::Creating { id, origin };
    }

    fn begin_select(&mut self, world: Point, modifiers: Modifiers) {
        let hit = hit_test(world, &self.scene, &self.scene.camera, self.config.hit_tolerance);
        match hit {
            Some(hit) => match hit.part {
                HitPart::Handle(handle) => self.begin_resize(hit.element_id, handle, world),
                HitPart::Body => self.begin_drag(hit.element_id, world, modifiers),
            },
            None => {
                let base = if modifiers.shift { self.scene.selected_ids() } else { Vec::new() };
                if !modifiers.shift {
                    self.scene.clear_selection();
                }
                self.ui.marquee = Some(Rect::from_points(world, world));
                self.input = InputState::Selecting { origin: world, base };
            }
        }
    }

    fn begin_resize(&mut self, id: ElementId, handle: Handle, world: Point) {
        let Some(el) = self.scene.get_mut(id) else {
            return;
        };
        let snapshot = el.clone();
        behavior(el.kind).on_resize_start(el, handle);
        self.input = InputState::Resizing { id, handle, origin: self.snapped(world), snapshot };
    }

    fn begin_drag(&mut self, id: ElementId, world: Point, modifiers: Modifiers) {
        let Some(el) = self.scene.get(id) else {
            return;
        };
        let (selected, group) = (el.selected, el.group);
        if self.scene.active_group.is_some() && self.scene.active_group != group {
            self.scene.active_group = None;
        }
        let ids = expand_to_groups(&self.scene, &[id]);

        if modifiers.shift {
            for member in &ids {
                self.scene.set_selected(*member, !selected);
            }
            if selected {
                return;
            }
        } else if !selected {
            self.scene.select_only(&ids);
        }

        let snapshots: Vec<Element> = self
            .scene
            .selection()
            .into_iter()
            .filter(|el| !el.locked)
            .cloned()
            .collect();
        self.input = InputState::Dragging { origin: self.snapped(world), snapshots };
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let world = self.to_world(screen_pt);
        let current = self.snapped(world);
        match self.input {
            InputState::Idle => return vec![Action::SetCursor(self.hover_cursor(world))],
            InputState::TextEditing { .. } => return Vec::new(),
            _ => {}
        }

        let cx = context(self.measure.as_ref(), &self.config);
        match &mut self.input {
            InputState::Idle | InputState::TextEditing { .. } => return Vec::new(),
            InputState::Panning { last_screen } => {
                self.scene.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                *last_screen = screen_pt;
            }
            InputState::Selecting { origin, base } => {
                let rect = Rect::from_points(*origin, world);
                let mut ids = marquee_ids(&self.scene, &rect);
                ids.extend(base.iter().copied());
                self.scene.select_only(&ids);
                self.ui.marquee = Some(rect);
            }
            InputState::Dragging { origin, snapshots } => {
                let g = Gesture { origin: *origin, current, shift: modifiers.shift };
                for snapshot in snapshots.iter() {
                    let Some(el) = self.scene.get_mut(snapshot.id) else {
                        continue;
                    };
                    el.x1 = snapshot.x1 + g.dx();
                    el.y1 = snapshot.y1 + g.dy();
                    el.x2 = snapshot.x2 + g.dx();
                    el.y2 = snapshot.y2 + g.dy();
                    behavior(el.kind).on_drag(el, snapshot, &g);
                }
            }
            InputState::Resizing { id, handle, origin, snapshot } => {
                let g = Gesture { origin: *origin, current, shift: modifiers.shift };
                let Some(el) = self.scene.get_mut(*id) else {
                    self.input = InputState::Idle;
                    return Vec::new();
                };
                behavior(el.kind).on_resize(el, snapshot, *handle, &g, &cx);
            }
            InputState::Creating { id, origin } => {
                let g = Gesture { origin: *origin, current, shift: modifiers.shift };
                let Some(el) = self.scene.get_mut(*id) else {
                    self.input = InputState::Idle;
                    return Vec::new();
                };
                behavior(el.kind).on_create_move(el, &g, &cx);
            }
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.finish_gesture(screen_pt, modifiers)
    }

    /// The pointer left the surface; an open gesture ends as if released.
    pub fn on_pointer_leave(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.finish_gesture(screen_pt, modifiers)
    }

    fn finish_gesture(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        if matches!(self.input, InputState::TextEditing { .. }) {
            return Vec::new();
        }
        let state = std::mem::take(&mut self.input);
        debug!(state = state.name(), "gesture end");
        let mut actions = Vec::new();
        match state {
            InputState::Idle | InputState::TextEditing { .. } => return actions,
            InputState::Panning { .. } => {
                actions.push(Action::SetCursor(tool_cursor(self.ui.tool).into()));
            }
            InputState::Selecting { .. } => {
                self.ui.marquee = None;
            }
            InputState::Dragging { snapshots, .. } => {
                actions.extend(self.record_update(&snapshots));
            }
            InputState::Resizing { id, snapshot, .. } => {
                let cx = context(self.measure.as_ref(), &self.config);
                if let Some(el) = self.scene.get_mut(id) {
                    behavior(el.kind).on_resize_end(el, &cx);
                }
                actions.extend(self.record_update(std::slice::from_ref(&snapshot)));
            }
            InputState::Creating { id, origin } => {
                let world = self.snapped(self.to_world(screen_pt));
                let g = Gesture { origin, current: world, shift: modifiers.shift };
                actions.extend(self.finish_create(id, &g));
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Append one UPDATE for the elements in `snapshots` against their
    /// current state. Nothing is recorded when nothing changed.
    fn record_update(&mut self, snapshots: &[Element]) -> Vec<Action> {
        let (before, after): (Vec<Element>, Vec<Element>) = snapshots
            .iter()
            .filter_map(|s| self.scene.get(s.id).map(|el| (s.clone(), el.clone())))
            .unzip();
        let Some(entry) = HistoryEntry::update(&before, &after) else {
            return Vec::new();
        };
        let ids = match &entry {
            HistoryEntry::Update { ids, .. } => ids.clone(),
            _ => Vec::new(),
        };
        vec![Action::ElementsUpdated(ids), self.record(entry)]
    }

    fn finish_create(&mut self, id: ElementId, g: &Gesture) -> Vec<Action> {
        let cx = context(self.measure.as_ref(), &self.config);
        let Some(el) = self.scene.get_mut(id) else {
            return Vec::new();
        };
        behavior(el.kind).on_create_end(el, g, &cx);
        let created = el.clone();

        if created.kind == ElementKind::Text {
            return self.begin_text_edit(id, true);
        }

        self.scene.select_only(&[id]);
        let mut actions = vec![Action::ElementsCreated(vec![id])];
        actions.push(self.record(HistoryEntry::Create { elements: vec![created] }));
        actions.extend(self.release_tool());
        actions
    }

    /// Return to the select tool after a create unless tool-lock is on.
    fn release_tool(&mut self) -> Option<Action> {
        if self.ui.tool_lock || self.ui.tool == Tool::Select {
            return None;
        }
        self.ui.tool = Tool::Select;
        Some(Action::ToolChanged(Tool::Select))
    }

    fn hover_cursor(&self, world: Point) -> String {
        if self.ui.tool != Tool::Select {
            return tool_cursor(self.ui.tool).into();
        }
        let cursor = match hit_test(world, &self.scene, &self.scene.camera, self.config.hit_tolerance) {
            None => "default",
            Some(hit) => match hit.part {
                HitPart::Body => "move",
                HitPart::Handle(Handle::Node(_)) => "pointer",
                HitPart::Handle(Handle::Anchor(a)) => anchor_cursor(a),
            },
        };
        cursor.into()
    }

    // --- Double click / text ---

    pub fn on_double_click(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if matches!(self.input, InputState::TextEditing { .. }) {
            return Vec::new();
        }
        let world = self.to_world(screen_pt);
        let hit = hit_test(world, &self.scene, &self.scene.camera, self.config.hit_tolerance);

        let Some(hit) = hit else {
            return self.create_text_at(self.snapped(world));
        };
        let Some(el) = self.scene.get(hit.element_id) else {
            return Vec::new();
        };
        let (id, kind, selected, locked) = (el.id, el.kind, el.selected, el.locked);

        if selected {
            let selection = self.scene.selected_ids();
            if let Some(group) = shared_group(&self.scene, &selection) {
                if self.scene.active_group != Some(group) {
                    debug!(%group, "entering group");
                    self.scene.active_group = Some(group);
                    self.scene.select_only(&[id]);
                    return vec![Action::RenderNeeded];
                }
            }
        }

        if behavior(kind).has_text() && !locked {
            return self.begin_text_edit(id, false);
        }
        Vec::new()
    }

    fn create_text_at(&mut self, origin: Point) -> Vec<Action> {
        let cx = context(self.measure.as_ref(), &self.config);
        let mut el = create(ElementKind::Text, &self.ui.style);
        let g = Gesture { origin, current: origin, shift: false };
        let b = behavior(ElementKind::Text);
        b.on_create_start(&mut el, &g, &cx);
        b.on_create_end(&mut el, &g, &cx);
        self.scene.active_group = None;
        let id = self.scene.add(el);
        self.begin_text_edit(id, true)
    }

    fn begin_text_edit(&mut self, id: ElementId, fresh: bool) -> Vec<Action> {
        let Some(el) = self.scene.get(id) else {
            return Vec::new();
        };
        let snapshot = el.clone();
        let text = el.props().text().to_owned();
        self.scene.select_only(&[id]);
        self.ui.editing = Some(id);
        self.input = InputState::TextEditing { id, fresh, snapshot };
        debug!(%id, fresh, "text edit start");
        vec![Action::EditTextRequested { id, text }, Action::RenderNeeded]
    }

    /// Live text update from the host editor. Not recorded until commit.
    pub fn set_text(&mut self, text: &str) -> Vec<Action> {
        let InputState::TextEditing { id, .. } = self.input else {
            return Vec::new();
        };
        let cx = context(self.measure.as_ref(), &self.config);
        let Some(el) = self.scene.get_mut(id) else {
            return Vec::new();
        };
        el.set_field("text", json!(text));
        behavior(el.kind).on_update(el, &["text"], &cx);
        vec![Action::RenderNeeded]
    }

    /// Close the text editor and record the edit.
    ///
    /// An emptied text element is removed: silently when it was created for
    /// this edit, with a REMOVE entry otherwise.
    pub fn commit_text(&mut self) -> Vec<Action> {
        if !matches!(self.input, InputState::TextEditing { .. }) {
            return Vec::new();
        }
        let InputState::TextEditing { id, fresh, snapshot } = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        self.ui.editing = None;
        let Some(el) = self.scene.get(id).cloned() else {
            return vec![Action::RenderNeeded];
        };
        debug!(%id, fresh, "text commit");

        let mut actions = Vec::new();
        if el.kind == ElementKind::Text && el.props().text().trim().is_empty() {
            self.scene.remove(&[id]);
            if !fresh {
                actions.push(Action::ElementsRemoved(vec![id]));
                actions.push(self.record(HistoryEntry::Remove { elements: vec![snapshot] }));
            }
        } else if fresh {
            actions.push(Action::ElementsCreated(vec![id]));
            actions.push(self.record(HistoryEntry::Create { elements: vec![el] }));
            actions.extend(self.release_tool());
        } else {
            actions.extend(self.record_update(std::slice::from_ref(&snapshot)));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The host editor lost focus.
    pub fn blur(&mut self) -> Vec<Action> {
        self.commit_text()
    }

    // --- Keyboard / wheel ---

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        let name = key.name();
        if matches!(self.input, InputState::TextEditing { .. }) {
            return if name == "Escape" { self.commit_text() } else { Vec::new() };
        }

        if modifiers.command() {
            return match name.as_str() {
                "z" if modifiers.shift => self.redo(),
                "z" => self.undo(),
                "y" => self.redo(),
                "a" => self.select_all(),
                "c" => self.copy(),
                "x" => self.cut(),
                "v" => self.paste(),
                "d" => self.duplicate(),
                "g" if modifiers.shift => self.ungroup(),
                "g" => self.group(),
                "l" if modifiers.shift => self.toggle_lock(),
                "=" | "+" => self.zoom(ZOOM_STEP),
                "-" => self.zoom(1.0 / ZOOM_STEP),
                _ => Vec::new(),
            };
        }

        let step = if modifiers.shift { self.config.nudge_step_large } else { self.config.nudge_step };
        match name.as_str() {
            "Escape" => {
                self.scene.clear_selection();
                self.scene.active_group = None;
                vec![Action::RenderNeeded]
            }
            "Delete" | "Backspace" => self.delete_selection(),
            "ArrowLeft" => self.nudge(-step, 0.0),
            "ArrowRight" => self.nudge(step, 0.0),
            "ArrowUp" => self.nudge(0.0, -step),
            "ArrowDown" => self.nudge(0.0, step),
            _ => Vec::new(),
        }
    }

    /// Command-wheel zooms around the pointer; plain wheel pans.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        let camera = &mut self.scene.camera;
        if modifiers.command() {
            let factor = if delta.dy < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
            let zoom = camera.zoom * factor;
            camera.zoom_at(screen_pt, zoom);
        } else {
            camera.pan_by(-delta.dx, -delta.dy);
        }
        vec![Action::RenderNeeded]
    }

    // --- History ---

    pub fn undo(&mut self) -> Vec<Action> {
        let mut actions = self.commit_text();
        if let Some(change) = self.history.undo(&mut self.scene) {
            actions.push(change_action(change));
            actions.push(self.history_changed());
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let mut actions = self.commit_text();
        if let Some(change) = self.history.redo(&mut self.scene) {
            actions.push(change_action(change));
            actions.push(self.history_changed());
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Selection commands ---

    pub fn select_all(&mut self) -> Vec<Action> {
        self.scene.active_group = None;
        self.scene.select_all();
        vec![Action::RenderNeeded]
    }

    /// Remove the unlocked part of the selection as one REMOVE entry.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        let ids = self.unlocked_selection_ids();
        if ids.is_empty() {
            return Vec::new();
        }
        let removed = self.scene.remove(&ids);
        vec![
            Action::ElementsRemoved(ids),
            self.record(HistoryEntry::Remove { elements: removed }),
            Action::RenderNeeded,
        ]
    }

    /// Move the unlocked selection by `(dx, dy)` as one UPDATE.
    pub fn nudge(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        let snapshots = self.unlocked_selection();
        let g = Gesture { origin: Point::new(0.0, 0.0), current: Point::new(dx, dy), shift: false };
        for snapshot in &snapshots {
            if let Some(el) = self.scene.get_mut(snapshot.id) {
                el.translate(dx, dy);
                behavior(el.kind).on_drag(el, snapshot, &g);
            }
        }
        let mut actions = self.record_update(&snapshots);
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn unlocked_selection(&self) -> Vec<Element> {
        self.scene
            .selection()
            .into_iter()
            .filter(|el| !el.locked)
            .cloned()
            .collect()
    }

    fn unlocked_selection_ids(&self) -> Vec<ElementId> {
        self.unlocked_selection().iter().map(|el| el.id).collect()
    }

    // --- Clipboard ---

    /// Copy the selection to the internal clipboard.
    pub fn copy(&mut self) -> Vec<Action> {
        if self.scene.has_selection() {
            self.clipboard = self.scene.selection().into_iter().cloned().collect();
        }
        Vec::new()
    }

    pub fn cut(&mut self) -> Vec<Action> {
        self.copy();
        self.delete_selection()
    }

    /// Paste the clipboard, offset from where it was copied. Repeated pastes cascade.
    pub fn paste(&mut self) -> Vec<Action> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let sources = std::mem::take(&mut self.clipboard);
        let (actions, pasted) = self.clone_in(&sources);
        self.clipboard = pasted;
        actions
    }

    /// Clone the selection in place, offset by the paste offset.
    pub fn duplicate(&mut self) -> Vec<Action> {
        let sources: Vec<Element> = self.scene.selection().into_iter().cloned().collect();
        if sources.is_empty() {
            return Vec::new();
        }
        self.clone_in(&sources).0
    }

    /// Add offset copies of `sources` with fresh ids and remapped groups,
    /// select them, and record one CREATE.
    fn clone_in(&mut self, sources: &[Element]) -> (Vec<Action>, Vec<Element>) {
        let offset = self.config.paste_offset;
        let g = Gesture { origin: Point::new(0.0, 0.0), current: Point::new(offset, offset), shift: false };
        let mut groups: HashMap<GroupId, GroupId> = HashMap::new();
        let mut copies = Vec::with_capacity(sources.len());
        let mut ordered: Vec<&Element> = sources.iter().collect();
        ordered.sort_by_key(|el| el.order);

        for source in ordered {
            let mut el = source.clone();
            el.id = Uuid::new_v4();
            el.selected = false;
            el.group = source.group.map(|old| *groups.entry(old).or_insert_with(Uuid::new_v4));
            el.translate(offset, offset);
            behavior(el.kind).on_drag(&mut el, source, &g);
            let id = self.scene.add(el);
            copies.extend(self.scene.get(id).cloned());
        }

        let ids: Vec<ElementId> = copies.iter().map(|el| el.id).collect();
        self.scene.active_group = None;
        self.scene.select_only(&ids);
        debug!(count = ids.len(), "pasted");
        let actions = vec![
            Action::ElementsCreated(ids),
            self.record(HistoryEntry::Create { elements: copies.clone() }),
            Action::RenderNeeded,
        ];
        (actions, copies)
    }

    // --- Group / lock / stacking ---

    /// Put the selection into one new group.
    pub fn group(&mut self) -> Vec<Action> {
        let before = self.unlocked_selection();
        if before.len() < 2 {
            return Vec::new();
        }
        let group = Uuid::new_v4();
        self.edit_each(&before, |el| el.group = Some(group))
    }

    /// Dissolve the groups of the selected elements.
    pub fn ungroup(&mut self) -> Vec<Action> {
        let before = self.unlocked_selection();
        self.scene.active_group = None;
        self.edit_each(&before, |el| el.group = None)
    }

    pub fn lock(&mut self) -> Vec<Action> {
        let before: Vec<Element> = self.scene.selection().into_iter().cloned().collect();
        self.edit_each(&before, |el| el.locked = true)
    }

    pub fn unlock(&mut self) -> Vec<Action> {
        let before: Vec<Element> = self.scene.selection().into_iter().cloned().collect();
        self.edit_each(&before, |el| el.locked = false)
    }

    /// Unlock a fully locked selection, otherwise lock all of it.
    pub fn toggle_lock(&mut self) -> Vec<Action> {
        if is_selection_locked(&self.scene) {
            self.unlock()
        } else {
            self.lock()
        }
    }

    fn edit_each(&mut self, before: &[Element], edit: impl Fn(&mut Element)) -> Vec<Action> {
        for snapshot in before {
            if let Some(el) = self.scene.get_mut(snapshot.id) {
                edit(el);
            }
        }
        let mut actions = self.record_update(before);
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn bring_to_front(&mut self) -> Vec<Action> {
        let ids = self.scene.selected_ids();
        self.restack(|scene| scene.bring_to_front(&ids))
    }

    pub fn send_to_back(&mut self) -> Vec<Action> {
        let ids = self.scene.selected_ids();
        self.restack(|scene| scene.send_to_back(&ids))
    }

    fn restack(&mut self, apply: impl FnOnce(&mut Scene)) -> Vec<Action> {
        let before = self.scene.elements().to_vec();
        apply(&mut self.scene);
        let mut actions = self.record_update(&before);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Style ---

    /// Write a style field on every selected element that accepts it, and
    /// remember it for new elements when some kind accepts it. Vetoed writes
    /// are dropped.
    pub fn update_selection_style(&mut self, key: &str, value: Value) -> Vec<Action> {
        if ElementKind::ALL.iter().any(|kind| behavior(*kind).is_value_allowed(key, &value)) {
            self.ui.style.insert(key.to_owned(), value.clone());
        }
        let cx = context(self.measure.as_ref(), &self.config);
        let before: Vec<Element> = self.scene.selection().into_iter().cloned().collect();
        for snapshot in &before {
            let Some(el) = self.scene.get_mut(snapshot.id) else {
                continue;
            };
            let b = behavior(el.kind);
            if !b.is_value_allowed(key, &value) {
                debug!(key, kind = el.kind.as_str(), "style value rejected");
                continue;
            }
            el.set_field(key, value.clone());
            b.on_update(el, &[key], &cx);
        }
        let mut actions = self.record_update(&before);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Images ---

    /// Register an image asset and place it centered on `center` (world space).
    pub fn insert_image(&mut self, asset_id: &str, data_url: &str, center: Point, width: f64, height: f64) -> Vec<Action> {
        self.scene.assets.insert(asset_id.to_owned(), data_url.to_owned());
        let mut overrides = FieldMap::new();
        overrides.insert("assetId".into(), json!(asset_id));
        let mut el = create(ElementKind::Image, &overrides);
        let (hw, hh) = (width.abs() / 2.0, height.abs() / 2.0);
        el.set_rect(Rect::new(center.x - hw, center.y - hh, center.x + hw, center.y + hh));
        let id = self.scene.add(el);
        self.scene.select_only(&[id]);
        let snapshot = self.scene.get(id).cloned().into_iter().collect();
        vec![
            Action::ElementsCreated(vec![id]),
            self.record(HistoryEntry::Create { elements: snapshot }),
            Action::RenderNeeded,
        ]
    }

    // --- Persistence ---

    /// Replace the document with a loaded file. History starts empty.
    pub fn load(&mut self, file: FolioFile) -> Vec<Action> {
        self.input = InputState::Idle;
        self.ui.editing = None;
        self.ui.marquee = None;
        self.scene.clear();
        self.scene.assets = file.asset_urls();
        self.scene.load(file.elements);
        self.scene.background = file.background;
        self.scene.grid = file.grid;
        self.history.clear();
        debug!(elements = self.scene.len(), "loaded");
        vec![self.history_changed(), Action::RenderNeeded]
    }

    /// Snapshot the document for saving.
    #[must_use]
    pub fn export(&self) -> FolioFile {
        file::export(&self.scene)
    }
}

fn change_action(change: Change) -> Action {
    match change {
        Change::Created(ids) => Action::ElementsCreated(ids),
        Change::Removed(ids) => Action::ElementsRemoved(ids),
        Change::Updated(ids) => Action::ElementsUpdated(ids),
    }
}

fn tool_cursor(tool: Tool) -> &'static str {
    match tool {
        Tool::Select => "default",
        Tool::Pan => "grab",
        Tool::Text => "text",
        _ => "crosshair",
    }
}

fn anchor_cursor(anchor: ResizeAnchor) -> &'static str {
    match anchor {
        ResizeAnchor::N | ResizeAnchor::S => "ns-resize",
        ResizeAnchor::E | ResizeAnchor::W => "ew-resize",
        ResizeAnchor::Ne | ResizeAnchor::Sw => "nesw-resize",
        ResizeAnchor::Nw | ResizeAnchor::Se => "nwse-resize",
    }
}

//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the active gesture being tracked between
//! pointer-down and pointer-up, carrying the snapshots needed to compute
//! geometry from the gesture origin and to emit one history entry on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde_json::json;

use crate::element::{Element, ElementId, ElementKind, FieldMap};
use crate::geom::{Point, Rect};
use crate::hit::Handle;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Drag the view.
    Pan,
    Rectangle,
    Ellipse,
    Diamond,
    Arrow,
    /// Click to place a text block.
    Text,
    /// Freehand stroke.
    Draw,
    /// Click to place a sticky note.
    Note,
}

impl Tool {
    /// Element kind this tool creates, if it is a drawing tool.
    #[must_use]
    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            Self::Select | Self::Pan => None,
            Self::Rectangle | Self::Ellipse | Self::Diamond => Some(ElementKind::Shape),
            Self::Arrow => Some(ElementKind::Arrow),
            Self::Text => Some(ElementKind::Text),
            Self::Draw => Some(ElementKind::Draw),
            Self::Note => Some(ElementKind::Note),
        }
    }

    /// Style overrides implied by the tool itself.
    #[must_use]
    pub fn overrides(self) -> FieldMap {
        let shape = match self {
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Diamond => "diamond",
            _ => return FieldMap::new(),
        };
        let mut map = FieldMap::new();
        map.insert("shape".into(), json!(shape));
        map
    }

    /// Parse a tool name as used by hosts and scripts.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "select" => Self::Select,
            "pan" => Self::Pan,
            "rectangle" => Self::Rectangle,
            "ellipse" => Self::Ellipse,
            "diamond" => Self::Diamond,
            "arrow" => Self::Arrow,
            "text" => Self::Text,
            "draw" => Self::Draw,
            "note" => Self::Note,
            _ => return None,
        })
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Platform command modifier: Ctrl or Meta.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Key name, lowercased for single letters so `"Z"` and `"z"` match.
    #[must_use]
    pub fn name(&self) -> String {
        if self.0.chars().count() == 1 {
            self.0.to_lowercase()
        } else {
            self.0.clone()
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active drawing tool.
    pub tool: Tool,
    /// Keep the drawing tool after a create gesture instead of returning to select.
    pub tool_lock: bool,
    /// Live marquee rectangle in world space.
    pub marquee: Option<Rect>,
    /// Element whose text is being edited; the host overlays an editor on it.
    pub editing: Option<ElementId>,
    /// Style applied to newly created elements.
    pub style: FieldMap,
    /// Viewport size in CSS pixels.
    pub viewport: (f64, f64),
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to compute geometry
/// from the gesture origin and emit a history entry on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// The user is dragging out a marquee on empty canvas.
    Selecting {
        /// World-space corner where the drag started.
        origin: Point,
        /// Selection held before the marquee started; kept when shift was down.
        base: Vec<ElementId>,
    },
    /// The user is moving the selection.
    Dragging {
        /// World-space pointer position at pointer-down.
        origin: Point,
        /// Unlocked selected elements as they were at pointer-down.
        snapshots: Vec<Element>,
    },
    /// The user is resizing one element by a handle.
    Resizing {
        id: ElementId,
        handle: Handle,
        /// World-space pointer position at pointer-down.
        origin: Point,
        /// The element as it was at pointer-down.
        snapshot: Element,
    },
    /// The user is shaping a new element with a drawing tool.
    Creating {
        id: ElementId,
        /// World-space pointer position at pointer-down.
        origin: Point,
    },
    /// A text editor is open on an element.
    TextEditing {
        id: ElementId,
        /// `true` when the element was created for this edit and has no
        /// history entry yet.
        fresh: bool,
        /// The element before editing began; diffed on commit.
        snapshot: Element,
    },
}

impl InputState {
    /// Short state name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::Selecting { .. } => "selecting",
            Self::Dragging { .. } => "dragging",
            Self::Resizing { .. } => "resizing",
            Self::Creating { .. } => "creating",
            Self::TextEditing { .. } => "text-editing",
        }
    }
}

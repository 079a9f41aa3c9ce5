//! Scripted input: a JSON list of steps replayed through the engine.
//!
//! A script is what a host would feed the engine from real events, written
//! down. Steps use screen coordinates, exactly like pointer events.
//!
//! ```json
//! [
//!   { "op": "tool", "name": "rectangle" },
//!   { "op": "down", "x": 10, "y": 10 },
//!   { "op": "move", "x": 110, "y": 60 },
//!   { "op": "up", "x": 110, "y": 60 },
//!   { "op": "key", "key": "z", "ctrl": true }
//! ]
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use folio_engine::engine::{Action, Engine};
use folio_engine::geom::Point;
use folio_engine::input::{Button, Key, Modifiers, Tool, WheelDelta};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("step {step}: unknown tool `{name}`")]
    UnknownTool { step: usize, name: String },
}

/// Mouse button names accepted in scripts.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonName {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl From<ButtonName> for Button {
    fn from(name: ButtonName) -> Self {
        match name {
            ButtonName::Primary => Self::Primary,
            ButtonName::Middle => Self::Middle,
            ButtonName::Secondary => Self::Secondary,
        }
    }
}

/// Modifier keys held during a step. Absent keys are up.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Held {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl From<Held> for Modifiers {
    fn from(h: Held) -> Self {
        Self { shift: h.shift, ctrl: h.ctrl, alt: h.alt, meta: h.meta }
    }
}

/// One scripted input.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    Tool {
        name: String,
    },
    ToolLock {
        on: bool,
    },
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: ButtonName,
        #[serde(flatten)]
        held: Held,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(flatten)]
        held: Held,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        button: ButtonName,
        #[serde(flatten)]
        held: Held,
    },
    Leave {
        x: f64,
        y: f64,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    Key {
        key: String,
        #[serde(flatten)]
        held: Held,
    },
    Wheel {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
        #[serde(flatten)]
        held: Held,
    },
    /// Live text from the host editor.
    Text {
        text: String,
    },
    Commit,
    Undo,
    Redo,
    SelectAll,
    Delete,
    Copy,
    Cut,
    Paste,
    Duplicate,
    Group,
    Ungroup,
    Lock,
    Unlock,
    BringToFront,
    SendToBack,
    Style {
        key: String,
        value: Value,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        asset_id: String,
        data_url: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Grid {
        on: bool,
    },
    Viewport {
        width: f64,
        height: f64,
    },
}

/// Counts gathered while replaying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub steps: usize,
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

impl Summary {
    fn absorb(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::ElementsCreated(ids) => self.created += ids.len(),
                Action::ElementsUpdated(ids) => self.updated += ids.len(),
                Action::ElementsRemoved(ids) => self.removed += ids.len(),
                _ => {}
            }
        }
    }
}

/// Parse a script from JSON.
///
/// # Errors
///
/// Returns [`ScriptError::Parse`] when the input is not a list of steps.
pub fn parse(raw: &str) -> Result<Vec<Step>, ScriptError> {
    Ok(serde_json::from_str(raw)?)
}

/// Replay `steps` against `engine`. A text edit still open after the last
/// step is committed and counted.
///
/// # Errors
///
/// Returns [`ScriptError::UnknownTool`] when a step names a tool that does
/// not exist. Steps before it have already been applied.
pub fn run(engine: &mut Engine, steps: &[Step]) -> Result<Summary, ScriptError> {
    let mut summary = Summary::default();
    for (i, step) in steps.iter().enumerate() {
        debug!(step = i, ?step, "replay");
        let actions = apply(engine, i, step)?;
        summary.absorb(&actions);
        summary.steps += 1;
    }
    summary.absorb(&engine.commit_text());
    info!(
        steps = summary.steps,
        created = summary.created,
        updated = summary.updated,
        removed = summary.removed,
        "replay finished"
    );
    Ok(summary)
}

fn apply(engine: &mut Engine, index: usize, step: &Step) -> Result<Vec<Action>, ScriptError> {
    let actions = match step {
        Step::Tool { name } => {
            let tool =
                Tool::from_name(name).ok_or_else(|| ScriptError::UnknownTool { step: index, name: name.clone() })?;
            engine.set_tool(tool)
        }
        Step::ToolLock { on } => {
            engine.set_tool_lock(*on);
            Vec::new()
        }
        Step::Down { x, y, button, held } => engine.on_pointer_down(Point::new(*x, *y), (*button).into(), (*held).into()),
        Step::Move { x, y, held } => engine.on_pointer_move(Point::new(*x, *y), (*held).into()),
        Step::Up { x, y, button, held } => engine.on_pointer_up(Point::new(*x, *y), (*button).into(), (*held).into()),
        Step::Leave { x, y } => engine.on_pointer_leave(Point::new(*x, *y), Modifiers::default()),
        Step::DoubleClick { x, y } => engine.on_double_click(Point::new(*x, *y), Modifiers::default()),
        Step::Key { key, held } => engine.on_key_down(Key(key.clone()), (*held).into()),
        Step::Wheel { x, y, dx, dy, held } => {
            engine.on_wheel(Point::new(*x, *y), WheelDelta { dx: *dx, dy: *dy }, (*held).into())
        }
        Step::Text { text } => engine.set_text(text),
        Step::Commit => engine.commit_text(),
        Step::Undo => engine.undo(),
        Step::Redo => engine.redo(),
        Step::SelectAll => engine.select_all(),
        Step::Delete => engine.delete_selection(),
        Step::Copy => engine.copy(),
        Step::Cut => engine.cut(),
        Step::Paste => engine.paste(),
        Step::Duplicate => engine.duplicate(),
        Step::Group => engine.group(),
        Step::Ungroup => engine.ungroup(),
        Step::Lock => engine.lock(),
        Step::Unlock => engine.unlock(),
        Step::BringToFront => engine.bring_to_front(),
        Step::SendToBack => engine.send_to_back(),
        Step::Style { key, value } => engine.update_selection_style(key, value.clone()),
        Step::Image { asset_id, data_url, x, y, width, height } => {
            engine.insert_image(asset_id, data_url, Point::new(*x, *y), *width, *height)
        }
        Step::Grid { on } => engine.set_grid(*on),
        Step::Viewport { width, height } => engine.set_viewport(*width, *height),
    };
    Ok(actions)
}

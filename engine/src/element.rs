//! Element model: the drawing objects on the canvas and generic field access.
//!
//! An [`Element`] carries a fixed set of core fields (identity, geometry,
//! stacking order, group, lock and selection flags) plus an open-ended
//! `props` map of per-kind style and content fields. The map is flattened
//! into the element on the wire, so a serialized element reads as one flat
//! JSON object in the `.folio` format.
//!
//! History snapshots address both halves uniformly through
//! [`Element::field`] and [`Element::set_field`], which lets undo/redo stay
//! ignorant of what a given kind stores.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::consts::{
    DEFAULT_FILL_COLOR, DEFAULT_NOTE_COLOR, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, DEFAULT_TEXT_COLOR,
    DEFAULT_TEXT_FONT, DEFAULT_TEXT_SIZE,
};
use crate::geom::{Point, Rect, StrokeStyle};

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Identifier shared by the members of a group.
pub type GroupId = Uuid;

/// Field name to value map used for style props and history snapshots.
pub type FieldMap = Map<String, Value>;

/// Core fields addressable through [`Element::field`] besides `props`.
pub const CORE_KEYS: [&str; 7] = ["x1", "y1", "x2", "y2", "order", "group", "locked"];

/// The kind of an element. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Rectangle, ellipse or diamond, selected by the `shape` prop.
    Shape,
    /// Straight or curved arrow between a start and an end point.
    Arrow,
    /// Free-standing text block sized to its content.
    Text,
    /// Freehand stroke.
    Draw,
    /// Embedded raster image referencing an asset.
    Image,
    /// Sticky note with a colored background and text.
    Note,
}

impl ElementKind {
    pub const ALL: [Self; 6] = [Self::Shape, Self::Arrow, Self::Text, Self::Draw, Self::Image, Self::Note];

    /// Wire name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shape => "shape",
            Self::Arrow => "arrow",
            Self::Text => "text",
            Self::Draw => "draw",
            Self::Image => "image",
            Self::Note => "note",
        }
    }
}

/// A drawing object as stored in the scene and in `.folio` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier; never changes.
    pub id: ElementId,
    /// Element kind; never changes.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// First corner (or arrow start) x.
    pub x1: f64,
    /// First corner (or arrow start) y.
    pub y1: f64,
    /// Second corner (or arrow end) x.
    pub x2: f64,
    /// Second corner (or arrow end) y.
    pub y2: f64,
    /// Stacking order; dense `0..n` across the scene at rest.
    #[serde(default)]
    pub order: usize,
    /// Group this element belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
    /// Transient selection flag; never exported.
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
    /// Locked elements can be selected but not moved, resized or deleted by gesture.
    #[serde(default)]
    pub locked: bool,
    /// Per-kind style and content fields.
    #[serde(flatten)]
    pub props: FieldMap,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(v: &bool) -> bool {
    !*v
}

impl Element {
    /// Create an element with a fresh id and an empty box at the origin.
    #[must_use]
    pub fn new(kind: ElementKind, props: FieldMap) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
            order: 0,
            group: None,
            selected: false,
            locked: false,
            props,
        }
    }

    /// Typed view over the style props.
    #[must_use]
    pub fn props(&self) -> Props<'_> {
        Props::new(&self.props)
    }

    /// Normalized bounding box of the two corners.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x1, self.y1, self.x2, self.y2)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }

    /// Swap corners so that `x1 <= x2` and `y1 <= y2`.
    pub fn normalize_box(&mut self) {
        let r = self.rect();
        self.set_rect(r);
    }

    /// Overwrite both corners from a rectangle.
    pub fn set_rect(&mut self, r: Rect) {
        self.x1 = r.x1;
        self.y1 = r.y1;
        self.x2 = r.x2;
        self.y2 = r.y2;
    }

    /// Move both corners by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x1 += dx;
        self.y1 += dy;
        self.x2 += dx;
        self.y2 += dy;
    }

    /// Read a core field or prop by name. Missing props read as `null`.
    #[must_use]
    pub fn field(&self, key: &str) -> Value {
        match key {
            "x1" => json!(self.x1),
            "y1" => json!(self.y1),
            "x2" => json!(self.x2),
            "y2" => json!(self.y2),
            "order" => json!(self.order),
            "group" => self.group.map_or(Value::Null, |g| Value::String(g.to_string())),
            "locked" => Value::Bool(self.locked),
            _ => self.props.get(key).cloned().unwrap_or(Value::Null),
        }
    }

    /// Write a core field or prop by name.
    ///
    /// `id`, `type` and `selected` are not writable through this path.
    /// Writing `null` to a prop removes it. Values of the wrong JSON type for
    /// a core field are ignored.
    pub fn set_field(&mut self, key: &str, value: Value) {
        match key {
            "x1" => set_f64(&mut self.x1, &value),
            "y1" => set_f64(&mut self.y1, &value),
            "x2" => set_f64(&mut self.x2, &value),
            "y2" => set_f64(&mut self.y2, &value),
            "order" => {
                if let Some(Ok(order)) = value.as_u64().map(usize::try_from) {
                    self.order = order;
                }
            }
            "group" => {
                self.group = match value.as_str().map(Uuid::parse_str) {
                    Some(Ok(g)) => Some(g),
                    _ => None,
                };
            }
            "locked" => {
                if let Some(b) = value.as_bool() {
                    self.locked = b;
                }
            }
            "id" | "type" | "selected" => {}
            _ => {
                if value.is_null() {
                    self.props.remove(key);
                } else {
                    self.props.insert(key.to_owned(), value);
                }
            }
        }
    }

    /// Snapshot the named fields.
    #[must_use]
    pub fn fields<S: AsRef<str>>(&self, keys: &[S]) -> FieldMap {
        keys.iter()
            .map(|k| (k.as_ref().to_owned(), self.field(k.as_ref())))
            .collect()
    }

    /// Write every field of a snapshot.
    pub fn apply_fields(&mut self, fields: &FieldMap) {
        for (k, v) in fields {
            self.set_field(k, v.clone());
        }
    }

    /// Sorted names of the fields whose values differ between two states of an element.
    #[must_use]
    pub fn changed_keys(before: &Element, after: &Element) -> Vec<String> {
        let mut keys: BTreeSet<&str> = BTreeSet::new();
        keys.extend(CORE_KEYS);
        keys.extend(before.props.keys().map(String::as_str));
        keys.extend(after.props.keys().map(String::as_str));
        keys.into_iter()
            .filter(|k| before.field(k) != after.field(k))
            .map(str::to_owned)
            .collect()
    }
}

fn set_f64(slot: &mut f64, value: &Value) {
    if let Some(v) = value.as_f64() {
        *slot = v;
    }
}

/// Encode points as a JSON array of `[x, y]` pairs.
#[must_use]
pub fn points_value(points: &[Point]) -> Value {
    Value::Array(points.iter().map(|p| json!([p.x, p.y])).collect())
}

/// Typed access to common props of an element.
pub struct Props<'a> {
    map: &'a FieldMap,
}

impl<'a> Props<'a> {
    /// Wrap a reference to a props map for typed access.
    #[must_use]
    pub fn new(map: &'a FieldMap) -> Self {
        Self { map }
    }

    fn str_or(&self, key: &str, default: &'a str) -> &'a str {
        self.map.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.map.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    /// Shape outline: `rectangle`, `ellipse` or `diamond`.
    #[must_use]
    pub fn shape(&self) -> &'a str {
        self.str_or("shape", "rectangle")
    }

    #[must_use]
    pub fn stroke_color(&self) -> &'a str {
        self.str_or("strokeColor", DEFAULT_STROKE_COLOR)
    }

    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.f64_or("strokeWidth", DEFAULT_STROKE_WIDTH)
    }

    #[must_use]
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle::parse(self.str_or("strokeStyle", "solid"))
    }

    #[must_use]
    pub fn fill_color(&self) -> &'a str {
        self.str_or("fillColor", DEFAULT_FILL_COLOR)
    }

    /// Fill style: `none`, `solid`, `semi` or `hatch`.
    #[must_use]
    pub fn fill_style(&self) -> &'a str {
        self.str_or("fillStyle", "none")
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.f64_or("opacity", 1.0)
    }

    #[must_use]
    pub fn text(&self) -> &'a str {
        self.str_or("text", "")
    }

    #[must_use]
    pub fn text_font(&self) -> &'a str {
        self.str_or("textFont", DEFAULT_TEXT_FONT)
    }

    #[must_use]
    pub fn text_size(&self) -> f64 {
        self.f64_or("textSize", DEFAULT_TEXT_SIZE)
    }

    #[must_use]
    pub fn text_align(&self) -> &'a str {
        self.str_or("textAlign", "left")
    }

    #[must_use]
    pub fn text_color(&self) -> &'a str {
        self.str_or("textColor", DEFAULT_TEXT_COLOR)
    }

    #[must_use]
    pub fn note_color(&self) -> &'a str {
        self.str_or("noteColor", DEFAULT_NOTE_COLOR)
    }

    /// Asset referenced by an image. Empty string when absent.
    #[must_use]
    pub fn asset_id(&self) -> &'a str {
        self.str_or("assetId", "")
    }

    #[must_use]
    pub fn start_arrowhead(&self) -> &'a str {
        self.str_or("startArrowhead", "none")
    }

    #[must_use]
    pub fn end_arrowhead(&self) -> &'a str {
        self.str_or("endArrowhead", "arrow")
    }

    /// Arrow starts on the right edge of its box.
    #[must_use]
    pub fn flip_x(&self) -> bool {
        self.map.get("flipX").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Arrow starts on the bottom edge of its box.
    #[must_use]
    pub fn flip_y(&self) -> bool {
        self.map.get("flipY").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Arrow curve node, when the arrow has been bent.
    #[must_use]
    pub fn center(&self) -> Option<Point> {
        let x = self.map.get("xCenter").and_then(Value::as_f64)?;
        let y = self.map.get("yCenter").and_then(Value::as_f64)?;
        Some(Point::new(x, y))
    }

    /// Freehand points relative to the element's first corner.
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        let Some(items) = self.map.get("points").and_then(Value::as_array) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| {
                let pair = item.as_array()?;
                Some(Point::new(pair.first()?.as_f64()?, pair.get(1)?.as_f64()?))
            })
            .collect()
    }
}

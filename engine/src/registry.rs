//! Per-kind element behaviors.
//!
//! Every [`ElementKind`] maps to exactly one [`Behavior`] through the closed
//! match in [`behavior`]. The scene store and the interaction engine only ever
//! talk to elements through this table, so adding a kind means adding one
//! match arm and one impl.
//!
//! Default trait methods implement plain box behavior (edge and corner
//! handles, drag-to-size creation, clamped resize). Kinds override only what
//! differs.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use serde_json::{Value, json};

use crate::consts::{
    ARROW_DEFAULT_LENGTH, CURVE_SAMPLES, DEFAULT_FILL_COLOR, DEFAULT_NOTE_COLOR, DEFAULT_STROKE_COLOR,
    DEFAULT_STROKE_WIDTH, DEFAULT_TEXT_COLOR, DEFAULT_TEXT_FONT, DEFAULT_TEXT_SIZE, ELEMENT_MIN_SIZE, GLYPH_ADVANCE,
    LINE_HEIGHT, NOTE_MIN_SIZE, NOTE_SIZE, SHAPE_MIN_SIZE, TEXT_MIN_WIDTH, TEXT_SIZE_MAX, TEXT_SIZE_MIN, TRANSPARENT,
};
use crate::element::{Element, ElementKind, FieldMap, points_value};
use crate::geom::{Point, Rect, bounding_rect, control_through, distance, point_segment_distance, sample_quadratic, simplify_path};
use crate::hit::{ArrowNode, Handle, HandlePoint, ResizeAnchor};

// =============================================================
// Text measurement
// =============================================================

/// Measures the glyph box of a text block. Hosts with real font metrics
/// supply their own implementation.
pub trait TextMeasure {
    /// Width and height of `text` set in `font` at `size`.
    fn measure(&self, text: &str, font: &str, size: f64) -> (f64, f64);
}

/// Fixed-advance approximation: every glyph is `size * GLYPH_ADVANCE` wide
/// and every line `size * LINE_HEIGHT` tall.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMeasure;

impl TextMeasure for ApproxMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, _font: &str, size: f64) -> (f64, f64) {
        let lines: Vec<&str> = text.split('\n').collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        (widest as f64 * size * GLYPH_ADVANCE, lines.len() as f64 * size * LINE_HEIGHT)
    }
}

/// Services a behavior may need while shaping an element.
pub struct Context<'a> {
    pub measure: &'a dyn TextMeasure,
    /// RDP tolerance applied to freehand strokes at the end of creation.
    pub simplify_tolerance: f64,
}

/// A pointer gesture in world space, relative to where it started.
#[derive(Debug, Clone, Copy)]
pub struct Gesture {
    pub origin: Point,
    pub current: Point,
    pub shift: bool,
}

impl Gesture {
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.current.x - self.origin.x
    }

    #[must_use]
    pub fn dy(&self) -> f64 {
        self.current.y - self.origin.y
    }
}

// =============================================================
// Behavior trait
// =============================================================

/// Capabilities every element kind provides.
pub trait Behavior: Sync {
    /// Style and content keys this kind accepts.
    fn style_keys(&self) -> &'static [&'static str];

    /// Default values for the style keys.
    fn defaults(&self) -> FieldMap;

    /// Defaults merged with `overrides`. Override keys outside
    /// [`Behavior::style_keys`] are dropped.
    fn initialize(&self, overrides: &FieldMap) -> FieldMap {
        let mut fields = self.defaults();
        for (key, value) in overrides {
            if self.style_keys().contains(&key.as_str()) {
                fields.insert(key.clone(), value.clone());
            }
        }
        fields
    }

    /// Smallest width and height a finished element may have.
    fn min_size(&self) -> (f64, f64) {
        (ELEMENT_MIN_SIZE, ELEMENT_MIN_SIZE)
    }

    /// Whether double-click opens a text editor on this kind.
    fn has_text(&self) -> bool {
        false
    }

    /// Normalized world bounds.
    fn bounds(&self, el: &Element) -> Rect {
        el.rect()
    }

    /// Whether `p` lies on the element within `tolerance` world units.
    fn hit(&self, el: &Element, p: Point, tolerance: f64) -> bool {
        self.bounds(el).expand(tolerance).contains_point(p)
    }

    /// Resize handles with their world positions.
    fn handlers(&self, el: &Element) -> Vec<HandlePoint> {
        anchor_handles(&el.rect(), &ResizeAnchor::ALL)
    }

    fn on_create_start(&self, el: &mut Element, g: &Gesture, _cx: &Context<'_>) {
        el.x1 = g.origin.x;
        el.y1 = g.origin.y;
        el.x2 = g.origin.x;
        el.y2 = g.origin.y;
    }

    fn on_create_move(&self, el: &mut Element, g: &Gesture, _cx: &Context<'_>) {
        drag_corner(el, g);
    }

    fn on_create_end(&self, el: &mut Element, _g: &Gesture, _cx: &Context<'_>) {
        el.normalize_box();
        apply_min_size(el, self.min_size());
    }

    /// Move auxiliary geometry along with a box translation. The box itself
    /// has already been translated from `snapshot`.
    fn on_drag(&self, _el: &mut Element, _snapshot: &Element, _g: &Gesture) {}

    fn on_resize_start(&self, _el: &mut Element, _handle: Handle) {}

    /// Recompute geometry from `snapshot` and the pointer delta.
    fn on_resize(&self, el: &mut Element, snapshot: &Element, handle: Handle, g: &Gesture, _cx: &Context<'_>) {
        if let Handle::Anchor(anchor) = handle {
            resize_box(el, snapshot, anchor, g, self.min_size(), g.shift && anchor.is_corner());
        }
    }

    fn on_resize_end(&self, el: &mut Element, _cx: &Context<'_>) {
        el.normalize_box();
    }

    /// React to style or content keys changed through an update path.
    fn on_update(&self, _el: &mut Element, _changed: &[&str], _cx: &Context<'_>) {}

    /// Whether `value` may be written to `key` on this kind.
    fn is_value_allowed(&self, key: &str, value: &Value) -> bool {
        self.style_keys().contains(&key) && value_allowed(key, value)
    }
}

/// The behavior for `kind`.
#[must_use]
pub fn behavior(kind: ElementKind) -> &'static dyn Behavior {
    match kind {
        ElementKind::Shape => &ShapeBehavior,
        ElementKind::Arrow => &ArrowBehavior,
        ElementKind::Text => &TextBehavior,
        ElementKind::Draw => &DrawBehavior,
        ElementKind::Image => &ImageBehavior,
        ElementKind::Note => &NoteBehavior,
    }
}

/// Build a fresh element of `kind` with initialized style fields.
#[must_use]
pub fn create(kind: ElementKind, overrides: &FieldMap) -> Element {
    Element::new(kind, behavior(kind).initialize(overrides))
}

// =============================================================
// Shared helpers
// =============================================================

const NUMERIC_KEYS: [&str; 2] = ["strokeWidth", "textSize"];

fn value_allowed(key: &str, value: &Value) -> bool {
    match key {
        _ if NUMERIC_KEYS.contains(&key) => value.as_f64().is_some_and(|v| v > 0.0),
        "opacity" => value.as_f64().is_some_and(|v| v > 0.0 && v <= 1.0),
        "shape" => one_of(value, &["rectangle", "ellipse", "diamond"]),
        "strokeStyle" => one_of(value, &["solid", "dashed", "dotted"]),
        "fillStyle" => one_of(value, &["none", "solid", "semi", "hatch"]),
        "startArrowhead" | "endArrowhead" => one_of(value, &["none", "arrow", "triangle", "circle"]),
        "textAlign" => one_of(value, &["left", "center", "right"]),
        _ => value.is_string(),
    }
}

/// `true` as a prop, `false` as an absent one.
fn flag(on: bool) -> Value {
    if on { Value::Bool(true) } else { Value::Null }
}

fn one_of(value: &Value, options: &[&str]) -> bool {
    value.as_str().is_some_and(|s| options.contains(&s))
}

fn anchor_handles(rect: &Rect, anchors: &[ResizeAnchor]) -> Vec<HandlePoint> {
    anchors
        .iter()
        .map(|&a| HandlePoint { handle: Handle::Anchor(a), point: a.position(rect) })
        .collect()
}

/// Move the second corner to the pointer. Shift constrains to a square.
fn drag_corner(el: &mut Element, g: &Gesture) {
    let (mut dx, mut dy) = (g.dx(), g.dy());
    if g.shift {
        let side = dx.abs().max(dy.abs());
        dx = side.copysign(dx);
        dy = side.copysign(dy);
    }
    el.x2 = el.x1 + dx;
    el.y2 = el.y1 + dy;
}

/// Grow a normalized box to at least `min` without moving its first corner.
fn apply_min_size(el: &mut Element, (min_w, min_h): (f64, f64)) {
    if el.x2 - el.x1 < min_w {
        el.x2 = el.x1 + min_w;
    }
    if el.y2 - el.y1 < min_h {
        el.y2 = el.y1 + min_h;
    }
}

/// Move the edges named by `anchor` by the gesture delta, clamped so the box
/// never shrinks below `min`. With `keep_ratio` the snapshot aspect ratio is
/// preserved, scaling by the larger of the two relative changes.
fn resize_box(
    el: &mut Element,
    snapshot: &Element,
    anchor: ResizeAnchor,
    g: &Gesture,
    (min_w, min_h): (f64, f64),
    keep_ratio: bool,
) -> Rect {
    let s = snapshot.rect();
    let (dx, dy) = (g.dx(), g.dy());
    let mut r = s;
    if anchor.moves_left() {
        r.x1 = (s.x1 + dx).min(s.x2 - min_w);
    }
    if anchor.moves_right() {
        r.x2 = (s.x2 + dx).max(s.x1 + min_w);
    }
    if anchor.moves_top() {
        r.y1 = (s.y1 + dy).min(s.y2 - min_h);
    }
    if anchor.moves_bottom() {
        r.y2 = (s.y2 + dy).max(s.y1 + min_h);
    }

    if keep_ratio && s.width() > 0.0 && s.height() > 0.0 {
        let scale = (r.width() / s.width()).max(r.height() / s.height());
        let (w, h) = (s.width() * scale, s.height() * scale);
        if anchor.moves_left() {
            r.x1 = r.x2 - w;
        } else {
            r.x2 = r.x1 + w;
        }
        if anchor.moves_top() {
            r.y1 = r.y2 - h;
        } else {
            r.y2 = r.y1 + h;
        }
    }

    el.set_rect(r);
    r
}

fn defaults_from(pairs: &[(&str, Value)]) -> FieldMap {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect()
}

// =============================================================
// Shape
// =============================================================

/// Rectangle, ellipse and diamond.
pub struct ShapeBehavior;

impl Behavior for ShapeBehavior {
    fn style_keys(&self) -> &'static [&'static str] {
        &[
            "shape",
            "strokeColor",
            "strokeWidth",
            "strokeStyle",
            "fillColor",
            "fillStyle",
            "opacity",
            "text",
            "textFont",
            "textSize",
            "textColor",
        ]
    }

    fn defaults(&self) -> FieldMap {
        defaults_from(&[
            ("shape", json!("rectangle")),
            ("strokeColor", json!(DEFAULT_STROKE_COLOR)),
            ("strokeWidth", json!(DEFAULT_STROKE_WIDTH)),
            ("strokeStyle", json!("solid")),
            ("fillColor", json!(DEFAULT_FILL_COLOR)),
            ("fillStyle", json!("none")),
            ("opacity", json!(1.0)),
            ("text", json!("")),
            ("textFont", json!(DEFAULT_TEXT_FONT)),
            ("textSize", json!(DEFAULT_TEXT_SIZE)),
            ("textColor", json!(DEFAULT_TEXT_COLOR)),
        ])
    }

    fn min_size(&self) -> (f64, f64) {
        (SHAPE_MIN_SIZE, SHAPE_MIN_SIZE)
    }

    fn has_text(&self) -> bool {
        true
    }
}

// =============================================================
// Arrow
// =============================================================

/// Directed arrow, optionally bent through a curve node at
/// `(xCenter, yCenter)`.
///
/// The box is normalized like every other kind. `flipX` and `flipY` say
/// which corners hold the start and end points.
pub struct ArrowBehavior;

impl ArrowBehavior {
    fn start(el: &Element) -> Point {
        let props = el.props();
        Point::new(
            if props.flip_x() { el.x2 } else { el.x1 },
            if props.flip_y() { el.y2 } else { el.y1 },
        )
    }

    fn end(el: &Element) -> Point {
        let props = el.props();
        Point::new(
            if props.flip_x() { el.x1 } else { el.x2 },
            if props.flip_y() { el.y1 } else { el.y2 },
        )
    }

    /// Start and end points in world space.
    #[must_use]
    pub fn endpoints(el: &Element) -> (Point, Point) {
        (Self::start(el), Self::end(el))
    }

    /// Place the arrow between `start` and `end`, keeping the box normalized.
    pub fn set_endpoints(el: &mut Element, start: Point, end: Point) {
        el.set_rect(Rect::from_points(start, end));
        el.set_field("flipX", flag(start.x > end.x));
        el.set_field("flipY", flag(start.y > end.y));
    }

    /// Curve node, or the chord midpoint for a straight arrow.
    fn node(el: &Element) -> Point {
        el.props().center().unwrap_or_else(|| Self::start(el).midpoint(Self::end(el)))
    }

    /// Polyline approximating the arrow: two points when straight, sampled
    /// quadratic otherwise.
    #[must_use]
    pub fn polyline(el: &Element) -> Vec<Point> {
        let (start, end) = (Self::start(el), Self::end(el));
        match el.props().center() {
            Some(node) => sample_quadratic(start, control_through(start, node, end), end, CURVE_SAMPLES),
            None => vec![start, end],
        }
    }

    fn set_node(el: &mut Element, p: Point) {
        el.set_field("xCenter", json!(p.x));
        el.set_field("yCenter", json!(p.y));
    }
}

impl Behavior for ArrowBehavior {
    fn style_keys(&self) -> &'static [&'static str] {
        &["strokeColor", "strokeWidth", "strokeStyle", "startArrowhead", "endArrowhead", "opacity"]
    }

    fn defaults(&self) -> FieldMap {
        defaults_from(&[
            ("strokeColor", json!(DEFAULT_STROKE_COLOR)),
            ("strokeWidth", json!(DEFAULT_STROKE_WIDTH)),
            ("strokeStyle", json!("solid")),
            ("startArrowhead", json!("none")),
            ("endArrowhead", json!("arrow")),
            ("opacity", json!(1.0)),
        ])
    }

    fn bounds(&self, el: &Element) -> Rect {
        bounding_rect(&Self::polyline(el)).unwrap_or_else(|| el.rect())
    }

    fn hit(&self, el: &Element, p: Point, tolerance: f64) -> bool {
        let reach = tolerance + el.props().stroke_width() / 2.0;
        Self::polyline(el)
            .windows(2)
            .any(|w| point_segment_distance(p, w[0], w[1]) <= reach)
    }

    fn handlers(&self, el: &Element) -> Vec<HandlePoint> {
        vec![
            HandlePoint { handle: Handle::Node(ArrowNode::Start), point: Self::start(el) },
            HandlePoint { handle: Handle::Node(ArrowNode::Center), point: Self::node(el) },
            HandlePoint { handle: Handle::Node(ArrowNode::End), point: Self::end(el) },
        ]
    }

    /// Shift snaps the direction to multiples of 45 degrees.
    fn on_create_move(&self, el: &mut Element, g: &Gesture, _cx: &Context<'_>) {
        let start = Self::start(el);
        let (dx, dy) = (g.dx(), g.dy());
        let end = if g.shift {
            let len = dx.hypot(dy);
            let step = std::f64::consts::FRAC_PI_4;
            let angle = (dy.atan2(dx) / step).round() * step;
            start.offset(len * angle.cos(), len * angle.sin())
        } else {
            start.offset(dx, dy)
        };
        Self::set_endpoints(el, start, end);
    }

    fn on_create_end(&self, el: &mut Element, _g: &Gesture, _cx: &Context<'_>) {
        let (start, end) = Self::endpoints(el);
        if distance(start, end) < ELEMENT_MIN_SIZE {
            Self::set_endpoints(el, start, start.offset(ARROW_DEFAULT_LENGTH, 0.0));
        } else {
            Self::set_endpoints(el, start, end);
        }
    }

    fn on_drag(&self, el: &mut Element, snapshot: &Element, g: &Gesture) {
        if let Some(node) = snapshot.props().center() {
            Self::set_node(el, node.offset(g.dx(), g.dy()));
        }
    }

    fn on_resize(&self, el: &mut Element, snapshot: &Element, handle: Handle, g: &Gesture, _cx: &Context<'_>) {
        let Handle::Node(node) = handle else {
            return;
        };
        let (start, end) = Self::endpoints(snapshot);
        match node {
            ArrowNode::Start => Self::set_endpoints(el, start.offset(g.dx(), g.dy()), end),
            ArrowNode::End => Self::set_endpoints(el, start, end.offset(g.dx(), g.dy())),
            ArrowNode::Center => Self::set_node(el, Self::node(snapshot).offset(g.dx(), g.dy())),
        }
    }

    /// The box is kept normalized throughout the resize.
    fn on_resize_end(&self, _el: &mut Element, _cx: &Context<'_>) {}

    fn is_value_allowed(&self, key: &str, value: &Value) -> bool {
        self.style_keys().contains(&key) && value_allowed(key, value) && !is_transparent_stroke(key, value)
    }
}

fn is_transparent_stroke(key: &str, value: &Value) -> bool {
    key == "strokeColor" && value.as_str() == Some(TRANSPARENT)
}

// =============================================================
// Text
// =============================================================

/// Free-standing text sized to its measured content.
pub struct TextBehavior;

impl TextBehavior {
    /// Measure the text, store `textWidth`/`textHeight` and grow the box to
    /// the glyph box.
    fn fit_box(el: &mut Element, cx: &Context<'_>) {
        let (w, h) = measure(el, cx, el.props().text_size());
        el.set_field("textWidth", json!(w));
        el.set_field("textHeight", json!(h));
        el.normalize_box();
        el.x2 = el.x1 + w.max(TEXT_MIN_WIDTH);
        el.y2 = el.y1 + h;
    }

    /// Largest integral size in `[TEXT_SIZE_MIN, TEXT_SIZE_MAX]` whose glyph
    /// box fits `width` by `height`, or the minimum when none does.
    #[must_use]
    pub fn fit_size(el: &Element, cx: &Context<'_>, width: f64, height: f64) -> f64 {
        let fits = |size: f64| {
            let (w, h) = measure(el, cx, size);
            w <= width && h <= height
        };
        let (mut lo, mut hi) = (TEXT_SIZE_MIN, TEXT_SIZE_MAX);
        if !fits(lo) {
            return TEXT_SIZE_MIN;
        }
        while lo < hi {
            let mid = ((lo + hi) / 2.0).ceil();
            if fits(mid) {
                lo = mid;
            } else {
                hi = mid - 1.0;
            }
        }
        lo
    }
}

fn measure(el: &Element, cx: &Context<'_>, size: f64) -> (f64, f64) {
    let props = el.props();
    cx.measure.measure(props.text(), props.text_font(), size)
}

impl Behavior for TextBehavior {
    fn style_keys(&self) -> &'static [&'static str] {
        &["text", "textFont", "textSize", "textAlign", "textColor", "opacity"]
    }

    fn defaults(&self) -> FieldMap {
        defaults_from(&[
            ("text", json!("")),
            ("textFont", json!(DEFAULT_TEXT_FONT)),
            ("textSize", json!(DEFAULT_TEXT_SIZE)),
            ("textAlign", json!("left")),
            ("textColor", json!(DEFAULT_TEXT_COLOR)),
            ("opacity", json!(1.0)),
        ])
    }

    fn min_size(&self) -> (f64, f64) {
        (TEXT_MIN_WIDTH, TEXT_SIZE_MIN * LINE_HEIGHT)
    }

    fn has_text(&self) -> bool {
        true
    }

    fn handlers(&self, el: &Element) -> Vec<HandlePoint> {
        anchor_handles(&el.rect(), &ResizeAnchor::CORNERS)
    }

    /// Text is placed by a click, not sized by a drag.
    fn on_create_move(&self, _el: &mut Element, _g: &Gesture, _cx: &Context<'_>) {}

    fn on_create_end(&self, el: &mut Element, _g: &Gesture, cx: &Context<'_>) {
        Self::fit_box(el, cx);
    }

    fn on_resize(&self, el: &mut Element, snapshot: &Element, handle: Handle, g: &Gesture, cx: &Context<'_>) {
        let Handle::Anchor(anchor) = handle else {
            return;
        };
        let r = resize_box(el, snapshot, anchor, g, self.min_size(), false);
        let size = Self::fit_size(el, cx, r.width(), r.height());
        let (w, h) = measure(el, cx, size);
        el.set_field("textSize", json!(size));
        el.set_field("textWidth", json!(w));
        el.set_field("textHeight", json!(h));
    }

    fn on_update(&self, el: &mut Element, changed: &[&str], cx: &Context<'_>) {
        if changed.iter().any(|k| matches!(*k, "text" | "textSize" | "textFont")) {
            Self::fit_box(el, cx);
        }
    }
}

// =============================================================
// Draw
// =============================================================

/// Freehand stroke. `points` are relative to `(x1, y1)`.
pub struct DrawBehavior;

impl DrawBehavior {
    fn absolute_points(el: &Element) -> Vec<Point> {
        el.props().points().into_iter().map(|p| p.offset(el.x1, el.y1)).collect()
    }

    /// Set the box to the bounds of `points` and store them relative to it.
    fn rebase(el: &mut Element, points: &[Point]) {
        let Some(r) = bounding_rect(points) else {
            return;
        };
        el.set_rect(r);
        let relative: Vec<Point> = points.iter().map(|p| p.offset(-r.x1, -r.y1)).collect();
        el.set_field("points", points_value(&relative));
    }
}

impl Behavior for DrawBehavior {
    fn style_keys(&self) -> &'static [&'static str] {
        &["strokeColor", "strokeWidth", "strokeStyle", "opacity"]
    }

    fn defaults(&self) -> FieldMap {
        defaults_from(&[
            ("strokeColor", json!(DEFAULT_STROKE_COLOR)),
            ("strokeWidth", json!(DEFAULT_STROKE_WIDTH)),
            ("strokeStyle", json!("solid")),
            ("opacity", json!(1.0)),
        ])
    }

    fn on_create_start(&self, el: &mut Element, g: &Gesture, _cx: &Context<'_>) {
        Self::rebase(el, &[g.origin]);
    }

    fn on_create_move(&self, el: &mut Element, g: &Gesture, _cx: &Context<'_>) {
        let mut points = Self::absolute_points(el);
        points.push(g.current);
        Self::rebase(el, &points);
    }

    fn on_create_end(&self, el: &mut Element, _g: &Gesture, cx: &Context<'_>) {
        let points = simplify_path(&Self::absolute_points(el), cx.simplify_tolerance);
        Self::rebase(el, &points);
        apply_min_size(el, self.min_size());
    }

    fn on_resize(&self, el: &mut Element, snapshot: &Element, handle: Handle, g: &Gesture, _cx: &Context<'_>) {
        let Handle::Anchor(anchor) = handle else {
            return;
        };
        let keep_ratio = g.shift && anchor.is_corner();
        let r = resize_box(el, snapshot, anchor, g, self.min_size(), keep_ratio);
        let s = snapshot.rect();
        let sx = if s.width() > 0.0 { r.width() / s.width() } else { 1.0 };
        let sy = if s.height() > 0.0 { r.height() / s.height() } else { 1.0 };
        let scaled: Vec<Point> = snapshot
            .props()
            .points()
            .into_iter()
            .map(|p| Point::new(p.x * sx, p.y * sy))
            .collect();
        el.set_field("points", points_value(&scaled));
    }

    fn is_value_allowed(&self, key: &str, value: &Value) -> bool {
        self.style_keys().contains(&key) && value_allowed(key, value) && !is_transparent_stroke(key, value)
    }
}

// =============================================================
// Image
// =============================================================

/// Raster image referencing an entry of the scene's asset map.
pub struct ImageBehavior;

impl Behavior for ImageBehavior {
    fn style_keys(&self) -> &'static [&'static str] {
        &["assetId", "opacity"]
    }

    fn defaults(&self) -> FieldMap {
        defaults_from(&[("assetId", json!("")), ("opacity", json!(1.0))])
    }

    fn handlers(&self, el: &Element) -> Vec<HandlePoint> {
        anchor_handles(&el.rect(), &ResizeAnchor::CORNERS)
    }

    fn on_resize(&self, el: &mut Element, snapshot: &Element, handle: Handle, g: &Gesture, _cx: &Context<'_>) {
        if let Handle::Anchor(anchor) = handle {
            resize_box(el, snapshot, anchor, g, self.min_size(), true);
        }
    }
}

// =============================================================
// Note
// =============================================================

/// Sticky note: fixed-size square centered on the click that created it.
pub struct NoteBehavior;

impl Behavior for NoteBehavior {
    fn style_keys(&self) -> &'static [&'static str] {
        &["noteColor", "text", "textFont", "textSize", "textColor", "opacity"]
    }

    fn defaults(&self) -> FieldMap {
        defaults_from(&[
            ("noteColor", json!(DEFAULT_NOTE_COLOR)),
            ("text", json!("")),
            ("textFont", json!(DEFAULT_TEXT_FONT)),
            ("textSize", json!(DEFAULT_TEXT_SIZE)),
            ("textColor", json!(DEFAULT_TEXT_COLOR)),
            ("opacity", json!(1.0)),
        ])
    }

    fn min_size(&self) -> (f64, f64) {
        (NOTE_MIN_SIZE, NOTE_MIN_SIZE)
    }

    fn has_text(&self) -> bool {
        true
    }

    fn handlers(&self, el: &Element) -> Vec<HandlePoint> {
        anchor_handles(&el.rect(), &ResizeAnchor::CORNERS)
    }

    fn on_create_move(&self, _el: &mut Element, _g: &Gesture, _cx: &Context<'_>) {}

    fn on_create_end(&self, el: &mut Element, g: &Gesture, _cx: &Context<'_>) {
        let half = NOTE_SIZE / 2.0;
        let c = g.origin;
        el.set_rect(Rect::new(c.x - half, c.y - half, c.x + half, c.y + half));
    }
}

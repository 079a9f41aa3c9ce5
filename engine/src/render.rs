//! Display list: turns the scene into paint commands.
//!
//! This module never draws. It reads the scene and UI state and produces a
//! flat list of [`Paint`] commands in painting order (elements bottom first,
//! then selection chrome, then the marquee). Geometry is in world
//! coordinates except where a field says otherwise; hosts apply the camera
//! transform and paint the list with whatever backend they have.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use serde::Serialize;

use crate::consts::{HATCH_ANGLE_DEG, HATCH_GAP_FACTOR, HATCH_GAP_MIN, LINE_HEIGHT, TRANSPARENT};
use crate::element::{Element, ElementId, ElementKind, Props};
use crate::geom::{
    Point, Rect, StrokeStyle, balanced_dash, control_through, curve_path, ellipse_path, ellipse_perimeter,
    hatch_ellipse, hatch_polygon, polygon_path, polygon_perimeter, smooth_path,
};
use crate::hit::HandlePoint;
use crate::input::UiState;
use crate::registry::{ArrowBehavior, TextMeasure, behavior};
use crate::scene::Scene;
use crate::selection::{group_bounds, selection_bounds};

/// Arrowhead length as a multiple of stroke width.
const ARROWHEAD_FACTOR: f64 = 5.0;

/// Arrowhead half-angle in radians (~30°).
const ARROWHEAD_ANGLE: f64 = PI / 6.0;

/// Handle radius in screen pixels.
const HANDLE_RADIUS_PX: f64 = 5.0;

/// Selection outline padding in screen pixels.
const SELECTION_PADDING_PX: f64 = 4.0;

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// Fill opacity of the `semi` fill style.
const SEMI_FILL_OPACITY: f64 = 0.5;

/// Inner padding of note text, in world units.
const NOTE_PADDING: f64 = 12.0;

/// Stroke parameters for a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    /// `[dash, gap]`, absent for solid strokes.
    pub dash: Option<[f64; 2]>,
    pub dash_offset: f64,
}

impl Stroke {
    fn solid(color: &str, width: f64) -> Self {
        Self { color: color.to_owned(), width, dash: None, dash_offset: 0.0 }
    }

    /// Stroke for a path of `length`, dash-balanced for non-solid styles.
    fn balanced(color: &str, width: f64, style: StrokeStyle, length: f64) -> Self {
        match balanced_dash(length, width, style) {
            Some(d) => Self { color: color.to_owned(), width, dash: Some(d.array()), dash_offset: d.offset },
            None => Self::solid(color, width),
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn parse(raw: &str) -> Self {
        match raw {
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::Left,
        }
    }
}

/// One line of laid-out text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    /// Left edge of the line's glyph box.
    pub x: f64,
    /// Top of the line's glyph box.
    pub y: f64,
}

/// A paint command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Paint {
    /// Fill and/or stroke an SVG path.
    Path {
        id: ElementId,
        d: String,
        fill: Option<String>,
        fill_opacity: f64,
        stroke: Option<Stroke>,
        opacity: f64,
    },
    /// Hatch fill lines.
    Lines {
        id: ElementId,
        segments: Vec<(Point, Point)>,
        stroke: Stroke,
        opacity: f64,
    },
    Text {
        id: ElementId,
        lines: Vec<TextLine>,
        font: String,
        size: f64,
        color: String,
        align: Align,
        opacity: f64,
    },
    /// An image asset. `data_url` is `None` when the asset is missing.
    Image {
        id: ElementId,
        asset_id: String,
        data_url: Option<String>,
        rect: Rect,
        opacity: f64,
    },
    /// Dashed selection box. Dash lengths are in screen pixels.
    SelectionOutline { rect: Rect, dash: f64 },
    /// A resize or node handle. `radius` is in world units.
    Handle { point: Point, radius: f64 },
    Marquee { rect: Rect },
}

/// Build the display list for the current scene.
#[must_use]
pub fn display_list(scene: &Scene, ui: &UiState, measure: &dyn TextMeasure) -> Vec<Paint> {
    let mut out = Vec::new();
    for el in scene.elements() {
        if ui.editing == Some(el.id) && el.kind == ElementKind::Text {
            // The host's editor overlay shows the text while it is open.
            continue;
        }
        paint_element(&mut out, el, scene, measure);
    }
    paint_selection(&mut out, scene);
    if let Some(rect) = ui.marquee {
        out.push(Paint::Marquee { rect });
    }
    out
}

// =============================================================
// Element dispatch
// =============================================================

fn paint_element(out: &mut Vec<Paint>, el: &Element, scene: &Scene, measure: &dyn TextMeasure) {
    match el.kind {
        ElementKind::Shape => paint_shape(out, el, measure),
        ElementKind::Arrow => paint_arrow(out, el),
        ElementKind::Text => paint_text(out, el, el.rect(), measure),
        ElementKind::Draw => paint_draw(out, el),
        ElementKind::Image => paint_image(out, el, scene),
        ElementKind::Note => paint_note(out, el, measure),
    }
}

// =============================================================
// Shapes
// =============================================================

fn paint_shape(out: &mut Vec<Paint>, el: &Element, measure: &dyn TextMeasure) {
    let props = el.props();
    let r = el.rect();
    let width = props.stroke_width();
    let (d, length) = match props.shape() {
        "ellipse" => (ellipse_path(&r), ellipse_perimeter(r.width() / 2.0, r.height() / 2.0)),
        "diamond" => (polygon_path(&r.diamond()), polygon_perimeter(&r.diamond(), true)),
        _ => (polygon_path(&r.corners()), polygon_perimeter(&r.corners(), true)),
    };

    let (fill, fill_opacity) = match props.fill_style() {
        "solid" => (Some(props.fill_color().to_owned()), 1.0),
        "semi" => (Some(props.fill_color().to_owned()), SEMI_FILL_OPACITY),
        _ => (None, 1.0),
    };
    out.push(Paint::Path {
        id: el.id,
        d,
        fill,
        fill_opacity,
        stroke: stroke_for(&props, length),
        opacity: props.opacity(),
    });
    if props.fill_style() == "hatch" {
        let hatch = hatch_lines(props.shape(), &r, width);
        if !hatch.is_empty() {
            out.push(Paint::Lines {
                id: el.id,
                segments: hatch,
                stroke: Stroke::solid(props.fill_color(), width / 2.0),
                opacity: props.opacity(),
            });
        }
    }
    if !props.text().is_empty() {
        paint_text(out, el, r, measure);
    }
}

/// Hatch lines for a shape, spaced by stroke width but never closer than
/// `HATCH_GAP_MIN`.
fn hatch_lines(shape: &str, r: &Rect, stroke_width: f64) -> Vec<(Point, Point)> {
    let gap = (stroke_width * HATCH_GAP_FACTOR).max(HATCH_GAP_MIN);
    match shape {
        "ellipse" => hatch_ellipse(r.center(), r.width() / 2.0, r.height() / 2.0, HATCH_ANGLE_DEG, gap),
        "diamond" => hatch_polygon(&r.diamond(), HATCH_ANGLE_DEG, gap),
        _ => hatch_polygon(&r.corners(), HATCH_ANGLE_DEG, gap),
    }
}

/// Balanced stroke, or none when the color is transparent.
fn stroke_for(props: &Props<'_>, length: f64) -> Option<Stroke> {
    let color = props.stroke_color();
    (color != TRANSPARENT).then(|| Stroke::balanced(color, props.stroke_width(), props.stroke_style(), length))
}

// =============================================================
// Arrows and freehand
// =============================================================

fn paint_arrow(out: &mut Vec<Paint>, el: &Element) {
    let props = el.props();
    let polyline = ArrowBehavior::polyline(el);
    let (start, end) = ArrowBehavior::endpoints(el);
    let d = match props.center() {
        Some(node) => curve_path(&[start, control_through(start, node, end), end]),
        None => curve_path(&[start, end]),
    };
    out.push(Paint::Path {
        id: el.id,
        d,
        fill: None,
        fill_opacity: 1.0,
        stroke: stroke_for(&props, polygon_perimeter(&polyline, false)),
        opacity: props.opacity(),
    });

    let size = props.stroke_width() * ARROWHEAD_FACTOR;
    if let [a, b, ..] = polyline.as_slice() {
        paint_arrowhead(out, el, props.start_arrowhead(), *a, *b, size);
    }
    if let [.., a, b] = polyline.as_slice() {
        paint_arrowhead(out, el, props.end_arrowhead(), *b, *a, size);
    }
}

/// Arrowhead at `tip`, pointing away from `from`.
fn paint_arrowhead(out: &mut Vec<Paint>, el: &Element, style: &str, tip: Point, from: Point, size: f64) {
    let props = el.props();
    let angle = (tip.y - from.y).atan2(tip.x - from.x);
    let wing = |a: f64| Point::new(tip.x - size * a.cos(), tip.y - size * a.sin());
    let (left, right) = (wing(angle - ARROWHEAD_ANGLE), wing(angle + ARROWHEAD_ANGLE));
    let color = props.stroke_color();
    let stroke = Some(Stroke::solid(color, props.stroke_width()));

    let (d, fill) = match style {
        "arrow" => (format!("M{} {} L{} {} L{} {}", left.x, left.y, tip.x, tip.y, right.x, right.y), None),
        "triangle" => (polygon_path(&[tip, left, right]), Some(color.to_owned())),
        "circle" => {
            let r = size / 2.0;
            let c = Point::new(tip.x - r * angle.cos(), tip.y - r * angle.sin());
            (ellipse_path(&Rect::new(c.x - r, c.y - r, c.x + r, c.y + r)), Some(color.to_owned()))
        }
        _ => return,
    };
    out.push(Paint::Path { id: el.id, d, fill, fill_opacity: 1.0, stroke, opacity: props.opacity() });
}

fn paint_draw(out: &mut Vec<Paint>, el: &Element) {
    let props = el.props();
    let points: Vec<Point> = props.points().into_iter().map(|p| p.offset(el.x1, el.y1)).collect();
    if points.is_empty() {
        return;
    }
    out.push(Paint::Path {
        id: el.id,
        d: smooth_path(&points),
        fill: None,
        fill_opacity: 1.0,
        stroke: stroke_for(&props, polygon_perimeter(&points, false)),
        opacity: props.opacity(),
    });
}

// =============================================================
// Text, notes, images
// =============================================================

/// Lay out the element's text inside `area`, one line per `\n`.
fn paint_text(out: &mut Vec<Paint>, el: &Element, area: Rect, measure: &dyn TextMeasure) {
    let props = el.props();
    let (font, size) = (props.text_font(), props.text_size());
    let align = Align::parse(props.text_align());
    let line_h = size * LINE_HEIGHT;
    let lines = props
        .text()
        .split('\n')
        .zip(0_u32..)
        .map(|(line, i)| {
            let (w, _) = measure.measure(line, font, size);
            let x = match align {
                Align::Left => area.x1,
                Align::Center => area.center().x - w / 2.0,
                Align::Right => area.x2 - w,
            };
            TextLine { text: line.to_owned(), x, y: area.y1 + f64::from(i) * line_h }
        })
        .collect();
    out.push(Paint::Text {
        id: el.id,
        lines,
        font: font.to_owned(),
        size,
        color: props.text_color().to_owned(),
        align,
        opacity: props.opacity(),
    });
}

fn paint_note(out: &mut Vec<Paint>, el: &Element, measure: &dyn TextMeasure) {
    let props = el.props();
    let r = el.rect();
    out.push(Paint::Path {
        id: el.id,
        d: polygon_path(&r.corners()),
        fill: Some(props.note_color().to_owned()),
        fill_opacity: 1.0,
        stroke: None,
        opacity: props.opacity(),
    });
    if !props.text().is_empty() {
        paint_text(out, el, r.expand(-NOTE_PADDING), measure);
    }
}

fn paint_image(out: &mut Vec<Paint>, el: &Element, scene: &Scene) {
    let props = el.props();
    let asset_id = props.asset_id();
    out.push(Paint::Image {
        id: el.id,
        asset_id: asset_id.to_owned(),
        data_url: scene.assets.get(asset_id).cloned(),
        rect: el.rect(),
        opacity: props.opacity(),
    });
}

// =============================================================
// Selection chrome
// =============================================================

fn paint_selection(out: &mut Vec<Paint>, scene: &Scene) {
    let zoom = scene.camera.zoom;
    let padding = SELECTION_PADDING_PX / zoom;

    if let Some(group) = scene.active_group {
        if let Some(rect) = group_bounds(scene, group) {
            out.push(Paint::SelectionOutline { rect: rect.expand(padding), dash: SELECTION_DASH_PX * 2.0 });
        }
    }

    let selected = scene.selection();
    let Some(bounds) = selection_bounds(scene) else {
        return;
    };
    out.push(Paint::SelectionOutline { rect: bounds.expand(padding), dash: SELECTION_DASH_PX });

    if let [el] = selected.as_slice() {
        if !el.locked {
            let radius = HANDLE_RADIUS_PX / zoom;
            out.extend(
                behavior(el.kind)
                    .handlers(el)
                    .into_iter()
                    .map(|HandlePoint { point, .. }| Paint::Handle { point, radius }),
            );
        }
    }
}

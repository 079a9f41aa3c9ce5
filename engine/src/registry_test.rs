#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn cx() -> Context<'static> {
    Context { measure: &ApproxMeasure, simplify_tolerance: 0.5 }
}

fn gesture(ox: f64, oy: f64, cx: f64, cy: f64) -> Gesture {
    Gesture { origin: Point::new(ox, oy), current: Point::new(cx, cy), shift: false }
}

fn boxed(kind: ElementKind, x1: f64, y1: f64, x2: f64, y2: f64) -> Element {
    let mut el = create(kind, &FieldMap::new());
    el.set_rect(Rect::new(x1, y1, x2, y2));
    el
}

/// Run a full create gesture from `from` to `to`.
fn create_by_drag(kind: ElementKind, from: Point, to: Point) -> Element {
    let b = behavior(kind);
    let mut el = create(kind, &FieldMap::new());
    let g = Gesture { origin: from, current: from, shift: false };
    b.on_create_start(&mut el, &g, &cx());
    let g = Gesture { current: to, ..g };
    b.on_create_move(&mut el, &g, &cx());
    b.on_create_end(&mut el, &g, &cx());
    el
}

// =============================================================
// initialize
// =============================================================

#[test]
fn initialize_covers_every_style_key() {
    for kind in ElementKind::ALL {
        let b = behavior(kind);
        let fields = b.initialize(&FieldMap::new());
        for key in b.style_keys() {
            assert!(fields.contains_key(*key), "{kind:?} missing default for {key}");
        }
    }
}

#[test]
fn initialize_applies_overrides_and_drops_foreign_keys() {
    let mut overrides = FieldMap::new();
    overrides.insert("strokeColor".into(), json!("#ff0000"));
    overrides.insert("fillStyle".into(), json!("hatch"));
    let fields = behavior(ElementKind::Arrow).initialize(&overrides);
    assert_eq!(fields["strokeColor"], "#ff0000");
    assert!(!fields.contains_key("fillStyle"));
}

#[test]
fn initialize_is_idempotent() {
    let mut overrides = FieldMap::new();
    overrides.insert("shape".into(), json!("ellipse"));
    let b = behavior(ElementKind::Shape);
    let once = b.initialize(&overrides);
    let twice = b.initialize(&once);
    assert_eq!(once, twice);
}

// =============================================================
// handlers
// =============================================================

#[test]
fn shape_has_eight_handles_and_text_kinds_four() {
    let shape = boxed(ElementKind::Shape, 0.0, 0.0, 100.0, 50.0);
    assert_eq!(behavior(ElementKind::Shape).handlers(&shape).len(), 8);
    for kind in [ElementKind::Text, ElementKind::Note, ElementKind::Image] {
        let el = boxed(kind, 0.0, 0.0, 100.0, 50.0);
        let handles = behavior(kind).handlers(&el);
        assert_eq!(handles.len(), 4, "{kind:?}");
        assert!(handles.iter().all(|h| matches!(h.handle, Handle::Anchor(a) if a.is_corner())));
    }
}

#[test]
fn handle_positions_sit_on_the_box() {
    let el = boxed(ElementKind::Shape, 0.0, 0.0, 100.0, 50.0);
    let handles = behavior(ElementKind::Shape).handlers(&el);
    let se = handles
        .iter()
        .find(|h| h.handle == Handle::Anchor(ResizeAnchor::Se))
        .unwrap();
    assert_eq!(se.point, Point::new(100.0, 50.0));
    let n = handles
        .iter()
        .find(|h| h.handle == Handle::Anchor(ResizeAnchor::N))
        .unwrap();
    assert_eq!(n.point, Point::new(50.0, 0.0));
}

#[test]
fn arrow_handles_are_start_center_end() {
    let el = boxed(ElementKind::Arrow, 0.0, 0.0, 100.0, 0.0);
    let handles = behavior(ElementKind::Arrow).handlers(&el);
    let kinds: Vec<Handle> = handles.iter().map(|h| h.handle).collect();
    assert_eq!(
        kinds,
        vec![
            Handle::Node(ArrowNode::Start),
            Handle::Node(ArrowNode::Center),
            Handle::Node(ArrowNode::End)
        ]
    );
    assert_eq!(handles[1].point, Point::new(50.0, 0.0));
}

// =============================================================
// create gestures
// =============================================================

#[test]
fn shape_create_normalizes_reverse_drag() {
    let el = create_by_drag(ElementKind::Shape, Point::new(100.0, 80.0), Point::new(20.0, 10.0));
    assert_eq!((el.x1, el.y1, el.x2, el.y2), (20.0, 10.0, 100.0, 80.0));
}

#[test]
fn shape_zero_drag_gets_minimum_square() {
    let el = create_by_drag(ElementKind::Shape, Point::new(5.0, 5.0), Point::new(5.0, 5.0));
    assert_eq!(el.width(), SHAPE_MIN_SIZE);
    assert_eq!(el.height(), SHAPE_MIN_SIZE);
}

#[test]
fn shape_create_with_shift_is_square() {
    let b = behavior(ElementKind::Shape);
    let mut el = create(ElementKind::Shape, &FieldMap::new());
    let mut g = gesture(0.0, 0.0, 0.0, 0.0);
    b.on_create_start(&mut el, &g, &cx());
    g.current = Point::new(-40.0, 100.0);
    g.shift = true;
    b.on_create_move(&mut el, &g, &cx());
    b.on_create_end(&mut el, &g, &cx());
    assert_eq!((el.x1, el.y1, el.x2, el.y2), (-100.0, 0.0, 0.0, 100.0));
}

#[test]
fn arrow_keeps_direction_and_zero_length_gets_default() {
    let el = create_by_drag(ElementKind::Arrow, Point::new(100.0, 0.0), Point::new(0.0, 0.0));
    assert_eq!((el.x1, el.x2), (0.0, 100.0));
    assert_eq!(ArrowBehavior::endpoints(&el), (Point::new(100.0, 0.0), Point::new(0.0, 0.0)));

    let el = create_by_drag(ElementKind::Arrow, Point::new(10.0, 10.0), Point::new(10.0, 10.0));
    assert_eq!(el.x2 - el.x1, ARROW_DEFAULT_LENGTH);
}

#[test]
fn reversed_arrow_box_is_normalized_with_flags() {
    let el = create_by_drag(ElementKind::Arrow, Point::new(100.0, 0.0), Point::new(0.0, 60.0));
    assert_eq!((el.x1, el.y1, el.x2, el.y2), (0.0, 0.0, 100.0, 60.0));
    assert!(el.props().flip_x());
    assert!(!el.props().flip_y());
    assert!(!el.props.contains_key("flipY"));
    assert_eq!(ArrowBehavior::endpoints(&el), (Point::new(100.0, 0.0), Point::new(0.0, 60.0)));
}

#[test]
fn note_is_centered_on_click() {
    let el = create_by_drag(ElementKind::Note, Point::new(300.0, 300.0), Point::new(400.0, 400.0));
    assert_eq!(el.rect().center(), Point::new(300.0, 300.0));
    assert_eq!(el.width(), NOTE_SIZE);
}

#[test]
fn text_create_is_measured() {
    let mut overrides = FieldMap::new();
    overrides.insert("text".into(), json!("hello"));
    let b = behavior(ElementKind::Text);
    let mut el = create(ElementKind::Text, &overrides);
    let g = gesture(0.0, 0.0, 0.0, 0.0);
    b.on_create_start(&mut el, &g, &cx());
    b.on_create_end(&mut el, &g, &cx());
    let expected_w = 5.0 * DEFAULT_TEXT_SIZE * GLYPH_ADVANCE;
    assert_eq!(el.props["textWidth"], expected_w);
    assert_eq!(el.x2 - el.x1, expected_w);
    assert_eq!(el.y2 - el.y1, DEFAULT_TEXT_SIZE * LINE_HEIGHT);
}

#[test]
fn draw_create_stores_relative_simplified_points() {
    let b = behavior(ElementKind::Draw);
    let mut el = create(ElementKind::Draw, &FieldMap::new());
    let origin = Point::new(50.0, 50.0);
    let mut g = Gesture { origin, current: origin, shift: false };
    b.on_create_start(&mut el, &g, &cx());
    for p in [(60.0, 50.0), (70.0, 50.0), (70.0, 40.0), (40.0, 40.0)] {
        g.current = Point::new(p.0, p.1);
        b.on_create_move(&mut el, &g, &cx());
    }
    b.on_create_end(&mut el, &g, &cx());

    assert_eq!((el.x1, el.y1, el.x2, el.y2), (40.0, 40.0, 70.0, 50.0));
    let points = el.props().points();
    // The collinear (60, 50) sample is dropped.
    assert_eq!(
        points,
        vec![
            Point::new(10.0, 10.0),
            Point::new(30.0, 10.0),
            Point::new(30.0, 0.0),
            Point::new(0.0, 0.0)
        ]
    );
}

// =============================================================
// resize
// =============================================================

#[test]
fn resize_se_moves_bottom_right() {
    let b = behavior(ElementKind::Shape);
    let snap = boxed(ElementKind::Shape, 0.0, 0.0, 100.0, 100.0);
    let mut el = snap.clone();
    b.on_resize(&mut el, &snap, Handle::Anchor(ResizeAnchor::Se), &gesture(100.0, 100.0, 150.0, 120.0), &cx());
    assert_eq!((el.x1, el.y1, el.x2, el.y2), (0.0, 0.0, 150.0, 120.0));
}

#[test]
fn resize_clamps_to_minimum() {
    let b = behavior(ElementKind::Shape);
    let snap = boxed(ElementKind::Shape, 0.0, 0.0, 100.0, 100.0);
    let mut el = snap.clone();
    b.on_resize(&mut el, &snap, Handle::Anchor(ResizeAnchor::W), &gesture(0.0, 50.0, 500.0, 50.0), &cx());
    assert_eq!(el.x1, 100.0 - SHAPE_MIN_SIZE);
    assert_eq!(el.x2, 100.0);
}

#[test]
fn resize_corner_with_shift_keeps_aspect() {
    let b = behavior(ElementKind::Shape);
    let snap = boxed(ElementKind::Shape, 0.0, 0.0, 200.0, 100.0);
    let mut el = snap.clone();
    let g = Gesture { origin: Point::new(200.0, 100.0), current: Point::new(400.0, 110.0), shift: true };
    b.on_resize(&mut el, &snap, Handle::Anchor(ResizeAnchor::Se), &g, &cx());
    assert_eq!(el.width() / el.height(), 2.0);
    assert_eq!(el.width(), 400.0);
}

#[test]
fn image_always_keeps_aspect() {
    let b = behavior(ElementKind::Image);
    let snap = boxed(ElementKind::Image, 0.0, 0.0, 40.0, 20.0);
    let mut el = snap.clone();
    b.on_resize(&mut el, &snap, Handle::Anchor(ResizeAnchor::Nw), &gesture(0.0, 0.0, -40.0, 0.0), &cx());
    assert_eq!((el.x1, el.y1, el.x2, el.y2), (-40.0, -20.0, 40.0, 20.0));
}

#[test]
fn draw_resize_scales_points() {
    let b = behavior(ElementKind::Draw);
    let mut snap = boxed(ElementKind::Draw, 0.0, 0.0, 10.0, 10.0);
    snap.set_field("points", points_value(&[Point::new(0.0, 0.0), Point::new(10.0, 10.0)]));
    let mut el = snap.clone();
    b.on_resize(&mut el, &snap, Handle::Anchor(ResizeAnchor::Se), &gesture(10.0, 10.0, 20.0, 40.0), &cx());
    assert_eq!(el.props().points(), vec![Point::new(0.0, 0.0), Point::new(20.0, 40.0)]);
}

#[test]
fn text_resize_picks_largest_fitting_size() {
    let b = behavior(ElementKind::Text);
    let mut snap = boxed(ElementKind::Text, 0.0, 0.0, 10.0, 10.0);
    snap.set_field("text", json!("ab"));
    let mut el = snap.clone();
    // Box becomes 120 x 100: width allows 120 / (2 * 0.6) = 100, height 100 / 1.2 = 83.3.
    b.on_resize(&mut el, &snap, Handle::Anchor(ResizeAnchor::Se), &gesture(10.0, 10.0, 120.0, 100.0), &cx());
    assert_eq!(el.props().text_size(), 83.0);
}

#[test]
fn text_fit_size_falls_back_to_minimum() {
    let mut el = boxed(ElementKind::Text, 0.0, 0.0, 10.0, 10.0);
    el.set_field("text", json!("a long line of text"));
    assert_eq!(TextBehavior::fit_size(&el, &cx(), 1.0, 1.0), TEXT_SIZE_MIN);
}

#[test]
fn arrow_center_node_bends_curve() {
    let b = behavior(ElementKind::Arrow);
    let snap = boxed(ElementKind::Arrow, 0.0, 0.0, 100.0, 0.0);
    let mut el = snap.clone();
    let handle = Handle::Node(ArrowNode::Center);
    b.on_resize(&mut el, &snap, handle, &gesture(50.0, 0.0, 50.0, 40.0), &cx());
    assert_eq!(el.props().center(), Some(Point::new(50.0, 40.0)));
    let bounds = b.bounds(&el);
    assert!((bounds.y2 - 40.0).abs() < 1e-9);
}

#[test]
fn arrow_end_node_moves_only_end() {
    let b = behavior(ElementKind::Arrow);
    let snap = boxed(ElementKind::Arrow, 0.0, 0.0, 100.0, 0.0);
    let mut el = snap.clone();
    b.on_resize(&mut el, &snap, Handle::Node(ArrowNode::End), &gesture(100.0, 0.0, -20.0, 30.0), &cx());
    assert_eq!(ArrowBehavior::endpoints(&el), (Point::new(0.0, 0.0), Point::new(-20.0, 30.0)));
    assert_eq!((el.x1, el.y1, el.x2, el.y2), (-20.0, 0.0, 0.0, 30.0));
}

// =============================================================
// drag / update
// =============================================================

#[test]
fn arrow_drag_moves_curve_node() {
    let b = behavior(ElementKind::Arrow);
    let mut snap = boxed(ElementKind::Arrow, 0.0, 0.0, 100.0, 0.0);
    snap.set_field("xCenter", json!(50.0));
    snap.set_field("yCenter", json!(30.0));
    let mut el = snap.clone();
    el.translate(10.0, 5.0);
    b.on_drag(&mut el, &snap, &gesture(0.0, 0.0, 10.0, 5.0));
    assert_eq!(el.props().center(), Some(Point::new(60.0, 35.0)));
}

#[test]
fn text_update_remeasures() {
    let b = behavior(ElementKind::Text);
    let mut el = boxed(ElementKind::Text, 0.0, 0.0, 10.0, 10.0);
    el.set_field("text", json!("line one\nline two"));
    b.on_update(&mut el, &["text"], &cx());
    assert_eq!(el.height(), 2.0 * DEFAULT_TEXT_SIZE * LINE_HEIGHT);
    assert_eq!(el.props["textHeight"], 2.0 * DEFAULT_TEXT_SIZE * LINE_HEIGHT);
}

#[test]
fn text_update_ignores_unrelated_keys() {
    let b = behavior(ElementKind::Text);
    let mut el = boxed(ElementKind::Text, 0.0, 0.0, 300.0, 300.0);
    b.on_update(&mut el, &["textColor"], &cx());
    assert_eq!(el.width(), 300.0);
}

// =============================================================
// is_value_allowed
// =============================================================

#[test]
fn value_checks_reject_foreign_keys_and_bad_values() {
    let shape = behavior(ElementKind::Shape);
    assert!(shape.is_value_allowed("fillStyle", &json!("hatch")));
    assert!(!shape.is_value_allowed("fillStyle", &json!("plaid")));
    assert!(!shape.is_value_allowed("endArrowhead", &json!("arrow")));
    assert!(!shape.is_value_allowed("strokeWidth", &json!(0)));
    assert!(!shape.is_value_allowed("strokeWidth", &json!("thick")));
    assert!(shape.is_value_allowed("strokeColor", &json!(TRANSPARENT)));
}

#[test]
fn strokes_reject_transparent_color() {
    for kind in [ElementKind::Arrow, ElementKind::Draw] {
        let b = behavior(kind);
        assert!(!b.is_value_allowed("strokeColor", &json!(TRANSPARENT)), "{kind:?}");
        assert!(b.is_value_allowed("strokeColor", &json!("#123456")), "{kind:?}");
    }
}

// =============================================================
// hit
// =============================================================

#[test]
fn arrow_hit_follows_the_line() {
    let b = behavior(ElementKind::Arrow);
    let el = boxed(ElementKind::Arrow, 0.0, 0.0, 100.0, 100.0);
    assert!(b.hit(&el, Point::new(50.0, 52.0), 2.0));
    assert!(!b.hit(&el, Point::new(90.0, 10.0), 2.0));
}

#[test]
fn box_hit_uses_expanded_bounds() {
    let b = behavior(ElementKind::Shape);
    let el = boxed(ElementKind::Shape, 0.0, 0.0, 10.0, 10.0);
    assert!(b.hit(&el, Point::new(12.0, 5.0), 2.0));
    assert!(!b.hit(&el, Point::new(13.0, 5.0), 2.0));
}

#[test]
fn approx_measure_counts_lines_and_widest_line() {
    let (w, h) = ApproxMeasure.measure("ab\nabcd", "sans", 10.0);
    assert_eq!(w, 4.0 * 10.0 * GLYPH_ADVANCE);
    assert_eq!(h, 2.0 * 10.0 * LINE_HEIGHT);
}

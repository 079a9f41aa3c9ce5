use super::*;
use crate::element::{Element, ElementKind, FieldMap};
use crate::registry::create;

fn shape_at(scene: &mut Scene, x1: f64, y1: f64, x2: f64, y2: f64) -> ElementId {
    let mut el: Element = create(ElementKind::Shape, &FieldMap::new());
    el.set_rect(Rect::new(x1, y1, x2, y2));
    scene.add(el)
}

fn tol() -> f64 {
    8.0
}

// =============================================================
// ResizeAnchor
// =============================================================

#[test]
fn anchor_edges_are_consistent() {
    for a in ResizeAnchor::ALL {
        let horizontal = a.moves_left() || a.moves_right();
        let vertical = a.moves_top() || a.moves_bottom();
        assert_eq!(a.is_corner(), horizontal && vertical, "{a:?}");
        assert!(!(a.moves_left() && a.moves_right()));
        assert!(!(a.moves_top() && a.moves_bottom()));
    }
}

#[test]
fn anchor_positions() {
    let r = Rect::new(0.0, 0.0, 100.0, 40.0);
    assert_eq!(ResizeAnchor::Nw.position(&r), Point::new(0.0, 0.0));
    assert_eq!(ResizeAnchor::E.position(&r), Point::new(100.0, 20.0));
    assert_eq!(ResizeAnchor::S.position(&r), Point::new(50.0, 40.0));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn miss_on_empty_scene() {
    let scene = Scene::new();
    assert!(hit_test(Point::new(0.0, 0.0), &scene, &Camera::default(), tol()).is_none());
}

#[test]
fn topmost_body_wins() {
    let mut scene = Scene::new();
    shape_at(&mut scene, 0.0, 0.0, 100.0, 100.0);
    let top = shape_at(&mut scene, 50.0, 50.0, 150.0, 150.0);
    let hit = hit_test(Point::new(75.0, 75.0), &scene, &Camera::default(), tol()).unwrap();
    assert_eq!(hit.element_id, top);
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn handle_of_sole_selected_element() {
    let mut scene = Scene::new();
    let id = shape_at(&mut scene, 0.0, 0.0, 100.0, 100.0);
    scene.set_selected(id, true);
    let hit = hit_test(Point::new(101.0, 99.0), &scene, &Camera::default(), tol()).unwrap();
    assert_eq!(hit.part, HitPart::Handle(Handle::Anchor(ResizeAnchor::Se)));
}

#[test]
fn no_handles_when_locked_or_multi_selected() {
    let mut scene = Scene::new();
    let a = shape_at(&mut scene, 0.0, 0.0, 100.0, 100.0);
    let b = shape_at(&mut scene, 300.0, 300.0, 400.0, 400.0);
    scene.select_only(&[a, b]);
    let hit = hit_test(Point::new(100.0, 100.0), &scene, &Camera::default(), tol()).unwrap();
    assert_eq!(hit.part, HitPart::Body);

    scene.select_only(&[a]);
    if let Some(el) = scene.get_mut(a) {
        el.locked = true;
    }
    let hit = hit_test(Point::new(100.0, 100.0), &scene, &Camera::default(), tol()).unwrap();
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn tolerance_shrinks_with_zoom() {
    let mut scene = Scene::new();
    shape_at(&mut scene, 0.0, 0.0, 100.0, 100.0);
    let zoomed = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 4.0 };
    assert!(hit_test(Point::new(106.0, 50.0), &scene, &Camera::default(), tol()).is_some());
    assert!(hit_test(Point::new(106.0, 50.0), &scene, &zoomed, tol()).is_none());
}

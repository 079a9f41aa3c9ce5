#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Camera;
use crate::element::ElementId;
use crate::geom::{Point, Rect, distance};
use crate::registry::behavior;
use crate::scene::Scene;

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Handle(Handle),
}

/// A draggable handle on a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Box resize handle at a corner or edge midpoint.
    Anchor(ResizeAnchor),
    /// Arrow node handle.
    Node(ArrowNode),
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];
    pub const CORNERS: [Self; 4] = [Self::Ne, Self::Se, Self::Sw, Self::Nw];

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    /// Whether dragging this anchor moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    /// World position of this anchor on `rect`.
    #[must_use]
    pub fn position(self, rect: &Rect) -> Point {
        let c = rect.center();
        let x = if self.moves_left() {
            rect.x1
        } else if self.moves_right() {
            rect.x2
        } else {
            c.x
        };
        let y = if self.moves_top() {
            rect.y1
        } else if self.moves_bottom() {
            rect.y2
        } else {
            c.y
        };
        Point::new(x, y)
    }
}

/// Which node of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowNode {
    Start,
    End,
    /// Curve node; dragging it bends the arrow.
    Center,
}

/// A handle together with its world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlePoint {
    pub handle: Handle,
    pub point: Point,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Test which element (if any) is under `world_pt`.
///
/// Handles of the sole selected, unlocked element are checked first; then
/// element bodies from the top of the stack down. `tolerance_px` is the hit
/// slop in screen pixels.
#[must_use]
pub fn hit_test(world_pt: Point, scene: &Scene, camera: &Camera, tolerance_px: f64) -> Option<Hit> {
    let tolerance = camera.screen_dist_to_world(tolerance_px);

    if let Some((element_id, handle)) = hit_handle(world_pt, scene, tolerance) {
        return Some(Hit { element_id, part: HitPart::Handle(handle) });
    }

    scene
        .elements()
        .iter()
        .rev()
        .find(|el| behavior(el.kind).hit(el, world_pt, tolerance))
        .map(|el| Hit { element_id: el.id, part: HitPart::Body })
}

/// The handle of the sole selected, unlocked element under `world_pt`, if any.
#[must_use]
pub fn handle_at(world_pt: Point, scene: &Scene, camera: &Camera, tolerance_px: f64) -> Option<(ElementId, Handle)> {
    hit_handle(world_pt, scene, camera.screen_dist_to_world(tolerance_px))
}

fn hit_handle(world_pt: Point, scene: &Scene, tolerance: f64) -> Option<(ElementId, Handle)> {
    let mut selected = scene.elements().iter().filter(|el| el.selected);
    let (Some(el), None) = (selected.next(), selected.next()) else {
        return None;
    };
    if el.locked {
        return None;
    }
    behavior(el.kind)
        .handlers(el)
        .into_iter()
        .find(|h| distance(h.point, world_pt) <= tolerance)
        .map(|h| (el.id, h.handle))
}

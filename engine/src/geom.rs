//! Geometry kernel: stateless helpers shared by behaviors, hit-testing and
//! the display list.
//!
//! Everything here works in world coordinates and is free of element or
//! scene knowledge. Path strings use SVG path syntax because that is what the
//! host renderers consume.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::consts::{DASH_FACTOR, HATCH_MAX_LINES};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this point moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self { x: (self.x + other.x) / 2.0, y: (self.y + other.y) / 2.0 }
    }
}

/// Axis-aligned rectangle stored as two corners with `x1 <= x2`, `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    /// Build a rectangle from any two corners, normalizing their order.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1: x1.min(x2), y1: y1.min(y2), x2: x1.max(x2), y2: y1.max(y2) }
    }

    #[must_use]
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Closed-interval point containment.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }

    /// Closed-interval containment of `other` inside `self`.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x1 >= self.x1 && other.x2 <= self.x2 && other.y1 >= self.y1 && other.y2 <= self.y2
    }

    /// Smallest rectangle enclosing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Grow the rectangle by `d` on every side.
    #[must_use]
    pub fn expand(&self, d: f64) -> Rect {
        Rect { x1: self.x1 - d, y1: self.y1 - d, x2: self.x2 + d, y2: self.y2 + d }
    }

    /// Corners in clockwise order starting at the top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x1, self.y1),
            Point::new(self.x2, self.y1),
            Point::new(self.x2, self.y2),
            Point::new(self.x1, self.y2),
        ]
    }

    /// Edge midpoints in clockwise order starting at the top edge.
    #[must_use]
    pub fn diamond(&self) -> [Point; 4] {
        let c = self.center();
        [
            Point::new(c.x, self.y1),
            Point::new(self.x2, c.y),
            Point::new(c.x, self.y2),
            Point::new(self.x1, c.y),
        ]
    }
}

// =============================================================
// Distances and lengths
// =============================================================

#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Shortest distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}

/// Perimeter of an ellipse with radii `rx`, `ry` (Ramanujan's second approximation).
#[must_use]
pub fn ellipse_perimeter(rx: f64, ry: f64) -> f64 {
    let (a, b) = (rx.abs(), ry.abs());
    if a + b <= f64::EPSILON {
        return 0.0;
    }
    let h = ((a - b) / (a + b)).powi(2);
    std::f64::consts::PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
}

/// Length of a polyline, including the closing edge when `closed`.
#[must_use]
pub fn polygon_perimeter(points: &[Point], closed: bool) -> f64 {
    let open: f64 = points.windows(2).map(|w| distance(w[0], w[1])).sum();
    match (closed, points.first(), points.last()) {
        (true, Some(first), Some(last)) if points.len() > 2 => open + distance(*last, *first),
        _ => open,
    }
}

/// Smallest rectangle enclosing all `points`, or `None` when empty.
#[must_use]
pub fn bounding_rect(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let init = Rect { x1: first.x, y1: first.y, x2: first.x, y2: first.y };
    Some(points.iter().fold(init, |r, p| Rect {
        x1: r.x1.min(p.x),
        y1: r.y1.min(p.y),
        x2: r.x2.max(p.x),
        y2: r.y2.max(p.y),
    }))
}

/// Round `value` to the nearest multiple of `step`. A non-positive step disables snapping.
#[must_use]
pub fn snap(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

// =============================================================
// Dash balancing
// =============================================================

/// Stroke line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Parse a style name; unknown names are treated as solid.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "dashed" => Self::Dashed,
            "dotted" => Self::Dotted,
            _ => Self::Solid,
        }
    }
}

/// A balanced dash pattern: `[dash, gap]` plus a start offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub dash: f64,
    pub gap: f64,
    pub offset: f64,
    /// Number of dash/gap pairs that tile the path.
    pub count: f64,
}

impl Dash {
    /// The pattern as an SVG `stroke-dasharray` pair.
    #[must_use]
    pub fn array(&self) -> [f64; 2] {
        [self.dash, self.gap]
    }
}

/// Compute a dash pattern that tiles a path of `length` with whole dashes.
///
/// The dash count is `floor(length / dash / 2)` and the gap is stretched so
/// `count * (dash + gap) == length`. Returns `None` for solid strokes and
/// degenerate lengths.
#[must_use]
pub fn balanced_dash(length: f64, stroke_width: f64, style: StrokeStyle) -> Option<Dash> {
    let dash = match style {
        StrokeStyle::Solid => return None,
        StrokeStyle::Dashed => stroke_width * DASH_FACTOR,
        StrokeStyle::Dotted => stroke_width,
    };
    if length <= 0.0 || dash <= 0.0 {
        return None;
    }
    let count = (length / dash / 2.0).floor();
    if count < 1.0 {
        return Some(Dash { dash: length, gap: 0.0, offset: 0.0, count: 1.0 });
    }
    let gap = length / count - dash;
    Some(Dash { dash, gap, offset: dash / 2.0, count })
}

// =============================================================
// Path simplification
// =============================================================

/// Ramer–Douglas–Peucker simplification.
///
/// The first and last input points are always kept unchanged.
#[must_use]
pub fn simplify_path(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;
    mark_deviations(points, 0, last, tolerance.max(0.0), &mut keep);
    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn mark_deviations(points: &[Point], first: usize, last: usize, tolerance: f64, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }
    let mut max_dist = 0.0;
    let mut max_idx = first;
    for (i, p) in points.iter().enumerate().take(last).skip(first + 1) {
        let d = point_segment_distance(*p, points[first], points[last]);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }
    if max_dist > tolerance {
        keep[max_idx] = true;
        mark_deviations(points, first, max_idx, tolerance, keep);
        mark_deviations(points, max_idx, last, tolerance, keep);
    }
}

// =============================================================
// Curves and path strings
// =============================================================

/// Point at parameter `t` on the quadratic Bézier `p0`, `c`, `p2`.
#[must_use]
pub fn quadratic_point(p0: Point, c: Point, p2: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    Point::new(
        mt * mt * p0.x + 2.0 * mt * t * c.x + t * t * p2.x,
        mt * mt * p0.y + 2.0 * mt * t * c.y + t * t * p2.y,
    )
}

/// Control point of the quadratic from `start` to `end` that passes through `through` at `t = 0.5`.
#[must_use]
pub fn control_through(start: Point, through: Point, end: Point) -> Point {
    Point::new(
        2.0 * through.x - (start.x + end.x) / 2.0,
        2.0 * through.y - (start.y + end.y) / 2.0,
    )
}

/// Sample a quadratic curve into `segments + 1` points.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_quadratic(p0: Point, c: Point, p2: Point, segments: usize) -> Vec<Point> {
    let n = segments.max(1);
    (0..=n)
        .map(|i| quadratic_point(p0, c, p2, i as f64 / n as f64))
        .collect()
}

/// Path for an arrow-like curve.
///
/// Two points produce a straight line; three points are read as
/// `[start, control, end]` and produce a quadratic Bézier. Longer inputs are
/// smoothed with [`smooth_path`].
#[must_use]
pub fn curve_path(points: &[Point]) -> String {
    match points {
        [] => String::new(),
        [p] => format!("M{} {}", p.x, p.y),
        [a, b] => format!("M{} {} L{} {}", a.x, a.y, b.x, b.y),
        [a, c, b] => format!("M{} {} Q{} {} {} {}", a.x, a.y, c.x, c.y, b.x, b.y),
        _ => smooth_path(points),
    }
}

/// Freehand path through `points` using quadratic segments between midpoints.
#[must_use]
pub fn smooth_path(points: &[Point]) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    let mut d = format!("M{} {}", first.x, first.y);
    if rest.len() < 2 {
        for p in rest {
            write!(d, " L{} {}", p.x, p.y).unwrap_or_default();
        }
        return d;
    }
    for w in rest.windows(2) {
        let mid = w[0].midpoint(w[1]);
        write!(d, " Q{} {} {} {}", w[0].x, w[0].y, mid.x, mid.y).unwrap_or_default();
    }
    if let Some(last) = rest.last() {
        write!(d, " L{} {}", last.x, last.y).unwrap_or_default();
    }
    d
}

/// Closed polygon path.
#[must_use]
pub fn polygon_path(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let (sep, cmd) = if i == 0 { ("", 'M') } else { (" ", 'L') };
        write!(d, "{sep}{cmd}{} {}", p.x, p.y).unwrap_or_default();
    }
    if !points.is_empty() {
        d.push_str(" Z");
    }
    d
}

/// Closed ellipse path inscribed in `rect`, drawn as two arcs.
#[must_use]
pub fn ellipse_path(rect: &Rect) -> String {
    let c = rect.center();
    let rx = rect.width() / 2.0;
    let ry = rect.height() / 2.0;
    format!(
        "M{} {} A{rx} {ry} 0 1 0 {} {} A{rx} {ry} 0 1 0 {} {} Z",
        c.x - rx,
        c.y,
        c.x + rx,
        c.y,
        c.x - rx,
        c.y
    )
}

// =============================================================
// Hatching
// =============================================================

fn rotate(p: Point, cos: f64, sin: f64) -> Point {
    Point::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}

/// Parallel hatch lines at `angle_deg`, spaced `gap` apart, clipped to a polygon.
///
/// Uses even-odd scanline crossings, so concave polygons produce several
/// segments per scan line.
#[must_use]
pub fn hatch_polygon(polygon: &[Point], angle_deg: f64, gap: f64) -> Vec<(Point, Point)> {
    if polygon.len() < 3 || gap <= 0.0 {
        return Vec::new();
    }
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    // Rotate into a frame where hatch lines are horizontal.
    let local: Vec<Point> = polygon.iter().map(|p| rotate(*p, cos, -sin)).collect();
    let min_y = local.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = local.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let gap = gap.max((max_y - min_y) / HATCH_MAX_LINES);

    let mut lines = Vec::new();
    let mut y = min_y + gap / 2.0;
    while y < max_y {
        let mut xs: Vec<f64> = Vec::new();
        for (i, a) in local.iter().enumerate() {
            let b = local[(i + 1) % local.len()];
            if (a.y <= y && y < b.y) || (b.y <= y && y < a.y) {
                xs.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
        xs.sort_by(f64::total_cmp);
        for pair in xs.chunks_exact(2) {
            if pair[1] > pair[0] {
                lines.push((rotate(Point::new(pair[0], y), cos, sin), rotate(Point::new(pair[1], y), cos, sin)));
            }
        }
        y += gap;
    }
    lines
}

/// Parallel hatch lines at `angle_deg`, spaced `gap` apart, clipped analytically to an ellipse.
#[must_use]
pub fn hatch_ellipse(center: Point, rx: f64, ry: f64, angle_deg: f64, gap: f64) -> Vec<(Point, Point)> {
    if rx <= 0.0 || ry <= 0.0 || gap <= 0.0 {
        return Vec::new();
    }
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (dx, dy) = (cos, sin);
    let (nx, ny) = (-sin, cos);
    // Half extent of the ellipse along the normal direction.
    let h = ((rx * nx).powi(2) + (ry * ny).powi(2)).sqrt();
    let a = dx * dx / (rx * rx) + dy * dy / (ry * ry);
    let gap = gap.max(2.0 * h / HATCH_MAX_LINES);

    let mut lines = Vec::new();
    let mut v = -h + gap / 2.0;
    while v < h {
        let b = 2.0 * v * (dx * nx / (rx * rx) + dy * ny / (ry * ry));
        let c = v * v * (nx * nx / (rx * rx) + ny * ny / (ry * ry)) - 1.0;
        let disc = b * b - 4.0 * a * c;
        if disc > 0.0 {
            let root = disc.sqrt();
            let u1 = (-b - root) / (2.0 * a);
            let u2 = (-b + root) / (2.0 * a);
            let base = Point::new(center.x + v * nx, center.y + v * ny);
            lines.push((base.offset(u1 * dx, u1 * dy), base.offset(u2 * dx, u2 * dy)));
        }
        v += gap;
    }
    lines
}

//! Geometry kernel: distances, containment and bounds.
//!
//! Pure functions over `kurbo` primitives. Nothing here holds state.

use crate::stroke::Stroke;
use kurbo::{Point, Rect, Vec2};

/// Distance from a point to a line segment (a→b).
///
/// A degenerate segment (a == b) falls back to the point-to-point distance.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline.
///
/// Returns `f64::INFINITY` for fewer than two points.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Even-odd (ray casting) containment test over an ordered ring.
///
/// The ring is implicitly closed; it need not repeat its first point.
pub fn point_in_polygon(point: Point, ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (pi, pj) = (ring[i], ring[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Bounding box of a point set. Empty input yields `Rect::ZERO`.
pub fn compute_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |acc, p| {
            acc.union_pt(*p)
        })
}

/// Bounding box over every point of every stroke. Empty input yields `Rect::ZERO`.
pub fn strokes_bounds<'a>(strokes: impl IntoIterator<Item = &'a Stroke>) -> Rect {
    let mut result: Option<Rect> = None;
    for stroke in strokes {
        if stroke.points.is_empty() {
            continue;
        }
        let bounds = compute_bounds(&stroke.points);
        result = Some(match result {
            Some(r) => r.union(bounds),
            None => bounds,
        });
    }
    result.unwrap_or(Rect::ZERO)
}

/// Rect containment where all four edges count as inside.
///
/// `kurbo::Rect::contains` excludes the right and bottom edges; lasso
/// selection needs a closed interval on both axes.
pub fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Axis-aligned rect spanned by two corner points, in either order.
pub fn normalized_rect(a: Point, b: Point) -> Rect {
    Rect::from_points(a, b)
}

/// Sum of consecutive segment lengths. Zero for fewer than two points.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Unit normal of a direction, rotated a quarter turn counter-clockwise
/// in screen space (y down). Zero vectors stay zero.
pub fn unit_normal(dir: Vec2) -> Vec2 {
    let len = dir.hypot();
    if len < f64::EPSILON {
        return Vec2::ZERO;
    }
    Vec2::new(dir.y / len, -dir.x / len)
}

//! Filled polygons derived from closed stroke paths.

use crate::geometry::{compute_bounds, point_in_polygon, rect_contains_inclusive};
use crate::stroke::SerializableColor;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for fill polygons.
pub type FillId = Uuid;

/// A solid region with an optional explicit point ring.
///
/// Fills without a ring are hit-tested against their bounds only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillPolygon {
    pub id: FillId,
    /// Ordered ring; the closing edge back to the first point is implicit.
    #[serde(default)]
    pub points: Vec<Point>,
    pub color: SerializableColor,
    pub bounds: Rect,
}

impl FillPolygon {
    pub fn new(points: Vec<Point>, color: SerializableColor) -> Self {
        let bounds = compute_bounds(&points);
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            bounds,
        }
    }

    /// A rectangular fill with no ring.
    pub fn from_bounds(bounds: Rect, color: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            color,
            bounds: bounds.abs(),
        }
    }

    pub fn has_ring(&self) -> bool {
        self.points.len() >= 3
    }

    /// Polygon containment when a ring exists, bounds containment otherwise.
    pub fn hit_test(&self, point: Point) -> bool {
        if self.has_ring() {
            point_in_polygon(point, &self.points)
        } else {
            rect_contains_inclusive(self.bounds, point)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_hit_test_uses_polygon() {
        let fill = FillPolygon::new(
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(0.0, 100.0)],
            SerializableColor::fill_blue(),
        );
        assert!(fill.hit_test(Point::new(10.0, 10.0)));
        // Inside the bounds but outside the triangle
        assert!(!fill.hit_test(Point::new(90.0, 90.0)));
        assert_eq!(fill.bounds, Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_bounds_only_fill() {
        let fill = FillPolygon::from_bounds(
            Rect::new(50.0, 50.0, 0.0, 0.0),
            SerializableColor::fill_blue(),
        );
        assert!(!fill.has_ring());
        assert!(!fill.hit_test(Point::new(90.0, 90.0)));
        assert!(fill.hit_test(Point::new(25.0, 25.0)));
        assert!(fill.hit_test(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = FillPolygon::from_bounds(Rect::ZERO, SerializableColor::black());
        let b = FillPolygon::from_bounds(Rect::ZERO, SerializableColor::black());
        assert_ne!(a.id, b.id);
    }
}

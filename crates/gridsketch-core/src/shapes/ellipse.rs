//! Ellipse outline approximated by straight segments.

use super::Outline;
use kurbo::{Line, Point, Rect};
use std::f64::consts::TAU;

/// An axis-aligned ellipse inscribed in a drag box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    /// Number of straight segments in the outline.
    pub segments: usize,
}

impl Ellipse {
    pub fn new(center: Point, radius_x: f64, radius_y: f64, segments: usize) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
            segments,
        }
    }

    /// Ellipse filling a bounding rectangle. X and Y radii are independent.
    pub fn from_rect(rect: Rect, segments: usize) -> Self {
        Self::new(rect.center(), rect.width() / 2.0, rect.height() / 2.0, segments)
    }

    /// Outline vertex `i` of `segments`, starting at angle zero (rightmost point).
    fn vertex(&self, i: usize) -> Point {
        let theta = TAU * i as f64 / self.segments as f64;
        Point::new(
            self.center.x + self.radius_x * theta.cos(),
            self.center.y + self.radius_y * theta.sin(),
        )
    }
}

impl Outline for Ellipse {
    fn segments(&self) -> Vec<Line> {
        if self.segments < 3 {
            return Vec::new();
        }
        let vertices: Vec<Point> = (0..self.segments).map(|i| self.vertex(i)).collect();
        (0..self.segments)
            .map(|i| Line::new(vertices[i], vertices[(i + 1) % self.segments]))
            .collect()
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius_x,
            self.center.y - self.radius_y,
            self.center.x + self.radius_x,
            self.center.y + self.radius_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices_lie_on_ellipse() {
        let ellipse = Ellipse::from_rect(Rect::new(0.0, 0.0, 200.0, 100.0), 32);
        let segments = ellipse.segments();
        assert_eq!(segments.len(), 32);
        for seg in &segments {
            let nx = (seg.p0.x - 100.0) / 100.0;
            let ny = (seg.p0.y - 50.0) / 50.0;
            assert!((nx * nx + ny * ny - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_outline_is_closed() {
        let segments = Ellipse::new(Point::ZERO, 30.0, 10.0, 16).segments();
        assert_eq!(segments.last().unwrap().p1, segments[0].p0);
    }

    #[test]
    fn test_independent_radii() {
        let ellipse = Ellipse::from_rect(Rect::new(0.0, 0.0, 80.0, 20.0), 16);
        assert_eq!(ellipse.radius_x, 40.0);
        assert_eq!(ellipse.radius_y, 10.0);
        assert_eq!(ellipse.bounds(), Rect::new(0.0, 0.0, 80.0, 20.0));
    }
}

//! Rectangle outline.

use super::Outline;
use kurbo::{Line, Point, Rect};

/// An axis-aligned box drawn as four independent sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub rect: Rect,
}

impl Rectangle {
    /// Create from two opposite corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            rect: Rect::from_points(a, b),
        }
    }

    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    pub fn height(&self) -> f64 {
        self.rect.height()
    }
}

impl Outline for Rectangle {
    /// Top, right, bottom, left.
    fn segments(&self) -> Vec<Line> {
        let Rect { x0, y0, x1, y1 } = self.rect;
        vec![
            Line::new((x0, y0), (x1, y0)),
            Line::new((x1, y0), (x1, y1)),
            Line::new((x1, y1), (x0, y1)),
            Line::new((x0, y1), (x0, y0)),
        ]
    }

    fn bounds(&self) -> Rect {
        self.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides_are_ordered_and_closed() {
        let rect = Rectangle::from_corners(Point::new(100.0, 50.0), Point::new(0.0, 0.0));
        let sides = rect.segments();
        assert_eq!(sides.len(), 4);
        assert_eq!(sides[0].p0, Point::new(0.0, 0.0));
        assert_eq!(sides[0].p1, Point::new(100.0, 0.0));
        assert_eq!(sides[1].p1, Point::new(100.0, 50.0));
        assert_eq!(sides[2].p1, Point::new(0.0, 50.0));
        for i in 0..4 {
            assert_eq!(sides[i].p1, sides[(i + 1) % 4].p0);
        }
    }

    #[test]
    fn test_dimensions() {
        let rect = Rectangle::from_corners(Point::new(10.0, 20.0), Point::new(50.0, 80.0));
        assert_eq!(rect.width(), 40.0);
        assert_eq!(rect.height(), 60.0);
    }
}

//! Isosceles triangle outline.

use super::Outline;
use kurbo::{Line, Point, Rect};

/// Apex at the top-centre of the box, base along its bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub rect: Rect,
}

impl Triangle {
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            rect: Rect::from_points(a, b),
        }
    }

    pub fn apex(&self) -> Point {
        Point::new(self.rect.center().x, self.rect.y0)
    }

    pub fn base_left(&self) -> Point {
        Point::new(self.rect.x0, self.rect.y1)
    }

    pub fn base_right(&self) -> Point {
        Point::new(self.rect.x1, self.rect.y1)
    }
}

impl Outline for Triangle {
    fn segments(&self) -> Vec<Line> {
        let (apex, right, left) = (self.apex(), self.base_right(), self.base_left());
        vec![
            Line::new(apex, right),
            Line::new(right, left),
            Line::new(left, apex),
        ]
    }

    fn bounds(&self) -> Rect {
        self.rect
    }
}

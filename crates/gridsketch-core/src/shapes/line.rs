//! Two-point straight line.

use super::Outline;
use kurbo::{Line as KurboLine, Point, Rect};

/// A single straight segment placed by two clicks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Both clicks landed on the same point.
    pub fn is_degenerate(&self) -> bool {
        self.length() < f64::EPSILON
    }
}

impl Outline for Line {
    fn segments(&self) -> Vec<KurboLine> {
        if self.is_degenerate() {
            return Vec::new();
        }
        vec![KurboLine::new(self.start, self.end)]
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}

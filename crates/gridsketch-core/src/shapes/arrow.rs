//! Arrow outline: a body plus an open two-stroke head.

use super::Outline;
use kurbo::{Line, Point, Rect, Vec2};
use std::f64::consts::FRAC_PI_6;

/// An arrow from `start` to `end` with an open head at `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub start: Point,
    pub end: Point,
    /// Length of each head stroke.
    pub head_size: f64,
}

impl Arrow {
    pub fn new(start: Point, end: Point, head_size: f64) -> Self {
        Self {
            start,
            end,
            head_size,
        }
    }

    /// Arrow sized from its drag box.
    ///
    /// The head is `ratio` of the box's smaller side. An axis-aligned drag
    /// has a zero-width box, so it falls back to the larger side.
    pub fn from_drag(start: Point, end: Point, ratio: f64) -> Self {
        let (w, h) = ((end.x - start.x).abs(), (end.y - start.y).abs());
        let smaller = w.min(h);
        let basis = if smaller > f64::EPSILON { smaller } else { w.max(h) };
        Self::new(start, end, basis * ratio)
    }

    /// Unit vector from start to end, or `None` for a zero-length body.
    pub fn direction(&self) -> Option<Vec2> {
        let dir = self.end - self.start;
        let len = dir.hypot();
        (len > f64::EPSILON).then(|| dir / len)
    }

    /// The two head stroke tips, at ±30° from the reversed body direction.
    pub fn head_tips(&self) -> Option<(Point, Point)> {
        if self.head_size <= f64::EPSILON {
            return None;
        }
        let back = -self.direction()?;
        let rotate = |v: Vec2, angle: f64| {
            let (sin, cos) = angle.sin_cos();
            Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
        };
        Some((
            self.end + rotate(back, FRAC_PI_6) * self.head_size,
            self.end + rotate(back, -FRAC_PI_6) * self.head_size,
        ))
    }
}

impl Outline for Arrow {
    /// Body first, then the two head strokes.
    fn segments(&self) -> Vec<Line> {
        let mut segments = vec![Line::new(self.start, self.end)];
        if let Some((left, right)) = self.head_tips() {
            segments.push(Line::new(self.end, left));
            segments.push(Line::new(self.end, right));
        }
        segments
    }

    fn bounds(&self) -> Rect {
        self.segments()
            .iter()
            .fold(Rect::from_points(self.start, self.end), |acc, seg| {
                acc.union_pt(seg.p1)
            })
    }
}

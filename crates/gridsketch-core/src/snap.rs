//! Stroke straightening: turns a freehand stroke into a grid-aligned segment.

use crate::grid::{snap_point_to_grid, snap_to_grid};
use crate::stroke::Stroke;
use kurbo::Point;
use std::time::Duration;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Quadrant of a diagonal snap, in screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagonalQuadrant {
    /// Angle in (0°, 90°).
    DownRight,
    /// Angle in (90°, 180°).
    DownLeft,
    /// Angle in (-90°, 0°).
    UpRight,
    /// Angle in (-180°, -90°).
    UpLeft,
}

impl DiagonalQuadrant {
    /// Quadrant for an angle in (-180°, 180°], excluding the axes.
    fn from_angle(angle_deg: f64) -> Self {
        match (angle_deg >= 0.0, angle_deg.abs() < 90.0) {
            (true, true) => DiagonalQuadrant::DownRight,
            (true, false) => DiagonalQuadrant::DownLeft,
            (false, true) => DiagonalQuadrant::UpRight,
            (false, false) => DiagonalQuadrant::UpLeft,
        }
    }

    /// Unit steps along x and y.
    pub fn signs(self) -> (f64, f64) {
        match self {
            DiagonalQuadrant::DownRight => (1.0, 1.0),
            DiagonalQuadrant::DownLeft => (-1.0, 1.0),
            DiagonalQuadrant::UpRight => (1.0, -1.0),
            DiagonalQuadrant::UpLeft => (-1.0, -1.0),
        }
    }
}

/// Direction bucket a stroke was snapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapDirection {
    Horizontal,
    Vertical,
    Diagonal(DiagonalQuadrant),
    /// No directional constraint; endpoints snapped independently.
    Free,
}

/// Angle from `start` to `end` in degrees, range (-180, 180].
pub fn segment_angle(start: Point, end: Point) -> f64 {
    let angle = (end.y - start.y).atan2(end.x - start.x).to_degrees();
    // atan2 yields -180 for (-x, -0.0); fold it onto +180
    if angle <= -180.0 { angle + 360.0 } else { angle }
}

/// Classify an angle into a direction bucket.
///
/// Buckets are checked horizontal, vertical, diagonal. With a tolerance
/// below 22.5° they never overlap, so the order only matters for
/// configurations that were not validated.
pub fn classify_angle(angle_deg: f64, tolerance_deg: f64) -> SnapDirection {
    let a = angle_deg.abs();
    if a <= tolerance_deg || a >= 180.0 - tolerance_deg {
        SnapDirection::Horizontal
    } else if (a - 90.0).abs() <= tolerance_deg {
        SnapDirection::Vertical
    } else if (a - 45.0).abs() <= tolerance_deg || (a - 135.0).abs() <= tolerance_deg {
        SnapDirection::Diagonal(DiagonalQuadrant::from_angle(angle_deg))
    } else {
        SnapDirection::Free
    }
}

/// Snap a pair of endpoints according to their direction bucket.
pub fn snap_endpoints(
    start: Point,
    end: Point,
    pitch: f64,
    tolerance_deg: f64,
) -> (Point, Point, SnapDirection) {
    let direction = if start == end {
        SnapDirection::Horizontal
    } else {
        classify_angle(segment_angle(start, end), tolerance_deg)
    };

    let (a, b) = match direction {
        SnapDirection::Horizontal => {
            let y = snap_to_grid((start.y + end.y) / 2.0, pitch);
            (
                Point::new(snap_to_grid(start.x, pitch), y),
                Point::new(snap_to_grid(end.x, pitch), y),
            )
        }
        SnapDirection::Vertical => {
            let x = snap_to_grid((start.x + end.x) / 2.0, pitch);
            (
                Point::new(x, snap_to_grid(start.y, pitch)),
                Point::new(x, snap_to_grid(end.y, pitch)),
            )
        }
        SnapDirection::Diagonal(quadrant) => {
            let a = snap_point_to_grid(start, pitch);
            let dominant = (end.x - start.x).abs().max((end.y - start.y).abs());
            let d = snap_to_grid(dominant, pitch);
            let (sx, sy) = quadrant.signs();
            (a, Point::new(a.x + sx * d, a.y + sy * d))
        }
        SnapDirection::Free => (snap_point_to_grid(start, pitch), snap_point_to_grid(end, pitch)),
    };
    (a, b, direction)
}

/// Straighten a stroke in place.
///
/// Only the first and last points are considered. Returns `None` without
/// touching the stroke when it is already snapped or has fewer than two
/// points.
pub fn snap_stroke(stroke: &mut Stroke, pitch: f64, tolerance_deg: f64) -> Option<SnapDirection> {
    if stroke.snapped || !stroke.is_segmentable() {
        return None;
    }
    let (start, end) = (stroke.first()?, stroke.last()?);
    let (a, b, direction) = snap_endpoints(start, end, pitch, tolerance_deg);
    stroke.points = vec![a, b];
    stroke.snapped = true;
    log::debug!("snapped stroke {:?}: {:?} -> {:?}", direction, a, b);
    Some(direction)
}

/// Debounce deadline for the idle snap.
///
/// Re-arming replaces the previous deadline, so at most one commit is ever
/// pending. The timer does nothing on its own; the owner polls [`is_due`].
///
/// [`is_due`]: SnapTimer::is_due
#[derive(Debug, Clone)]
pub struct SnapTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl SnapTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// Arm (or re-arm) relative to `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True once the deadline has passed.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    /// Disarm and report whether the deadline had passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

//! Stroke length measurement and label placement.
//!
//! One grid pitch is one foot.

use crate::geometry::{polyline_length, unit_normal};
use crate::stroke::Stroke;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

const INCHES_PER_FOOT: f64 = 12.0;

/// Length of a point sequence in grid units ("feet").
///
/// Zero for fewer than two points or a non-positive pitch.
pub fn stroke_length_units(points: &[Point], pitch: f64) -> f64 {
    if !(pitch.is_finite() && pitch > 0.0) {
        return 0.0;
    }
    polyline_length(points) / pitch
}

/// Format a length in feet as `I"` below one foot and `F' I"` otherwise.
///
/// Below one foot the whole length is rounded to inches, so `0.99` reads
/// `12"`. From one foot up the inch term is dropped when it rounds to zero,
/// and twelve rounded inches carry into the next foot.
pub fn format_measurement(units: f64) -> String {
    let units = if units.is_finite() { units.abs() } else { 0.0 };
    if units < 1.0 {
        return format!("{}\"", (units * INCHES_PER_FOOT).round() as u64);
    }
    let mut feet = units.floor();
    let mut inches = ((units - feet) * INCHES_PER_FOOT).round();
    if inches >= INCHES_PER_FOOT {
        feet += 1.0;
        inches = 0.0;
    }
    match (feet as u64, inches as u64) {
        (feet, 0) => format!("{feet}'"),
        (feet, inches) => format!("{feet}' {inches}\""),
    }
}

/// Text and placement for a length label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementLabel {
    pub text: String,
    /// Label centre in world coordinates.
    pub anchor: Point,
    /// Text rotation in degrees, within (-90, 90] so it never reads upside down.
    pub rotation_deg: f64,
    /// Length in grid units.
    pub units: f64,
}

/// Fold an angle in degrees into (-90, 90].
pub fn readable_rotation(angle_deg: f64) -> f64 {
    let mut r = angle_deg % 360.0;
    if r > 180.0 {
        r -= 360.0;
    } else if r <= -180.0 {
        r += 360.0;
    }
    if r > 90.0 {
        r -= 180.0;
    } else if r <= -90.0 {
        r += 180.0;
    }
    r
}

impl MeasurementLabel {
    /// Label for a stroke, or `None` if it has fewer than two points.
    ///
    /// The anchor sits at the midpoint of the first and last point, pushed
    /// `offset_px` screen pixels along the normal on the upper side of the
    /// text baseline.
    pub fn for_stroke(stroke: &Stroke, pitch: f64, offset_px: f64, zoom: f64) -> Option<Self> {
        if !stroke.is_segmentable() {
            return None;
        }
        let (first, last) = (stroke.first()?, stroke.last()?);
        let units = stroke_length_units(&stroke.points, pitch);
        let delta = last - first;
        let rotation_deg = readable_rotation(delta.y.atan2(delta.x).to_degrees());
        let baseline = Vec2::from_angle(rotation_deg.to_radians());
        let offset = if zoom > 0.0 { offset_px / zoom } else { offset_px };
        Some(Self {
            text: format_measurement(units),
            anchor: first.midpoint(last) + unit_normal(baseline) * offset,
            rotation_deg,
            units,
        })
    }
}

/// Labels for every measurable stroke, paired with its index.
pub fn measure_strokes(
    strokes: &[Stroke],
    pitch: f64,
    offset_px: f64,
    zoom: f64,
) -> Vec<(usize, MeasurementLabel)> {
    strokes
        .iter()
        .enumerate()
        .filter_map(|(i, s)| MeasurementLabel::for_stroke(s, pitch, offset_px, zoom).map(|l| (i, l)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::StrokeStyle;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Stroke {
        Stroke::segment(Point::new(x0, y0), Point::new(x1, y1), StrokeStyle::default())
    }

    #[test]
    fn test_format_known_lengths() {
        assert_eq!(format_measurement(37.5 / 25.0), "1' 6\"");
        assert_eq!(format_measurement(10.0 / 25.0), "5\"");
        assert_eq!(format_measurement(2.0), "2'");
        assert_eq!(format_measurement(0.0), "0\"");
    }

    #[test]
    fn test_inches_carry_into_feet() {
        assert_eq!(format_measurement(1.99), "2'");
        assert_eq!(format_measurement(2.97), "3'");
    }

    #[test]
    fn test_under_one_foot_stays_in_inches() {
        assert_eq!(format_measurement(0.99), "12\"");
        assert_eq!(format_measurement(0.96), "12\"");
        assert_eq!(format_measurement(-0.5), "6\"");
    }

    #[test]
    fn test_length_units() {
        let stroke = seg(0.0, 0.0, 37.5, 0.0);
        assert!((stroke_length_units(&stroke.points, 25.0) - 1.5).abs() < 1e-12);
        assert_eq!(stroke_length_units(&[Point::ZERO], 25.0), 0.0);
        assert_eq!(stroke_length_units(&stroke.points, 0.0), 0.0);
    }

    #[test]
    fn test_multi_segment_length() {
        let stroke = Stroke::from_points(
            vec![Point::new(0.0, 0.0), Point::new(25.0, 0.0), Point::new(25.0, 25.0)],
            StrokeStyle::default(),
        );
        let label = MeasurementLabel::for_stroke(&stroke, 25.0, 14.0, 1.0).unwrap();
        assert_eq!(label.text, "2'");
    }

    #[test]
    fn test_label_anchor_above_horizontal_stroke() {
        for stroke in [seg(0.0, 0.0, 100.0, 0.0), seg(100.0, 0.0, 0.0, 0.0)] {
            let label = MeasurementLabel::for_stroke(&stroke, 25.0, 14.0, 1.0).unwrap();
            assert!((label.anchor.x - 50.0).abs() < 1e-9);
            assert!((label.anchor.y + 14.0).abs() < 1e-9);
            assert!(label.rotation_deg.abs() < 1e-9);
        }
    }

    #[test]
    fn test_label_offset_scales_with_zoom() {
        let stroke = seg(0.0, 0.0, 100.0, 0.0);
        let label = MeasurementLabel::for_stroke(&stroke, 25.0, 14.0, 2.0).unwrap();
        assert!((label.anchor.y + 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_stays_readable() {
        assert!((readable_rotation(135.0) + 45.0).abs() < 1e-9);
        assert!((readable_rotation(-135.0) - 45.0).abs() < 1e-9);
        assert!((readable_rotation(90.0) - 90.0).abs() < 1e-9);
        assert!((readable_rotation(-90.0) - 90.0).abs() < 1e-9);
        assert!((readable_rotation(180.0)).abs() < 1e-9);
    }

    #[test]
    fn test_short_strokes_not_measured() {
        let strokes = vec![
            Stroke::begin(Point::ZERO, StrokeStyle::default()),
            seg(0.0, 0.0, 25.0, 0.0),
        ];
        let labels = measure_strokes(&strokes, 25.0, 14.0, 1.0);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].0, 1);
        assert_eq!(labels[0].1.text, "1'");
    }
}

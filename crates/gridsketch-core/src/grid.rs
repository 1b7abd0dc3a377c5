//! Grid quantization.

use kurbo::Point;

/// Default grid pitch in world units. One pitch is one measurement foot.
pub const GRID_PITCH: f64 = 25.0;

/// Round a coordinate to the nearest multiple of `pitch`.
///
/// A non-finite or non-positive pitch, or a non-finite value, is returned
/// unchanged.
pub fn snap_to_grid(value: f64, pitch: f64) -> f64 {
    if !value.is_finite() || !pitch.is_finite() || pitch <= 0.0 {
        return value;
    }
    let snapped = (value / pitch).round() * pitch;
    // -0.0 would otherwise leak into JSON and equality checks
    if snapped == 0.0 { 0.0 } else { snapped }
}

/// Snap both coordinates of a point independently.
pub fn snap_point_to_grid(point: Point, pitch: f64) -> Point {
    Point::new(snap_to_grid(point.x, pitch), snap_to_grid(point.y, pitch))
}

/// Whether a value already lies on a grid line.
pub fn is_on_grid(value: f64, pitch: f64) -> bool {
    (snap_to_grid(value, pitch) - value).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(23.0, 25.0), 25.0);
        assert_eq!(snap_to_grid(12.0, 25.0), 0.0);
        assert_eq!(snap_to_grid(37.5, 25.0), 50.0);
        assert_eq!(snap_to_grid(-13.0, 25.0), -25.0);
    }

    #[test]
    fn test_snap_to_grid_no_negative_zero() {
        let snapped = snap_to_grid(-3.0, 25.0);
        assert_eq!(snapped, 0.0);
        assert!(snapped.is_sign_positive());
    }

    #[test]
    fn test_snap_to_grid_idempotent_and_aligned() {
        for i in -200..200 {
            let x = i as f64 * 1.37 + 0.11;
            let once = snap_to_grid(x, GRID_PITCH);
            assert_eq!(snap_to_grid(once, GRID_PITCH), once);
            assert!((once % GRID_PITCH).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_pitch_is_identity() {
        assert_eq!(snap_to_grid(13.0, 0.0), 13.0);
        assert_eq!(snap_to_grid(13.0, -5.0), 13.0);
        assert_eq!(snap_to_grid(13.0, f64::NAN), 13.0);
    }

    #[test]
    fn test_snap_point() {
        let p = snap_point_to_grid(Point::new(31.0, 51.0), 20.0);
        assert_eq!(p, Point::new(40.0, 60.0));
        assert!(is_on_grid(p.x, 20.0));
    }
}

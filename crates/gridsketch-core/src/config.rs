//! Engine configuration.

use crate::grid::GRID_PITCH;
use crate::stroke::{SerializableColor, StrokeStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Widest angular tolerance that keeps the snap buckets disjoint.
pub const MAX_ANGLE_TOLERANCE_DEG: f64 = 22.5;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for snapping, hit-testing, shape construction and measurement.
///
/// Distances suffixed `_px` or described as screen pixels are divided by the
/// viewport zoom before use; everything else is in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid spacing; also the length of one measurement foot.
    pub grid_pitch: f64,
    /// Stroke hit distance in screen pixels.
    pub hit_threshold: f64,
    /// Endpoint handle hit radius in screen pixels.
    pub handle_radius: f64,
    /// Pointer-idle interval before a freehand stroke is straightened.
    pub snap_delay_ms: u64,
    /// Half-width of each direction bucket, in degrees.
    pub angle_tolerance_deg: f64,
    /// Run the snap routine on pointer-up as well as on idle.
    pub snap_on_release: bool,
    /// Quantize shape construction anchors to the grid.
    pub snap_shapes_to_grid: bool,
    /// Segments used to approximate an ellipse.
    pub ellipse_segments: usize,
    /// Arrow head length relative to min(|dx|, |dy|) of the drag.
    pub arrow_head_ratio: f64,
    /// Drags smaller than this on both axes are discarded.
    pub min_shape_size: f64,
    /// Endpoint joining tolerance for closed-path detection.
    pub closed_path_tolerance: f64,
    /// Traversal budget per seed stroke.
    pub closed_path_max_steps: usize,
    /// Measurement label offset from the stroke, in screen pixels.
    pub label_offset_px: f64,
    /// Default stroke width.
    pub stroke_width: f64,
    /// Default stroke color.
    pub stroke_color: SerializableColor,
    /// Default fill for synthesized polygons.
    pub fill_color: SerializableColor,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_pitch: GRID_PITCH,
            hit_threshold: 10.0,
            handle_radius: 11.0,
            snap_delay_ms: 500,
            angle_tolerance_deg: 15.0,
            snap_on_release: false,
            snap_shapes_to_grid: true,
            ellipse_segments: 32,
            arrow_head_ratio: 0.3,
            min_shape_size: 5.0,
            closed_path_tolerance: 10.0,
            closed_path_max_steps: 50,
            label_offset_px: 14.0,
            stroke_width: 4.0,
            stroke_color: SerializableColor::black(),
            fill_color: SerializableColor::fill_blue(),
        }
    }
}

impl EngineConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Clamp out-of-range values into something the engine can use.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if !(self.grid_pitch.is_finite() && self.grid_pitch > 0.0) {
            log::warn!("grid_pitch {} is invalid, using {}", self.grid_pitch, defaults.grid_pitch);
            self.grid_pitch = defaults.grid_pitch;
        }
        if !(self.angle_tolerance_deg.is_finite() && self.angle_tolerance_deg >= 0.0) {
            self.angle_tolerance_deg = defaults.angle_tolerance_deg;
        }
        // Buckets at 0/45/90/135 would overlap past 22.5 degrees
        if self.angle_tolerance_deg >= MAX_ANGLE_TOLERANCE_DEG {
            log::warn!(
                "angle_tolerance_deg {} overlaps neighbouring buckets, clamping",
                self.angle_tolerance_deg
            );
            self.angle_tolerance_deg = MAX_ANGLE_TOLERANCE_DEG - 0.5;
        }
        self.ellipse_segments = self.ellipse_segments.clamp(16, 32);
        if !(self.closed_path_tolerance.is_finite() && self.closed_path_tolerance > 0.0) {
            self.closed_path_tolerance = defaults.closed_path_tolerance;
        }
        if self.closed_path_max_steps == 0 {
            self.closed_path_max_steps = defaults.closed_path_max_steps;
        }
        self.hit_threshold = self.hit_threshold.max(0.0);
        self.handle_radius = self.handle_radius.max(0.0);
        self.min_shape_size = self.min_shape_size.max(0.0);
        self.arrow_head_ratio = self.arrow_head_ratio.clamp(0.0, 1.0);
        self
    }

    pub fn snap_delay(&self) -> Duration {
        Duration::from_millis(self.snap_delay_ms)
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.stroke_color,
            width: self.stroke_width,
        }
    }
}

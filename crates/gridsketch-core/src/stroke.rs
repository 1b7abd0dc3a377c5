//! Stroke and color definitions.

use crate::geometry::{compute_bounds, polyline_length};
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Default fill for shapes synthesized from closed paths.
    pub fn fill_blue() -> Self {
        Self::new(66, 133, 244, 96)
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Color and width applied to newly created strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: SerializableColor,
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 4.0,
        }
    }
}

/// Which end of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// The opposite end.
    pub fn other(self) -> Self {
        match self {
            Endpoint::Start => Endpoint::End,
            Endpoint::End => Endpoint::Start,
        }
    }
}

/// A drawn polyline or straight segment.
///
/// While a freehand gesture is live, points are appended in place. Once
/// `snapped` is set the stroke holds exactly its two endpoints and further
/// appends are refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    /// Points in world coordinates. Also read from a flat `[x, y, x, y, ..]` array.
    #[serde(deserialize_with = "points_paired_or_flat")]
    pub points: Vec<Point>,
    /// Stroke color.
    #[serde(default)]
    pub color: SerializableColor,
    /// Stroke width in world units.
    #[serde(alias = "strokeWidth")]
    pub width: f64,
    /// Finalized straight segment.
    #[serde(default, alias = "isSnapped")]
    pub snapped: bool,
}

fn points_paired_or_flat<'de, D>(deserializer: D) -> Result<Vec<Point>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Points {
        Paired(Vec<Point>),
        Flat(Vec<f64>),
    }
    match Points::deserialize(deserializer)? {
        Points::Paired(points) => Ok(points),
        Points::Flat(coords) => {
            if coords.len() % 2 != 0 {
                return Err(serde::de::Error::custom(format!(
                    "flat point array has odd length {}",
                    coords.len()
                )));
            }
            Ok(coords
                .chunks_exact(2)
                .map(|xy| Point::new(xy[0], xy[1]))
                .collect())
        }
    }
}

impl Stroke {
    /// Start a new freehand stroke at a single point.
    pub fn begin(point: Point, style: StrokeStyle) -> Self {
        Self {
            points: vec![point],
            color: style.color,
            width: style.width,
            snapped: false,
        }
    }

    /// Create a finalized two-point segment.
    pub fn segment(start: Point, end: Point, style: StrokeStyle) -> Self {
        Self {
            points: vec![start, end],
            color: style.color,
            width: style.width,
            snapped: true,
        }
    }

    /// Create an unsnapped stroke from existing points.
    pub fn from_points(points: Vec<Point>, style: StrokeStyle) -> Self {
        Self {
            points,
            color: style.color,
            width: style.width,
            snapped: false,
        }
    }

    /// Append a point. Returns false if the stroke is already snapped.
    pub fn push_point(&mut self, point: Point) -> bool {
        if self.snapped {
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Position of an endpoint, if the stroke has any points.
    pub fn endpoint(&self, which: Endpoint) -> Option<Point> {
        match which {
            Endpoint::Start => self.first(),
            Endpoint::End => self.last(),
        }
    }

    /// Rewrite one endpoint in place, leaving interior points untouched.
    pub fn set_endpoint(&mut self, which: Endpoint, point: Point) {
        let slot = match which {
            Endpoint::Start => self.points.first_mut(),
            Endpoint::End => self.points.last_mut(),
        };
        if let Some(p) = slot {
            *p = point;
        }
    }

    /// Strokes with fewer than two points take no part in snapping,
    /// measurement or hit-testing.
    pub fn is_segmentable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Move every point by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    /// Total length in world units.
    pub fn length(&self) -> f64 {
        polyline_length(&self.points)
    }

    pub fn bounds(&self) -> Rect {
        compute_bounds(&self.points)
    }

    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            width: self.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapped_stroke_refuses_points() {
        let mut stroke = Stroke::segment(Point::ZERO, Point::new(10.0, 0.0), StrokeStyle::default());
        assert!(!stroke.push_point(Point::new(20.0, 0.0)));
        assert_eq!(stroke.points.len(), 2);
    }

    #[test]
    fn test_set_endpoint_keeps_interior() {
        let mut stroke = Stroke::from_points(
            vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 0.0)],
            StrokeStyle::default(),
        );
        stroke.set_endpoint(Endpoint::End, Point::new(20.0, 0.0));
        assert_eq!(stroke.points[1], Point::new(5.0, 5.0));
        assert_eq!(stroke.points[2], Point::new(20.0, 0.0));
        assert_eq!(stroke.points[0], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_translate() {
        let mut stroke = Stroke::segment(Point::ZERO, Point::new(10.0, 0.0), StrokeStyle::default());
        stroke.translate(Vec2::new(5.0, -5.0));
        assert_eq!(stroke.points, vec![Point::new(5.0, -5.0), Point::new(15.0, -5.0)]);
    }

    #[test]
    fn test_json_field_names() {
        let stroke = Stroke::segment(Point::ZERO, Point::new(1.0, 2.0), StrokeStyle::default());
        let json = serde_json::to_value(&stroke).unwrap();
        assert!(json.get("points").is_some());
        assert!(json.get("snapped").is_some());
        assert!(json.get("width").is_some());
    }

    #[test]
    fn test_reads_flat_points_and_legacy_keys() {
        let json = r#"{"points": [0, 0, 40, 2, 100, 0], "stroke": "black",
            "strokeWidth": 4, "isSnapped": true}"#;
        let stroke: Stroke = serde_json::from_str(json).unwrap();
        assert_eq!(
            stroke.points,
            vec![Point::new(0.0, 0.0), Point::new(40.0, 2.0), Point::new(100.0, 0.0)]
        );
        assert_eq!(stroke.width, 4.0);
        assert!(stroke.snapped);
        assert_eq!(stroke.color, SerializableColor::black());

        let odd = r#"{"points": [0, 0, 40], "width": 4}"#;
        assert!(serde_json::from_str::<Stroke>(odd).is_err());
    }

    #[test]
    fn test_paired_points_still_read() {
        let stroke = Stroke::segment(Point::ZERO, Point::new(1.0, 2.0), StrokeStyle::default());
        let json = serde_json::to_string(&stroke).unwrap();
        assert_eq!(serde_json::from_str::<Stroke>(&json).unwrap(), stroke);
    }

    #[test]
    fn test_color_roundtrip_through_peniko() {
        let color = SerializableColor::new(10, 20, 30, 40);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }
}

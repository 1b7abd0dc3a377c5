//! Parametric shape construction.
//!
//! Every shape is emitted as independent two-point strokes so each side can
//! be selected, measured and deleted on its own.

mod arrow;
mod ellipse;
mod line;
mod rectangle;
mod triangle;

pub use arrow::Arrow;
pub use ellipse::Ellipse;
pub use line::Line;
pub use rectangle::Rectangle;
pub use triangle::Triangle;

use crate::config::EngineConfig;
use crate::grid::snap_point_to_grid;
use crate::stroke::{Stroke, StrokeStyle};
use kurbo::{Line as KurboLine, Point, Rect};
use serde::{Deserialize, Serialize};

/// Geometry that decomposes into straight segments.
pub trait Outline {
    /// The outline as independent segments.
    fn segments(&self) -> Vec<KurboLine>;

    /// Bounding box in world coordinates.
    fn bounds(&self) -> Rect;
}

/// Kinds of parametric shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Triangle,
    Arrow,
    /// Click-click straight line rather than a drag.
    Line,
}

impl ShapeKind {
    /// Whether the shape is placed by dragging a bounding box.
    pub fn is_drag_shape(self) -> bool {
        !matches!(self, ShapeKind::Line)
    }
}

/// A concrete shape built from two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Triangle(Triangle),
    Arrow(Arrow),
    Line(Line),
}

impl Shape {
    /// Build the shape spanned by `start` and `end`.
    pub fn from_points(kind: ShapeKind, start: Point, end: Point, config: &EngineConfig) -> Self {
        match kind {
            ShapeKind::Rectangle => Shape::Rectangle(Rectangle::from_corners(start, end)),
            ShapeKind::Ellipse => Shape::Ellipse(Ellipse::from_rect(
                Rect::from_points(start, end),
                config.ellipse_segments,
            )),
            ShapeKind::Triangle => Shape::Triangle(Triangle::from_corners(start, end)),
            ShapeKind::Arrow => Shape::Arrow(Arrow::from_drag(start, end, config.arrow_head_ratio)),
            ShapeKind::Line => Shape::Line(Line::new(start, end)),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Triangle(_) => ShapeKind::Triangle,
            Shape::Arrow(_) => ShapeKind::Arrow,
            Shape::Line(_) => ShapeKind::Line,
        }
    }

    pub fn segments(&self) -> Vec<KurboLine> {
        match self {
            Shape::Rectangle(s) => s.segments(),
            Shape::Ellipse(s) => s.segments(),
            Shape::Triangle(s) => s.segments(),
            Shape::Arrow(s) => s.segments(),
            Shape::Line(s) => s.segments(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Triangle(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
        }
    }

    /// Decompose into finalized two-point strokes.
    pub fn to_strokes(&self, style: StrokeStyle) -> Vec<Stroke> {
        self.segments()
            .into_iter()
            .filter(|seg| seg.p0 != seg.p1)
            .map(|seg| Stroke::segment(seg.p0, seg.p1, style))
            .collect()
    }
}

/// True when a drag is too small on both axes to be intentional.
pub fn is_accidental_drag(start: Point, end: Point, min_size: f64) -> bool {
    (end.x - start.x).abs() < min_size && (end.y - start.y).abs() < min_size
}

/// Build the strokes for a shape gesture.
///
/// Drag shapes below the minimum size on both axes, and lines whose two
/// clicks coincide, produce nothing. The size guard looks at the raw
/// pointer positions and is applied again after grid quantization (if
/// enabled), so a drag that collapses onto one grid point is dropped too.
pub fn construct(
    kind: ShapeKind,
    start: Point,
    end: Point,
    style: StrokeStyle,
    config: &EngineConfig,
) -> Vec<Stroke> {
    if kind.is_drag_shape() && is_accidental_drag(start, end, config.min_shape_size) {
        log::debug!("discarding accidental {:?} drag", kind);
        return Vec::new();
    }
    let (start, end) = if config.snap_shapes_to_grid {
        (
            snap_point_to_grid(start, config.grid_pitch),
            snap_point_to_grid(end, config.grid_pitch),
        )
    } else {
        (start, end)
    };
    if kind.is_drag_shape() && is_accidental_drag(start, end, config.min_shape_size) {
        log::debug!("discarding {:?} drag collapsed by grid snapping", kind);
        return Vec::new();
    }
    Shape::from_points(kind, start, end, config).to_strokes(style)
}

/// A shape being dragged out, before it becomes strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempShape {
    pub kind: ShapeKind,
    pub anchor: Point,
    pub current: Point,
}

impl TempShape {
    pub fn new(kind: ShapeKind, anchor: Point) -> Self {
        Self {
            kind,
            anchor,
            current: anchor,
        }
    }

    pub fn update(&mut self, point: Point) {
        self.current = point;
    }

    /// Strokes the shape would produce if released now.
    pub fn preview(&self, style: StrokeStyle, config: &EngineConfig) -> Vec<Stroke> {
        construct(self.kind, self.anchor, self.current, style, config)
    }

    /// Finish the gesture.
    pub fn finish(self, style: StrokeStyle, config: &EngineConfig) -> Vec<Stroke> {
        self.preview(style, config)
    }
}

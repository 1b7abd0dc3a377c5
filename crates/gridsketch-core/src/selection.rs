//! Hit-testing, lasso selection and endpoint handles.

use crate::fill::FillPolygon;
use crate::geometry::{point_to_polyline_dist, rect_contains_inclusive};
use crate::stroke::{Endpoint, Stroke};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Index of the topmost stroke within `threshold` of `point`.
///
/// Strokes are scanned from last drawn to first, so on overlap the one drawn
/// later wins. Strokes with fewer than two points are never hit.
pub fn find_stroke_at(strokes: &[Stroke], point: Point, threshold: f64) -> Option<usize> {
    strokes
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, s)| s.is_segmentable())
        .find(|(_, s)| point_to_polyline_dist(point, &s.points) < threshold)
        .map(|(i, _)| i)
}

/// Index of the topmost fill containing `point`.
pub fn find_fill_at(fills: &[FillPolygon], point: Point) -> Option<usize> {
    fills
        .iter()
        .enumerate()
        .rev()
        .find(|(_, f)| f.hit_test(point))
        .map(|(i, _)| i)
}

/// Indices of every stroke with at least one point inside `rect`.
///
/// Touching is enough; the stroke need not be fully enclosed. Edges count as
/// inside.
pub fn strokes_in_rect(strokes: &[Stroke], rect: Rect) -> BTreeSet<usize> {
    strokes
        .iter()
        .enumerate()
        .filter(|(_, s)| s.points.iter().any(|p| rect_contains_inclusive(rect, *p)))
        .map(|(i, _)| i)
        .collect()
}

/// Something that can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionTarget {
    Stroke(usize),
    Fill(usize),
}

/// Currently selected strokes and fills, by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub strokes: BTreeSet<usize>,
    pub fills: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.fills.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strokes.len() + self.fills.len()
    }

    pub fn contains(&self, target: SelectionTarget) -> bool {
        match target {
            SelectionTarget::Stroke(i) => self.strokes.contains(&i),
            SelectionTarget::Fill(i) => self.fills.contains(&i),
        }
    }

    /// Plain click: the target becomes the whole selection.
    pub fn select_only(&mut self, target: SelectionTarget) {
        self.clear();
        self.insert(target);
    }

    /// Modified click: add or remove one target, keeping the rest.
    pub fn toggle(&mut self, target: SelectionTarget) {
        let removed = match target {
            SelectionTarget::Stroke(i) => self.strokes.remove(&i),
            SelectionTarget::Fill(i) => self.fills.remove(&i),
        };
        if !removed {
            self.insert(target);
        }
    }

    pub fn insert(&mut self, target: SelectionTarget) {
        match target {
            SelectionTarget::Stroke(i) => {
                self.strokes.insert(i);
            }
            SelectionTarget::Fill(i) => {
                self.fills.insert(i);
            }
        }
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.fills.clear();
    }

    /// Lasso release: the stroke set is replaced and fills are dropped.
    pub fn replace_strokes(&mut self, strokes: BTreeSet<usize>) {
        self.strokes = strokes;
        self.fills.clear();
    }

    /// The single selected stroke, if exactly one item is selected.
    pub fn single_stroke(&self) -> Option<usize> {
        if self.fills.is_empty() && self.strokes.len() == 1 {
            self.strokes.first().copied()
        } else {
            None
        }
    }

    /// Shift stroke indices after the strokes in `removed` were deleted.
    ///
    /// Selected strokes that were removed drop out of the selection.
    pub fn remap_after_removal(&mut self, removed: &BTreeSet<usize>) {
        self.strokes = self
            .strokes
            .iter()
            .filter(|i| !removed.contains(i))
            .map(|&i| i - removed.range(..i).count())
            .collect();
    }

    /// Drop indices that no longer reference an existing stroke or fill.
    pub fn retain_valid(&mut self, stroke_count: usize, fill_count: usize) {
        self.strokes.retain(|&i| i < stroke_count);
        self.fills.retain(|&i| i < fill_count);
    }
}

/// Kind of manipulation handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Endpoint(Endpoint),
}

/// A draggable handle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// `radius` should already be adjusted for viewport zoom.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        (point - self.position).hypot2() <= radius * radius
    }
}

/// The start and end handles of a stroke.
pub fn endpoint_handles(stroke: &Stroke) -> Vec<Handle> {
    if !stroke.is_segmentable() {
        return Vec::new();
    }
    [Endpoint::Start, Endpoint::End]
        .into_iter()
        .filter_map(|end| {
            stroke
                .endpoint(end)
                .map(|p| Handle::new(p, HandleKind::Endpoint(end)))
        })
        .collect()
}

/// The endpoint handle of `stroke` under `point`, nearest first.
pub fn hit_test_endpoint(stroke: &Stroke, point: Point, radius: f64) -> Option<Endpoint> {
    endpoint_handles(stroke)
        .into_iter()
        .filter(|h| h.hit_test(point, radius))
        .min_by(|a, b| {
            (point - a.position)
                .hypot2()
                .total_cmp(&(point - b.position).hypot2())
        })
        .map(|h| match h.kind {
            HandleKind::Endpoint(end) => end,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{SerializableColor, StrokeStyle};

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Stroke {
        Stroke::segment(Point::new(x0, y0), Point::new(x1, y1), StrokeStyle::default())
    }

    #[test]
    fn test_topmost_stroke_wins() {
        let strokes = vec![seg(0.0, 0.0, 100.0, 0.0), seg(0.0, 2.0, 100.0, 2.0)];
        assert_eq!(find_stroke_at(&strokes, Point::new(50.0, 1.0), 10.0), Some(1));
    }

    #[test]
    fn test_threshold_is_strict() {
        let strokes = vec![seg(0.0, 0.0, 100.0, 0.0)];
        assert_eq!(find_stroke_at(&strokes, Point::new(50.0, 10.0), 10.0), None);
        assert_eq!(find_stroke_at(&strokes, Point::new(50.0, 9.9), 10.0), Some(0));
    }

    #[test]
    fn test_multi_segment_stroke_checks_every_pair() {
        let strokes = vec![Stroke::from_points(
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)],
            StrokeStyle::default(),
        )];
        assert_eq!(find_stroke_at(&strokes, Point::new(103.0, 60.0), 10.0), Some(0));
    }

    #[test]
    fn test_empty_and_short_strokes() {
        assert_eq!(find_stroke_at(&[], Point::ZERO, 10.0), None);
        let strokes = vec![Stroke::begin(Point::ZERO, StrokeStyle::default())];
        assert_eq!(find_stroke_at(&strokes, Point::ZERO, 10.0), None);
    }

    #[test]
    fn test_find_fill_ring_and_bounds() {
        let fills = vec![
            FillPolygon::from_bounds(Rect::new(0.0, 0.0, 100.0, 100.0), SerializableColor::fill_blue()),
            FillPolygon::new(
                vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(0.0, 100.0)],
                SerializableColor::fill_blue(),
            ),
        ];
        assert_eq!(find_fill_at(&fills, Point::new(10.0, 10.0)), Some(1));
        assert_eq!(find_fill_at(&fills, Point::new(90.0, 90.0)), Some(0));
        assert_eq!(find_fill_at(&fills, Point::new(200.0, 90.0)), None);
    }

    #[test]
    fn test_lasso_touch_semantics() {
        let strokes = vec![
            seg(10.0, 10.0, 1000.0, 1000.0),
            seg(500.0, 500.0, 600.0, 600.0),
            seg(50.0, 50.0, 60.0, 60.0),
        ];
        let hits = strokes_in_rect(&strokes, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(hits, BTreeSet::from([0, 2]));
    }

    #[test]
    fn test_lasso_edges_inclusive() {
        let strokes = vec![seg(100.0, 100.0, 200.0, 200.0)];
        let hits = strokes_in_rect(&strokes, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(hits.contains(&0));
    }

    #[test]
    fn test_select_only_and_toggle() {
        let mut selection = Selection::new();
        selection.select_only(SelectionTarget::Stroke(1));
        selection.toggle(SelectionTarget::Stroke(3));
        assert_eq!(selection.strokes, BTreeSet::from([1, 3]));
        selection.toggle(SelectionTarget::Stroke(1));
        assert_eq!(selection.strokes, BTreeSet::from([3]));
        selection.select_only(SelectionTarget::Fill(0));
        assert!(selection.strokes.is_empty());
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_remap_after_removal() {
        let mut selection = Selection::new();
        selection.replace_strokes(BTreeSet::from([0, 2, 5, 7]));
        selection.remap_after_removal(&BTreeSet::from([1, 2, 4]));
        assert_eq!(selection.strokes, BTreeSet::from([0, 2, 4]));
    }

    #[test]
    fn test_retain_valid() {
        let mut selection = Selection::new();
        selection.replace_strokes(BTreeSet::from([0, 3]));
        selection.insert(SelectionTarget::Fill(2));
        selection.retain_valid(2, 1);
        assert_eq!(selection.strokes, BTreeSet::from([0]));
        assert!(selection.fills.is_empty());
    }

    #[test]
    fn test_single_stroke() {
        let mut selection = Selection::new();
        assert_eq!(selection.single_stroke(), None);
        selection.select_only(SelectionTarget::Stroke(4));
        assert_eq!(selection.single_stroke(), Some(4));
        selection.insert(SelectionTarget::Stroke(5));
        assert_eq!(selection.single_stroke(), None);
    }

    #[test]
    fn test_endpoint_hit() {
        let stroke = seg(0.0, 0.0, 100.0, 0.0);
        assert_eq!(hit_test_endpoint(&stroke, Point::new(5.0, 5.0), 11.0), Some(Endpoint::Start));
        assert_eq!(hit_test_endpoint(&stroke, Point::new(95.0, 0.0), 11.0), Some(Endpoint::End));
        assert_eq!(hit_test_endpoint(&stroke, Point::new(50.0, 0.0), 11.0), None);
    }

    #[test]
    fn test_overlapping_handles_pick_nearest() {
        let stroke = seg(0.0, 0.0, 10.0, 0.0);
        assert_eq!(hit_test_endpoint(&stroke, Point::new(8.0, 0.0), 11.0), Some(Endpoint::End));
    }
}

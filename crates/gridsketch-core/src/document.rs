//! Drawing document: the stroke list and derived fills.

use crate::fill::FillPolygon;
use crate::geometry::strokes_bounds;
use crate::stroke::Stroke;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Strokes in draw order (back to front) and the fills derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub fills: Vec<FillPolygon>,
}

impl Drawing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self {
            strokes,
            fills: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.fills.is_empty()
    }

    /// Append a stroke on top and return its index.
    pub fn push_stroke(&mut self, stroke: Stroke) -> usize {
        self.strokes.push(stroke);
        self.strokes.len() - 1
    }

    /// Append a fill on top and return its index.
    pub fn push_fill(&mut self, fill: FillPolygon) -> usize {
        self.fills.push(fill);
        self.fills.len() - 1
    }

    /// Remove strokes by index, preserving the order of the rest.
    ///
    /// Returns the removed strokes in their original order. Indices past the
    /// end are ignored.
    pub fn remove_strokes(&mut self, indices: &BTreeSet<usize>) -> Vec<Stroke> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.strokes.len());
        for (i, stroke) in std::mem::take(&mut self.strokes).into_iter().enumerate() {
            if indices.contains(&i) {
                removed.push(stroke);
            } else {
                kept.push(stroke);
            }
        }
        self.strokes = kept;
        removed
    }

    /// Remove fills by index, preserving the order of the rest.
    pub fn remove_fills(&mut self, indices: &BTreeSet<usize>) -> usize {
        let before = self.fills.len();
        let mut i = 0;
        self.fills.retain(|_| {
            let keep = !indices.contains(&i);
            i += 1;
            keep
        });
        before - self.fills.len()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.fills.clear();
    }

    /// Bounds of every stroke and fill, or `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        if self.strokes.iter().any(|s| !s.points.is_empty()) {
            result = Some(strokes_bounds(&self.strokes));
        }
        for fill in &self.fills {
            result = Some(match result {
                Some(r) => r.union(fill.bounds),
                None => fill.bounds,
            });
        }
        result
    }

    /// Serialize the drawing to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a drawing from JSON.
    ///
    /// A bare stroke array is accepted as a drawing without fills.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Drawing(Drawing),
            Strokes(Vec<Stroke>),
        }
        Ok(match serde_json::from_str(json)? {
            Repr::Drawing(drawing) => drawing,
            Repr::Strokes(strokes) => Self::from_strokes(strokes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{SerializableColor, StrokeStyle};
    use kurbo::Point;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Stroke {
        Stroke::segment(Point::new(x0, y0), Point::new(x1, y1), StrokeStyle::default())
    }

    #[test]
    fn test_remove_strokes_keeps_order() {
        let mut drawing = Drawing::from_strokes(vec![
            seg(0.0, 0.0, 1.0, 0.0),
            seg(0.0, 1.0, 1.0, 1.0),
            seg(0.0, 2.0, 1.0, 2.0),
            seg(0.0, 3.0, 1.0, 3.0),
        ]);
        let removed = drawing.remove_strokes(&BTreeSet::from([0, 2, 9]));
        assert_eq!(removed.len(), 2);
        assert_eq!(drawing.strokes.len(), 2);
        assert_eq!(drawing.strokes[0].points[0].y, 1.0);
        assert_eq!(drawing.strokes[1].points[0].y, 3.0);
    }

    #[test]
    fn test_remove_fills() {
        let mut drawing = Drawing::new();
        for _ in 0..3 {
            drawing.push_fill(FillPolygon::from_bounds(Rect::ZERO, SerializableColor::fill_blue()));
        }
        let last = drawing.fills[2].id;
        assert_eq!(drawing.remove_fills(&BTreeSet::from([0, 1])), 2);
        assert_eq!(drawing.fills[0].id, last);
    }

    #[test]
    fn test_bounds() {
        let mut drawing = Drawing::new();
        assert_eq!(drawing.bounds(), None);
        drawing.push_stroke(seg(0.0, 0.0, 10.0, 10.0));
        drawing.push_fill(FillPolygon::from_bounds(
            Rect::new(50.0, 50.0, 60.0, 70.0),
            SerializableColor::fill_blue(),
        ));
        assert_eq!(drawing.bounds(), Some(Rect::new(0.0, 0.0, 60.0, 70.0)));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut drawing = Drawing::from_strokes(vec![seg(0.0, 0.0, 25.0, 0.0)]);
        drawing.push_fill(FillPolygon::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)],
            SerializableColor::fill_blue(),
        ));
        let json = drawing.to_json().unwrap();
        assert_eq!(Drawing::from_json(&json).unwrap(), drawing);
    }

    #[test]
    fn test_bare_stroke_array() {
        let json = serde_json::to_string(&vec![seg(0.0, 0.0, 25.0, 0.0)]).unwrap();
        let drawing = Drawing::from_json(&json).unwrap();
        assert_eq!(drawing.strokes.len(), 1);
        assert!(drawing.fills.is_empty());
    }
}

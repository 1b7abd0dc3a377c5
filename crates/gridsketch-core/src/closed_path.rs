//! Closed-path detection over independent strokes.
//!
//! Stroke endpoints are bucketed in a spatial hash whose cell size equals the
//! joining tolerance. A walk from each seed stroke hops between strokes whose
//! endpoints meet, and reports a cycle once it returns near its start.

use crate::stroke::{Endpoint, Stroke};
use kurbo::Point;
use std::collections::{HashMap, HashSet};

/// Fewest strokes that can enclose an area.
pub const MIN_CYCLE_STROKES: usize = 3;

/// A cycle of connected strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPath {
    /// Stroke indices in traversal order.
    pub strokes: Vec<usize>,
    /// Polygon ring in traversal order, without a repeated closing point.
    pub ring: Vec<Point>,
}

type CellKey = (i64, i64);

/// Spatial hash from tolerance-sized cells to the stroke endpoints inside them.
struct EndpointIndex<'a> {
    strokes: &'a [Stroke],
    tolerance: f64,
    cells: HashMap<CellKey, Vec<(usize, Endpoint)>>,
}

impl<'a> EndpointIndex<'a> {
    fn build(strokes: &'a [Stroke], candidates: &[usize], tolerance: f64) -> Self {
        let mut index = Self {
            strokes,
            tolerance,
            cells: HashMap::new(),
        };
        for &i in candidates {
            for end in [Endpoint::Start, Endpoint::End] {
                if let Some(p) = strokes[i].endpoint(end) {
                    let key = index.cell(p);
                    index.cells.entry(key).or_default().push((i, end));
                }
            }
        }
        index
    }

    fn cell(&self, p: Point) -> CellKey {
        (
            (p.x / self.tolerance).floor() as i64,
            (p.y / self.tolerance).floor() as i64,
        )
    }

    /// Endpoints within tolerance of `p`, nearest first.
    ///
    /// Any point within tolerance lies in one of the 3×3 cells around `p`.
    fn near(&self, p: Point) -> Vec<(usize, Endpoint, f64)> {
        let (cx, cy) = self.cell(p);
        let mut found = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(entries) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &(i, end) in entries {
                    if let Some(q) = self.strokes[i].endpoint(end) {
                        let dist = p.distance(q);
                        if dist <= self.tolerance {
                            found.push((i, end, dist));
                        }
                    }
                }
            }
        }
        found.sort_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)));
        found
    }
}

/// Finds cycles among strokes whose endpoints meet within a tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedPathDetector {
    pub tolerance: f64,
    /// Maximum hops per seed before the walk is abandoned.
    pub max_steps: usize,
}

impl ClosedPathDetector {
    pub fn new(tolerance: f64, max_steps: usize) -> Self {
        Self {
            tolerance,
            max_steps,
        }
    }

    /// Detect cycles over every stroke.
    pub fn detect(&self, strokes: &[Stroke]) -> Vec<ClosedPath> {
        self.detect_among(strokes, 0..strokes.len())
    }

    /// Detect cycles using only the given stroke indices.
    ///
    /// Out-of-range indices and strokes with fewer than two points are ignored.
    /// Each stroke belongs to at most one reported cycle.
    pub fn detect_among(
        &self,
        strokes: &[Stroke],
        indices: impl IntoIterator<Item = usize>,
    ) -> Vec<ClosedPath> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Vec::new();
        }
        let mut candidates: Vec<usize> = indices
            .into_iter()
            .filter(|&i| {
                i < strokes.len() && strokes[i].is_segmentable() && strokes[i].length() > 0.0
            })
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let index = EndpointIndex::build(strokes, &candidates, self.tolerance);
        let mut consumed: HashSet<usize> = HashSet::new();
        let mut paths = Vec::new();

        for &seed in &candidates {
            if consumed.contains(&seed) {
                continue;
            }
            if let Some(path) = self.walk(&index, seed, &consumed) {
                consumed.extend(path.strokes.iter().copied());
                paths.push(path);
            }
        }
        log::debug!(
            "closed-path detection: {} cycle(s) among {} stroke(s)",
            paths.len(),
            candidates.len()
        );
        paths
    }

    fn walk(&self, index: &EndpointIndex<'_>, seed: usize, consumed: &HashSet<usize>) -> Option<ClosedPath> {
        let strokes = index.strokes;
        let origin = strokes[seed].first()?;
        let mut current = strokes[seed].last()?;
        let mut visited: HashSet<usize> = HashSet::from([seed]);
        let mut order = vec![seed];
        let mut ring = strokes[seed].points.clone();
        let mut steps = 0;

        loop {
            if order.len() >= MIN_CYCLE_STROKES && current.distance(origin) <= self.tolerance {
                // The last point duplicates the origin
                ring.pop();
                return Some(ClosedPath {
                    strokes: order,
                    ring,
                });
            }
            if steps >= self.max_steps {
                return None;
            }
            let (next, entry, _) = index
                .near(current)
                .into_iter()
                .find(|(i, _, _)| !visited.contains(i) && !consumed.contains(i))?;

            let points = &strokes[next].points;
            match entry {
                Endpoint::Start => ring.extend(points.iter().skip(1).copied()),
                Endpoint::End => ring.extend(points.iter().rev().skip(1).copied()),
            }
            current = strokes[next].endpoint(entry.other())?;
            visited.insert(next);
            order.push(next);
            steps += 1;
        }
    }
}

/// Detect cycles over every stroke with the given tolerance and step budget.
pub fn detect_closed_paths(strokes: &[Stroke], tolerance: f64, max_steps: usize) -> Vec<ClosedPath> {
    ClosedPathDetector::new(tolerance, max_steps).detect(strokes)
}

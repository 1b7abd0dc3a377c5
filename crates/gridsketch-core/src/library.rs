//! Reusable drawing library.
//!
//! Entries are deep copies of a stroke list, stamped with a name and creation
//! time, and can be dropped back onto the canvas at any point.

use crate::geometry::strokes_bounds;
use crate::grid::snap_point_to_grid;
use crate::stroke::Stroke;
use chrono::{DateTime, Utc};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub strokes: Vec<Stroke>,
    /// Bounds of `strokes`, computed at save time.
    pub bounds: Rect,
}

impl LibraryEntry {
    pub fn new(name: impl Into<String>, strokes: Vec<Stroke>) -> Self {
        let bounds = strokes_bounds(&strokes);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            strokes,
            bounds,
        }
    }

    /// Copies of the entry's strokes moved so their bounds centre sits on
    /// `drop_point`, which is first snapped to the grid when a pitch is given.
    pub fn placed_strokes(&self, drop_point: Point, grid_pitch: Option<f64>) -> Vec<Stroke> {
        let target = match grid_pitch {
            Some(pitch) => snap_point_to_grid(drop_point, pitch),
            None => drop_point,
        };
        let delta = target - self.bounds.center();
        self.strokes
            .iter()
            .cloned()
            .map(|mut stroke| {
                stroke.translate(delta);
                stroke
            })
            .collect()
    }
}

/// Named drawings kept for reuse, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingLibrary {
    pub entries: Vec<LibraryEntry>,
}

impl DrawingLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a deep copy of `strokes` under `name`.
    ///
    /// Returns `None` without saving when there is nothing to save.
    pub fn save(&mut self, name: impl Into<String>, strokes: &[Stroke]) -> Option<Uuid> {
        if strokes.is_empty() {
            return None;
        }
        let entry = LibraryEntry::new(name, strokes.to_vec());
        let id = entry.id;
        log::debug!("saved library entry {} ({} strokes)", entry.name, entry.strokes.len());
        self.entries.push(entry);
        Some(id)
    }

    pub fn get(&self, id: Uuid) -> Option<&LibraryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<LibraryEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LibraryEntry> {
        self.entries.iter()
    }
}

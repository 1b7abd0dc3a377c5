//! Interactive drawing session.
//!
//! A [`Session`] owns the drawing, the selection and the viewport, and turns
//! pointer and keyboard events into edits. Every in-progress gesture lives in
//! a single [`InteractionState`] value, so resetting a gesture is one
//! assignment.

use crate::closed_path::{ClosedPath, ClosedPathDetector};
use crate::config::EngineConfig;
use crate::document::Drawing;
use crate::fill::FillPolygon;
use crate::geometry::{normalized_rect, strokes_bounds};
use crate::input::{Key, Modifiers, MouseButton, PointerEvent};
use crate::library::DrawingLibrary;
use crate::measure::{measure_strokes, MeasurementLabel};
use crate::selection::{
    find_fill_at, find_stroke_at, hit_test_endpoint, strokes_in_rect, Selection, SelectionTarget,
};
use crate::shapes::{construct, ShapeKind, TempShape};
use crate::snap::{snap_stroke, SnapDirection, SnapTimer};
use crate::stroke::{Endpoint, Stroke, StrokeStyle};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Zoom step applied per scroll notch.
const SCROLL_ZOOM_FACTOR: f64 = 1.1;

/// What a left-button press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Freehand strokes that straighten after an idle pause.
    #[default]
    Draw,
    /// Move whole strokes.
    Drag,
    /// Click, toggle and lasso selection.
    Select,
    Pan,
    Shape(ShapeKind),
}

impl Mode {
    /// Mode bound to a shortcut key.
    pub fn from_key(c: char) -> Option<Self> {
        Some(match c.to_ascii_lowercase() {
            'p' => Mode::Draw,
            'm' => Mode::Drag,
            'v' => Mode::Select,
            'h' => Mode::Pan,
            'r' => Mode::Shape(ShapeKind::Rectangle),
            'o' => Mode::Shape(ShapeKind::Ellipse),
            't' => Mode::Shape(ShapeKind::Triangle),
            'a' => Mode::Shape(ShapeKind::Arrow),
            'l' => Mode::Shape(ShapeKind::Line),
            _ => return None,
        })
    }
}

/// The gesture in progress, with the data it needs.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Appending points to `stroke`; the timer owns the pending idle snap.
    Drawing { stroke: usize, timer: SnapTimer },
    DraggingShape(TempShape),
    /// `offset` is the press point relative to the stroke's first point.
    DraggingStroke { stroke: usize, offset: Vec2 },
    DraggingEndpoint { stroke: usize, endpoint: Endpoint },
    /// Corners in world coordinates.
    LassoSelecting { start: Point, current: Point },
    /// Last pointer position in screen coordinates.
    Panning { last: Point },
    /// First click of a two-point line has landed.
    AwaitingSecondPoint { anchor: Point, current: Point },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }
}

/// Single-user editing session over one drawing.
#[derive(Debug, Clone)]
pub struct Session {
    pub drawing: Drawing,
    pub selection: Selection,
    pub viewport: Viewport,
    pub library: DrawingLibrary,
    /// Style applied to new strokes.
    pub style: StrokeStyle,
    mode: Mode,
    state: InteractionState,
    config: EngineConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        let config = config.validated();
        Self {
            drawing: Drawing::new(),
            selection: Selection::new(),
            viewport: Viewport::new(),
            library: DrawingLibrary::new(),
            style: config.stroke_style(),
            mode: Mode::default(),
            state: InteractionState::Idle,
            config,
        }
    }

    /// Session over an existing drawing.
    pub fn with_drawing(config: EngineConfig, drawing: Drawing) -> Self {
        Self {
            drawing,
            ..Self::new(config)
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.drawing.strokes
    }

    pub fn fills(&self) -> &[FillPolygon] {
        &self.drawing.fills
    }

    /// Switch mode, abandoning any gesture and clearing the selection.
    pub fn set_mode(&mut self, mode: Mode) {
        self.cancel();
        self.selection.clear();
        if self.mode != mode {
            log::debug!("mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Abandon the in-progress gesture.
    ///
    /// Strokes already drawn stay as they are; a pending idle snap, a shape
    /// preview, a lasso or a line anchor is discarded.
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Dispatch a pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position, now),
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
            PointerEvent::Scroll { position, delta } => {
                let factor = if delta.y < 0.0 {
                    SCROLL_ZOOM_FACTOR
                } else {
                    1.0 / SCROLL_ZOOM_FACTOR
                };
                self.zoom_at(position, factor);
            }
        }
    }

    /// Pointer pressed at a screen position.
    pub fn pointer_down(&mut self, screen: Point, button: MouseButton, modifiers: Modifiers) {
        match button {
            MouseButton::Middle => {
                self.state = InteractionState::Panning { last: screen };
                return;
            }
            MouseButton::Right => return,
            MouseButton::Left => {}
        }
        let world = self.viewport.screen_to_world(screen);

        if let InteractionState::AwaitingSecondPoint { anchor, .. } = self.state {
            self.state = InteractionState::Idle;
            let strokes = construct(ShapeKind::Line, anchor, world, self.style, &self.config);
            self.commit_strokes(strokes);
            return;
        }
        // A press without a matching release leaves a stale gesture behind
        self.state = InteractionState::Idle;

        match self.mode {
            Mode::Draw => {
                let stroke = self.drawing.push_stroke(Stroke::begin(world, self.style));
                self.state = InteractionState::Drawing {
                    stroke,
                    timer: SnapTimer::new(self.config.snap_delay()),
                };
            }
            Mode::Drag => {
                if let Some((stroke, endpoint)) = self.grab_endpoint(world) {
                    self.state = InteractionState::DraggingEndpoint { stroke, endpoint };
                } else if let Some(stroke) = self.stroke_at(world) {
                    if let Some(first) = self.drawing.strokes[stroke].first() {
                        self.state = InteractionState::DraggingStroke {
                            stroke,
                            offset: world - first,
                        };
                    }
                }
            }
            Mode::Select => self.select_at(world, modifiers),
            Mode::Pan => self.state = InteractionState::Panning { last: screen },
            Mode::Shape(ShapeKind::Line) => {
                self.state = InteractionState::AwaitingSecondPoint {
                    anchor: world,
                    current: world,
                };
            }
            Mode::Shape(kind) => {
                self.state = InteractionState::DraggingShape(TempShape::new(kind, world));
            }
        }
    }

    /// Pointer moved to a screen position.
    pub fn pointer_move(&mut self, screen: Point, now: Instant) {
        let world = self.viewport.screen_to_world(screen);
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::Drawing { stroke, timer } => {
                // A snapped stroke refuses points and leaves the timer alone
                if let Some(s) = self.drawing.strokes.get_mut(*stroke) {
                    if s.push_point(world) {
                        timer.arm(now);
                    }
                }
            }
            InteractionState::DraggingShape(temp) => temp.update(world),
            InteractionState::DraggingStroke { stroke, offset } => {
                if let Some(s) = self.drawing.strokes.get_mut(*stroke) {
                    if let Some(first) = s.first() {
                        s.translate((world - *offset) - first);
                    }
                }
            }
            InteractionState::DraggingEndpoint { stroke, endpoint } => {
                if let Some(s) = self.drawing.strokes.get_mut(*stroke) {
                    s.set_endpoint(*endpoint, world);
                }
            }
            InteractionState::LassoSelecting { current, .. }
            | InteractionState::AwaitingSecondPoint { current, .. } => *current = world,
            InteractionState::Panning { last } => {
                self.viewport.pan(screen - *last);
                *last = screen;
            }
        }
    }

    /// Pointer released at a screen position.
    pub fn pointer_up(&mut self, screen: Point, button: MouseButton) {
        if button == MouseButton::Right {
            return;
        }
        let world = self.viewport.screen_to_world(screen);
        match std::mem::take(&mut self.state) {
            InteractionState::Drawing { stroke, .. } => {
                if self.config.snap_on_release {
                    self.snap_stroke_at(stroke);
                }
            }
            InteractionState::DraggingShape(mut temp) => {
                temp.update(world);
                let strokes = temp.finish(self.style, &self.config);
                self.commit_strokes(strokes);
            }
            InteractionState::LassoSelecting { start, .. } => {
                let rect = normalized_rect(start, world);
                self.selection
                    .replace_strokes(strokes_in_rect(&self.drawing.strokes, rect));
            }
            // The first click's release; keep waiting for the second
            state @ InteractionState::AwaitingSecondPoint { .. } => self.state = state,
            InteractionState::Idle
            | InteractionState::DraggingStroke { .. }
            | InteractionState::DraggingEndpoint { .. }
            | InteractionState::Panning { .. } => {}
        }
    }

    /// Fire the idle snap if its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Option<SnapDirection> {
        let InteractionState::Drawing { stroke, timer } = &mut self.state else {
            return None;
        };
        if !timer.fire(now) {
            return None;
        }
        let stroke = *stroke;
        self.snap_stroke_at(stroke)
    }

    /// When the host should next call [`tick`](Self::tick).
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.state {
            InteractionState::Drawing { timer, .. } => timer.deadline(),
            _ => None,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Delete | Key::Backspace => {
                self.delete_selected();
            }
            Key::Escape => {
                self.cancel();
                self.selection.clear();
            }
            Key::Char(c) => {
                if let Some(mode) = Mode::from_key(c) {
                    self.set_mode(mode);
                }
            }
        }
    }

    /// Zoom about a screen point.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        self.viewport.zoom_at(screen, factor);
    }

    /// Remove the selected strokes and fills. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        self.cancel();
        let strokes = std::mem::take(&mut self.selection.strokes);
        let fills = std::mem::take(&mut self.selection.fills);
        let removed = self.drawing.remove_strokes(&strokes).len() + self.drawing.remove_fills(&fills);
        self.selection.clear();
        log::debug!("deleted {} item(s)", removed);
        removed
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.cancel();
        self.drawing.clear();
        self.selection.clear();
    }

    /// Swap in another drawing, keeping the selection entries it still covers.
    pub fn replace_drawing(&mut self, drawing: Drawing) -> Drawing {
        self.cancel();
        let previous = std::mem::replace(&mut self.drawing, drawing);
        self.selection
            .retain_valid(self.drawing.strokes.len(), self.drawing.fills.len());
        previous
    }

    /// Straighten the most recent stroke now, outside the idle timer.
    pub fn snap_last_stroke(&mut self) -> Option<SnapDirection> {
        let last = self.drawing.strokes.len().checked_sub(1)?;
        self.snap_stroke_at(last)
    }

    /// Detect closed cycles over every stroke and add a fill for each.
    ///
    /// With `remove_sources` the strokes of each cycle are deleted. Returns
    /// the number of fills added.
    pub fn detect_closed_shapes(&mut self, remove_sources: bool) -> usize {
        let paths = self.detector().detect(&self.drawing.strokes);
        self.apply_closed_paths(paths, remove_sources)
    }

    /// Turn the selected strokes into fills.
    ///
    /// Cycles among the selection become polygon fills. If none close, a
    /// single bounds-only fill covering the selection is added instead,
    /// unless that box has no area.
    pub fn solidify_selection(&mut self, remove_sources: bool) -> usize {
        let selected: BTreeSet<usize> = self.selection.strokes.clone();
        if selected.is_empty() {
            return 0;
        }
        let paths = self
            .detector()
            .detect_among(&self.drawing.strokes, selected.iter().copied());
        if !paths.is_empty() {
            return self.apply_closed_paths(paths, remove_sources);
        }

        let bounds = strokes_bounds(selected.iter().filter_map(|&i| self.drawing.strokes.get(i)));
        if bounds.is_zero_area() {
            return 0;
        }
        self.cancel();
        self.drawing
            .push_fill(FillPolygon::from_bounds(bounds, self.config.fill_color));
        if remove_sources {
            self.remove_strokes(&selected);
        }
        1
    }

    /// Length labels for every measurable stroke at the current zoom.
    pub fn measurements(&self) -> Vec<(usize, MeasurementLabel)> {
        measure_strokes(
            &self.drawing.strokes,
            self.config.grid_pitch,
            self.config.label_offset_px,
            self.viewport.zoom,
        )
    }

    /// The lasso box in world coordinates, while one is being dragged.
    pub fn lasso_rect(&self) -> Option<Rect> {
        match self.state {
            InteractionState::LassoSelecting { start, current } => Some(normalized_rect(start, current)),
            _ => None,
        }
    }

    /// Strokes the current shape gesture would commit if finished now.
    pub fn preview_strokes(&self) -> Vec<Stroke> {
        match &self.state {
            InteractionState::DraggingShape(temp) => temp.preview(self.style, &self.config),
            InteractionState::AwaitingSecondPoint { anchor, current } => {
                construct(ShapeKind::Line, *anchor, *current, self.style, &self.config)
            }
            _ => Vec::new(),
        }
    }

    /// Save the selected strokes, or the whole drawing when nothing is
    /// selected, to the library.
    pub fn save_to_library(&mut self, name: &str) -> Option<Uuid> {
        let strokes: Vec<Stroke> = if self.selection.strokes.is_empty() {
            self.drawing.strokes.clone()
        } else {
            self.selection
                .strokes
                .iter()
                .filter_map(|&i| self.drawing.strokes.get(i))
                .cloned()
                .collect()
        };
        self.library.save(name, &strokes)
    }

    /// Drop a library entry centred on a screen point and select the new
    /// strokes. Returns how many strokes were added.
    pub fn place_from_library(&mut self, id: Uuid, screen: Point) -> usize {
        let world = self.viewport.screen_to_world(screen);
        let grid = self
            .config
            .snap_shapes_to_grid
            .then_some(self.config.grid_pitch);
        let Some(entry) = self.library.get(id) else {
            log::warn!("library entry {} not found", id);
            return 0;
        };
        let placed = entry.placed_strokes(world, grid);
        self.cancel();
        let start = self.drawing.strokes.len();
        let count = placed.len();
        self.drawing.strokes.extend(placed);
        self.selection.replace_strokes((start..start + count).collect());
        count
    }

    fn detector(&self) -> ClosedPathDetector {
        ClosedPathDetector::new(
            self.config.closed_path_tolerance,
            self.config.closed_path_max_steps,
        )
    }

    fn apply_closed_paths(&mut self, paths: Vec<ClosedPath>, remove_sources: bool) -> usize {
        if paths.is_empty() {
            return 0;
        }
        self.cancel();
        let mut consumed = BTreeSet::new();
        for path in &paths {
            consumed.extend(path.strokes.iter().copied());
            self.drawing
                .push_fill(FillPolygon::new(path.ring.clone(), self.config.fill_color));
        }
        if remove_sources {
            self.remove_strokes(&consumed);
        }
        paths.len()
    }

    fn remove_strokes(&mut self, indices: &BTreeSet<usize>) {
        self.drawing.remove_strokes(indices);
        self.selection.remap_after_removal(indices);
    }

    fn commit_strokes(&mut self, strokes: Vec<Stroke>) {
        if strokes.is_empty() {
            return;
        }
        log::debug!("committed {} shape stroke(s)", strokes.len());
        self.drawing.strokes.extend(strokes);
    }

    fn snap_stroke_at(&mut self, index: usize) -> Option<SnapDirection> {
        let stroke = self.drawing.strokes.get_mut(index)?;
        snap_stroke(stroke, self.config.grid_pitch, self.config.angle_tolerance_deg)
    }

    fn stroke_at(&self, world: Point) -> Option<usize> {
        let threshold = self.viewport.world_length(self.config.hit_threshold);
        find_stroke_at(&self.drawing.strokes, world, threshold)
    }

    /// Endpoint handle under `world` on the single selected stroke.
    fn grab_endpoint(&self, world: Point) -> Option<(usize, Endpoint)> {
        let index = self.selection.single_stroke()?;
        let stroke = self.drawing.strokes.get(index)?;
        let radius = self.viewport.world_length(self.config.handle_radius);
        hit_test_endpoint(stroke, world, radius).map(|end| (index, end))
    }

    fn select_at(&mut self, world: Point, modifiers: Modifiers) {
        let toggle = modifiers.toggle();
        if !toggle {
            if let Some((stroke, endpoint)) = self.grab_endpoint(world) {
                self.state = InteractionState::DraggingEndpoint { stroke, endpoint };
                return;
            }
        }
        let target = self
            .stroke_at(world)
            .map(SelectionTarget::Stroke)
            .or_else(|| find_fill_at(&self.drawing.fills, world).map(SelectionTarget::Fill));
        match target {
            Some(target) if toggle => self.selection.toggle(target),
            Some(target) => self.selection.select_only(target),
            None => {
                if !toggle {
                    self.selection.clear();
                }
                self.state = InteractionState::LassoSelecting {
                    start: world,
                    current: world,
                };
            }
        }
    }
}

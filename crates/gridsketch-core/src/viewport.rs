//! Viewport transform for pan and zoom.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Pan/zoom transform between screen space and world space.
///
/// All stroke geometry lives in world space. Pointer input arrives in
/// screen space and is converted here before any geometric computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Translation in screen pixels.
    pub offset: Vec2,
    /// Screen pixels per world unit.
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// World → screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen → world.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Convert a screen-pixel distance into world units at the current zoom.
    ///
    /// Hit thresholds and label offsets go through here so their on-screen
    /// size stays constant while zooming.
    pub fn world_length(&self, screen_px: f64) -> f64 {
        screen_px / self.zoom
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the world point under `screen_point` fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;
        let new_screen = self.world_to_screen(world_point);
        self.offset += screen_point - new_screen;
    }

    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Fit a world-space rectangle into a viewport of the given size.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }
        let available = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let scale_x = available.width / bounds.width();
        let scale_y = available.height / bounds.height();
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        let center = bounds.center();
        self.offset = Vec2::new(
            viewport.width / 2.0 - center.x * self.zoom,
            viewport.height / 2.0 - center.y * self.zoom,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_by_default() {
        let viewport = Viewport::new();
        let p = Point::new(100.0, 200.0);
        assert_eq!(viewport.screen_to_world(p), p);
    }

    #[test]
    fn test_screen_to_world_with_pan_and_zoom() {
        let viewport = Viewport {
            offset: Vec2::new(50.0, 100.0),
            zoom: 2.0,
            ..Viewport::default()
        };
        let world = viewport.screen_to_world(Point::new(150.0, 300.0));
        assert!((world.x - 50.0).abs() < 1e-10);
        assert!((world.y - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_roundtrip() {
        let viewport = Viewport {
            offset: Vec2::new(30.0, -20.0),
            zoom: 1.5,
            ..Viewport::default()
        };
        let original = Point::new(123.0, 456.0);
        let back = viewport.world_to_screen(viewport.screen_to_world(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_keeps_cursor_fixed() {
        let mut viewport = Viewport::new();
        let cursor = Point::new(200.0, 150.0);
        let before = viewport.screen_to_world(cursor);
        viewport.zoom_at(cursor, 2.0);
        let after = viewport.screen_to_world(cursor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new();
        viewport.zoom_at(Point::ZERO, 0.001);
        assert_eq!(viewport.zoom, viewport.min_zoom);
        viewport.zoom_at(Point::ZERO, 1e6);
        assert_eq!(viewport.zoom, viewport.max_zoom);
    }

    #[test]
    fn test_world_length_scales_inversely() {
        let viewport = Viewport {
            zoom: 2.0,
            ..Viewport::default()
        };
        assert_eq!(viewport.world_length(10.0), 5.0);
    }

    #[test]
    fn test_fit_to_bounds_centers() {
        let mut viewport = Viewport::new();
        viewport.fit_to_bounds(Rect::new(0.0, 0.0, 100.0, 50.0), Size::new(400.0, 400.0), 0.0);
        let center = viewport.world_to_screen(Point::new(50.0, 25.0));
        assert!((center.x - 200.0).abs() < 1e-9);
        assert!((center.y - 200.0).abs() < 1e-9);
    }
}

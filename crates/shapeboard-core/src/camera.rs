//! Camera module for pan/zoom transforms.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Multiplier applied per wheel notch.
pub const ZOOM_FACTOR: f64 = 1.03;

/// Camera manages the view transform for the canvas.
///
/// World and screen coordinates are related by
/// `screen = world * zoom + offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen units.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subtract the pan offset from a client position. This is the form
    /// the store's hit test and the draw gesture consume; zoom is applied
    /// separately by each operation.
    pub fn to_canvas(&self, client: Point) -> Point {
        Point::new(client.x - self.offset.x, client.y - self.offset.y)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.zoom,
            (screen.y - self.offset.y) / self.zoom,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.offset.x,
            world.y * self.zoom + self.offset.y,
        )
    }

    /// Zoom one wheel notch about the given client position, keeping the
    /// world point under the cursor fixed. Scrolling up (`delta_y < 0`)
    /// zooms in.
    pub fn apply_wheel(&mut self, client: Point, delta_y: f64) {
        let mouse = self.to_canvas(client);

        if delta_y < 0.0 {
            self.zoom *= ZOOM_FACTOR;
            self.offset.x -= mouse.x * (ZOOM_FACTOR - 1.0);
            self.offset.y -= mouse.y * (ZOOM_FACTOR - 1.0);
        } else {
            self.zoom /= ZOOM_FACTOR;
            self.offset.x += mouse.x * (1.0 - 1.0 / ZOOM_FACTOR);
            self.offset.y += mouse.y * (1.0 - 1.0 / ZOOM_FACTOR);
        }
    }
}

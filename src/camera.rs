//! Camera model: pan, zoom and screen/world coordinate conversion.
//!
//! Screen space is the canvas backing store in pixels. World space is the
//! physics simulation's coordinate system. The two are related by
//! `world = (screen - viewport_center) / zoom + world_center`, so a zoom
//! below 1 reveals more of the world.

use glam::Vec2;
use serde::Serialize;

/// Size of the rendering surface in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Backing store width.
    pub width: f32,
    /// Backing store height.
    pub height: f32,
    /// Device pixel ratio; pixel-defined radii are scaled by it.
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Creates a viewport with a pixel ratio of 1.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    /// Centre of the surface in screen pixels.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// The smaller of width and height, never below one pixel.
    #[must_use]
    pub fn min_dimension(&self) -> f32 {
        self.width.min(self.height).max(1.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Pan/zoom camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    /// World point displayed at the viewport centre.
    pub world_center: Vec2,
    /// Scale factor; 1 maps one world unit to one screen pixel.
    pub zoom: f32,
}

impl Camera {
    /// Camera that maps screen pixels one-to-one onto world units.
    #[must_use]
    pub fn identity_for(viewport: &Viewport) -> Self {
        Self {
            world_center: viewport.center(),
            zoom: 1.0,
        }
    }

    /// Converts a screen-space point to world coordinates.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use palmtide::camera::{Camera, Viewport};
    /// let viewport = Viewport::new(800.0, 600.0);
    /// let camera = Camera { world_center: Vec2::new(400.0, 300.0), zoom: 0.5 };
    /// let world = camera.screen_to_world(Vec2::new(500.0, 300.0), &viewport);
    /// assert!((world.x - 600.0).abs() < 1e-4);
    /// ```
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2, viewport: &Viewport) -> Vec2 {
        (screen - viewport.center()) / self.zoom + self.world_center
    }

    /// Converts a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2, viewport: &Viewport) -> Vec2 {
        (world - self.world_center) * self.zoom + viewport.center()
    }

    /// Converts a screen-space length to world units.
    #[must_use]
    pub fn screen_len_to_world(&self, length: f32) -> f32 {
        length / self.zoom
    }

    /// World x-coordinates of the left and right screen edges.
    #[must_use]
    pub fn horizontal_bounds(&self, viewport: &Viewport) -> (f32, f32) {
        let left = self.screen_to_world(Vec2::new(0.0, 0.0), viewport).x;
        let right = self.screen_to_world(Vec2::new(viewport.width, 0.0), viewport).x;
        (left, right)
    }

    /// World y-coordinate of the floor line `floor_height` pixels above the
    /// bottom edge of the screen.
    #[must_use]
    pub fn floor_y(&self, viewport: &Viewport, floor_height: f32) -> f32 {
        let screen_y = viewport.height - floor_height * viewport.pixel_ratio;
        self.screen_to_world(Vec2::new(0.0, screen_y), viewport).y
    }
}

//! Page-space to world-space coordinate mapping.
//!
//! Page coordinates are CSS pixels in document space (viewport position plus
//! the current scroll offset). World coordinates live on the z = 0 plane of
//! an orthographic [`OrthoCamera`]. Every function here is pure: callers pass
//! the current viewport and camera and must recompute after layout changes.

use glam::{Vec2, Vec3};

use super::camera::OrthoCamera;

/// Viewport size and scroll offset in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            scroll_y: 0.0,
        }
    }
}

/// Element rectangle in viewport coordinates, as reported by
/// `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PageRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Top edge in document coordinates.
    #[inline]
    pub fn doc_top(&self, viewport: &Viewport) -> f32 {
        self.top + viewport.scroll_y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }
}

/// World-space rectangle on the z = 0 plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldRect {
    pub center: Vec2,
    pub size: Vec2,
}

/// Source of layout measurements for objects that align with page content.
///
/// The browser implementation reads the live DOM; tests provide fixed rects.
/// `rect` returns `None` for anchors that are not in the document.
pub trait LayoutSource {
    fn viewport(&self) -> Viewport;
    fn rect(&self, anchor_id: &str) -> Option<PageRect>;
}

/// World units covered by one CSS pixel, per axis.
#[inline]
pub fn world_units_per_pixel(viewport: &Viewport, camera: &OrthoCamera) -> Vec2 {
    let half = camera.half_extents();
    Vec2::new(
        2.0 * half.x / viewport.width.max(1.0),
        2.0 * half.y / viewport.height.max(1.0),
    )
}

/// Map a document-space pixel coordinate onto the camera's projection plane.
pub fn page_to_world(page: Vec2, viewport: &Viewport, camera: &OrthoCamera) -> Vec3 {
    let half = camera.half_extents();
    let vx = page.x;
    let vy = page.y - viewport.scroll_y;
    let ndc_x = 2.0 * vx / viewport.width.max(1.0) - 1.0;
    let ndc_y = 1.0 - 2.0 * vy / viewport.height.max(1.0);
    Vec3::new(
        camera.position.x + ndc_x * half.x,
        camera.position.y + ndc_y * half.y,
        0.0,
    )
}

/// Inverse of [`page_to_world`]; `z` is ignored.
pub fn world_to_page(world: Vec3, viewport: &Viewport, camera: &OrthoCamera) -> Vec2 {
    let half = camera.half_extents();
    let ndc_x = (world.x - camera.position.x) / half.x;
    let ndc_y = (world.y - camera.position.y) / half.y;
    let vx = (ndc_x + 1.0) * 0.5 * viewport.width;
    let vy = (1.0 - ndc_y) * 0.5 * viewport.height;
    Vec2::new(vx, vy + viewport.scroll_y)
}

/// World rectangle that visually covers a DOM element's bounding rect.
pub fn rect_to_world(rect: &PageRect, viewport: &Viewport, camera: &OrthoCamera) -> WorldRect {
    let c = rect.center();
    let center = page_to_world(Vec2::new(c.x, c.y + viewport.scroll_y), viewport, camera);
    let upp = world_units_per_pixel(viewport, camera);
    WorldRect {
        center: center.truncate(),
        size: Vec2::new(rect.width * upp.x, rect.height * upp.y),
    }
}

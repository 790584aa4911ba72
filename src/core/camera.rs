//! Orthographic scene camera.
//!
//! The projection is derived from a logical "frustum size": the vertical
//! world-space extent that maps onto the full viewport height. Horizontal
//! extent follows the viewport aspect ratio.

use glam::{Mat4, Vec2, Vec3};

use super::constants::{CAMERA_FAR, CAMERA_NEAR, CAMERA_Z, DEFAULT_FRUSTUM_SIZE};

#[derive(Clone, Debug, PartialEq)]
pub struct OrthoCamera {
    pub frustum_size: f32,
    pub aspect: f32,
    /// World-space camera position; `z` only matters for the view matrix.
    pub position: Vec3,
    /// Framing zoom, 1.0 shows exactly `frustum_size` vertically.
    pub zoom: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self::new(DEFAULT_FRUSTUM_SIZE, 1.0)
    }
}

impl OrthoCamera {
    pub fn new(frustum_size: f32, aspect: f32) -> Self {
        Self {
            frustum_size,
            aspect,
            position: Vec3::new(0.0, 0.0, CAMERA_Z),
            zoom: 1.0,
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    /// Half extents of the visible region in world units.
    pub fn half_extents(&self) -> Vec2 {
        let half_h = self.frustum_size * 0.5 / self.zoom.max(1e-4);
        Vec2::new(half_h * self.aspect, half_h)
    }

    /// Recompute aspect after a viewport change.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.aspect = width / height.max(1.0);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let h = self.half_extents();
        Mat4::orthographic_rh(-h.x, h.x, -h.y, h.y, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        let target = Vec3::new(self.position.x, self.position.y, 0.0);
        Mat4::look_at_rh(self.position, target, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

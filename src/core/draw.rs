//! Per-frame draw description handed from the scene to the renderer.
//!
//! Objects describe what they want drawn; the GPU layer owns every
//! resource and builds meshes lazily, keyed by [`MeshKind`].

use std::rc::Rc;

use glam::{Mat4, Vec4};

use super::curve::CurveTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshKind {
    /// Unit quad centered at the origin in the XY plane.
    Quad,
    /// Unit-radius disc with the given number of rim segments.
    Disc { segments: u32 },
    /// Unit cube centered at the origin.
    Cube,
    /// Tube grid bent along the scene curve table in the vertex stage.
    Tube { segments: u32, radial: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSource {
    None,
    Video,
    Portal(usize),
}

/// Shading mode read by the fragment stage (`params.w`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ShadeMode {
    Flat = 0,
    Textured = 1,
    Tube = 2,
    Lit = 3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshKind,
    pub model: Mat4,
    pub color: Vec4,
    pub texture: TextureSource,
    /// Free-form shader parameters; `w` carries the [`ShadeMode`].
    pub params: Vec4,
}

impl DrawItem {
    pub fn new(mesh: MeshKind, model: Mat4, color: Vec4, mode: ShadeMode) -> Self {
        Self {
            mesh,
            model,
            color,
            texture: TextureSource::None,
            params: Vec4::new(0.0, 0.0, 0.0, mode as u32 as f32),
        }
    }

    pub fn with_texture(mut self, texture: TextureSource) -> Self {
        self.texture = texture;
        self
    }

    pub fn with_params(mut self, x: f32, y: f32, z: f32) -> Self {
        self.params.x = x;
        self.params.y = y;
        self.params.z = z;
        self
    }
}

/// Offscreen pass rendered before the main pass; its color target is then
/// sampled by main-scene items via [`TextureSource::Portal`].
#[derive(Clone, Debug, PartialEq)]
pub struct PortalPass {
    pub id: usize,
    pub view_proj: Mat4,
    pub clear: [f64; 4],
    pub width: u32,
    pub height: u32,
    pub items: Vec<DrawItem>,
}

#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub view_proj: Mat4,
    pub portals: Vec<PortalPass>,
    pub items: Vec<DrawItem>,
    pub curve: Option<Rc<CurveTable>>,
    pub video_active: bool,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.portals.clear();
        self.items.clear();
        self.curve = None;
        self.video_active = false;
    }

    pub fn push(&mut self, item: DrawItem) {
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.portals.is_empty()
    }
}

use glam::{Mat4, Quat, Vec3, Vec4};
use smallvec::SmallVec;

use super::AnimatedObject;
use crate::constants::tile_anchor_id;
use crate::core::camera::OrthoCamera;
use crate::core::constants::{PORTAL_CLEAR, PORTAL_SPIN_SPEED, PORTAL_ZOOM_OPEN, TILE_HOVER_RATE};
use crate::core::draw::{DrawItem, DrawList, MeshKind, PortalPass, ShadeMode, TextureSource};
use crate::core::error::SceneError;
use crate::core::lifecycle::Lifecycle;
use crate::core::mapper::{rect_to_world, LayoutSource, WorldRect};
use crate::core::math::{damp, lerp};
use crate::core::quality::QualityProfile;
use crate::core::transition::{TransitionFrame, TransitionMachine};

const PORTAL_FRUSTUM: f32 = 3.0;
const HOVER_LIFT: f32 = 0.04;

const TILE_COLORS: [Vec4; 4] = [
    Vec4::new(0.98, 0.55, 0.35, 1.0),
    Vec4::new(0.42, 0.7, 1.0, 1.0),
    Vec4::new(0.7, 0.5, 0.98, 1.0),
    Vec4::new(0.45, 0.92, 0.7, 1.0),
];

#[derive(Clone, Copy, Debug, PartialEq)]
enum ShapeKind {
    Cube,
    Disc,
}

/// One procedural shape inside a portal scene.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PortalShape {
    kind: ShapeKind,
    offset: Vec3,
    scale: f32,
    spin: Vec3,
    color: Vec4,
}

/// A project card whose face is a live view into its own small scene.
pub struct ProjectTile {
    pub index: usize,
    anchor: String,
    rect: WorldRect,
    hover: f32,
    hover_target: f32,
    camera: OrthoCamera,
    shapes: SmallVec<[PortalShape; 4]>,
    time: f32,
}

impl ProjectTile {
    pub fn new(index: usize) -> Self {
        let color = TILE_COLORS[index % TILE_COLORS.len()];
        let accent = TILE_COLORS[(index + 1) % TILE_COLORS.len()];
        let phase = index as f32 * 0.7;
        let mut shapes = SmallVec::new();
        shapes.push(PortalShape {
            kind: ShapeKind::Cube,
            offset: Vec3::ZERO,
            scale: 0.9,
            spin: Vec3::new(0.6 + phase * 0.1, 1.0, 0.2),
            color,
        });
        for k in 0..2 {
            let angle = phase + k as f32 * std::f32::consts::PI;
            shapes.push(PortalShape {
                kind: ShapeKind::Disc,
                offset: Vec3::new(angle.cos() * 1.0, angle.sin() * 0.6, 0.5),
                scale: 0.22,
                spin: Vec3::new(0.0, 0.0, 1.5),
                color: accent,
            });
        }
        Self {
            index,
            anchor: tile_anchor_id(index),
            rect: WorldRect::default(),
            hover: 0.0,
            hover_target: 0.0,
            camera: OrthoCamera::new(PORTAL_FRUSTUM, 1.0),
            shapes,
            time: 0.0,
        }
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn rect(&self) -> WorldRect {
        self.rect
    }

    pub fn portal_camera(&self) -> &OrthoCamera {
        &self.camera
    }

    pub fn hover(&self) -> f32 {
        self.hover
    }

    fn update(&mut self, dt: f32, zoom_t: f32) {
        self.time += dt;
        self.hover = damp(self.hover, self.hover_target, TILE_HOVER_RATE, dt);
        self.camera.zoom = lerp(1.0, PORTAL_ZOOM_OPEN, zoom_t);
    }

    fn resize(&mut self, layout: &dyn LayoutSource, camera: &OrthoCamera) {
        let Some(rect) = layout.rect(&self.anchor) else {
            log::debug!("[tiles] #{} missing on resize", self.anchor);
            return;
        };
        let vp = layout.viewport();
        self.rect = rect_to_world(&rect, &vp, camera);
        self.camera.aspect = if rect.height > 0.0 {
            rect.width / rect.height
        } else {
            1.0
        };
    }

    fn portal_items(&self) -> Vec<DrawItem> {
        let spin = self.time * PORTAL_SPIN_SPEED;
        self.shapes
            .iter()
            .map(|s| {
                let rot = Quat::from_euler(
                    glam::EulerRot::XYZ,
                    s.spin.x * spin,
                    s.spin.y * spin,
                    s.spin.z * spin,
                );
                let orbit = Quat::from_rotation_z(spin * 0.5) * s.offset;
                let model = Mat4::from_scale_rotation_translation(Vec3::splat(s.scale), rot, orbit);
                match s.kind {
                    ShapeKind::Cube => DrawItem::new(MeshKind::Cube, model, s.color, ShadeMode::Lit),
                    ShapeKind::Disc => DrawItem::new(
                        MeshKind::Disc { segments: 24 },
                        model,
                        s.color,
                        ShadeMode::Flat,
                    ),
                }
            })
            .collect()
    }
}

/// All project tiles plus the single transition that opens one of them.
pub struct TileGallery {
    lifecycle: Lifecycle,
    tiles: Vec<ProjectTile>,
    transition: TransitionMachine,
    frame: TransitionFrame,
    target_base: u32,
}

impl TileGallery {
    pub fn new(count: usize, profile: &QualityProfile) -> Self {
        let mut lifecycle = Lifecycle::new();
        _ = lifecycle.begin_loading();
        let transition = TransitionMachine::new();
        let frame = transition.frame();
        Self {
            lifecycle,
            tiles: (0..count).map(ProjectTile::new).collect(),
            transition,
            frame,
            target_base: profile.render_target_base(),
        }
    }

    pub fn anchors(&self) -> Vec<String> {
        self.tiles.iter().map(|t| t.anchor.clone()).collect()
    }

    pub fn tiles(&self) -> &[ProjectTile] {
        &self.tiles
    }

    pub fn transition(&self) -> &TransitionMachine {
        &self.transition
    }

    /// Transition values computed during the last update.
    pub fn frame(&self) -> TransitionFrame {
        self.frame
    }

    pub fn request_open(&mut self, index: usize) -> Result<(), SceneError> {
        if !self.lifecycle.is_ready() || index >= self.tiles.len() {
            return Err(SceneError::MissingAnchor(tile_anchor_id(index)));
        }
        self.transition.open(index)?;
        log::info!("[tiles] opening tile {}", index);
        Ok(())
    }

    pub fn request_close(&mut self) -> Result<(), SceneError> {
        self.transition.close()
    }

    pub fn set_hovered(&mut self, index: Option<usize>) {
        for t in self.tiles.iter_mut() {
            t.hover_target = if Some(t.index) == index { 1.0 } else { 0.0 };
        }
    }

    /// Rect the main camera should frame, with linear progress toward it.
    pub fn focus(&self) -> Option<(WorldRect, f32)> {
        let tile = self.frame.active_tile?;
        let rect = self.tiles.get(tile)?.rect;
        Some((rect, self.frame.zoom_t))
    }

    /// Portal target dimensions for a tile with the given aspect ratio.
    fn target_size(&self, aspect: f32) -> (u32, u32) {
        let base = self.target_base as f32;
        if aspect >= 1.0 {
            (self.target_base, (base / aspect).round().max(1.0) as u32)
        } else {
            ((base * aspect).round().max(1.0) as u32, self.target_base)
        }
    }
}

impl AnimatedObject for TileGallery {
    fn name(&self) -> &str {
        "project-tiles"
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn update(&mut self, dt: f32) {
        if !self.lifecycle.is_ready() {
            return;
        }
        self.frame = self.transition.tick(dt);
        let active = self.frame.active_tile;
        let zoom_t = self.frame.zoom_t;
        for t in self.tiles.iter_mut() {
            let z = if Some(t.index) == active { zoom_t } else { 0.0 };
            t.update(dt, z);
        }
    }

    fn resize(&mut self, layout: &dyn LayoutSource, camera: &OrthoCamera) {
        for t in self.tiles.iter_mut() {
            t.resize(layout, camera);
        }
    }

    fn draw(&self, out: &mut DrawList) {
        if !self.lifecycle.is_ready() {
            return;
        }
        for t in &self.tiles {
            if t.rect.size.x <= 0.0 || t.rect.size.y <= 0.0 {
                continue;
            }
            let (width, height) = self.target_size(t.camera.aspect);
            out.portals.push(PortalPass {
                id: t.index,
                view_proj: t.camera.view_proj(),
                clear: PORTAL_CLEAR,
                width,
                height,
                items: t.portal_items(),
            });
            let lift = 1.0 + HOVER_LIFT * t.hover;
            let size = t.rect.size * lift;
            let model = Mat4::from_translation(t.rect.center.extend(0.1))
                * Mat4::from_scale(Vec3::new(size.x, size.y, 1.0));
            out.push(
                DrawItem::new(MeshKind::Quad, model, Vec4::ONE, ShadeMode::Textured)
                    .with_texture(TextureSource::Portal(t.index))
                    .with_params(t.hover, 0.0, 0.04),
            );
        }
    }
}

/// Zoom that makes `rect` fill the camera's view.
pub fn fit_zoom(rect: &WorldRect, camera: &OrthoCamera) -> f32 {
    let half = camera.half_extents() * camera.zoom;
    if rect.size.x <= 0.0 || rect.size.y <= 0.0 {
        return 1.0;
    }
    let zx = 2.0 * half.x / rect.size.x;
    let zy = 2.0 * half.y / rect.size.y;
    zx.min(zy).max(1.0)
}

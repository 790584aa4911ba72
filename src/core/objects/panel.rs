use glam::{Mat4, Vec2, Vec3, Vec4};

use super::{AnimatedObject, ScrollProbe};
use crate::constants::{PANEL_END_ID, PANEL_FRAME_ID, PANEL_START_ID};
use crate::core::camera::OrthoCamera;
use crate::core::config::SceneConfig;
use crate::core::constants::{PANEL_CORNER_RADIUS, PANEL_MIN_SCALE};
use crate::core::draw::{DrawItem, DrawList, MeshKind, ShadeMode, TextureSource};
use crate::core::lifecycle::Lifecycle;
use crate::core::mapper::{rect_to_world, LayoutSource, WorldRect};
use crate::core::math::{damp, inverse_lerp, lerp, lerp_color};
use crate::core::quality::QualityProfile;

/// Shader-driven panel that grows and re-tints as its scroll range passes.
///
/// The range starts when `#panel-start` enters the bottom of the viewport
/// and ends when `#panel-end` reaches the top.
pub struct VideoPanel {
    lifecycle: Lifecycle,
    scroll: ScrollProbe,
    rate: f32,
    start_color: Vec4,
    end_color: Vec4,
    video_enabled: bool,
    start: f32,
    end: f32,
    frame: WorldRect,
    full_width: f32,
    target: f32,
    percent: f32,
    time: f32,
}

impl VideoPanel {
    pub fn new(config: &SceneConfig, profile: &QualityProfile, scroll: ScrollProbe) -> Self {
        let mut lifecycle = Lifecycle::new();
        _ = lifecycle.begin_loading();
        Self {
            lifecycle,
            scroll,
            rate: config.panel_rate,
            start_color: config.panel_start_color,
            end_color: config.panel_end_color,
            video_enabled: profile.video_panel_enabled(),
            start: 0.0,
            end: 1.0,
            frame: WorldRect::default(),
            full_width: 0.0,
            target: 0.0,
            percent: 0.0,
            time: 0.0,
        }
    }

    pub fn anchors() -> [&'static str; 3] {
        [PANEL_START_ID, PANEL_END_ID, PANEL_FRAME_ID]
    }

    #[inline]
    pub fn percent(&self) -> f32 {
        self.percent
    }

    #[inline]
    pub fn target_percent(&self) -> f32 {
        self.target
    }

    /// Scroll offsets (px) bounding the animation.
    pub fn thresholds(&self) -> (f32, f32) {
        (self.start, self.end)
    }

    pub fn video_enabled(&self) -> bool {
        self.video_enabled
    }

    pub fn tint(&self) -> Vec4 {
        lerp_color(self.start_color, self.end_color, self.percent)
    }

    /// World rect the panel occupies at the current percent.
    pub fn world_rect(&self) -> WorldRect {
        let aspect = if self.frame.size.x > 0.0 {
            self.frame.size.y / self.frame.size.x
        } else {
            9.0 / 16.0
        };
        let width = lerp(
            self.frame.size.x * PANEL_MIN_SCALE,
            self.full_width.max(self.frame.size.x),
            self.percent,
        );
        WorldRect {
            center: self.frame.center,
            size: Vec2::new(width, width * aspect),
        }
    }
}

impl AnimatedObject for VideoPanel {
    fn name(&self) -> &str {
        "video-panel"
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
        self.time += dt;
        self.target = inverse_lerp(self.start, self.end, self.scroll.get());
        self.percent = damp(self.percent, self.target, self.rate, dt).clamp(0.0, 1.0);
    }

    fn resize(&mut self, layout: &dyn LayoutSource, camera: &OrthoCamera) {
        let vp = layout.viewport();
        let (Some(start), Some(end), Some(frame)) = (
            layout.rect(PANEL_START_ID),
            layout.rect(PANEL_END_ID),
            layout.rect(PANEL_FRAME_ID),
        ) else {
            log::debug!("[panel] anchors missing on resize");
            return;
        };
        self.start = start.doc_top(&vp) - vp.height;
        self.end = end.doc_top(&vp);
        self.frame = rect_to_world(&frame, &vp, camera);
        self.full_width = camera.half_extents().x * 2.0;
    }

    fn draw(&self, out: &mut DrawList) {
        if !self.lifecycle.is_ready() {
            return;
        }
        let rect = self.world_rect();
        let model = Mat4::from_scale_rotation_translation(
            Vec3::new(rect.size.x, rect.size.y, 1.0),
            glam::Quat::IDENTITY,
            rect.center.extend(-0.5),
        );
        let (mode, texture) = if self.video_enabled {
            (ShadeMode::Textured, TextureSource::Video)
        } else {
            (ShadeMode::Flat, TextureSource::None)
        };
        out.video_active |= self.video_enabled;
        out.push(
            DrawItem::new(MeshKind::Quad, model, self.tint(), mode)
                .with_texture(texture)
                .with_params(self.percent, self.time, PANEL_CORNER_RADIUS),
        );
    }
}

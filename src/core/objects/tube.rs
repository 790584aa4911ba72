use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};

use super::{AnimatedObject, ScrollProbe};
use crate::constants::{TUBE_END_ID, TUBE_START_ID};
use crate::core::camera::OrthoCamera;
use crate::core::config::SceneConfig;
use crate::core::constants::{
    TUBE_BASE_RADIAL, TUBE_BASE_SEGMENTS, TUBE_COLOR, TUBE_FLOW_SPEED, TUBE_RADIUS,
};
use crate::core::curve::{BezierPath, CubicBezier, CurveTable};
use crate::core::draw::{DrawItem, DrawList, MeshKind, ShadeMode};
use crate::core::lifecycle::Lifecycle;
use crate::core::mapper::{page_to_world, LayoutSource};
use crate::core::math::{damp, inverse_lerp};
use crate::core::quality::QualityProfile;

/// Curve control points in unit space: x across the viewport (-0.5..0.5),
/// y from the start anchor (0) down to the end anchor (-1).
const UNIT_PATH: [[f32; 2]; 7] = [
    [-0.42, 0.0],
    [-0.1, 0.05],
    [0.35, -0.2],
    [0.2, -0.45],
    [0.05, -0.7],
    [-0.4, -0.75],
    [0.38, -1.0],
];

/// A tube that bends from a straight line into a curve as the page scrolls
/// between `#tube-start` and `#tube-end`. Bending happens in the vertex stage
/// by sampling a baked curve table.
pub struct Tube {
    lifecycle: Lifecycle,
    scroll: ScrollProbe,
    rate: f32,
    samples: u32,
    segments: u32,
    radial: u32,
    table: Rc<CurveTable>,
    start: f32,
    end: f32,
    target: f32,
    progress: f32,
    flow: f32,
}

impl Tube {
    pub fn new(config: &SceneConfig, profile: &QualityProfile, scroll: ScrollProbe) -> Self {
        let mut lifecycle = Lifecycle::new();
        _ = lifecycle.begin_loading();
        let segments = profile.segments(TUBE_BASE_SEGMENTS, 32);
        Self {
            lifecycle,
            scroll,
            rate: config.tube_rate,
            samples: segments + 1,
            segments,
            radial: profile.segments(TUBE_BASE_RADIAL, 8),
            table: Rc::new(CurveTable::default()),
            start: 0.0,
            end: 1.0,
            target: 0.0,
            progress: 0.0,
            flow: 0.0,
        }
    }

    pub fn anchors() -> [&'static str; 2] {
        [TUBE_START_ID, TUBE_END_ID]
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    pub fn flow(&self) -> f32 {
        self.flow
    }

    pub fn table(&self) -> &CurveTable {
        &self.table
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// World-space path spanning `width` x `height` from `origin` downward.
    fn world_path(origin: Vec2, width: f32, height: f32) -> BezierPath {
        let p = |i: usize| {
            let [x, y] = UNIT_PATH[i];
            Vec3::new(x * width, origin.y + y * height, 0.0)
        };
        BezierPath::new(vec![
            CubicBezier {
                p0: p(0),
                p1: p(1),
                p2: p(2),
                p3: p(3),
            },
            CubicBezier {
                p0: p(3),
                p1: p(4),
                p2: p(5),
                p3: p(6),
            },
        ])
    }
}

impl AnimatedObject for Tube {
    fn name(&self) -> &str {
        "tube"
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
        self.target = inverse_lerp(self.start, self.end, self.scroll.get());
        self.progress = damp(self.progress, self.target, self.rate, dt).clamp(0.0, 1.0);
        self.flow = (self.flow + TUBE_FLOW_SPEED * dt).fract();
    }

    fn resize(&mut self, layout: &dyn LayoutSource, camera: &OrthoCamera) {
        let vp = layout.viewport();
        let (Some(start), Some(end)) = (layout.rect(TUBE_START_ID), layout.rect(TUBE_END_ID))
        else {
            log::debug!("[tube] anchors missing on resize");
            return;
        };
        let top = start.doc_top(&vp);
        let bottom = end.doc_top(&vp) + end.height;
        self.start = top - vp.height;
        self.end = end.doc_top(&vp) - vp.height * 0.5;

        let origin = page_to_world(Vec2::new(vp.width * 0.5, top), &vp, camera);
        let far = page_to_world(Vec2::new(vp.width * 0.5, bottom), &vp, camera);
        let width = camera.half_extents().x * 2.0;
        let height = (origin.y - far.y).max(0.0);
        self.table = Rc::new(Self::world_path(origin.truncate(), width, height).bake(self.samples));
    }

    fn draw(&self, out: &mut DrawList) {
        if !self.lifecycle.is_ready() || self.table.is_empty() {
            return;
        }
        out.curve = Some(self.table.clone());
        out.push(
            DrawItem::new(
                MeshKind::Tube {
                    segments: self.segments,
                    radial: self.radial,
                },
                Mat4::IDENTITY,
                TUBE_COLOR,
                ShadeMode::Tube,
            )
            .with_params(self.progress, self.flow, TUBE_RADIUS),
        );
    }
}

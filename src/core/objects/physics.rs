use glam::{Mat4, Vec2, Vec3, Vec4};
use rand::prelude::*;

use super::{AnimatedObject, ScrollProbe};
use crate::constants::PHYSICS_AREA_ID;
use crate::core::camera::OrthoCamera;
use crate::core::constants::*;
use crate::core::draw::{DrawItem, DrawList, MeshKind, ShadeMode};
use crate::core::lifecycle::Lifecycle;
use crate::core::mapper::{rect_to_world, LayoutSource, WorldRect};
use crate::core::quality::QualityProfile;

const PALETTE: [Vec4; 4] = [
    Vec4::new(0.95, 0.42, 0.32, 1.0),
    Vec4::new(0.36, 0.62, 1.0, 1.0),
    Vec4::new(0.98, 0.82, 0.3, 1.0),
    Vec4::new(0.5, 0.9, 0.62, 1.0),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Vec4,
}

impl Body {
    #[inline]
    fn inv_mass(&self) -> f32 {
        1.0 / (self.radius * self.radius)
    }
}

/// Circles dropped into a box that tracks the `#physics-area` element.
///
/// Bodies drop in the first time the area scrolls into view. Integration
/// runs at a fixed sub-step with a bounded catch-up per frame. The top of
/// the box is open so bodies can fall in.
pub struct PhysicsSandbox {
    lifecycle: Lifecycle,
    scroll: ScrollProbe,
    enabled: bool,
    body_count: usize,
    bodies: Vec<Body>,
    bounds: WorldRect,
    trigger: f32,
    dropped: bool,
    accumulator: f32,
    rng: StdRng,
    segments: u32,
}

impl PhysicsSandbox {
    pub fn new(profile: &QualityProfile, scroll: ScrollProbe) -> Self {
        let mut lifecycle = Lifecycle::new();
        _ = lifecycle.begin_loading();
        Self {
            lifecycle,
            scroll,
            enabled: profile.physics_enabled(),
            body_count: profile.physics_body_count(),
            bodies: Vec::new(),
            bounds: WorldRect::default(),
            trigger: f32::INFINITY,
            dropped: false,
            accumulator: 0.0,
            rng: StdRng::seed_from_u64(PHYSICS_SEED),
            segments: profile.segments(32, 12),
        }
    }

    pub fn anchors() -> [&'static str; 1] {
        [PHYSICS_AREA_ID]
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bounds(&self) -> WorldRect {
        self.bounds
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn has_dropped(&self) -> bool {
        self.dropped
    }

    /// Scroll offset (px) at which bodies drop in.
    pub fn trigger(&self) -> f32 {
        self.trigger
    }

    fn spawn(&mut self) {
        let min = self.bounds.center - self.bounds.size * 0.5;
        let width = self.bounds.size.x;
        let top = self.bounds.center.y + self.bounds.size.y * 0.5;
        self.bodies = (0..self.body_count)
            .map(|i| {
                let radius = self.rng.gen_range(PHYSICS_MIN_RADIUS..=PHYSICS_MAX_RADIUS);
                let span = (width - 2.0 * radius).max(0.0);
                let x = min.x + radius + self.rng.gen::<f32>() * span;
                let y = top + radius + i as f32 * PHYSICS_MAX_RADIUS;
                Body {
                    pos: Vec2::new(x, y),
                    vel: Vec2::new(self.rng.gen_range(-0.5..0.5), 0.0),
                    radius,
                    color: PALETTE[i % PALETTE.len()],
                }
            })
            .collect();
        log::info!("[physics] dropped {} bodies", self.bodies.len());
    }

    /// One fixed integration step.
    pub fn step(&mut self, h: f32) {
        let min = self.bounds.center - self.bounds.size * 0.5;
        let max = self.bounds.center + self.bounds.size * 0.5;

        for b in self.bodies.iter_mut() {
            b.vel.y += PHYSICS_GRAVITY * h;
            b.pos += b.vel * h;

            if b.pos.x - b.radius < min.x {
                b.pos.x = min.x + b.radius;
                b.vel.x = -b.vel.x * PHYSICS_RESTITUTION;
            } else if b.pos.x + b.radius > max.x {
                b.pos.x = max.x - b.radius;
                b.vel.x = -b.vel.x * PHYSICS_RESTITUTION;
            }
            if b.pos.y - b.radius < min.y {
                b.pos.y = min.y + b.radius;
                b.vel.y = -b.vel.y * PHYSICS_RESTITUTION;
                b.vel.x *= PHYSICS_WALL_FRICTION;
            }
        }

        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.bodies.split_at_mut(j);
                resolve_pair(&mut head[i], &mut tail[0]);
            }
        }

        // Pair resolution may push bodies back through a wall.
        self.confine();
    }

    fn confine(&mut self) {
        let min = self.bounds.center - self.bounds.size * 0.5;
        let max = self.bounds.center + self.bounds.size * 0.5;
        for b in self.bodies.iter_mut() {
            b.pos.x = b.pos.x.clamp(min.x + b.radius, (max.x - b.radius).max(min.x + b.radius));
            b.pos.y = b.pos.y.max(min.y + b.radius);
        }
    }
}

fn resolve_pair(a: &mut Body, b: &mut Body) {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let reach = a.radius + b.radius;
    if dist >= reach {
        return;
    }
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::Y };
    let (ia, ib) = (a.inv_mass(), b.inv_mass());
    let total = ia + ib;

    let overlap = reach - dist;
    a.pos -= normal * (overlap * ia / total);
    b.pos += normal * (overlap * ib / total);

    let vn = (b.vel - a.vel).dot(normal);
    if vn < 0.0 {
        let j = -(1.0 + PHYSICS_RESTITUTION) * vn / total;
        a.vel -= normal * (j * ia);
        b.vel += normal * (j * ib);
    }
}

impl AnimatedObject for PhysicsSandbox {
    fn name(&self) -> &str {
        "physics-sandbox"
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn update(&mut self, dt: f32) {
        if !self.lifecycle.is_ready() || !self.enabled {
            return;
        }
        if !self.dropped && self.scroll.get() >= self.trigger {
            self.dropped = true;
            self.spawn();
        }
        if self.bodies.is_empty() {
            return;
        }
        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= PHYSICS_STEP_SEC && steps < PHYSICS_MAX_STEPS {
            self.step(PHYSICS_STEP_SEC);
            self.accumulator -= PHYSICS_STEP_SEC;
            steps += 1;
        }
        if steps == PHYSICS_MAX_STEPS {
            // Drop the backlog rather than spiral after a long stall.
            self.accumulator = 0.0;
        }
    }

    fn resize(&mut self, layout: &dyn LayoutSource, camera: &OrthoCamera) {
        let vp = layout.viewport();
        let Some(area) = layout.rect(PHYSICS_AREA_ID) else {
            log::debug!("[physics] #{} missing on resize", PHYSICS_AREA_ID);
            return;
        };
        self.bounds = rect_to_world(&area, &vp, camera);
        self.trigger = area.doc_top(&vp) - vp.height * 0.75;
        self.confine();
    }

    fn draw(&self, out: &mut DrawList) {
        if !self.lifecycle.is_ready() || !self.enabled {
            return;
        }
        let mesh = MeshKind::Disc {
            segments: self.segments,
        };
        for b in &self.bodies {
            let model = Mat4::from_translation(b.pos.extend(0.2))
                * Mat4::from_scale(Vec3::new(b.radius, b.radius, 1.0));
            out.push(DrawItem::new(mesh, model, b.color, ShadeMode::Flat));
        }
    }
}

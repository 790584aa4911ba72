// Host-side tests for the physics sandbox.

mod common;

use common::FakeLayout;
use scroll_scene::constants::PHYSICS_AREA_ID;
use scroll_scene::core::objects::{AnimatedObject, PhysicsSandbox, ScrollProbe};
use scroll_scene::core::*;

fn high() -> QualityProfile {
    QualityProfile {
        tier: QualityTier::High,
        source: TierSource::Override,
        score: None,
    }
}

fn layout() -> FakeLayout {
    FakeLayout::new(800.0, 600.0, 0.0).with_doc_rect(PHYSICS_AREA_ID, 100.0, 1000.0, 600.0, 400.0)
}

fn sandbox(probe: &ScrollProbe) -> PhysicsSandbox {
    let l = layout();
    let mut cam = OrthoCamera::new(DEFAULT_FRUSTUM_SIZE, 1.0);
    cam.set_viewport(800.0, 600.0);
    let mut s = PhysicsSandbox::new(&high(), probe.clone());
    s.lifecycle_mut().mark_ready().unwrap();
    s.resize(&l, &cam);
    s
}

#[test]
fn bodies_drop_once_area_scrolls_into_view() {
    let probe = ScrollProbe::new(0.0);
    let mut s = sandbox(&probe);
    assert_eq!(s.trigger(), 1000.0 - 450.0);

    s.update(0.016);
    assert!(!s.has_dropped());
    assert!(s.bodies().is_empty());

    probe.set(600.0);
    s.update(0.016);
    assert!(s.has_dropped());
    assert_eq!(s.bodies().len(), high().physics_body_count());
}

#[test]
fn bodies_stay_inside_the_box() {
    let probe = ScrollProbe::new(2000.0);
    let mut s = sandbox(&probe);
    for _ in 0..900 {
        s.update(1.0 / 60.0);
    }
    let b = s.bounds();
    let min = b.center - b.size * 0.5;
    let max = b.center + b.size * 0.5;
    for body in s.bodies() {
        assert!(body.pos.x - body.radius >= min.x - 1e-3, "{body:?}");
        assert!(body.pos.x + body.radius <= max.x + 1e-3, "{body:?}");
        assert!(body.pos.y - body.radius >= min.y - 1e-3, "{body:?}");
        assert!(body.pos.is_finite());
    }
}

#[test]
fn simulation_is_deterministic() {
    let probe = ScrollProbe::new(2000.0);
    let mut a = sandbox(&probe);
    let mut b = sandbox(&probe);
    for _ in 0..120 {
        a.update(1.0 / 60.0);
        b.update(1.0 / 60.0);
    }
    assert_eq!(a.bodies(), b.bodies());
}

#[test]
fn long_stall_is_bounded() {
    let probe = ScrollProbe::new(2000.0);
    let mut s = sandbox(&probe);
    for _ in 0..60 {
        s.update(1.0 / 60.0);
    }
    let before: Vec<_> = s.bodies().to_vec();
    // Catch-up is capped, so a ten second stall moves bodies only a little.
    s.update(10.0);
    for (old, new) in before.iter().zip(s.bodies()) {
        assert!((new.pos - old.pos).length() < 2.0);
    }
}

#[test]
fn low_tier_disables_simulation() {
    let probe = ScrollProbe::new(2000.0);
    let mut s = PhysicsSandbox::new(&QualityProfile::fallback(), probe);
    s.lifecycle_mut().mark_ready().unwrap();
    s.update(0.016);
    assert!(!s.is_enabled());
    assert!(s.bodies().is_empty());
    let mut list = DrawList::default();
    s.draw(&mut list);
    assert!(list.is_empty());
}

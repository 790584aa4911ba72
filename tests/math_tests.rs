// Host-side tests for interpolation helpers and curve baking.

use glam::{Vec3, Vec4};
use scroll_scene::core::curve::{BezierPath, CubicBezier};
use scroll_scene::core::math::*;

#[test]
fn inverse_lerp_clamps_exactly() {
    assert_eq!(inverse_lerp(100.0, 300.0, 50.0), 0.0);
    assert_eq!(inverse_lerp(100.0, 300.0, 300.0), 1.0);
    assert_eq!(inverse_lerp(100.0, 300.0, 1e6), 1.0);
    assert!((inverse_lerp(100.0, 300.0, 200.0) - 0.5).abs() < 1e-6);
}

#[test]
fn inverse_lerp_degenerate_range_is_a_step() {
    assert_eq!(inverse_lerp(10.0, 10.0, 9.99), 0.0);
    assert_eq!(inverse_lerp(10.0, 10.0, 10.0), 1.0);
}

#[test]
fn damp_never_overshoots() {
    let mut v = 0.0;
    for _ in 0..100 {
        v = damp(v, 1.0, 6.0, 0.016);
        assert!(v <= 1.0);
    }
    assert!(v > 0.99);
    // A huge step lands exactly on the target.
    assert_eq!(damp(0.2, 0.8, 6.0, 10.0), 0.8);
    // Negative dt is treated as no time passing.
    assert_eq!(damp(0.2, 0.8, 6.0, -1.0), 0.2);
}

#[test]
fn damp_from_above_never_moves_away() {
    let target = 0.25;
    for (rate, dt) in [(6.0, 0.016), (6.0, 0.0), (50.0, 3.0), (6.0, -0.5)] {
        let mut v = 4.0;
        for _ in 0..20 {
            let next = damp(v, target, rate, dt);
            assert!((next - target).abs() <= (v - target).abs(), "rate {rate} dt {dt}: {v} -> {next}");
            assert!(next >= target);
            v = next;
        }
    }
    assert_eq!(damp(4.0, target, 6.0, 0.0), 4.0);
    assert_eq!(damp(4.0, target, 50.0, 3.0), target);
}

#[test]
fn smoothstep_endpoints_and_midpoint() {
    assert_eq!(smoothstep(-1.0), 0.0);
    assert_eq!(smoothstep(2.0), 1.0);
    assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
}

#[test]
fn lerp_color_clamps_t() {
    let a = Vec4::ZERO;
    let b = Vec4::ONE;
    assert_eq!(lerp_color(a, b, 2.0), b);
    assert_eq!(lerp_color(a, b, -1.0), a);
    assert!((lerp(2.0, 4.0, 0.25) - 2.5).abs() < 1e-6);
}

#[test]
fn baked_curve_hits_both_ends() {
    let seg = CubicBezier {
        p0: Vec3::new(0.0, 0.0, 0.0),
        p1: Vec3::new(1.0, 0.0, 0.0),
        p2: Vec3::new(2.0, -1.0, 0.0),
        p3: Vec3::new(3.0, -1.0, 0.0),
    };
    let path = BezierPath::new(vec![seg]);
    let table = path.bake(17);
    assert_eq!(table.len(), 17);
    assert!((table.positions[0] - seg.p0).length() < 1e-5);
    assert!((table.positions[16] - seg.p3).length() < 1e-5);
    for t in &table.tangents {
        assert!((t.length() - 1.0).abs() < 1e-4);
    }
    // Two rows: positions then tangents.
    assert_eq!(table.texels().len(), 34);
    assert!((table.sample(1.0) - seg.p3).length() < 1e-5);
}

#[test]
fn bake_enforces_two_samples() {
    let path = BezierPath::new(Vec::new());
    let table = path.bake(0);
    assert_eq!(table.len(), 2);
    assert_eq!(table.sample(0.5), Vec3::ZERO);
}

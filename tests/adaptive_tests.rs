// Host-side tests for frame-budget driven resolution scaling.

use scroll_scene::core::*;

#[test]
fn starts_at_tier_clamp() {
    let a = AdaptiveResolution::new(2.0);
    assert_eq!(a.dpr(), 2.0);
    assert!((a.average_frame_sec() - FRAME_BUDGET_SEC).abs() < 1e-6);
}

#[test]
fn sustained_overrun_steps_down_and_counts_skips() {
    let counters = DebugCounters::default();
    let mut a = AdaptiveResolution::new(2.0);
    let mut changes = Vec::new();
    for _ in 0..(OVER_BUDGET_FRAMES * 3) {
        if let Some(dpr) = a.record(0.05, &counters) {
            changes.push(dpr);
        }
    }
    assert!(!changes.is_empty());
    assert!(a.dpr() < 2.0);
    assert_eq!(counters.effective_dpr.get(), a.dpr());
    assert_eq!(counters.frame_skips.get() as usize, changes.len());
    assert_eq!(counters.frames.get(), (OVER_BUDGET_FRAMES * 3) as u64);
}

#[test]
fn never_drops_below_floor() {
    let counters = DebugCounters::default();
    let mut a = AdaptiveResolution::new(2.5);
    for _ in 0..5000 {
        a.record(0.1, &counters);
    }
    assert_eq!(a.dpr(), DPR_FLOOR);
}

#[test]
fn headroom_recovers_but_never_exceeds_clamp() {
    let counters = DebugCounters::default();
    let mut a = AdaptiveResolution::new(1.5);
    for _ in 0..500 {
        a.record(0.1, &counters);
    }
    assert!(a.dpr() < 1.5);
    for _ in 0..(UNDER_BUDGET_FRAMES * 20) {
        a.record(0.004, &counters);
    }
    assert_eq!(a.dpr(), 1.5);
}

#[test]
fn stalls_are_ignored() {
    let counters = DebugCounters::default();
    let mut a = AdaptiveResolution::new(2.0);
    let before = a.average_frame_sec();
    assert_eq!(a.record(3.0, &counters), None);
    assert_eq!(a.average_frame_sec(), before);
    // Still counted as a frame for the overlay.
    assert_eq!(counters.frames.get(), 1);
}

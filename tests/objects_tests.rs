// Host-side tests for the scroll-driven panel and tube.

mod common;

use common::{approx, FakeLayout};
use scroll_scene::constants::*;
use scroll_scene::core::objects::{AnimatedObject, ScrollProbe, Tube, VideoPanel};
use scroll_scene::core::*;

fn profile(tier: QualityTier) -> QualityProfile {
    QualityProfile {
        tier,
        source: TierSource::Override,
        score: None,
    }
}

fn camera_for(layout: &FakeLayout) -> OrthoCamera {
    let mut cam = OrthoCamera::new(DEFAULT_FRUSTUM_SIZE, 1.0);
    cam.set_viewport(layout.viewport.width, layout.viewport.height);
    cam
}

fn panel_layout(scroll: f32) -> FakeLayout {
    FakeLayout::new(800.0, 600.0, scroll)
        .with_doc_rect(PANEL_START_ID, 0.0, 1200.0, 800.0, 10.0)
        .with_doc_rect(PANEL_END_ID, 0.0, 2000.0, 800.0, 10.0)
        .with_doc_rect(PANEL_FRAME_ID, 200.0, 1400.0, 400.0, 225.0)
}

fn ready_panel(probe: &ScrollProbe) -> VideoPanel {
    let layout = panel_layout(0.0);
    let mut panel = VideoPanel::new(&SceneConfig::default(), &profile(QualityTier::High), probe.clone());
    panel.lifecycle_mut().mark_ready().unwrap();
    panel.resize(&layout, &camera_for(&layout));
    panel
}

#[test]
fn panel_thresholds_follow_anchors() {
    let probe = ScrollProbe::new(0.0);
    let panel = ready_panel(&probe);
    // Start when the start anchor enters the bottom edge, end when the end
    // anchor reaches the top.
    assert_eq!(panel.thresholds(), (600.0, 2000.0));
}

#[test]
fn panel_thresholds_do_not_depend_on_scroll_at_measure_time() {
    let probe = ScrollProbe::new(0.0);
    let mut panel = VideoPanel::new(&SceneConfig::default(), &profile(QualityTier::High), probe);
    for scroll in [0.0, 500.0, 1700.0] {
        let layout = panel_layout(scroll);
        panel.resize(&layout, &camera_for(&layout));
        assert_eq!(panel.thresholds(), (600.0, 2000.0));
    }
}

#[test]
fn panel_percent_clamps_at_range_ends() {
    let probe = ScrollProbe::new(0.0);
    let mut panel = ready_panel(&probe);

    probe.set(100.0);
    panel.update(1.0);
    assert_eq!(panel.target_percent(), 0.0);
    assert_eq!(panel.percent(), 0.0);

    probe.set(5000.0);
    panel.update(1.0);
    assert_eq!(panel.target_percent(), 1.0);
    assert_eq!(panel.percent(), 1.0);
}

#[test]
fn short_section_is_finished_two_screens_down() {
    // The whole section fits above the second screen.
    let layout = FakeLayout::new(800.0, 600.0, 0.0)
        .with_doc_rect(PANEL_START_ID, 0.0, 300.0, 800.0, 10.0)
        .with_doc_rect(PANEL_END_ID, 0.0, 1000.0, 800.0, 10.0)
        .with_doc_rect(PANEL_FRAME_ID, 200.0, 400.0, 400.0, 225.0);
    let probe = ScrollProbe::new(0.0);
    let mut panel = VideoPanel::new(&SceneConfig::default(), &profile(QualityTier::High), probe.clone());
    panel.lifecycle_mut().mark_ready().unwrap();
    panel.resize(&layout, &camera_for(&layout));
    assert_eq!(panel.thresholds(), (-300.0, 1000.0));

    probe.set(2.0 * layout.viewport.height);
    panel.update(1.0);
    assert_eq!(panel.target_percent(), 1.0);
    assert_eq!(panel.percent(), 1.0);
    let tint = panel.tint();
    assert!((tint - PANEL_END_COLOR).abs().max_element() < 1e-5, "{tint:?}");
}

#[test]
fn panel_percent_eases_toward_target() {
    let probe = ScrollProbe::new(1300.0);
    let mut panel = ready_panel(&probe);
    panel.update(0.016);
    assert!(approx(panel.target_percent(), 0.5));
    assert!(panel.percent() > 0.0 && panel.percent() < 0.5);
    for _ in 0..600 {
        panel.update(0.016);
        assert!(panel.percent() <= 0.5 + 1e-6);
    }
    assert!((panel.percent() - 0.5).abs() < 1e-3);
}

#[test]
fn panel_is_inert_until_ready() {
    let probe = ScrollProbe::new(5000.0);
    let layout = panel_layout(0.0);
    let mut panel = VideoPanel::new(&SceneConfig::default(), &profile(QualityTier::High), probe);
    panel.resize(&layout, &camera_for(&layout));
    panel.update(1.0);
    assert_eq!(panel.percent(), 0.0);
    assert_eq!(panel.state(), ObjectState::Loading);

    let mut list = DrawList::default();
    panel.draw(&mut list);
    assert!(list.is_empty());
}

#[test]
fn panel_grows_and_retints() {
    let probe = ScrollProbe::new(0.0);
    let mut panel = ready_panel(&probe);
    let small = panel.world_rect();
    let start_tint = panel.tint();
    probe.set(5000.0);
    panel.update(1.0);
    let big = panel.world_rect();
    assert!(big.size.x > small.size.x);
    assert_eq!(start_tint, PANEL_START_COLOR);
    assert!((panel.tint() - PANEL_END_COLOR).abs().max_element() < 1e-5);
}

#[test]
fn panel_draws_video_only_when_tier_allows() {
    let probe = ScrollProbe::new(0.0);
    let panel = ready_panel(&probe);
    let mut list = DrawList::default();
    panel.draw(&mut list);
    assert!(list.video_active);
    assert_eq!(list.items[0].texture, TextureSource::Video);

    let layout = panel_layout(0.0);
    let mut low = VideoPanel::new(&SceneConfig::default(), &profile(QualityTier::Low), probe);
    low.lifecycle_mut().mark_ready().unwrap();
    low.resize(&layout, &camera_for(&layout));
    let mut list = DrawList::default();
    low.draw(&mut list);
    assert!(!low.video_enabled());
    assert!(!list.video_active);
    assert_eq!(list.items[0].texture, TextureSource::None);
}

#[test]
fn resize_is_idempotent() {
    let probe = ScrollProbe::new(900.0);
    let mut panel = ready_panel(&probe);
    let layout = panel_layout(0.0);
    let cam = camera_for(&layout);
    let (t1, r1) = (panel.thresholds(), panel.world_rect());
    panel.resize(&layout, &cam);
    panel.resize(&layout, &cam);
    assert_eq!(panel.thresholds(), t1);
    assert_eq!(panel.world_rect(), r1);
}

#[test]
fn missing_anchor_keeps_previous_layout() {
    let probe = ScrollProbe::new(0.0);
    let mut panel = ready_panel(&probe);
    let before = panel.thresholds();
    let empty = FakeLayout::new(800.0, 600.0, 0.0);
    panel.resize(&empty, &camera_for(&empty));
    assert_eq!(panel.thresholds(), before);
}

fn tube_layout() -> FakeLayout {
    FakeLayout::new(800.0, 600.0, 0.0)
        .with_doc_rect(TUBE_START_ID, 0.0, 600.0, 800.0, 10.0)
        .with_doc_rect(TUBE_END_ID, 0.0, 1800.0, 800.0, 100.0)
}

#[test]
fn tube_bakes_curve_per_tier() {
    let layout = tube_layout();
    let mut tube = Tube::new(&SceneConfig::default(), &profile(QualityTier::High), ScrollProbe::new(0.0));
    tube.resize(&layout, &camera_for(&layout));
    assert_eq!(tube.segments(), TUBE_BASE_SEGMENTS);
    assert_eq!(tube.table().len(), TUBE_BASE_SEGMENTS as usize + 1);

    let low = Tube::new(&SceneConfig::default(), &profile(QualityTier::Low), ScrollProbe::new(0.0));
    assert!(low.segments() < tube.segments());
}

#[test]
fn tube_progress_tracks_scroll() {
    let layout = tube_layout();
    let probe = ScrollProbe::new(0.0);
    let mut tube = Tube::new(&SceneConfig::default(), &profile(QualityTier::Medium), probe.clone());
    tube.lifecycle_mut().mark_ready().unwrap();
    tube.resize(&layout, &camera_for(&layout));

    tube.update(1.0);
    assert_eq!(tube.progress(), 0.0);

    probe.set(3000.0);
    tube.update(1.0);
    assert_eq!(tube.progress(), 1.0);
    assert!(tube.flow() >= 0.0 && tube.flow() < 1.0);

    let mut list = DrawList::default();
    tube.draw(&mut list);
    assert!(list.curve.is_some());
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].params.x, 1.0);
    assert_eq!(list.items[0].params.w, ShadeMode::Tube as u32 as f32);
}

#[test]
fn tube_skips_draw_before_layout() {
    let mut tube = Tube::new(&SceneConfig::default(), &profile(QualityTier::High), ScrollProbe::new(0.0));
    tube.lifecycle_mut().mark_ready().unwrap();
    let mut list = DrawList::default();
    tube.draw(&mut list);
    assert!(list.is_empty());
}

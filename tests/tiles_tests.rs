// Host-side tests for project tiles and their portal scenes.

mod common;

use common::{approx, FakeLayout};
use scroll_scene::constants::tile_anchor_id;
use scroll_scene::core::objects::{tiles::fit_zoom, AnimatedObject, TileGallery};
use scroll_scene::core::*;

fn profile() -> QualityProfile {
    QualityProfile {
        tier: QualityTier::Medium,
        source: TierSource::Override,
        score: None,
    }
}

fn layout() -> FakeLayout {
    (0..4).fold(FakeLayout::new(800.0, 600.0, 0.0), |l, i| {
        l.with_doc_rect(&tile_anchor_id(i), 40.0 + i as f32 * 190.0, 3000.0, 160.0, 120.0)
    })
}

fn camera() -> OrthoCamera {
    let mut cam = OrthoCamera::new(DEFAULT_FRUSTUM_SIZE, 1.0);
    cam.set_viewport(800.0, 600.0);
    cam
}

fn ready_gallery() -> TileGallery {
    let mut g = TileGallery::new(4, &profile());
    g.lifecycle_mut().mark_ready().unwrap();
    g.resize(&layout(), &camera());
    g
}

#[test]
fn anchors_follow_tile_index() {
    let g = TileGallery::new(3, &profile());
    assert_eq!(
        g.anchors(),
        vec!["project-tile-0", "project-tile-1", "project-tile-2"]
    );
}

#[test]
fn open_requires_ready_and_valid_index() {
    let mut g = TileGallery::new(4, &profile());
    assert!(matches!(g.request_open(0), Err(SceneError::MissingAnchor(_))));
    g.lifecycle_mut().mark_ready().unwrap();
    assert!(matches!(g.request_open(9), Err(SceneError::MissingAnchor(_))));
    assert!(g.request_open(1).is_ok());
    assert!(matches!(g.request_open(2), Err(SceneError::TransitionBusy)));
}

#[test]
fn each_tile_renders_a_portal_then_its_face() {
    let mut g = ready_gallery();
    g.update(0.016);
    let mut list = DrawList::default();
    g.draw(&mut list);
    assert_eq!(list.portals.len(), 4);
    assert_eq!(list.items.len(), 4);
    for (i, item) in list.items.iter().enumerate() {
        assert_eq!(item.texture, TextureSource::Portal(i));
    }
    let base = profile().render_target_base();
    for p in &list.portals {
        assert!(!p.items.is_empty());
        // 160x120 tiles are wider than tall.
        assert_eq!(p.width, base);
        assert_eq!(p.height, (base as f32 * 120.0 / 160.0).round() as u32);
    }
}

#[test]
fn tiles_without_layout_are_skipped() {
    let mut g = TileGallery::new(2, &profile());
    g.lifecycle_mut().mark_ready().unwrap();
    let mut list = DrawList::default();
    g.draw(&mut list);
    assert!(list.is_empty());
}

#[test]
fn hover_eases_in_and_out() {
    let mut g = ready_gallery();
    g.set_hovered(Some(2));
    for _ in 0..120 {
        g.update(1.0 / 60.0);
    }
    assert!(g.tiles()[2].hover() > 0.9);
    assert!(g.tiles()[0].hover() < 1e-6);
    g.set_hovered(None);
    for _ in 0..120 {
        g.update(1.0 / 60.0);
    }
    assert!(g.tiles()[2].hover() < 0.1);
}

#[test]
fn opening_zooms_only_the_active_portal() {
    let mut g = ready_gallery();
    g.request_open(3).unwrap();
    g.update(5.0);
    assert_eq!(g.frame().active_tile, Some(3));
    assert_eq!(g.transition().state(), TransitionState::Open { tile: 3 });
    assert!(approx(g.tiles()[3].portal_camera().zoom, PORTAL_ZOOM_OPEN));
    assert!(approx(g.tiles()[0].portal_camera().zoom, 1.0));

    let (rect, t) = g.focus().unwrap();
    assert_eq!(rect, g.tiles()[3].rect());
    assert_eq!(t, 1.0);

    g.request_close().unwrap();
    g.update(5.0);
    assert!(g.focus().is_none());
    assert!(approx(g.tiles()[3].portal_camera().zoom, 1.0));
}

#[test]
fn fit_zoom_fills_the_view() {
    let cam = camera();
    let rect = WorldRect {
        center: glam::Vec2::ZERO,
        size: glam::Vec2::new(2.0 * 800.0 / 600.0, 2.0),
    };
    assert!(approx(fit_zoom(&rect, &cam), 5.0));
    // Never zooms out past the base framing.
    let huge = WorldRect {
        center: glam::Vec2::ZERO,
        size: glam::Vec2::splat(100.0),
    };
    assert_eq!(fit_zoom(&huge, &cam), 1.0);
}

// Host-side tests for the scene coordinator.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{approx, FakeLayout};
use scroll_scene::constants::*;
use scroll_scene::core::objects::*;
use scroll_scene::core::*;

struct Fixture {
    scene: SceneCoordinator,
    tube: Rc<RefCell<Tube>>,
    panel: Rc<RefCell<VideoPanel>>,
    physics: Rc<RefCell<PhysicsSandbox>>,
    gallery: Rc<RefCell<TileGallery>>,
}

fn layout(scroll: f32) -> FakeLayout {
    let l = FakeLayout::new(800.0, 600.0, scroll)
        .with_doc_rect(TUBE_START_ID, 0.0, 600.0, 800.0, 10.0)
        .with_doc_rect(TUBE_END_ID, 0.0, 1800.0, 800.0, 100.0)
        .with_doc_rect(PANEL_START_ID, 0.0, 1200.0, 800.0, 10.0)
        .with_doc_rect(PANEL_END_ID, 0.0, 2000.0, 800.0, 10.0)
        .with_doc_rect(PANEL_FRAME_ID, 200.0, 1400.0, 400.0, 225.0)
        .with_doc_rect(PHYSICS_AREA_ID, 100.0, 2400.0, 600.0, 400.0);
    (0..TILE_COUNT).fold(l, |l, i| {
        l.with_doc_rect(&tile_anchor_id(i), 40.0 + i as f32 * 190.0, 3000.0, 160.0, 120.0)
    })
}

fn fixture() -> Fixture {
    let config = SceneConfig::default();
    let profile = QualityProfile {
        tier: QualityTier::High,
        source: TierSource::Override,
        score: None,
    };
    let vp = layout(0.0).viewport;
    let mut scene = SceneCoordinator::new(&config, vp);

    let probe = ScrollProbe::new(0.0);
    let tube = Rc::new(RefCell::new(Tube::new(&config, &profile, probe.clone())));
    let panel = Rc::new(RefCell::new(VideoPanel::new(&config, &profile, probe.clone())));
    let physics = Rc::new(RefCell::new(PhysicsSandbox::new(&profile, probe)));
    let gallery = Rc::new(RefCell::new(TileGallery::new(config.tile_count, &profile)));

    scene.register(tube.clone());
    scene.register(panel.clone());
    scene.register(physics.clone());
    scene.register_gallery(gallery.clone());
    Fixture {
        scene,
        tube,
        panel,
        physics,
        gallery,
    }
}

fn mark_all_ready(f: &Fixture) {
    f.tube.borrow_mut().lifecycle_mut().mark_ready().unwrap();
    f.panel.borrow_mut().lifecycle_mut().mark_ready().unwrap();
    f.physics.borrow_mut().lifecycle_mut().mark_ready().unwrap();
    f.gallery.borrow_mut().lifecycle_mut().mark_ready().unwrap();
}

#[test]
fn registration_order_is_preserved() {
    let f = fixture();
    assert_eq!(
        f.scene.object_names(),
        vec!["tube", "video-panel", "physics-sandbox", "project-tiles"]
    );
    assert_eq!(f.scene.len(), 4);
}

#[test]
fn scrolling_moves_the_camera_down() {
    let mut f = fixture();
    f.scene.scroll(600.0);
    assert!(approx(f.scene.camera().position.y, -DEFAULT_FRUSTUM_SIZE));
    assert_eq!(f.scene.viewport().scroll_y, 600.0);
}

#[test]
fn nothing_draws_until_objects_are_ready() {
    let mut f = fixture();
    f.scene.resize(&layout(0.0));
    assert!(f.scene.tick(0.016).is_empty());

    mark_all_ready(&f);
    let list = f.scene.tick(0.016);
    // Tube, panel, then one face per tile; physics waits for its trigger.
    assert_eq!(list.items.len(), 2 + TILE_COUNT);
    assert_eq!(list.portals.len(), TILE_COUNT);
    assert_eq!(list.items[0].params.w, ShadeMode::Tube as u32 as f32);
    assert_eq!(list.items[1].texture, TextureSource::Video);
}

#[test]
fn clock_accumulates_time() {
    let mut f = fixture();
    f.scene.tick(0.5);
    f.scene.tick(0.25);
    assert!(approx(f.scene.clock().elapsed(), 0.75));
    assert!(approx(f.scene.clock().delta(), 0.25));
}

#[test]
fn open_tile_frames_the_render_camera() {
    let mut f = fixture();
    mark_all_ready(&f);
    f.scene.resize(&layout(0.0));
    f.gallery.borrow_mut().request_open(0).unwrap();
    f.scene.tick(5.0);

    let rect = f.gallery.borrow().tiles()[0].rect();
    let cam = f.scene.render_camera();
    assert!(approx(cam.position.x, rect.center.x));
    assert!(approx(cam.position.y, rect.center.y));
    assert!(approx(cam.zoom, 5.0));
    // Layout mapping keeps using the unframed camera.
    assert_eq!(f.scene.camera().zoom, 1.0);

    f.gallery.borrow_mut().request_close().unwrap();
    f.scene.tick(5.0);
    assert_eq!(f.scene.render_camera(), f.scene.camera());
}

#[test]
fn resize_reads_viewport_and_scroll() {
    let mut f = fixture();
    mark_all_ready(&f);
    let wide = FakeLayout {
        viewport: Viewport {
            width: 1600.0,
            height: 600.0,
            scroll_y: 300.0,
        },
        ..layout(300.0)
    };
    f.scene.resize(&wide);
    assert!(approx(f.scene.camera().aspect, 1600.0 / 600.0));
    assert!(approx(f.scene.camera().position.y, -5.0));
    assert_eq!(f.panel.borrow().thresholds(), (600.0, 2000.0));
}

#[test]
fn destroy_tears_everything_down() {
    let mut f = fixture();
    mark_all_ready(&f);
    f.scene.resize(&layout(0.0));
    f.scene.destroy();
    assert!(f.scene.is_destroyed());
    assert!(f.scene.is_empty());
    assert_eq!(f.tube.borrow().state(), ObjectState::TornDown);
    assert_eq!(f.panel.borrow().state(), ObjectState::TornDown);
    assert_eq!(f.physics.borrow().state(), ObjectState::TornDown);
    assert_eq!(f.gallery.borrow().state(), ObjectState::TornDown);
    assert!(f.scene.tick(0.016).is_empty());
}

#[test]
fn activation_maps_at_the_measured_scroll() {
    let mut f = fixture();
    // The camera last saw offset 0; the page has since scrolled without a flush.
    let behind = layout(1000.0);
    let shared: SharedObject = f.gallery.clone();
    f.scene.activate(&shared, &behind).unwrap();

    assert_eq!(f.gallery.borrow().state(), ObjectState::Ready);
    assert_eq!(f.scene.viewport().scroll_y, 1000.0);
    let mut synced = OrthoCamera::new(DEFAULT_FRUSTUM_SIZE, 1.0);
    synced.set_viewport(800.0, 600.0);
    synced.position.y = -1000.0 / 600.0 * DEFAULT_FRUSTUM_SIZE;
    let page = behind.rect(&tile_anchor_id(0)).unwrap();
    let expected = rect_to_world(&page, &behind.viewport, &synced);

    let got = f.gallery.borrow().tiles()[0].rect();
    assert!(approx(got.center.x, expected.center.x));
    assert!(approx(got.center.y, expected.center.y));
    assert!(approx(got.center.y, -46.0));
}

#[test]
fn activation_after_destroy_is_refused() {
    let mut f = fixture();
    let shared: SharedObject = f.panel.clone();
    f.scene.destroy();
    assert!(f.scene.activate(&shared, &layout(0.0)).is_err());
    assert_eq!(f.panel.borrow().state(), ObjectState::TornDown);
}

#[test]
fn flushed_scroll_reaches_the_same_frame() {
    let f = fixture();
    mark_all_ready(&f);
    let scene = Rc::new(RefCell::new(f.scene));
    scene.borrow_mut().resize(&layout(0.0));
    let mut batcher = ScrollBatcher::new(0.0);
    let target = scene.clone();
    batcher.subscribe(Box::new(move |offset: f32| -> anyhow::Result<()> {
        target.borrow_mut().scroll(offset);
        Ok(())
    }));

    assert!(batcher.on_scroll(300.0));
    assert!(!batcher.on_scroll(600.0));
    // One frame: deliver the coalesced offset, then tick.
    assert_eq!(batcher.flush(), 1);
    let mut s = scene.borrow_mut();
    let view_proj = s.tick(0.016).view_proj;
    assert!(approx(s.camera().position.y, -DEFAULT_FRUSTUM_SIZE));
    assert_eq!(view_proj, s.render_camera().view_proj());
}

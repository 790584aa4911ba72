// Host-side tests for page <-> world coordinate mapping.

mod common;

use common::approx;
use glam::{Vec2, Vec3};
use scroll_scene::core::*;

fn setup(scroll_y: f32) -> (Viewport, OrthoCamera) {
    let vp = Viewport {
        width: 800.0,
        height: 600.0,
        scroll_y,
    };
    let mut cam = OrthoCamera::new(10.0, 1.0);
    cam.set_viewport(vp.width, vp.height);
    cam.position.y = -scroll_y / vp.height * cam.frustum_size;
    (vp, cam)
}

#[test]
fn viewport_center_maps_to_camera_center() {
    let (vp, cam) = setup(0.0);
    let w = page_to_world(Vec2::new(400.0, 300.0), &vp, &cam);
    assert!(approx(w.x, 0.0) && approx(w.y, 0.0));
    let half = cam.half_extents();
    assert!(approx(half.y, 5.0));
    assert!(approx(half.x, 5.0 * 800.0 / 600.0));
}

#[test]
fn page_world_round_trip() {
    for scroll in [0.0, 120.0, 2400.0] {
        let (vp, cam) = setup(scroll);
        for p in [Vec2::new(0.0, scroll), Vec2::new(123.0, scroll + 456.0), Vec2::new(800.0, scroll + 600.0)] {
            let back = world_to_page(page_to_world(p, &vp, &cam), &vp, &cam);
            assert!((back - p).length() < 1e-2, "{p:?} -> {back:?}");
        }
    }
}

#[test]
fn world_page_round_trip() {
    for scroll in [0.0, 600.0, 3100.0] {
        let (vp, cam) = setup(scroll);
        let c = cam.position;
        for w in [c, Vec3::new(c.x - 4.0, c.y + 2.5, 0.0), Vec3::new(c.x + 6.0, c.y - 4.9, 0.0)] {
            let back = page_to_world(world_to_page(w, &vp, &cam), &vp, &cam);
            assert!((back - w).length() < 1e-3, "{w:?} -> {back:?}");
        }
    }
}

#[test]
fn document_point_is_stable_while_scrolling() {
    let doc = Vec2::new(400.0, 1300.0);
    let (vp0, cam0) = setup(0.0);
    let reference = page_to_world(doc, &vp0, &cam0);
    for scroll in [250.0, 1000.0, 1300.0] {
        let (vp, cam) = setup(scroll);
        let w = page_to_world(doc, &vp, &cam);
        assert!(approx(w.y, reference.y), "scroll {scroll}: {} vs {}", w.y, reference.y);
    }
}

#[test]
fn rect_to_world_scales_by_units_per_pixel() {
    let (vp, cam) = setup(0.0);
    let rect = PageRect::new(300.0, 200.0, 200.0, 150.0);
    let w = rect_to_world(&rect, &vp, &cam);
    let upp = world_units_per_pixel(&vp, &cam);
    assert!(approx(w.size.x, 200.0 * upp.x));
    assert!(approx(w.size.y, 150.0 * upp.y));
    // Centered horizontally, slightly above the vertical center.
    assert!(approx(w.center.x, 0.0));
    assert!(w.center.y > 0.0);
}

#[test]
fn doc_top_adds_scroll() {
    let vp = Viewport {
        width: 100.0,
        height: 100.0,
        scroll_y: 40.0,
    };
    assert_eq!(PageRect::new(0.0, 10.0, 5.0, 5.0).doc_top(&vp), 50.0);
}

#[test]
fn zoom_shrinks_visible_region() {
    let mut cam = OrthoCamera::new(10.0, 2.0);
    let before = cam.half_extents();
    cam.zoom = 2.0;
    assert!(approx(cam.half_extents().y, before.y * 0.5));
}

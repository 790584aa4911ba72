//! Scene coordinator: camera, clock and the ordered object registry.
//!
//! The browser frame loop calls [`SceneCoordinator::tick`] once per display
//! refresh and renders the returned draw list exactly once. Resize and
//! scroll events are forwarded here; nothing in this module touches the DOM
//! or the GPU.

use std::cell::RefCell;
use std::rc::Rc;

use super::camera::OrthoCamera;
use super::config::SceneConfig;
use super::draw::DrawList;
use super::error::SceneError;
use super::mapper::{LayoutSource, Viewport};
use super::math::lerp;
use super::objects::tiles::fit_zoom;
use super::objects::{SharedObject, TileGallery};

/// Elapsed and delta time since the scene started.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    elapsed: f32,
    delta: f32,
}

impl Clock {
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt.max(0.0);
        self.elapsed += self.delta;
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }
}

pub struct SceneCoordinator {
    /// Scroll-driven camera used for layout mapping.
    camera: OrthoCamera,
    /// Camera actually rendered; adds tile framing on top of `camera`.
    render_camera: OrthoCamera,
    clock: Clock,
    viewport: Viewport,
    objects: Vec<SharedObject>,
    gallery: Option<Rc<RefCell<TileGallery>>>,
    draw_list: DrawList,
    destroyed: bool,
}

impl SceneCoordinator {
    pub fn new(config: &SceneConfig, viewport: Viewport) -> Self {
        let mut camera = OrthoCamera::new(config.frustum_size, 1.0);
        camera.set_viewport(viewport.width, viewport.height);
        let mut scene = Self {
            render_camera: camera.clone(),
            camera,
            clock: Clock::default(),
            viewport,
            objects: Vec::new(),
            gallery: None,
            draw_list: DrawList::default(),
            destroyed: false,
        };
        scene.scroll(viewport.scroll_y);
        scene
    }

    /// Append an object; update, resize and draw follow registration order.
    pub fn register(&mut self, object: SharedObject) {
        log::info!(
            "[scene] registered {} (#{})",
            object.borrow().name(),
            self.objects.len()
        );
        self.objects.push(object);
    }

    /// Register the tile gallery, which also drives main camera framing.
    pub fn register_gallery(&mut self, gallery: Rc<RefCell<TileGallery>>) {
        let shared: SharedObject = gallery.clone();
        self.register(shared);
        self.gallery = Some(gallery);
    }

    /// Advance every object by `dt`, then collect this frame's draw list.
    pub fn tick(&mut self, dt: f32) -> &DrawList {
        self.clock.advance(dt);
        if self.destroyed {
            self.draw_list.clear();
            return &self.draw_list;
        }
        for obj in &self.objects {
            obj.borrow_mut().update(self.clock.delta());
        }
        self.update_render_camera();

        self.draw_list.clear();
        self.draw_list.view_proj = self.render_camera.view_proj();
        for obj in &self.objects {
            obj.borrow().draw(&mut self.draw_list);
        }
        &self.draw_list
    }

    /// Re-measure layout: camera projection first, then every object.
    pub fn resize(&mut self, layout: &dyn LayoutSource) {
        self.sync_viewport(layout.viewport());
        for obj in &self.objects {
            obj.borrow_mut().resize(layout, &self.camera);
        }
        self.update_render_camera();
    }

    /// Move a loaded object to `Ready` and give it its first layout.
    ///
    /// `layout` is measured at the live scroll position, which may be ahead
    /// of the last batched flush, so the camera catches up before mapping.
    pub fn activate(&mut self, object: &SharedObject, layout: &dyn LayoutSource) -> Result<(), SceneError> {
        object.borrow_mut().lifecycle_mut().mark_ready()?;
        self.sync_viewport(layout.viewport());
        object.borrow_mut().resize(layout, &self.camera);
        self.update_render_camera();
        Ok(())
    }

    fn sync_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera
            .set_viewport(self.viewport.width, self.viewport.height);
        self.scroll(self.viewport.scroll_y);
    }

    /// Move the camera so world content tracks DOM content while scrolling.
    pub fn scroll(&mut self, offset: f32) {
        self.viewport.scroll_y = offset;
        self.camera.position.y =
            -offset / self.viewport.height.max(1.0) * self.camera.frustum_size;
        self.update_render_camera();
    }

    fn update_render_camera(&mut self) {
        let mut cam = self.camera.clone();
        if let Some(gallery) = &self.gallery {
            if let Some((rect, t)) = gallery.borrow().focus() {
                let target = fit_zoom(&rect, &self.camera);
                cam.position.x = lerp(self.camera.position.x, rect.center.x, t);
                cam.position.y = lerp(self.camera.position.y, rect.center.y, t);
                cam.zoom = lerp(self.camera.zoom, target, t);
            }
        }
        self.render_camera = cam;
    }

    /// Tear down every object and drop the registry.
    pub fn destroy(&mut self) {
        for obj in self.objects.drain(..) {
            obj.borrow_mut().tear_down();
        }
        self.gallery = None;
        self.draw_list.clear();
        self.destroyed = true;
        log::info!("[scene] destroyed");
    }

    pub fn camera(&self) -> &OrthoCamera {
        &self.camera
    }

    pub fn render_camera(&self) -> &OrthoCamera {
        &self.render_camera
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn object_names(&self) -> Vec<String> {
        self.objects
            .iter()
            .map(|o| o.borrow().name().to_owned())
            .collect()
    }
}

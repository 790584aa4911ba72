use std::cell::{Cell, RefCell};
use std::rc::Rc;

use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{PAGE_CONTENT_ID, TILE_MODAL_ID};
use crate::core::objects::TileGallery;
use crate::core::{AdaptiveResolution, RuntimeContext, SceneCoordinator, TransitionEvent, TransitionFrame};
use crate::events::ScrollHub;
use crate::{dom, overlay, render};

const OVERLAY_REFRESH_SEC: f32 = 0.5;

pub struct FrameContext {
    pub scene: Rc<RefCell<SceneCoordinator>>,
    pub scroll: ScrollHub,
    pub gallery: Rc<RefCell<TileGallery>>,
    pub runtime: Rc<RuntimeContext>,
    pub gpu: Option<render::GpuState>,

    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub video: Option<web::HtmlVideoElement>,

    pub adaptive: AdaptiveResolution,
    pub last_instant: Instant,
    pub last_transition: Option<TransitionFrame>,
    pub overlay_accum: f32,
}

impl FrameContext {
    pub fn new(
        scene: Rc<RefCell<SceneCoordinator>>,
        scroll: ScrollHub,
        gallery: Rc<RefCell<TileGallery>>,
        runtime: Rc<RuntimeContext>,
        gpu: Option<render::GpuState>,
        document: web::Document,
        canvas: web::HtmlCanvasElement,
        video: Option<web::HtmlVideoElement>,
    ) -> Self {
        let adaptive = AdaptiveResolution::new(runtime.profile.dpr_clamp());
        Self {
            scene,
            scroll,
            gallery,
            runtime,
            gpu,
            document,
            canvas,
            video,
            adaptive,
            last_instant: Instant::now(),
            last_transition: None,
            overlay_accum: 0.0,
        }
    }

    pub fn frame(&mut self) {
        // Scroll subscribers borrow the scene, so deliver before ticking it.
        self.scroll.flush();

        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        if let Some(dpr) = self.adaptive.record(dt_sec, &self.runtime.counters) {
            dom::sync_canvas_backing_size(&self.canvas, dpr);
        }

        {
            let mut scene = self.scene.borrow_mut();
            let list = scene.tick(dt_sec);
            if let Some(gpu) = self.gpu.as_mut() {
                gpu.resize_if_needed(self.canvas.width(), self.canvas.height());
                match gpu.render(list, self.video.as_ref()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
                    Err(e) => log::warn!("[frame] render skipped: {:?}", e),
                }
            }
        }

        self.apply_transition();

        self.overlay_accum += dt_sec;
        if self.overlay_accum >= OVERLAY_REFRESH_SEC {
            self.overlay_accum = 0.0;
            overlay::update_perf(&self.document, &self.runtime);
        }
    }

    /// Drop every GPU resource; later frames only track state.
    pub fn release_gpu(&mut self) {
        if self.gpu.take().is_some() {
            log::info!("[frame] gpu resources released");
        }
    }

    /// Mirror the tile transition onto page content and the modal.
    fn apply_transition(&mut self) {
        let frame = self.gallery.borrow().frame();
        if self.last_transition == Some(frame) {
            return;
        }
        let changed = |f: fn(&TransitionFrame) -> f32| {
            self.last_transition
                .as_ref()
                .map_or(true, |prev| (f(prev) - f(&frame)).abs() > 1e-4)
        };
        if changed(|t| t.content_opacity) {
            dom::set_opacity(&self.document, PAGE_CONTENT_ID, frame.content_opacity);
        }
        if changed(|t| t.modal_opacity) {
            dom::set_opacity(&self.document, TILE_MODAL_ID, frame.modal_opacity);
            dom::set_hidden(&self.document, TILE_MODAL_ID, frame.modal_opacity <= 0.0);
        }
        match frame.event {
            Some(TransitionEvent::Opened(tile)) => log::info!("[tiles] tile {} open", tile),
            Some(TransitionEvent::Closed(tile)) => log::info!("[tiles] tile {} closed", tile),
            None => {}
        }
        self.last_transition = Some(frame);
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState> {
    match render::GpuState::new(canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Drive `frame` from `requestAnimationFrame` until `running` is cleared.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>, running: Rc<Cell<bool>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !running.get() {
            log::info!("[frame] loop stopped");
            return;
        }
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

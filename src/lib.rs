//! Scroll-synced WebGPU scene layer for a long-form landing page.
//!
//! `core` is platform-free and holds everything the tests exercise; the
//! remaining modules bind it to the browser and only build for wasm32.

pub mod constants;
pub mod core;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod loaders;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod prefs;
#[cfg(target_arch = "wasm32")]
mod probe;
#[cfg(target_arch = "wasm32")]
mod render;

#[cfg(target_arch = "wasm32")]
pub use web_entry::{destroy, set_quality, start};

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys as web;

    use crate::constants::*;
    use crate::core::objects::{PhysicsSandbox, ScrollProbe, SharedObject, TileGallery, Tube, VideoPanel};
    use crate::core::{parse_quality_request, BuildInfo, QualityProfile, RuntimeContext, SceneConfig, SceneCoordinator};
    use crate::dom::{self, DomLayout};
    use crate::events::{self, Listener, ScrollHub};
    use crate::loaders::{spawn_loader, LoadRequest};
    use crate::{frame, overlay, prefs, probe};

    /// What `destroy` needs to stop a running scene.
    struct Teardown {
        running: Rc<Cell<bool>>,
        scene: Rc<RefCell<SceneCoordinator>>,
        frame: Rc<RefCell<frame::FrameContext>>,
        hub: ScrollHub,
        listeners: Vec<Listener>,
    }

    thread_local! {
        static ACTIVE: RefCell<Option<Teardown>> = const { RefCell::new(None) };
    }

    fn page_config() -> SceneConfig {
        let mut config = SceneConfig::default();
        if let Some(search) = web::window().and_then(|w| w.location().search().ok()) {
            config.apply_query_string(&search);
        }
        config
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let config = page_config();
        let level = if config.debug_logging {
            log::Level::Debug
        } else {
            log::Level::Info
        };
        console_log::init_with_level(level).ok();
        log::info!("scroll-scene starting");

        spawn_local(async move {
            if let Err(e) = init(config).await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    /// Stop the frame loop, remove every event listener, tear down every
    /// scene object and release the GPU.
    #[wasm_bindgen]
    pub fn destroy() {
        let active = ACTIVE.with(|a| a.borrow_mut().take());
        if let Some(t) = active {
            t.running.set(false);
            t.hub.detach();
            log::info!("[scene] removing {} listeners", t.listeners.len());
            drop(t.listeners);
            t.scene.borrow_mut().destroy();
            t.frame.borrow_mut().release_gpu();
        }
    }

    /// Persist a quality override (`"low"`..`"ultra"`, or `"auto"`) and reload.
    /// Anything else is rejected and leaves the stored choice alone.
    #[wasm_bindgen]
    pub fn set_quality(tier: &str) {
        match parse_quality_request(tier) {
            Ok(choice) => prefs::set_quality_override(choice),
            Err(e) => log::warn!("[quality] set_quality ignored: {}", e),
        }
    }

    fn resolve_profile(config: &SceneConfig) -> QualityProfile {
        if config.clear_quality_override {
            prefs::store_quality_override(None);
        } else if config.quality_override.is_some() {
            prefs::store_quality_override(config.quality_override);
        }
        let override_tier = config.quality_override.or_else(|| {
            if config.clear_quality_override {
                None
            } else {
                prefs::quality_override()
            }
        });
        let profile = QualityProfile::resolve(probe::device_signals(), override_tier);
        log::info!(
            "[quality] tier={} source={:?} score={:?}",
            profile.tier,
            profile.source,
            profile.score
        );
        profile
    }

    fn owned(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn panel_video(document: &web::Document, profile: &QualityProfile) -> Option<web::HtmlVideoElement> {
        if !profile.video_panel_enabled() {
            return None;
        }
        let video = document
            .get_element_by_id(PANEL_VIDEO_ID)?
            .dyn_into::<web::HtmlVideoElement>()
            .ok()?;
        video.set_muted(true);
        video.set_loop(true);
        if let Err(e) = video.play() {
            log::warn!("[panel] autoplay refused: {:?}", e);
        }
        Some(video)
    }

    async fn init(config: SceneConfig) -> anyhow::Result<()> {
        // A second start replaces the running scene instead of stacking on it.
        destroy();

        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let canvas_el = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?;
        let canvas: web::HtmlCanvasElement = canvas_el
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

        let profile = resolve_profile(&config);
        let perf = config.perf_overlay || prefs::perf_overlay();
        let runtime = Rc::new(RuntimeContext::new(profile, BuildInfo::from_env(), perf));
        overlay::show_build_info(&document, &runtime.build);
        overlay::set_perf_visible(&document, perf);

        dom::sync_canvas_backing_size(&canvas, runtime.counters.effective_dpr.get());

        let scene = Rc::new(RefCell::new(SceneCoordinator::new(&config, dom::viewport())));
        let hub = ScrollHub::new(dom::viewport().scroll_y);
        let scene_scroll = scene.clone();
        hub.subscribe(Box::new(move |offset: f32| {
            scene_scroll.borrow_mut().scroll(offset);
            Ok(())
        }));

        let probe_for = |hub: &ScrollHub| {
            let p = ScrollProbe::new(hub.offset());
            hub.subscribe(p.callback());
            p
        };
        let tube = Rc::new(RefCell::new(Tube::new(&config, &profile, probe_for(&hub))));
        let panel = Rc::new(RefCell::new(VideoPanel::new(&config, &profile, probe_for(&hub))));
        let physics = Rc::new(RefCell::new(PhysicsSandbox::new(&profile, probe_for(&hub))));
        let gallery = Rc::new(RefCell::new(TileGallery::new(config.tile_count, &profile)));
        let video = panel_video(&document, &profile);

        let requests = vec![
            LoadRequest {
                anchors: owned(&Tube::anchors()),
                object: tube.clone() as SharedObject,
                video: None,
            },
            LoadRequest {
                anchors: owned(&VideoPanel::anchors()),
                object: panel.clone() as SharedObject,
                video: video.clone(),
            },
            LoadRequest {
                anchors: owned(&PhysicsSandbox::anchors()),
                object: physics.clone() as SharedObject,
                video: None,
            },
            LoadRequest {
                anchors: gallery.borrow().anchors(),
                object: gallery.clone() as SharedObject,
                video: None,
            },
        ];
        {
            let mut s = scene.borrow_mut();
            s.register(tube);
            s.register(panel);
            s.register(physics);
            s.register_gallery(gallery.clone());
        }
        for req in requests {
            spawn_loader(req, scene.clone(), config.anchor_timeout_ms);
        }

        hub.attach()?;
        let canvas_resize = canvas.clone();
        let scene_resize = scene.clone();
        let runtime_resize = runtime.clone();
        let mut listeners = vec![events::wire_resize(move || {
            dom::sync_canvas_backing_size(&canvas_resize, runtime_resize.counters.effective_dpr.get());
            if let Some(layout) = DomLayout::current() {
                scene_resize.borrow_mut().resize(&layout);
            }
        })?];
        listeners.extend(events::wire_tile_pointer(&document, gallery.clone())?);
        listeners.push(events::wire_global_keydown(gallery.clone(), runtime.clone())?);

        let gpu = frame::init_gpu(&canvas).await;
        if gpu.is_none() {
            log::warn!("[scene] rendering disabled; scroll state still tracked");
        }

        let running = Rc::new(Cell::new(true));
        let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
            scene.clone(),
            hub.clone(),
            gallery,
            runtime,
            gpu,
            document,
            canvas,
            video,
        )));
        ACTIVE.with(|a| {
            *a.borrow_mut() = Some(Teardown {
                running: running.clone(),
                scene,
                frame: frame_ctx.clone(),
                hub,
                listeners,
            })
        });
        frame::start_loop(frame_ctx, running);
        Ok(())
    }
}

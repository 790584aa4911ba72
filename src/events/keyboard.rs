use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys as web;

use super::Listener;
use crate::core::objects::TileGallery;
use crate::core::RuntimeContext;
use crate::{overlay, prefs};

pub fn wire_global_keydown(
    gallery: Rc<RefCell<TileGallery>>,
    runtime: Rc<RuntimeContext>,
) -> anyhow::Result<Listener> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    Listener::new(&window, "keydown", move |ev: web::Event| {
        if let Some(key) = ev.dyn_ref::<web::KeyboardEvent>() {
            handle_global_keydown(key, &gallery, &runtime);
        }
    })
}

fn handle_global_keydown(
    ev: &web::KeyboardEvent,
    gallery: &Rc<RefCell<TileGallery>>,
    runtime: &Rc<RuntimeContext>,
) {
    match ev.key().as_str() {
        "Escape" => {
            if gallery.borrow().transition().is_idle() {
                return;
            }
            if let Err(e) = gallery.borrow_mut().request_close() {
                log::debug!("[keys] close ignored: {}", e);
            }
        }
        // Backquote toggles the perf overlay and remembers the choice.
        "`" => {
            let on = !runtime.perf_overlay.get();
            runtime.perf_overlay.set(on);
            prefs::set_perf_overlay(on);
            if let Some(doc) = crate::dom::window_document() {
                overlay::set_perf_visible(&doc, on);
            }
            log::info!("[keys] perf overlay={}", on);
        }
        _ => {}
    }
}

pub mod keyboard;
pub mod pointer;
pub mod resize;
pub mod scroll;

pub use keyboard::wire_global_keydown;
pub use pointer::wire_tile_pointer;
pub use resize::wire_resize;
pub use scroll::ScrollHub;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// A registered DOM event listener. Dropping it removes the listener and
/// frees the closure along with everything it captured.
pub struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        Self::with_options(target, kind, handler, &web::AddEventListenerOptions::new())
    }

    /// Same as [`Listener::new`] but registered as `{ passive: true }`.
    pub fn passive(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(true);
        Self::with_options(target, kind, handler, &opts)
    }

    fn with_options(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
        opts: &web::AddEventListenerOptions,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                opts,
            )
            .map_err(|e| anyhow::anyhow!("add {} listener: {:?}", kind, e))?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("[events] removing {} listener failed: {:?}", self.kind, e);
        }
    }
}

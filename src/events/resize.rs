use web_sys as web;

use super::Listener;

/// Run `handler` on every window resize until the listener is dropped.
pub fn wire_resize(handler: impl FnMut() + 'static) -> anyhow::Result<Listener> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let mut handler = handler;
    Listener::new(&window, "resize", move |_ev: web::Event| handler())
}

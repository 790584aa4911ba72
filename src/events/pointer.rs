use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys as web;

use super::Listener;
use crate::constants::{tile_index_from_id, TILE_ID_PREFIX, TILE_MODAL_CLOSE_ID};
use crate::core::objects::TileGallery;

/// Tile index under the event target, if any. Tiles may be re-rendered by
/// the page, so listeners are delegated from the document.
fn tile_under(ev: &web::Event) -> Option<usize> {
    let target = ev.target()?.dyn_into::<web::Element>().ok()?;
    let selector = format!("[id^='{}']", TILE_ID_PREFIX);
    let tile = target.closest(&selector).ok()??;
    tile_index_from_id(&tile.id())
}

fn hits_close_button(ev: &web::Event) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .and_then(|el| el.closest(&format!("#{}", TILE_MODAL_CLOSE_ID)).ok().flatten())
        .is_some()
}

pub fn wire_tile_pointer(
    document: &web::Document,
    gallery: Rc<RefCell<TileGallery>>,
) -> anyhow::Result<Vec<Listener>> {
    Ok(vec![wire_click(document, gallery.clone())?, wire_hover(document, gallery)?])
}

fn wire_click(document: &web::Document, gallery: Rc<RefCell<TileGallery>>) -> anyhow::Result<Listener> {
    Listener::new(document, "click", move |ev: web::Event| {
        if hits_close_button(&ev) {
            if let Err(e) = gallery.borrow_mut().request_close() {
                log::debug!("[tiles] close ignored: {}", e);
            }
            return;
        }
        let Some(index) = tile_under(&ev) else {
            return;
        };
        ev.prevent_default();
        if let Err(e) = gallery.borrow_mut().request_open(index) {
            log::debug!("[tiles] open({}) ignored: {}", index, e);
        }
    })
}

fn wire_hover(document: &web::Document, gallery: Rc<RefCell<TileGallery>>) -> anyhow::Result<Listener> {
    Listener::new(document, "pointerover", move |ev: web::Event| {
        gallery.borrow_mut().set_hovered(tile_under(&ev));
    })
}

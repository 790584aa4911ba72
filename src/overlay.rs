use web_sys as web;

use crate::constants::{BUILD_OVERLAY_ID, PERF_OVERLAY_ID};
use crate::core::{BuildInfo, RuntimeContext};

#[inline]
pub fn show(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

/// Show branch, short commit and build time; hidden unless all are known.
pub fn show_build_info(document: &web::Document, build: &BuildInfo) {
    match build.overlay_text() {
        Some(text) => {
            if let Some(el) = document.get_element_by_id(BUILD_OVERLAY_ID) {
                el.set_text_content(Some(&text));
            }
            show(document, BUILD_OVERLAY_ID);
        }
        None => hide(document, BUILD_OVERLAY_ID),
    }
}

pub fn set_perf_visible(document: &web::Document, visible: bool) {
    if visible {
        show(document, PERF_OVERLAY_ID);
    } else {
        hide(document, PERF_OVERLAY_ID);
    }
}

/// Refresh the perf overlay with tier and counters.
pub fn update_perf(document: &web::Document, runtime: &RuntimeContext) {
    if !runtime.perf_overlay.get() {
        return;
    }
    if let Some(el) = document.get_element_by_id(PERF_OVERLAY_ID) {
        let text = format!(
            "{} ({:?}) • {}",
            runtime.profile.tier,
            runtime.profile.source,
            runtime.counters.summary()
        );
        el.set_text_content(Some(&text));
    }
}

//! Device capability probe feeding [`QualityProfile::resolve`].
//!
//! [`QualityProfile::resolve`]: crate::core::QualityProfile::resolve

use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

use crate::core::{DeviceSignals, SceneError};

const MOBILE_MARKERS: [&str; 5] = ["Android", "iPhone", "iPad", "iPod", "Mobile"];

fn probe_err(what: &str, e: JsValue) -> SceneError {
    SceneError::ProbeFailed(format!("{what}: {:?}", e))
}

/// Read hardware signals from the browser.
///
/// Missing APIs (no `deviceMemory` outside Chromium, for instance) leave the
/// field `None`; an API that throws fails the whole probe.
pub fn device_signals() -> Result<DeviceSignals, SceneError> {
    let window = web::window().ok_or_else(|| SceneError::ProbeFailed("no window".into()))?;
    let navigator = window.navigator();

    let cores = navigator.hardware_concurrency();
    let hardware_concurrency = (cores.is_finite() && cores > 0.0).then_some(cores as u32);

    let device_memory_gb = js_sys::Reflect::get(&navigator, &JsValue::from_str("deviceMemory"))
        .map_err(|e| probe_err("deviceMemory", e))?
        .as_f64()
        .map(|m| m as f32);

    let ua = navigator
        .user_agent()
        .map_err(|e| probe_err("userAgent", e))?;
    let mobile = MOBILE_MARKERS.iter().any(|m| ua.contains(m));

    let document = window
        .document()
        .ok_or_else(|| SceneError::ProbeFailed("no document".into()))?;
    let max_texture_size = max_texture_size(&document)?;

    let signals = DeviceSignals {
        hardware_concurrency,
        device_memory_gb,
        max_texture_size,
        mobile,
    };
    log::debug!("[quality] probed {:?}", signals);
    Ok(signals)
}

/// Query `MAX_TEXTURE_SIZE` from a throwaway WebGL context, then release it.
fn max_texture_size(document: &web::Document) -> Result<Option<u32>, SceneError> {
    let canvas = document
        .create_element("canvas")
        .map_err(|e| probe_err("create canvas", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| probe_err("canvas cast", e.into()))?;
    let Some(ctx) = canvas
        .get_context("webgl")
        .map_err(|e| probe_err("getContext", e))?
    else {
        return Ok(None);
    };
    let gl = ctx
        .dyn_into::<web::WebGlRenderingContext>()
        .map_err(|e| probe_err("webgl cast", e.into()))?;
    let size = gl
        .get_parameter(web::WebGlRenderingContext::MAX_TEXTURE_SIZE)
        .map_err(|e| probe_err("MAX_TEXTURE_SIZE", e))?
        .as_f64()
        .map(|v| v as u32);

    if let Ok(Some(ext)) = gl.get_extension("WEBGL_lose_context") {
        if let Ok(lose) = js_sys::Reflect::get(&ext, &JsValue::from_str("loseContext")) {
            if let Some(f) = lose.dyn_ref::<js_sys::Function>() {
                _ = f.call0(&ext);
            }
        }
    }
    Ok(size)
}

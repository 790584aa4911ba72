use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

use crate::core::{LayoutSource, PageRect, SceneError, Viewport};

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Current window size and scroll offset in CSS pixels.
pub fn viewport() -> Viewport {
    let Some(w) = web::window() else {
        return Viewport::default();
    };
    let num = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Viewport {
        width: num(w.inner_width()),
        height: num(w.inner_height()),
        scroll_y: w.scroll_y().unwrap_or(0.0) as f32,
    }
}

/// Viewport-relative rect of an element, `None` if it is not in the DOM.
pub fn element_rect(document: &web::Document, id: &str) -> Option<PageRect> {
    let el = document.get_element_by_id(id)?;
    let r = el.get_bounding_client_rect();
    Some(PageRect::new(
        r.left() as f32,
        r.top() as f32,
        r.width() as f32,
        r.height() as f32,
    ))
}

/// Live layout read straight from the document.
pub struct DomLayout {
    document: web::Document,
}

impl DomLayout {
    pub fn new(document: web::Document) -> Self {
        Self { document }
    }

    pub fn current() -> Option<Self> {
        window_document().map(Self::new)
    }
}

impl LayoutSource for DomLayout {
    fn viewport(&self) -> Viewport {
        viewport()
    }

    fn rect(&self, anchor_id: &str) -> Option<PageRect> {
        element_rect(&self.document, anchor_id)
    }
}

fn missing(document: &web::Document, ids: &[String]) -> Vec<String> {
    ids.iter()
        .filter(|id| document.get_element_by_id(id).is_none())
        .cloned()
        .collect()
}

/// Resolve once every id is present in the document.
///
/// A `MutationObserver` on `<body>` re-checks on each subtree change; a
/// `setTimeout` rejects with [`SceneError::AnchorTimeout`] naming whichever
/// ids are still absent.
pub async fn wait_for_anchors(ids: &[String], timeout_ms: i32) -> Result<(), SceneError> {
    let document = window_document().ok_or_else(|| SceneError::Unsupported("no document".into()))?;
    if missing(&document, ids).is_empty() {
        return Ok(());
    }
    let window = web::window().ok_or_else(|| SceneError::Unsupported("no window".into()))?;
    let body = document
        .body()
        .ok_or_else(|| SceneError::Unsupported("no <body>".into()))?;
    log::debug!("[dom] waiting for {:?}", missing(&document, ids));

    let observer_slot: Rc<RefCell<Option<web::MutationObserver>>> = Rc::new(RefCell::new(None));
    let timer_slot: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
    let mut setup_error: Option<JsValue> = None;

    let promise = js_sys::Promise::new(&mut |resolve: js_sys::Function, reject: js_sys::Function| {
        let wanted = ids.to_vec();
        let doc = document.clone();
        let observer_for_cb = observer_slot.clone();
        let timer_for_cb = timer_slot.clone();
        let win = window.clone();
        let on_mutation = Closure::wrap(Box::new(move |_records: js_sys::Array| {
            if !missing(&doc, &wanted).is_empty() {
                return;
            }
            if let Some(obs) = observer_for_cb.borrow_mut().take() {
                obs.disconnect();
            }
            if let Some(handle) = timer_for_cb.borrow_mut().take() {
                win.clear_timeout_with_handle(handle);
            }
            _ = resolve.call0(&JsValue::NULL);
        }) as Box<dyn FnMut(js_sys::Array)>);

        let observer = match web::MutationObserver::new(on_mutation.as_ref().unchecked_ref()) {
            Ok(o) => o,
            Err(e) => {
                setup_error = Some(e);
                return;
            }
        };
        on_mutation.forget();
        let init = web::MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        if let Err(e) = observer.observe_with_options(&body, &init) {
            setup_error = Some(e);
            return;
        }
        *observer_slot.borrow_mut() = Some(observer);

        let observer_for_timeout = observer_slot.clone();
        let on_timeout = Closure::once(move || {
            if let Some(obs) = observer_for_timeout.borrow_mut().take() {
                obs.disconnect();
                _ = reject.call0(&JsValue::NULL);
            }
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            on_timeout.as_ref().unchecked_ref(),
            timeout_ms,
        ) {
            Ok(handle) => *timer_slot.borrow_mut() = Some(handle),
            Err(e) => setup_error = Some(e),
        }
        on_timeout.forget();
    });

    if let Some(e) = setup_error {
        return Err(SceneError::Unsupported(format!("{:?}", e)));
    }
    match JsFuture::from(promise).await {
        Ok(_) => Ok(()),
        Err(_) => Err(SceneError::AnchorTimeout {
            ids: missing(&document, ids),
            timeout_ms,
        }),
    }
}

/// Resolve once the video has a decodable frame, or fail on `error` or
/// after `timeout_ms`.
pub async fn wait_for_video(video: &web::HtmlVideoElement, timeout_ms: i32) -> Result<(), SceneError> {
    // HAVE_CURRENT_DATA
    if video.ready_state() >= 2 {
        return Ok(());
    }
    let window = web::window().ok_or_else(|| SceneError::Unsupported("no window".into()))?;
    let promise = js_sys::Promise::new(&mut |resolve: js_sys::Function, reject: js_sys::Function| {
        let opts = web::AddEventListenerOptions::new();
        opts.set_once(true);
        let on_loaded = Closure::once(move || {
            _ = resolve.call0(&JsValue::NULL);
        });
        _ = video.add_event_listener_with_callback_and_add_event_listener_options(
            "loadeddata",
            on_loaded.as_ref().unchecked_ref(),
            &opts,
        );
        on_loaded.forget();

        let reject_err = reject.clone();
        let on_error = Closure::once(move || {
            _ = reject_err.call1(&JsValue::NULL, &JsValue::from_str("media error"));
        });
        _ = video.add_event_listener_with_callback_and_add_event_listener_options(
            "error",
            on_error.as_ref().unchecked_ref(),
            &opts,
        );
        on_error.forget();

        let on_timeout = Closure::once(move || {
            _ = reject.call1(&JsValue::NULL, &JsValue::from_str("timed out"));
        });
        _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            on_timeout.as_ref().unchecked_ref(),
            timeout_ms,
        );
        on_timeout.forget();
    });
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| SceneError::AssetLoad {
            object: "video-panel".into(),
            reason: e.as_string().unwrap_or_else(|| format!("{:?}", e)),
        })
}

/// Match the canvas backing store to its CSS size times the clamped DPR.
/// Returns the resulting pixel size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, max_dpr: f32) -> (u32, u32) {
    let Some(w) = web::window() else {
        return (canvas.width(), canvas.height());
    };
    let dpr = w.device_pixel_ratio().min(max_dpr as f64);
    let rect = canvas.get_bounding_client_rect();
    let w_px = ((rect.width() * dpr) as u32).max(1);
    let h_px = ((rect.height() * dpr) as u32).max(1);
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
    (w_px, h_px)
}

pub fn set_opacity(document: &web::Document, id: &str, opacity: f32) {
    if let Some(el) = document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
    {
        _ = el.style().set_property("opacity", &format!("{:.3}", opacity));
    }
}

pub fn set_hidden(document: &web::Document, id: &str, hidden: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        let cl = el.class_list();
        _ = if hidden {
            cl.add_1("hidden")
        } else {
            cl.remove_1("hidden")
        };
    }
}

//! Per-object activation: wait for anchors (and media), then move the
//! object to `Ready` and give it its first layout.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use crate::core::objects::SharedObject;
use crate::core::{SceneCoordinator, SceneError};
use crate::dom::{self, DomLayout};

pub struct LoadRequest {
    pub object: SharedObject,
    pub anchors: Vec<String>,
    pub video: Option<web::HtmlVideoElement>,
}

/// Load in the background. A failure is logged and leaves the object in
/// `Loading`; nothing else in the scene is affected.
pub fn spawn_loader(req: LoadRequest, scene: Rc<RefCell<SceneCoordinator>>, timeout_ms: i32) {
    spawn_local(async move {
        let name = req.object.borrow().name().to_owned();
        match wait_ready(&req, timeout_ms).await {
            Ok(()) => activate(&req.object, &scene),
            Err(e) => {
                log::error!("[loader] {} failed: {}", name, e);
                req.object
                    .borrow_mut()
                    .lifecycle_mut()
                    .mark_failed(e.to_string());
            }
        }
    });
}

async fn wait_ready(req: &LoadRequest, timeout_ms: i32) -> Result<(), SceneError> {
    dom::wait_for_anchors(&req.anchors, timeout_ms).await?;
    if let Some(video) = &req.video {
        dom::wait_for_video(video, timeout_ms).await?;
    }
    Ok(())
}

fn activate(object: &SharedObject, scene: &Rc<RefCell<SceneCoordinator>>) {
    let name = object.borrow().name().to_owned();
    let Some(layout) = DomLayout::current() else {
        log::warn!("[loader] {} loaded without a document to measure", name);
        return;
    };
    match scene.borrow_mut().activate(object, &layout) {
        Ok(()) => log::info!("[loader] {} ready", name),
        // Torn down while loading.
        Err(e) => log::debug!("[loader] {} not activated: {}", name, e),
    }
}

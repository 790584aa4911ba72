use std::cell::RefCell;
use std::rc::Rc;

use web_sys as web;

use super::Listener;
use crate::core::{ScrollBatcher, ScrollCallback, SubscriptionId};

/// Browser side of the scroll batcher. A passive `scroll` listener records
/// offsets; the frame loop calls [`ScrollHub::flush`] before it ticks the
/// scene, so subscribers see at most one delivery per animation frame.
#[derive(Clone)]
pub struct ScrollHub {
    batcher: Rc<RefCell<ScrollBatcher>>,
    listener: Rc<RefCell<Option<Listener>>>,
}

impl ScrollHub {
    pub fn new(initial_offset: f32) -> Self {
        Self {
            batcher: Rc::new(RefCell::new(ScrollBatcher::new(initial_offset))),
            listener: Rc::new(RefCell::new(None)),
        }
    }

    pub fn subscribe(&self, callback: ScrollCallback) -> SubscriptionId {
        self.batcher.borrow_mut().subscribe(callback)
    }

    pub fn offset(&self) -> f32 {
        self.batcher.borrow().offset()
    }

    pub fn attach(&self) -> anyhow::Result<()> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let batcher = self.batcher.clone();
        let win = window.clone();
        let listener = Listener::passive(&window, "scroll", move |_ev: web::Event| {
            let y = win.scroll_y().unwrap_or(0.0) as f32;
            batcher.borrow_mut().on_scroll(y);
        })?;
        *self.listener.borrow_mut() = Some(listener);
        Ok(())
    }

    /// Deliver the latest recorded offset, if any arrived since the last
    /// flush.
    pub fn flush(&self) -> usize {
        let delivered = self.batcher.borrow_mut().flush();
        if delivered > 0 {
            log::trace!("[scroll] flushed to {} subscribers", delivered);
        }
        delivered
    }

    /// Remove the scroll listener.
    pub fn detach(&self) {
        self.listener.borrow_mut().take();
    }
}

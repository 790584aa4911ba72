//! Coalesces raw scroll events into at most one delivery per animation frame.
//!
//! The batcher itself does not schedule anything. `on_scroll` reports when a
//! flush is pending and the host calls `flush` once per frame: on the web
//! that is the top of the animation frame, before the scene ticks.

use smallvec::SmallVec;

pub type ScrollCallback = Box<dyn FnMut(f32) -> anyhow::Result<()>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

struct Subscriber {
    id: SubscriptionId,
    callback: ScrollCallback,
}

#[derive(Default)]
pub struct ScrollBatcher {
    subscribers: SmallVec<[Subscriber; 8]>,
    offset: f32,
    pending: bool,
    next_id: u32,
    flushes: u64,
}

impl ScrollBatcher {
    pub fn new(initial_offset: f32) -> Self {
        Self {
            offset: initial_offset,
            ..Default::default()
        }
    }

    /// Register a callback. It receives the current offset immediately.
    pub fn subscribe(&mut self, mut callback: ScrollCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        if let Err(e) = callback(self.offset) {
            log::warn!("[scroll] subscriber {:?} failed on catch-up: {:?}", id, e);
        }
        self.subscribers.push(Subscriber { id, callback });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Record a raw scroll event. Returns true when the caller must schedule
    /// a flush, i.e. none is pending yet.
    pub fn on_scroll(&mut self, offset: f32) -> bool {
        self.offset = offset;
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Deliver the coalesced offset to every subscriber once.
    ///
    /// Returns the number of callbacks invoked. A failing callback is logged
    /// and does not affect the others.
    pub fn flush(&mut self) -> usize {
        if !self.pending {
            return 0;
        }
        self.pending = false;
        self.flushes += 1;
        let offset = self.offset;
        let mut invoked = 0;
        for sub in self.subscribers.iter_mut() {
            invoked += 1;
            if let Err(e) = (sub.callback)(offset) {
                log::warn!("[scroll] subscriber {:?} failed: {:?}", sub.id, e);
            }
        }
        invoked
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn flush_count(&self) -> u64 {
        self.flushes
    }
}

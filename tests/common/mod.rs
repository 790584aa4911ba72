// Shared fixtures for host-side tests.

#![allow(dead_code)]

use std::collections::HashMap;

use scroll_scene::core::{LayoutSource, PageRect, Viewport};

/// Fixed layout standing in for the live DOM.
#[derive(Clone, Debug, Default)]
pub struct FakeLayout {
    pub viewport: Viewport,
    pub rects: HashMap<String, PageRect>,
}

impl FakeLayout {
    pub fn new(width: f32, height: f32, scroll_y: f32) -> Self {
        Self {
            viewport: Viewport {
                width,
                height,
                scroll_y,
            },
            rects: HashMap::new(),
        }
    }

    /// Add an anchor given in document coordinates.
    pub fn with_doc_rect(mut self, id: &str, left: f32, doc_top: f32, w: f32, h: f32) -> Self {
        let top = doc_top - self.viewport.scroll_y;
        self.rects.insert(id.to_string(), PageRect::new(left, top, w, h));
        self
    }
}

impl LayoutSource for FakeLayout {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn rect(&self, anchor_id: &str) -> Option<PageRect> {
        self.rects.get(anchor_id).copied()
    }
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

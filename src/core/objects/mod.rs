//! Scene participants.
//!
//! Every visual element placed in the scene implements [`AnimatedObject`].
//! The coordinator keeps them in an ordered registry and drives `update`,
//! `resize` and `draw` in registration order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::batcher::ScrollCallback;
use super::camera::OrthoCamera;
use super::draw::DrawList;
use super::lifecycle::{Lifecycle, ObjectState};
use super::mapper::LayoutSource;

pub mod panel;
pub mod physics;
pub mod tiles;
pub mod tube;

pub use panel::VideoPanel;
pub use physics::{Body, PhysicsSandbox};
pub use tiles::{ProjectTile, TileGallery};
pub use tube::Tube;

pub trait AnimatedObject {
    fn name(&self) -> &str;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Advance by `dt` seconds. A no-op until the object is ready.
    fn update(&mut self, dt: f32);

    /// Recompute layout-derived geometry. Must be idempotent.
    fn resize(&mut self, _layout: &dyn LayoutSource, _camera: &OrthoCamera) {}

    fn draw(&self, _out: &mut DrawList) {}

    fn state(&self) -> ObjectState {
        self.lifecycle().state()
    }

    fn tear_down(&mut self) {
        self.lifecycle_mut().tear_down();
    }
}

pub type SharedObject = Rc<RefCell<dyn AnimatedObject>>;

/// Latest scroll offset as delivered by the scroll batcher.
#[derive(Clone, Debug, Default)]
pub struct ScrollProbe(Rc<Cell<f32>>);

impl ScrollProbe {
    pub fn new(initial: f32) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, offset: f32) {
        self.0.set(offset);
    }

    /// Subscriber callback that keeps this probe current.
    pub fn callback(&self) -> ScrollCallback {
        let cell = self.0.clone();
        Box::new(move |offset: f32| {
            cell.set(offset);
            Ok(())
        })
    }
}

pub mod adaptive;
pub mod batcher;
pub mod camera;
pub mod config;
pub mod constants;
pub mod curve;
pub mod draw;
pub mod error;
pub mod lifecycle;
pub mod mapper;
pub mod math;
pub mod objects;
pub mod quality;
pub mod runtime;
pub mod scene;
pub mod transition;

pub use adaptive::*;
pub use batcher::*;
pub use camera::*;
pub use config::*;
pub use constants::*;
pub use draw::*;
pub use error::*;
pub use lifecycle::*;
pub use mapper::*;
pub use quality::*;
pub use runtime::*;
pub use scene::*;
pub use transition::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");

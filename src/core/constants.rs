use glam::Vec4;

// Shared scene tuning constants. Keep magic numbers out of object code.

// Camera
pub const DEFAULT_FRUSTUM_SIZE: f32 = 10.0; // world units mapped to viewport height
pub const CAMERA_NEAR: f32 = -100.0;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_Z: f32 = 10.0;

// Exponential smoothing rates (per second)
pub const PANEL_SMOOTHING_RATE: f32 = 6.0;
pub const TUBE_SMOOTHING_RATE: f32 = 4.0;
pub const TILE_HOVER_RATE: f32 = 8.0;

// Video panel
pub const PANEL_START_COLOR: Vec4 = Vec4::new(0.12, 0.14, 0.22, 1.0);
pub const PANEL_END_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
pub const PANEL_MIN_SCALE: f32 = 0.6; // fraction of the frame anchor width at percent 0
pub const PANEL_CORNER_RADIUS: f32 = 0.08;

// Tube
pub const TUBE_RADIUS: f32 = 0.18;
pub const TUBE_BASE_SEGMENTS: u32 = 128; // along the curve at subdivision factor 1.0
pub const TUBE_BASE_RADIAL: u32 = 16;
pub const TUBE_FLOW_SPEED: f32 = 0.15; // flow phase cycles per second
pub const TUBE_COLOR: Vec4 = Vec4::new(0.45, 0.62, 1.0, 1.0);

// Physics sandbox
pub const PHYSICS_STEP_SEC: f32 = 1.0 / 120.0;
pub const PHYSICS_MAX_STEPS: u32 = 8;
pub const PHYSICS_GRAVITY: f32 = -9.8;
pub const PHYSICS_RESTITUTION: f32 = 0.45;
pub const PHYSICS_WALL_FRICTION: f32 = 0.98;
pub const PHYSICS_MIN_RADIUS: f32 = 0.12;
pub const PHYSICS_MAX_RADIUS: f32 = 0.32;
pub const PHYSICS_SEED: u64 = 42;

// Project tiles and portal views
pub const TILE_COUNT: usize = 4;
pub const TILE_FADE_DURATION: f32 = 0.35; // seconds
pub const TILE_ZOOM_DURATION: f32 = 0.9; // seconds
pub const TILE_MODAL_DURATION: f32 = 0.25; // seconds
pub const PORTAL_ZOOM_OPEN: f32 = 1.8;
pub const PORTAL_SPIN_SPEED: f32 = 0.6; // radians per second
pub const PORTAL_CLEAR: [f64; 4] = [0.04, 0.05, 0.09, 1.0];

// Adaptive resolution
pub const FRAME_BUDGET_SEC: f32 = 1.0 / 60.0;
pub const FRAME_EMA_ALPHA: f32 = 0.1; // new = (1-α)*old + α*sample
pub const DPR_STEP: f32 = 0.25;
pub const DPR_FLOOR: f32 = 0.75;
pub const OVER_BUDGET_FRAMES: u32 = 30; // sustained overruns before stepping down
pub const UNDER_BUDGET_FRAMES: u32 = 240; // sustained headroom before stepping up
pub const HEADROOM_RATIO: f32 = 0.7;

// Readiness
pub const ANCHOR_TIMEOUT_MS: i32 = 8_000;

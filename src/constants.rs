//! DOM anchor ids and persisted keys shared by the browser glue and objects.
//!
//! The page markup is the contract: each id below names an element whose
//! position, size or click events drive part of the scene.

// Render surface
pub const CANVAS_ID: &str = "scene-canvas";

// Video panel: scroll triggers and the element the panel aligns with
pub const PANEL_START_ID: &str = "panel-start";
pub const PANEL_END_ID: &str = "panel-end";
pub const PANEL_FRAME_ID: &str = "panel-frame";
pub const PANEL_VIDEO_ID: &str = "panel-video";

// Tube: scroll triggers
pub const TUBE_START_ID: &str = "tube-start";
pub const TUBE_END_ID: &str = "tube-end";

// Physics sandbox container
pub const PHYSICS_AREA_ID: &str = "physics-area";

// Project tiles are `project-tile-0`, `project-tile-1`, ...
pub const TILE_ID_PREFIX: &str = "project-tile-";
pub const TILE_MODAL_ID: &str = "project-modal";
pub const TILE_MODAL_CLOSE_ID: &str = "project-modal-close";
pub const PAGE_CONTENT_ID: &str = "page-content";

// Overlays
pub const BUILD_OVERLAY_ID: &str = "build-overlay";
pub const PERF_OVERLAY_ID: &str = "perf-overlay";

// Persisted preferences (localStorage)
pub const QUALITY_OVERRIDE_KEY: &str = "scroll-scene.quality";
pub const PERF_OVERLAY_KEY: &str = "scroll-scene.perf";

#[inline]
pub fn tile_anchor_id(index: usize) -> String {
    format!("{TILE_ID_PREFIX}{index}")
}

/// Inverse of [`tile_anchor_id`].
pub fn tile_index_from_id(id: &str) -> Option<usize> {
    id.strip_prefix(TILE_ID_PREFIX)?.parse().ok()
}

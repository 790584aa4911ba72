//! Scene configuration.
//!
//! Defaults come from [`super::constants`]; a handful of values can be
//! overridden through the page query string (`?quality=high&perf=1`).

use glam::Vec4;

use super::constants::*;
use super::quality::{parse_override, QualityTier};

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub frustum_size: f32,
    pub panel_rate: f32,
    pub tube_rate: f32,
    pub panel_start_color: Vec4,
    pub panel_end_color: Vec4,
    pub tile_count: usize,
    pub anchor_timeout_ms: i32,
    /// Tier forced from the query string; takes precedence over storage.
    pub quality_override: Option<QualityTier>,
    /// `?quality=auto` clears any persisted override.
    pub clear_quality_override: bool,
    pub perf_overlay: bool,
    pub debug_logging: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            frustum_size: DEFAULT_FRUSTUM_SIZE,
            panel_rate: PANEL_SMOOTHING_RATE,
            tube_rate: TUBE_SMOOTHING_RATE,
            panel_start_color: PANEL_START_COLOR,
            panel_end_color: PANEL_END_COLOR,
            tile_count: TILE_COUNT,
            anchor_timeout_ms: ANCHOR_TIMEOUT_MS,
            quality_override: None,
            clear_quality_override: false,
            perf_overlay: false,
            debug_logging: false,
        }
    }
}

impl SceneConfig {
    /// Apply `key=value` pairs from the query string. Unknown keys and
    /// unparsable values are ignored.
    pub fn apply_query<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in pairs {
            match key {
                "quality" => {
                    self.quality_override = parse_override(Some(value));
                    self.clear_quality_override = value.trim() == "auto";
                }
                "perf" => self.perf_overlay = is_truthy(value),
                "debug" => self.debug_logging = is_truthy(value),
                "frustum" => match value.parse::<f32>() {
                    Ok(f) if f.is_finite() && f > 0.0 => self.frustum_size = f,
                    _ => log::warn!("[config] ignoring frustum={}", value),
                },
                _ => {}
            }
        }
    }

    /// Parse a raw `?a=b&c=d` query string.
    pub fn apply_query_string(&mut self, query: &str) {
        let q = query.trim_start_matches('?');
        let pairs = q
            .split('&')
            .filter(|p| !p.is_empty())
            .map(|p| p.split_once('=').unwrap_or((p, "1")));
        self.apply_query(pairs);
    }
}

#[inline]
fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "on" | "yes")
}

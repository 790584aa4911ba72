//! Adaptive quality profile.
//!
//! A capability tier is derived once per page session from static device
//! signals and optionally replaced by a persisted manual override. Detail
//! knobs are read-only functions of the tier; objects consume them at
//! construction, so changing the override requires a reload.

use std::fmt;
use std::str::FromStr;

use super::error::SceneError;

const DEFAULT_CORES: u32 = 4;
const DEFAULT_MEMORY_GB: f32 = 4.0;
const DEFAULT_MAX_TEXTURE: u32 = 4096;
const MOBILE_PENALTY: i32 = 2;

const ULTRA_MIN_SCORE: i32 = 8;
const HIGH_MIN_SCORE: i32 = 5;
const MEDIUM_MIN_SCORE: i32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityTier {
    Low,
    Medium,
    High,
    Ultra,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [Self::Low, Self::Medium, Self::High, Self::Ultra];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Ultra => "ultra",
        }
    }

    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= ULTRA_MIN_SCORE => Self::Ultra,
            s if s >= HIGH_MIN_SCORE => Self::High,
            s if s >= MEDIUM_MIN_SCORE => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "ultra" => Ok(Self::Ultra),
            other => Err(SceneError::Unsupported(format!("quality tier '{other}'"))),
        }
    }
}

/// Parse a persisted override value. `"auto"`, empty or unknown values mean
/// no override.
pub fn parse_override(value: Option<&str>) -> Option<QualityTier> {
    match value.map(str::trim) {
        None | Some("") | Some("auto") => None,
        Some(v) => v.parse().ok(),
    }
}

/// Parse an explicit tier choice made at runtime. `"auto"` clears the
/// override; unlike [`parse_override`], a typo is an error rather than a
/// silent reset.
pub fn parse_quality_request(value: &str) -> Result<Option<QualityTier>, SceneError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    value.parse().map(Some)
}

/// Raw capability hints gathered from the browser.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeviceSignals {
    pub hardware_concurrency: Option<u32>,
    pub device_memory_gb: Option<f32>,
    pub max_texture_size: Option<u32>,
    pub mobile: bool,
}

impl DeviceSignals {
    pub fn score(&self) -> i32 {
        let cores = self.hardware_concurrency.unwrap_or(DEFAULT_CORES);
        let memory = self.device_memory_gb.unwrap_or(DEFAULT_MEMORY_GB);
        let texture = self.max_texture_size.unwrap_or(DEFAULT_MAX_TEXTURE);

        let core_pts = match cores {
            c if c >= 12 => 3,
            c if c >= 8 => 2,
            c if c >= 4 => 1,
            _ => 0,
        };
        let mem_pts = if memory >= 8.0 {
            3
        } else if memory >= 4.0 {
            2
        } else if memory >= 2.0 {
            1
        } else {
            0
        };
        let tex_pts = match texture {
            t if t >= 16384 => 3,
            t if t >= 8192 => 2,
            t if t >= 4096 => 1,
            _ => 0,
        };
        let penalty = if self.mobile { MOBILE_PENALTY } else { 0 };
        core_pts + mem_pts + tex_pts - penalty
    }
}

/// Where the active tier came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierSource {
    Detected,
    Override,
    /// Probing failed; conservative defaults apply.
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityProfile {
    pub tier: QualityTier,
    pub source: TierSource,
    pub score: Option<i32>,
}

impl QualityProfile {
    pub fn detected(signals: &DeviceSignals) -> Self {
        let score = signals.score();
        Self {
            tier: QualityTier::from_score(score),
            source: TierSource::Detected,
            score: Some(score),
        }
    }

    pub fn fallback() -> Self {
        Self {
            tier: QualityTier::Low,
            source: TierSource::Fallback,
            score: None,
        }
    }

    /// Resolve the session profile. An override wins; a probe error falls
    /// back to the lowest tier instead of propagating.
    pub fn resolve(
        signals: Result<DeviceSignals, SceneError>,
        override_tier: Option<QualityTier>,
    ) -> Self {
        let base = match signals {
            Ok(s) => Self::detected(&s),
            Err(e) => {
                log::warn!("[quality] {}; using lowest tier defaults", e);
                Self::fallback()
            }
        };
        match override_tier {
            Some(tier) => Self {
                tier,
                source: TierSource::Override,
                score: base.score,
            },
            None => base,
        }
    }

    pub fn dpr_clamp(&self) -> f32 {
        match self.tier {
            QualityTier::Low => 1.0,
            QualityTier::Medium => 1.5,
            QualityTier::High => 2.0,
            QualityTier::Ultra => 2.5,
        }
    }

    /// Multiplier applied to geometry segment counts.
    pub fn subdivision_factor(&self) -> f32 {
        match self.tier {
            QualityTier::Low => 0.5,
            QualityTier::Medium => 0.75,
            QualityTier::High => 1.0,
            QualityTier::Ultra => 1.5,
        }
    }

    /// Edge length in pixels of offscreen portal render targets.
    pub fn render_target_base(&self) -> u32 {
        match self.tier {
            QualityTier::Low => 256,
            QualityTier::Medium => 512,
            QualityTier::High => 768,
            QualityTier::Ultra => 1024,
        }
    }

    pub fn physics_enabled(&self) -> bool {
        self.tier > QualityTier::Low
    }

    pub fn video_panel_enabled(&self) -> bool {
        self.tier > QualityTier::Low
    }

    pub fn physics_body_count(&self) -> usize {
        match self.tier {
            QualityTier::Low => 0,
            QualityTier::Medium => 12,
            QualityTier::High => 24,
            QualityTier::Ultra => 40,
        }
    }

    /// Scale a base segment count by the tier, never below `min`.
    pub fn segments(&self, base: u32, min: u32) -> u32 {
        ((base as f32 * self.subdivision_factor()).round() as u32).max(min)
    }
}

//! Runtime context passed explicitly to everything that used to reach for
//! page-wide globals: the quality profile, debug counters and build info.

use std::cell::Cell;

use super::quality::QualityProfile;

/// Counters written by adaptive resolution and read by the perf overlay.
#[derive(Debug, Default)]
pub struct DebugCounters {
    pub effective_dpr: Cell<f32>,
    pub frame_skips: Cell<u32>,
    pub frames: Cell<u64>,
    pub frame_ms: Cell<f32>,
}

impl DebugCounters {
    pub fn record_frame(&self, frame_sec: f32) {
        self.frames.set(self.frames.get() + 1);
        self.frame_ms.set(frame_sec * 1000.0);
    }

    pub fn summary(&self) -> String {
        format!(
            "dpr {:.2} • {:.1} ms • skips {} • frames {}",
            self.effective_dpr.get(),
            self.frame_ms.get(),
            self.frame_skips.get(),
            self.frames.get()
        )
    }
}

/// Build metadata injected at compile time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildInfo {
    pub commit: Option<String>,
    pub branch: Option<String>,
    pub build_time: Option<String>,
}

impl BuildInfo {
    pub fn from_env() -> Self {
        Self {
            commit: option_env!("SCENE_COMMIT").map(str::to_owned),
            branch: option_env!("SCENE_BRANCH").map(str::to_owned),
            build_time: option_env!("SCENE_BUILD_TIME").map(str::to_owned),
        }
    }

    /// Overlay text; `None` unless all three values are present.
    pub fn overlay_text(&self) -> Option<String> {
        match (&self.commit, &self.branch, &self.build_time) {
            (Some(c), Some(b), Some(t)) => {
                let short = c.get(..7).unwrap_or(c);
                Some(format!("{b}@{short} • {t}"))
            }
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct RuntimeContext {
    pub profile: QualityProfile,
    pub counters: DebugCounters,
    pub build: BuildInfo,
    pub perf_overlay: Cell<bool>,
}

impl RuntimeContext {
    pub fn new(profile: QualityProfile, build: BuildInfo, perf_overlay: bool) -> Self {
        let counters = DebugCounters::default();
        counters.effective_dpr.set(profile.dpr_clamp());
        Self {
            profile,
            counters,
            build,
            perf_overlay: Cell::new(perf_overlay),
        }
    }
}

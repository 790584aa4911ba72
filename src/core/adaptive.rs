use super::constants::*;
use super::runtime::DebugCounters;

/// Frame-budget driven device-pixel-ratio controller.
///
/// Tracks an exponential moving average of frame time. Sustained overruns
/// step the pixel ratio down (and count a skip); sustained headroom steps it
/// back up, never above the tier clamp.
#[derive(Clone, Debug)]
pub struct AdaptiveResolution {
    max_dpr: f32,
    dpr: f32,
    ema_sec: f32,
    over: u32,
    under: u32,
}

impl AdaptiveResolution {
    pub fn new(max_dpr: f32) -> Self {
        let max_dpr = max_dpr.max(DPR_FLOOR);
        Self {
            max_dpr,
            dpr: max_dpr,
            ema_sec: FRAME_BUDGET_SEC,
            over: 0,
            under: 0,
        }
    }

    #[inline]
    pub fn dpr(&self) -> f32 {
        self.dpr
    }

    #[inline]
    pub fn average_frame_sec(&self) -> f32 {
        self.ema_sec
    }

    /// Feed one frame duration. Returns the new ratio when it changed.
    pub fn record(&mut self, frame_sec: f32, counters: &DebugCounters) -> Option<f32> {
        counters.record_frame(frame_sec);
        // Ignore stalls such as a backgrounded tab.
        if !(0.0..0.5).contains(&frame_sec) {
            return None;
        }
        self.ema_sec = (1.0 - FRAME_EMA_ALPHA) * self.ema_sec + FRAME_EMA_ALPHA * frame_sec;

        if self.ema_sec > FRAME_BUDGET_SEC * 1.1 {
            self.over += 1;
            self.under = 0;
        } else if self.ema_sec < FRAME_BUDGET_SEC * HEADROOM_RATIO {
            self.under += 1;
            self.over = 0;
        } else {
            self.over = 0;
            self.under = 0;
        }

        let prev = self.dpr;
        if self.over >= OVER_BUDGET_FRAMES && self.dpr > DPR_FLOOR {
            self.dpr = (self.dpr - DPR_STEP).max(DPR_FLOOR);
            self.over = 0;
            counters.frame_skips.set(counters.frame_skips.get() + 1);
        } else if self.under >= UNDER_BUDGET_FRAMES && self.dpr < self.max_dpr {
            self.dpr = (self.dpr + DPR_STEP).min(self.max_dpr);
            self.under = 0;
        }

        if (self.dpr - prev).abs() > f32::EPSILON {
            counters.effective_dpr.set(self.dpr);
            log::info!("[adaptive] dpr {:.2} -> {:.2}", prev, self.dpr);
            Some(self.dpr)
        } else {
            None
        }
    }
}

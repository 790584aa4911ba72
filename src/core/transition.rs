//! Multi-stage open/close choreography for project tiles.
//!
//! Opening runs `FadeContent -> Zoom -> Modal`; closing runs the same stages
//! in reverse. Only one transition exists at a time: `open` while anything
//! is in flight is rejected, and `close` during an opening reverses it from
//! the current point.

use super::constants::{TILE_FADE_DURATION, TILE_MODAL_DURATION, TILE_ZOOM_DURATION};
use super::error::SceneError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    FadeContent,
    Zoom,
    Modal,
}

impl Stage {
    fn duration(self) -> f32 {
        match self {
            Stage::FadeContent => TILE_FADE_DURATION,
            Stage::Zoom => TILE_ZOOM_DURATION,
            Stage::Modal => TILE_MODAL_DURATION,
        }
    }

    fn next_opening(self) -> Option<Stage> {
        match self {
            Stage::FadeContent => Some(Stage::Zoom),
            Stage::Zoom => Some(Stage::Modal),
            Stage::Modal => None,
        }
    }

    fn next_closing(self) -> Option<Stage> {
        match self {
            Stage::Modal => Some(Stage::Zoom),
            Stage::Zoom => Some(Stage::FadeContent),
            Stage::FadeContent => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionState {
    Idle,
    Opening { tile: usize, stage: Stage, t: f32 },
    Open { tile: usize },
    Closing { tile: usize, stage: Stage, t: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionEvent {
    Opened(usize),
    Closed(usize),
}

/// Values the scene and DOM apply for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionFrame {
    /// Opacity of surrounding page content, 1.0 when idle.
    pub content_opacity: f32,
    /// Linear zoom progress shared by main camera framing and portal zoom.
    pub zoom_t: f32,
    pub modal_opacity: f32,
    pub active_tile: Option<usize>,
    pub event: Option<TransitionEvent>,
}

impl TransitionFrame {
    const IDLE: TransitionFrame = TransitionFrame {
        content_opacity: 1.0,
        zoom_t: 0.0,
        modal_opacity: 0.0,
        active_tile: None,
        event: None,
    };
}

#[derive(Clone, Debug)]
pub struct TransitionMachine {
    state: TransitionState,
}

impl Default for TransitionMachine {
    fn default() -> Self {
        Self {
            state: TransitionState::Idle,
        }
    }
}

impl TransitionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> TransitionState {
        self.state
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.state == TransitionState::Idle
    }

    pub fn open(&mut self, tile: usize) -> Result<(), SceneError> {
        if !self.is_idle() {
            log::debug!("[tiles] ignoring open({}) in {:?}", tile, self.state);
            return Err(SceneError::TransitionBusy);
        }
        self.state = TransitionState::Opening {
            tile,
            stage: Stage::FadeContent,
            t: 0.0,
        };
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), SceneError> {
        self.state = match self.state {
            TransitionState::Open { tile } => TransitionState::Closing {
                tile,
                stage: Stage::Modal,
                t: 0.0,
            },
            TransitionState::Opening { tile, stage, t } => TransitionState::Closing {
                tile,
                stage,
                t: (stage.duration() - t).max(0.0),
            },
            TransitionState::Closing { .. } => {
                log::debug!("[tiles] ignoring close() while already closing");
                return Err(SceneError::TransitionBusy);
            }
            TransitionState::Idle => return Ok(()),
        };
        Ok(())
    }

    /// Advance by `dt` seconds, carrying leftover time across stages.
    pub fn tick(&mut self, dt: f32) -> TransitionFrame {
        let mut remaining = dt.max(0.0);
        let mut event = None;
        loop {
            match self.state {
                TransitionState::Opening { tile, stage, t } => {
                    let t = t + remaining;
                    if t < stage.duration() {
                        self.state = TransitionState::Opening { tile, stage, t };
                        break;
                    }
                    remaining = t - stage.duration();
                    self.state = match stage.next_opening() {
                        Some(next) => TransitionState::Opening {
                            tile,
                            stage: next,
                            t: 0.0,
                        },
                        None => {
                            event = Some(TransitionEvent::Opened(tile));
                            TransitionState::Open { tile }
                        }
                    };
                }
                TransitionState::Closing { tile, stage, t } => {
                    let t = t + remaining;
                    if t < stage.duration() {
                        self.state = TransitionState::Closing { tile, stage, t };
                        break;
                    }
                    remaining = t - stage.duration();
                    self.state = match stage.next_closing() {
                        Some(next) => TransitionState::Closing {
                            tile,
                            stage: next,
                            t: 0.0,
                        },
                        None => {
                            event = Some(TransitionEvent::Closed(tile));
                            TransitionState::Idle
                        }
                    };
                }
                TransitionState::Idle | TransitionState::Open { .. } => break,
            }
        }
        let mut frame = self.frame();
        frame.event = event;
        frame
    }

    /// Current values without advancing time.
    pub fn frame(&self) -> TransitionFrame {
        match self.state {
            TransitionState::Idle => TransitionFrame::IDLE,
            TransitionState::Open { tile } => TransitionFrame {
                content_opacity: 0.0,
                zoom_t: 1.0,
                modal_opacity: 1.0,
                active_tile: Some(tile),
                event: None,
            },
            TransitionState::Opening { tile, stage, t } => {
                let p = (t / stage.duration()).clamp(0.0, 1.0);
                stage_frame(tile, stage, p)
            }
            TransitionState::Closing { tile, stage, t } => {
                let p = (t / stage.duration()).clamp(0.0, 1.0);
                stage_frame(tile, stage, 1.0 - p)
            }
        }
    }
}

/// Frame values at opening progress `p` within `stage`.
fn stage_frame(tile: usize, stage: Stage, p: f32) -> TransitionFrame {
    let (content_opacity, zoom_t, modal_opacity) = match stage {
        Stage::FadeContent => (1.0 - p, 0.0, 0.0),
        Stage::Zoom => (0.0, p, 0.0),
        Stage::Modal => (0.0, 1.0, p),
    };
    TransitionFrame {
        content_opacity,
        zoom_t,
        modal_opacity,
        active_tile: Some(tile),
        event: None,
    }
}

//! Error taxonomy for the scene layer.
//!
//! None of these ever abort page load or the render loop; callers log them
//! and leave the affected object inert.

use thiserror::Error;

use super::lifecycle::ObjectState;

#[derive(Debug, Error)]
pub enum SceneError {
    /// A required DOM anchor is not in the document.
    #[error("missing DOM anchor #{0}")]
    MissingAnchor(String),

    /// Anchors did not appear before the readiness deadline.
    #[error("timed out after {timeout_ms} ms waiting for anchors {ids:?}")]
    AnchorTimeout { ids: Vec<String>, timeout_ms: i32 },

    #[error("asset load failed for {object}: {reason}")]
    AssetLoad { object: String, reason: String },

    /// An optional capability is not available in this browser.
    #[error("unsupported capability: {0}")]
    Unsupported(String),

    /// Capability detection threw.
    #[error("device probe failed: {0}")]
    ProbeFailed(String),

    #[error("invalid lifecycle transition {from:?} -> {to:?}")]
    InvalidTransition { from: ObjectState, to: ObjectState },

    /// A tile transition is already running.
    #[error("tile transition already in progress")]
    TransitionBusy,

    #[error("gpu error: {0}")]
    Gpu(String),
}

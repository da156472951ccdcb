use thiserror::Error;

use crate::lifecycle::InputKind;

/// Everything that can go wrong while building or running the background.
///
/// None of these are meant to reach the hosting page: the lifecycle turns
/// them into a degraded (absent) background and a log line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("could not register {kind:?} listener: {reason}")]
    Listener { kind: InputKind, reason: String },

    #[error("frame loop could not be scheduled: {0}")]
    FrameLoop(String),

    #[error("draw failed: {0}")]
    Draw(String),
}

impl SceneError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SceneError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Fail with [`SceneError::InvalidParameter`] unless `value > 0`.
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<(), SceneError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid(name, format!("must be > 0, got {value}")))
    }
}

pub(crate) fn ensure_count(name: &'static str, value: u32) -> Result<(), SceneError> {
    if value > 0 {
        Ok(())
    } else {
        Err(SceneError::invalid(name, "must be at least 1"))
    }
}

use thiserror::Error;

/// Errors raised while scoring frames or driving a focus search.
///
/// Every variant is fatal for the current search: the controller never retries
/// a single step, since a gap in the frame/position sequence invalidates the
/// comparison history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FocusError {
    #[error("Invalid frame: {len} bytes is not a non-zero multiple of 4")]
    InvalidFrame { len: usize },

    #[error("Insufficient samples: {pixels} pixel(s), need at least {required}")]
    InsufficientSamples { pixels: usize, required: usize },

    #[error("Actuator range error: position {requested} outside {min}..={max}")]
    ActuatorRange { requested: u16, min: u16, max: u16 },

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Actuator error: {0}")]
    Actuator(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FocusError {
    /// True for errors caused by the frame contents rather than the camera.
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            FocusError::InvalidFrame { .. } | FocusError::InsufficientSamples { .. }
        )
    }
}

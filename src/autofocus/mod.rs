/// Contrast-detection autofocus
///
/// Hill-climbs the focus actuator on contrast feedback:
/// 1. Capture a frame at the current position and score it
/// 2. Keep stepping while the score strictly improves
/// 3. On the first decline, probe the far side of the last good position once
/// 4. On a second consecutive decline, return to the last good position
///
/// The search also stops when it would step off the actuator range while
/// still improving, or when its iteration/time budget runs out.
pub mod controller;
pub mod search;

pub use controller::{AutofocusController, SearchOutcome};
pub use search::{HillClimb, Termination, Transition};

use crate::errors::FocusError;
use crate::types::{FocusFrame, FocusPosition};

/// Camera capability consumed by the autofocus search.
///
/// Implementations own the hardware. `capture_focus_frame` must reflect the
/// most recent `command_focus` call; a stale frame breaks the comparison
/// between consecutive positions.
pub trait FocusCamera {
    /// Actuator position at search start.
    fn current_focus_position(&mut self) -> Result<FocusPosition, FocusError>;

    /// Capture a preview frame suitable for focus analysis.
    fn capture_focus_frame(&mut self) -> Result<FocusFrame, FocusError>;

    /// Move the actuator, blocking until it has settled.
    fn command_focus(&mut self, position: FocusPosition) -> Result<(), FocusError>;
}

impl<C: FocusCamera + ?Sized> FocusCamera for Box<C> {
    fn current_focus_position(&mut self) -> Result<FocusPosition, FocusError> {
        (**self).current_focus_position()
    }

    fn capture_focus_frame(&mut self) -> Result<FocusFrame, FocusError> {
        (**self).capture_focus_frame()
    }

    fn command_focus(&mut self, position: FocusPosition) -> Result<(), FocusError> {
        (**self).command_focus(position)
    }
}

/// Run a search with default settings and return the final position.
pub fn autofocus<C>(camera: &mut C) -> Result<FocusPosition, FocusError>
where
    C: FocusCamera + ?Sized,
{
    AutofocusController::default()
        .run(camera)
        .map(|outcome| outcome.position)
}

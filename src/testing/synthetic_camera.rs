use super::synthetic_data::synthetic_focus_frame;
use crate::autofocus::FocusCamera;
use crate::errors::FocusError;
use crate::types::{FocusFrame, FocusPosition};

type Landscape = Box<dyn Fn(FocusPosition) -> usize + Send>;

/// Simulated camera whose sharpness is a function of the focus position.
///
/// The landscape maps a position to a number of lit pixels out of a fixed
/// pixel count; frames with more lit pixels (up to half) score higher.
pub struct SyntheticFocusCamera {
    position: FocusPosition,
    pixels: usize,
    landscape: Landscape,
    limits: Option<(FocusPosition, FocusPosition)>,
    fail_capture_after: Option<u64>,
    commands: Vec<FocusPosition>,
    captures: u64,
}

impl SyntheticFocusCamera {
    pub fn with_landscape<F>(start: FocusPosition, pixels: usize, landscape: F) -> Self
    where
        F: Fn(FocusPosition) -> usize + Send + 'static,
    {
        Self {
            position: start,
            pixels: pixels.max(2),
            landscape: Box::new(landscape),
            limits: None,
            fail_capture_after: None,
            commands: Vec::new(),
            captures: 0,
        }
    }

    /// Unimodal landscape peaking at `peak`, flat beyond `radius` steps from it.
    pub fn peaked(start: FocusPosition, peak: FocusPosition, radius: u16) -> Self {
        let radius = usize::from(radius);
        Self::with_landscape(start, 2 * radius + 2, move |p| {
            let distance = usize::from(p.get().abs_diff(peak.get()));
            radius.saturating_sub(distance)
        })
    }

    /// Same sharpness at every position.
    pub fn flat(start: FocusPosition, lit: usize) -> Self {
        Self::with_landscape(start, 2 * lit + 2, move |_| lit)
    }

    /// Reject commands outside `min..=max` like hardware with a shorter travel.
    pub fn with_limits(mut self, min: FocusPosition, max: FocusPosition) -> Self {
        self.limits = Some((min, max));
        self
    }

    /// Fail every capture after the first `captures` frames.
    pub fn fail_capture_after(mut self, captures: u64) -> Self {
        self.fail_capture_after = Some(captures);
        self
    }

    pub fn position(&self) -> FocusPosition {
        self.position
    }

    /// Every position commanded so far, in order.
    pub fn commands(&self) -> &[FocusPosition] {
        &self.commands
    }

    pub fn captures(&self) -> u64 {
        self.captures
    }
}

impl FocusCamera for SyntheticFocusCamera {
    fn current_focus_position(&mut self) -> Result<FocusPosition, FocusError> {
        Ok(self.position)
    }

    fn capture_focus_frame(&mut self) -> Result<FocusFrame, FocusError> {
        if let Some(limit) = self.fail_capture_after {
            if self.captures >= limit {
                return Err(FocusError::Capture(format!(
                    "synthetic capture failure after {} frames",
                    limit
                )));
            }
        }
        self.captures += 1;
        let lit = (self.landscape)(self.position);
        Ok(synthetic_focus_frame(self.pixels, lit))
    }

    fn command_focus(&mut self, position: FocusPosition) -> Result<(), FocusError> {
        if let Some((min, max)) = self.limits {
            if position < min || position > max {
                return Err(FocusError::ActuatorRange {
                    requested: position.get(),
                    min: min.get(),
                    max: max.get(),
                });
            }
        }
        self.commands.push(position);
        self.position = position;
        Ok(())
    }
}

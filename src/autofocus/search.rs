use crate::contrast::ContrastScore;
use crate::types::{Direction, FocusPosition};
use serde::{Deserialize, Serialize};

/// Why a search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Two consecutive non-improving probes, one on each side of the peak
    Converged,
    /// Still improving when the next step would leave the actuator range
    RangeLimit,
    /// Iteration or time budget spent before convergence
    Exhausted,
    /// Cancellation flag raised by the caller
    Cancelled,
}

/// What the controller must do after a frame has been scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Command the position and capture another frame
    Probe(FocusPosition),
    /// Command the position, then stop
    Settle(FocusPosition, Termination),
    /// Stop where the actuator already is
    Stop(FocusPosition, Termination),
}

impl Transition {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Transition::Probe(_))
    }
}

/// Hill-climbing state, advanced once per scored frame.
///
/// `position` is always the position the next frame is captured at. The
/// search climbs while scores strictly improve; the first non-improving probe
/// jumps to the opposite side of the last good position and reverses, the
/// second one returns to the last good position and ends the search.
#[derive(Debug, Clone)]
pub struct HillClimb {
    position: FocusPosition,
    direction: Direction,
    step_size: u16,
    best_score: ContrastScore,
    best_position: FocusPosition,
    visited_worse_point: bool,
}

impl HillClimb {
    pub fn new(start: FocusPosition, step_size: u16) -> Self {
        Self {
            position: start,
            direction: Direction::Far,
            step_size: step_size.max(1),
            best_score: 0.0,
            best_position: start,
            visited_worse_point: false,
        }
    }

    pub fn position(&self) -> FocusPosition {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn best_score(&self) -> ContrastScore {
        self.best_score
    }

    /// Position of the best frame so far, or the start if nothing improved.
    pub fn best_position(&self) -> FocusPosition {
        self.best_position
    }

    pub fn visited_worse_point(&self) -> bool {
        self.visited_worse_point
    }

    /// Feed the score of the frame captured at `position()`.
    pub fn observe(&mut self, score: ContrastScore) -> Transition {
        let stride = self.direction.sign() * i32::from(self.step_size);

        if score > self.best_score {
            self.best_score = score;
            self.best_position = self.position;
            return match self.position.offset(stride) {
                Some(next) => {
                    self.position = next;
                    self.visited_worse_point = false;
                    Transition::Probe(next)
                }
                None => Transition::Stop(self.position, Termination::RangeLimit),
            };
        }

        if self.visited_worse_point {
            self.position = self.position.offset_clamped(-stride);
            return Transition::Settle(self.position, Termination::Converged);
        }

        match self.position.offset(-2 * stride) {
            Some(mirror) => {
                log::debug!(
                    "No improvement at {}, probing {} and reversing",
                    self.position,
                    mirror
                );
                self.position = mirror;
                self.direction = self.direction.reversed();
                self.visited_worse_point = true;
                Transition::Probe(mirror)
            }
            None => {
                // Nothing to probe past the range end.
                self.position = self.position.offset_clamped(-stride);
                log::warn!(
                    "Reversal probe leaves actuator range, settling at {}",
                    self.position
                );
                Transition::Settle(self.position, Termination::Converged)
            }
        }
    }
}

use super::search::{HillClimb, Termination, Transition};
use super::FocusCamera;
use crate::config::{CrabFocusConfig, SearchConfig};
use crate::contrast::{ContrastDetector, ContrastScore};
use crate::errors::FocusError;
use crate::types::FocusPosition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Result of one autofocus search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Final actuator position, already commanded to the camera
    pub position: FocusPosition,
    pub termination: Termination,
    pub frames_analyzed: u64,
    pub best_score: ContrastScore,
    pub elapsed_ms: u64,
}

impl SearchOutcome {
    /// True when the search ended on its own rather than by budget or cancellation.
    pub fn is_complete(&self) -> bool {
        matches!(
            self.termination,
            Termination::Converged | Termination::RangeLimit
        )
    }
}

/// Drives a [`FocusCamera`] through a hill-climbing contrast search.
///
/// The caller must hold exclusive control of the focus actuator for the
/// duration of [`AutofocusController::run`].
#[derive(Debug, Clone, Default)]
pub struct AutofocusController {
    config: SearchConfig,
    detector: ContrastDetector,
    cancel: Option<Arc<AtomicBool>>,
}

impl AutofocusController {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            detector: ContrastDetector::default(),
            cancel: None,
        }
    }

    pub fn from_config(config: &CrabFocusConfig) -> Self {
        Self::new(config.search.clone())
            .with_detector(ContrastDetector::new(config.detector.min_pixels as usize))
    }

    pub fn with_detector(mut self, detector: ContrastDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Stop at the next iteration once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the search to completion.
    ///
    /// Any capture, command or frame error aborts the search and is returned
    /// as-is. On exhaustion or cancellation the camera is moved back to the
    /// best position seen so far.
    pub fn run<C>(&self, camera: &mut C) -> Result<SearchOutcome, FocusError>
    where
        C: FocusCamera + ?Sized,
    {
        self.config.validate()?;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();
        let deadline = self
            .config
            .max_duration_ms
            .map(|ms| clock + Duration::from_millis(ms));

        let start = camera.current_focus_position()?;
        log::info!(
            "Starting autofocus run {}: start={}, step={}",
            run_id,
            start,
            self.config.step_size
        );

        let mut climb = HillClimb::new(start, self.config.step_size);
        let mut frames_analyzed = 0u64;

        let (position, termination) = loop {
            if let Some(reason) = self.interrupted(frames_analyzed, deadline) {
                let best = climb.best_position();
                if best != climb.position() {
                    camera.command_focus(best)?;
                }
                break (best, reason);
            }

            let frame = camera.capture_focus_frame()?;
            let score = self.detector.detect(frame.as_bytes())?;
            frames_analyzed += 1;

            log::debug!(
                "Frame {} at {}: contrast={:.3} (best {:.3})",
                frames_analyzed,
                climb.position(),
                score,
                climb.best_score()
            );

            match climb.observe(score) {
                Transition::Probe(next) => camera.command_focus(next)?,
                Transition::Settle(last, reason) => {
                    camera.command_focus(last)?;
                    break (last, reason);
                }
                Transition::Stop(last, reason) => break (last, reason),
            }
        };

        let outcome = SearchOutcome {
            run_id,
            started_at,
            position,
            termination,
            frames_analyzed,
            best_score: climb.best_score(),
            elapsed_ms: clock.elapsed().as_millis() as u64,
        };

        match termination {
            Termination::Converged | Termination::RangeLimit => log::info!(
                "Autofocus run {} finished at {} ({:?}) after {} frames",
                run_id,
                position,
                termination,
                frames_analyzed
            ),
            Termination::Exhausted | Termination::Cancelled => log::warn!(
                "Autofocus run {} stopped early ({:?}) after {} frames, best position {}",
                run_id,
                termination,
                frames_analyzed,
                position
            ),
        }

        Ok(outcome)
    }

    fn interrupted(&self, frames_analyzed: u64, deadline: Option<Instant>) -> Option<Termination> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::SeqCst) {
                return Some(Termination::Cancelled);
            }
        }
        if let Some(max) = self.config.max_iterations {
            if frames_analyzed >= max {
                return Some(Termination::Exhausted);
            }
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Some(Termination::Exhausted);
            }
        }
        None
    }
}

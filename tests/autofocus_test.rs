//! Autofocus Search Testing
//!
//! Drives the hill-climbing controller against simulated cameras:
//! - Convergence on unimodal landscapes
//! - Actuator range boundaries
//! - Flat landscapes and tie handling
//! - Iteration, time and cancellation bounds
//! - Error propagation from the camera

use crabfocus::autofocus::{autofocus, AutofocusController, FocusCamera, Termination};
use crabfocus::testing::SyntheticFocusCamera;
use crabfocus::{FocusError, FocusFrame, FocusPosition, SearchConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn pos(p: u16) -> FocusPosition {
    FocusPosition::new(p)
}

#[test]
fn test_converges_near_peak_from_below() {
    let mut camera = SyntheticFocusCamera::peaked(pos(29_900), pos(30_000), 512);
    let result = autofocus(&mut camera).unwrap();
    assert!(
        result.get().abs_diff(30_000) <= 2,
        "expected ~30000, got {}",
        result
    );
    assert_eq!(camera.position(), result);
}

#[test]
fn test_converges_near_peak_from_above() {
    // The first step goes the wrong way; one reversal must recover it
    let mut camera = SyntheticFocusCamera::peaked(pos(30_150), pos(30_000), 512);
    let outcome = AutofocusController::default().run(&mut camera).unwrap();
    assert_eq!(outcome.termination, Termination::Converged);
    assert!(outcome.position.get().abs_diff(30_000) <= 2);
}

#[test]
fn test_starting_on_peak() {
    let mut camera = SyntheticFocusCamera::peaked(pos(12_345), pos(12_345), 64);
    let outcome = AutofocusController::default().run(&mut camera).unwrap();
    assert_eq!(outcome.position, pos(12_345));
    // start, one step past, mirror probe on the other side
    assert_eq!(outcome.frames_analyzed, 3);
    assert_eq!(camera.commands(), &[pos(12_346), pos(12_344), pos(12_345)]);
}

#[test]
fn test_step_size_is_honored() {
    let mut camera = SyntheticFocusCamera::peaked(pos(1_000), pos(1_400), 1_024);
    let controller = AutofocusController::new(SearchConfig {
        step_size: 16,
        ..Default::default()
    });
    let outcome = controller.run(&mut camera).unwrap();
    assert!(outcome.position.get().abs_diff(1_400) <= 16);
    for pair in camera.commands().windows(2) {
        let moved = pair[0].get().abs_diff(pair[1].get());
        assert!(moved == 16 || moved == 32, "unexpected move {}", moved);
    }
}

#[test]
fn test_runs_off_upper_end_while_improving() {
    const FLOOR: u16 = 65_235;
    let pixels = 2 * usize::from(u16::MAX - FLOOR) + 2;
    let mut camera = SyntheticFocusCamera::with_landscape(pos(65_300), pixels, |p| {
        usize::from(p.get().saturating_sub(FLOOR))
    });
    let outcome = AutofocusController::default().run(&mut camera).unwrap();
    assert_eq!(outcome.termination, Termination::RangeLimit);
    assert_eq!(outcome.position, FocusPosition::MAX);
    assert!(camera.commands().iter().all(|p| *p <= FocusPosition::MAX));
    assert_eq!(camera.commands().last(), Some(&FocusPosition::MAX));
}

#[test]
fn test_runs_off_lower_end_while_improving() {
    let pixels = 2 * 300 + 2;
    let mut camera = SyntheticFocusCamera::with_landscape(pos(200), pixels, |p| {
        300usize.saturating_sub(usize::from(p.get()))
    });
    let outcome = AutofocusController::default().run(&mut camera).unwrap();
    assert_eq!(outcome.termination, Termination::RangeLimit);
    assert_eq!(outcome.position, FocusPosition::MIN);
}

#[test]
fn test_flat_landscape_terminates_next_to_start() {
    let mut camera = SyntheticFocusCamera::flat(pos(40_000), 0);
    let outcome = AutofocusController::default().run(&mut camera).unwrap();
    assert_eq!(outcome.termination, Termination::Converged);
    assert_eq!(outcome.frames_analyzed, 2);
    assert!(outcome.position.get().abs_diff(40_000) <= 1);
    assert_eq!(outcome.best_score, 0.0);
}

#[test]
fn test_flat_nonzero_landscape_returns_start() {
    let mut camera = SyntheticFocusCamera::flat(pos(40_000), 5);
    let outcome = AutofocusController::default().run(&mut camera).unwrap();
    assert_eq!(outcome.frames_analyzed, 3);
    assert_eq!(outcome.position, pos(40_000));
}

#[test]
fn test_flat_landscape_at_range_start() {
    let mut camera = SyntheticFocusCamera::flat(FocusPosition::MIN, 0);
    let outcome = AutofocusController::default().run(&mut camera).unwrap();
    assert_eq!(outcome.position, FocusPosition::MIN);
    assert_eq!(outcome.frames_analyzed, 1);
}

#[test]
fn test_peak_at_range_start_settles_there() {
    let mut camera = SyntheticFocusCamera::peaked(FocusPosition::MIN, FocusPosition::MIN, 32);
    let outcome = AutofocusController::default().run(&mut camera).unwrap();
    assert_eq!(outcome.termination, Termination::Converged);
    assert_eq!(outcome.position, FocusPosition::MIN);
}

#[test]
fn test_iteration_budget_returns_best_position() {
    let mut camera = SyntheticFocusCamera::peaked(pos(10_000), pos(10_500), 1_024);
    let controller = AutofocusController::new(SearchConfig {
        max_iterations: Some(20),
        ..Default::default()
    });
    let outcome = controller.run(&mut camera).unwrap();
    assert_eq!(outcome.termination, Termination::Exhausted);
    assert_eq!(outcome.frames_analyzed, 20);
    assert!(!outcome.is_complete());
    // 20 improving frames at 10000..=10019
    assert_eq!(outcome.position, pos(10_019));
    assert_eq!(camera.position(), pos(10_019));
}

#[test]
fn test_time_budget_zero_exhausts_immediately() {
    let mut camera = SyntheticFocusCamera::peaked(pos(10_000), pos(10_500), 1_024);
    let controller = AutofocusController::new(SearchConfig {
        max_duration_ms: Some(0),
        ..Default::default()
    });
    let outcome = controller.run(&mut camera).unwrap();
    assert_eq!(outcome.termination, Termination::Exhausted);
    assert_eq!(outcome.position, pos(10_000));
    assert_eq!(camera.captures(), 0);
}

/// Camera that raises the cancel flag after a fixed number of captures
struct CancellingCamera {
    inner: SyntheticFocusCamera,
    flag: Arc<AtomicBool>,
    cancel_after: u64,
}

impl FocusCamera for CancellingCamera {
    fn current_focus_position(&mut self) -> Result<FocusPosition, FocusError> {
        self.inner.current_focus_position()
    }

    fn capture_focus_frame(&mut self) -> Result<FocusFrame, FocusError> {
        let frame = self.inner.capture_focus_frame()?;
        if self.inner.captures() >= self.cancel_after {
            self.flag.store(true, Ordering::SeqCst);
        }
        Ok(frame)
    }

    fn command_focus(&mut self, position: FocusPosition) -> Result<(), FocusError> {
        self.inner.command_focus(position)
    }
}

#[test]
fn test_cancellation_mid_search() {
    let flag = Arc::new(AtomicBool::new(false));
    let mut camera = CancellingCamera {
        inner: SyntheticFocusCamera::peaked(pos(5_000), pos(6_000), 2_048),
        flag: flag.clone(),
        cancel_after: 5,
    };
    let outcome = AutofocusController::default()
        .with_cancel_flag(flag)
        .run(&mut camera)
        .unwrap();
    assert_eq!(outcome.termination, Termination::Cancelled);
    assert_eq!(outcome.frames_analyzed, 5);
    assert_eq!(outcome.position, pos(5_004));
    assert_eq!(camera.inner.position(), pos(5_004));
}

#[test]
fn test_capture_failure_aborts_search() {
    let mut camera =
        SyntheticFocusCamera::peaked(pos(100), pos(200), 256).fail_capture_after(3);
    let err = autofocus(&mut camera).unwrap_err();
    assert!(matches!(err, FocusError::Capture(_)));
    assert_eq!(camera.captures(), 3);
}

#[test]
fn test_actuator_range_error_is_fatal() {
    let mut camera = SyntheticFocusCamera::peaked(pos(95), pos(200), 256)
        .with_limits(FocusPosition::MIN, pos(100));
    let err = autofocus(&mut camera).unwrap_err();
    assert_eq!(
        err,
        FocusError::ActuatorRange {
            requested: 101,
            min: 0,
            max: 100
        }
    );
}

/// Camera that returns malformed frames
struct BrokenFrameCamera;

impl FocusCamera for BrokenFrameCamera {
    fn current_focus_position(&mut self) -> Result<FocusPosition, FocusError> {
        Ok(FocusPosition::new(10))
    }

    fn capture_focus_frame(&mut self) -> Result<FocusFrame, FocusError> {
        Ok(FocusFrame::new(vec![1, 2, 3], 1, 1))
    }

    fn command_focus(&mut self, _position: FocusPosition) -> Result<(), FocusError> {
        Ok(())
    }
}

#[test]
fn test_invalid_frame_propagates() {
    let err = autofocus(&mut BrokenFrameCamera).unwrap_err();
    assert_eq!(err, FocusError::InvalidFrame { len: 3 });
}

#[test]
fn test_boxed_trait_object_camera() {
    let mut camera: Box<dyn FocusCamera> =
        Box::new(SyntheticFocusCamera::peaked(pos(500), pos(505), 32));
    let result = autofocus(&mut camera).unwrap();
    assert_eq!(result, pos(505));
}

#[test]
fn test_outcome_serializes() {
    let mut camera = SyntheticFocusCamera::peaked(pos(500), pos(505), 32);
    let outcome = AutofocusController::default().run(&mut camera).unwrap();
    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("\"termination\":\"Converged\""));
    assert!(json.contains("\"position\":505"));
}

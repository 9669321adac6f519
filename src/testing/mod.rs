//! Testing utilities for CrabFocus
//!
//! Provides synthetic frames and a simulated focus actuator so the search
//! can be exercised offline without camera hardware.

pub mod synthetic_camera;
pub mod synthetic_data;

pub use synthetic_camera::SyntheticFocusCamera;
pub use synthetic_data::{synthetic_focus_frame, synthetic_gradient_frame};

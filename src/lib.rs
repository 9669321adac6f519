//! CrabFocus: contrast-detection autofocus
//!
//! This crate finds the focus actuator position that maximizes image
//! sharpness, using per-channel color variance as the contrast metric and a
//! hill-climbing search over the actuator range.
//!
//! # Features
//! - Single-pass, numerically stable contrast metric over RGBA frames
//! - Hill-climbing focus search with range-boundary handling
//! - Iteration, time and cancellation bounds on every search
//! - Camera access through the [`FocusCamera`] trait
//! - Synthetic camera for offline testing
//!
//! # Usage
//! ```rust,ignore
//! use crabfocus::{autofocus, FocusCamera};
//!
//! fn focus(camera: &mut impl FocusCamera) -> Result<(), crabfocus::FocusError> {
//!     let position = autofocus(camera)?;
//!     println!("in focus at {}", position);
//!     Ok(())
//! }
//! ```
pub mod autofocus;
pub mod config;
pub mod contrast;
pub mod errors;
pub mod types;

// Testing utilities - synthetic camera for offline testing
pub mod testing;

// Re-exports for convenience
pub use autofocus::{autofocus, AutofocusController, FocusCamera, SearchOutcome, Termination};
pub use config::{CrabFocusConfig, DetectorConfig, SearchConfig};
pub use contrast::{detect, ContrastDetector, ContrastMetrics, ContrastScore};
pub use errors::FocusError;
pub use types::{Direction, FocusFrame, FocusPosition};

/// Initialize logging for the focus system
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "crabfocus=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_crate_info() {
        let info = get_info();
        assert_eq!(info.name, "crabfocus");
        assert!(!info.version.is_empty());
        assert!(!info.description.is_empty());
    }
}

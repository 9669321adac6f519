/// Contrast metric for focus analysis
///
/// Scores a frame by the per-channel sample variance of its pixels, computed
/// in a single streaming pass with no per-pixel buffering.
pub mod detector;
pub mod stats;

pub use detector::{detect, ContrastDetector, ContrastMetrics, ContrastScore};
pub use stats::ChannelStats;

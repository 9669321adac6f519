use super::stats::ChannelStats;
use crate::errors::FocusError;
use crate::types::BYTES_PER_PIXEL;
use serde::{Deserialize, Serialize};

/// Scalar sharpness proxy. Only comparable between frames of the same size
/// and exposure taken during one search.
pub type ContrastScore = f64;

/// Smallest frame the sample variance is defined for.
pub const MIN_PIXELS: usize = 2;

/// Per-channel breakdown of a contrast measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastMetrics {
    pub pixel_count: usize,
    pub mean: [f64; 3],
    pub variance: [f64; 3],
    pub score: ContrastScore,
}

/// Streaming contrast detector
///
/// The score is `sqrt(var_r² + var_g² + var_b²)`: the Euclidean norm of the
/// channel variances themselves, not of their standard deviations. Search
/// behavior depends on this exact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContrastDetector {
    min_pixels: usize,
}

impl Default for ContrastDetector {
    fn default() -> Self {
        Self {
            min_pixels: MIN_PIXELS,
        }
    }
}

impl ContrastDetector {
    /// Create a detector that rejects frames smaller than `min_pixels`.
    /// Values below two are raised to two.
    pub fn new(min_pixels: usize) -> Self {
        Self {
            min_pixels: min_pixels.max(MIN_PIXELS),
        }
    }

    pub fn min_pixels(&self) -> usize {
        self.min_pixels
    }

    /// Score a frame.
    pub fn detect(&self, frame: &[u8]) -> Result<ContrastScore, FocusError> {
        Ok(self.analyze(frame)?.score)
    }

    /// Score a frame and keep the per-channel statistics.
    pub fn analyze(&self, frame: &[u8]) -> Result<ContrastMetrics, FocusError> {
        if frame.is_empty() || frame.len() % BYTES_PER_PIXEL != 0 {
            return Err(FocusError::InvalidFrame { len: frame.len() });
        }

        let pixel_count = frame.len() / BYTES_PER_PIXEL;
        if pixel_count < self.min_pixels {
            return Err(FocusError::InsufficientSamples {
                pixels: pixel_count,
                required: self.min_pixels,
            });
        }

        let mut channels = [ChannelStats::new(); 3];
        for px in frame.chunks_exact(BYTES_PER_PIXEL) {
            channels[0].push(px[0]);
            channels[1].push(px[1]);
            channels[2].push(px[2]);
        }

        let mut variance = [0.0; 3];
        for (v, stats) in variance.iter_mut().zip(channels.iter()) {
            *v = stats.sample_variance().ok_or(FocusError::InsufficientSamples {
                pixels: pixel_count,
                required: MIN_PIXELS,
            })?;
        }

        let score = (variance[0] * variance[0]
            + variance[1] * variance[1]
            + variance[2] * variance[2])
            .sqrt();

        Ok(ContrastMetrics {
            pixel_count,
            mean: [channels[0].mean(), channels[1].mean(), channels[2].mean()],
            variance,
            score,
        })
    }
}

/// Score a frame with the default detector.
pub fn detect(frame: &[u8]) -> Result<ContrastScore, FocusError> {
    ContrastDetector::default().detect(frame)
}

use serde::{Deserialize, Serialize};

/// Online mean and squared-deviation accumulator for one color channel.
///
/// Uses Welford's update so the running sums stay numerically stable for
/// large frames without a second pass over the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl ChannelStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, sample: u8) {
        let x = f64::from(sample);
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sum of squared deviations from the running mean.
    pub fn sum_squared_deviations(&self) -> f64 {
        self.m2
    }

    /// Unbiased sample variance, `None` with fewer than two samples.
    pub fn sample_variance(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        Some(self.m2 / (self.count - 1) as f64)
    }
}

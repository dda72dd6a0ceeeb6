//! Summary statistics over Monte Carlo samples

/// Standard percentiles reported for per-month approval counts
pub mod standard {
    pub const P5: f64 = 0.05;
    pub const P50: f64 = 0.50;
    pub const P95: f64 = 0.95;
}

/// Accumulates mean and sample deviation without retaining samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningStat {
    count: u64,
    sum: f64,
    sum_squares: f64,
}

impl RunningStat {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_squares += value * value;
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Sample standard deviation (n - 1 denominator), 0 below two samples.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let n = self.count as f64;
        let variance = (self.sum_squares - self.sum * self.sum / n) / (n - 1.0);
        // Cancellation can push a near-zero variance slightly negative
        variance.max(0.0).sqrt()
    }
}

/// Nearest-rank percentile of an already-sorted slice.
///
/// Returns 0 for an empty slice. `p` is a fraction in [0, 1].
#[must_use]
pub fn percentile_sorted(sorted: &[u32], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    let rank = (p * n as f64).ceil() as usize;
    f64::from(sorted[rank.clamp(1, n) - 1])
}

/// Median of an already-sorted slice, averaging the two middle elements
/// for even lengths. Returns `None` for an empty slice.
#[must_use]
pub fn median_sorted(sorted: &[u32]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    if n % 2 == 1 {
        Some(f64::from(sorted[n / 2]))
    } else {
        Some(f64::from(sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

//! Repair-depth measurement.
//!
//! [`DepthStats`] records the depth of every call for one batch size.
//! [`DepthSurvey`] runs the sampler over a ladder of batch sizes with
//! independent seeds, and [`fit_log2`] regresses mean depth on `log2(N)`.

use truncrec_core::error::SampleError;
use truncrec_core::seed::SeedHierarchy;

use crate::normal::RngNormals;
use crate::sampler::TruncatedNormalSampler;

// ---------------------------------------------------------------------------
// DepthStats
// ---------------------------------------------------------------------------

/// Depth history for one batch size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthStats {
    /// Batch size the depths were measured at.
    pub n: usize,
    /// Depth of each recorded call.
    pub depth_history: Vec<usize>,
}

impl DepthStats {
    /// Create empty stats for batch size `n`.
    pub const fn new(n: usize) -> Self {
        Self {
            n,
            depth_history: Vec::new(),
        }
    }

    pub fn record(&mut self, depth: usize) {
        self.depth_history.push(depth);
    }

    /// Average depth across recorded calls.
    pub fn mean_depth(&self) -> Option<f64> {
        if self.depth_history.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let sum: f64 = self.depth_history.iter().map(|&d| d as f64).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(sum / self.depth_history.len() as f64)
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.depth_history.iter().copied().max()
    }

    /// `log2(n)`, the regressor used by [`fit_log2`].
    pub fn log2_n(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        (self.n as f64).log2()
    }

    /// Clear recorded depths, keeping the batch size.
    pub fn reset(&mut self) {
        self.depth_history.clear();
    }
}

// ---------------------------------------------------------------------------
// LogFit
// ---------------------------------------------------------------------------

/// Least-squares line `mean_depth = slope * log2(N) + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LogFit {
    /// Predicted mean depth at batch size `n`.
    pub fn predict(&self, n: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let x = (n as f64).log2();
        self.slope.mul_add(x, self.intercept)
    }
}

/// Fit mean depth against `log2(N)`.
///
/// Empty batches (`n == 0`) have no `log2` and are skipped. Returns `None`
/// with fewer than two distinct remaining batch sizes or when a size has no
/// recorded depths.
pub fn fit_log2(stats: &[DepthStats]) -> Option<LogFit> {
    let points: Vec<(f64, f64)> = stats
        .iter()
        .filter(|s| s.n > 0)
        .map(|s| s.mean_depth().map(|d| (s.log2_n(), d)))
        .collect::<Option<_>>()?;
    if points.len() < 2 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / count;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / count;
    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx == 0.0 || !sxx.is_finite() {
        return None;
    }
    let sxy: f64 = points
        .iter()
        .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
        .sum();
    let slope = sxy / sxx;
    Some(LogFit {
        slope,
        intercept: slope.mul_add(-mean_x, mean_y),
    })
}

// ---------------------------------------------------------------------------
// DepthSurvey
// ---------------------------------------------------------------------------

/// Repeated sampling of `means = [lower_bound + mean_offset]*N` over a ladder
/// of batch sizes.
///
/// With `mean_offset = 0` every element has truncation probability one half,
/// the worst case the `O(log2 N)` depth bound is stated for.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthSurvey {
    pub sizes: Vec<usize>,
    /// Calls per batch size.
    pub trials: u32,
    pub sigma: f64,
    pub lower_bound: f64,
    /// Distance of every mean above the lower bound.
    pub mean_offset: f64,
    pub seed: u64,
}

impl Default for DepthSurvey {
    fn default() -> Self {
        Self {
            sizes: vec![10, 100, 1000, 10_000],
            trials: 100,
            sigma: 1.0,
            lower_bound: 0.0,
            mean_offset: 0.0,
            seed: 0,
        }
    }
}

impl DepthSurvey {
    /// Run every trial and collect one [`DepthStats`] per batch size.
    ///
    /// Trial `t` at size index `k` draws from
    /// `SeedHierarchy::new(seed).draw_rng(k, t)`, so a survey is reproducible
    /// and independent of the sampler's strategy.
    ///
    /// # Errors
    ///
    /// [`SampleError::InvalidParameter`] if `lower_bound` or `mean_offset` is
    /// not finite, plus any error raised by the sampler.
    pub fn run(&self, sampler: &TruncatedNormalSampler) -> Result<Vec<DepthStats>, SampleError> {
        if !self.lower_bound.is_finite() {
            return Err(SampleError::invalid("lower_bound", self.lower_bound));
        }
        if !self.mean_offset.is_finite() {
            return Err(SampleError::invalid("mean_offset", self.mean_offset));
        }

        let seeds = SeedHierarchy::new(self.seed);
        let mean = self.lower_bound + self.mean_offset;
        let mut results = Vec::with_capacity(self.sizes.len());
        let mut out = Vec::new();

        for (k, &n) in (0u32..).zip(&self.sizes) {
            let means = vec![mean; n];
            out.resize(n, 0.0);
            let mut stats = DepthStats::new(n);
            for trial in 0..self.trials {
                let mut rng = seeds.draw_rng(k, u64::from(trial));
                let report = sampler.sample_into(
                    &mut RngNormals::new(&mut rng),
                    &means,
                    self.sigma,
                    self.lower_bound,
                    &mut out,
                )?;
                stats.record(report.depth);
            }
            tracing::debug!(
                n,
                trials = self.trials,
                mean_depth = ?stats.mean_depth(),
                max_depth = ?stats.max_depth(),
                "depth survey size complete"
            );
            results.push(stats);
        }
        Ok(results)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use truncrec_core::config::{SamplerConfig, Strategy};

    #[test]
    fn stats_default_empty() {
        let stats = DepthStats::new(8);
        assert!(stats.depth_history.is_empty());
        assert!(stats.mean_depth().is_none());
        assert!(stats.max_depth().is_none());
    }

    #[test]
    fn mean_and_max_depth_compute() {
        let mut stats = DepthStats::new(8);
        for d in [2, 4, 6] {
            stats.record(d);
        }
        assert!((stats.mean_depth().unwrap() - 4.0).abs() < f64::EPSILON);
        assert_eq!(stats.max_depth(), Some(6));
        assert!((stats.log2_n() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_clears_history() {
        let mut stats = DepthStats::new(8);
        stats.record(3);
        stats.reset();
        assert!(stats.depth_history.is_empty());
        assert_eq!(stats.n, 8);
    }

    #[test]
    fn fit_recovers_exact_line() {
        // depth = 2 * log2(n) + 1
        let stats: Vec<DepthStats> = [2usize, 4, 16, 256]
            .iter()
            .map(|&n| DepthStats {
                n,
                depth_history: vec![2 * n.trailing_zeros() as usize + 1],
            })
            .collect();
        let fit = fit_log2(&stats).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.predict(1024) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn fit_needs_two_sizes() {
        let mut single = DepthStats::new(10);
        single.record(4);
        assert!(fit_log2(&[single.clone()]).is_none());
        assert!(fit_log2(&[single.clone(), single]).is_none());
    }

    #[test]
    fn fit_rejects_empty_size() {
        let mut a = DepthStats::new(10);
        a.record(4);
        let b = DepthStats::new(100);
        assert!(fit_log2(&[a, b]).is_none());
    }

    #[test]
    fn fit_skips_empty_batch_size() {
        let stats: Vec<DepthStats> = [0usize, 2, 4, 16]
            .iter()
            .map(|&n| DepthStats {
                n,
                depth_history: vec![if n == 0 { 0 } else { n.trailing_zeros() as usize + 1 }],
            })
            .collect();
        let fit = fit_log2(&stats).unwrap();
        assert!((fit.slope - 1.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn survey_with_empty_size_fits_remaining_sizes() {
        let survey = DepthSurvey {
            sizes: vec![0, 10],
            trials: 5,
            ..DepthSurvey::default()
        };
        let stats = survey.run(&TruncatedNormalSampler::default()).unwrap();
        assert_eq!(stats[0].max_depth(), Some(0));
        // Only one usable size remains.
        assert!(fit_log2(&stats).is_none());
    }

    #[test]
    fn survey_is_reproducible_and_strategy_independent() {
        let survey = DepthSurvey {
            sizes: vec![16, 256],
            trials: 20,
            seed: 9,
            ..DepthSurvey::default()
        };
        let iterative = TruncatedNormalSampler::default();
        let recursive = TruncatedNormalSampler::new(SamplerConfig {
            strategy: Strategy::Recursive,
            ..SamplerConfig::default()
        });
        let a = survey.run(&iterative).unwrap();
        let b = survey.run(&iterative).unwrap();
        let c = survey.run(&recursive).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.len(), 2);
        assert!(a.iter().all(|s| s.depth_history.len() == 20));
        assert!(a.iter().flat_map(|s| &s.depth_history).all(|&d| d >= 1));
    }

    #[test]
    fn survey_far_below_bound_has_depth_one() {
        let survey = DepthSurvey {
            sizes: vec![10, 1000],
            trials: 10,
            mean_offset: 50.0,
            ..DepthSurvey::default()
        };
        let stats = survey.run(&TruncatedNormalSampler::default()).unwrap();
        for s in &stats {
            assert_eq!(s.max_depth(), Some(1));
        }
    }

    #[test]
    fn survey_rejects_infinite_bound() {
        let survey = DepthSurvey {
            lower_bound: f64::NEG_INFINITY,
            ..DepthSurvey::default()
        };
        assert!(matches!(
            survey.run(&TruncatedNormalSampler::default()),
            Err(SampleError::InvalidParameter { .. })
        ));
    }
}

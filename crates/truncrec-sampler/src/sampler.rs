//! Lower-truncated normal sampling by rejection-repair.
//!
//! A call draws one ordinary normal variate per mean, collects the positions
//! that fell below the lower bound, redraws only those, and repeats on the
//! shrinking set until every position is accepted.  Redraws are written
//! straight back into the output buffer at their original positions, so the
//! output stays index-aligned with the means throughout.
//!
//! The set of pending positions is an explicit index list filtered in place
//! with `retain`: each level keeps a subset of its parent in the same relative
//! order, and an accepted position is never drawn again.

use rand::Rng;
use truncrec_core::config::{SamplerConfig, Strategy};
use truncrec_core::error::SampleError;

use crate::normal::{NormalSource, RngNormals};

// ---------------------------------------------------------------------------
// SampleReport
// ---------------------------------------------------------------------------

/// Cost summary of one sampling call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleReport {
    /// Number of means in the batch.
    pub len: usize,
    /// Draw levels used: `0` for an empty batch, `1` when the first draw was
    /// accepted everywhere.
    pub depth: usize,
    /// Total normal variates drawn across all levels.
    pub draws: usize,
}

impl SampleReport {
    /// Variates drawn beyond the first full batch.
    pub const fn redraws(&self) -> usize {
        self.draws - self.len
    }

    /// Fraction of drawn variates that were kept, `None` for an empty batch.
    pub fn acceptance_rate(&self) -> Option<f64> {
        if self.draws == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.len as f64 / self.draws as f64)
    }
}

// ---------------------------------------------------------------------------
// TruncatedNormalSampler
// ---------------------------------------------------------------------------

/// Vectorized sampler for `N(mean[i], sigma²)` truncated to
/// `[lower_bound, +inf)`.
///
/// The sampler holds configuration only; generator state is passed in on
/// every call.
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use truncrec_sampler::TruncatedNormalSampler;
///
/// let sampler = TruncatedNormalSampler::default();
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let samples = sampler.sample(&mut rng, &[0.0; 8], 1.0, 0.0).unwrap();
/// assert!(samples.iter().all(|&x| x >= 0.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TruncatedNormalSampler {
    config: SamplerConfig,
}

impl TruncatedNormalSampler {
    pub const fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Draw one truncated sample per mean from `rng`.
    ///
    /// # Errors
    ///
    /// [`SampleError::InvalidParameter`] if `sigma` is not finite and
    /// positive or `lower_bound` is NaN; [`SampleError::ExcessiveRecursionDepth`]
    /// if the bound could not be met within the configured depth ceiling.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        means: &[f64],
        sigma: f64,
        lower_bound: f64,
    ) -> Result<Vec<f64>, SampleError> {
        self.sample_from(&mut RngNormals::new(rng), means, sigma, lower_bound)
    }

    /// Like [`sample`](Self::sample), drawing from any [`NormalSource`].
    ///
    /// # Errors
    ///
    /// See [`sample`](Self::sample).
    pub fn sample_from<S: NormalSource + ?Sized>(
        &self,
        source: &mut S,
        means: &[f64],
        sigma: f64,
        lower_bound: f64,
    ) -> Result<Vec<f64>, SampleError> {
        self.sample_with_report(source, means, sigma, lower_bound)
            .map(|(samples, _)| samples)
    }

    /// Draw samples and report the depth and number of variates used.
    ///
    /// # Errors
    ///
    /// See [`sample`](Self::sample).
    pub fn sample_with_report<S: NormalSource + ?Sized>(
        &self,
        source: &mut S,
        means: &[f64],
        sigma: f64,
        lower_bound: f64,
    ) -> Result<(Vec<f64>, SampleReport), SampleError> {
        let mut out = vec![0.0; means.len()];
        let report = self.sample_into(source, means, sigma, lower_bound, &mut out)?;
        Ok((out, report))
    }

    /// Fill `out` with one truncated sample per mean.
    ///
    /// On error `out` is overwritten with NaN so that no partially repaired
    /// batch can be mistaken for a valid one.
    ///
    /// # Errors
    ///
    /// [`SampleError::LengthMismatch`] if `out.len() != means.len()`, plus
    /// the errors of [`sample`](Self::sample).
    pub fn sample_into<S: NormalSource + ?Sized>(
        &self,
        source: &mut S,
        means: &[f64],
        sigma: f64,
        lower_bound: f64,
        out: &mut [f64],
    ) -> Result<SampleReport, SampleError> {
        validate_params(sigma, lower_bound)?;
        if out.len() != means.len() {
            return Err(SampleError::LengthMismatch {
                expected: means.len(),
                got: out.len(),
            });
        }

        let n = means.len();
        let mut report = SampleReport {
            len: n,
            depth: 0,
            draws: 0,
        };
        if n == 0 {
            return Ok(report);
        }

        source.draw_normal(means, sigma, out);
        report.depth = 1;
        report.draws = n;

        if lower_bound == f64::NEG_INFINITY {
            tracing::debug!(n, "untruncated batch, single draw");
            return Ok(report);
        }

        let pending: Vec<usize> = (0..n).filter(|&i| out[i] < lower_bound).collect();
        if pending.is_empty() {
            tracing::debug!(n, depth = 1, "batch accepted on first draw");
            return Ok(report);
        }

        let mut repair = Repair {
            source,
            means,
            sigma,
            lower_bound,
            out: &mut *out,
            ceiling: self.config.depth_ceiling(n),
            level_means: Vec::with_capacity(pending.len()),
            level_draws: Vec::with_capacity(pending.len()),
            report,
        };
        let outcome = match self.config.strategy {
            Strategy::Iterative => repair.iterate(pending),
            Strategy::Recursive => {
                let mut pending = pending;
                repair.recurse(&mut pending)
            }
        };
        let report = repair.report;

        match outcome {
            Ok(()) => {
                tracing::debug!(
                    n,
                    depth = report.depth,
                    draws = report.draws,
                    "truncated batch repaired"
                );
                Ok(report)
            }
            Err(err) => {
                out.fill(f64::NAN);
                Err(err)
            }
        }
    }
}

/// Reject parameters before any variate is drawn.
fn validate_params(sigma: f64, lower_bound: f64) -> Result<(), SampleError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(SampleError::invalid("sigma", sigma));
    }
    if lower_bound.is_nan() {
        return Err(SampleError::invalid("lower_bound", lower_bound));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Repair loop
// ---------------------------------------------------------------------------

/// State shared by every repair level of one call.
///
/// `level_means` and `level_draws` are sized for the first repair level and
/// reused by every deeper level, which only ever needs fewer slots.
struct Repair<'a, S: ?Sized> {
    source: &'a mut S,
    means: &'a [f64],
    sigma: f64,
    lower_bound: f64,
    out: &'a mut [f64],
    ceiling: usize,
    level_means: Vec<f64>,
    level_draws: Vec<f64>,
    report: SampleReport,
}

impl<S: NormalSource + ?Sized> Repair<'_, S> {
    /// Work-list form: one loop turn per level.
    fn iterate(&mut self, mut pending: Vec<usize>) -> Result<(), SampleError> {
        while !pending.is_empty() {
            self.redraw_level(&mut pending)?;
        }
        Ok(())
    }

    /// Self-call form: one stack frame per level.
    fn recurse(&mut self, pending: &mut Vec<usize>) -> Result<(), SampleError> {
        if pending.is_empty() {
            return Ok(());
        }
        self.redraw_level(pending)?;
        self.recurse(pending)
    }

    /// Redraw every pending position, scatter the draws back into `out`, and
    /// keep only the positions that still violate the bound.
    fn redraw_level(&mut self, pending: &mut Vec<usize>) -> Result<(), SampleError> {
        if self.report.depth >= self.ceiling {
            tracing::warn!(
                ceiling = self.ceiling,
                pending = pending.len(),
                lower_bound = self.lower_bound,
                "depth ceiling reached before the lower bound was met"
            );
            return Err(SampleError::ExcessiveRecursionDepth {
                ceiling: self.ceiling,
                pending: pending.len(),
            });
        }

        tracing::trace!(
            level = self.report.depth + 1,
            pending = pending.len(),
            "redrawing violating positions"
        );

        let means = self.means;
        self.level_means.clear();
        self.level_means.extend(pending.iter().map(|&i| means[i]));
        self.level_draws.clear();
        self.level_draws.resize(pending.len(), 0.0);
        self.source
            .draw_normal(&self.level_means, self.sigma, &mut self.level_draws);

        for (&i, &draw) in pending.iter().zip(&self.level_draws) {
            self.out[i] = draw;
        }
        self.report.depth += 1;
        self.report.draws += pending.len();

        let out = &*self.out;
        let lower_bound = self.lower_bound;
        pending.retain(|&i| out[i] < lower_bound);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

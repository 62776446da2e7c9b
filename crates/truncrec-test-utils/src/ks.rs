//! One-sample Kolmogorov-Smirnov checks against normal and lower-truncated
//! normal CDFs.

use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// Standard normal survival function `1 - Phi(z)`, accurate in the upper tail.
fn normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / SQRT_2)
}

/// CDF of `N(mean, sigma²)` at `x`.
pub fn normal_cdf(x: f64, mean: f64, sigma: f64) -> f64 {
    0.5 * erfc(-(x - mean) / (sigma * SQRT_2))
}

/// CDF of `N(mean, sigma²)` truncated to `[lower, +inf)` at `x`.
///
/// Computed as `1 - S(x) / S(lower)` with `S` the survival function, which
/// keeps precision when `lower` sits in the upper tail.
pub fn truncated_normal_cdf(x: f64, mean: f64, sigma: f64, lower: f64) -> f64 {
    if x < lower {
        return 0.0;
    }
    let tail = normal_sf((lower - mean) / sigma);
    1.0 - normal_sf((x - mean) / sigma) / tail
}

/// KS statistic `D = sup |F_n(x) - F(x)|` of `samples` against `cdf`.
///
/// # Panics
///
/// Panics if `samples` is empty or contains NaN.
pub fn ks_statistic(samples: &[f64], cdf: impl Fn(f64) -> f64) -> f64 {
    assert!(!samples.is_empty(), "KS statistic needs at least one sample");
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("NaN in KS samples"));

    #[allow(clippy::cast_precision_loss)]
    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            #[allow(clippy::cast_precision_loss)]
            let i = i as f64;
            (f - i / n).max((i + 1.0) / n - f)
        })
        .fold(0.0, f64::max)
}

/// Asymptotic critical value of `D` for `n` samples at significance `alpha`.
pub fn ks_critical_value(n: usize, alpha: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = n as f64;
    (-0.5 * (alpha / 2.0).ln()).sqrt() / n.sqrt()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_cdf_reference_points() {
        assert!((normal_cdf(0.0, 0.0, 1.0) - 0.5).abs() < 1e-12);
        assert!((normal_cdf(1.96, 0.0, 1.0) - 0.975_002_1).abs() < 1e-6);
        assert!((normal_cdf(3.0, 1.0, 2.0) - 0.841_344_7).abs() < 1e-6);
    }

    #[test]
    fn truncated_cdf_is_zero_below_and_half_normal_at_mean() {
        assert!(truncated_normal_cdf(-0.1, 0.0, 1.0, 0.0).abs() < f64::EPSILON);
        assert!(truncated_normal_cdf(0.0, 0.0, 1.0, 0.0).abs() < 1e-12);
        // Half-normal: P(X <= 1) = 2 * Phi(1) - 1
        let expected = 2.0 * normal_cdf(1.0, 0.0, 1.0) - 1.0;
        assert!((truncated_normal_cdf(1.0, 0.0, 1.0, 0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn truncated_cdf_reduces_to_normal_without_bound() {
        let a = truncated_normal_cdf(0.7, 0.2, 1.5, f64::NEG_INFINITY);
        assert!((a - normal_cdf(0.7, 0.2, 1.5)).abs() < 1e-12);
    }

    #[test]
    fn ks_statistic_of_perfect_grid_is_small() {
        // Samples at the uniform quantiles (i + 0.5) / n.
        let n = 1000;
        #[allow(clippy::cast_precision_loss)]
        let samples: Vec<f64> = (0..n).map(|i| (i as f64 + 0.5) / n as f64).collect();
        let d = ks_statistic(&samples, |x| x.clamp(0.0, 1.0));
        assert!((d - 0.5 / 1000.0).abs() < 1e-12);
    }

    #[test]
    fn ks_statistic_detects_shift() {
        let samples: Vec<f64> = (0..100).map(|i| f64::from(i) / 100.0 + 0.5).collect();
        let d = ks_statistic(&samples, |x| x.clamp(0.0, 1.0));
        assert!(d > 0.4);
    }

    #[test]
    fn critical_value_matches_table() {
        // c(0.05) ~ 1.358
        assert!((ks_critical_value(1, 0.05) - 1.358).abs() < 1e-3);
        assert!((ks_critical_value(10_000, 0.05) - 0.01358).abs() < 1e-5);
    }
}

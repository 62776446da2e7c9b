//! Ordinary normal variate generation.
//!
//! [`NormalSource`] is the only thing the sampler needs from a random
//! generator: a batch of independent `N(mean[i], sigma²)` draws.
//! [`RngNormals`] adapts any [`rand::Rng`] to it.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

// ---------------------------------------------------------------------------
// NormalSource trait
// ---------------------------------------------------------------------------

/// Batch generator of ordinary normal variates.
pub trait NormalSource {
    /// Fill `out[i]` with an independent draw from `N(means[i], sigma²)`.
    ///
    /// Callers guarantee `out.len() == means.len()` and a finite positive
    /// `sigma`. Draws must be taken in index order so that a seeded source
    /// stays reproducible.
    fn draw_normal(&mut self, means: &[f64], sigma: f64, out: &mut [f64]);
}

// ---------------------------------------------------------------------------
// RngNormals
// ---------------------------------------------------------------------------

/// [`NormalSource`] backed by a borrowed [`Rng`].
///
/// Each variate is `mean + sigma * z` with `z` from
/// [`StandardNormal`], so non-finite means carry through unchanged
/// (`NaN` stays `NaN`, `±inf` stays `±inf`).
pub struct RngNormals<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RngNormals<'a, R> {
    /// Wrap a generator.
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + ?Sized> NormalSource for RngNormals<'_, R> {
    fn draw_normal(&mut self, means: &[f64], sigma: f64, out: &mut [f64]) {
        debug_assert_eq!(means.len(), out.len());
        for (slot, &mean) in out.iter_mut().zip(means) {
            let z: f64 = StandardNormal.sample(&mut *self.rng);
            *slot = sigma.mul_add(z, mean);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn draws_fill_whole_batch() {
        let mut rng = test_rng();
        let means = [0.0; 16];
        let mut out = [f64::NAN; 16];
        RngNormals::new(&mut rng).draw_normal(&means, 1.0, &mut out);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn draws_are_deterministic_with_same_seed() {
        let means = [1.0, -2.0, 3.5];
        let mut a = [0.0; 3];
        let mut b = [0.0; 3];
        RngNormals::new(&mut test_rng()).draw_normal(&means, 0.5, &mut a);
        RngNormals::new(&mut test_rng()).draw_normal(&means, 0.5, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn draws_center_on_their_means() {
        let mut rng = test_rng();
        let means: Vec<f64> = (0..4).map(|i| f64::from(i) * 100.0).collect();
        let mut out = vec![0.0; 4];
        RngNormals::new(&mut rng).draw_normal(&means, 1.0, &mut out);
        for (o, m) in out.iter().zip(&means) {
            assert!((o - m).abs() < 8.0, "draw {o} too far from mean {m}");
        }
    }

    #[test]
    fn empirical_moments_match() {
        let mut rng = test_rng();
        let n = 20_000;
        let means = vec![3.0; n];
        let mut out = vec![0.0; n];
        RngNormals::new(&mut rng).draw_normal(&means, 2.0, &mut out);
        #[allow(clippy::cast_precision_loss)]
        let nf = n as f64;
        let mean = out.iter().sum::<f64>() / nf;
        let var = out.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (nf - 1.0);
        assert!((mean - 3.0).abs() < 0.1, "mean {mean}");
        assert!((var.sqrt() - 2.0).abs() < 0.1, "std {}", var.sqrt());
    }

    #[test]
    fn non_finite_means_propagate() {
        let mut rng = test_rng();
        let means = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY];
        let mut out = [0.0; 3];
        RngNormals::new(&mut rng).draw_normal(&means, 1.0, &mut out);
        assert!(out[0].is_nan());
        assert_eq!(out[1], f64::INFINITY);
        assert_eq!(out[2], f64::NEG_INFINITY);
    }
}

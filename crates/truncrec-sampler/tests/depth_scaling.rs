//! Integration test: repair depth grows like log2(N).
//!
//! With `means = [L]*N` each position violates with probability 1/2 per
//! draw, so the depth of a batch is the maximum of N geometric(1/2) draw
//! counts, about `log2(N) + 1.3` on average.  The survey averages 100 seeds
//! for N in {10, 100, 1000, 10000} and regresses mean depth on log2(N).

use truncrec_sampler::prelude::*;

fn survey() -> Vec<DepthStats> {
    DepthSurvey {
        seed: 31,
        ..DepthSurvey::default()
    }
    .run(&TruncatedNormalSampler::default())
    .unwrap()
}

#[test]
fn mean_depth_stays_within_log2_plus_constant() {
    for stats in survey() {
        let mean = stats.mean_depth().unwrap();
        let bound = stats.log2_n() + 4.0;
        eprintln!("n={}: mean depth {mean:.2}, bound {bound:.2}", stats.n);
        assert!(mean >= 1.0);
        assert!(mean <= bound, "n={}: mean depth {mean} > {bound}", stats.n);
    }
}

#[test]
fn depth_regression_slope_is_about_one() {
    let stats = survey();
    let fit = fit_log2(&stats).unwrap();
    eprintln!("slope={:.3}, intercept={:.3}", fit.slope, fit.intercept);
    assert!(fit.slope > 0.5, "slope {} too flat", fit.slope);
    assert!(fit.slope < 1.5, "slope {} grows faster than log2(N)", fit.slope);
    assert!(fit.intercept.abs() < 4.0, "intercept {}", fit.intercept);
}

#[test]
fn depth_is_one_when_bound_is_far_below() {
    let stats = DepthSurvey {
        trials: 20,
        mean_offset: 40.0,
        ..DepthSurvey::default()
    }
    .run(&TruncatedNormalSampler::default())
    .unwrap();
    for s in stats {
        assert_eq!(s.max_depth(), Some(1), "n={}", s.n);
    }
}

#[test]
fn largest_batch_stays_far_below_ceiling() {
    let sampler = TruncatedNormalSampler::default();
    let stats = survey();
    let largest = stats.last().unwrap();
    let ceiling = sampler.config().depth_ceiling(largest.n);
    assert!(largest.max_depth().unwrap() < ceiling / 2);
}

//! Shared test fixtures and utilities for truncrec crates.
//!
//! Provides deterministic RNG setup and Kolmogorov-Smirnov helpers for
//! checking sampler output against reference distributions.

pub mod ks;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use ks::{ks_critical_value, ks_statistic, normal_cdf, truncated_normal_cdf};
pub use rng::{deterministic_means, seeded_rng};

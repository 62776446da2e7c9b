//! Vectorized sampling from normal distributions truncated below.
//!
//! `truncrec-sampler` draws one variate per mean from
//! `N(mean[i], sigma²)` restricted to `[lower_bound, +inf)`.  It draws a full
//! batch of ordinary normals, then repeatedly redraws only the positions that
//! fell below the bound until none remain.  Generator state is always an
//! explicit parameter, so a fixed seed reproduces a call exactly.
//!
//! # Architecture
//!
//! - [`NormalSource`](normal::NormalSource) is the batch normal generator the
//!   sampler consumes; [`RngNormals`](normal::RngNormals) adapts any
//!   `rand::Rng`.
//! - [`TruncatedNormalSampler`](sampler::TruncatedNormalSampler) runs the
//!   rejection-repair loop, iteratively or recursively per
//!   [`SamplerConfig`](truncrec_core::config::SamplerConfig).
//! - [`depth`] measures how repair depth scales with batch size.
//!
//! # Quick Start
//!
//! ```
//! use truncrec_sampler::prelude::*;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let sampler = TruncatedNormalSampler::default();
//! let proposals = sampler.sample(&mut rng, &[0.3, 1.2, -0.4], 0.5, 0.0).unwrap();
//! assert_eq!(proposals.len(), 3);
//! ```

pub mod depth;
pub mod normal;
pub mod sampler;

pub use sampler::{SampleReport, TruncatedNormalSampler};

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::depth::{DepthStats, DepthSurvey, LogFit, fit_log2};
    pub use crate::normal::{NormalSource, RngNormals};
    pub use crate::sampler::{SampleReport, TruncatedNormalSampler};
    pub use truncrec_core::config::{SamplerConfig, Strategy};
    pub use truncrec_core::error::SampleError;
}

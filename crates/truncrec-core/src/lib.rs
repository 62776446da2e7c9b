// truncrec-core: errors, configuration and seed derivation for the truncrec sampler.

pub mod config;
pub mod error;
pub mod seed;

pub mod prelude {
    pub use crate::config::{SamplerConfig, Strategy};
    pub use crate::error::{ConfigError, SampleError, TruncError};
    pub use crate::seed::{SeedHierarchy, derive_seed, derive_seed_indexed};
}

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_depth_margin() -> u32 {
    64
}

/// Largest accepted `depth_margin`.
pub const MAX_DEPTH_MARGIN: u32 = 4096;

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// How the repair loop walks the shrinking set of violating positions.
///
/// Both strategies consume the generator in the same order, so for a given
/// seed they produce identical samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Explicit work-list loop. Stack usage is constant in the depth.
    #[default]
    Iterative,
    /// One nested call per repair level.
    Recursive,
}

// ---------------------------------------------------------------------------
// SamplerConfig
// ---------------------------------------------------------------------------

/// Sampler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Repair strategy (default: iterative).
    #[serde(default)]
    pub strategy: Strategy,

    /// Levels allowed on top of `ceil(log2(N + 1))` before the sampler gives
    /// up with an excessive-depth error (default: 64).
    #[serde(default = "default_depth_margin")]
    pub depth_margin: u32,

    /// Master random seed.
    #[serde(default)]
    pub seed: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            depth_margin: default_depth_margin(),
            seed: 0,
        }
    }
}

impl SamplerConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth_margin == 0 {
            return Err(ConfigError::InvalidDepthMargin(self.depth_margin));
        }
        if self.depth_margin > MAX_DEPTH_MARGIN {
            return Err(ConfigError::InvalidValue {
                field: "depth_margin".into(),
                message: format!("{} exceeds {MAX_DEPTH_MARGIN}", self.depth_margin),
            });
        }
        Ok(())
    }

    /// Maximum number of draw levels allowed for a batch of `n` means.
    ///
    /// `ceil(log2(n + 1)) + depth_margin`, and `0` for an empty batch. The
    /// margin is clamped to [`MAX_DEPTH_MARGIN`] so an unvalidated config
    /// still bounds the recursive strategy's stack depth.
    pub fn depth_ceiling(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let log2_ceil = (usize::BITS - n.leading_zeros()) as usize;
        log2_ceil + self.depth_margin.min(MAX_DEPTH_MARGIN) as usize
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

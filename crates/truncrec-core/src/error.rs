use thiserror::Error;

/// Top-level error type for truncrec.
#[derive(Debug, Error)]
pub enum TruncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sampling error: {0}")]
    Sample(#[from] SampleError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid depth_margin: {0} (must be >= 1)")]
    InvalidDepthMargin(u32),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised by a single sampling call.
///
/// Copy + static names for cheap propagation out of the repair loop.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SampleError {
    /// `sigma` was not a finite positive number, or the lower bound was NaN.
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// The repair loop ran past its safety ceiling with positions still
    /// below the lower bound.
    #[error("Excessive recursion depth: ceiling {ceiling} reached with {pending} positions pending")]
    ExcessiveRecursionDepth { ceiling: usize, pending: usize },

    /// Output buffer length does not match the number of means.
    #[error("Length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },
}

impl SampleError {
    /// Shorthand for an [`InvalidParameter`](Self::InvalidParameter) error.
    pub const fn invalid(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }
}

//! Deterministic seed derivation for reproducible sampling runs.
//!
//! [`SeedHierarchy`] provides a 3-level derivation tree:
//!
//! ```text
//! Run seed
//! └── Chain seed (per independent sampling stream, e.g. an MCMC chain)
//!     └── Draw seed (per call within a chain)
//! ```
//!
//! Each `sample` call owns its generator, so calls seeded from distinct
//! branches of the tree can run on different threads and still reproduce
//! bit-for-bit from the root seed.

use std::hash::{DefaultHasher, Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Derive a child seed from a parent seed and a string key.
///
/// Uses `DefaultHasher` (SipHash-1-3) for fast, deterministic mixing.
///
/// # Example
///
/// ```
/// use truncrec_core::seed::derive_seed;
///
/// let child = derive_seed(42, "depth_survey");
/// assert_ne!(child, 42);
/// assert_eq!(child, derive_seed(42, "depth_survey"));
/// ```
#[must_use]
pub fn derive_seed(parent: u64, key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.hash(&mut hasher);
    key.hash(&mut hasher);
    hasher.finish()
}

/// Derive a child seed from a parent seed and a numeric index.
///
/// # Example
///
/// ```
/// use truncrec_core::seed::derive_seed_indexed;
///
/// assert_ne!(derive_seed_indexed(42, 0), derive_seed_indexed(42, 1));
/// ```
#[must_use]
pub fn derive_seed_indexed(parent: u64, index: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.hash(&mut hasher);
    index.hash(&mut hasher);
    hasher.finish()
}

/// Hierarchical seed manager.
///
/// # Example
///
/// ```
/// use truncrec_core::seed::SeedHierarchy;
///
/// let seeds = SeedHierarchy::new(42);
/// let mut rng = seeds.draw_rng(0, 17);
/// # let _ = &mut rng;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedHierarchy {
    root: u64,
}

impl SeedHierarchy {
    /// Create a new hierarchy from a root seed.
    #[must_use]
    pub const fn new(root: u64) -> Self {
        Self { root }
    }

    /// The root (run-level) seed.
    #[must_use]
    pub const fn root(&self) -> u64 {
        self.root
    }

    /// Derive a seed for an independent chain.
    #[must_use]
    pub fn chain_seed(&self, chain: u32) -> u64 {
        derive_seed_indexed(self.root, u64::from(chain))
    }

    /// Derive a seed for one draw within a chain.
    #[must_use]
    pub fn draw_seed(&self, chain: u32, draw: u64) -> u64 {
        derive_seed_indexed(self.chain_seed(chain), draw)
    }

    /// Derive a seed for a named consumer (survey, benchmark, ...).
    #[must_use]
    pub fn named_seed(&self, name: &str) -> u64 {
        derive_seed(self.root, name)
    }

    /// Create a `ChaCha8Rng` from the root seed.
    #[must_use]
    pub fn root_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.root)
    }

    /// Create a `ChaCha8Rng` for a chain.
    #[must_use]
    pub fn chain_rng(&self, chain: u32) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.chain_seed(chain))
    }

    /// Create a `ChaCha8Rng` for one draw within a chain.
    #[must_use]
    pub fn draw_rng(&self, chain: u32, draw: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.draw_seed(chain, draw))
    }
}

impl Default for SeedHierarchy {
    fn default() -> Self {
        Self::new(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

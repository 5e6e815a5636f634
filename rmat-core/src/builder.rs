//! Builder utilities for configuring R-MAT generation.
//!
//! Collects the graph size, model constants, noise, seeding and execution
//! settings, and validates all of them in [`RmatBuilder::build`] before any
//! generation work starts.

use std::num::{NonZeroU64, NonZeroUsize};

use crate::{
    Result,
    error::RmatError,
    random::{DEFAULT_MAX_BLOCK_COUNT, DEFAULT_SEED, SeededGeneratorFactory},
    rmat::Rmat,
    synthesizer::{
        DEFAULT_A, DEFAULT_B, DEFAULT_C, DEFAULT_NOISE, EdgeSynthesizer, Noise,
        QuadrantProbabilities,
    },
};

/// Configures and constructs [`Rmat`] generators.
///
/// # Examples
/// ```
/// use rmat_core::RmatBuilder;
///
/// let rmat = RmatBuilder::new(1 << 10, 1 << 14)
///     .with_constants(0.45, 0.15, 0.15)
///     .with_noise(true, 0.1)
///     .with_seed(7)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(rmat.scale(), 10);
/// assert_eq!(rmat.cycles_per_edge(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct RmatBuilder {
    vertex_count: u64,
    edge_count: u64,
    a: f32,
    b: f32,
    c: f32,
    noise_enabled: bool,
    noise: f32,
    seed: u64,
    parallelism: Option<usize>,
    max_block_count: usize,
    retry_limit: Option<u64>,
}

impl RmatBuilder {
    /// Creates a builder for a graph of `vertex_count` vertices and
    /// `edge_count` edges, using Graph500 constants and no noise.
    ///
    /// # Examples
    /// ```
    /// use rmat_core::{DEFAULT_A, RmatBuilder};
    ///
    /// let builder = RmatBuilder::new(16, 64);
    /// assert_eq!(builder.vertex_count(), 16);
    /// assert_eq!(builder.constants().0, DEFAULT_A);
    /// assert!(!builder.noise().0);
    /// ```
    #[must_use]
    pub const fn new(vertex_count: u64, edge_count: u64) -> Self {
        Self {
            vertex_count,
            edge_count,
            a: DEFAULT_A,
            b: DEFAULT_B,
            c: DEFAULT_C,
            noise_enabled: false,
            noise: DEFAULT_NOISE,
            seed: DEFAULT_SEED,
            parallelism: None,
            max_block_count: DEFAULT_MAX_BLOCK_COUNT,
            retry_limit: None,
        }
    }

    /// Sets the quadrant constants `A`, `B` and `C`; `D` is `1 - A - B - C`.
    #[must_use]
    pub const fn with_constants(mut self, a: f32, b: f32, c: f32) -> Self {
        self.a = a;
        self.b = b;
        self.c = c;
        self
    }

    /// Enables or disables noise and sets its magnitude.
    #[must_use]
    pub const fn with_noise(mut self, enabled: bool, noise: f32) -> Self {
        self.noise_enabled = enabled;
        self.noise = noise;
        self
    }

    /// Sets the base seed every block seed is derived from.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Runs generation on a dedicated pool of `threads` workers instead of
    /// the global Rayon pool.
    #[must_use]
    pub const fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }

    /// Caps the number of blocks the workload is split into.
    ///
    /// The ceiling only changes how work is scheduled; the generated edges
    /// stay the same.
    #[must_use]
    pub const fn with_max_block_count(mut self, max_block_count: usize) -> Self {
        self.max_block_count = max_block_count;
        self
    }

    /// Fails generation once a single edge has discarded more than `limit`
    /// consecutive out-of-range candidates. Unbounded by default.
    #[must_use]
    pub const fn with_retry_limit(mut self, limit: u64) -> Self {
        self.retry_limit = Some(limit);
        self
    }

    /// Returns the requested vertex count.
    #[must_use]
    pub const fn vertex_count(&self) -> u64 {
        self.vertex_count
    }

    /// Returns the requested edge count.
    #[must_use]
    pub const fn edge_count(&self) -> u64 {
        self.edge_count
    }

    /// Returns the configured `(A, B, C)` constants.
    #[must_use]
    pub const fn constants(&self) -> (f32, f32, f32) {
        (self.a, self.b, self.c)
    }

    /// Returns whether noise is enabled and its magnitude.
    #[must_use]
    pub const fn noise(&self) -> (bool, f32) {
        (self.noise_enabled, self.noise)
    }

    /// Returns the base seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the dedicated pool size, if one was requested.
    #[must_use]
    pub const fn parallelism(&self) -> Option<usize> {
        self.parallelism
    }

    /// Validates the configuration and constructs an [`Rmat`] generator.
    ///
    /// # Errors
    /// Returns the matching [`RmatError`] configuration variant when the
    /// vertex or edge count is zero, the constants are negative or sum past
    /// one, the noise lies outside `[0, 2]`, or the parallelism, block ceiling
    /// or retry limit is zero.
    ///
    /// # Examples
    /// ```
    /// use rmat_core::{RmatBuilder, RmatError};
    ///
    /// let err = RmatBuilder::new(8, 8)
    ///     .with_noise(true, 2.5)
    ///     .build()
    ///     .expect_err("noise above two is rejected");
    /// assert!(matches!(err, RmatError::InvalidNoise { .. }));
    /// ```
    pub fn build(self) -> Result<Rmat> {
        let vertex_count = NonZeroU64::new(self.vertex_count).ok_or(
            RmatError::InvalidVertexCount {
                got: self.vertex_count,
            },
        )?;
        let edge_count = NonZeroU64::new(self.edge_count).ok_or(RmatError::InvalidEdgeCount {
            got: self.edge_count,
        })?;
        let probabilities = QuadrantProbabilities::new(self.a, self.b, self.c)?;
        let noise = Noise::new(self.noise_enabled, self.noise)?;
        let parallelism = self
            .parallelism
            .map(|got| NonZeroUsize::new(got).ok_or(RmatError::InvalidParallelism { got }))
            .transpose()?;
        let max_block_count =
            NonZeroUsize::new(self.max_block_count).ok_or(RmatError::InvalidMaxBlockCount {
                got: self.max_block_count,
            })?;
        let retry_limit = self
            .retry_limit
            .map(|got| NonZeroU64::new(got).ok_or(RmatError::InvalidRetryLimit { got }))
            .transpose()?;

        let synthesizer =
            EdgeSynthesizer::new(vertex_count, probabilities, noise).with_retry_limit(retry_limit);
        Ok(Rmat::new(
            edge_count,
            synthesizer,
            SeededGeneratorFactory::new(self.seed),
            parallelism,
            max_block_count,
        ))
    }
}

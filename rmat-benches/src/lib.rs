//! Benchmark support crate for the R-MAT generator.
//!
//! Provides the parameter presets shared by the Criterion benchmarks so bench
//! ids stay stable across runs.

use std::fmt;

use rmat_core::{Rmat, RmatBuilder, RmatError};

/// Seed used by every benchmark configuration.
pub const SEED: u64 = 42;

/// Parameters for one generation benchmark run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerateBenchParams {
    /// Number of vertices addressed by the graph.
    pub vertex_count: u64,
    /// Number of edges to synthesize.
    pub edge_count: u64,
    /// Noise magnitude, if noise is enabled.
    pub noise: Option<f32>,
}

impl GenerateBenchParams {
    /// Builds the generator described by these parameters.
    ///
    /// # Errors
    /// Propagates [`RmatError`] if the preset is not a valid configuration.
    pub fn build(&self) -> Result<Rmat, RmatError> {
        let builder = RmatBuilder::new(self.vertex_count, self.edge_count).with_seed(SEED);
        match self.noise {
            Some(noise) => builder.with_noise(true, noise).build(),
            None => builder.build(),
        }
    }
}

impl fmt::Display for GenerateBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v={},e={}", self.vertex_count, self.edge_count)?;
        if let Some(noise) = self.noise {
            write!(f, ",noise={noise}")?;
        }
        Ok(())
    }
}

/// Graph sizes swept by the generation benchmarks, ending with a
/// non-power-of-two vertex count to include rejection overhead.
#[must_use]
pub fn size_presets() -> Vec<GenerateBenchParams> {
    [(1_u64 << 10, 1_u64 << 14), (1 << 16, 1 << 18), (100_000, 1 << 18)]
        .into_iter()
        .map(|(vertex_count, edge_count)| GenerateBenchParams {
            vertex_count,
            edge_count,
            noise: None,
        })
        .collect()
}

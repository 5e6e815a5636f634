//! R-MAT generation orchestration.
//!
//! Provides the [`Rmat`] entry point: it partitions the edge budget into
//! seeded blocks, fans the blocks out across Rayon workers, and assembles the
//! resulting edges into an [`RmatGraph`].

use std::{
    num::{NonZeroU64, NonZeroUsize},
    sync::Arc,
};

use rayon::{ThreadPoolBuilder, prelude::*};
use tracing::{info, instrument};

use crate::{
    Result,
    error::RmatError,
    graph::{Edge, RmatGraph},
    random::{Block, ElementStream, SeededGeneratorFactory, block_count_for, partition_blocks},
    synthesizer::{EdgeSynthesizer, Noise, QuadrantProbabilities},
};

/// A validated R-MAT generator.
///
/// # Examples
/// ```
/// use rmat_core::RmatBuilder;
///
/// let rmat = RmatBuilder::new(5, 100).build().expect("configuration is valid");
/// let graph = rmat.generate().expect("generation must succeed");
/// assert_eq!(graph.edge_count(), 100);
/// assert!(graph.edges().iter().all(|e| e.source() < 5 && e.target() < 5));
/// ```
#[derive(Debug, Clone)]
pub struct Rmat {
    edge_count: NonZeroU64,
    synthesizer: EdgeSynthesizer,
    seeder: SeededGeneratorFactory,
    parallelism: Option<NonZeroUsize>,
    max_block_count: NonZeroUsize,
}

impl Rmat {
    pub(crate) const fn new(
        edge_count: NonZeroU64,
        synthesizer: EdgeSynthesizer,
        seeder: SeededGeneratorFactory,
        parallelism: Option<NonZeroUsize>,
        max_block_count: NonZeroUsize,
    ) -> Self {
        Self {
            edge_count,
            synthesizer,
            seeder,
            parallelism,
            max_block_count,
        }
    }

    /// Number of vertices addressed by generated ids.
    #[must_use]
    pub const fn vertex_count(&self) -> NonZeroU64 {
        self.synthesizer.vertex_count()
    }

    /// Number of edges [`Rmat::generate`] produces.
    #[must_use]
    pub const fn edge_count(&self) -> NonZeroU64 {
        self.edge_count
    }

    /// Bit levels per edge.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.synthesizer.scale()
    }

    /// Random draws consumed per candidate edge.
    #[must_use]
    pub fn cycles_per_edge(&self) -> u64 {
        self.synthesizer.cycles_per_edge()
    }

    /// Quadrant constants.
    #[must_use]
    pub const fn probabilities(&self) -> QuadrantProbabilities {
        self.synthesizer.probabilities()
    }

    /// Noise configuration.
    #[must_use]
    pub const fn noise(&self) -> Noise {
        self.synthesizer.noise()
    }

    /// Base seed of the block generators.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seeder.base_seed()
    }

    /// Size of the dedicated worker pool, if any.
    #[must_use]
    pub const fn parallelism(&self) -> Option<NonZeroUsize> {
        self.parallelism
    }

    /// Number of blocks [`Rmat::blocks`] splits the edge budget into.
    #[must_use]
    pub fn block_count(&self) -> u64 {
        block_count_for(self.edge_count, self.cycles_per_edge(), self.max_block_count).get()
    }

    /// Partitions the edge budget into seeded blocks.
    ///
    /// The layout depends only on the edge count, cycles per edge and block
    /// ceiling, never on the worker pool. The generated edges depend on
    /// neither.
    ///
    /// # Errors
    /// Propagates [`partition_blocks`] failures.
    pub fn blocks(&self) -> Result<Vec<Block<ElementStream>>> {
        partition_blocks(
            &self.seeder,
            self.edge_count.get(),
            self.cycles_per_edge(),
            self.max_block_count,
        )
    }

    /// Generates the graph: edges from every block plus the derived vertex
    /// set.
    ///
    /// # Errors
    /// Returns [`RmatError::ThreadPool`] when the dedicated pool cannot be
    /// started and [`RmatError::RetryLimitExceeded`] when a configured retry
    /// limit trips.
    #[instrument(
        name = "core.generate",
        err,
        skip(self),
        fields(
            vertex_count = self.vertex_count().get(),
            edge_count = self.edge_count.get(),
            scale = self.scale(),
            noise = self.noise().enabled(),
            seed = self.seed(),
        ),
    )]
    pub fn generate(&self) -> Result<RmatGraph> {
        let graph = self.in_pool(|| {
            let edges = self.synthesize_blocks()?;
            Ok(RmatGraph::from_edges(edges))
        })?;
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph generated"
        );
        Ok(graph)
    }

    /// Generates only the edge list, skipping vertex derivation.
    ///
    /// Edges are concatenated in block order and each edge is keyed to its
    /// global position, so the output is identical for every parallelism
    /// setting and block ceiling.
    ///
    /// # Errors
    /// Same as [`Rmat::generate`].
    #[instrument(name = "core.generate_edges", err, skip(self))]
    pub fn generate_edges(&self) -> Result<Vec<Edge>> {
        self.in_pool(|| self.synthesize_blocks())
    }

    fn synthesize_blocks(&self) -> Result<Vec<Edge>> {
        let blocks = self.blocks()?;
        let block_count = blocks.len();
        let per_block: Vec<Vec<Edge>> = blocks
            .into_par_iter()
            .with_max_len(1)
            .map(|block| self.synthesizer.synthesize(block))
            .collect::<Result<_>>()?;

        #[cfg(feature = "metrics")]
        metrics::counter!("rmat_blocks_processed").increment(block_count as u64);
        info!(blocks = block_count, "blocks synthesized");
        Ok(per_block.concat())
    }

    fn in_pool<T, F>(&self, op: F) -> Result<T>
    where
        T: Send,
        F: FnOnce() -> Result<T> + Send,
    {
        let Some(threads) = self.parallelism else {
            return op();
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.get())
            .thread_name(|index| format!("rmat-worker-{index}"))
            .build()
            .map_err(|error| RmatError::ThreadPool {
                message: Arc::from(error.to_string()),
            })?;
        pool.install(op)
    }
}

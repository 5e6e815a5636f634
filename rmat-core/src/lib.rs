//! R-MAT core library.
//!
//! Synthesizes directed power-law graphs with the Recursive Matrix model.
//! The edge budget is split into blocks that each own a deterministically
//! seeded generator. Every edge draws from a stream keyed to its global
//! position, so output is reproducible for a fixed seed no matter how many
//! blocks the work is split into or how many workers run them.
//!
//! # Metrics
//!
//! When the `metrics` feature is enabled generation emits:
//!
//! - `rmat_edges_generated` (counter)
//! - `rmat_edges_rejected` (counter)
//! - `rmat_blocks_processed` (counter)
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod graph;
mod random;
mod rmat;
mod synthesizer;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::RmatBuilder,
    error::{Result, RmatError, RmatErrorCode},
    graph::{Edge, RmatGraph, VertexId, vertex_set},
    random::{
        Block, BlockSeeder, DEFAULT_MAX_BLOCK_COUNT, DEFAULT_SEED, ElementStream,
        MINIMUM_CYCLES_PER_BLOCK, SeededGeneratorFactory, UniformSource, partition_blocks,
    },
    rmat::Rmat,
    synthesizer::{
        DEFAULT_A, DEFAULT_B, DEFAULT_C, DEFAULT_NOISE, EdgeSynthesizer, Noise, Quadrant,
        QuadrantProbabilities, scale_for,
    },
};

//! Deterministic partitioning of random work into independently seeded blocks.
//!
//! Every block owns a private generator positioned at the block's first
//! element. The generator keys a fresh stream to each element's global
//! position, so the draws behind element `j` depend only on the base seed and
//! `j`. Blocks can therefore run on any worker in any order, and the block
//! layout itself can change, without altering the output.

use std::num::{NonZeroU64, NonZeroUsize};

use rand::{Rng, SeedableRng, distributions::Standard, rngs::SmallRng};

use crate::{Result, error::RmatError};

/// Minimum number of random draws assigned to one block before the work is
/// split further.
pub const MINIMUM_CYCLES_PER_BLOCK: u64 = 1 << 20;

/// Default ceiling on the number of blocks produced by [`partition_blocks`].
pub const DEFAULT_MAX_BLOCK_COUNT: usize = 1 << 15;

/// Base seed used when the caller does not provide one.
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;

/// SplitMix64 increment (the 64-bit golden ratio) used for per-element seed
/// derivation.
const SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

#[inline]
fn mix_element_seed(base_seed: u64, position: u64) -> u64 {
    splitmix64(base_seed ^ position.wrapping_add(1).wrapping_mul(SEED_SPACING))
}

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

/// A stateful source of uniformly distributed single-precision floats.
pub trait UniformSource {
    /// Draws the next float from `[0, 1)`, advancing the source.
    fn next_uniform_float(&mut self) -> f32;

    /// Switches to the stream of the element at global `position`.
    ///
    /// Called before each element is generated. Sources that do not key
    /// streams by element keep drawing from their current stream.
    fn begin_element(&mut self, _position: u64) {}
}

impl UniformSource for SmallRng {
    fn next_uniform_float(&mut self) -> f32 {
        self.sample(Standard)
    }
}

/// Produces one isolated generator per block.
///
/// Implementations must be pure: asking twice for the same first element
/// yields two generators that emit identical streams.
pub trait BlockSeeder {
    /// Generator handed to each block.
    type Generator: UniformSource + Send;

    /// Builds the generator for the block starting at global element
    /// `first_element`.
    fn generator_for_block(&self, first_element: u64) -> Self::Generator;
}

/// Counter-keyed generator: every element draws from its own [`SmallRng`]
/// seeded from the base seed and the element's global position.
#[derive(Clone, Debug)]
pub struct ElementStream {
    base_seed: u64,
    rng: SmallRng,
}

impl ElementStream {
    fn positioned(base_seed: u64, position: u64) -> Self {
        Self {
            base_seed,
            rng: SmallRng::seed_from_u64(mix_element_seed(base_seed, position)),
        }
    }
}

impl UniformSource for ElementStream {
    fn next_uniform_float(&mut self) -> f32 {
        self.rng.next_uniform_float()
    }

    fn begin_element(&mut self, position: u64) {
        self.rng = SmallRng::seed_from_u64(mix_element_seed(self.base_seed, position));
    }
}

/// [`BlockSeeder`] deriving [`ElementStream`]s from a single base seed.
///
/// # Examples
/// ```
/// use rmat_core::{BlockSeeder, SeededGeneratorFactory, UniformSource};
///
/// let factory = SeededGeneratorFactory::new(7);
/// let mut block = factory.generator_for_block(0);
/// let mut other = factory.generator_for_block(40);
/// block.begin_element(3);
/// other.begin_element(3);
/// assert_eq!(block.next_uniform_float(), other.next_uniform_float());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededGeneratorFactory {
    base_seed: u64,
}

impl SeededGeneratorFactory {
    /// Creates a factory rooted at `base_seed`.
    #[must_use]
    pub const fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Returns the base seed shared by every block.
    #[must_use]
    pub const fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Returns the seed of the stream behind the element at `position`.
    #[must_use]
    pub fn element_seed(&self, position: u64) -> u64 {
        mix_element_seed(self.base_seed, position)
    }
}

impl Default for SeededGeneratorFactory {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl BlockSeeder for SeededGeneratorFactory {
    type Generator = ElementStream;

    fn generator_for_block(&self, first_element: u64) -> ElementStream {
        ElementStream::positioned(self.base_seed, first_element)
    }
}

/// An independent unit of generation work.
///
/// A block is consumed exactly once: [`Block::into_parts`] hands its quota
/// and generator to the caller.
#[derive(Debug)]
pub struct Block<G> {
    index: u64,
    block_count: u64,
    first_element: u64,
    element_count: NonZeroU64,
    generator: G,
}

impl<G> Block<G> {
    /// Position of this block within the partition.
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    /// Total number of blocks in the partition.
    #[must_use]
    pub const fn block_count(&self) -> u64 {
        self.block_count
    }

    /// Global position of the block's first element.
    #[must_use]
    pub const fn first_element(&self) -> u64 {
        self.first_element
    }

    /// Number of elements this block must produce.
    #[must_use]
    pub const fn element_count(&self) -> NonZeroU64 {
        self.element_count
    }

    /// Consumes the block, yielding its quota and generator.
    #[must_use]
    pub fn into_parts(self) -> (NonZeroU64, G) {
        (self.element_count, self.generator)
    }
}

/// Splits `element_count` elements, each needing `cycles_per_element` random
/// draws, into contiguous seeded blocks.
///
/// The block count is `ceil(element_count * cycles_per_element / 2^20)`,
/// clamped to at least one and at most `min(max_block_count, element_count)`,
/// so every block receives a positive quota. The first
/// `element_count % block_count` blocks take one extra element. The layout
/// never depends on how many workers later run the blocks, and each block's
/// generator is positioned at its first element's global offset.
///
/// # Errors
/// Returns [`RmatError::EmptyWorkload`] when `element_count` is zero.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use rmat_core::{SeededGeneratorFactory, partition_blocks};
///
/// let blocks = partition_blocks(
///     &SeededGeneratorFactory::new(1),
///     10,
///     1 << 20,
///     NonZeroUsize::new(4).expect("non-zero"),
/// )?;
/// let counts: Vec<u64> = blocks.iter().map(|b| b.element_count().get()).collect();
/// assert_eq!(counts, [3, 3, 2, 2]);
/// # Ok::<(), rmat_core::RmatError>(())
/// ```
pub fn partition_blocks<S: BlockSeeder>(
    seeder: &S,
    element_count: u64,
    cycles_per_element: u64,
    max_block_count: NonZeroUsize,
) -> Result<Vec<Block<S::Generator>>> {
    let total = NonZeroU64::new(element_count).ok_or(RmatError::EmptyWorkload)?;
    let block_count = block_count_for(total, cycles_per_element, max_block_count);
    // block_count never exceeds total, so every block gets at least one element.
    let per_block = NonZeroU64::new(total.get() / block_count.get()).unwrap_or(NonZeroU64::MIN);
    let remainder = total.get() % block_count.get();

    let mut first_element = 0_u64;
    let blocks = (0..block_count.get())
        .map(|index| {
            let element_count = per_block.saturating_add(u64::from(index < remainder));
            let block = Block {
                index,
                block_count: block_count.get(),
                first_element,
                element_count,
                generator: seeder.generator_for_block(first_element),
            };
            first_element += element_count.get();
            block
        })
        .collect();
    Ok(blocks)
}

pub(crate) fn block_count_for(
    total: NonZeroU64,
    cycles_per_element: u64,
    max_block_count: NonZeroUsize,
) -> NonZeroU64 {
    let cycles = total.get().saturating_mul(cycles_per_element);
    let wanted = cycles.div_ceil(MINIMUM_CYCLES_PER_BLOCK);
    let ceiling = u64::try_from(max_block_count.get())
        .unwrap_or(u64::MAX)
        .min(total.get());
    NonZeroU64::new(wanted.clamp(1, ceiling)).unwrap_or(NonZeroU64::MIN)
}

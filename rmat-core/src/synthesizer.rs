//! R-MAT edge synthesis.
//!
//! Each edge is grown one bit at a time: every bit level picks one of the four
//! quadrants of the adjacency matrix and appends the matching bit to the
//! source and target ids. With noise enabled the quadrant probabilities are
//! jittered and renormalised after every bit.
//!
//! See Chakrabarti, Zhan and Faloutsos, "R-MAT: A Recursive Model for Graph
//! Mining" (SIAM Data Mining 2004).

use std::num::NonZeroU64;

use tracing::{debug, warn};

use crate::{
    Result,
    error::RmatError,
    graph::Edge,
    random::{Block, UniformSource},
};

/// Graph500 likelihood of quadrant (0, 0).
pub const DEFAULT_A: f32 = 0.57;
/// Graph500 likelihood of quadrant (0, 1).
pub const DEFAULT_B: f32 = 0.19;
/// Graph500 likelihood of quadrant (1, 0).
pub const DEFAULT_C: f32 = 0.19;
/// Noise magnitude used when noise is enabled without an explicit value.
pub const DEFAULT_NOISE: f32 = 0.10;

/// Upper bound on the noise magnitude; keeps every jitter factor
/// non-negative.
const MAX_NOISE: f32 = 2.0;

/// Random draws consumed per bit when noise is enabled: one for the quadrant
/// and one jitter factor per quadrant.
const NOISY_CYCLES_PER_BIT: u64 = 5;

/// Returns the number of bit levels needed to address `vertex_count`
/// vertices, i.e. the bit length of `vertex_count - 1`.
///
/// # Examples
/// ```
/// use std::num::NonZeroU64;
/// use rmat_core::scale_for;
///
/// let five = NonZeroU64::new(5).expect("non-zero");
/// assert_eq!(scale_for(five), 3);
/// assert_eq!(scale_for(NonZeroU64::MIN), 0);
/// ```
#[must_use]
pub const fn scale_for(vertex_count: NonZeroU64) -> u32 {
    u64::BITS - (vertex_count.get() - 1).leading_zeros()
}

/// Quadrant probabilities `(A, B, C)`; `D` is the remainder to one.
///
/// Setting `A = B = C = 0.25` emulates the Erdős–Rényi model. Graph500 uses
/// `A = 0.57, B = C = 0.19`, the default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadrantProbabilities {
    a: f32,
    b: f32,
    c: f32,
}

impl QuadrantProbabilities {
    /// Validates and stores the quadrant constants.
    ///
    /// # Errors
    /// Returns [`RmatError::InvalidConstants`] when any constant is negative
    /// or non-finite, or when `a + b + c > 1`.
    ///
    /// # Examples
    /// ```
    /// use rmat_core::QuadrantProbabilities;
    ///
    /// let uniform = QuadrantProbabilities::new(0.25, 0.25, 0.25)?;
    /// assert_eq!(uniform.d(), 0.25);
    /// assert!(QuadrantProbabilities::new(0.5, 0.5, 0.5).is_err());
    /// # Ok::<(), rmat_core::RmatError>(())
    /// ```
    pub fn new(a: f32, b: f32, c: f32) -> Result<Self> {
        let valid = [a, b, c]
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0)
            && a + b + c <= 1.0;
        if !valid {
            return Err(RmatError::InvalidConstants { a, b, c });
        }
        Ok(Self { a, b, c })
    }

    /// Likelihood of source bit 0, target bit 0.
    #[must_use]
    pub const fn a(&self) -> f32 {
        self.a
    }

    /// Likelihood of source bit 0, target bit 1.
    #[must_use]
    pub const fn b(&self) -> f32 {
        self.b
    }

    /// Likelihood of source bit 1, target bit 0.
    #[must_use]
    pub const fn c(&self) -> f32 {
        self.c
    }

    /// Likelihood of source bit 1, target bit 1.
    #[must_use]
    pub fn d(&self) -> f32 {
        1.0 - self.a - self.b - self.c
    }
}

impl Default for QuadrantProbabilities {
    fn default() -> Self {
        Self {
            a: DEFAULT_A,
            b: DEFAULT_B,
            c: DEFAULT_C,
        }
    }
}

/// Per-bit perturbation of the quadrant probabilities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Noise {
    enabled: bool,
    magnitude: f32,
}

impl Noise {
    /// Validates and stores the noise configuration.
    ///
    /// The magnitude is validated even when noise is disabled.
    ///
    /// # Errors
    /// Returns [`RmatError::InvalidNoise`] unless `magnitude` lies within
    /// `[0, 2]`.
    ///
    /// # Examples
    /// ```
    /// use rmat_core::Noise;
    ///
    /// let noise = Noise::new(true, 0.2)?;
    /// assert!(noise.enabled());
    /// assert!(Noise::new(true, 2.5).is_err());
    /// # Ok::<(), rmat_core::RmatError>(())
    /// ```
    pub fn new(enabled: bool, magnitude: f32) -> Result<Self> {
        if !(0.0..=MAX_NOISE).contains(&magnitude) {
            return Err(RmatError::InvalidNoise { noise: magnitude });
        }
        Ok(Self { enabled, magnitude })
    }

    /// Noise is off; the magnitude keeps its default.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            magnitude: DEFAULT_NOISE,
        }
    }

    /// Whether probabilities are perturbed.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Width of the jitter interval applied to each probability.
    #[must_use]
    pub const fn magnitude(&self) -> f32 {
        self.magnitude
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::disabled()
    }
}

/// One of the four sub-matrices chosen at a bit level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Source bit 0, target bit 0 (probability `A`).
    TopLeft,
    /// Source bit 0, target bit 1 (probability `B`).
    TopRight,
    /// Source bit 1, target bit 0 (probability `C`).
    BottomLeft,
    /// Source bit 1, target bit 1 (probability `D`).
    BottomRight,
}

impl Quadrant {
    /// Maps a uniform draw onto the cumulative `(a, b, c, d)` intervals.
    #[must_use]
    pub fn select(draw: f32, a: f32, b: f32, c: f32) -> Self {
        if draw <= a {
            Self::TopLeft
        } else if draw <= a + b {
            Self::TopRight
        } else if draw <= a + b + c {
            Self::BottomLeft
        } else {
            Self::BottomRight
        }
    }

    /// Identifies the quadrant addressed by a pair of id bits.
    #[must_use]
    pub const fn from_bits(source_bit: bool, target_bit: bool) -> Self {
        match (source_bit, target_bit) {
            (false, false) => Self::TopLeft,
            (false, true) => Self::TopRight,
            (true, false) => Self::BottomLeft,
            (true, true) => Self::BottomRight,
        }
    }

    /// Bit appended to the source id.
    #[must_use]
    pub const fn source_bit(self) -> u64 {
        match self {
            Self::TopLeft | Self::TopRight => 0,
            Self::BottomLeft | Self::BottomRight => 1,
        }
    }

    /// Bit appended to the target id.
    #[must_use]
    pub const fn target_bit(self) -> u64 {
        match self {
            Self::TopLeft | Self::BottomLeft => 0,
            Self::TopRight | Self::BottomRight => 1,
        }
    }
}

/// Turns blocks into R-MAT edges.
///
/// The synthesizer holds only immutable configuration; all per-edge state
/// lives on the stack of [`EdgeSynthesizer::synthesize`], so a single
/// instance can serve every worker concurrently.
#[derive(Clone, Debug)]
pub struct EdgeSynthesizer {
    vertex_count: NonZeroU64,
    scale: u32,
    probabilities: QuadrantProbabilities,
    noise: Noise,
    retry_limit: Option<NonZeroU64>,
}

impl EdgeSynthesizer {
    /// Creates a synthesizer for graphs with `vertex_count` vertices.
    #[must_use]
    pub const fn new(
        vertex_count: NonZeroU64,
        probabilities: QuadrantProbabilities,
        noise: Noise,
    ) -> Self {
        Self {
            vertex_count,
            scale: scale_for(vertex_count),
            probabilities,
            noise,
            retry_limit: None,
        }
    }

    /// Caps the consecutive out-of-range candidates tolerated for one edge.
    ///
    /// `None`, the default, retries without bound.
    #[must_use]
    pub const fn with_retry_limit(mut self, limit: Option<NonZeroU64>) -> Self {
        self.retry_limit = limit;
        self
    }

    /// Number of vertices addressed by generated ids.
    #[must_use]
    pub const fn vertex_count(&self) -> NonZeroU64 {
        self.vertex_count
    }

    /// Bit levels per edge.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Quadrant constants every edge starts from.
    #[must_use]
    pub const fn probabilities(&self) -> QuadrantProbabilities {
        self.probabilities
    }

    /// Noise configuration.
    #[must_use]
    pub const fn noise(&self) -> Noise {
        self.noise
    }

    /// Configured retry limit, if any.
    #[must_use]
    pub const fn retry_limit(&self) -> Option<NonZeroU64> {
        self.retry_limit
    }

    /// Random draws consumed by one accepted-or-rejected candidate edge.
    #[must_use]
    pub fn cycles_per_edge(&self) -> u64 {
        let scale = u64::from(self.scale);
        if self.noise.enabled {
            scale * NOISY_CYCLES_PER_BIT
        } else {
            scale
        }
    }

    /// Produces exactly `block.element_count()` edges from the block's
    /// generator.
    ///
    /// Candidates with an endpoint outside `[0, vertex_count)` are discarded
    /// and regenerated without counting against the quota. Retries keep
    /// drawing from the current element's stream, so edge `j` of the graph
    /// depends only on the seed and `j`.
    ///
    /// # Errors
    /// Returns [`RmatError::RetryLimitExceeded`] when a retry limit is set and
    /// one edge discards more candidates than it allows.
    pub fn synthesize<G: UniformSource>(&self, block: Block<G>) -> Result<Vec<Edge>> {
        let index = block.index();
        let mut position = block.first_element();
        let (quota, mut rng) = block.into_parts();
        let mut edges = Vec::with_capacity(usize::try_from(quota.get()).unwrap_or(0));
        let mut remaining = quota.get();
        let mut rejected = 0_u64;
        let mut consecutive = 0_u64;

        rng.begin_element(position);
        while remaining > 0 {
            let edge = self.next_candidate(&mut rng);
            if self.contains(edge) {
                edges.push(edge);
                remaining -= 1;
                consecutive = 0;
                position += 1;
                if remaining > 0 {
                    rng.begin_element(position);
                }
                continue;
            }

            rejected += 1;
            consecutive += 1;
            if let Some(limit) = self.retry_limit {
                if consecutive > limit.get() {
                    warn!(
                        block = index,
                        limit = limit.get(),
                        "retry limit exceeded while synthesizing block"
                    );
                    return Err(RmatError::RetryLimitExceeded {
                        block: index,
                        limit: limit.get(),
                    });
                }
            }
        }

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("rmat_edges_generated").increment(quota.get());
            metrics::counter!("rmat_edges_rejected").increment(rejected);
        }
        debug!(
            block = index,
            edges = quota.get(),
            rejected,
            "block synthesized"
        );
        Ok(edges)
    }

    fn contains(&self, edge: Edge) -> bool {
        edge.source() < self.vertex_count.get() && edge.target() < self.vertex_count.get()
    }

    fn next_candidate<G: UniformSource>(&self, rng: &mut G) -> Edge {
        let mut source = 0_u64;
        let mut target = 0_u64;

        // constants are reset for every edge
        let mut quadrants = [
            self.probabilities.a,
            self.probabilities.b,
            self.probabilities.c,
            self.probabilities.d(),
        ];

        for _ in 0..self.scale {
            source <<= 1;
            target <<= 1;

            let [a, b, c, _] = quadrants;
            let quadrant = Quadrant::select(rng.next_uniform_float(), a, b, c);
            source |= quadrant.source_bit();
            target |= quadrant.target_bit();

            if self.noise.enabled {
                perturb(&mut quadrants, rng, self.noise.magnitude);
            }
        }

        Edge::new(source, target)
    }
}

/// Jitters each quadrant probability, then renormalises so the four sum to
/// one again. `d` is recomputed as the remainder.
fn perturb<G: UniformSource>(quadrants: &mut [f32; 4], rng: &mut G, noise: f32) {
    for probability in quadrants.iter_mut() {
        *probability *= jitter(rng, noise);
    }

    let [a, b, c, d] = quadrants;
    let norm = 1.0 / (*a + *b + *c + *d);
    *a *= norm;
    *b *= norm;
    *c *= norm;
    // subtract rather than scale to limit rounding error
    *d = 1.0 - *a - *b - *c;
}

/// Multiplier drawn uniformly from `[1 - noise / 2, 1 + noise / 2)`.
fn jitter<G: UniformSource>(rng: &mut G, noise: f32) -> f32 {
    1.0 - noise / 2.0 + rng.next_uniform_float() * noise
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        random::{BlockSeeder, SeededGeneratorFactory, partition_blocks},
        test_utils::{ScriptedSource, suite_proptest_config},
    };
    use proptest::prelude::*;
    use rstest::rstest;
    use std::num::NonZeroUsize;

    const SUM_TOLERANCE: f32 = 8.0 * f32::EPSILON;

    fn assert_normalised(quadrants: [f32; 4]) {
        let [a, b, c, d] = quadrants;
        assert!(a >= 0.0 && b >= 0.0 && c >= 0.0, "negative probability in {quadrants:?}");
        assert!(d >= -SUM_TOLERANCE, "d fell below zero in {quadrants:?}");
        assert_eq!(d.to_bits(), (1.0 - a - b - c).to_bits());
        assert!((a + b + c + d - 1.0).abs() <= SUM_TOLERANCE, "sum drifted in {quadrants:?}");
    }

    proptest! {
        #![proptest_config(suite_proptest_config(128))]

        #[test]
        fn perturbation_keeps_probabilities_normalised(
            a in 0.0_f32..=0.5,
            b in 0.0_f32..=0.25,
            c in 0.0_f32..=0.25,
            noise in 0.0_f32..2.0,
            draws in proptest::collection::vec(0.0_f32..1.0, 4 * 8),
        ) {
            let mut quadrants = [a, b, c, 1.0 - a - b - c];
            let mut source = ScriptedSource::new(draws);
            for _ in 0..8 {
                perturb(&mut quadrants, &mut source, noise);
                assert_normalised(quadrants);
            }
        }
    }

    fn non_zero(value: u64) -> NonZeroU64 {
        NonZeroU64::new(value).expect("test value must be non-zero")
    }

    fn single_block<S: BlockSeeder>(seeder: &S, edges: u64) -> Block<S::Generator> {
        let mut blocks = partition_blocks(seeder, edges, 0, NonZeroUsize::MIN)
            .expect("partition must succeed");
        blocks.pop().expect("partition yields one block")
    }

    #[rstest]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(3, 2)]
    #[case(4, 2)]
    #[case(5, 3)]
    #[case(8, 3)]
    #[case(9, 4)]
    #[case(1 << 20, 20)]
    #[case(u64::MAX, 64)]
    fn scale_is_bit_length_of_largest_id(#[case] vertices: u64, #[case] expected: u32) {
        assert_eq!(scale_for(non_zero(vertices)), expected);
    }

    #[rstest]
    #[case::a(0.0, Quadrant::TopLeft)]
    #[case::a_boundary(0.5, Quadrant::TopLeft)]
    #[case::b(0.6, Quadrant::TopRight)]
    #[case::c(0.8, Quadrant::BottomLeft)]
    #[case::d(0.95, Quadrant::BottomRight)]
    fn select_walks_cumulative_intervals(#[case] draw: f32, #[case] expected: Quadrant) {
        assert_eq!(Quadrant::select(draw, 0.5, 0.25, 0.125), expected);
    }

    #[rstest]
    #[case(Quadrant::TopLeft)]
    #[case(Quadrant::TopRight)]
    #[case(Quadrant::BottomLeft)]
    #[case(Quadrant::BottomRight)]
    fn quadrant_bits_identify_quadrant(#[case] quadrant: Quadrant) {
        let rebuilt = Quadrant::from_bits(quadrant.source_bit() == 1, quadrant.target_bit() == 1);
        assert_eq!(rebuilt, quadrant);
    }

    #[rstest]
    #[case::negative(-0.1, 0.1, 0.1)]
    #[case::over_one(0.5, 0.5, 0.5)]
    #[case::nan(f32::NAN, 0.1, 0.1)]
    #[case::infinite(0.1, f32::INFINITY, 0.1)]
    fn rejects_invalid_constants(#[case] a: f32, #[case] b: f32, #[case] c: f32) {
        let err = QuadrantProbabilities::new(a, b, c).expect_err("constants must be rejected");
        assert!(matches!(err, RmatError::InvalidConstants { .. }));
    }

    #[rstest]
    #[case(0.0, 0.0, 0.0)]
    #[case(1.0, 0.0, 0.0)]
    #[case(0.25, 0.25, 0.25)]
    #[case(DEFAULT_A, DEFAULT_B, DEFAULT_C)]
    fn accepts_valid_constants(#[case] a: f32, #[case] b: f32, #[case] c: f32) {
        let probabilities = QuadrantProbabilities::new(a, b, c).expect("constants are valid");
        assert!(probabilities.d() >= -f32::EPSILON);
    }

    #[rstest]
    #[case(-0.01)]
    #[case(2.5)]
    #[case(f32::NAN)]
    fn rejects_invalid_noise(#[case] noise: f32) {
        let err = Noise::new(true, noise).expect_err("noise must be rejected");
        assert!(matches!(err, RmatError::InvalidNoise { .. }));
    }

    #[test]
    fn scripted_draws_build_bits_most_significant_first() {
        // B then C then D over three bits: source 0b011, target 0b101.
        let synthesizer = EdgeSynthesizer::new(
            non_zero(8),
            QuadrantProbabilities::new(0.25, 0.25, 0.25).expect("valid"),
            Noise::disabled(),
        );
        let source = ScriptedSource::new(vec![0.3, 0.6, 0.9]);
        let edges = synthesizer
            .synthesize(single_block(&source, 1))
            .expect("synthesis must succeed");
        assert_eq!(edges, vec![Edge::new(0b011, 0b101)]);
    }

    #[test]
    fn out_of_range_candidates_are_retried() {
        // With five vertices, (7, 7) is discarded and (4, 0) accepted.
        let synthesizer = EdgeSynthesizer::new(
            non_zero(5),
            QuadrantProbabilities::new(0.25, 0.25, 0.25).expect("valid"),
            Noise::disabled(),
        );
        let source = ScriptedSource::new(vec![0.9, 0.9, 0.9, 0.6, 0.1, 0.1]);
        let edges = synthesizer
            .synthesize(single_block(&source, 1))
            .expect("synthesis must succeed");
        assert_eq!(edges, vec![Edge::new(4, 0)]);
    }

    #[test]
    fn single_vertex_graph_draws_nothing() {
        let synthesizer =
            EdgeSynthesizer::new(NonZeroU64::MIN, QuadrantProbabilities::default(), Noise::disabled());
        let source = ScriptedSource::new(Vec::new());
        let edges = synthesizer
            .synthesize(single_block(&source, 4))
            .expect("synthesis must succeed");
        assert_eq!(edges, vec![Edge::new(0, 0); 4]);
        assert_eq!(synthesizer.cycles_per_edge(), 0);
    }

    #[test]
    fn noise_consumes_four_extra_draws_per_bit() {
        let synthesizer = EdgeSynthesizer::new(
            non_zero(4),
            QuadrantProbabilities::default(),
            Noise::new(true, 1.0).expect("valid noise"),
        );
        assert_eq!(synthesizer.cycles_per_edge(), 10);
        let source = ScriptedSource::new(vec![0.0; 10]);
        let edges = synthesizer
            .synthesize(single_block(&source, 1))
            .expect("synthesis must succeed");
        assert_eq!(edges, vec![Edge::new(0, 0)]);
    }

    #[test]
    fn retry_limit_stops_hopeless_blocks() {
        let synthesizer = EdgeSynthesizer::new(
            non_zero(5),
            QuadrantProbabilities::new(0.0, 0.0, 0.0).expect("valid"),
            Noise::disabled(),
        )
        .with_retry_limit(Some(non_zero(3)));
        let err = synthesizer
            .synthesize(single_block(&SeededGeneratorFactory::new(1), 2))
            .expect_err("D = 1 never lands inside five vertices");
        assert_eq!(err, RmatError::RetryLimitExceeded { block: 0, limit: 3 });
    }

    #[rstest]
    #[case::no_noise(0.0, [0.5, 0.5, 0.5, 0.5])]
    #[case::maximum_noise(2.0, [0.01, 0.99, 0.5, 0.25])]
    #[case::skewed(1.5, [0.999, 0.0, 0.3, 0.7])]
    fn perturbation_renormalises_graph500_constants(#[case] noise: f32, #[case] draws: [f32; 4]) {
        let defaults = QuadrantProbabilities::default();
        let mut quadrants = [defaults.a(), defaults.b(), defaults.c(), defaults.d()];
        let mut source = ScriptedSource::new(draws.to_vec());
        perturb(&mut quadrants, &mut source, noise);
        assert_normalised(quadrants);
    }

    #[test]
    fn retried_candidates_stay_on_the_element_stream() {
        // Only element positions are keyed, so a single-block run and a
        // split run agree edge for edge even with heavy rejection.
        let synthesizer = EdgeSynthesizer::new(
            non_zero(5),
            QuadrantProbabilities::default(),
            Noise::new(true, 0.4).expect("valid noise"),
        );
        let factory = SeededGeneratorFactory::new(21);
        let whole = synthesizer
            .synthesize(single_block(&factory, 64))
            .expect("synthesis must succeed");
        let ceiling = NonZeroUsize::new(5).expect("non-zero");
        let split: Vec<Edge> = partition_blocks(&factory, 64, 1 << 20, ceiling)
            .expect("partition must succeed")
            .into_iter()
            .flat_map(|block| synthesizer.synthesize(block).expect("synthesis must succeed"))
            .collect();
        assert_eq!(whole, split);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let mut low = ScriptedSource::new(vec![0.0]);
        let mut high = ScriptedSource::new(vec![0.999_999]);
        assert!((jitter(&mut low, 2.0) - 0.0).abs() < f32::EPSILON);
        assert!(jitter(&mut high, 2.0) < 2.0);
    }
}

use rmat_core::{Edge, Quadrant, RmatBuilder};

/// Fraction of bit levels that landed in each quadrant, in `A, B, C, D` order.
///
/// Only meaningful when the vertex count is a power of two, so that no
/// candidate was rejected and every bit level is unbiased.
pub fn quadrant_frequencies(edges: &[Edge], scale: u32) -> [f64; 4] {
    let mut counts = [0_u64; 4];
    for edge in edges {
        for level in 0..scale {
            let quadrant = Quadrant::from_bits(
                (edge.source() >> level) & 1 == 1,
                (edge.target() >> level) & 1 == 1,
            );
            let slot = match quadrant {
                Quadrant::TopLeft => 0,
                Quadrant::TopRight => 1,
                Quadrant::BottomLeft => 2,
                Quadrant::BottomRight => 3,
            };
            counts[slot] += 1;
        }
    }
    let total = counts.iter().sum::<u64>() as f64;
    counts.map(|count| count as f64 / total)
}

pub fn generate_edges(builder: RmatBuilder) -> Vec<Edge> {
    builder
        .build()
        .expect("configuration must be valid")
        .generate_edges()
        .expect("generation must succeed")
}

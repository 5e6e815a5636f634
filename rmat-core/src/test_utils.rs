//! Shared test utilities for `rmat-core`.

use proptest::test_runner::Config as ProptestConfig;
use rmat_test_support::proptest_profile::ProptestRunProfile;

use crate::random::{BlockSeeder, UniformSource};

/// Builds a proptest configuration from the shared run profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases);
    ProptestConfig {
        cases: profile.cases(),
        ..ProptestConfig::default()
    }
}

/// [`UniformSource`] replaying a fixed list of draws.
///
/// Doubles as a [`BlockSeeder`] that hands every block a fresh copy of the
/// script, which keeps synthesizer tests independent of the real RNG.
///
/// # Panics
/// Drawing past the end of the script panics, flagging tests that consume
/// more randomness than they planned for.
#[derive(Clone, Debug)]
pub(crate) struct ScriptedSource {
    draws: Vec<f32>,
    cursor: usize,
}

impl ScriptedSource {
    pub(crate) fn new(draws: Vec<f32>) -> Self {
        Self { draws, cursor: 0 }
    }
}

impl UniformSource for ScriptedSource {
    fn next_uniform_float(&mut self) -> f32 {
        let draw = self.draws.get(self.cursor).copied().unwrap_or_else(|| {
            panic!("scripted source exhausted after {} draws", self.cursor)
        });
        self.cursor += 1;
        draw
    }
}

impl BlockSeeder for ScriptedSource {
    type Generator = Self;

    fn generator_for_block(&self, _first_element: u64) -> Self {
        self.clone()
    }
}

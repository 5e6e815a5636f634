//! Shared test utilities used across rmat crates.

pub mod proptest_profile;
pub mod tracing;

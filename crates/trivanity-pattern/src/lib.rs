//! Trivanity Pattern Matching Engine
//!
//! Prefix/suffix vanity patterns, their validation against a chain's
//! address alphabet, and difficulty estimates.

mod matcher;
pub mod difficulty;

pub use matcher::{matches, PatternError, PatternMatcher, VanityPattern};
pub use difficulty::calculate_difficulty;

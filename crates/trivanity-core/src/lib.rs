//! Trivanity core engine
//!
//! Multi-chain vanity address search: one generator thread per chain,
//! progress and matches delivered over a single event stream.

mod benchmark;
mod config;
mod error;
mod generator;
mod search;
mod sink;
mod stats;

pub use benchmark::{run_benchmark, BenchmarkConfig, BenchmarkResult};
pub use config::{
    validate_pattern, ChainSettings, PlannedChain, SearchOptions, SearchPlan, SearchSettings,
};
pub use error::{BenchmarkError, ConfigurationError, SearchError};
pub use generator::{ChainGenerator, FoundResult};
pub use search::{CancelToken, FoundAction, SearchEvent, SearchOrchestrator, SearchState};
pub use sink::{
    export_results, persist_or_warn, render_result, FileResultSink, PersistenceError, ResultSink,
};
pub use stats::{format_keys, AttemptCounter, ProgressSnapshot, SearchStats};

// Re-exports for convenience
pub use trivanity_chains::{Address, AddressCodec, ChainKind, DerivationError, PrivateKey};
pub use trivanity_pattern::{
    calculate_difficulty, difficulty, matches, PatternMatcher, VanityPattern,
};

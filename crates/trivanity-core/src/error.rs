//! Error types for starting and running a search

use std::io;

use thiserror::Error;
use trivanity_chains::ChainKind;

use crate::search::SearchState;

/// Problems with what the caller asked for; nothing is started
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no chain selected; enable at least one chain")]
    NoChainSelected,
    #[error("{chain} pattern is {len} characters, but {chain} addresses only have {max} matchable characters")]
    PatternTooLong {
        chain: ChainKind,
        len: usize,
        max: usize,
    },
    #[error("{chain} addresses never contain '{ch}'")]
    InvalidCharacter { chain: ChainKind, ch: char },
    #[error("unknown chain: {0}")]
    UnknownChain(String),
}

impl From<trivanity_chains::UnknownChain> for ConfigurationError {
    fn from(err: trivanity_chains::UnknownChain) -> Self {
        ConfigurationError::UnknownChain(err.0)
    }
}

/// Failures of the orchestrator itself
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("failed to spawn search thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("search is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: SearchState,
        actual: SearchState,
    },
}

#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("failed to build benchmark thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

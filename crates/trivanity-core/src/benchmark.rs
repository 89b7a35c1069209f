//! Raw key-derivation throughput

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use trivanity_chains::ChainKind;
use trivanity_pattern::VanityPattern;

use crate::error::BenchmarkError;
use crate::generator::ChainGenerator;
use crate::stats::{AttemptCounter, SearchStats};

/// Attempts between deadline checks
const CHECK_EVERY: u32 = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    pub chain: ChainKind,
    pub duration_ms: u64,
    /// Worker threads (0 = auto)
    pub threads: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            chain: ChainKind::Ethereum,
            duration_ms: 5_000,
            threads: 0,
        }
    }
}

impl BenchmarkConfig {
    pub fn thread_count(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub chain: ChainKind,
    pub threads: usize,
    pub attempts: u64,
    pub failed_derivations: u64,
    pub elapsed_secs: f64,
    pub keys_per_second: f64,
}

/// Pins every matchable character, so a hit is practically impossible and
/// each attempt runs the full derive-and-compare path
fn saturated_pattern(chain: ChainKind) -> VanityPattern {
    let codec = chain.codec();
    let lead = codec.first_body_chars().chars().last().unwrap_or('1');
    let filler = codec.valid_address_chars().chars().last().unwrap_or('1');
    let rest = filler.to_string().repeat(codec.matchable_length().saturating_sub(1));
    VanityPattern::prefix(format!("{lead}{rest}")).case_sensitive()
}

/// Hammer `config.chain` on every thread until the duration elapses
pub fn run_benchmark(config: &BenchmarkConfig) -> Result<BenchmarkResult, BenchmarkError> {
    let threads = config.thread_count();
    let chain = config.chain;
    let pattern = saturated_pattern(chain);

    let generators = (0..threads)
        .map(|_| ChainGenerator::new(chain, pattern.clone()))
        .collect::<Result<Vec<_>, _>>()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("trivanity-bench-{i}"))
        .build()?;

    info!(chain = %chain, threads, duration_ms = config.duration_ms, "benchmark started");

    let stats = SearchStats::new([chain]);
    let deadline = Instant::now() + Duration::from_millis(config.duration_ms);

    pool.install(|| {
        generators.into_par_iter().for_each(|mut generator| {
            let mut counter = AttemptCounter::new(&stats, chain, 1024);
            while Instant::now() < deadline {
                for _ in 0..CHECK_EVERY {
                    if generator.try_once().is_err() {
                        stats.record_failed_derivation();
                    }
                    counter.record();
                }
            }
        });
    });

    let elapsed_secs = stats.elapsed().as_secs_f64();
    let attempts = stats.total_attempts();

    Ok(BenchmarkResult {
        chain,
        threads,
        attempts,
        failed_derivations: stats.failed_derivations(),
        elapsed_secs,
        keys_per_second: if elapsed_secs > 0.0 {
            attempts as f64 / elapsed_secs
        } else {
            0.0
        },
    })
}

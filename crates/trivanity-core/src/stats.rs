//! Live search statistics

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use trivanity_chains::ChainKind;
use trivanity_pattern::difficulty::{estimate_time_50pct, format_duration, match_probability};

const CHAIN_SLOTS: usize = ChainKind::ALL.len();

/// Thread-safe counters for one search session.
///
/// Workers only ever add; a new session gets a fresh instance.
#[derive(Debug)]
pub struct SearchStats {
    attempts: AtomicU64,
    per_chain: [AtomicU64; CHAIN_SLOTS],
    active: [AtomicBool; CHAIN_SLOTS],
    matches: AtomicU64,
    failed_derivations: AtomicU64,
    start_time: Instant,
}

impl SearchStats {
    /// Fresh counters; `chains` start out active
    pub fn new(chains: impl IntoIterator<Item = ChainKind>) -> Self {
        let stats = Self {
            attempts: AtomicU64::new(0),
            per_chain: Default::default(),
            active: Default::default(),
            matches: AtomicU64::new(0),
            failed_derivations: AtomicU64::new(0),
            start_time: Instant::now(),
        };
        for chain in chains {
            stats.active[chain.index()].store(true, Ordering::Relaxed);
        }
        stats
    }

    /// Add `count` attempts made on `chain`
    pub fn add_attempts(&self, chain: ChainKind, count: u64) {
        self.per_chain[chain.index()].fetch_add(count, Ordering::Relaxed);
        self.attempts.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_match(&self) {
        self.matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed_derivation(&self) {
        self.failed_derivations.fetch_add(1, Ordering::Relaxed);
    }

    /// Total attempts across all chains
    pub fn total_attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn chain_attempts(&self, chain: ChainKind) -> u64 {
        self.per_chain[chain.index()].load(Ordering::Relaxed)
    }

    pub fn total_matches(&self) -> u64 {
        self.matches.load(Ordering::Relaxed)
    }

    pub fn failed_derivations(&self) -> u64 {
        self.failed_derivations.load(Ordering::Relaxed)
    }

    /// Whether `chain` is still being searched
    pub fn is_active(&self, chain: ChainKind) -> bool {
        self.active[chain.index()].load(Ordering::Relaxed)
    }

    /// Take `chain` out of the active set; returns whether it was active
    pub fn retire(&self, chain: ChainKind) -> bool {
        self.active[chain.index()].swap(false, Ordering::Relaxed)
    }

    pub fn active_chains(&self) -> Vec<ChainKind> {
        ChainKind::ALL
            .iter()
            .copied()
            .filter(|&c| self.is_active(c))
            .collect()
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Point-in-time copy for progress reporting
    pub fn snapshot(&self) -> ProgressSnapshot {
        let elapsed = self.elapsed();
        let attempts = self.total_attempts();
        let secs = elapsed.as_secs_f64();

        ProgressSnapshot {
            attempts,
            elapsed,
            speed: if secs > 0.0 { attempts as f64 / secs } else { 0.0 },
            chains_active: self.active_chains(),
            per_chain: ChainKind::ALL
                .iter()
                .map(|&c| (c, self.chain_attempts(c)))
                .filter(|&(_, n)| n > 0)
                .collect(),
            matches: self.total_matches(),
            failed_derivations: self.failed_derivations(),
        }
    }
}

/// Worker-local attempt tally, published to [`SearchStats`] in batches.
///
/// Whatever is still pending is published on drop, so totals are exact once
/// every worker has exited.
pub struct AttemptCounter<'a> {
    stats: &'a SearchStats,
    chain: ChainKind,
    pending: u64,
    batch: u64,
}

impl<'a> AttemptCounter<'a> {
    pub fn new(stats: &'a SearchStats, chain: ChainKind, batch: u64) -> Self {
        Self {
            stats,
            chain,
            pending: 0,
            batch: batch.max(1),
        }
    }

    #[inline]
    pub fn record(&mut self) {
        self.pending += 1;
        if self.pending >= self.batch {
            self.flush();
        }
    }

    pub fn flush(&mut self) {
        if self.pending > 0 {
            self.stats.add_attempts(self.chain, self.pending);
            self.pending = 0;
        }
    }
}

impl Drop for AttemptCounter<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}

/// What the progress callback receives
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    pub attempts: u64,
    pub elapsed: Duration,
    /// Attempts per second
    pub speed: f64,
    pub chains_active: Vec<ChainKind>,
    pub per_chain: Vec<(ChainKind, u64)>,
    pub matches: u64,
    pub failed_derivations: u64,
}

impl ProgressSnapshot {
    /// One-line status, e.g. for a terminal status bar
    pub fn format(&self, difficulty: f64) -> String {
        let prob = match_probability(difficulty, self.attempts);
        let eta = estimate_time_50pct(difficulty, self.attempts, self.speed);

        format!(
            "[{}/s][Total {}][Found {}][Prob {:.1}%][50% in {}]",
            format_keys(self.speed as u64),
            format_keys(self.attempts),
            self.matches,
            prob * 100.0,
            format_duration(eta)
        )
    }
}

/// Compact count, e.g. `1.50M`
pub fn format_keys(keys: u64) -> String {
    if keys >= 1_000_000_000_000 {
        format!("{:.2}T", keys as f64 / 1e12)
    } else if keys >= 1_000_000_000 {
        format!("{:.2}G", keys as f64 / 1e9)
    } else if keys >= 1_000_000 {
        format!("{:.2}M", keys as f64 / 1e6)
    } else if keys >= 1000 {
        format!("{:.2}K", keys as f64 / 1e3)
    } else {
        format!("{}", keys)
    }
}

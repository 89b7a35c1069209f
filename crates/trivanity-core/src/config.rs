//! Search configuration as plain data.
//!
//! Nothing here touches the filesystem; the binary decides where settings
//! come from and hands them over already parsed.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trivanity_chains::ChainKind;
use trivanity_pattern::{PatternError, VanityPattern};

use crate::error::ConfigurationError;

/// Per-chain entry of [`SearchSettings`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

/// The operator-facing settings document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Persist each found result through the result sink
    #[serde(default = "default_true")]
    pub save_local: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub chains: BTreeMap<ChainKind, ChainSettings>,
}

fn default_true() -> bool {
    true
}

impl Default for SearchSettings {
    fn default() -> Self {
        let chains = ChainKind::ALL
            .iter()
            .map(|&kind| {
                (
                    kind,
                    ChainSettings {
                        enabled: true,
                        ..Default::default()
                    },
                )
            })
            .collect();

        Self {
            save_local: true,
            case_sensitive: false,
            chains,
        }
    }
}

impl SearchSettings {
    /// Chains switched on, in [`ChainKind::ALL`] order
    pub fn enabled_chains(&self) -> Vec<ChainKind> {
        ChainKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.chains.get(kind).is_some_and(|c| c.enabled))
            .collect()
    }

    /// Fill in chains missing from a partially written document
    pub fn with_defaults(mut self) -> Self {
        for kind in ChainKind::ALL {
            self.chains.entry(kind).or_default();
        }
        self
    }
}

/// One chain of a [`SearchPlan`] with its own pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChain {
    pub chain: ChainKind,
    pub pattern: VanityPattern,
}

/// Which chains to search and what each must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPlan {
    chains: Vec<PlannedChain>,
}

impl SearchPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same pattern on every listed chain
    pub fn uniform(chains: impl IntoIterator<Item = ChainKind>, pattern: &VanityPattern) -> Self {
        chains
            .into_iter()
            .fold(Self::new(), |plan, chain| plan.with_chain(chain, pattern.clone()))
    }

    /// Enabled chains of a settings document, each with its own prefix/suffix
    pub fn from_settings(settings: &SearchSettings) -> Self {
        settings
            .enabled_chains()
            .into_iter()
            .fold(Self::new(), |plan, kind| {
                let entry = &settings.chains[&kind];
                plan.with_chain(
                    kind,
                    VanityPattern::new(&entry.prefix, &entry.suffix, settings.case_sensitive),
                )
            })
    }

    /// Add a chain; a chain listed twice keeps its latest pattern
    pub fn with_chain(mut self, chain: ChainKind, pattern: VanityPattern) -> Self {
        match self.chains.iter_mut().find(|p| p.chain == chain) {
            Some(existing) => existing.pattern = pattern,
            None => self.chains.push(PlannedChain { chain, pattern }),
        }
        self
    }

    pub fn chains(&self) -> &[PlannedChain] {
        &self.chains
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Reject plans that could never produce a result
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.chains.is_empty() {
            return Err(ConfigurationError::NoChainSelected);
        }
        self.chains
            .iter()
            .try_for_each(|p| validate_pattern(p.chain, &p.pattern))
    }
}

/// Check `pattern` against the alphabet and body length of `chain`
pub fn validate_pattern(chain: ChainKind, pattern: &VanityPattern) -> Result<(), ConfigurationError> {
    let codec = chain.codec();
    pattern
        .validate(
            codec.valid_address_chars(),
            codec.first_body_chars(),
            codec.matchable_length(),
        )
        .map_err(|err| match err {
            PatternError::PatternTooLong { len, max } => {
                ConfigurationError::PatternTooLong { chain, len, max }
            }
            PatternError::InvalidCharacter(ch, _) => {
                ConfigurationError::InvalidCharacter { chain, ch }
            }
        })
}

/// Engine tuning, independent of what is searched for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Milliseconds between progress snapshots
    pub report_interval_ms: u64,
    /// Attempts a worker counts locally before publishing them
    pub count_batch: u64,
    /// Undelivered events a session buffers before workers wait on the consumer
    pub event_capacity: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            report_interval_ms: 500,
            count_batch: 256,
            event_capacity: 64,
        }
    }
}

impl SearchOptions {
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_enable_everything() {
        let settings = SearchSettings::default();
        assert_eq!(settings.enabled_chains(), ChainKind::ALL.to_vec());
        assert!(settings.save_local);
    }

    #[test]
    fn test_settings_json_shape() {
        let json = r#"{
            "save_local": true,
            "chains": {
                "ETH": { "enabled": true, "prefix": "88", "suffix": "" },
                "TRX": { "enabled": false, "prefix": "", "suffix": "" },
                "SOL": { "enabled": true, "prefix": "", "suffix": "8888" }
            }
        }"#;

        let settings: SearchSettings = serde_json::from_str(json).unwrap();
        assert!(!settings.case_sensitive);
        assert_eq!(
            settings.enabled_chains(),
            vec![ChainKind::Ethereum, ChainKind::Solana]
        );

        let plan = SearchPlan::from_settings(&settings);
        assert_eq!(plan.chains().len(), 2);
        assert_eq!(plan.chains()[0].pattern.prefix, "88");
        assert_eq!(plan.chains()[1].pattern.suffix, "8888");
    }

    #[test]
    fn test_partial_document_gets_defaults() {
        let settings: SearchSettings =
            serde_json::from_str(r#"{"chains": {"SOL": {"enabled": true}}}"#).unwrap();
        let settings = settings.with_defaults();
        assert_eq!(settings.chains.len(), 3);
        assert_eq!(settings.enabled_chains(), vec![ChainKind::Solana]);
    }

    #[test]
    fn test_empty_plan_is_rejected() {
        assert_eq!(
            SearchPlan::new().validate(),
            Err(ConfigurationError::NoChainSelected)
        );
    }

    #[test]
    fn test_plan_rejects_overlong_pattern() {
        let plan = SearchPlan::new().with_chain(ChainKind::Tron, VanityPattern::prefix("a".repeat(34)));
        assert_eq!(
            plan.validate(),
            Err(ConfigurationError::PatternTooLong {
                chain: ChainKind::Tron,
                len: 34,
                max: 33
            })
        );
    }

    #[test]
    fn test_plan_rejects_impossible_character() {
        let plan = SearchPlan::uniform([ChainKind::Solana], &VanityPattern::prefix("0"));
        assert_eq!(
            plan.validate(),
            Err(ConfigurationError::InvalidCharacter {
                chain: ChainKind::Solana,
                ch: '0'
            })
        );
    }

    #[test]
    fn test_tron_prefix_must_open_like_an_address() {
        for (prefix, ch) in [("a", 'a'), ("1", '1'), ("xyz", 'x')] {
            let plan = SearchPlan::uniform(
                [ChainKind::Tron],
                &VanityPattern::prefix(prefix).case_sensitive(),
            );
            assert_eq!(
                plan.validate(),
                Err(ConfigurationError::InvalidCharacter {
                    chain: ChainKind::Tron,
                    ch
                })
            );
        }

        // folds to 'A'
        assert_eq!(validate_pattern(ChainKind::Tron, &VanityPattern::prefix("a")), Ok(()));
        assert_eq!(
            validate_pattern(ChainKind::Tron, &VanityPattern::prefix("9abc").case_sensitive()),
            Ok(())
        );
        // the other chains and TRON suffixes are unaffected
        assert_eq!(validate_pattern(ChainKind::Solana, &VanityPattern::prefix("1")), Ok(()));
        assert_eq!(
            validate_pattern(ChainKind::Tron, &VanityPattern::suffix("1").case_sensitive()),
            Ok(())
        );
    }

    #[test]
    fn test_duplicate_chain_keeps_latest_pattern() {
        let plan = SearchPlan::new()
            .with_chain(ChainKind::Ethereum, VanityPattern::prefix("a"))
            .with_chain(ChainKind::Ethereum, VanityPattern::prefix("b"));
        assert_eq!(plan.chains().len(), 1);
        assert_eq!(plan.chains()[0].pattern.prefix, "b");
    }
}

//! One chain's "try one candidate" step

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;

use trivanity_chains::{Address, AddressCodec, ChainKind, DerivationError, PrivateKey};
use trivanity_pattern::{PatternMatcher, VanityPattern};

use crate::config::validate_pattern;
use crate::error::ConfigurationError;

/// A confirmed match. Built once and never changed afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct FoundResult {
    pub chain: ChainKind,
    pub address: Address,
    pub private_key: PrivateKey,
    pub timestamp: DateTime<Local>,
}

impl FoundResult {
    /// Private key in the chain's conventional text form
    pub fn private_key_export(&self) -> String {
        self.chain.codec().export_private_key(&self.private_key)
    }

    /// Address as a wallet shows it
    pub fn display_address(&self) -> String {
        self.chain.codec().display_address(&self.address)
    }
}

/// Generates keys for one chain and checks each against a pattern
pub struct ChainGenerator<R = StdRng> {
    chain: ChainKind,
    codec: &'static dyn AddressCodec,
    matcher: PatternMatcher,
    rng: R,
}

impl ChainGenerator<StdRng> {
    /// Generator seeded from OS entropy
    pub fn new(chain: ChainKind, pattern: VanityPattern) -> Result<Self, ConfigurationError> {
        Self::with_rng(chain, pattern, StdRng::from_entropy())
    }
}

impl<R: RngCore> ChainGenerator<R> {
    /// Generator drawing keys from `rng`; fails if `pattern` can never match
    pub fn with_rng(
        chain: ChainKind,
        pattern: VanityPattern,
        rng: R,
    ) -> Result<Self, ConfigurationError> {
        validate_pattern(chain, &pattern)?;
        let codec = chain.codec();
        let matcher = PatternMatcher::new(&pattern).with_marker(codec.marker());

        Ok(Self {
            chain,
            codec,
            matcher,
            rng,
        })
    }

    pub fn chain(&self) -> ChainKind {
        self.chain
    }

    /// One attempt: fresh key, derive, match.
    ///
    /// `Ok(None)` means no match. An error means this key could not be
    /// derived; the attempt still happened and the next one is independent.
    pub fn try_once(&mut self) -> Result<Option<FoundResult>, DerivationError> {
        let mut bytes = vec![0u8; self.codec.expected_key_length()];
        self.rng.fill_bytes(&mut bytes);
        let private_key = PrivateKey::from_bytes(bytes);

        let address = self.codec.derive(&private_key)?;
        if !self.matcher.matches(address.as_str()) {
            return Ok(None);
        }

        Ok(Some(FoundResult {
            chain: self.chain,
            address,
            private_key,
            timestamp: Local::now(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn seeded(chain: ChainKind, pattern: VanityPattern) -> ChainGenerator<StdRng> {
        ChainGenerator::with_rng(chain, pattern, StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn test_unconstrained_pattern_matches_first_try() {
        for chain in ChainKind::ALL {
            let mut generator = seeded(chain, VanityPattern::default());
            let found = generator.try_once().unwrap().expect("empty pattern matches");
            assert_eq!(found.chain, chain);
            assert_eq!(found.private_key.len(), 32);
            assert_eq!(chain.codec().derive(&found.private_key).unwrap(), found.address);
        }
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        // 33 pinned characters; effectively unreachable
        let pattern = VanityPattern::prefix("Z".repeat(33)).case_sensitive();
        let mut generator = seeded(ChainKind::Tron, pattern);
        for _ in 0..10 {
            assert!(generator.try_once().unwrap().is_none());
        }
    }

    #[test]
    fn test_zero_key_is_a_derivation_error() {
        // StepRng(0, 0) yields all-zero keys, which secp256k1 rejects
        let mut generator =
            ChainGenerator::with_rng(ChainKind::Ethereum, VanityPattern::default(), StepRng::new(0, 0))
                .unwrap();
        assert_eq!(
            generator.try_once().unwrap_err(),
            DerivationError::InvalidScalar(ChainKind::Ethereum)
        );
    }

    #[test]
    fn test_ed25519_accepts_any_seed() {
        let mut generator =
            ChainGenerator::with_rng(ChainKind::Solana, VanityPattern::default(), StepRng::new(0, 0))
                .unwrap();
        assert!(generator.try_once().unwrap().is_some());
    }

    #[test]
    fn test_construction_validates_pattern() {
        let err = ChainGenerator::new(ChainKind::Ethereum, VanityPattern::prefix("xyz"))
            .err()
            .unwrap();
        assert_eq!(
            err,
            ConfigurationError::InvalidCharacter {
                chain: ChainKind::Ethereum,
                ch: 'x'
            }
        );
    }

    #[test]
    fn test_ethereum_88_88_end_to_end() {
        let pattern = VanityPattern::new("88", "88", false);
        let mut generator = ChainGenerator::new(ChainKind::Ethereum, pattern).unwrap();

        let found = loop {
            if let Some(found) = generator.try_once().unwrap() {
                break found;
            }
        };

        let addr = found.address.as_str().to_lowercase();
        assert!(addr.starts_with("88"));
        assert!(addr.ends_with("88"));
        let rederived = ChainKind::Ethereum.codec().derive(&found.private_key).unwrap();
        assert_eq!(rederived, found.address);
        assert_eq!(found.private_key_export().len(), 64);
    }

    #[test]
    fn test_tron_prefix_skips_marker() {
        let mut generator = seeded(ChainKind::Tron, VanityPattern::prefix("a"));
        let found = loop {
            if let Some(found) = generator.try_once().unwrap() {
                break found;
            }
        };
        assert!(found.address.as_str().starts_with('T'));
        assert!(found.address.as_str()[1..].to_lowercase().starts_with('a'));
    }
}

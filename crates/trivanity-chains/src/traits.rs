//! Chain trait and types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{ethereum::Ethereum, solana::Solana, tron::Tron};

/// Why a private key could not be turned into an address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    #[error("expected a {expected}-byte private key, got {actual} bytes")]
    InvalidKeyLength { expected: usize, actual: usize },
    #[error("private key is not a valid {0} scalar")]
    InvalidScalar(ChainKind),
}

/// Error returned when a chain name does not resolve to a [`ChainKind`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown chain: {0}")]
pub struct UnknownChain(pub String);

/// The closed set of supported chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChainKind {
    /// secp256k1, lowercase hex address
    #[serde(rename = "ETH")]
    Ethereum,
    /// ed25519, base58 public key
    #[serde(rename = "SOL")]
    Solana,
    /// secp256k1, `T` + 33 base58 characters
    #[serde(rename = "TRX")]
    Tron,
}

impl ChainKind {
    /// Every chain, in the order workers are started and results listed
    pub const ALL: [ChainKind; 3] = [ChainKind::Ethereum, ChainKind::Tron, ChainKind::Solana];

    /// The codec that derives this chain's addresses
    pub fn codec(self) -> &'static dyn AddressCodec {
        match self {
            ChainKind::Ethereum => &Ethereum,
            ChainKind::Solana => &Solana,
            ChainKind::Tron => &Tron,
        }
    }

    /// Chain ticker symbol (e.g., "ETH", "TRX")
    pub fn ticker(self) -> &'static str {
        match self {
            ChainKind::Ethereum => "ETH",
            ChainKind::Solana => "SOL",
            ChainKind::Tron => "TRX",
        }
    }

    /// Full chain name
    pub fn name(self) -> &'static str {
        match self {
            ChainKind::Ethereum => "Ethereum",
            ChainKind::Solana => "Solana",
            ChainKind::Tron => "TRON",
        }
    }

    /// Dense index, for per-chain counter arrays
    pub fn index(self) -> usize {
        match self {
            ChainKind::Ethereum => 0,
            ChainKind::Solana => 1,
            ChainKind::Tron => 2,
        }
    }
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

impl FromStr for ChainKind {
    type Err = UnknownChain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ETH" | "ETHEREUM" => Ok(ChainKind::Ethereum),
            "SOL" | "SOLANA" => Ok(ChainKind::Solana),
            "TRX" | "TRON" => Ok(ChainKind::Tron),
            _ => Err(UnknownChain(s.to_string())),
        }
    }
}

/// Raw private key material.
///
/// Debug output never shows the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(Vec<u8>);

impl PrivateKey {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex, no `0x`
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Borrow as a fixed 32-byte array, or report the length mismatch
    pub fn as_array32(&self) -> Result<&[u8; 32], DerivationError> {
        self.0
            .as_slice()
            .try_into()
            .map_err(|_| DerivationError::InvalidKeyLength {
                expected: 32,
                actual: self.0.len(),
            })
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey([redacted; {}])", self.0.len())
    }
}

impl Serialize for PrivateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PrivateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s)
            .map(PrivateKey)
            .map_err(serde::de::Error::custom)
    }
}

/// A derived address in the form patterns are matched against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-chain key-to-address derivation
pub trait AddressCodec: Send + Sync {
    /// Which chain this codec serves
    fn kind(&self) -> ChainKind;

    /// Derive the address for a private key. Deterministic.
    fn derive(&self, private_key: &PrivateKey) -> Result<Address, DerivationError>;

    /// Required private key length in bytes
    fn expected_key_length(&self) -> usize;

    /// Constant leading character excluded from vanity matching, if any
    fn marker(&self) -> Option<char> {
        None
    }

    /// Longest matchable body (address length minus marker)
    fn matchable_length(&self) -> usize;

    /// Characters that can appear in the matchable body
    fn valid_address_chars(&self) -> &'static str;

    /// Characters that can open the matchable body
    fn first_body_chars(&self) -> &'static str {
        self.valid_address_chars()
    }

    /// Private key in the chain's conventional text form
    fn export_private_key(&self, private_key: &PrivateKey) -> String {
        private_key.to_hex()
    }

    /// Address as a wallet would show it
    fn display_address(&self, address: &Address) -> String {
        address.to_string()
    }
}

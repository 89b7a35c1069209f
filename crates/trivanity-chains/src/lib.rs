//! Trivanity Chain Adapters
//!
//! One [`AddressCodec`] per supported chain, selected through the closed
//! [`ChainKind`] enum rather than by name.

pub mod traits;

pub mod ethereum;
pub mod solana;
pub mod tron;

pub use traits::{Address, AddressCodec, ChainKind, DerivationError, PrivateKey, UnknownChain};

pub use ethereum::Ethereum;
pub use solana::Solana;
pub use tron::Tron;


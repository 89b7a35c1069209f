//! Solana chain adapter

use crate::traits::{Address, AddressCodec, ChainKind, DerivationError, PrivateKey};
use trivanity_crypto::{
    encoding::{base58_encode, BASE58_ALPHABET},
    hex, Ed25519Keypair,
};

/// Solana chain
#[derive(Debug, Clone, Copy)]
pub struct Solana;

impl AddressCodec for Solana {
    fn kind(&self) -> ChainKind {
        ChainKind::Solana
    }

    fn derive(&self, private_key: &PrivateKey) -> Result<Address, DerivationError> {
        let keypair = Ed25519Keypair::from_seed(private_key.as_array32()?);
        Ok(Address::new(base58_encode(&keypair.public_key_bytes())))
    }

    fn expected_key_length(&self) -> usize {
        32
    }

    fn matchable_length(&self) -> usize {
        // 32 bytes of base58 is 32..=44 characters
        44
    }

    fn valid_address_chars(&self) -> &'static str {
        BASE58_ALPHABET
    }

    /// Hex of the 64-byte keypair (seed || pubkey)
    fn export_private_key(&self, private_key: &PrivateKey) -> String {
        match private_key.as_array32() {
            Ok(seed) => hex::encode(Ed25519Keypair::from_seed(seed).keypair_bytes()),
            Err(_) => private_key.to_hex(),
        }
    }
}

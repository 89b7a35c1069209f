//! Ethereum chain adapter
//!
//! secp256k1 + Keccak-256(pubkey[1..65]) last 20 bytes, matched as lowercase
//! hex without the `0x`. The EIP-55 form is only used for display.

use crate::traits::{Address, AddressCodec, ChainKind, DerivationError, PrivateKey};
use trivanity_crypto::{encoding::eip55_checksum, hash::keccak256, hex, Secp256k1Keypair};

/// Ethereum chain
#[derive(Debug, Clone, Copy)]
pub struct Ethereum;

impl Ethereum {
    /// The 20 address bytes for a key
    pub fn address_bytes(&self, private_key: &PrivateKey) -> Result<[u8; 20], DerivationError> {
        let keypair = Secp256k1Keypair::from_bytes(private_key.as_array32()?)
            .map_err(|_| DerivationError::InvalidScalar(ChainKind::Ethereum))?;
        Ok(keccak_address(&keypair))
    }
}

/// Last 20 bytes of keccak256 over the uncompressed X||Y coordinates
pub(crate) fn keccak_address(keypair: &Secp256k1Keypair) -> [u8; 20] {
    let hash = keccak256(&keypair.public_key_xy());
    let mut address_bytes = [0u8; 20];
    address_bytes.copy_from_slice(&hash[12..32]);
    address_bytes
}

impl AddressCodec for Ethereum {
    fn kind(&self) -> ChainKind {
        ChainKind::Ethereum
    }

    fn derive(&self, private_key: &PrivateKey) -> Result<Address, DerivationError> {
        let bytes = self.address_bytes(private_key)?;
        Ok(Address::new(hex::encode(bytes)))
    }

    fn expected_key_length(&self) -> usize {
        32
    }

    fn matchable_length(&self) -> usize {
        40
    }

    fn valid_address_chars(&self) -> &'static str {
        "0123456789abcdef"
    }

    fn display_address(&self, address: &Address) -> String {
        let mut bytes = [0u8; 20];
        match hex::decode_to_slice(address.as_str(), &mut bytes) {
            Ok(()) => eip55_checksum(&bytes),
            Err(_) => address.to_string(),
        }
    }
}

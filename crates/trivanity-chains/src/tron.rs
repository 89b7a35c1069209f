//! TRON chain adapter
//!
//! TRON address: Keccak256(pubkey) last 20 bytes + 0x41 prefix + Base58Check.
//! Every such address is 34 characters and starts with `T`; the `T` is the
//! chain marker and is skipped when matching. The version byte also pins the
//! character after `T` to `9A-HJ-NP-Z`.
//!
//! Earlier tooling filled TRON addresses with random base58 characters that
//! had no relation to the private key. This adapter derives the real address,
//! so a found key actually controls the found address.

use crate::ethereum::keccak_address;
use crate::traits::{Address, AddressCodec, ChainKind, DerivationError, PrivateKey};
use trivanity_crypto::{
    encoding::{base58check_encode, BASE58_ALPHABET},
    Secp256k1Keypair,
};

/// Mainnet version byte; forces the leading `T`
const TRON_VERSION: u8 = 0x41;

/// Base58 digits that can follow the `T` of a 21-byte `0x41` payload
pub const TRON_FIRST_BODY_CHARS: &str = "9ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Full address length including the marker
pub const TRON_ADDRESS_LEN: usize = 34;

/// TRON chain
#[derive(Debug, Clone, Copy)]
pub struct Tron;

impl AddressCodec for Tron {
    fn kind(&self) -> ChainKind {
        ChainKind::Tron
    }

    fn derive(&self, private_key: &PrivateKey) -> Result<Address, DerivationError> {
        let keypair = Secp256k1Keypair::from_bytes(private_key.as_array32()?)
            .map_err(|_| DerivationError::InvalidScalar(ChainKind::Tron))?;
        let address = base58check_encode(TRON_VERSION, &keccak_address(&keypair));
        debug_assert_eq!(address.len(), TRON_ADDRESS_LEN);
        Ok(Address::new(address))
    }

    fn expected_key_length(&self) -> usize {
        32
    }

    fn marker(&self) -> Option<char> {
        Some('T')
    }

    fn matchable_length(&self) -> usize {
        TRON_ADDRESS_LEN - 1
    }

    fn valid_address_chars(&self) -> &'static str {
        BASE58_ALPHABET
    }

    fn first_body_chars(&self) -> &'static str {
        TRON_FIRST_BODY_CHARS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ethereum::Ethereum;
    use trivanity_crypto::hex;

    #[test]
    fn test_known_vector() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let addr = Tron.derive(&PrivateKey::from_bytes(bytes.to_vec())).unwrap();
        assert_eq!(addr.as_str(), "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC");
    }

    #[test]
    fn test_shape() {
        for seed in 1u8..20 {
            let addr = Tron.derive(&PrivateKey::from_bytes(vec![seed; 32])).unwrap();
            assert_eq!(addr.len(), TRON_ADDRESS_LEN);
            assert!(addr.as_str().starts_with('T'));
            assert!(addr.as_str()[1..]
                .chars()
                .all(|c| BASE58_ALPHABET.contains(c)));
        }
    }

    #[test]
    fn test_second_character_is_restricted() {
        for seed in 1u8..=200 {
            let mut bytes = [0u8; 32];
            bytes[0] = seed;
            bytes[31] = seed.wrapping_mul(7) | 1;
            let addr = Tron.derive(&PrivateKey::from_bytes(bytes.to_vec())).unwrap();
            let second = addr.as_str().chars().nth(1).unwrap();
            assert!(
                TRON_FIRST_BODY_CHARS.contains(second),
                "{} opens with {second}",
                addr.as_str()
            );
        }
    }

    #[test]
    fn test_shares_payload_with_ethereum() {
        let key = PrivateKey::from_bytes(vec![0x33; 32]);
        let eth = Ethereum.address_bytes(&key).unwrap();
        let decoded = trivanity_crypto::bs58::decode(Tron.derive(&key).unwrap().as_str())
            .into_vec()
            .unwrap();
        assert_eq!(decoded[0], TRON_VERSION);
        assert_eq!(hex::encode(&decoded[1..21]), hex::encode(eth));
    }
}

//! Ed25519 key derivation for Solana

use ed25519_dalek::SigningKey;

/// An Ed25519 keypair built from a 32-byte seed.
///
/// Every 32-byte string is a valid seed, so construction cannot fail.
#[derive(Clone)]
pub struct Ed25519Keypair {
    signing_key: SigningKey,
}

impl Ed25519Keypair {
    /// Create from raw 32-byte seed (private key)
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Get the private key seed as bytes (32 bytes)
    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Full keypair bytes (seed || pubkey), the Solana keypair-file layout
    pub fn keypair_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }

    /// Get the public key as bytes (32 bytes)
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc8032_vector() {
        let mut seed = [0u8; 32];
        hex::decode_to_slice(
            "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
            &mut seed,
        )
        .unwrap();

        let kp = Ed25519Keypair::from_seed(&seed);
        assert_eq!(
            hex::encode(kp.public_key_bytes()),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
    }

    #[test]
    fn test_keypair_layout() {
        let kp = Ed25519Keypair::from_seed(&[1u8; 32]);
        let bytes = kp.keypair_bytes();
        assert_eq!(&bytes[..32], &kp.private_key_bytes());
        assert_eq!(&bytes[32..], &kp.public_key_bytes());
    }
}

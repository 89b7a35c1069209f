//! secp256k1 point multiplication for the Ethereum and TRON codecs

use k256::{elliptic_curve::sec1::ToEncodedPoint, PublicKey, SecretKey};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Secp256k1Error {
    /// Zero, or not below the group order
    #[error("scalar is outside the secp256k1 group order")]
    ScalarOutOfRange,
}

/// A secp256k1 keypair derived from a caller-supplied scalar
#[derive(Clone)]
pub struct Secp256k1Keypair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Secp256k1Keypair {
    /// Derive the keypair for a raw 32-byte big-endian scalar
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, Secp256k1Error> {
        let secret_key =
            SecretKey::from_bytes(bytes.into()).map_err(|_| Secp256k1Error::ScalarOutOfRange)?;
        let public_key = secret_key.public_key();
        Ok(Self { secret_key, public_key })
    }

    /// Get the private key as bytes
    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.secret_key.to_bytes().into()
    }

    /// Get the uncompressed public key (65 bytes: 0x04 || x || y)
    pub fn public_key_uncompressed(&self) -> [u8; 65] {
        let point = self.public_key.to_encoded_point(false);
        let mut result = [0u8; 65];
        result.copy_from_slice(point.as_bytes());
        result
    }

    /// X and Y coordinates without the SEC1 tag, the Keccak input for
    /// Ethereum-style addresses
    pub fn public_key_xy(&self) -> [u8; 64] {
        let uncompressed = self.public_key_uncompressed();
        let mut result = [0u8; 64];
        result.copy_from_slice(&uncompressed[1..65]);
        result
    }
}

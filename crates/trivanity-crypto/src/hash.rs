//! Hash functions for address derivation

use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Double SHA-256, the Base58Check checksum hash
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Keccak-256 (used in Ethereum and TRON, NOT SHA3-256)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

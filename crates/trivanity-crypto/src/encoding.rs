//! Address encodings: Base58, Base58Check, EIP-55 hex

/// The Bitcoin Base58 alphabet, shared by Solana and TRON
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Base58Check encode (version byte, payload, 4-byte double-SHA256 checksum)
pub fn base58check_encode(version: u8, payload: &[u8]) -> String {
    use crate::hash::double_sha256;

    let mut data = Vec::with_capacity(1 + payload.len() + 4);
    data.push(version);
    data.extend_from_slice(payload);

    let checksum = double_sha256(&data);
    data.extend_from_slice(&checksum[..4]);

    bs58::encode(data).into_string()
}

/// Base58 encode (Solana style, no checksum)
pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// EIP-55 mixed-case checksum of a 20-byte address, with `0x`
pub fn eip55_checksum(address: &[u8; 20]) -> String {
    use crate::hash::keccak256;

    let hex_addr = hex::encode(address);
    let hash = keccak256(hex_addr.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");

    for (i, c) in hex_addr.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0F
        };

        if nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }

    result
}

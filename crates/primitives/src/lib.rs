//! Hash types and byte-level serialization shared by the sigmad crates.

use ripemd::{Digest as RipemdDigest, Ripemd160};
use sha2::Sha256;

pub mod encoding;

/// 32-byte hash (txids, pubcoin hashes, serial hashes).
pub type Hash256 = [u8; 32];

/// 20-byte hash (key ids, master seed ids).
pub type Hash160 = [u8; 20];

pub fn sha256(data: &[u8]) -> Hash256 {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

pub fn sha256d(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}

pub fn hash160(data: &[u8]) -> Hash160 {
    let sha = sha256(data);
    let digest = Ripemd160::digest(sha);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    out
}

pub fn hash256_to_hex(hash: &Hash256) -> String {
    let mut out = String::with_capacity(64);
    for byte in hash {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_empty_vector() {
        let digest = sha256(b"");
        assert_eq!(
            hash256_to_hex(&digest),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hash160_of_empty() {
        let digest = hash160(b"");
        assert_eq!(digest[0], 0xb4);
        assert_eq!(digest.len(), 20);
    }
}

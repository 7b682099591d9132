//! Key-material records: plaintext keys, encrypted keys, the master
//! encryption key, the keypool, and script records.

use sigmad_primitives::encoding::{Decoder, Encoder};
use sigmad_primitives::{sha256d, Hash256};
use zeroize::Zeroize;

use crate::codec::{read_version, write_version};
use crate::error::WalletDbError;

/// Private key bytes, wiped on drop.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A plaintext key record. The value carries a checksum over pubkey and
/// secret so bit rot is caught at load time rather than at signing time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyRecord {
    pub pubkey: Vec<u8>,
    pub secret: SecretBytes,
}

impl KeyRecord {
    pub fn checksum(pubkey: &[u8], secret: &[u8]) -> Hash256 {
        let mut preimage = Vec::with_capacity(pubkey.len() + secret.len());
        preimage.extend_from_slice(pubkey);
        preimage.extend_from_slice(secret);
        sha256d(&preimage)
    }

    pub fn encode_value(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.write_var_bytes(self.secret.as_slice());
        encoder.write_hash256(&Self::checksum(&self.pubkey, self.secret.as_slice()));
        encoder.into_inner()
    }

    /// `pubkey` comes from the record key; the checksum binds the two halves.
    pub fn decode_value(pubkey: Vec<u8>, bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        let secret = decoder.read_var_bytes()?;
        let checksum = decoder.read_hash256()?;
        decoder.finish()?;
        if checksum != Self::checksum(&pubkey, &secret) {
            return Err(WalletDbError::Corrupt("key record checksum mismatch"));
        }
        Ok(Self {
            pubkey,
            secret: SecretBytes::new(secret),
        })
    }
}

/// An encrypted key record. The ciphertext is opaque to the store; the
/// key-encryption component owns its format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CryptedKeyRecord {
    pub pubkey: Vec<u8>,
    pub crypted_secret: Vec<u8>,
}

impl CryptedKeyRecord {
    pub fn encode_value(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.write_var_bytes(&self.crypted_secret);
        encoder.into_inner()
    }

    pub fn decode_value(pubkey: Vec<u8>, bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        let crypted_secret = decoder.read_var_bytes()?;
        decoder.finish()?;
        Ok(Self {
            pubkey,
            crypted_secret,
        })
    }
}

/// The wallet's master encryption key, stored by numeric id. Opaque
/// ciphertext plus the derivation parameters needed to unlock it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MasterKeyRecord {
    pub crypted_key: Vec<u8>,
    pub salt: Vec<u8>,
    pub derivation_method: u32,
    pub derive_iterations: u32,
}

impl MasterKeyRecord {
    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.write_var_bytes(&self.crypted_key);
        encoder.write_var_bytes(&self.salt);
        encoder.write_u32_le(self.derivation_method);
        encoder.write_u32_le(self.derive_iterations);
        encoder.into_inner()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        let crypted_key = decoder.read_var_bytes()?;
        let salt = decoder.read_var_bytes()?;
        let derivation_method = decoder.read_u32_le()?;
        let derive_iterations = decoder.read_u32_le()?;
        decoder.finish()?;
        Ok(Self {
            crypted_key,
            salt,
            derivation_method,
            derive_iterations,
        })
    }
}

/// A pre-generated keypool entry, keyed by pool index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyPoolRecord {
    pub time: i64,
    pub pubkey: Vec<u8>,
}

impl KeyPoolRecord {
    pub const VERSION_BASIC: i32 = 1;
    pub const CURRENT_VERSION: i32 = 1;

    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, Self::CURRENT_VERSION);
        encoder.write_i64_le(self.time);
        encoder.write_var_bytes(&self.pubkey);
        encoder.into_inner()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        read_version(
            &mut decoder,
            "pool",
            Self::VERSION_BASIC,
            Self::CURRENT_VERSION,
        )?;
        let time = decoder.read_i64_le()?;
        let pubkey = decoder.read_var_bytes()?;
        decoder.finish()?;
        Ok(Self { time, pubkey })
    }
}

/// Validate a serialized secp256k1 public key before it is written.
pub fn validate_pubkey(pubkey: &[u8]) -> Result<(), WalletDbError> {
    secp256k1::PublicKey::from_slice(pubkey)
        .map(|_| ())
        .map_err(|_| WalletDbError::Corrupt("invalid public key"))
}

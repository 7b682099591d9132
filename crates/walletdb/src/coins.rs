//! Shielded-coin record types, generic over the cryptographic
//! representation.
//!
//! The legacy zerocoin scheme works in arbitrary-precision integers modulo an
//! RSA-style modulus; the upgraded sigma scheme works in a prime-order group
//! with 34-byte element and 32-byte scalar encodings. The store never does
//! group or bignum math (the proof system owns that); it only needs each
//! representation's byte codec, supplied here as a capability so every record
//! and operation exists once instead of per-scheme.

use std::fmt;

use sigmad_primitives::encoding::{DecodeError, Decoder, Encoder};
use sigmad_primitives::{sha256, Hash256};

use crate::codec::{read_version, write_version};
use crate::error::WalletDbError;

/// Arbitrary-precision unsigned integer, stored as canonical big-endian
/// magnitude bytes (no leading zeros, empty = 0).
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BigNum(Vec<u8>);

impl BigNum {
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        Self(bytes[start..].to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("00");
        }
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Serialized sigma group element.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GroupElementBytes(pub [u8; 34]);

/// Serialized sigma scalar.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ScalarBytes(pub [u8; 32]);

/// Byte codec and key prefixes for one coin representation.
pub trait CoinScheme {
    type Pubcoin: Clone + Eq + fmt::Debug;
    type Serial: Clone + Eq + fmt::Debug;

    const MINT_PREFIX: &'static str;
    const MINT_ARCHIVE_PREFIX: &'static str;
    const SPEND_PREFIX: &'static str;

    fn encode_pubcoin(pubcoin: &Self::Pubcoin, encoder: &mut Encoder);
    fn decode_pubcoin(decoder: &mut Decoder) -> Result<Self::Pubcoin, DecodeError>;
    fn encode_serial(serial: &Self::Serial, encoder: &mut Encoder);
    fn decode_serial(decoder: &mut Decoder) -> Result<Self::Serial, DecodeError>;

    /// Hash identity of a public coin, used by the archive keyspace and the
    /// deterministic mint pool.
    fn pubcoin_hash(pubcoin: &Self::Pubcoin) -> Hash256 {
        let mut encoder = Encoder::new();
        Self::encode_pubcoin(pubcoin, &mut encoder);
        sha256(&encoder.into_inner())
    }
}

/// Legacy zerocoin representation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Legacy;

impl CoinScheme for Legacy {
    type Pubcoin = BigNum;
    type Serial = BigNum;

    const MINT_PREFIX: &'static str = "zerocoin";
    const MINT_ARCHIVE_PREFIX: &'static str = "zerocoin_archive";
    const SPEND_PREFIX: &'static str = "zcspend";

    fn encode_pubcoin(pubcoin: &BigNum, encoder: &mut Encoder) {
        encoder.write_var_bytes(pubcoin.as_bytes());
    }

    fn decode_pubcoin(decoder: &mut Decoder) -> Result<BigNum, DecodeError> {
        Ok(BigNum::from_bytes_be(&decoder.read_var_bytes()?))
    }

    fn encode_serial(serial: &BigNum, encoder: &mut Encoder) {
        encoder.write_var_bytes(serial.as_bytes());
    }

    fn decode_serial(decoder: &mut Decoder) -> Result<BigNum, DecodeError> {
        Ok(BigNum::from_bytes_be(&decoder.read_var_bytes()?))
    }
}

/// Upgraded sigma representation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Sigma;

impl CoinScheme for Sigma {
    type Pubcoin = GroupElementBytes;
    type Serial = ScalarBytes;

    const MINT_PREFIX: &'static str = "sigma";
    const MINT_ARCHIVE_PREFIX: &'static str = "sigma_archive";
    const SPEND_PREFIX: &'static str = "sigma_spend";

    fn encode_pubcoin(pubcoin: &GroupElementBytes, encoder: &mut Encoder) {
        encoder.write_bytes(&pubcoin.0);
    }

    fn decode_pubcoin(decoder: &mut Decoder) -> Result<GroupElementBytes, DecodeError> {
        Ok(GroupElementBytes(decoder.read_fixed::<34>()?))
    }

    fn encode_serial(serial: &ScalarBytes, encoder: &mut Encoder) {
        encoder.write_bytes(&serial.0);
    }

    fn decode_serial(decoder: &mut Decoder) -> Result<ScalarBytes, DecodeError> {
        Ok(ScalarBytes(decoder.read_fixed::<32>()?))
    }
}

/// A minted shielded coin. Identity key for lookup is the public coin value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintEntry<C: CoinScheme> {
    pub value: C::Pubcoin,
    pub randomness: C::Serial,
    pub serial: C::Serial,
    pub denomination: i64,
    /// Coin id within its accumulator epoch; -1 until the mint confirms.
    pub id: i32,
    pub height: i32,
    pub is_used: bool,
}

impl<C: CoinScheme> MintEntry<C> {
    pub const VERSION_BASIC: i32 = 1;
    pub const CURRENT_VERSION: i32 = 1;

    pub fn pubcoin_hash(&self) -> Hash256 {
        C::pubcoin_hash(&self.value)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, Self::CURRENT_VERSION);
        C::encode_pubcoin(&self.value, &mut encoder);
        C::encode_serial(&self.randomness, &mut encoder);
        C::encode_serial(&self.serial, &mut encoder);
        encoder.write_i64_le(self.denomination);
        encoder.write_i32_le(self.id);
        encoder.write_i32_le(self.height);
        encoder.write_bool(self.is_used);
        encoder.into_inner()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        read_version(
            &mut decoder,
            "mint",
            Self::VERSION_BASIC,
            Self::CURRENT_VERSION,
        )?;
        let value = C::decode_pubcoin(&mut decoder)?;
        let randomness = C::decode_serial(&mut decoder)?;
        let serial = C::decode_serial(&mut decoder)?;
        let denomination = decoder.read_i64_le()?;
        let id = decoder.read_i32_le()?;
        let height = decoder.read_i32_le()?;
        let is_used = decoder.read_bool()?;
        decoder.finish()?;
        Ok(Self {
            value,
            randomness,
            serial,
            denomination,
            id,
            height,
            is_used,
        })
    }
}

/// A revealed spend serial: the double-spend guard. At most one record per
/// serial value may ever exist.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpendSerialEntry<C: CoinScheme> {
    pub serial: C::Serial,
    pub hash_tx: Hash256,
    pub pubcoin: C::Pubcoin,
    pub id: i32,
    pub denomination: i64,
}

impl<C: CoinScheme> SpendSerialEntry<C> {
    pub const VERSION_BASIC: i32 = 1;
    pub const CURRENT_VERSION: i32 = 1;

    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, Self::CURRENT_VERSION);
        C::encode_serial(&self.serial, &mut encoder);
        encoder.write_hash256(&self.hash_tx);
        C::encode_pubcoin(&self.pubcoin, &mut encoder);
        encoder.write_i32_le(self.id);
        encoder.write_i64_le(self.denomination);
        encoder.into_inner()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        read_version(
            &mut decoder,
            "spend",
            Self::VERSION_BASIC,
            Self::CURRENT_VERSION,
        )?;
        let serial = C::decode_serial(&mut decoder)?;
        let hash_tx = decoder.read_hash256()?;
        let pubcoin = C::decode_pubcoin(&mut decoder)?;
        let id = decoder.read_i32_le()?;
        let denomination = decoder.read_i64_le()?;
        decoder.finish()?;
        Ok(Self {
            serial,
            hash_tx,
            pubcoin,
            id,
            denomination,
        })
    }
}

/// Accumulator value observed for a `(denomination, coin-group-id)` pair,
/// overwritten as the accumulator advances.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccumulatorSnapshot {
    pub denomination: i64,
    pub id: i32,
    pub value: BigNum,
}

impl AccumulatorSnapshot {
    pub fn encode_value(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.write_var_bytes(self.value.as_bytes());
        encoder.into_inner()
    }

    pub fn decode_value(
        denomination: i64,
        id: i32,
        bytes: &[u8],
    ) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        let value = BigNum::from_bytes_be(&decoder.read_var_bytes()?);
        decoder.finish()?;
        Ok(Self {
            denomination,
            id,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bignum_canonical_form_strips_leading_zeros() {
        let a = BigNum::from_bytes_be(&[0, 0, 1, 2]);
        let b = BigNum::from_bytes_be(&[1, 2]);
        assert_eq!(a, b);
        assert_eq!(a.as_bytes(), &[1, 2]);
        assert_eq!(BigNum::from_bytes_be(&[0, 0]).as_bytes(), &[] as &[u8]);
    }

    #[test]
    fn legacy_mint_round_trip() {
        let entry = MintEntry::<Legacy> {
            value: BigNum::from_bytes_be(&[0x42; 48]),
            randomness: BigNum::from_bytes_be(&[9, 9, 9]),
            serial: BigNum::from_bytes_be(&[1, 2, 3, 4]),
            denomination: 25,
            id: 3,
            height: 1000,
            is_used: false,
        };
        assert_eq!(MintEntry::<Legacy>::decode(&entry.encode()).unwrap(), entry);
    }

    #[test]
    fn sigma_mint_round_trip() {
        let entry = MintEntry::<Sigma> {
            value: GroupElementBytes([0x07; 34]),
            randomness: ScalarBytes([0x0a; 32]),
            serial: ScalarBytes([0x0b; 32]),
            denomination: 100_000_000,
            id: -1,
            height: -1,
            is_used: true,
        };
        assert_eq!(MintEntry::<Sigma>::decode(&entry.encode()).unwrap(), entry);
    }

    #[test]
    fn spend_serial_round_trip() {
        let entry = SpendSerialEntry::<Sigma> {
            serial: ScalarBytes([0x33; 32]),
            hash_tx: [0x44; 32],
            pubcoin: GroupElementBytes([0x55; 34]),
            id: 7,
            denomination: 50_000_000,
        };
        assert_eq!(
            SpendSerialEntry::<Sigma>::decode(&entry.encode()).unwrap(),
            entry
        );
    }

    #[test]
    fn pubcoin_hash_is_stable_per_scheme() {
        let pubcoin = GroupElementBytes([0x07; 34]);
        assert_eq!(Sigma::pubcoin_hash(&pubcoin), Sigma::pubcoin_hash(&pubcoin));
        let other = GroupElementBytes([0x08; 34]);
        assert_ne!(Sigma::pubcoin_hash(&pubcoin), Sigma::pubcoin_hash(&other));
    }
}

//! HD root bookkeeping and per-key metadata records.

use sigmad_primitives::encoding::{Decoder, Encoder};
use sigmad_primitives::Hash160;

use crate::codec::{read_version, write_version};
use crate::error::WalletDbError;
use crate::keypath::HdKeypath;

/// The wallet's single HD chain record: master key id plus child-index
/// counters. The legacy scheme keeps one external-chain counter; the BIP44
/// scheme keeps one counter per change purpose (receive, change, mint).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HdChain {
    pub master_key_id: Hash160,
    pub external_chain_counter: u32,
    /// Indexed by change purpose; only meaningful at `VERSION_WITH_BIP44`.
    pub external_chain_counters: Vec<u32>,
}

impl HdChain {
    pub const VERSION_BASIC: i32 = 1;
    pub const VERSION_WITH_BIP44: i32 = 10;
    pub const CURRENT_VERSION: i32 = Self::VERSION_WITH_BIP44;
    /// Standard receive = 0, standard change = 1, shielded-mint change = 2.
    pub const N_CHANGES: usize = 3;

    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, Self::CURRENT_VERSION);
        encoder.write_u32_le(self.external_chain_counter);
        encoder.write_hash160(&self.master_key_id);
        encoder.write_varint(self.external_chain_counters.len() as u64);
        for counter in &self.external_chain_counters {
            encoder.write_u32_le(*counter);
        }
        encoder.into_inner()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        let version = read_version(
            &mut decoder,
            "hdchain",
            Self::VERSION_BASIC,
            Self::CURRENT_VERSION,
        )?;
        let external_chain_counter = decoder.read_u32_le()?;
        let master_key_id = decoder.read_hash160()?;
        let external_chain_counters = if version >= Self::VERSION_WITH_BIP44 {
            let count = decoder.read_varint()? as usize;
            let mut counters = Vec::with_capacity(count.min(Self::N_CHANGES * 4));
            for _ in 0..count {
                counters.push(decoder.read_u32_le()?);
            }
            counters
        } else {
            vec![0; Self::N_CHANGES]
        };
        decoder.finish()?;
        Ok(Self {
            master_key_id,
            external_chain_counter,
            external_chain_counters,
        })
    }
}

impl Default for HdChain {
    fn default() -> Self {
        Self {
            master_key_id: [0u8; 20],
            external_chain_counter: 0,
            external_chain_counters: vec![0; Self::N_CHANGES],
        }
    }
}

/// Per-key metadata: creation time and, from `VERSION_WITH_HDDATA` on, the
/// derivation path string and master key id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyMetadata {
    pub create_time: i64,
    pub keypath: String,
    pub master_key_id: Hash160,
}

impl KeyMetadata {
    pub const VERSION_BASIC: i32 = 1;
    pub const VERSION_WITH_HDDATA: i32 = 10;
    pub const CURRENT_VERSION: i32 = Self::VERSION_WITH_HDDATA;

    pub fn new(create_time: i64) -> Self {
        Self {
            create_time,
            keypath: String::new(),
            master_key_id: [0u8; 20],
        }
    }

    /// Parsed form of the keypath string; `None` for non-HD keys and
    /// unparseable paths.
    pub fn parsed_keypath(&self) -> Option<HdKeypath> {
        if self.keypath.is_empty() {
            return None;
        }
        HdKeypath::parse(&self.keypath).ok()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, Self::CURRENT_VERSION);
        encoder.write_i64_le(self.create_time);
        encoder.write_var_str(&self.keypath);
        encoder.write_hash160(&self.master_key_id);
        encoder.into_inner()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        let version = read_version(
            &mut decoder,
            "keymeta",
            Self::VERSION_BASIC,
            Self::CURRENT_VERSION,
        )?;
        let create_time = decoder.read_i64_le()?;
        let (keypath, master_key_id) = if version >= Self::VERSION_WITH_HDDATA {
            (decoder.read_var_str()?, decoder.read_hash160()?)
        } else {
            (String::new(), [0u8; 20])
        };
        decoder.finish()?;
        Ok(Self {
            create_time,
            keypath,
            master_key_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::write_version;

    #[test]
    fn hdchain_round_trip() {
        let chain = HdChain {
            master_key_id: [7u8; 20],
            external_chain_counter: 42,
            external_chain_counters: vec![3, 1, 9],
        };
        let decoded = HdChain::decode(&chain.encode()).unwrap();
        assert_eq!(decoded, chain);
    }

    #[test]
    fn hdchain_basic_version_defaults_counters() {
        // A v1 record has no counter vector; readers must not assume it.
        let mut encoder = Encoder::new();
        write_version(&mut encoder, HdChain::VERSION_BASIC);
        encoder.write_u32_le(5);
        encoder.write_hash160(&[1u8; 20]);
        let decoded = HdChain::decode(&encoder.into_inner()).unwrap();
        assert_eq!(decoded.external_chain_counter, 5);
        assert_eq!(decoded.external_chain_counters, vec![0; HdChain::N_CHANGES]);
    }

    #[test]
    fn hdchain_future_version_is_too_new() {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, HdChain::CURRENT_VERSION + 1);
        encoder.write_u32_le(0);
        encoder.write_hash160(&[0u8; 20]);
        assert!(matches!(
            HdChain::decode(&encoder.into_inner()),
            Err(WalletDbError::TooNew { .. })
        ));
    }

    #[test]
    fn keymeta_round_trip_and_parse() {
        let meta = KeyMetadata {
            create_time: 1_500_000_000,
            keypath: "m/44'/136'/0'/0/5".to_string(),
            master_key_id: [9u8; 20],
        };
        let decoded = KeyMetadata::decode(&meta.encode()).unwrap();
        assert_eq!(decoded, meta);
        let parsed = decoded.parsed_keypath().unwrap();
        assert_eq!(parsed.to_string(), meta.keypath);
    }

    #[test]
    fn keymeta_basic_version_has_no_hd_data() {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, KeyMetadata::VERSION_BASIC);
        encoder.write_i64_le(12345);
        let decoded = KeyMetadata::decode(&encoder.into_inner()).unwrap();
        assert_eq!(decoded.create_time, 12345);
        assert!(decoded.keypath.is_empty());
        assert!(decoded.parsed_keypath().is_none());
    }
}

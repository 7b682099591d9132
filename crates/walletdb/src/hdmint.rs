//! Deterministic-mint bookkeeping: HD mints and the lookahead mint pool.

use std::collections::BTreeMap;

use sigmad_primitives::encoding::{Decoder, Encoder};
use sigmad_primitives::{Hash160, Hash256};

use crate::codec::{read_version, write_version};
use crate::error::WalletDbError;

/// Binds a minted public coin to the seed and derivation index that produced
/// it: the bridge between the HD chain and the shielded ledger.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HdMint {
    /// Derivation index under the seed; dense per seed starting at 0.
    pub count: i32,
    pub seed_id: Hash160,
    pub hash_serial: Hash256,
    pub hash_pubcoin: Hash256,
    pub txid: Hash256,
    pub height: i32,
    pub denomination: i64,
    pub is_used: bool,
}

impl HdMint {
    pub const VERSION_BASIC: i32 = 1;
    pub const CURRENT_VERSION: i32 = 1;

    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, Self::CURRENT_VERSION);
        encoder.write_i32_le(self.count);
        encoder.write_hash160(&self.seed_id);
        encoder.write_hash256(&self.hash_serial);
        encoder.write_hash256(&self.hash_pubcoin);
        encoder.write_hash256(&self.txid);
        encoder.write_i32_le(self.height);
        encoder.write_i64_le(self.denomination);
        encoder.write_bool(self.is_used);
        encoder.into_inner()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        read_version(
            &mut decoder,
            "hdmint",
            Self::VERSION_BASIC,
            Self::CURRENT_VERSION,
        )?;
        let count = decoder.read_i32_le()?;
        let seed_id = decoder.read_hash160()?;
        let hash_serial = decoder.read_hash256()?;
        let hash_pubcoin = decoder.read_hash256()?;
        let txid = decoder.read_hash256()?;
        let height = decoder.read_i32_le()?;
        let denomination = decoder.read_i64_le()?;
        let is_used = decoder.read_bool()?;
        decoder.finish()?;
        Ok(Self {
            count,
            seed_id,
            hash_serial,
            hash_pubcoin,
            txid,
            height,
            denomination,
            is_used,
        })
    }
}

/// A precomputed future mint identity, keyed by the pubcoin hash it will
/// produce once actually minted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MintPoolEntry {
    pub hash_seed_master: Hash160,
    pub seed_id: Hash160,
    pub count: i32,
}

impl MintPoolEntry {
    pub const VERSION_BASIC: i32 = 1;
    pub const CURRENT_VERSION: i32 = 1;

    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, Self::CURRENT_VERSION);
        encoder.write_hash160(&self.hash_seed_master);
        encoder.write_hash160(&self.seed_id);
        encoder.write_i32_le(self.count);
        encoder.into_inner()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        read_version(
            &mut decoder,
            "mintpool",
            Self::VERSION_BASIC,
            Self::CURRENT_VERSION,
        )?;
        let hash_seed_master = decoder.read_hash160()?;
        let seed_id = decoder.read_hash160()?;
        let count = decoder.read_i32_le()?;
        decoder.finish()?;
        Ok(Self {
            hash_seed_master,
            seed_id,
            count,
        })
    }
}

/// In-memory view of the mint pool, hydrated at load time. Incoming-block
/// scanning recognizes wallet-owned mints by pubcoin hash lookup alone,
/// before the owning `HdMint` record exists.
#[derive(Clone, Debug, Default)]
pub struct MintPool {
    entries: BTreeMap<Hash256, MintPoolEntry>,
}

impl MintPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, hash_pubcoin: Hash256, entry: MintPoolEntry) {
        self.entries.insert(hash_pubcoin, entry);
    }

    pub fn remove(&mut self, hash_pubcoin: &Hash256) -> Option<MintPoolEntry> {
        self.entries.remove(hash_pubcoin)
    }

    pub fn get(&self, hash_pubcoin: &Hash256) -> Option<&MintPoolEntry> {
        self.entries.get(hash_pubcoin)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Hash256, &MintPoolEntry)> {
        self.entries.iter()
    }

    /// Highest precomputed index for a master seed, or `None` if the pool
    /// holds nothing for it.
    pub fn highest_count(&self, hash_seed_master: &Hash160) -> Option<i32> {
        self.entries
            .values()
            .filter(|entry| entry.hash_seed_master == *hash_seed_master)
            .map(|entry| entry.count)
            .max()
    }

    /// Next derivation index to precompute for a seed.
    pub fn next_count(&self, hash_seed_master: &Hash160) -> i32 {
        self.highest_count(hash_seed_master).map_or(0, |c| c + 1)
    }

    /// How many more entries the generator must derive so the pool covers
    /// `window` indices beyond the highest index observed in use. Sized off
    /// the highest index, not the entry count: gaps from skipped or failed
    /// mints must not stall the lookahead.
    pub fn lookahead_deficit(
        &self,
        hash_seed_master: &Hash160,
        highest_used: i32,
        window: i32,
    ) -> i32 {
        let target = highest_used.saturating_add(window);
        let have = self.highest_count(hash_seed_master).unwrap_or(-1);
        (target - have).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(seed: u8, count: i32) -> MintPoolEntry {
        MintPoolEntry {
            hash_seed_master: [seed; 20],
            seed_id: [seed.wrapping_add(1); 20],
            count,
        }
    }

    #[test]
    fn hdmint_round_trip() {
        let mint = HdMint {
            count: 4,
            seed_id: [1u8; 20],
            hash_serial: [2u8; 32],
            hash_pubcoin: [3u8; 32],
            txid: [4u8; 32],
            height: 5000,
            denomination: 10,
            is_used: false,
        };
        assert_eq!(HdMint::decode(&mint.encode()).unwrap(), mint);
    }

    #[test]
    fn mint_pool_entry_round_trip() {
        let pool_entry = entry(7, 12);
        assert_eq!(
            MintPoolEntry::decode(&pool_entry.encode()).unwrap(),
            pool_entry
        );
    }

    #[test]
    fn lookahead_tracks_highest_index_across_gaps() {
        let mut pool = MintPool::new();
        let seed = [7u8; 20];
        // Indices 0, 1, 5 present: 2-4 were skipped mints.
        pool.add([0u8; 32], entry(7, 0));
        pool.add([1u8; 32], entry(7, 1));
        pool.add([5u8; 32], entry(7, 5));

        assert_eq!(pool.highest_count(&seed), Some(5));
        assert_eq!(pool.next_count(&seed), 6);
        // Highest used index 4, window 20: need coverage up to 24, have 5.
        assert_eq!(pool.lookahead_deficit(&seed, 4, 20), 19);
        // Fully covered seeds need nothing.
        assert_eq!(pool.lookahead_deficit(&seed, 0, 5), 0);
    }

    #[test]
    fn lookahead_for_unknown_seed_fills_whole_window() {
        let pool = MintPool::new();
        assert_eq!(pool.next_count(&[9u8; 20]), 0);
        assert_eq!(pool.lookahead_deficit(&[9u8; 20], -1, 20), 20);
    }
}

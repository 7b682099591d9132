//! Wallet transactions, the ordered accounting ledger, and address-book
//! records.

use sigmad_primitives::encoding::{Decoder, Encoder};
use sigmad_primitives::{sha256d, Hash256};

use crate::codec::{read_version, write_version};
use crate::error::WalletDbError;

/// Order position sentinel for records that have not been ordered yet.
pub const ORDER_POS_UNSET: i64 = -1;

/// A wallet-owned transaction. The raw consensus bytes stay opaque to the
/// store; the wallet layer owns their interpretation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WalletTx {
    pub raw: Vec<u8>,
    pub time_received: i64,
    pub from_account: String,
    pub order_pos: i64,
}

impl WalletTx {
    pub const VERSION_BASIC: i32 = 1;
    pub const CURRENT_VERSION: i32 = 1;

    pub fn txid(&self) -> Hash256 {
        sha256d(&self.raw)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, Self::CURRENT_VERSION);
        encoder.write_var_bytes(&self.raw);
        encoder.write_i64_le(self.time_received);
        encoder.write_var_str(&self.from_account);
        encoder.write_i64_le(self.order_pos);
        encoder.into_inner()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        read_version(
            &mut decoder,
            "tx",
            Self::VERSION_BASIC,
            Self::CURRENT_VERSION,
        )?;
        let raw = decoder.read_var_bytes()?;
        let time_received = decoder.read_i64_le()?;
        let from_account = decoder.read_var_str()?;
        let order_pos = decoder.read_i64_le()?;
        decoder.finish()?;
        Ok(Self {
            raw,
            time_received,
            from_account,
            order_pos,
        })
    }
}

/// A named account's current key.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Account {
    pub pubkey: Vec<u8>,
}

impl Account {
    pub const VERSION_BASIC: i32 = 1;
    pub const CURRENT_VERSION: i32 = 1;

    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, Self::CURRENT_VERSION);
        encoder.write_var_bytes(&self.pubkey);
        encoder.into_inner()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        read_version(
            &mut decoder,
            "acc",
            Self::VERSION_BASIC,
            Self::CURRENT_VERSION,
        )?;
        let pubkey = decoder.read_var_bytes()?;
        decoder.finish()?;
        Ok(Self { pubkey })
    }
}

/// One ledger line: a credit (positive) or debit (negative) against a named
/// account. Entries are keyed by account and a monotonically increasing
/// sequence number, so on-disk iteration yields insertion order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountingEntry {
    pub account: String,
    pub credit_debit: i64,
    pub time: i64,
    pub other_account: String,
    pub comment: String,
    pub order_pos: i64,
}

impl AccountingEntry {
    pub const VERSION_BASIC: i32 = 1;
    pub const CURRENT_VERSION: i32 = 1;

    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, Self::CURRENT_VERSION);
        encoder.write_i64_le(self.credit_debit);
        encoder.write_i64_le(self.time);
        encoder.write_var_str(&self.other_account);
        encoder.write_var_str(&self.comment);
        encoder.write_i64_le(self.order_pos);
        encoder.into_inner()
    }

    /// `account` comes from the record key.
    pub fn decode(account: String, bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        read_version(
            &mut decoder,
            "acentry",
            Self::VERSION_BASIC,
            Self::CURRENT_VERSION,
        )?;
        let credit_debit = decoder.read_i64_le()?;
        let time = decoder.read_i64_le()?;
        let other_account = decoder.read_var_str()?;
        let comment = decoder.read_var_str()?;
        let order_pos = decoder.read_i64_le()?;
        decoder.finish()?;
        Ok(Self {
            account,
            credit_debit,
            time,
            other_account,
            comment,
            order_pos,
        })
    }
}

/// Chain-tip locator written after each processed block; block scanning
/// resumes from here.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BlockLocator {
    pub hashes: Vec<Hash256>,
}

impl BlockLocator {
    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.write_varint(self.hashes.len() as u64);
        for hash in &self.hashes {
            encoder.write_hash256(hash);
        }
        encoder.into_inner()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WalletDbError> {
        let mut decoder = Decoder::new(bytes);
        let count = decoder.read_varint()? as usize;
        let mut hashes = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            hashes.push(decoder.read_hash256()?);
        }
        decoder.finish()?;
        Ok(Self { hashes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_tx_round_trip() {
        let tx = WalletTx {
            raw: vec![0xde, 0xad, 0xbe, 0xef],
            time_received: 1_700_000_000,
            from_account: "savings".to_string(),
            order_pos: 12,
        };
        assert_eq!(WalletTx::decode(&tx.encode()).unwrap(), tx);
        assert_eq!(tx.txid(), sha256d(&tx.raw));
    }

    #[test]
    fn accounting_entry_round_trip() {
        let entry = AccountingEntry {
            account: "a".to_string(),
            credit_debit: -250,
            time: 77,
            other_account: "b".to_string(),
            comment: "rent".to_string(),
            order_pos: 3,
        };
        assert_eq!(
            AccountingEntry::decode("a".to_string(), &entry.encode()).unwrap(),
            entry
        );
    }

    #[test]
    fn block_locator_round_trip() {
        let locator = BlockLocator {
            hashes: vec![[1u8; 32], [2u8; 32]],
        };
        assert_eq!(BlockLocator::decode(&locator.encode()).unwrap(), locator);
    }
}

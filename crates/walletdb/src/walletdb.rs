//! The wallet record store: every typed record's read/write/erase surface.

use std::sync::Arc;

use sigmad_primitives::encoding::{Decoder, Encoder};
use sigmad_primitives::{Hash160, Hash256};
use sigmad_storage::{Column, KeyValueStore, StoreError, WriteBatch};

use crate::codec::{key_for, prefix_bytes};
use crate::coins::{
    AccumulatorSnapshot, CoinScheme, GroupElementBytes, MintEntry, Sigma, SpendSerialEntry,
};
use crate::error::WalletDbError;
use crate::hdchain::{HdChain, KeyMetadata};
use crate::hdmint::{HdMint, MintPoolEntry};
use crate::keys::{validate_pubkey, CryptedKeyRecord, KeyPoolRecord, KeyRecord, MasterKeyRecord};
use crate::txstore::{Account, AccountingEntry, BlockLocator, WalletTx};

/// Record key prefixes. These are the on-disk wire contract; each is framed
/// as a CompactSize-prefixed string, so no prefix can shadow another during
/// prefix scans even where one string starts with another ("sigma" /
/// "sigma_spend").
pub mod prefixes {
    pub const NAME: &str = "name";
    pub const PURPOSE: &str = "purpose";
    pub const TX: &str = "tx";
    pub const KEY: &str = "key";
    pub const CRYPTED_KEY: &str = "ckey";
    pub const KEY_META: &str = "keymeta";
    pub const MASTER_KEY: &str = "mkey";
    pub const DEFAULT_KEY: &str = "defaultkey";
    pub const POOL: &str = "pool";
    pub const CSCRIPT: &str = "cscript";
    pub const WATCH_ONLY: &str = "watchs";
    pub const ORDER_POS_NEXT: &str = "orderposnext";
    pub const DEST_DATA: &str = "destdata";
    pub const ACCOUNT: &str = "acc";
    pub const ACCOUNTING_ENTRY: &str = "acentry";
    pub const BEST_BLOCK: &str = "bestblock";
    pub const MIN_VERSION: &str = "minversion";
    pub const VERSION: &str = "version";
    pub const HD_CHAIN: &str = "hdchain";
    pub const LEGACY_MINT: &str = "zerocoin";
    pub const LEGACY_MINT_ARCHIVE: &str = "zerocoin_archive";
    pub const LEGACY_SPEND: &str = "zcspend";
    pub const SIGMA_MINT: &str = "sigma";
    pub const SIGMA_MINT_ARCHIVE: &str = "sigma_archive";
    pub const SIGMA_SPEND: &str = "sigma_spend";
    pub const ACCUMULATOR: &str = "zcaccumulator";
    pub const CALCULATED_ZC_BLOCK: &str = "calczcblock";
    pub const MINT_COUNT: &str = "zcount";
    pub const SEED_COUNT: &str = "zseedcount";
    pub const HD_MINT: &str = "hdmint";
    pub const HD_MINT_ARCHIVE: &str = "hdmint_archive";
    pub const PUBCOIN: &str = "pubcoin";
    pub const MINT_POOL: &str = "mintpool";
}

const META_FORMAT_KEY: &[u8] = b"format";
/// Bumped when the page/record layout changes incompatibly; an older marker
/// asks for a salvage-and-rewrite pass before the store is used.
pub const FORMAT_CURRENT: u8 = 2;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormatCheck {
    Current,
    NeedRewrite,
}

pub struct WalletDb<S> {
    store: Arc<S>,
}

impl<S> Clone for WalletDb<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> WalletDb<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Check the on-disk format marker, stamping fresh stores with the
    /// current format.
    pub fn check_format(&self) -> Result<FormatCheck, WalletDbError> {
        match self.store.get(Column::Meta, META_FORMAT_KEY)? {
            Some(bytes) => {
                let marker = bytes.first().copied().unwrap_or(0);
                if marker < FORMAT_CURRENT {
                    Ok(FormatCheck::NeedRewrite)
                } else if marker > FORMAT_CURRENT {
                    Err(WalletDbError::TooNew {
                        record: "format",
                        version: marker as i32,
                        supported: FORMAT_CURRENT as i32,
                    })
                } else {
                    Ok(FormatCheck::Current)
                }
            }
            None => {
                self.store
                    .put(Column::Meta, META_FORMAT_KEY, &[FORMAT_CURRENT])?;
                Ok(FormatCheck::Current)
            }
        }
    }

    pub(crate) fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.store.get(Column::Wallet, key)
    }

    fn put_raw(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), WalletDbError> {
        self.store.put(Column::Wallet, &key, &value)?;
        Ok(())
    }

    fn delete_raw(&self, key: Vec<u8>) -> Result<(), WalletDbError> {
        self.store.delete(Column::Wallet, &key)?;
        Ok(())
    }

    fn write_i32_record(&self, prefix: &str, value: i32) -> Result<(), WalletDbError> {
        let mut encoder = Encoder::new();
        encoder.write_i32_le(value);
        self.put_raw(prefix_bytes(prefix), encoder.into_inner())
    }

    fn read_i32_record(&self, prefix: &str) -> Result<Option<i32>, WalletDbError> {
        match self.get_raw(&prefix_bytes(prefix))? {
            Some(bytes) => {
                let mut decoder = Decoder::new(&bytes);
                let value = decoder.read_i32_le()?;
                decoder.finish()?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    // --- key material ------------------------------------------------------

    fn key_key(pubkey: &[u8]) -> Vec<u8> {
        let mut encoder = key_for(prefixes::KEY);
        encoder.write_var_bytes(pubkey);
        encoder.into_inner()
    }

    fn keymeta_key(pubkey: &[u8]) -> Vec<u8> {
        let mut encoder = key_for(prefixes::KEY_META);
        encoder.write_var_bytes(pubkey);
        encoder.into_inner()
    }

    /// Write a plaintext key and its metadata in one transaction.
    pub fn write_key(
        &self,
        record: &KeyRecord,
        meta: &KeyMetadata,
    ) -> Result<(), WalletDbError> {
        validate_pubkey(&record.pubkey)?;
        let mut batch = WriteBatch::new();
        batch.put(
            Column::Wallet,
            Self::keymeta_key(&record.pubkey),
            meta.encode(),
        );
        batch.put(
            Column::Wallet,
            Self::key_key(&record.pubkey),
            record.encode_value(),
        );
        self.store.write_batch(&batch)?;
        Ok(())
    }

    pub fn erase_key(&self, pubkey: &[u8]) -> Result<(), WalletDbError> {
        let mut batch = WriteBatch::new();
        batch.delete(Column::Wallet, Self::key_key(pubkey));
        batch.delete(Column::Wallet, Self::keymeta_key(pubkey));
        self.store.write_batch(&batch)?;
        Ok(())
    }

    pub fn read_key(&self, pubkey: &[u8]) -> Result<Option<KeyRecord>, WalletDbError> {
        match self.get_raw(&Self::key_key(pubkey))? {
            Some(bytes) => Ok(Some(KeyRecord::decode_value(pubkey.to_vec(), &bytes)?)),
            None => Ok(None),
        }
    }

    /// Write an encrypted key, replacing any plaintext record for the same
    /// pubkey in the same transaction.
    pub fn write_crypted_key(
        &self,
        record: &CryptedKeyRecord,
        meta: &KeyMetadata,
    ) -> Result<(), WalletDbError> {
        validate_pubkey(&record.pubkey)?;
        let mut ckey = key_for(prefixes::CRYPTED_KEY);
        ckey.write_var_bytes(&record.pubkey);
        let mut batch = WriteBatch::new();
        batch.put(
            Column::Wallet,
            Self::keymeta_key(&record.pubkey),
            meta.encode(),
        );
        batch.put(Column::Wallet, ckey.into_inner(), record.encode_value());
        batch.delete(Column::Wallet, Self::key_key(&record.pubkey));
        self.store.write_batch(&batch)?;
        Ok(())
    }

    pub fn write_master_key(
        &self,
        id: u32,
        record: &MasterKeyRecord,
    ) -> Result<(), WalletDbError> {
        let mut encoder = key_for(prefixes::MASTER_KEY);
        encoder.write_u32_le(id);
        self.put_raw(encoder.into_inner(), record.encode())
    }

    pub fn write_min_version(&self, version: i32) -> Result<(), WalletDbError> {
        self.write_i32_record(prefixes::MIN_VERSION, version)
    }

    pub fn read_min_version(&self) -> Result<Option<i32>, WalletDbError> {
        self.read_i32_record(prefixes::MIN_VERSION)
    }

    pub fn write_wallet_version(&self, version: i32) -> Result<(), WalletDbError> {
        self.write_i32_record(prefixes::VERSION, version)
    }

    pub fn read_wallet_version(&self) -> Result<Option<i32>, WalletDbError> {
        self.read_i32_record(prefixes::VERSION)
    }

    pub fn write_default_key(&self, pubkey: &[u8]) -> Result<(), WalletDbError> {
        validate_pubkey(pubkey)?;
        let mut encoder = Encoder::new();
        encoder.write_var_bytes(pubkey);
        self.put_raw(prefix_bytes(prefixes::DEFAULT_KEY), encoder.into_inner())
    }

    pub fn read_default_key(&self) -> Result<Option<Vec<u8>>, WalletDbError> {
        match self.get_raw(&prefix_bytes(prefixes::DEFAULT_KEY))? {
            Some(bytes) => {
                let mut decoder = Decoder::new(&bytes);
                let pubkey = decoder.read_var_bytes()?;
                decoder.finish()?;
                Ok(Some(pubkey))
            }
            None => Ok(None),
        }
    }

    fn watch_only_key(script: &[u8]) -> Vec<u8> {
        let mut encoder = key_for(prefixes::WATCH_ONLY);
        encoder.write_var_bytes(script);
        encoder.into_inner()
    }

    pub fn write_watch_only(&self, script: &[u8]) -> Result<(), WalletDbError> {
        self.put_raw(Self::watch_only_key(script), vec![0x01])
    }

    pub fn erase_watch_only(&self, script: &[u8]) -> Result<(), WalletDbError> {
        self.delete_raw(Self::watch_only_key(script))
    }

    pub fn write_cscript(&self, hash: &Hash160, script: &[u8]) -> Result<(), WalletDbError> {
        let mut encoder = key_for(prefixes::CSCRIPT);
        encoder.write_hash160(hash);
        let mut value = Encoder::new();
        value.write_var_bytes(script);
        self.put_raw(encoder.into_inner(), value.into_inner())
    }

    pub fn read_cscript(&self, hash: &Hash160) -> Result<Option<Vec<u8>>, WalletDbError> {
        let mut encoder = key_for(prefixes::CSCRIPT);
        encoder.write_hash160(hash);
        match self.get_raw(&encoder.into_inner())? {
            Some(bytes) => {
                let mut decoder = Decoder::new(&bytes);
                let script = decoder.read_var_bytes()?;
                decoder.finish()?;
                Ok(Some(script))
            }
            None => Ok(None),
        }
    }

    pub fn erase_cscript(&self, hash: &Hash160) -> Result<(), WalletDbError> {
        let mut encoder = key_for(prefixes::CSCRIPT);
        encoder.write_hash160(hash);
        self.delete_raw(encoder.into_inner())
    }

    fn pool_key(index: i64) -> Vec<u8> {
        let mut encoder = key_for(prefixes::POOL);
        encoder.write_i64_le(index);
        encoder.into_inner()
    }

    pub fn write_pool(&self, index: i64, record: &KeyPoolRecord) -> Result<(), WalletDbError> {
        self.put_raw(Self::pool_key(index), record.encode())
    }

    pub fn read_pool(&self, index: i64) -> Result<Option<KeyPoolRecord>, WalletDbError> {
        match self.get_raw(&Self::pool_key(index))? {
            Some(bytes) => Ok(Some(KeyPoolRecord::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn erase_pool(&self, index: i64) -> Result<(), WalletDbError> {
        self.delete_raw(Self::pool_key(index))
    }

    pub fn write_hd_chain(&self, chain: &HdChain) -> Result<(), WalletDbError> {
        self.put_raw(prefix_bytes(prefixes::HD_CHAIN), chain.encode())
    }

    pub fn read_hd_chain(&self) -> Result<Option<HdChain>, WalletDbError> {
        match self.get_raw(&prefix_bytes(prefixes::HD_CHAIN))? {
            Some(bytes) => Ok(Some(HdChain::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    // --- address book ------------------------------------------------------

    fn address_key(prefix: &str, address: &str) -> Vec<u8> {
        let mut encoder = key_for(prefix);
        encoder.write_var_str(address);
        encoder.into_inner()
    }

    fn string_value(value: &str) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.write_var_str(value);
        encoder.into_inner()
    }

    pub fn write_name(&self, address: &str, name: &str) -> Result<(), WalletDbError> {
        self.put_raw(
            Self::address_key(prefixes::NAME, address),
            Self::string_value(name),
        )
    }

    pub fn erase_name(&self, address: &str) -> Result<(), WalletDbError> {
        self.delete_raw(Self::address_key(prefixes::NAME, address))
    }

    pub fn write_purpose(&self, address: &str, purpose: &str) -> Result<(), WalletDbError> {
        self.put_raw(
            Self::address_key(prefixes::PURPOSE, address),
            Self::string_value(purpose),
        )
    }

    pub fn erase_purpose(&self, address: &str) -> Result<(), WalletDbError> {
        self.delete_raw(Self::address_key(prefixes::PURPOSE, address))
    }

    fn dest_data_key(address: &str, key: &str) -> Vec<u8> {
        let mut encoder = key_for(prefixes::DEST_DATA);
        encoder.write_var_str(address);
        encoder.write_var_str(key);
        encoder.into_inner()
    }

    pub fn write_dest_data(
        &self,
        address: &str,
        key: &str,
        value: &str,
    ) -> Result<(), WalletDbError> {
        self.put_raw(Self::dest_data_key(address, key), Self::string_value(value))
    }

    pub fn erase_dest_data(&self, address: &str, key: &str) -> Result<(), WalletDbError> {
        self.delete_raw(Self::dest_data_key(address, key))
    }

    // --- transactions and accounting ---------------------------------------

    pub(crate) fn tx_key(txid: &Hash256) -> Vec<u8> {
        let mut encoder = key_for(prefixes::TX);
        encoder.write_hash256(txid);
        encoder.into_inner()
    }

    pub fn write_tx(&self, tx: &WalletTx) -> Result<(), WalletDbError> {
        self.put_raw(Self::tx_key(&tx.txid()), tx.encode())
    }

    pub fn read_tx(&self, txid: &Hash256) -> Result<Option<WalletTx>, WalletDbError> {
        match self.get_raw(&Self::tx_key(txid))? {
            Some(bytes) => Ok(Some(WalletTx::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn erase_tx(&self, txid: &Hash256) -> Result<(), WalletDbError> {
        self.delete_raw(Self::tx_key(txid))
    }

    pub fn write_best_block(&self, locator: &BlockLocator) -> Result<(), WalletDbError> {
        self.put_raw(prefix_bytes(prefixes::BEST_BLOCK), locator.encode())
    }

    pub fn read_best_block(&self) -> Result<Option<BlockLocator>, WalletDbError> {
        match self.get_raw(&prefix_bytes(prefixes::BEST_BLOCK))? {
            Some(bytes) => Ok(Some(BlockLocator::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn write_order_pos_next(&self, order_pos: i64) -> Result<(), WalletDbError> {
        let mut encoder = Encoder::new();
        encoder.write_i64_le(order_pos);
        self.put_raw(prefix_bytes(prefixes::ORDER_POS_NEXT), encoder.into_inner())
    }

    pub fn read_order_pos_next(&self) -> Result<Option<i64>, WalletDbError> {
        match self.get_raw(&prefix_bytes(prefixes::ORDER_POS_NEXT))? {
            Some(bytes) => {
                let mut decoder = Decoder::new(&bytes);
                let value = decoder.read_i64_le()?;
                decoder.finish()?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn write_account(&self, name: &str, account: &Account) -> Result<(), WalletDbError> {
        self.put_raw(Self::address_key(prefixes::ACCOUNT, name), account.encode())
    }

    pub fn read_account(&self, name: &str) -> Result<Option<Account>, WalletDbError> {
        match self.get_raw(&Self::address_key(prefixes::ACCOUNT, name))? {
            Some(bytes) => Ok(Some(Account::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn erase_account(&self, name: &str) -> Result<(), WalletDbError> {
        self.delete_raw(Self::address_key(prefixes::ACCOUNT, name))
    }

    pub(crate) fn accounting_key(account: &str, seq: u64) -> Vec<u8> {
        let mut encoder = key_for(prefixes::ACCOUNTING_ENTRY);
        encoder.write_var_str(account);
        // Big-endian so on-disk order is numeric order.
        encoder.write_u64_be(seq);
        encoder.into_inner()
    }

    /// Backend write keyed by an explicit sequence number. Does not touch
    /// the owning wallet's caches.
    pub fn write_accounting_entry(
        &self,
        seq: u64,
        entry: &AccountingEntry,
    ) -> Result<(), WalletDbError> {
        self.put_raw(Self::accounting_key(&entry.account, seq), entry.encode())
    }

    /// Append under the next free sequence number for the entry's account.
    pub fn append_accounting_entry(
        &self,
        entry: &AccountingEntry,
    ) -> Result<u64, WalletDbError> {
        let seq = self
            .list_account_entries(&entry.account)?
            .last()
            .map_or(0, |(seq, _)| seq + 1);
        self.write_accounting_entry(seq, entry)?;
        Ok(seq)
    }

    /// Entries for one account in sequence order.
    pub fn list_account_entries(
        &self,
        account: &str,
    ) -> Result<Vec<(u64, AccountingEntry)>, WalletDbError> {
        let mut prefix = key_for(prefixes::ACCOUNTING_ENTRY);
        prefix.write_var_str(account);
        let prefix = prefix.into_inner();
        let mut out = Vec::new();
        for (key, value) in self.store.scan_prefix(Column::Wallet, &prefix)? {
            let mut decoder = Decoder::new(&key[prefix.len()..]);
            let seq = decoder.read_u64_be()?;
            decoder.finish()?;
            out.push((seq, AccountingEntry::decode(account.to_string(), &value)?));
        }
        Ok(out)
    }

    /// All entries across accounts, in on-disk order.
    pub fn list_all_account_entries(
        &self,
    ) -> Result<Vec<(u64, AccountingEntry)>, WalletDbError> {
        let prefix = prefix_bytes(prefixes::ACCOUNTING_ENTRY);
        let mut out = Vec::new();
        for (key, value) in self.store.scan_prefix(Column::Wallet, &prefix)? {
            let mut decoder = Decoder::new(&key[prefix.len()..]);
            let account = decoder.read_var_str()?;
            let seq = decoder.read_u64_be()?;
            decoder.finish()?;
            out.push((seq, AccountingEntry::decode(account, &value)?));
        }
        Ok(out)
    }

    /// Running credit minus debit for an account.
    pub fn get_account_credit_debit(&self, account: &str) -> Result<i64, WalletDbError> {
        Ok(self
            .list_account_entries(account)?
            .iter()
            .map(|(_, entry)| entry.credit_debit)
            .sum())
    }

    pub fn write_calculated_zc_block(&self, height: i32) -> Result<(), WalletDbError> {
        self.write_i32_record(prefixes::CALCULATED_ZC_BLOCK, height)
    }

    pub fn read_calculated_zc_block(&self) -> Result<Option<i32>, WalletDbError> {
        self.read_i32_record(prefixes::CALCULATED_ZC_BLOCK)
    }

    // --- shielded mint & spend-serial ledger -------------------------------

    fn mint_key<C: CoinScheme>(pubcoin: &C::Pubcoin) -> Vec<u8> {
        let mut encoder = key_for(C::MINT_PREFIX);
        C::encode_pubcoin(pubcoin, &mut encoder);
        encoder.into_inner()
    }

    fn mint_archive_key<C: CoinScheme>(hash_pubcoin: &Hash256) -> Vec<u8> {
        let mut encoder = key_for(C::MINT_ARCHIVE_PREFIX);
        encoder.write_hash256(hash_pubcoin);
        encoder.into_inner()
    }

    fn spend_key<C: CoinScheme>(serial: &C::Serial) -> Vec<u8> {
        let mut encoder = key_for(C::SPEND_PREFIX);
        C::encode_serial(serial, &mut encoder);
        encoder.into_inner()
    }

    pub fn write_mint<C: CoinScheme>(&self, entry: &MintEntry<C>) -> Result<(), WalletDbError> {
        self.put_raw(Self::mint_key::<C>(&entry.value), entry.encode())
    }

    pub fn read_mint<C: CoinScheme>(
        &self,
        pubcoin: &C::Pubcoin,
    ) -> Result<Option<MintEntry<C>>, WalletDbError> {
        match self.get_raw(&Self::mint_key::<C>(pubcoin))? {
            Some(bytes) => Ok(Some(MintEntry::<C>::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn has_mint<C: CoinScheme>(&self, pubcoin: &C::Pubcoin) -> Result<bool, WalletDbError> {
        Ok(self.get_raw(&Self::mint_key::<C>(pubcoin))?.is_some())
    }

    pub fn erase_mint<C: CoinScheme>(&self, entry: &MintEntry<C>) -> Result<(), WalletDbError> {
        self.delete_raw(Self::mint_key::<C>(&entry.value))
    }

    pub fn list_mints<C: CoinScheme>(&self) -> Result<Vec<MintEntry<C>>, WalletDbError> {
        let prefix = prefix_bytes(C::MINT_PREFIX);
        let mut out = Vec::new();
        for (_, value) in self.store.scan_prefix(Column::Wallet, &prefix)? {
            out.push(MintEntry::<C>::decode(&value)?);
        }
        Ok(out)
    }

    /// Record a revealed spend serial. Refuses to overwrite an existing
    /// record for the same serial: a second write means the caller skipped
    /// the `has_spend_serial` guard.
    pub fn write_spend_serial<C: CoinScheme>(
        &self,
        entry: &SpendSerialEntry<C>,
    ) -> Result<(), WalletDbError> {
        let inserted = self.store.insert_if_absent(
            Column::Wallet,
            &Self::spend_key::<C>(&entry.serial),
            &entry.encode(),
        )?;
        if !inserted {
            return Err(WalletDbError::DuplicateSerial);
        }
        Ok(())
    }

    /// The double-spend oracle: callers must check this before accepting a
    /// spend.
    pub fn has_spend_serial<C: CoinScheme>(
        &self,
        serial: &C::Serial,
    ) -> Result<bool, WalletDbError> {
        Ok(self.get_raw(&Self::spend_key::<C>(serial))?.is_some())
    }

    pub fn erase_spend_serial<C: CoinScheme>(
        &self,
        entry: &SpendSerialEntry<C>,
    ) -> Result<(), WalletDbError> {
        self.delete_raw(Self::spend_key::<C>(&entry.serial))
    }

    pub fn list_spend_serials<C: CoinScheme>(
        &self,
    ) -> Result<Vec<SpendSerialEntry<C>>, WalletDbError> {
        let prefix = prefix_bytes(C::SPEND_PREFIX);
        let mut out = Vec::new();
        for (_, value) in self.store.scan_prefix(Column::Wallet, &prefix)? {
            out.push(SpendSerialEntry::<C>::decode(&value)?);
        }
        Ok(out)
    }

    fn accumulator_key(denomination: i64, id: i32) -> Vec<u8> {
        let mut encoder = key_for(prefixes::ACCUMULATOR);
        encoder.write_i64_le(denomination);
        encoder.write_i32_le(id);
        encoder.into_inner()
    }

    pub fn write_accumulator(
        &self,
        snapshot: &AccumulatorSnapshot,
    ) -> Result<(), WalletDbError> {
        self.put_raw(
            Self::accumulator_key(snapshot.denomination, snapshot.id),
            snapshot.encode_value(),
        )
    }

    pub fn read_accumulator(
        &self,
        denomination: i64,
        id: i32,
    ) -> Result<Option<AccumulatorSnapshot>, WalletDbError> {
        match self.get_raw(&Self::accumulator_key(denomination, id))? {
            Some(bytes) => Ok(Some(AccumulatorSnapshot::decode_value(
                denomination,
                id,
                &bytes,
            )?)),
            None => Ok(None),
        }
    }

    /// Move an active mint into the orphan archive, preserving all fields.
    /// Fails with `NotFound` when no active record exists (archiving an
    /// already-archived mint included).
    pub fn archive_mint<C: CoinScheme>(
        &self,
        entry: &MintEntry<C>,
    ) -> Result<(), WalletDbError> {
        let active_key = Self::mint_key::<C>(&entry.value);
        if self.get_raw(&active_key)?.is_none() {
            return Err(WalletDbError::NotFound("active mint"));
        }
        let mut batch = WriteBatch::new();
        batch.delete(Column::Wallet, active_key);
        batch.put(
            Column::Wallet,
            Self::mint_archive_key::<C>(&entry.pubcoin_hash()),
            entry.encode(),
        );
        self.store.write_batch(&batch)?;
        Ok(())
    }

    /// Restore an archived mint to the active keyspace. Fails with
    /// `NotFound` when the hash is not in the archive.
    pub fn unarchive_mint<C: CoinScheme>(
        &self,
        hash_pubcoin: &Hash256,
    ) -> Result<MintEntry<C>, WalletDbError> {
        let archive_key = Self::mint_archive_key::<C>(hash_pubcoin);
        let bytes = self
            .get_raw(&archive_key)?
            .ok_or(WalletDbError::NotFound("archived mint"))?;
        let entry = MintEntry::<C>::decode(&bytes)?;
        let mut batch = WriteBatch::new();
        batch.delete(Column::Wallet, archive_key);
        batch.put(Column::Wallet, Self::mint_key::<C>(&entry.value), bytes);
        self.store.write_batch(&batch)?;
        Ok(entry)
    }

    pub fn write_mint_count(&self, count: i32) -> Result<(), WalletDbError> {
        self.write_i32_record(prefixes::MINT_COUNT, count)
    }

    pub fn read_mint_count(&self) -> Result<Option<i32>, WalletDbError> {
        self.read_i32_record(prefixes::MINT_COUNT)
    }

    pub fn write_seed_count(&self, count: i32) -> Result<(), WalletDbError> {
        self.write_i32_record(prefixes::SEED_COUNT, count)
    }

    pub fn read_seed_count(&self) -> Result<Option<i32>, WalletDbError> {
        self.read_i32_record(prefixes::SEED_COUNT)
    }

    // --- deterministic mints and the mint pool -----------------------------

    fn hd_mint_key(hash_pubcoin: &Hash256) -> Vec<u8> {
        let mut encoder = key_for(prefixes::HD_MINT);
        encoder.write_hash256(hash_pubcoin);
        encoder.into_inner()
    }

    fn hd_mint_archive_key(hash_pubcoin: &Hash256) -> Vec<u8> {
        let mut encoder = key_for(prefixes::HD_MINT_ARCHIVE);
        encoder.write_hash256(hash_pubcoin);
        encoder.into_inner()
    }

    pub fn write_hd_mint(&self, mint: &HdMint) -> Result<(), WalletDbError> {
        self.put_raw(Self::hd_mint_key(&mint.hash_pubcoin), mint.encode())
    }

    pub fn read_hd_mint(&self, hash_pubcoin: &Hash256) -> Result<Option<HdMint>, WalletDbError> {
        match self.get_raw(&Self::hd_mint_key(hash_pubcoin))? {
            Some(bytes) => Ok(Some(HdMint::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn has_hd_mint(&self, pubcoin: &GroupElementBytes) -> Result<bool, WalletDbError> {
        let hash = Sigma::pubcoin_hash(pubcoin);
        Ok(self.get_raw(&Self::hd_mint_key(&hash))?.is_some())
    }

    pub fn erase_hd_mint(&self, mint: &HdMint) -> Result<(), WalletDbError> {
        self.delete_raw(Self::hd_mint_key(&mint.hash_pubcoin))
    }

    pub fn list_hd_mints(&self) -> Result<Vec<HdMint>, WalletDbError> {
        let prefix = prefix_bytes(prefixes::HD_MINT);
        let mut out = Vec::new();
        for (_, value) in self.store.scan_prefix(Column::Wallet, &prefix)? {
            out.push(HdMint::decode(&value)?);
        }
        Ok(out)
    }

    pub fn archive_hd_mint(&self, mint: &HdMint) -> Result<(), WalletDbError> {
        let active_key = Self::hd_mint_key(&mint.hash_pubcoin);
        if self.get_raw(&active_key)?.is_none() {
            return Err(WalletDbError::NotFound("active deterministic mint"));
        }
        let mut batch = WriteBatch::new();
        batch.delete(Column::Wallet, active_key);
        batch.put(
            Column::Wallet,
            Self::hd_mint_archive_key(&mint.hash_pubcoin),
            mint.encode(),
        );
        self.store.write_batch(&batch)?;
        Ok(())
    }

    pub fn unarchive_hd_mint(&self, hash_pubcoin: &Hash256) -> Result<HdMint, WalletDbError> {
        let archive_key = Self::hd_mint_archive_key(hash_pubcoin);
        let bytes = self
            .get_raw(&archive_key)?
            .ok_or(WalletDbError::NotFound("archived deterministic mint"))?;
        let mint = HdMint::decode(&bytes)?;
        let mut batch = WriteBatch::new();
        batch.delete(Column::Wallet, archive_key);
        batch.put(Column::Wallet, Self::hd_mint_key(hash_pubcoin), bytes);
        self.store.write_batch(&batch)?;
        Ok(mint)
    }

    fn mint_pool_key(hash_pubcoin: &Hash256) -> Vec<u8> {
        let mut encoder = key_for(prefixes::MINT_POOL);
        encoder.write_hash256(hash_pubcoin);
        encoder.into_inner()
    }

    pub fn write_mint_pool_entry(
        &self,
        hash_pubcoin: &Hash256,
        entry: &MintPoolEntry,
    ) -> Result<(), WalletDbError> {
        self.put_raw(Self::mint_pool_key(hash_pubcoin), entry.encode())
    }

    pub fn read_mint_pool_entry(
        &self,
        hash_pubcoin: &Hash256,
    ) -> Result<Option<MintPoolEntry>, WalletDbError> {
        match self.get_raw(&Self::mint_pool_key(hash_pubcoin))? {
            Some(bytes) => Ok(Some(MintPoolEntry::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn erase_mint_pool_entry(&self, hash_pubcoin: &Hash256) -> Result<(), WalletDbError> {
        self.delete_raw(Self::mint_pool_key(hash_pubcoin))
    }

    pub fn list_mint_pool(&self) -> Result<Vec<(Hash256, MintPoolEntry)>, WalletDbError> {
        let prefix = prefix_bytes(prefixes::MINT_POOL);
        let mut out = Vec::new();
        for (key, value) in self.store.scan_prefix(Column::Wallet, &prefix)? {
            let mut decoder = Decoder::new(&key[prefix.len()..]);
            let hash = decoder.read_hash256()?;
            decoder.finish()?;
            out.push((hash, MintPoolEntry::decode(&value)?));
        }
        Ok(out)
    }

    fn pubcoin_key(hash_serial: &Hash256) -> Vec<u8> {
        let mut encoder = key_for(prefixes::PUBCOIN);
        encoder.write_hash256(hash_serial);
        encoder.into_inner()
    }

    /// Side index from a serial hash to the pubcoin it spends.
    pub fn write_pubcoin(
        &self,
        hash_serial: &Hash256,
        pubcoin: &GroupElementBytes,
    ) -> Result<(), WalletDbError> {
        self.put_raw(Self::pubcoin_key(hash_serial), pubcoin.0.to_vec())
    }

    pub fn read_pubcoin(
        &self,
        hash_serial: &Hash256,
    ) -> Result<Option<GroupElementBytes>, WalletDbError> {
        match self.get_raw(&Self::pubcoin_key(hash_serial))? {
            Some(bytes) => {
                let mut decoder = Decoder::new(&bytes);
                let pubcoin = GroupElementBytes(decoder.read_fixed::<34>()?);
                decoder.finish()?;
                Ok(Some(pubcoin))
            }
            None => Ok(None),
        }
    }

    pub fn list_serial_pubcoin_pairs(
        &self,
    ) -> Result<Vec<(Hash256, GroupElementBytes)>, WalletDbError> {
        let prefix = prefix_bytes(prefixes::PUBCOIN);
        let mut out = Vec::new();
        for (key, value) in self.store.scan_prefix(Column::Wallet, &prefix)? {
            let mut key_decoder = Decoder::new(&key[prefix.len()..]);
            let hash = key_decoder.read_hash256()?;
            key_decoder.finish()?;
            let mut value_decoder = Decoder::new(&value);
            let pubcoin = GroupElementBytes(value_decoder.read_fixed::<34>()?);
            value_decoder.finish()?;
            out.push((hash, pubcoin));
        }
        Ok(out)
    }
}

//! Bulk wallet load, global transaction reordering, and zap operations.
//!
//! Loading walks every record in the wallet column once and dispatches on the
//! key prefix through a fixed handler table. Records are staged into a fresh
//! `Wallet` and only committed to the caller's caches when the pass does not
//! end in a fatal classification, so a `TooNew` abort leaves the in-memory
//! state exactly as it was.

use std::collections::{BTreeMap, BTreeSet};

use sigmad_log::{log_debug, log_info};
use sigmad_primitives::encoding::Decoder;
use sigmad_primitives::{Hash160, Hash256};
use sigmad_storage::{Column, KeyValueStore, WriteBatch};

use crate::codec::{prefix_bytes, read_key_prefix};
use crate::coins::{
    AccumulatorSnapshot, BigNum, GroupElementBytes, Legacy, MintEntry, Sigma, SpendSerialEntry,
};
use crate::error::{DbErrors, WalletDbError};
use crate::hdchain::{HdChain, KeyMetadata};
use crate::hdmint::{HdMint, MintPool, MintPoolEntry};
use crate::keys::{CryptedKeyRecord, KeyPoolRecord, KeyRecord, MasterKeyRecord};
use crate::txstore::{Account, AccountingEntry, BlockLocator, WalletTx, ORDER_POS_UNSET};
use crate::walletdb::{prefixes, WalletDb};

/// In-memory wallet state hydrated by `load_wallet`.
#[derive(Default)]
pub struct Wallet {
    pub keys: BTreeMap<Vec<u8>, KeyRecord>,
    pub crypted_keys: BTreeMap<Vec<u8>, CryptedKeyRecord>,
    pub key_metadata: BTreeMap<Vec<u8>, KeyMetadata>,
    pub master_keys: BTreeMap<u32, MasterKeyRecord>,
    pub watch_scripts: BTreeSet<Vec<u8>>,
    pub redeem_scripts: BTreeMap<Hash160, Vec<u8>>,
    pub default_key: Option<Vec<u8>>,
    pub key_pool: BTreeMap<i64, KeyPoolRecord>,
    pub min_version: Option<i32>,
    pub wallet_version: Option<i32>,
    pub hd_chain: Option<HdChain>,

    pub txs: BTreeMap<Hash256, WalletTx>,
    /// Txids in the order their records came off disk; the reorder tie-break.
    pub tx_load_order: Vec<Hash256>,
    pub names: BTreeMap<String, String>,
    pub purposes: BTreeMap<String, String>,
    pub dest_data: BTreeMap<(String, String), String>,
    pub accounts: BTreeMap<String, Account>,
    pub accounting_entries: Vec<(u64, AccountingEntry)>,
    pub order_pos_next: Option<i64>,
    pub best_block: Option<BlockLocator>,

    pub legacy_mints: Vec<MintEntry<Legacy>>,
    pub sigma_mints: Vec<MintEntry<Sigma>>,
    pub legacy_spends: Vec<SpendSerialEntry<Legacy>>,
    pub sigma_spends: Vec<SpendSerialEntry<Sigma>>,
    pub accumulators: BTreeMap<(i64, i32), BigNum>,
    pub calculated_zc_block: Option<i32>,
    pub mint_count: Option<i32>,
    pub seed_count: Option<i32>,

    pub hd_mints: BTreeMap<Hash256, HdMint>,
    pub mint_pool: MintPool,
    pub serial_pubcoins: BTreeMap<Hash256, GroupElementBytes>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) type Handler = fn(&mut Wallet, &mut Decoder, &[u8]) -> Result<(), WalletDbError>;

fn load_name(wallet: &mut Wallet, key: &mut Decoder, value: &[u8]) -> Result<(), WalletDbError> {
    let address = key.read_var_str()?;
    let mut decoder = Decoder::new(value);
    let name = decoder.read_var_str()?;
    decoder.finish()?;
    wallet.names.insert(address, name);
    Ok(())
}

fn load_purpose(
    wallet: &mut Wallet,
    key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let address = key.read_var_str()?;
    let mut decoder = Decoder::new(value);
    let purpose = decoder.read_var_str()?;
    decoder.finish()?;
    wallet.purposes.insert(address, purpose);
    Ok(())
}

fn load_dest_data(
    wallet: &mut Wallet,
    key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let address = key.read_var_str()?;
    let data_key = key.read_var_str()?;
    let mut decoder = Decoder::new(value);
    let data = decoder.read_var_str()?;
    decoder.finish()?;
    wallet.dest_data.insert((address, data_key), data);
    Ok(())
}

fn load_tx(wallet: &mut Wallet, key: &mut Decoder, value: &[u8]) -> Result<(), WalletDbError> {
    let txid = key.read_hash256()?;
    let tx = WalletTx::decode(value)?;
    if tx.txid() != txid {
        return Err(WalletDbError::Corrupt("tx record key does not match txid"));
    }
    wallet.tx_load_order.push(txid);
    wallet.txs.insert(txid, tx);
    Ok(())
}

fn load_key(wallet: &mut Wallet, key: &mut Decoder, value: &[u8]) -> Result<(), WalletDbError> {
    let pubkey = key.read_var_bytes()?;
    let record = KeyRecord::decode_value(pubkey.clone(), value)?;
    wallet.keys.insert(pubkey, record);
    Ok(())
}

fn load_crypted_key(
    wallet: &mut Wallet,
    key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let pubkey = key.read_var_bytes()?;
    let record = CryptedKeyRecord::decode_value(pubkey.clone(), value)?;
    wallet.crypted_keys.insert(pubkey, record);
    Ok(())
}

fn load_key_meta(
    wallet: &mut Wallet,
    key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let pubkey = key.read_var_bytes()?;
    wallet.key_metadata.insert(pubkey, KeyMetadata::decode(value)?);
    Ok(())
}

fn load_master_key(
    wallet: &mut Wallet,
    key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let id = key.read_u32_le()?;
    wallet.master_keys.insert(id, MasterKeyRecord::decode(value)?);
    Ok(())
}

fn load_default_key(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let mut decoder = Decoder::new(value);
    let pubkey = decoder.read_var_bytes()?;
    decoder.finish()?;
    wallet.default_key = Some(pubkey);
    Ok(())
}

fn load_pool(wallet: &mut Wallet, key: &mut Decoder, value: &[u8]) -> Result<(), WalletDbError> {
    let index = key.read_i64_le()?;
    wallet.key_pool.insert(index, KeyPoolRecord::decode(value)?);
    Ok(())
}

fn load_cscript(
    wallet: &mut Wallet,
    key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let hash = key.read_hash160()?;
    let mut decoder = Decoder::new(value);
    let script = decoder.read_var_bytes()?;
    decoder.finish()?;
    wallet.redeem_scripts.insert(hash, script);
    Ok(())
}

fn load_watch_only(
    wallet: &mut Wallet,
    key: &mut Decoder,
    _value: &[u8],
) -> Result<(), WalletDbError> {
    let script = key.read_var_bytes()?;
    wallet.watch_scripts.insert(script);
    Ok(())
}

fn load_order_pos_next(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let mut decoder = Decoder::new(value);
    wallet.order_pos_next = Some(decoder.read_i64_le()?);
    decoder.finish()?;
    Ok(())
}

fn load_account(
    wallet: &mut Wallet,
    key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let name = key.read_var_str()?;
    wallet.accounts.insert(name, Account::decode(value)?);
    Ok(())
}

fn load_accounting_entry(
    wallet: &mut Wallet,
    key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let account = key.read_var_str()?;
    let seq = key.read_u64_be()?;
    wallet
        .accounting_entries
        .push((seq, AccountingEntry::decode(account, value)?));
    Ok(())
}

fn load_best_block(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    wallet.best_block = Some(BlockLocator::decode(value)?);
    Ok(())
}

fn read_i32_value(value: &[u8]) -> Result<i32, WalletDbError> {
    let mut decoder = Decoder::new(value);
    let out = decoder.read_i32_le()?;
    decoder.finish()?;
    Ok(out)
}

fn load_min_version(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    wallet.min_version = Some(read_i32_value(value)?);
    Ok(())
}

fn load_wallet_version(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    wallet.wallet_version = Some(read_i32_value(value)?);
    Ok(())
}

fn load_hd_chain(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    wallet.hd_chain = Some(HdChain::decode(value)?);
    Ok(())
}

fn load_legacy_mint(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    wallet.legacy_mints.push(MintEntry::<Legacy>::decode(value)?);
    Ok(())
}

fn load_sigma_mint(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    wallet.sigma_mints.push(MintEntry::<Sigma>::decode(value)?);
    Ok(())
}

fn load_legacy_spend(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    wallet
        .legacy_spends
        .push(SpendSerialEntry::<Legacy>::decode(value)?);
    Ok(())
}

fn load_sigma_spend(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    wallet
        .sigma_spends
        .push(SpendSerialEntry::<Sigma>::decode(value)?);
    Ok(())
}

fn load_accumulator(
    wallet: &mut Wallet,
    key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let denomination = key.read_i64_le()?;
    let id = key.read_i32_le()?;
    let snapshot = AccumulatorSnapshot::decode_value(denomination, id, value)?;
    wallet.accumulators.insert((denomination, id), snapshot.value);
    Ok(())
}

fn load_calculated_zc_block(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    wallet.calculated_zc_block = Some(read_i32_value(value)?);
    Ok(())
}

fn load_mint_count(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    wallet.mint_count = Some(read_i32_value(value)?);
    Ok(())
}

fn load_seed_count(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    wallet.seed_count = Some(read_i32_value(value)?);
    Ok(())
}

fn load_hd_mint(
    wallet: &mut Wallet,
    _key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let mint = HdMint::decode(value)?;
    wallet.hd_mints.insert(mint.hash_pubcoin, mint);
    Ok(())
}

fn load_mint_pool(
    wallet: &mut Wallet,
    key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let hash_pubcoin = key.read_hash256()?;
    wallet
        .mint_pool
        .add(hash_pubcoin, MintPoolEntry::decode(value)?);
    Ok(())
}

fn load_pubcoin(
    wallet: &mut Wallet,
    key: &mut Decoder,
    value: &[u8],
) -> Result<(), WalletDbError> {
    let hash_serial = key.read_hash256()?;
    let mut decoder = Decoder::new(value);
    let pubcoin = GroupElementBytes(decoder.read_fixed::<34>()?);
    decoder.finish()?;
    wallet.serial_pubcoins.insert(hash_serial, pubcoin);
    Ok(())
}

/// Archived records stay out of the active caches; unarchive brings them
/// back through the store, not through load.
fn load_archived(
    _wallet: &mut Wallet,
    _key: &mut Decoder,
    _value: &[u8],
) -> Result<(), WalletDbError> {
    Ok(())
}

/// Fixed prefix dispatch. Adding a record type means adding a row here; an
/// unknown prefix at load time is a noncritical skip, never a crash.
const HANDLERS: &[(&str, Handler)] = &[
    (prefixes::NAME, load_name),
    (prefixes::PURPOSE, load_purpose),
    (prefixes::DEST_DATA, load_dest_data),
    (prefixes::TX, load_tx),
    (prefixes::KEY, load_key),
    (prefixes::CRYPTED_KEY, load_crypted_key),
    (prefixes::KEY_META, load_key_meta),
    (prefixes::MASTER_KEY, load_master_key),
    (prefixes::DEFAULT_KEY, load_default_key),
    (prefixes::POOL, load_pool),
    (prefixes::CSCRIPT, load_cscript),
    (prefixes::WATCH_ONLY, load_watch_only),
    (prefixes::ORDER_POS_NEXT, load_order_pos_next),
    (prefixes::ACCOUNT, load_account),
    (prefixes::ACCOUNTING_ENTRY, load_accounting_entry),
    (prefixes::BEST_BLOCK, load_best_block),
    (prefixes::MIN_VERSION, load_min_version),
    (prefixes::VERSION, load_wallet_version),
    (prefixes::HD_CHAIN, load_hd_chain),
    (prefixes::LEGACY_MINT, load_legacy_mint),
    (prefixes::LEGACY_MINT_ARCHIVE, load_archived),
    (prefixes::LEGACY_SPEND, load_legacy_spend),
    (prefixes::SIGMA_MINT, load_sigma_mint),
    (prefixes::SIGMA_MINT_ARCHIVE, load_archived),
    (prefixes::SIGMA_SPEND, load_sigma_spend),
    (prefixes::ACCUMULATOR, load_accumulator),
    (prefixes::CALCULATED_ZC_BLOCK, load_calculated_zc_block),
    (prefixes::MINT_COUNT, load_mint_count),
    (prefixes::SEED_COUNT, load_seed_count),
    (prefixes::HD_MINT, load_hd_mint),
    (prefixes::HD_MINT_ARCHIVE, load_archived),
    (prefixes::PUBCOIN, load_pubcoin),
    (prefixes::MINT_POOL, load_mint_pool),
];

pub(crate) fn handler_for(prefix: &str) -> Option<Handler> {
    HANDLERS
        .iter()
        .find(|(name, _)| *name == prefix)
        .map(|(_, handler)| *handler)
}

/// Key-material prefixes whose decode failures corrupt the wallet rather
/// than merely losing a record.
fn is_key_material(prefix: &str) -> bool {
    matches!(
        prefix,
        "key" | "ckey" | "keymeta" | "mkey" | "defaultkey" | "hdchain" | "minversion"
    )
}

/// Load every wallet record into `wallet`, returning the pass
/// classification. A `TooNew` record aborts the load and leaves `wallet`
/// untouched; decode failures elsewhere degrade the result without stopping
/// the pass.
pub fn load_wallet<S: KeyValueStore>(
    db: &WalletDb<S>,
    wallet: &mut Wallet,
) -> Result<DbErrors, WalletDbError> {
    let mut result = match db.check_format()? {
        crate::walletdb::FormatCheck::Current => DbErrors::LoadOk,
        crate::walletdb::FormatCheck::NeedRewrite => DbErrors::NeedRewrite,
    };

    let mut staged = Wallet::new();
    let mut loaded = 0usize;
    let mut skipped = 0usize;

    for (key, value) in db.store().scan_prefix(Column::Wallet, &[])? {
        let mut key_decoder = Decoder::new(&key);
        let prefix = match read_key_prefix(&mut key_decoder) {
            Ok(prefix) => prefix,
            Err(err) => {
                log_debug!("skipping wallet record with unreadable key: {err}");
                skipped += 1;
                result = result.combine(DbErrors::NoncriticalError);
                continue;
            }
        };

        let Some(handler) = handler_for(&prefix) else {
            log_debug!("skipping wallet record with unknown prefix {prefix:?}");
            skipped += 1;
            result = result.combine(DbErrors::NoncriticalError);
            continue;
        };

        match handler(&mut staged, &mut key_decoder, &value) {
            Ok(()) => loaded += 1,
            Err(WalletDbError::TooNew {
                record,
                version,
                supported,
            }) => {
                log_info!(
                    "wallet load aborted: {record} record version {version} \
                     exceeds supported {supported}"
                );
                return Ok(DbErrors::TooNew);
            }
            Err(WalletDbError::Store(err)) => return Err(WalletDbError::Store(err)),
            Err(err) => {
                skipped += 1;
                if is_key_material(&prefix) {
                    log_debug!("corrupt {prefix} record: {err}");
                    result = result.combine(DbErrors::Corrupt);
                } else {
                    log_debug!("skipping undecodable {prefix} record: {err}");
                    result = result.combine(DbErrors::NoncriticalError);
                }
            }
        }
    }

    *wallet = staged;

    if needs_reorder(wallet) {
        result = result.combine(reorder_transactions(db, wallet)?);
    } else {
        let next = highest_order_pos(wallet).map_or(0, |pos| pos + 1);
        if wallet.order_pos_next.map_or(true, |cur| cur < next) {
            wallet.order_pos_next = Some(next);
            db.write_order_pos_next(next)?;
        }
    }

    log_info!(
        "wallet load: {loaded} records, {skipped} skipped, {} txs, {} sigma mints, \
         {} deterministic mints",
        wallet.txs.len(),
        wallet.sigma_mints.len(),
        wallet.hd_mints.len()
    );
    Ok(result)
}

fn highest_order_pos(wallet: &Wallet) -> Option<i64> {
    wallet
        .txs
        .values()
        .map(|tx| tx.order_pos)
        .chain(wallet.accounting_entries.iter().map(|(_, e)| e.order_pos))
        .filter(|pos| *pos != ORDER_POS_UNSET)
        .max()
}

fn needs_reorder(wallet: &Wallet) -> bool {
    let mut seen = BTreeSet::new();
    for pos in wallet
        .txs
        .values()
        .map(|tx| tx.order_pos)
        .chain(wallet.accounting_entries.iter().map(|(_, e)| e.order_pos))
    {
        if pos == ORDER_POS_UNSET || !seen.insert(pos) {
            return true;
        }
    }
    false
}

/// Rebuild the global order over transactions and accounting entries:
/// gap-free, strictly increasing from zero. The sort key is receive time,
/// transactions before accounting entries on ties, then stable on-disk order;
/// existing order positions never feed the sort, so a second pass over
/// already-ordered records assigns identical positions.
pub fn reorder_transactions<S: KeyValueStore>(
    db: &WalletDb<S>,
    wallet: &mut Wallet,
) -> Result<DbErrors, WalletDbError> {
    enum Item {
        Tx(Hash256),
        Entry(usize),
    }

    let mut items: Vec<(i64, u8, usize, Item)> = Vec::new();
    for (disk_index, txid) in wallet.tx_load_order.iter().enumerate() {
        if let Some(tx) = wallet.txs.get(txid) {
            items.push((tx.time_received, 0, disk_index, Item::Tx(*txid)));
        }
    }
    for (disk_index, (_, entry)) in wallet.accounting_entries.iter().enumerate() {
        items.push((entry.time, 1, disk_index, Item::Entry(disk_index)));
    }
    items.sort_by_key(|(time, kind, disk_index, _)| (*time, *kind, *disk_index));

    let mut batch = WriteBatch::new();
    for (pos, (_, _, _, item)) in items.iter().enumerate() {
        let pos = pos as i64;
        match item {
            Item::Tx(txid) => {
                let tx = wallet
                    .txs
                    .get_mut(txid)
                    .ok_or(WalletDbError::Corrupt("reorder lost a transaction"))?;
                if tx.order_pos != pos {
                    tx.order_pos = pos;
                    batch.put(Column::Wallet, WalletDb::<S>::tx_key(txid), tx.encode());
                }
            }
            Item::Entry(index) => {
                let (seq, entry) = &mut wallet.accounting_entries[*index];
                if entry.order_pos != pos {
                    entry.order_pos = pos;
                    batch.put(
                        Column::Wallet,
                        WalletDb::<S>::accounting_key(&entry.account, *seq),
                        entry.encode(),
                    );
                }
            }
        }
    }

    let next = items.len() as i64;
    let rewritten = batch.len();
    if !batch.is_empty() {
        db.store().write_batch(&batch)?;
    }
    if wallet.order_pos_next != Some(next) {
        wallet.order_pos_next = Some(next);
        db.write_order_pos_next(next)?;
    }

    log_info!(
        "reordered {} wallet entries, rewrote {rewritten}",
        items.len()
    );
    Ok(DbErrors::LoadOk)
}

/// All wallet transactions without hydrating a full `Wallet`; used by
/// recovery tooling and the zap paths.
pub fn find_wallet_txs<S: KeyValueStore>(
    db: &WalletDb<S>,
) -> Result<Vec<(Hash256, WalletTx)>, WalletDbError> {
    let prefix = prefix_bytes(prefixes::TX);
    let mut out = Vec::new();
    for (key, value) in db.store().scan_prefix(Column::Wallet, &prefix)? {
        let mut decoder = Decoder::new(&key[prefix.len()..]);
        let txid = decoder.read_hash256()?;
        decoder.finish()?;
        out.push((txid, WalletTx::decode(&value)?));
    }
    Ok(out)
}

/// Delete every transaction record, returning what was removed so the caller
/// can rescan from scratch.
pub fn zap_wallet_txs<S: KeyValueStore>(
    db: &WalletDb<S>,
) -> Result<Vec<WalletTx>, WalletDbError> {
    let txs = find_wallet_txs(db)?;
    let mut batch = WriteBatch::new();
    let mut removed = Vec::with_capacity(txs.len());
    for (txid, tx) in txs {
        batch.delete(Column::Wallet, WalletDb::<S>::tx_key(&txid));
        removed.push(tx);
    }
    if !batch.is_empty() {
        db.store().write_batch(&batch)?;
    }
    log_info!("zapped {} wallet transactions", removed.len());
    Ok(removed)
}

/// Delete a chosen set of transactions. Missing hashes are reported, not
/// treated as failure.
pub fn zap_select_txs<S: KeyValueStore>(
    db: &WalletDb<S>,
    txids: &[Hash256],
) -> Result<(Vec<Hash256>, Vec<Hash256>), WalletDbError> {
    let mut batch = WriteBatch::new();
    let mut removed = Vec::new();
    let mut missing = Vec::new();
    for txid in txids {
        let key = WalletDb::<S>::tx_key(txid);
        if db.store().get(Column::Wallet, &key)?.is_some() {
            batch.delete(Column::Wallet, key);
            removed.push(*txid);
        } else {
            missing.push(*txid);
        }
    }
    if !batch.is_empty() {
        db.store().write_batch(&batch)?;
    }
    Ok((removed, missing))
}

/// Wipe the sigma mint state ahead of a full re-derivation from seed: active
/// sigma mints, deterministic mint records, the mint pool, and the
/// serial-to-pubcoin index. Archives are kept; they hold operator-requested
/// history.
pub fn zap_sigma_mints<S: KeyValueStore>(db: &WalletDb<S>) -> Result<usize, WalletDbError> {
    let mut batch = WriteBatch::new();
    for prefix in [
        prefixes::SIGMA_MINT,
        prefixes::HD_MINT,
        prefixes::MINT_POOL,
        prefixes::PUBCOIN,
    ] {
        for (key, _) in db
            .store()
            .scan_prefix(Column::Wallet, &prefix_bytes(prefix))?
        {
            batch.delete(Column::Wallet, key);
        }
    }
    let removed = batch.len();
    if !batch.is_empty() {
        db.store().write_batch(&batch)?;
    }
    log_info!("zapped {removed} sigma mint records");
    Ok(removed)
}

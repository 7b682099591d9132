//! Single-record operations against an in-memory store.

use std::sync::Arc;

use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sigmad_storage::memory::MemoryStore;
use sigmad_storage::KeyValueStore;
use sigmad_walletdb::hdchain::{HdChain, KeyMetadata};
use sigmad_walletdb::keys::{KeyRecord, KeyPoolRecord, MasterKeyRecord, SecretBytes};
use sigmad_walletdb::txstore::{Account, AccountingEntry, BlockLocator, WalletTx};
use sigmad_walletdb::walletdb::FormatCheck;
use sigmad_walletdb::{WalletDb, WalletDbError};

fn db() -> WalletDb<MemoryStore> {
    WalletDb::new(Arc::new(MemoryStore::new()))
}

fn test_pubkey(seed: u8) -> Vec<u8> {
    let secp = Secp256k1::new();
    let secret = SecretKey::from_slice(&[seed; 32]).unwrap();
    PublicKey::from_secret_key(&secp, &secret).serialize().to_vec()
}

#[test]
fn format_marker_is_stamped_once() {
    let db = db();
    assert_eq!(db.check_format().unwrap(), FormatCheck::Current);
    // Second check sees the stamped marker.
    assert_eq!(db.check_format().unwrap(), FormatCheck::Current);
}

#[test]
fn stale_format_marker_requests_rewrite() {
    let db = db();
    db.store()
        .put(sigmad_storage::Column::Meta, b"format", &[1])
        .unwrap();
    assert_eq!(db.check_format().unwrap(), FormatCheck::NeedRewrite);
}

#[test]
fn key_write_read_erase() {
    let db = db();
    let pubkey = test_pubkey(7);
    let record = KeyRecord {
        pubkey: pubkey.clone(),
        secret: SecretBytes::new(vec![0x22; 32]),
    };
    let meta = KeyMetadata::new(1_600_000_000);
    db.write_key(&record, &meta).unwrap();

    let read = db.read_key(&pubkey).unwrap().unwrap();
    assert_eq!(read.secret.as_slice(), &[0x22; 32]);

    db.erase_key(&pubkey).unwrap();
    assert!(db.read_key(&pubkey).unwrap().is_none());
}

#[test]
fn invalid_pubkey_is_rejected() {
    let db = db();
    let record = KeyRecord {
        pubkey: vec![0u8; 33],
        secret: SecretBytes::new(vec![0x22; 32]),
    };
    assert!(matches!(
        db.write_key(&record, &KeyMetadata::new(0)),
        Err(WalletDbError::Corrupt(_))
    ));
}

#[test]
fn master_key_and_pool_and_scripts() {
    let db = db();
    db.write_master_key(
        1,
        &MasterKeyRecord {
            crypted_key: vec![1, 2, 3],
            salt: vec![9; 8],
            derivation_method: 0,
            derive_iterations: 25_000,
        },
    )
    .unwrap();

    db.write_pool(
        5,
        &KeyPoolRecord {
            time: 100,
            pubkey: test_pubkey(3),
        },
    )
    .unwrap();
    assert_eq!(db.read_pool(5).unwrap().unwrap().time, 100);
    db.erase_pool(5).unwrap();
    assert!(db.read_pool(5).unwrap().is_none());

    let hash = [4u8; 20];
    db.write_cscript(&hash, &[0x51, 0x52]).unwrap();
    assert_eq!(db.read_cscript(&hash).unwrap().unwrap(), vec![0x51, 0x52]);
    db.erase_cscript(&hash).unwrap();
    assert!(db.read_cscript(&hash).unwrap().is_none());
}

#[test]
fn hd_chain_round_trip_through_store() {
    let db = db();
    assert!(db.read_hd_chain().unwrap().is_none());
    let chain = HdChain {
        master_key_id: [8u8; 20],
        external_chain_counter: 12,
        external_chain_counters: vec![1, 2, 3],
    };
    db.write_hd_chain(&chain).unwrap();
    assert_eq!(db.read_hd_chain().unwrap().unwrap(), chain);
}

#[test]
fn address_book_records() {
    let db = db();
    db.write_name("addr1", "alice").unwrap();
    db.write_purpose("addr1", "receive").unwrap();
    db.write_dest_data("addr1", "used", "1").unwrap();
    db.erase_name("addr1").unwrap();
    db.erase_purpose("addr1").unwrap();
    db.erase_dest_data("addr1", "used").unwrap();
}

#[test]
fn tx_and_best_block_records() {
    let db = db();
    let tx = WalletTx {
        raw: vec![1, 2, 3, 4],
        time_received: 500,
        from_account: String::new(),
        order_pos: 0,
    };
    db.write_tx(&tx).unwrap();
    assert_eq!(db.read_tx(&tx.txid()).unwrap().unwrap(), tx);
    db.erase_tx(&tx.txid()).unwrap();
    assert!(db.read_tx(&tx.txid()).unwrap().is_none());

    let locator = BlockLocator {
        hashes: vec![[9u8; 32]],
    };
    db.write_best_block(&locator).unwrap();
    assert_eq!(db.read_best_block().unwrap().unwrap(), locator);
}

#[test]
fn accounting_entries_append_in_sequence() {
    let db = db();
    db.write_account(
        "savings",
        &Account {
            pubkey: test_pubkey(2),
        },
    )
    .unwrap();

    let mut entry = AccountingEntry {
        account: "savings".to_string(),
        credit_debit: 100,
        time: 10,
        other_account: String::new(),
        comment: "deposit".to_string(),
        order_pos: 0,
    };
    assert_eq!(db.append_accounting_entry(&entry).unwrap(), 0);
    entry.credit_debit = -30;
    entry.order_pos = 1;
    assert_eq!(db.append_accounting_entry(&entry).unwrap(), 1);

    let entries = db.list_account_entries("savings").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, 0);
    assert_eq!(entries[1].0, 1);
    assert_eq!(db.get_account_credit_debit("savings").unwrap(), 70);
    assert_eq!(db.get_account_credit_debit("other").unwrap(), 0);
}

#[test]
fn scalar_records() {
    let db = db();
    assert!(db.read_min_version().unwrap().is_none());
    db.write_min_version(60000).unwrap();
    assert_eq!(db.read_min_version().unwrap(), Some(60000));

    db.write_order_pos_next(17).unwrap();
    assert_eq!(db.read_order_pos_next().unwrap(), Some(17));

    db.write_calculated_zc_block(1200).unwrap();
    assert_eq!(db.read_calculated_zc_block().unwrap(), Some(1200));

    db.write_mint_count(4).unwrap();
    db.write_seed_count(2).unwrap();
    assert_eq!(db.read_mint_count().unwrap(), Some(4));
    assert_eq!(db.read_seed_count().unwrap(), Some(2));
}

//! Mint ledger, spend-serial guard, archive moves, and the mint pool.

use std::sync::Arc;

use sigmad_storage::memory::MemoryStore;
use sigmad_walletdb::coins::{
    AccumulatorSnapshot, BigNum, CoinScheme, GroupElementBytes, Legacy, MintEntry, ScalarBytes,
    Sigma, SpendSerialEntry,
};
use sigmad_walletdb::hdmint::{HdMint, MintPoolEntry};
use sigmad_walletdb::{WalletDb, WalletDbError};

fn db() -> WalletDb<MemoryStore> {
    WalletDb::new(Arc::new(MemoryStore::new()))
}

fn sigma_mint(tag: u8) -> MintEntry<Sigma> {
    MintEntry {
        value: GroupElementBytes([tag; 34]),
        randomness: ScalarBytes([tag.wrapping_add(1); 32]),
        serial: ScalarBytes([tag.wrapping_add(2); 32]),
        denomination: 100_000_000,
        id: -1,
        height: -1,
        is_used: false,
    }
}

#[test]
fn mint_write_read_list_erase() {
    let db = db();
    let mint = sigma_mint(1);
    assert!(!db.has_mint::<Sigma>(&mint.value).unwrap());
    db.write_mint(&mint).unwrap();
    assert!(db.has_mint::<Sigma>(&mint.value).unwrap());
    assert_eq!(db.read_mint::<Sigma>(&mint.value).unwrap().unwrap(), mint);

    db.write_mint(&sigma_mint(2)).unwrap();
    assert_eq!(db.list_mints::<Sigma>().unwrap().len(), 2);

    db.erase_mint(&mint).unwrap();
    assert!(!db.has_mint::<Sigma>(&mint.value).unwrap());
    assert_eq!(db.list_mints::<Sigma>().unwrap().len(), 1);
}

#[test]
fn legacy_and_sigma_ledgers_are_disjoint() {
    let db = db();
    let legacy = MintEntry::<Legacy> {
        value: BigNum::from_bytes_be(&[0x42; 48]),
        randomness: BigNum::from_bytes_be(&[1]),
        serial: BigNum::from_bytes_be(&[2]),
        denomination: 25,
        id: 1,
        height: 10,
        is_used: false,
    };
    db.write_mint(&legacy).unwrap();
    db.write_mint(&sigma_mint(3)).unwrap();

    assert_eq!(db.list_mints::<Legacy>().unwrap().len(), 1);
    assert_eq!(db.list_mints::<Sigma>().unwrap().len(), 1);
}

#[test]
fn second_spend_serial_write_is_refused() {
    let db = db();
    let spend = SpendSerialEntry::<Sigma> {
        serial: ScalarBytes([0x33; 32]),
        hash_tx: [0x44; 32],
        pubcoin: GroupElementBytes([0x55; 34]),
        id: 7,
        denomination: 50_000_000,
    };
    assert!(!db.has_spend_serial::<Sigma>(&spend.serial).unwrap());
    db.write_spend_serial(&spend).unwrap();
    assert!(db.has_spend_serial::<Sigma>(&spend.serial).unwrap());

    // Same serial from a different transaction: the ledger must keep the
    // first record.
    let conflicting = SpendSerialEntry::<Sigma> {
        hash_tx: [0x66; 32],
        ..spend.clone()
    };
    assert!(matches!(
        db.write_spend_serial(&conflicting),
        Err(WalletDbError::DuplicateSerial)
    ));
    assert!(db.has_spend_serial::<Sigma>(&spend.serial).unwrap());

    let listed = db.list_spend_serials::<Sigma>().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].hash_tx, [0x44; 32]);

    db.erase_spend_serial(&spend).unwrap();
    assert!(!db.has_spend_serial::<Sigma>(&spend.serial).unwrap());
}

#[test]
fn archive_preserves_fields_and_guards_missing_records() {
    let db = db();
    let mint = sigma_mint(9);

    // Archiving a mint that was never written.
    assert!(matches!(
        db.archive_mint(&mint),
        Err(WalletDbError::NotFound(_))
    ));

    db.write_mint(&mint).unwrap();
    db.archive_mint(&mint).unwrap();
    assert!(!db.has_mint::<Sigma>(&mint.value).unwrap());

    // Archiving twice fails: the active record is gone.
    assert!(matches!(
        db.archive_mint(&mint),
        Err(WalletDbError::NotFound(_))
    ));

    let restored = db.unarchive_mint::<Sigma>(&mint.pubcoin_hash()).unwrap();
    assert_eq!(restored, mint);
    assert!(db.has_mint::<Sigma>(&mint.value).unwrap());

    // The archive slot is consumed on unarchive.
    assert!(matches!(
        db.unarchive_mint::<Sigma>(&mint.pubcoin_hash()),
        Err(WalletDbError::NotFound(_))
    ));
}

#[test]
fn hd_mint_archive_round_trip() {
    let db = db();
    let mint = HdMint {
        count: 2,
        seed_id: [1u8; 20],
        hash_serial: [2u8; 32],
        hash_pubcoin: [3u8; 32],
        txid: [4u8; 32],
        height: 100,
        denomination: 10,
        is_used: true,
    };
    db.write_hd_mint(&mint).unwrap();
    db.archive_hd_mint(&mint).unwrap();
    assert!(db.read_hd_mint(&mint.hash_pubcoin).unwrap().is_none());

    let restored = db.unarchive_hd_mint(&mint.hash_pubcoin).unwrap();
    assert_eq!(restored, mint);
    assert_eq!(db.read_hd_mint(&mint.hash_pubcoin).unwrap().unwrap(), mint);
}

#[test]
fn mint_pool_lookup_by_pubcoin_hash() {
    let db = db();
    let seed_master = [7u8; 20];
    // Three precomputed identities, indices 0..3, keyed by future pubcoin
    // hash.
    for count in 0..3 {
        let pubcoin = GroupElementBytes([count as u8 + 10; 34]);
        db.write_mint_pool_entry(
            &Sigma::pubcoin_hash(&pubcoin),
            &MintPoolEntry {
                hash_seed_master: seed_master,
                seed_id: [count as u8; 20],
                count,
            },
        )
        .unwrap();
    }

    // An incoming block carries the middle pubcoin; the wallet recognizes it
    // without any HdMint record existing yet.
    let incoming = GroupElementBytes([11u8; 34]);
    let hit = db
        .read_mint_pool_entry(&Sigma::pubcoin_hash(&incoming))
        .unwrap()
        .unwrap();
    assert_eq!(hit.count, 1);
    assert_eq!(hit.hash_seed_master, seed_master);

    assert_eq!(db.list_mint_pool().unwrap().len(), 3);
}

#[test]
fn serial_pubcoin_index() {
    let db = db();
    let pubcoin = GroupElementBytes([0x21; 34]);
    db.write_pubcoin(&[5u8; 32], &pubcoin).unwrap();
    assert_eq!(db.read_pubcoin(&[5u8; 32]).unwrap().unwrap(), pubcoin);
    assert!(db.read_pubcoin(&[6u8; 32]).unwrap().is_none());

    let pairs = db.list_serial_pubcoin_pairs().unwrap();
    assert_eq!(pairs, vec![([5u8; 32], pubcoin)]);
}

#[test]
fn accumulator_snapshots_overwrite_per_group() {
    let db = db();
    let snapshot = AccumulatorSnapshot {
        denomination: 10,
        id: 1,
        value: BigNum::from_bytes_be(&[0xaa, 0xbb]),
    };
    db.write_accumulator(&snapshot).unwrap();
    assert_eq!(db.read_accumulator(10, 1).unwrap().unwrap(), snapshot);

    let advanced = AccumulatorSnapshot {
        value: BigNum::from_bytes_be(&[0xcc]),
        ..snapshot
    };
    db.write_accumulator(&advanced).unwrap();
    assert_eq!(db.read_accumulator(10, 1).unwrap().unwrap(), advanced);
    assert!(db.read_accumulator(10, 2).unwrap().is_none());
}

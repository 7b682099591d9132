//! Salvage into a fresh store and timestamped directory backups.

use std::fs;
use std::sync::Arc;

use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sigmad_primitives::encoding::Encoder;
use sigmad_storage::memory::MemoryStore;
use sigmad_storage::{Column, KeyValueStore};
use sigmad_walletdb::hdchain::KeyMetadata;
use sigmad_walletdb::keys::{KeyRecord, SecretBytes};
use sigmad_walletdb::recover::{auto_backup_wallet, recover};
use sigmad_walletdb::{load_wallet, DbErrors, Wallet, WalletDb};

fn test_pubkey(seed: u8) -> Vec<u8> {
    let secp = Secp256k1::new();
    let secret = SecretKey::from_slice(&[seed; 32]).unwrap();
    PublicKey::from_secret_key(&secp, &secret).serialize().to_vec()
}

fn damaged_store() -> WalletDb<MemoryStore> {
    let db = WalletDb::new(Arc::new(MemoryStore::new()));
    let pubkey = test_pubkey(5);
    db.write_key(
        &KeyRecord {
            pubkey: pubkey.clone(),
            secret: SecretBytes::new(vec![0x44; 32]),
        },
        &KeyMetadata::new(1_000),
    )
    .unwrap();
    db.write_name("addr", "bob").unwrap();

    // A record whose value no longer decodes.
    let mut key = Encoder::new();
    key.write_var_str("tx");
    key.write_bytes(&[7u8; 32]);
    db.store()
        .put(Column::Wallet, &key.into_inner(), &[0xde, 0xad])
        .unwrap();
    db
}

#[test]
fn recover_drops_unreadable_records() {
    let damaged = damaged_store();
    let fresh = WalletDb::new(Arc::new(MemoryStore::new()));

    let stats = recover(damaged.store().as_ref(), fresh.store().as_ref(), false).unwrap();
    assert_eq!(stats.salvaged, 3); // key, keymeta, name
    assert_eq!(stats.skipped, 1);

    let mut wallet = Wallet::new();
    assert_eq!(load_wallet(&fresh, &mut wallet).unwrap(), DbErrors::LoadOk);
    assert_eq!(wallet.keys.len(), 1);
    assert_eq!(wallet.names.get("addr").unwrap(), "bob");
    assert!(wallet.txs.is_empty());
}

#[test]
fn keys_only_recovery_drops_everything_else() {
    let damaged = damaged_store();
    let fresh = WalletDb::new(Arc::new(MemoryStore::new()));

    let stats = recover(damaged.store().as_ref(), fresh.store().as_ref(), true).unwrap();
    assert_eq!(stats.salvaged, 2); // key, keymeta

    let mut wallet = Wallet::new();
    load_wallet(&fresh, &mut wallet).unwrap();
    assert_eq!(wallet.keys.len(), 1);
    assert!(wallet.names.is_empty());
}

#[test]
fn backups_are_timestamped_and_pruned() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("wallet");
    fs::create_dir_all(source.join("sub")).unwrap();
    fs::write(source.join("data.bin"), b"abc").unwrap();
    fs::write(source.join("sub/inner.bin"), b"xyz").unwrap();

    let backups = root.path().join("backups");
    let first = auto_backup_wallet(&source, &backups, 2).unwrap();
    assert_eq!(fs::read(first.join("data.bin")).unwrap(), b"abc");
    assert_eq!(fs::read(first.join("sub/inner.bin")).unwrap(), b"xyz");

    let second = auto_backup_wallet(&source, &backups, 2).unwrap();
    let third = auto_backup_wallet(&source, &backups, 2).unwrap();
    assert_ne!(second, third);

    // Retention keeps the two newest.
    let remaining: Vec<_> = fs::read_dir(&backups)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(remaining.len(), 2);
    assert!(!first.exists());
    assert!(third.exists());
}

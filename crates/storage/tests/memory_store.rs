use sigmad_storage::memory::MemoryStore;
use sigmad_storage::{Column, KeyValueStore, WriteBatch};

#[test]
fn insert_if_absent_refuses_second_write() {
    let store = MemoryStore::new();
    assert!(store
        .insert_if_absent(Column::Wallet, b"zcspend\x01", b"first")
        .unwrap());
    assert!(!store
        .insert_if_absent(Column::Wallet, b"zcspend\x01", b"second")
        .unwrap());
    // The existing value is untouched.
    assert_eq!(
        store.get(Column::Wallet, b"zcspend\x01").unwrap().as_deref(),
        Some(b"first".as_slice())
    );
}

#[test]
fn scan_prefix_is_ordered_and_prefix_bounded() {
    let store = MemoryStore::new();
    store.put(Column::Wallet, b"tx\x02", b"b").unwrap();
    store.put(Column::Wallet, b"tx\x01", b"a").unwrap();
    store.put(Column::Wallet, b"key\x01", b"k").unwrap();
    store.put(Column::Meta, b"tx\x03", b"other-column").unwrap();

    let hits = store.scan_prefix(Column::Wallet, b"tx").unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].0, b"tx\x01");
    assert_eq!(hits[1].0, b"tx\x02");
}

#[test]
fn write_batch_applies_all_ops() {
    let store = MemoryStore::new();
    store.put(Column::Wallet, b"gone", b"x").unwrap();

    let mut batch = WriteBatch::new();
    batch.put(Column::Wallet, b"a".as_slice(), b"1".as_slice());
    batch.put(Column::Meta, b"b".as_slice(), b"2".as_slice());
    batch.delete(Column::Wallet, b"gone".as_slice());
    store.write_batch(&batch).unwrap();

    assert_eq!(
        store.get(Column::Wallet, b"a").unwrap().as_deref(),
        Some(b"1".as_slice())
    );
    assert_eq!(
        store.get(Column::Meta, b"b").unwrap().as_deref(),
        Some(b"2".as_slice())
    );
    assert!(store.get(Column::Wallet, b"gone").unwrap().is_none());
}

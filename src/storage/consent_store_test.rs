use super::*;

use std::cell::RefCell;
use std::rc::Rc;

use crate::storage::MemoryStorage;

fn store_on(storage: &MemoryStorage) -> ConsentStore {
    ConsentStore::new(Rc::new(storage.context()))
}

fn collect(into: &Rc<RefCell<Vec<Option<ConsentRecord>>>>) -> impl Fn(Option<ConsentRecord>) + 'static {
    let sink = Rc::clone(into);
    move |record| sink.borrow_mut().push(record)
}

// =============================================================
// read / has_record
// =============================================================

#[test]
fn empty_storage_reads_absent() {
    let storage = MemoryStorage::new();
    let store = store_on(&storage);
    assert_eq!(store.read(), None);
    assert!(!store.has_record());
}

#[test]
fn malformed_value_reads_absent_but_counts_as_record() {
    let storage = MemoryStorage::new();
    storage.seed(CONSENT_KEY, "{not json");
    let store = store_on(&storage);
    assert_eq!(store.read(), None);
    assert!(store.has_record());
}

#[test]
fn unavailable_storage_reads_absent() {
    let storage = MemoryStorage::unavailable();
    let store = store_on(&storage);
    assert_eq!(store.read(), None);
    assert!(!store.has_record());
}

// =============================================================
// write
// =============================================================

#[test]
fn write_overwrites_whole_record() {
    let storage = MemoryStorage::new();
    storage.seed(CONSENT_KEY, r#"{"consent":{"analytics":true},"extra":1}"#);
    let store = store_on(&storage);

    store.write(&ConsentRecord::revoked());
    assert_eq!(store.read(), Some(ConsentRecord::revoked()));
    assert_eq!(storage.raw(CONSENT_KEY), Some(ConsentRecord::revoked().to_json().unwrap()));
}

#[test]
fn repeated_accept_is_idempotent() {
    let storage = MemoryStorage::new();
    let store = store_on(&storage);
    store.write(&ConsentRecord::accepted());
    let once = storage.raw(CONSENT_KEY);
    store.write(&ConsentRecord::accepted());
    assert_eq!(storage.raw(CONSENT_KEY), once);
    assert_eq!(store.read(), Some(ConsentRecord::accepted()));
}

#[test]
fn write_notifies_local_listeners_synchronously() {
    let storage = MemoryStorage::new();
    let store = store_on(&storage);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _sub = store.clone().subscribe_local_writes(collect(&seen));

    store.write(&ConsentRecord::accepted());
    assert_eq!(*seen.borrow(), vec![Some(ConsentRecord::accepted())]);
}

#[test]
fn failed_write_is_silent_and_not_announced() {
    let storage = MemoryStorage::new();
    let store = store_on(&storage);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _sub = store.subscribe_local_writes(collect(&seen));

    storage.reject_writes(true);
    store.write(&ConsentRecord::accepted());
    assert_eq!(store.read(), None);
    assert!(seen.borrow().is_empty());
}

#[test]
fn released_local_subscription_stops_notifications() {
    let storage = MemoryStorage::new();
    let store = store_on(&storage);
    let seen = Rc::new(RefCell::new(Vec::new()));
    store.subscribe_local_writes(collect(&seen)).release();

    store.write(&ConsentRecord::accepted());
    assert!(seen.borrow().is_empty());
}

// =============================================================
// subscribe_external
// =============================================================

#[test]
fn external_changes_are_decoded_and_filtered_by_key() {
    let storage = MemoryStorage::new();
    let tab_a = store_on(&storage);
    let other_tab = storage.context();
    let tab_b = store_on(&storage);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _sub = tab_b.subscribe_external(collect(&seen));

    other_tab.set_item("unrelated", "1").unwrap();
    tab_a.write(&ConsentRecord::accepted());
    other_tab.set_item(CONSENT_KEY, "garbage").unwrap();
    other_tab.remove_item(CONSENT_KEY).unwrap();
    storage.deliver_pending();

    assert_eq!(*seen.borrow(), vec![Some(ConsentRecord::accepted()), None, None]);
}

#[test]
fn own_writes_do_not_reach_external_listeners() {
    let storage = MemoryStorage::new();
    let store = store_on(&storage);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _sub = store.subscribe_external(collect(&seen));

    store.write(&ConsentRecord::accepted());
    storage.deliver_pending();
    assert!(seen.borrow().is_empty());
}

#[test]
fn subscribe_on_unavailable_storage_returns_noop() {
    let storage = MemoryStorage::unavailable();
    let store = store_on(&storage);
    let sub = store.subscribe_external(|_| {});
    assert!(!sub.is_armed());
}

// =============================================================
// Legacy migration
// =============================================================

#[test]
fn legacy_true_flag_migrates_to_accepted_record() {
    let storage = MemoryStorage::new();
    storage.seed(LEGACY_CONSENT_KEY, "true");
    let store = store_on(&storage);

    assert_eq!(store.read(), Some(ConsentRecord::accepted()));
    assert_eq!(storage.raw(LEGACY_CONSENT_KEY), None);
    assert!(storage.raw(CONSENT_KEY).is_some());
}

#[test]
fn legacy_flag_with_other_value_is_dropped() {
    let storage = MemoryStorage::new();
    storage.seed(LEGACY_CONSENT_KEY, "yes please");
    let store = store_on(&storage);

    assert!(!store.has_record());
    assert_eq!(storage.raw(LEGACY_CONSENT_KEY), None);
}

#[test]
fn structured_record_wins_over_legacy_flag() {
    let storage = MemoryStorage::new();
    storage.seed(LEGACY_CONSENT_KEY, "true");
    storage.seed(CONSENT_KEY, &ConsentRecord::revoked().to_json().unwrap());
    let store = store_on(&storage);

    assert_eq!(store.read(), Some(ConsentRecord::revoked()));
    assert_eq!(storage.raw(LEGACY_CONSENT_KEY), None);
}

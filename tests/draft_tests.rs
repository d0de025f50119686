use form_session::{
    draft::{
        error::StoreError,
        medium::{FileMedium, MemoryMedium, StorageMedium, UnavailableMedium},
        store::{DEFAULT_MEDIUM_KEY, DraftMap, DraftStore},
        values::{DraftValues, is_blank},
    },
    identity::storage_key::derive_key,
};
use serde_json::json;

fn draft(pairs: &[(&str, serde_json::Value)]) -> DraftValues {
    pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
}

// =========================================================================
// DraftValues
// =========================================================================

#[test]
fn unset_field_reads_as_absent() {
    let values = DraftValues::new();
    assert_eq!(values.get("missing"), None);
    assert!(!values.is_present("missing"));
}

#[test]
fn setting_null_removes_the_entry() {
    let mut values = DraftValues::new();
    values.set("a", json!("x"));
    assert!(values.is_present("a"));

    values.set("a", json!(null));
    assert_eq!(values.get("a"), None, "null is stored as absence");
    assert!(values.is_empty());
}

#[test]
fn remove_and_reset() {
    let mut values = draft(&[("a", json!(1)), ("b", json!([1, 2]))]);
    assert_eq!(values.remove("a"), Some(json!(1)));
    assert_eq!(values.len(), 1);

    values.reset();
    assert!(values.is_empty());
}

#[test]
fn deserialized_nulls_are_dropped() {
    let values: DraftValues = serde_json::from_str(r#"{"a":null,"b":"keep"}"#).unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values.get("b"), Some(&json!("keep")));
}

#[test]
fn fingerprint_tracks_content() {
    let a = draft(&[("a", json!("x"))]);
    let same = draft(&[("a", json!("x"))]);
    let other = draft(&[("a", json!("y"))]);

    assert_eq!(a.fingerprint(), same.fingerprint());
    assert_ne!(a.fingerprint(), other.fingerprint());
    assert_eq!(a.fingerprint().len(), 40, "hex SHA-1");
}

#[test]
fn blank_values() {
    assert!(is_blank(&json!(null)));
    assert!(is_blank(&json!("")));
    assert!(is_blank(&json!([])));
    assert!(!is_blank(&json!(" ")));
    assert!(!is_blank(&json!(0)));
    assert!(!is_blank(&json!(false)));
    assert!(!is_blank(&json!(["x"])));
}

// =========================================================================
// DraftStore over an in-memory medium
// =========================================================================

#[test]
fn empty_medium_loads_empty_mapping() {
    let store = DraftStore::new(MemoryMedium::new());
    assert!(store.try_load().unwrap().is_empty());
}

#[test]
fn whole_mapping_round_trips_through_medium() {
    let medium = MemoryMedium::new();
    let mut store = DraftStore::new(medium.clone());

    let mut drafts = DraftMap::new();
    drafts.insert(derive_key(Some("t1"), Some("v1")), draft(&[("a", json!("x"))]));
    drafts.insert(derive_key(Some("t2"), Some("v2")), draft(&[("b", json!(2))]));
    store.save(&drafts);

    assert!(medium.raw(DEFAULT_MEDIUM_KEY).is_some(), "stored under the medium key");
    assert_eq!(DraftStore::new(medium).load(), drafts);
}

#[test]
fn entries_for_different_keys_are_independent() {
    let mut store = DraftStore::new(MemoryMedium::new());
    let k1 = derive_key(Some("t1"), Some("v1"));
    let k2 = derive_key(Some("t1"), Some("v2"));

    store.put_entry(&k1, &draft(&[("a", json!("one"))]));
    store.put_entry(&k2, &draft(&[("a", json!("two"))]));

    store.remove_entry(&k1);
    assert!(store.entry(&k1).is_empty());
    assert_eq!(store.entry(&k2).get("a"), Some(&json!("two")));
}

#[test]
fn putting_an_empty_draft_removes_the_entry() {
    let mut store = DraftStore::new(MemoryMedium::new());
    let key = derive_key(Some("t"), Some("v"));

    store.put_entry(&key, &draft(&[("a", json!("x"))]));
    store.put_entry(&key, &DraftValues::new());
    assert!(!store.load().contains_key(&key));
}

#[test]
fn custom_medium_key_is_honoured() {
    let medium = MemoryMedium::new();
    let mut store = DraftStore::with_key(medium.clone(), "myDrafts");
    store.put_entry(&derive_key(Some("t"), Some("v")), &draft(&[("a", json!(1))]));

    assert!(medium.raw("myDrafts").is_some());
    assert!(medium.raw(DEFAULT_MEDIUM_KEY).is_none());
}

// =========================================================================
// Persistence failures
// =========================================================================

#[test]
fn unavailable_medium_degrades_silently() {
    let mut store = DraftStore::new(UnavailableMedium);
    let key = derive_key(Some("t"), Some("v"));

    assert!(matches!(store.try_load(), Err(StoreError::Unavailable(_))));
    assert!(store.load().is_empty(), "load falls back to empty");

    store.put_entry(&key, &draft(&[("a", json!("x"))]));
    store.remove_entry(&key);
    assert!(store.entry(&key).is_empty());
}

#[test]
fn corrupt_content_reads_as_empty() {
    let mut medium = MemoryMedium::new();
    medium.set(DEFAULT_MEDIUM_KEY, "{not json").unwrap();
    let store = DraftStore::new(medium);

    assert!(matches!(store.try_load(), Err(StoreError::Json { .. })));
    assert!(store.load().is_empty());
}

// =========================================================================
// FileMedium
// =========================================================================

#[test]
fn file_medium_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let medium = FileMedium::new(dir.path().join("drafts.json"));
    assert_eq!(medium.get("anything").unwrap(), None);
}

#[test]
fn file_medium_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drafts.json");
    let key = derive_key(Some("t"), Some("v"));

    let mut store = DraftStore::new(FileMedium::new(&path));
    store.put_entry(&key, &draft(&[("a", json!("persisted"))]));

    let reopened = DraftStore::new(FileMedium::new(&path));
    assert_eq!(reopened.entry(&key).get("a"), Some(&json!("persisted")));
}

#[test]
fn file_medium_keeps_other_medium_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut medium = FileMedium::new(dir.path().join("storage.json"));

    medium.set("theme", "dark").unwrap();
    medium.set("formDrafts", "{}").unwrap();

    assert_eq!(medium.get("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(medium.get("formDrafts").unwrap().as_deref(), Some("{}"));
}

#[test]
fn file_medium_unwritable_path_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut medium = FileMedium::new(dir.path().join("no-such-dir").join("drafts.json"));

    assert!(matches!(medium.set("k", "v"), Err(StoreError::Io { .. })));
}

#[test]
fn corrupt_store_file_is_replaced_on_next_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drafts.json");
    std::fs::write(&path, "{ truncated").unwrap();
    let key = derive_key(Some("t"), Some("v"));

    let mut store = DraftStore::new(FileMedium::new(&path));
    assert!(store.load().is_empty(), "unreadable file loads as empty");
    store.put_entry(&key, &draft(&[("a", json!("x"))]));

    let reopened = DraftStore::new(FileMedium::new(&path));
    assert_eq!(reopened.entry(&key).get("a"), Some(&json!("x")));
}

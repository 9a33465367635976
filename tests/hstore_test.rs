//! End-to-end tests for the hstore column wrapper.
//!
//! Exercises the full lifecycle: construct → populate through the typed
//! setters → read back through the typed getters → mutate → persist through
//! the SQL hooks → decode again.

use chrono::Utc;
use hstore::{Hstore, RawValue};

#[test]
fn test_lifecycle_empty_init_set() {
    let mut hs = Hstore::default();
    assert!(hs.is_empty());
    assert!(hs.value().is_none());

    hs.init_if_empty();
    // Still empty, but the container now exists.
    assert!(hs.is_empty());
    assert_eq!(hs.value(), Some(String::new()));

    hs.set("aaa", 111);
    assert!(!hs.is_empty());
    assert_eq!(hs.get("aaa"), "111");
}

#[test]
fn test_typed_values_end_to_end() {
    let timetest = Utc::now();

    let mut hs = Hstore::new();
    hs.set("aaa", "111");
    hs.set_int("bbb", 222);
    hs.set_float("ccc1", 0.345, 1);
    hs.set_float("ccc2", 0.345, 2);
    hs.set_float("ccc3", 0.345, 3);
    hs.set_float("ccc4", 12.0, 4);
    hs.set_float("ccc5", 0.0, 5);
    hs.set_float("ccc6", 100.0, 6);
    hs.set_float("ccc7", 100.00, 7);
    hs.set_int("k", 123_456);
    hs.set_int("m", 12_345_678);
    hs.set("mydate", timetest);

    let cnt = 12;
    assert_eq!(hs.len(), cnt);

    assert_eq!(hs.get_int("aaa"), 111);
    assert_eq!(hs.get("ccc1"), "0.3");
    assert_eq!(hs.get("ccc2"), "0.34");
    assert_eq!(hs.get("ccc3"), "0.345");
    assert_eq!(hs.get("ccc4"), "12");
    assert_eq!(hs.get("ccc5"), "0");
    assert_eq!(hs.get("ccc6"), "100");
    assert_eq!(hs.get("ccc7"), "100");

    assert_eq!(hs.get_time("mydate"), timetest);

    // Absent and non-numeric keys degrade to zero values.
    assert_eq!(hs.get_float("xxx"), 0.0);
    assert_eq!(hs.get_float("mydate"), 0.0);
    assert_eq!(hs.get_time("xxx"), Hstore::ZERO_TIME);

    // Single delete.
    hs.delete("aaa");
    assert_eq!(hs.get("aaa"), "");
    assert_eq!(hs.len(), cnt - 1);

    // Regex delete removes exactly the ccc* keys.
    hs.delete_by_regex("^ccc.+");
    assert_eq!(hs.get("ccc1"), "");
    assert_eq!(hs.len(), cnt - 8);

    // Memo cache: typed save and load.
    hs.save_to_cache("test.cache", 102_i64);
    assert_eq!(hs.load_from_cache::<i64>("test.cache"), Some(&102));
    assert_eq!(hs.load_from_cache::<i64>("no.cache.key"), None);

    // Append builds a growing delimited list.
    hs.append("words", "apple", ",");
    assert_eq!(hs.get("words"), "apple");
    hs.append("words", "banana", ",");
    assert_eq!(hs.get("words"), "apple,banana");
    hs.append("words", "lemon", ",");
    assert_eq!(hs.get("words"), "apple,banana,lemon");

    assert_eq!(hs.get_as_slice("words", ","), ["apple", "banana", "lemon"]);
    assert!(hs.get_as_slice("no-key", ";").is_empty());
}

#[test]
fn test_persist_and_restore_through_sql_hooks() {
    let mut hs = Hstore::new();
    hs.set("name", "orion");
    hs.set_int("visits", 3);
    hs.set_float("score", 0.345, 2);

    // Persist: the value hook renders the wire string.
    let wire = hs.value().unwrap();

    // Restore: the scan hook repopulates a fresh column from the raw cell.
    let mut restored = Hstore::default();
    restored.scan(RawValue::Text(&wire)).unwrap();
    assert_eq!(restored, hs);
    assert_eq!(restored.get_int("visits"), 3);
    assert_eq!(restored.get_float("score"), 0.34);

    // Drivers may hand over bytes instead of text.
    let mut from_bytes = Hstore::default();
    from_bytes.scan(RawValue::Bytes(wire.as_bytes())).unwrap();
    assert_eq!(from_bytes, hs);

    assert_eq!(Hstore::sql_type(), "hstore");
}

#[test]
fn test_cache_does_not_survive_emptying_the_column() {
    let mut hs = Hstore::new();
    hs.set("a", "1");
    hs.save_to_cache("aggregate", 7_i64);
    assert!(hs.load_from_cache::<i64>("aggregate").is_some());

    hs.delete("a");
    assert!(hs.is_empty());
    assert_eq!(hs.load_from_cache::<i64>("aggregate"), None);
}

#[test]
fn test_merge_then_persist() {
    let mut base = Hstore::new();
    base.set("k", "old");
    base.set("keep", "1");

    let mut overlay = Hstore::new();
    overlay.set("k", "new");

    base.merge(&overlay);
    assert_eq!(base.get("k"), "new");

    let wire = base.value().unwrap();
    let back = Hstore::decode(&wire);
    assert_eq!(back.get("k"), "new");
    assert_eq!(back.get("keep"), "1");
}

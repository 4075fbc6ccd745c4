// SharedLongHashMap fail-fast iteration suite.
//
// A visitor holding a handle to the table it walks can insert into it.
// Verifies: a structural insert aborts the walk with
// ConcurrentModificationError; the table stays consistent afterwards.
use long_hashmap::{ConcurrentModificationError, SharedLongHashMap, TableConfig};

#[test]
fn insert_from_visitor_is_reported() {
    let t = SharedLongHashMap::new();
    t.put(1, "a");
    t.put(2, "b");
    let res = t.for_each(|_, _| {
        t.put(100, "z");
    });
    match res {
        Err(ConcurrentModificationError { expected, observed }) => assert!(observed > expected),
        Ok(()) => panic!("expected the walk to fail"),
    }
    assert_eq!(t.get(100).as_deref(), Some(&"z"));
    assert_eq!(t.len(), 3);
}

// Verifies: an insert that forces a resize mid-walk is still detected and
// no entry is lost.
#[test]
fn resize_from_visitor_is_reported() {
    let t = SharedLongHashMap::with_config(TableConfig::new().initial_capacity(4)).unwrap();
    for k in 0..3 {
        t.put(k, k);
    }
    let before = t.stats().capacity;
    let err = t.for_each(|k, _| {
        for extra in 0..10 {
            t.put(1_000 + k * 100 + extra, extra);
        }
    });
    assert!(err.is_err());
    assert!(t.stats().capacity > before);
    for k in 0..3 {
        assert_eq!(t.get(k).as_deref(), Some(&k));
    }
}

#[test]
fn read_only_walk_succeeds() {
    let t = SharedLongHashMap::new();
    for k in 0..50 {
        t.put(k, k * k);
    }
    let mut sum = 0;
    t.for_each(|_, v| sum += *v).unwrap();
    assert_eq!(sum, (0..50).map(|k| k * k).sum::<i64>());

    let mut keys = t.keys();
    keys.sort_unstable();
    assert_eq!(keys, (0..50).collect::<Vec<_>>());
    assert_eq!(t.values().len(), 50);
    assert!(!t.is_empty());
    assert!(t.contains_key(49));
}

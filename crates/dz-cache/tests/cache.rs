use std::sync::Arc;

use dz_cache::{CacheError, TableCache};
use dz_model::{CacheKey, Table};
use polars::prelude::{Column, DataFrame};
use proptest::prelude::*;

fn table(values: &[i64]) -> Table {
    Table::new(DataFrame::new(vec![Column::new("x".into(), values)]).unwrap())
}

proptest! {
    #[test]
    fn put_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let cache = TableCache::new();
        let first = cache.put("f.csv", &bytes, Table::default());
        let second = cache.put("f.csv", &bytes, Table::default());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, CacheKey::from_content(&bytes));
        prop_assert_eq!(cache.len(), 1);
    }
}

#[test]
fn last_write_wins() {
    let cache = TableCache::new();
    let key = cache.put("f.csv", b"x\n1\n", table(&[1]));
    cache.set(&key, table(&[1, 2]));
    assert_eq!(cache.get(&key).unwrap().height(), 2);
    assert_eq!(cache.entry(&key).unwrap().name, "f.csv");
}

#[test]
fn reimport_keeps_saved_edits() {
    let cache = TableCache::new();
    let key = cache.put("first.csv", b"x\n1\n2\n", table(&[1, 2]));
    cache.set(&key, table(&[1, 2, 3]));

    let again = cache.put("second.csv", b"x\n1\n2\n", table(&[1, 2]));
    assert_eq!(again, key);
    assert_eq!(cache.get(&key).unwrap().height(), 3);
    assert_eq!(cache.entry(&key).unwrap().name, "first.csv");
    assert_eq!(cache.list().len(), 1);
}

#[test]
fn readers_keep_their_snapshot() {
    let cache = TableCache::new();
    let key = cache.put("f.csv", b"x\n1\n", table(&[1]));
    let snapshot = cache.get(&key).unwrap();
    cache.set(&key, table(&[1, 2, 3]));
    assert_eq!(snapshot.height(), 1);
}

#[test]
fn concurrent_writers_on_distinct_keys() {
    let cache = Arc::new(TableCache::new());
    std::thread::scope(|scope| {
        for i in 0..8u8 {
            let cache = Arc::clone(&cache);
            scope.spawn(move || {
                cache.put(&format!("{i}.csv"), &[i], table(&[i64::from(i)]));
            });
        }
    });
    assert_eq!(cache.len(), 8);
}

#[test]
fn miss_names_the_key() {
    let cache = TableCache::new();
    let err = cache.get(&CacheKey::from("deadbeef")).unwrap_err();
    assert!(matches!(err, CacheError::Miss { .. }));
    assert!(err.to_string().contains("deadbeef"));
}

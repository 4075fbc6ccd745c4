//! SharedLongHashMap: a cloneable single-threaded handle to one table.
//!
//! Registries hand the same table to several owners and to callbacks that
//! may insert while the table is being walked. Values are stored as `Rc<V>`
//! so `for_each` can release its borrow before invoking the visitor; a
//! visitor that inserts a new key is then detected through the
//! modification count and the walk stops with `ConcurrentModificationError`.
//!
//! `!Send`/`!Sync` through `Rc`; callers sharing a table across threads
//! need their own lock around a plain `LongHashMap`.

use crate::config::TableConfig;
use crate::error::{ConcurrentModificationError, ConfigError};
use crate::long_hash_map::{LongHashMap, TableStats};
use core::cell::RefCell;
use std::rc::Rc;

pub struct SharedLongHashMap<V> {
    inner: Rc<RefCell<LongHashMap<Rc<V>>>>,
}

impl<V> SharedLongHashMap<V> {
    pub fn new() -> Self {
        Self::from_map(LongHashMap::new())
    }

    pub fn with_config(config: TableConfig) -> Result<Self, ConfigError> {
        LongHashMap::with_config(config).map(Self::from_map)
    }

    fn from_map(map: LongHashMap<Rc<V>>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(map)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn contains_key(&self, key: i64) -> bool {
        self.inner.borrow().contains_key(key)
    }

    /// Inserts or replaces; returns the previous value.
    ///
    /// # Panics
    ///
    /// Panics under the same full-table condition as `LongHashMap::put`.
    pub fn put(&self, key: i64, value: V) -> Option<Rc<V>> {
        self.inner.borrow_mut().put(key, Rc::new(value))
    }

    pub fn get(&self, key: i64) -> Option<Rc<V>> {
        self.inner.borrow().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<i64> {
        self.inner.borrow().keys()
    }

    /// Snapshot of the current values.
    pub fn values(&self) -> Vec<Rc<V>> {
        self.inner.borrow().values().cloned().collect()
    }

    pub fn stats(&self) -> TableStats {
        self.inner.borrow().stats()
    }

    /// Visits every entry in slot order; the visitor may call back into this
    /// table.
    ///
    /// The modification count is captured up front and rechecked after each
    /// visit. Once it has moved, the walk stops and the error is returned;
    /// entries already visited stay visited and the table stays usable.
    pub fn for_each<F>(&self, mut visitor: F) -> Result<(), ConcurrentModificationError>
    where
        F: FnMut(i64, &V),
    {
        let (snapshot, capacity) = {
            let map = self.inner.borrow();
            (map.mod_count().snapshot(), map.capacity())
        };
        for idx in 0..capacity {
            let entry = self
                .inner
                .borrow()
                .entry_at(idx)
                .map(|(key, value)| (key, Rc::clone(value)));
            if let Some((key, value)) = entry {
                visitor(key, &value);
                snapshot.check(self.inner.borrow().mod_count())?;
            }
        }
        snapshot.check(self.inner.borrow().mod_count())
    }
}

impl<V> Clone for SharedLongHashMap<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V> Default for SharedLongHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

//! Key → position lookups over a loaded collection.
//!
//! An `Index` stores positions, not references, so a store can keep it next
//! to its items and refresh it only when the collection changes.

use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{Identified, RecordId};

/// When several items share a key the first one in collection order wins.
#[derive(Debug, Clone)]
pub struct Index<K> {
    positions: HashMap<K, usize>,
}

impl<K> Default for Index<K> {
    fn default() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> Index<K> {
    pub fn build<T>(items: &[T], key: impl Fn(&T) -> Option<K>) -> Self {
        let mut index = Self {
            positions: HashMap::with_capacity(items.len()),
        };
        for (pos, item) in items.iter().enumerate() {
            if let Some(k) = key(item) {
                index.insert(k, pos);
            }
        }
        index
    }

    /// Records `pos` for `key` unless the key is already taken.
    pub fn insert(&mut self, key: K, pos: usize) {
        self.positions.entry(key).or_insert(pos);
    }

    pub fn position(&self, key: &K) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Resolves `key` against the slice the index was built from.
    pub fn lookup<'a, T>(&self, items: &'a [T], key: &K) -> Option<&'a T> {
        self.position(key).and_then(|pos| items.get(pos))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Index<RecordId> {
    pub fn by_id<T: Identified>(items: &[T]) -> Self {
        Self::build(items, |item| Some(item.id()))
    }
}

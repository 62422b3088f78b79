//! Slot storage for the cell-keyed and index-keyed containers.

use std::marker::PhantomData;

/// A typed `u32` slot number.
pub trait ArenaKey: Copy + Eq + std::hash::Hash + std::fmt::Debug {
    fn new(index: u32) -> Self;
    fn index(self) -> u32;
}

/// Define a slot number type (a newtype over `u32`).
///
/// ```ignore
/// define_key!(CellId);
/// ```
#[macro_export]
macro_rules! define_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, serde::Serialize)]
        pub struct $name(u32);

        impl $crate::arena::ArenaKey for $name {
            fn new(index: u32) -> Self {
                Self(index)
            }
            fn index(self) -> u32 {
                self.0
            }
        }
    };
}

/// Records owned by slot. Slots are never freed, so a record that is
/// overwritten by a later file stays where the first one was.
#[derive(Debug, Clone)]
pub struct Arena<K: ArenaKey, V> {
    slots: Vec<V>,
    _key: PhantomData<K>,
}

impl<K: ArenaKey, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ArenaKey, V> Arena<K, V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            _key: PhantomData,
        }
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.slots.get(key.index() as usize)
    }

    /// Overwrite the record in `key`, or take a fresh slot when `key` is
    /// `None` or out of range.
    pub fn put(&mut self, key: Option<K>, value: V) -> K {
        if let Some(k) = key {
            if let Some(slot) = self.slots.get_mut(k.index() as usize) {
                *slot = value;
                return k;
            }
        }
        let fresh = K::new(self.slots.len() as u32);
        self.slots.push(value);
        fresh
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Records in slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.slots.iter()
    }

    pub fn into_values(self) -> impl Iterator<Item = V> {
        self.slots.into_iter()
    }
}

impl<K: ArenaKey, V> std::ops::Index<K> for Arena<K, V> {
    type Output = V;
    fn index(&self, key: K) -> &V {
        &self.slots[key.index() as usize]
    }
}

/// Records by small integer key, with room for the highest key seen.
#[derive(Debug, Clone)]
pub struct SparseMap<K: ArenaKey, V> {
    slots: Vec<Option<V>>,
    _key: PhantomData<K>,
}

impl<K: ArenaKey, V> Default for SparseMap<K, V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            _key: PhantomData,
        }
    }
}

impl<K: ArenaKey, V> SparseMap<K, V> {
    /// Insert, returning the value previously at `key`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let idx = key.index() as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx].replace(value)
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.slots.get(key.index() as usize)?.as_ref()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupied slots in key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, v)| Some((K::new(i as u32), v.as_ref()?)))
    }

    pub fn into_entries(self) -> impl Iterator<Item = (K, V)> {
        self.slots
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| Some((K::new(i as u32), v?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    define_key!(TestId);

    #[test]
    fn overwriting_keeps_the_slot() {
        let mut arena: Arena<TestId, &str> = Arena::new();
        let a = arena.put(None, "a");
        let b = arena.put(Some(a), "b");
        assert_eq!(a, b);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena[a], "b");

        let c = arena.put(None, "c");
        assert_ne!(a, c);
        assert_eq!(arena.values().copied().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn sparse_map_grows_on_demand() {
        let mut map: SparseMap<TestId, i32> = SparseMap::default();
        assert!(map.is_empty());
        assert_eq!(map.insert(TestId::new(7), 70), None);
        assert_eq!(map.insert(TestId::new(2), 20), None);
        assert_eq!(map.insert(TestId::new(7), 71), Some(70));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(TestId::new(3)), None);
        assert_eq!(map.get(TestId::new(100)), None);

        let keys: Vec<u32> = map.iter().map(|(k, _)| k.index()).collect();
        assert_eq!(keys, vec![2, 7]);
        let owned: Vec<(u32, i32)> = map.into_entries().map(|(k, v)| (k.index(), v)).collect();
        assert_eq!(owned, vec![(2, 20), (7, 71)]);
    }
}

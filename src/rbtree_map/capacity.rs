use super::RBTreeMap;
use crate::raw::RawRBTreeMap;

impl<K, V> RBTreeMap<K, V> {
    /// Creates an empty map whose node and value arenas hold at least `capacity`
    /// entries before reallocating.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeMap {
            raw: RawRBTreeMap::with_capacity(capacity),
        }
    }

    /// Returns how many entries the map can hold before either arena reallocates.
    ///
    /// Clearing the map keeps this capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_capacity(8);
    /// map.insert(1, 1);
    /// map.clear();
    /// assert!(map.capacity() >= 8);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}

use core::borrow::Borrow;
use core::cell::Cell;
use core::cmp::Ordering;
use core::fmt;

use super::{Iter, RBTreeMap};
use crate::raw::Handle;
use crate::tracing_helpers::trace_log;

/// A [`RBTreeMap`] that remembers the node its last lookup landed on.
///
/// Repeated lookups of the same key are answered from that one-entry memo without
/// walking the tree. A lookup of any other key misses, searches normally and
/// replaces the memo, so a stale memo is never wrong, only useless.
///
/// Lookups take `&self` and update the memo through a [`Cell`]. That makes this
/// type `!Sync`: it can be moved to another thread but never read from two
/// threads at once. Use a plain [`RBTreeMap`] when shared concurrent reads are
/// needed.
///
/// # Examples
///
/// ```
/// use rbt_map::CachedRBTreeMap;
///
/// let mut config = CachedRBTreeMap::new();
/// config.insert("width", 640);
/// config.insert("height", 480);
///
/// for _ in 0..3 {
///     assert_eq!(config.get("height"), Some(&480));
/// }
/// // `insert` left the memo on "height", so every lookup above was a hit.
/// assert_eq!((config.hits(), config.misses()), (3, 0));
/// ```
pub struct CachedRBTreeMap<K, V> {
    map: RBTreeMap<K, V>,
    memo: Cell<Option<Handle>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<K, V> CachedRBTreeMap<K, V> {
    /// Makes a new, empty `CachedRBTreeMap`.
    #[must_use]
    pub const fn new() -> Self {
        Self::from_map(RBTreeMap::new())
    }

    const fn from_map(map: RBTreeMap<K, V>) -> Self {
        Self {
            map,
            memo: Cell::new(None),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Returns the underlying map for read-only use.
    #[must_use]
    pub const fn as_map(&self) -> &RBTreeMap<K, V> {
        &self.map
    }

    /// Drops the memo and returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> RBTreeMap<K, V> {
        self.map
    }

    /// Number of lookups answered from the memo.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    /// Number of lookups that had to search the tree.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.get()
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the map and the memo.
    pub fn clear(&mut self) {
        self.memo.set(None);
        self.map.clear();
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.map.iter()
    }
}

impl<K: Ord, V> CachedRBTreeMap<K, V> {
    fn lookup<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        // The memo only ever holds a live handle: removals and clears drop it.
        if let Some(handle) = self.memo.get()
            && key.cmp(self.map.raw.key(handle).borrow()) == Ordering::Equal
        {
            trace_log!(?handle, "search memo hit");
            self.hits.set(self.hits.get() + 1);
            return Some(handle);
        }

        trace_log!("search memo miss");
        self.misses.set(self.misses.get() + 1);
        let found = self.map.raw.search(key);
        self.memo.set(found);
        found
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::CachedRBTreeMap;
    ///
    /// let mut map = CachedRBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.lookup(key).map(|h| self.map.raw.value(h))
    }

    /// Returns the key-value pair corresponding to the supplied key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.lookup(key).map(|h| self.map.raw.key_value(h))
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.lookup(key).is_some()
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.lookup(key)?;
        Some(self.map.raw.value_mut(handle))
    }

    /// Inserts `value` under `key` unless the key is already present, and
    /// remembers the resulting node. See [`RBTreeMap::insert`].
    pub fn insert(&mut self, key: K, value: V) -> (&mut V, bool) {
        self.insert_with(key, || value)
    }

    /// See [`RBTreeMap::insert_with`].
    pub fn insert_with<F>(&mut self, key: K, make: F) -> (&mut V, bool)
    where
        F: FnOnce() -> V,
    {
        let (handle, found) = self.map.raw.insert_with(key, make);
        self.memo.set(Some(handle));
        (self.map.raw.value_mut(handle), found)
    }

    /// See [`RBTreeMap::get_or_insert_default`].
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.insert_with(key, V::default).0
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the key
    /// was previously in the map.
    ///
    /// Removal searches the tree directly and does not count as a lookup. The memo
    /// survives unless it named the removed entry.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.map.raw.search(key)?;
        // Other handles survive the successor swap; only the removed one dies.
        if self.memo.get() == Some(handle) {
            self.memo.set(None);
        }
        Some(self.map.raw.remove_node(handle))
    }
}

impl<K, V> Default for CachedRBTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<RBTreeMap<K, V>> for CachedRBTreeMap<K, V> {
    fn from(map: RBTreeMap<K, V>) -> Self {
        Self::from_map(map)
    }
}

impl<K: Clone, V: Clone> Clone for CachedRBTreeMap<K, V> {
    /// Clones the map; the clone starts with an empty memo and zeroed counters.
    fn clone(&self) -> Self {
        Self::from_map(self.map.clone())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CachedRBTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedRBTreeMap")
            .field("map", &self.map)
            .field("hits", &self.hits.get())
            .field("misses", &self.misses.get())
            .finish()
    }
}

impl<'a, K, V> IntoIterator for &'a CachedRBTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

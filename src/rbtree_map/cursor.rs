use super::RBTreeMap;
use crate::error::CursorError;
use crate::raw::Handle;

/// A position in a [`RBTreeMap`] that does not borrow the map.
///
/// A cursor starts at the smallest key ([`RBTreeMap::cursor_front`]) and moves
/// forward one in-order successor at a time until it reaches the end. It cannot be
/// rewound; ask the map for a new cursor to start over.
///
/// Because the cursor holds no borrow, the map can be modified while it exists.
/// Any insert of a new key, any removal and any clear invalidates every cursor
/// created before it: [`get`](Cursor::get) and [`advance`](Cursor::advance) then
/// return [`CursorError::Invalidated`] instead of following links that may have
/// been rewired. Reading or writing values in place (for example through
/// [`RBTreeMap::get_mut`]) and inserting a key that is already present do not
/// invalidate cursors.
///
/// A cursor must only be used with the map that created it; see the panic notes
/// on [`get`](Cursor::get).
///
/// # Examples
///
/// ```
/// use rbt_map::{CursorError, RBTreeMap};
///
/// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
///
/// let mut cursor = map.cursor_front();
/// assert_eq!(cursor.get(&map), Ok(Some((&1, &"a"))));
/// cursor.advance(&map).unwrap();
/// assert_eq!(cursor.get(&map), Ok(Some((&2, &"b"))));
///
/// map.remove(&1);
/// assert!(matches!(cursor.get(&map), Err(CursorError::Invalidated { .. })));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cursor {
    current: Option<Handle>,
    stamp: u64,
}

impl<K, V> RBTreeMap<K, V> {
    /// Returns a cursor at the entry with the smallest key, or at the end if the
    /// map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::new();
    /// assert!(map.cursor_front().is_end());
    /// ```
    #[must_use]
    pub fn cursor_front(&self) -> Cursor {
        Cursor {
            current: self.raw.first(),
            stamp: self.raw.stamp(),
        }
    }
}

impl Cursor {
    /// Returns `true` once the cursor has moved past the last entry.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the entry under the cursor, or `None` at the end.
    ///
    /// # Errors
    ///
    /// [`CursorError::Invalidated`] if `map` was structurally modified after the
    /// cursor was created.
    ///
    /// # Panics
    ///
    /// May panic if `map` is not the map that created the cursor. Such a map can
    /// carry the same modification count, in which case the cursor's position is
    /// looked up in the wrong arena; if the slot happens to be live, an unrelated
    /// entry is returned instead.
    pub fn get<'a, K, V>(&self, map: &'a RBTreeMap<K, V>) -> Result<Option<(&'a K, &'a V)>, CursorError> {
        self.check(map)?;
        Ok(self.current.map(|h| map.raw.key_value(h)))
    }

    /// Moves to the next entry in key order.
    ///
    /// # Errors
    ///
    /// [`CursorError::Invalidated`] if `map` was structurally modified after the
    /// cursor was created, [`CursorError::Exhausted`] if the cursor is already at
    /// the end.
    ///
    /// # Panics
    ///
    /// May panic if `map` is not the map that created the cursor. Such a map can
    /// carry the same modification count, in which case the cursor's position is
    /// looked up in the wrong arena; if the slot happens to be live, an unrelated
    /// entry is returned instead.
    pub fn advance<K, V>(&mut self, map: &RBTreeMap<K, V>) -> Result<(), CursorError> {
        self.check(map)?;
        let current = self.current.ok_or(CursorError::Exhausted)?;
        self.current = map.raw.successor(current);
        Ok(())
    }

    fn check<K, V>(&self, map: &RBTreeMap<K, V>) -> Result<(), CursorError> {
        let current = map.raw.stamp();
        if current == self.stamp {
            Ok(())
        } else {
            Err(CursorError::Invalidated {
                created: self.stamp,
                current,
            })
        }
    }
}

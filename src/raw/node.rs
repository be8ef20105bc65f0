use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child link of a parent a position hangs off.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A tree element. Links are arena handles; the value lives in a separate arena.
///
/// Rotations and successor swaps rewrite links and colors only. `key` and `value`
/// never move once the node is allocated.
#[derive(Clone)]
pub(crate) struct Node<K> {
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) color: Color,
    key: K,
    value: Handle,
}

impl<K> Node<K> {
    /// A fresh red node with no links.
    pub(crate) fn new(key: K, value: Handle, parent: Option<Handle>) -> Self {
        Self {
            parent,
            left: None,
            right: None,
            color: Color::Red,
            key,
            value,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> Handle {
        self.value
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub(crate) fn into_parts(self) -> (K, Handle) {
        (self.key, self.value)
    }
}

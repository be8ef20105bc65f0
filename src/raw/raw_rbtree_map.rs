use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};
use crate::tracing_helpers::trace_log;

/// The red-black tree backing `RBTreeMap`.
///
/// Nodes and values live in two arenas; a node refers to its value by handle.
/// Every public operation leaves the tree satisfying:
///
/// 1. in-order keys strictly ascend;
/// 2. the root, if any, is black;
/// 3. no red node has a red child;
/// 4. every path from a node down to an empty child slot crosses the same number
///    of black nodes.
#[derive(Clone)]
pub(crate) struct RawRBTreeMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values.
    values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of key-value pairs in the tree.
    len: usize,
    /// Bumped by every structural mutation; detached cursors compare against it.
    stamp: u64,
}

impl<K, V> RawRBTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
            stamp: 0,
        }
    }

    /// Creates a new tree with room for `capacity` entries before either arena grows.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            stamp: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity().min(self.nodes.capacity())
    }

    pub(crate) const fn stamp(&self) -> u64 {
        self.stamp
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    pub(crate) fn key(&self, handle: Handle) -> &K {
        self.nodes.get(handle).key()
    }

    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(self.nodes.get(handle).value())
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        let value = self.nodes.get(handle).value();
        self.values.get_mut(value)
    }

    pub(crate) fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (node.key(), self.values.get(node.value()))
    }

    /// Drops every node and value in one arena reset.
    pub(crate) fn clear(&mut self) {
        self.nodes.reset();
        self.values.reset();
        self.root = None;
        self.len = 0;
        self.bump_stamp();
    }

    fn bump_stamp(&mut self) {
        self.stamp = self.stamp.wrapping_add(1);
    }

    /// Smallest node of the whole tree.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.leftmost(root))
    }

    /// Largest node of the whole tree.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.rightmost(root))
    }

    fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.node(handle).left {
            handle = left;
        }
        handle
    }

    fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.node(handle).right {
            handle = right;
        }
        handle
    }

    /// In-order successor, found by parent back-links rather than a stack.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.node(handle).right {
            return Some(self.leftmost(right));
        }

        // Climb while we are a right child; the first ancestor entered from the
        // left is the successor.
        let mut current = handle;
        while let Some(parent) = self.node(current).parent {
            if self.node(parent).left == Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// Moves every entry out in key order and leaves the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut order = Vec::with_capacity(self.len);
        let mut current = self.first();
        while let Some(handle) = current {
            order.push(handle);
            current = self.successor(handle);
        }

        let mut result = Vec::with_capacity(order.len());
        for handle in order {
            let (key, value) = self.nodes.take(handle).into_parts();
            result.push((key, self.values.take(value)));
        }

        self.clear();
        result
    }

    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|h| self.node(h).is_red())
    }

    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).color = color;
    }

    fn side_of(&self, parent: Handle, child: Handle) -> Side {
        if self.node(parent).left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(
                self.node(parent).right,
                Some(child),
                "`RawRBTreeMap::side_of()` - `child` is not linked under `parent`!"
            );
            Side::Right
        }
    }

    /// Points whatever referenced `old` (its parent's child link, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            Some(parent) => {
                let side = self.side_of(parent, old);
                self.node_mut(parent).set_child(side, new);
            }
            None => self.root = new,
        }
    }

    /// Rotates `pivot` down towards `dir`; its child on the opposite side takes its place.
    ///
    /// `rotate(x, Side::Left)` is the classic left rotation.
    fn rotate(&mut self, pivot: Handle, dir: Side) {
        let up = self
            .node(pivot)
            .child(dir.opposite())
            .expect("`RawRBTreeMap::rotate()` - rotating around a missing child!");

        let inner = self.node(up).child(dir);
        self.node_mut(pivot).set_child(dir.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(pivot);
        }

        let parent = self.node(pivot).parent;
        self.node_mut(up).parent = parent;
        if parent.is_none() {
            trace_log!(new_root = ?up, "rotation replaced the root");
        }
        self.replace_child(parent, pivot, Some(up));

        self.node_mut(up).set_child(dir, Some(pivot));
        self.node_mut(pivot).parent = Some(up);
    }

    /// Exchanges the tree positions (links and colors) of `a` and `b`.
    ///
    /// Keys and values stay in their nodes, so a handle keeps naming the same entry
    /// while its place in the tree changes.
    fn swap_positions(&mut self, a: Handle, b: Handle) {
        let swap = |link: Option<Handle>| {
            link.map(|h| {
                if h == a {
                    b
                } else if h == b {
                    a
                } else {
                    h
                }
            })
        };

        let (a_parent, a_left, a_right, a_color) = {
            let n = self.node(a);
            (n.parent, n.left, n.right, n.color)
        };
        let (b_parent, b_left, b_right, b_color) = {
            let n = self.node(b);
            (n.parent, n.left, n.right, n.color)
        };

        // Every other node touching either position sees `a` and `b` trade places.
        // A shared parent shows up once and gets both of its links swapped together.
        let mut neighbours: SmallVec<[Handle; 6]> = SmallVec::new();
        for h in [a_parent, a_left, a_right, b_parent, b_left, b_right].into_iter().flatten() {
            if h != a && h != b && !neighbours.contains(&h) {
                neighbours.push(h);
            }
        }
        for h in neighbours {
            let n = self.node_mut(h);
            n.parent = swap(n.parent);
            n.left = swap(n.left);
            n.right = swap(n.right);
        }

        let n = self.node_mut(a);
        n.parent = swap(b_parent);
        n.left = swap(b_left);
        n.right = swap(b_right);
        n.color = b_color;

        let n = self.node_mut(b);
        n.parent = swap(a_parent);
        n.left = swap(a_left);
        n.right = swap(a_right);
        n.color = a_color;

        self.root = swap(self.root);
        trace_log!(?a, ?b, "swapped node positions");
    }

    /// Restores the red-black properties after `node` was linked in as a red leaf.
    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(parent) = self.node(node).parent
            && self.node(parent).is_red()
        {
            // The root is black, so a red parent always has a parent of its own.
            let grand = self
                .node(parent)
                .parent
                .expect("`RawRBTreeMap::insert_fixup()` - red node has no parent!");
            let side = self.side_of(grand, parent);
            let uncle = self.node(grand).child(side.opposite());

            if let Some(uncle) = uncle
                && self.node(uncle).is_red()
            {
                trace_log!(?node, "insert fixup: red uncle, recolor");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand, Color::Red);
                node = grand;
                continue;
            }

            if self.side_of(parent, node) != side {
                trace_log!(?node, "insert fixup: inner grandchild, rotate parent");
                node = parent;
                self.rotate(node, side);
            }

            trace_log!(?node, "insert fixup: outer grandchild, rotate grandparent");
            let parent = self.node(node).parent.expect("`RawRBTreeMap::insert_fixup()` - lost parent!");
            let grand = self.node(parent).parent.expect("`RawRBTreeMap::insert_fixup()` - lost grandparent!");
            self.set_color(parent, Color::Black);
            self.set_color(grand, Color::Red);
            self.rotate(grand, side.opposite());
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Restores black-height after a black node left the tree.
    ///
    /// The deficit sits at child slot `side` of `parent`. `node` is whatever occupies
    /// that slot: `None` when a childless node was detached, in which case the
    /// empty slot itself plays the double-black node until the deficit moves up.
    fn delete_fixup(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>, mut side: Side) {
        while let Some(p) = parent {
            if self.is_red(node) {
                break;
            }

            let far = side.opposite();
            let mut sibling = self
                .node(p)
                .child(far)
                .expect("`RawRBTreeMap::delete_fixup()` - double-black slot has no sibling!");

            if self.node(sibling).is_red() {
                trace_log!(?p, "delete fixup: red sibling");
                self.set_color(sibling, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                sibling = self.node(p).child(far).expect("`RawRBTreeMap::delete_fixup()` - lost sibling!");
            }

            let near_nephew = self.node(sibling).child(side);
            let far_nephew = self.node(sibling).child(far);

            if !self.is_red(near_nephew) && !self.is_red(far_nephew) {
                trace_log!(?p, "delete fixup: black nephews, push deficit up");
                self.set_color(sibling, Color::Red);
                node = Some(p);
                parent = self.node(p).parent;
                if let Some(grand) = parent {
                    side = self.side_of(grand, p);
                }
                continue;
            }

            if !self.is_red(far_nephew) {
                trace_log!(?p, "delete fixup: red near nephew, rotate sibling");
                let near = near_nephew.expect("`RawRBTreeMap::delete_fixup()` - red nephew is missing!");
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, far);
                sibling = self.node(p).child(far).expect("`RawRBTreeMap::delete_fixup()` - lost sibling!");
            }

            trace_log!(?p, "delete fixup: red far nephew, rotate parent");
            let parent_color = self.node(p).color;
            self.set_color(sibling, parent_color);
            self.set_color(p, Color::Black);
            let far_nephew =
                self.node(sibling).child(far).expect("`RawRBTreeMap::delete_fixup()` - red nephew is missing!");
            self.set_color(far_nephew, Color::Black);
            self.rotate(p, side);

            node = self.root;
            parent = None;
        }

        if let Some(node) = node {
            self.set_color(node, Color::Black);
        }
    }

    /// Unlinks `target` and returns its key and value.
    pub(crate) fn remove_node(&mut self, target: Handle) -> (K, V) {
        let (left, right) = {
            let n = self.node(target);
            (n.left, n.right)
        };

        // With two children, trade places with the in-order successor; the
        // successor has no left child, so `target` ends up with at most one child.
        if let (Some(_), Some(right)) = (left, right) {
            let successor = self.leftmost(right);
            self.swap_positions(target, successor);
        }

        let (parent, child, removed_black) = {
            let n = self.node(target);
            debug_assert!(
                n.left.is_none() || n.right.is_none(),
                "`RawRBTreeMap::remove_node()` - target still has two children!"
            );
            (n.parent, n.left.or(n.right), !n.is_red())
        };
        let side = parent.map_or(Side::Left, |p| self.side_of(p, target));

        match child {
            Some(child) => {
                self.node_mut(child).parent = parent;
                self.replace_child(parent, target, Some(child));
                // A lone child under a black node is red in any valid tree, and
                // repainting it black restores the lost black node. The general
                // fixup keeps this correct should that ever not hold.
                if removed_black {
                    if self.node(child).is_red() {
                        self.set_color(child, Color::Black);
                    } else {
                        self.delete_fixup(Some(child), parent, side);
                    }
                }
            }
            None => {
                self.replace_child(parent, target, None);
                // Dropping a red leaf never changes a black count.
                if removed_black && parent.is_some() {
                    self.delete_fixup(None, parent, side);
                }
            }
        }

        self.len -= 1;
        self.bump_stamp();

        let (key, value) = self.nodes.take(target).into_parts();
        (key, self.values.take(value))
    }
}

impl<K: Ord, V> RawRBTreeMap<K, V> {
    /// Finds the node whose key compares equal to `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            current = match key.cmp(node.key().borrow()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Returns the node for `key`, creating it with `make()` if absent.
    ///
    /// The flag is `true` when the key was already present; the existing value is
    /// left untouched and `make` is not called.
    pub(crate) fn insert_with<F>(&mut self, key: K, make: F) -> (Handle, bool)
    where
        F: FnOnce() -> V,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.node(handle);
            side = match key.cmp(node.key()) {
                Ordering::Equal => return (handle, true),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            parent = Some(handle);
            current = node.child(side);
        }

        let value = self.values.alloc(make());
        let handle = self.nodes.alloc(Node::new(key, value, parent));
        match parent {
            Some(parent) => self.node_mut(parent).set_child(side, Some(handle)),
            None => self.root = Some(handle),
        }
        self.len += 1;
        self.bump_stamp();

        self.insert_fixup(handle);
        (handle, false)
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.remove_node(handle))
    }
}

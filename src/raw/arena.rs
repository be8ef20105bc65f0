use alloc::vec::Vec;

use super::handle::Handle;
use crate::tracing_helpers::debug_log;

/// Slot pool backing tree nodes and their values.
///
/// Released slots go onto a free list and are handed out again before the
/// backing vector grows, so a handle is only ever shared by one live element.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of live slots.
    #[cfg(any(test, feature = "tracing"))]
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    #[cfg(test)]
    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            self.slots[h.to_index()] = Some(element);
            return h;
        }

        // After the push the newest slot index must still be <= `Handle::MAX`.
        assert!(
            self.slots.len() <= Handle::MAX,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX + 1
        );
        if self.slots.len() == self.slots.capacity() {
            debug_log!(len = self.slots.len(), "arena growing");
        }
        self.slots.push(Some(element));
        Handle::from_index(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Moves the element out and puts its slot on the free list.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    #[cfg(test)]
    pub(crate) fn release(&mut self, handle: Handle) {
        drop(self.take(handle));
    }

    /// Drops every element at once and invalidates every outstanding handle.
    ///
    /// Capacity is kept so a cleared tree can be refilled without reallocating.
    pub(crate) fn reset(&mut self) {
        debug_log!(live = self.len(), "arena reset");
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn capacity_survives_reset() {
        let mut arena: Arena<u32> = Arena::with_capacity(10);
        for i in 0..10 {
            arena.alloc(i);
        }
        arena.reset();
        assert!(arena.is_empty());
        assert!(arena.capacity() >= 10);
    }

    #[test]
    fn released_slot_is_reused() {
        let mut arena: Arena<&str> = Arena::new();
        let a = arena.alloc("a");
        let _b = arena.alloc("b");
        arena.release(a);
        let c = arena.alloc("c");
        assert_eq!(a, c);
        assert_eq!(*arena.get(c), "c");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn get_after_release_panics() {
        let mut arena: Arena<u8> = Arena::new();
        let h = arena.alloc(1);
        arena.release(h);
        let _ = arena.get(h);
    }

    #[test]
    #[should_panic(expected = "`Arena::take()` - `handle` is invalid!")]
    fn double_release_panics() {
        let mut arena: Arena<u8> = Arena::new();
        let h = arena.alloc(1);
        arena.release(h);
        arena.release(h);
    }

    #[test]
    #[should_panic(expected = "`Arena::alloc()` - arena is at maximum capacity")]
    fn exhaustion_is_fatal() {
        // Test builds use 16-bit handles.
        let mut arena: Arena<()> = Arena::new();
        for _ in 0..=Handle::MAX + 1 {
            arena.alloc(());
        }
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.alloc(value);
                        prop_assert!(model.iter().all(|&(h, _)| h != handle), "alloc aliased a live slot");
                        model.push((handle, value));
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        *arena.get_mut(model[index].0) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let taken = arena.take(model[index].0);
                        let (_, expected) = model.swap_remove(index);
                        prop_assert_eq!(taken, expected);
                    }
                    Operation::Release(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        arena.release(model[index].0);
                        model.swap_remove(index);
                    }
                    Operation::Reset => {
                        arena.reset();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());
                prop_assert_eq!(arena.is_empty(), model.is_empty());

                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        GetMut(usize, u32),
        Take(usize),
        Release(usize),
        Reset,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            5 => any::<usize>().prop_map(Operation::Take),
            5 => any::<usize>().prop_map(Operation::Release),
            1 => Just(Operation::Reset),
        ]
    }
}

//! Dense storage: one slot per entity index.

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use ecs_bitset::BitSet;

use super::{Component, TypedStorage};
use crate::entity::EntityIndex;

/// Component storage backed by a vector indexed by entity index.
///
/// Best for components most entities carry: access is a bounds check and an
/// offset, at the cost of one slot per index up to the highest one stored.
pub struct VectorStorage<C: Component> {
    /// Component slots; `Some` exactly where the mask bit is set.
    data: Vec<Option<C>>,
    /// Containment mask.
    mask: BitSet,
}

impl<C: Component> Default for VectorStorage<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> VectorStorage<C> {
    /// Create an empty storage.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            mask: BitSet::new(),
        }
    }

    /// Create a storage with room for entity indices below `capacity`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            mask: BitSet::with_capacity(capacity),
        }
    }

    /// Drop every stored component.
    pub fn clear(&mut self) {
        self.data.clear();
        self.mask.clear();
    }
}

impl<C: Component> TypedStorage for VectorStorage<C> {
    type Component = C;

    fn mask(&self) -> &BitSet {
        &self.mask
    }

    fn insert(&mut self, index: EntityIndex, component: C) -> &mut C {
        let slot = index as usize;
        if slot >= self.data.len() {
            self.data.resize_with(slot + 1, || None);
        }
        self.mask.insert(slot);
        self.data[slot].insert(component)
    }

    fn remove(&mut self, index: EntityIndex) -> Option<C> {
        let slot = index as usize;
        if !self.mask.remove(slot) {
            return None;
        }
        self.data[slot].take()
    }

    /// # Panics
    ///
    /// Panics if no component is stored at `index`.
    fn fetch(&self, index: EntityIndex) -> &C {
        match self.data.get(index as usize) {
            Some(Some(component)) => component,
            _ => panic!(
                "entity index {index} has no {} component",
                std::any::type_name::<C>()
            ),
        }
    }

    /// # Panics
    ///
    /// Panics if no component is stored at `index`.
    fn fetch_mut(&mut self, index: EntityIndex) -> &mut C {
        match self.data.get_mut(index as usize) {
            Some(Some(component)) => component,
            _ => panic!(
                "entity index {index} has no {} component",
                std::any::type_name::<C>()
            ),
        }
    }
}

impl<C: Component> Index<EntityIndex> for VectorStorage<C> {
    type Output = C;

    fn index(&self, index: EntityIndex) -> &C {
        self.fetch(index)
    }
}

impl<C: Component> IndexMut<EntityIndex> for VectorStorage<C> {
    fn index_mut(&mut self, index: EntityIndex) -> &mut C {
        self.fetch_mut(index)
    }
}

impl<C: Component + fmt::Debug> fmt::Debug for VectorStorage<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    #[derive(Debug, Clone, PartialEq)]
    struct Health(u32);

    #[test]
    fn test_insert_then_at() {
        let mut storage = VectorStorage::new();
        storage.insert(4, Health(10));

        assert!(storage.contains(4));
        assert_eq!(storage.at(4), Ok(&Health(10)));
        assert_eq!(storage[4], Health(10));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut storage = VectorStorage::new();
        storage.insert(0, Health(1));
        storage.insert(0, Health(2));

        assert_eq!(storage[0], Health(2));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut storage = VectorStorage::new();
        storage.insert(1, Health(7));

        assert_eq!(storage.remove(1), Some(Health(7)));
        assert_eq!(storage.remove(1), None);
        assert_eq!(storage.remove(99), None);
        assert!(!storage.contains(1));
        assert!(storage.at(1).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_index_mut() {
        let mut storage = VectorStorage::new();
        storage.insert(2, Health(5));
        storage[2].0 += 1;
        storage.at_mut(2).unwrap().0 += 1;

        assert_eq!(storage[2], Health(7));
    }

    #[test]
    #[should_panic(expected = "has no")]
    fn test_index_absent_panics() {
        let mut storage = VectorStorage::new();
        storage.insert(3, Health(1));
        let _ = &storage[1];
    }

    #[test]
    fn test_drops_on_remove() {
        use std::sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        };

        struct DropCounter(Arc<AtomicUsize>);

        impl Drop for DropCounter {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        {
            let mut storage = VectorStorage::new();
            storage.insert(0, DropCounter(drops.clone()));
            storage.insert(1, DropCounter(drops.clone()));
            storage.insert(2, DropCounter(drops.clone()));

            drop(storage.remove(1));
            assert_eq!(drops.load(Ordering::SeqCst), 1);

            storage.erase(&[crate::Entity::new(0, crate::Generation::new())]);
            assert_eq!(drops.load(Ordering::SeqCst), 2);
        }
        assert_eq!(drops.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_debug_lists_present_components() {
        let mut storage = VectorStorage::new();
        storage.insert(2, Health(3));
        assert_eq!(format!("{storage:?}"), "{2: Health(3)}");
    }
}

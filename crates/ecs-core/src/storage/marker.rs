//! Mask-only storage for tag components.

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use ecs_bitset::BitSet;

use super::{Component, TypedStorage};
use crate::entity::EntityIndex;

/// Storage for zero-sized marker components.
///
/// Only the containment mask is stored. A zero-sized type has a single
/// value, so every present entity shares it and unchecked access never
/// fails, even for absent entities. Types carrying data are rejected when
/// the storage is constructed; use [`VectorStorage`](super::VectorStorage)
/// for those.
///
/// ```compile_fail
/// use ecs_core::MarkerStorage;
///
/// let scores = MarkerStorage::<u32>::new();
/// ```
pub struct MarkerStorage<C: Component + Default> {
    mask: BitSet,
    value: C,
}

impl<C: Component + Default> Default for MarkerStorage<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component + Default> MarkerStorage<C> {
    #[must_use]
    pub fn new() -> Self {
        const {
            assert!(
                size_of::<C>() == 0,
                "MarkerStorage only holds zero-sized components"
            );
        }
        Self {
            mask: BitSet::new(),
            value: C::default(),
        }
    }

    /// Mark `index` without constructing a value.
    pub fn mark(&mut self, index: EntityIndex) {
        self.mask.insert(index as usize);
    }
}

impl<C: Component + Default> TypedStorage for MarkerStorage<C> {
    type Component = C;

    fn mask(&self) -> &BitSet {
        &self.mask
    }

    fn insert(&mut self, index: EntityIndex, _component: C) -> &mut C {
        self.mark(index);
        &mut self.value
    }

    fn remove(&mut self, index: EntityIndex) -> Option<C> {
        self.mask.remove(index as usize).then(C::default)
    }

    fn fetch(&self, _index: EntityIndex) -> &C {
        &self.value
    }

    fn fetch_mut(&mut self, _index: EntityIndex) -> &mut C {
        &mut self.value
    }
}

impl<C: Component + Default> Index<EntityIndex> for MarkerStorage<C> {
    type Output = C;

    fn index(&self, index: EntityIndex) -> &C {
        self.fetch(index)
    }
}

impl<C: Component + Default> IndexMut<EntityIndex> for MarkerStorage<C> {
    fn index_mut(&mut self, index: EntityIndex) -> &mut C {
        self.fetch_mut(index)
    }
}

impl<C: Component + Default> fmt::Debug for MarkerStorage<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerStorage")
            .field("component", &std::any::type_name::<C>())
            .field("marked", &self.mask.iter_ones().collect::<Vec<_>>())
            .finish()
    }
}

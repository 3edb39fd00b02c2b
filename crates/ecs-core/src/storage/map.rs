//! Associative storage for sparsely-present components.

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use super::{Component, missing};
use crate::{entity::EntityIndex, error::EcsResult};

/// Hash map from entity index to component.
///
/// Suited to components only a few entities carry, where a mask and a dense
/// vector would mostly hold empty slots. Does not implement
/// [`Storage`](super::Storage); wrap it if it must take part in bulk erase.
pub struct MapStorage<C: Component> {
    components: HashMap<EntityIndex, C, FxBuildHasher>,
}

impl<C: Component> Default for MapStorage<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> MapStorage<C> {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: HashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Create a storage with room for `capacity` components.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            components: HashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
        }
    }

    /// Store `component` for `index`.
    ///
    /// No duplicate check: an existing component is overwritten.
    pub fn emplace(&mut self, index: EntityIndex, component: C) -> &mut C {
        self.components.entry(index).insert(component).into_mut()
    }

    /// Drop the component at `index`. Returns whether one was present.
    pub fn erase(&mut self, index: EntityIndex) -> bool {
        self.components.remove(&index).is_some()
    }

    /// Remove and return the component at `index`.
    pub fn remove(&mut self, index: EntityIndex) -> Option<C> {
        self.components.remove(&index)
    }

    /// Whether a component is stored for `index`.
    #[must_use]
    pub fn contains(&self, index: EntityIndex) -> bool {
        self.components.contains_key(&index)
    }

    /// Checked access.
    pub fn at(&self, index: EntityIndex) -> EcsResult<&C> {
        self.components.get(&index).ok_or_else(|| missing::<C>(index))
    }

    /// Checked mutable access.
    pub fn at_mut(&mut self, index: EntityIndex) -> EcsResult<&mut C> {
        self.components
            .get_mut(&index)
            .ok_or_else(|| missing::<C>(index))
    }

    #[must_use]
    pub fn get(&self, index: EntityIndex) -> Option<&C> {
        self.components.get(&index)
    }

    pub fn get_mut(&mut self, index: EntityIndex) -> Option<&mut C> {
        self.components.get_mut(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate over stored components in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityIndex, &C)> {
        self.components.iter().map(|(&index, component)| (index, component))
    }

    pub fn clear(&mut self) {
        self.components.clear();
    }
}

impl<C: Component> Index<EntityIndex> for MapStorage<C> {
    type Output = C;

    /// # Panics
    ///
    /// Panics if no component is stored at `index`; use [`MapStorage::at`]
    /// for the fallible form.
    fn index(&self, index: EntityIndex) -> &C {
        match self.at(index) {
            Ok(component) => component,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<C: Component> IndexMut<EntityIndex> for MapStorage<C> {
    /// # Panics
    ///
    /// Panics if no component is stored at `index`.
    fn index_mut(&mut self, index: EntityIndex) -> &mut C {
        match self.at_mut(index) {
            Ok(component) => component,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<C: Component + fmt::Debug> fmt::Debug for MapStorage<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.components.iter()).finish()
    }
}

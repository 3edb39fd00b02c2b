//! Component storage abstraction.
//!
//! Two layers:
//!
//! - [`Storage`] is the capability interface generic code (a registry, a
//!   serializer) uses without knowing the component type: membership and
//!   bulk erase. It is object safe, so heterogeneous storages can sit behind
//!   `Box<dyn Storage>`.
//! - [`TypedStorage`] is the mask-based base every concrete container builds
//!   on. Implementors supply the containment mask, the single-index
//!   insert/remove primitives and unchecked access; checked access and the
//!   whole [`Storage`] interface come for free.
//!
//! [`MapStorage`] is deliberately outside both layers: it has no mask and is
//! meant for components held by a handful of entities.

mod map;
mod marker;
mod vector;

use ecs_bitset::BitSet;

pub use map::MapStorage;
pub use marker::MarkerStorage;
pub use vector::VectorStorage;

use crate::{
    entity::{Entity, EntityIndex},
    error::{EcsError, EcsResult},
};

/// Marker trait for types that can be stored as components.
///
/// A component is any value type keyed by an entity index.
pub trait Component: Send + Sync + 'static {}

// Blanket implementation for all suitable types
impl<T: Send + Sync + 'static> Component for T {}

/// Minimal operations every component container exposes to generic code.
pub trait Storage {
    /// Whether a component is stored for `index`. Never fails.
    fn contains(&self, index: EntityIndex) -> bool;

    /// Remove the component of every entity in `entities`.
    ///
    /// Entities without a component are skipped silently.
    fn erase(&mut self, entities: &[Entity]);

    /// Number of stored components.
    fn len(&self) -> usize;

    /// Whether the storage holds no component.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type name of the stored component, for diagnostics.
    fn component_name(&self) -> &'static str;
}

/// Mask-based storage of a single component type.
///
/// `contains(index)` is `index < mask.len() && mask[index]`. Implementors
/// must keep the mask bit set exactly while a component is stored.
pub trait TypedStorage {
    /// The stored component type.
    type Component: Component;

    /// Containment mask, one bit per entity index.
    fn mask(&self) -> &BitSet;

    /// Store `component` at `index`, replacing any previous value.
    fn insert(&mut self, index: EntityIndex, component: Self::Component) -> &mut Self::Component;

    /// Remove and return the component at `index`, if any.
    fn remove(&mut self, index: EntityIndex) -> Option<Self::Component>;

    /// Unchecked access.
    ///
    /// The caller guarantees the component is present (checked with
    /// [`Storage::contains`] or known from context). Behaviour for an absent
    /// component is left to the implementor; it may panic or hand back an
    /// unrelated value.
    fn fetch(&self, index: EntityIndex) -> &Self::Component;

    /// Unchecked mutable access. Same contract as [`TypedStorage::fetch`].
    fn fetch_mut(&mut self, index: EntityIndex) -> &mut Self::Component;

    /// Checked access.
    fn at(&self, index: EntityIndex) -> EcsResult<&Self::Component> {
        if !mask_contains(self.mask(), index) {
            return Err(missing::<Self::Component>(index));
        }
        Ok(self.fetch(index))
    }

    /// Checked mutable access.
    fn at_mut(&mut self, index: EntityIndex) -> EcsResult<&mut Self::Component> {
        if !mask_contains(self.mask(), index) {
            return Err(missing::<Self::Component>(index));
        }
        Ok(self.fetch_mut(index))
    }

    /// Like [`TypedStorage::at`], with absence as `None`.
    fn get(&self, index: EntityIndex) -> Option<&Self::Component> {
        self.at(index).ok()
    }

    /// Like [`TypedStorage::at_mut`], with absence as `None`.
    fn get_mut(&mut self, index: EntityIndex) -> Option<&mut Self::Component> {
        self.at_mut(index).ok()
    }

    /// Iterate over stored components in index order.
    fn iter(&self) -> impl Iterator<Item = (EntityIndex, &Self::Component)> {
        self.mask().iter_ones().map(move |i| {
            let index = i as EntityIndex;
            (index, self.fetch(index))
        })
    }
}

impl<S: TypedStorage> Storage for S {
    fn contains(&self, index: EntityIndex) -> bool {
        mask_contains(self.mask(), index)
    }

    fn erase(&mut self, entities: &[Entity]) {
        for entity in entities {
            self.remove(entity.index());
        }
    }

    fn len(&self) -> usize {
        self.mask().count_ones()
    }

    fn component_name(&self) -> &'static str {
        std::any::type_name::<S::Component>()
    }
}

fn mask_contains(mask: &BitSet, index: EntityIndex) -> bool {
    let index = index as usize;
    index < mask.len() && mask.get(index)
}

fn missing<C: Component>(index: EntityIndex) -> EcsError {
    EcsError::MissingComponent {
        index,
        component: std::any::type_name::<C>(),
    }
}

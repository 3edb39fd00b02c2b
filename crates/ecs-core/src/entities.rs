//! Entity registry: slot allocation, generations and liveness.
//!
//! Each slot moves through `Alive(g) -> Dead(g) -> Alive(g + 1) -> ...`.
//! Slots are never removed from the tables; a killed slot keeps its row with
//! an incremented generation and waits on a free list for reuse.
//!
//! The registry does not touch component storages. Whoever owns the storages
//! is expected to [`erase`](crate::Storage::erase) a killed entity from each.

use std::{any::type_name, fmt};

use ecs_bitset::BitSet;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::{
    entity::{Entity, EntityIndex, Generation},
    error::{EcsError, EcsResult},
    storage::{Storage, TypedStorage},
};

/// Registry of entity slots.
///
/// Invariant: `generations.len() == alive.len()`. A handle `(i, g)` is alive
/// iff `i` is allocated, `alive[i]` is set and `generations[i] == g`.
#[derive(Default)]
pub struct Entities {
    /// Current generation of each allocated slot.
    generations: Vec<Generation>,
    /// Liveness of the current occupant of each slot.
    alive: BitSet,
    /// Killed slots ready for reuse, most recent last.
    free_list: Vec<EntityIndex>,
    /// Number of set bits in `alive`.
    alive_count: usize,
}

impl Entities {
    /// Create a registry without any entity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with room for `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            alive: BitSet::with_capacity(capacity),
            free_list: Vec::with_capacity(capacity / 4),
            alive_count: 0,
        }
    }

    /// Create a new entity, alive or not.
    ///
    /// Reuses the most recently killed slot if there is one, otherwise grows
    /// the tables with a slot at generation 0.
    ///
    /// A slot created dead stays reserved to the returned handle. `kill`
    /// refuses it, so it only returns to the free list once it has been made
    /// alive (through [`Builder::build`]) and killed. Calling `create(false)`
    /// without ever doing so grows the tables by one slot per call.
    ///
    /// # Panics
    ///
    /// Panics if every representable entity index is already allocated.
    pub fn create(&mut self, alive: bool) -> Entity {
        let entity = if let Some(index) = self.free_list.pop() {
            let slot = index as usize;
            self.alive.set(slot, alive);
            let entity = Entity::new(index, self.generations[slot]);
            trace!(%entity, alive, "reused entity slot");
            entity
        } else {
            assert!(
                self.generations.len() < EntityIndex::MAX as usize,
                "entity index space exhausted"
            );
            let index = self.generations.len() as EntityIndex;
            self.generations.push(Generation::new());
            self.alive.push(alive);
            let entity = Entity::new(index, Generation::new());
            trace!(%entity, alive, "allocated entity slot");
            entity
        };

        if alive {
            self.alive_count += 1;
        }
        entity
    }

    /// Start building an entity with several components.
    ///
    /// The entity is reserved immediately but only becomes alive on
    /// [`Builder::build`].
    #[must_use]
    pub fn builder(&mut self) -> Builder<'_> {
        let entity = self.create(false);
        Builder {
            parent: self,
            entity,
            state: BuilderState::Staged,
            attached: SmallVec::new(),
        }
    }

    /// Current handle for the slot at `index`, alive or not.
    ///
    /// Returns `None` if the index was never allocated.
    #[must_use]
    pub fn get(&self, index: EntityIndex) -> Option<Entity> {
        self.generations
            .get(index as usize)
            .map(|&generation| Entity::new(index, generation))
    }

    /// Kill an entity.
    ///
    /// Returns `false` without doing anything if the handle is stale or the
    /// entity is not alive. On success every outstanding handle to the slot
    /// becomes invalid. Components are left in their storages.
    pub fn kill(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.alive.set(entity.index() as usize, false);
        self.alive_count -= 1;
        self.recycle(entity);
        debug!(%entity, "killed entity");
        true
    }

    /// Whether `entity` is the live occupant of its slot.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.index() as usize;
        self.generations.get(slot) == Some(&entity.generation()) && self.alive.get(slot)
    }

    /// Number of allocated slots, alive or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    /// Whether no slot was ever allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Number of currently alive entities.
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Iterate over alive entities in index order.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter_ones()
            .map(|slot| Entity::new(slot as EntityIndex, self.generations[slot]))
    }

    /// Bump the generation of a dead slot and queue it for reuse.
    ///
    /// A slot whose generation cannot grow any further is retired instead:
    /// it keeps `Generation::MAX` and is never handed out again.
    fn recycle(&mut self, entity: Entity) {
        let slot = entity.index() as usize;
        if let Some(next) = entity.generation().checked_next() {
            self.generations[slot] = next;
            self.free_list.push(entity.index());
        } else {
            warn!(%entity, "generation counter exhausted, retiring entity slot");
        }
    }

    /// Make a reserved entity alive.
    fn activate(&mut self, entity: Entity) {
        debug_assert!(!self.is_alive(entity));
        self.alive.set(entity.index() as usize, true);
        self.alive_count += 1;
    }
}

impl fmt::Debug for Entities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entities")
            .field("len", &self.len())
            .field("alive", &self.alive_count)
            .field("free", &self.free_list.len())
            .finish()
    }
}

/// Phase of a [`Builder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Components may still be attached.
    Staged,
    /// The entity is alive; the builder is spent.
    Built,
}

/// Two-phase constructor for an entity with several components.
///
/// Components are written straight into the caller's storages with
/// [`Builder::with`]; [`Builder::build`] then makes the entity alive. Both
/// fail once the builder is built.
///
/// Dropping a builder that was never built hands its slot back to the
/// registry when nothing was attached. If components were attached, the slot
/// is retired instead: it stays dead and is never handed out again, so no
/// later entity inherits the leftovers. The builder's
/// [`entity`](Builder::entity) index is what to erase them with.
pub struct Builder<'a> {
    parent: &'a mut Entities,
    entity: Entity,
    state: BuilderState,
    /// Component type names, for diagnostics.
    attached: SmallVec<[&'static str; 4]>,
}

impl Builder<'_> {
    /// Attach a component to the entity being built.
    ///
    /// Fails if the builder was already built or if `storage` already holds a
    /// component for this entity's index.
    pub fn with<S: TypedStorage>(
        &mut self,
        storage: &mut S,
        component: S::Component,
    ) -> EcsResult<&mut Self> {
        self.ensure_staged()?;

        let index = self.entity.index();
        if storage.contains(index) {
            return Err(EcsError::DuplicateComponent {
                entity: self.entity,
                component: type_name::<S::Component>(),
            });
        }

        storage.insert(index, component);
        self.attached.push(type_name::<S::Component>());
        Ok(self)
    }

    /// Attach a default-constructed component.
    pub fn with_default<S>(&mut self, storage: &mut S) -> EcsResult<&mut Self>
    where
        S: TypedStorage,
        S::Component: Default,
    {
        self.with(storage, S::Component::default())
    }

    /// Make the entity alive and return it.
    ///
    /// Fails if called more than once.
    pub fn build(&mut self) -> EcsResult<Entity> {
        self.ensure_staged()?;

        self.parent.activate(self.entity);
        self.state = BuilderState::Built;
        trace!(entity = %self.entity, components = ?self.attached, "built entity");
        Ok(self.entity)
    }

    /// The entity being built.
    #[must_use]
    pub const fn entity(&self) -> Entity {
        self.entity
    }

    #[must_use]
    pub const fn state(&self) -> BuilderState {
        self.state
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.state == BuilderState::Built
    }

    fn ensure_staged(&self) -> EcsResult<()> {
        match self.state {
            BuilderState::Staged => Ok(()),
            BuilderState::Built => Err(EcsError::AlreadyBuilt {
                entity: self.entity,
            }),
        }
    }
}

impl Drop for Builder<'_> {
    fn drop(&mut self) {
        if self.state != BuilderState::Staged {
            return;
        }

        if self.attached.is_empty() {
            debug!(
                entity = %self.entity,
                "builder dropped before build, releasing entity slot"
            );
            self.parent.recycle(self.entity);
        } else {
            warn!(
                entity = %self.entity,
                components = ?self.attached,
                "builder dropped with attached components, retiring entity slot"
            );
        }
    }
}

impl fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("entity", &self.entity)
            .field("state", &self.state)
            .field("attached", &self.attached)
            .finish()
    }
}

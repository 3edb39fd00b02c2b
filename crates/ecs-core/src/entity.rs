//! Entity handles with generational indices.
//!
//! An [`Entity`] is a plain `(index, generation)` pair. The index names a
//! slot in the [`Entities`](crate::Entities) registry and is reused once the
//! slot's occupant dies; the generation tells successive occupants of the
//! same slot apart, so a stale handle can never be mistaken for a newer one.

use std::fmt;

/// Generation counter to detect stale entity references.
/// Incremented each time the occupant of an entity slot dies.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u32);

impl Generation {
    /// The last generation a slot can reach before it is retired.
    pub const MAX: Self = Self(u32::MAX);

    /// Create a new generation (starts at 0).
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Create a generation from a raw counter value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The following generation, or `None` once the counter is exhausted.
    ///
    /// Never wraps: a wrapped counter would let an ancient handle alias a
    /// fresh occupant of the same slot.
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }

    /// Get the raw generation value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Raw slot index of an entity.
pub type EntityIndex = u32;

/// A handle to one logical object.
///
/// Two handles refer to the same object iff both the index and the
/// generation match. Ordering is by index, then generation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    /// Slot in the registry tables.
    index: EntityIndex,
    /// Generation of the slot when this handle was minted.
    generation: Generation,
}

impl Entity {
    /// Create a handle from its parts.
    ///
    /// Handles built by hand are only meaningful to the registry that minted
    /// the same pair; [`Entities::get`](crate::Entities::get) recovers the
    /// current handle for an index.
    #[must_use]
    pub const fn new(index: EntityIndex, generation: Generation) -> Self {
        Self { index, generation }
    }

    /// Get the entity's slot index.
    #[must_use]
    pub const fn index(self) -> EntityIndex {
        self.index
    }

    /// Get the entity's generation.
    #[must_use]
    pub const fn generation(self) -> Generation {
        self.generation
    }

    /// Pack entity into a single u64, generation in the high half.
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.generation.0 as u64) << 32) | (self.index as u64)
    }

    /// Unpack entity from a u64 produced by [`Entity::to_bits`].
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: Generation((bits >> 32) as u32),
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation.0)
    }
}

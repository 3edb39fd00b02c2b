#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_fields_in_debug)]

//! ECS core - entity identity and component storage
//!
//! The two layers every other part of the framework builds on.
//!
//! # Key Concepts
//!
//! - **Entity**: an `(index, generation)` handle. Indices are reused, the
//!   generation keeps a handle from an earlier occupant of the slot from ever
//!   matching a later one
//! - **Entities**: the registry that allocates, recycles and kills handles,
//!   and builds entities with several components through a [`Builder`]
//! - **Storage**: the capability interface (`contains`, bulk `erase`) shared
//!   by every component container
//! - **TypedStorage**: mask-based containers with checked (`at`) and
//!   unchecked (`fetch`, indexing) access
//!
//! # Example
//!
//! ```
//! use ecs_core::prelude::*;
//!
//! # fn main() -> Result<(), ecs_core::EcsError> {
//! let mut entities = Entities::new();
//! let mut health = VectorStorage::new();
//!
//! let mut builder = entities.builder();
//! builder.with(&mut health, 42u32)?;
//! let entity = builder.build()?;
//! drop(builder);
//!
//! assert!(entities.is_alive(entity));
//! assert_eq!(health.at(entity.index())?, &42);
//!
//! // Killing does not touch storages; the owner erases components itself.
//! entities.kill(entity);
//! health.erase(&[entity]);
//! assert!(!health.contains(entity.index()));
//! # Ok(())
//! # }
//! ```
//!
//! # Threading
//!
//! Nothing here locks. One mutator per instance at a time; readers may share
//! `&` access. Scheduling is up to the owner.

mod entities;
mod entity;
mod error;
mod storage;

pub use ecs_bitset::BitSet;
pub use entities::{Builder, BuilderState, Entities};
pub use entity::{Entity, EntityIndex, Generation};
pub use error::{EcsError, EcsResult};
pub use storage::{Component, MapStorage, MarkerStorage, Storage, TypedStorage, VectorStorage};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Builder, Component, EcsError, EcsResult, Entities, Entity, MapStorage, MarkerStorage,
        Storage, TypedStorage, VectorStorage,
    };
}

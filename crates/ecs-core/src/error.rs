//! Error types for entity and storage operations.

use thiserror::Error;

use crate::entity::{Entity, EntityIndex};

/// Errors raised by the builder and by checked storage access.
///
/// Stale handles are not errors: [`Entities::kill`](crate::Entities::kill)
/// and [`Entities::is_alive`](crate::Entities::is_alive) answer `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The builder was already finalized.
    #[error("builder for entity {entity} was already built")]
    AlreadyBuilt { entity: Entity },

    /// The storage already holds a component for the builder's entity.
    #[error("entity {entity} already has a {component} component")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    /// No component is stored at the requested index.
    #[error("entity index {index} has no {component} component")]
    MissingComponent {
        index: EntityIndex,
        component: &'static str,
    },
}

impl EcsError {
    /// Whether the error comes from an invalid operation sequence.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::AlreadyBuilt { .. } | Self::DuplicateComponent { .. }
        )
    }

    /// Whether the error reports a missing component.
    #[must_use]
    pub const fn is_bounds_error(&self) -> bool {
        matches!(self, Self::MissingComponent { .. })
    }
}

/// Result type for entity and storage operations.
pub type EcsResult<T> = Result<T, EcsError>;

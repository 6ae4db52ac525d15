//! ECS error types

use super::Entity;
use thiserror::Error;

/// Errors reported by the strict (`try_*`) registry operations
///
/// The lenient operations never produce these; they return `None`/`false`
/// and leave the decision to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The entity is null, was never created, or has been destroyed
    #[error("invalid entity {0:?}: not alive in this registry")]
    InvalidEntity(Entity),

    /// The entity already holds a component of this type
    #[error("entity {entity:?} already has a {component} component")]
    DuplicateComponent {
        /// Target entity
        entity: Entity,
        /// Component type name
        component: &'static str,
    },

    /// The entity holds no component of this type
    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        /// Target entity
        entity: Entity,
        /// Component type name
        component: &'static str,
    },
}

/// Result alias for ECS operations
pub type EcsResult<T> = Result<T, EcsError>;

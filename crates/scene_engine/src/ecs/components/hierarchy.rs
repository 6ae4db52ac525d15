//! Parent/child links
//!
//! Both directions are stored so the editor can walk down from roots and the
//! gizmo code can walk up to a parent. Keep them consistent through
//! [`crate::ecs::systems::hierarchy`] rather than editing them by hand.

use crate::ecs::{Component, Entity};

/// Link from a child to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent {
    /// Parent entity
    pub entity: Entity,
}

impl Component for Parent {}

/// Ordered list of an entity's children
///
/// Child order is insertion order and is preserved by removals, unlike the
/// dense order of component storages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children {
    /// Child entities
    pub entities: Vec<Entity>,
}

impl Component for Children {}

impl Children {
    /// Whether `entity` is listed
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Append `entity` unless already listed
    pub fn push(&mut self, entity: Entity) {
        if !self.contains(entity) {
            self.entities.push(entity);
        }
    }

    /// Remove `entity`, keeping the order of the rest
    pub fn remove(&mut self, entity: Entity) -> bool {
        match self.entities.iter().position(|&e| e == entity) {
            Some(i) => {
                self.entities.remove(i);
                true
            }
            None => false,
        }
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether there are no children
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

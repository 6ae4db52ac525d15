//! Sparse-set component storage
//!
//! One [`ComponentStorage`] exists per component type. Components sit in a
//! packed `dense` array with a parallel array of owning entities; `sparse`
//! maps an entity index to its dense slot. Removal swaps the last element
//! into the hole, so dense order is NOT stable across removals.
//!
//! Structural changes (`insert`, `remove`, `clear`) are crate-internal: only
//! the [`Registry`](super::Registry) knows which handles are alive. Outside
//! the crate a storage is read, or mutated in place through `get_mut`,
//! `components_mut` and `iter_mut`.

use super::{Component, Entity};
use std::any::Any;

const EMPTY: u32 = u32::MAX;

/// Dense storage for all components of type `T`
pub struct ComponentStorage<T: Component> {
    sparse: Vec<u32>,
    entities: Vec<Entity>,
    dense: Vec<T>,
}

impl<T: Component> ComponentStorage<T> {
    /// Create an empty storage
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::new(),
            dense: Vec::new(),
        }
    }

    fn slot(&self, entity: Entity) -> Option<usize> {
        let slot = *self.sparse.get(entity.index() as usize)?;
        if slot == EMPTY {
            return None;
        }
        let slot = slot as usize;
        // A stale handle shares the index but not the generation
        (self.entities[slot] == entity).then_some(slot)
    }

    /// Insert or overwrite the component for `entity`
    ///
    /// Returns a reference valid until the next structural change of this
    /// storage. `None` for [`Entity::NULL`] and for a handle whose index is
    /// held by another generation; the stored component is left untouched.
    pub(crate) fn insert(&mut self, entity: Entity, component: T) -> Option<&mut T> {
        if entity.is_null() {
            return None;
        }
        let index = entity.index() as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, EMPTY);
        }

        let existing = self.sparse[index];
        if existing != EMPTY {
            let slot = existing as usize;
            if self.entities[slot] != entity {
                log::warn!(
                    "Rejected {} for {:?}: index held by {:?}",
                    std::any::type_name::<T>(),
                    entity,
                    self.entities[slot]
                );
                return None;
            }
            self.dense[slot] = component;
            return Some(&mut self.dense[slot]);
        }

        let slot = self.dense.len();
        self.sparse[index] = slot as u32;
        self.entities.push(entity);
        self.dense.push(component);
        Some(&mut self.dense[slot])
    }

    /// Swap-remove the component for `entity`
    ///
    /// Returns `None` (and changes nothing) when the entity has no component.
    pub(crate) fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slot(entity)?;

        self.entities.swap_remove(slot);
        let removed = self.dense.swap_remove(slot);
        self.sparse[entity.index() as usize] = EMPTY;

        if let Some(&moved) = self.entities.get(slot) {
            self.sparse[moved.index() as usize] = slot as u32;
        }
        Some(removed)
    }

    /// Component for `entity`, if present
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slot(entity).map(|slot| &self.dense[slot])
    }

    /// Mutable component for `entity`, if present
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slot(entity).map(move |slot| &mut self.dense[slot])
    }

    /// Whether `entity` has a component here
    pub fn contains(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Owning entities in dense order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Components in dense order
    pub fn components(&self) -> &[T] {
        &self.dense
    }

    /// Components in dense order, mutably
    pub fn components_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    /// `(entity, component)` pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// `(entity, component)` pairs in dense order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    /// Drop every component
    pub(crate) fn clear(&mut self) {
        self.sparse.clear();
        self.entities.clear();
        self.dense.clear();
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component + std::fmt::Debug> std::fmt::Debug for ComponentStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Type-erased view of a storage, used by the registry and by views
pub trait AnyStorage: Any {
    /// Whether `entity` has a component in this storage
    fn contains(&self, entity: Entity) -> bool;

    /// Owning entities in dense order
    fn entities(&self) -> &[Entity];

    /// Number of stored components
    fn len(&self) -> usize;

    /// Whether the storage is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove the component of `entity`, returning whether one existed
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Drop every component
    fn clear(&mut self);

    /// Component type name
    fn component_name(&self) -> &'static str;

    /// Upcast for downcasting to the typed storage
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the typed storage
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyStorage for ComponentStorage<T> {
    fn contains(&self, entity: Entity) -> bool {
        ComponentStorage::contains(self, entity)
    }

    fn entities(&self) -> &[Entity] {
        ComponentStorage::entities(self)
    }

    fn len(&self) -> usize {
        ComponentStorage::len(self)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn clear(&mut self) {
        ComponentStorage::clear(self);
    }

    fn component_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

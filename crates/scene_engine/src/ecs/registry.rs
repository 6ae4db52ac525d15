//! The registry: owner of every entity and component storage
//!
//! A [`Registry`] is an explicit context object. Nothing here is global, so
//! tests and tools can run as many registries side by side as they like.
//!
//! # Contract
//!
//! - Lookups (`get`, `has`, `storage`, `view`) never fail; they answer `None`,
//!   `false` or an empty view.
//! - Lenient mutations (`add`, `remove`, `destroy`) on a dead entity are
//!   no-ops that log a warning. With
//!   [`RegistryConfig::strict_liveness_checks`] on they also trip a debug
//!   assertion.
//! - The `try_*` variants report the same situations as [`EcsError`].
//! - `add` on an entity that already holds `T` overwrites in place; `remove`
//!   of an absent component is a no-op.

use super::component::ComponentTypes;
use super::entity::EntityAllocator;
use super::storage::{AnyStorage, ComponentStorage};
use super::view::{ComponentSet, View};
use super::{Component, ComponentTypeId, EcsError, EcsResult, Entity};
use crate::config::RegistryConfig;
use std::any::TypeId;

/// Entity and component registry
pub struct Registry {
    allocator: EntityAllocator,
    types: ComponentTypes,
    storages: Vec<Box<dyn AnyStorage>>,
    config: RegistryConfig,
}

impl Registry {
    /// Create a registry with the default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with a custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        log::debug!(
            "Creating registry (capacity {}, strict liveness checks: {})",
            config.initial_entity_capacity,
            config.strict_liveness_checks
        );
        Self {
            allocator: EntityAllocator::with_capacity(config.initial_entity_capacity),
            types: ComponentTypes::default(),
            storages: Vec::new(),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn liveness_violation(&self, operation: &str, entity: Entity) {
        log::warn!("Registry::{} on dead entity {:?} ignored", operation, entity);
        if self.config.strict_liveness_checks {
            debug_assert!(false, "Registry::{operation} on dead entity {entity:?}");
        }
    }

    /// Create a new live entity
    pub fn create(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        log::trace!("Created {:?}", entity);
        entity
    }

    /// Destroy `entity` and drop all of its components
    ///
    /// Returns `false` (and does nothing) if the entity is not alive.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            self.liveness_violation("destroy", entity);
            return false;
        }
        self.destroy_unchecked(entity);
        true
    }

    /// Destroy `entity`, reporting a dead handle as an error
    pub fn try_destroy(&mut self, entity: Entity) -> EcsResult<()> {
        if !self.is_alive(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }
        self.destroy_unchecked(entity);
        Ok(())
    }

    fn destroy_unchecked(&mut self, entity: Entity) {
        let mut removed = 0usize;
        for storage in &mut self.storages {
            if storage.remove_entity(entity) {
                removed += 1;
            }
        }
        self.allocator.free(entity);
        log::trace!("Destroyed {:?} ({} components dropped)", entity, removed);
    }

    /// Whether `entity` is currently alive
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.allocator.len()
    }

    /// Whether there are no live entities
    pub fn is_empty(&self) -> bool {
        self.allocator.len() == 0
    }

    /// Number of index slots ever allocated
    pub fn capacity(&self) -> usize {
        self.allocator.capacity()
    }

    /// How many `create` calls reused a previously freed index
    pub fn recycled_count(&self) -> usize {
        self.allocator.recycled()
    }

    /// Live entities in index order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.allocator.iter_alive()
    }

    /// Destroy every live entity
    ///
    /// Component types stay registered; generations are bumped so handles
    /// issued before the clear stay dead.
    pub fn clear(&mut self) {
        let live: Vec<Entity> = self.allocator.iter_alive().collect();
        for storage in &mut self.storages {
            storage.clear();
        }
        for entity in &live {
            self.allocator.free(*entity);
        }
        log::debug!("Cleared registry ({} entities destroyed)", live.len());
    }

    /// Resolve a raw entity index (e.g. read back from a selection buffer)
    ///
    /// Negative, out-of-range and freed indices resolve to `None`.
    pub fn resolve_index(&self, raw: i32) -> Option<Entity> {
        let index = u32::try_from(raw).ok()?;
        self.allocator.entity_at(index)
    }

    /// Like [`Registry::resolve_index`], answering [`Entity::NULL`] on failure
    pub fn resolve_index_or_null(&self, raw: i32) -> Entity {
        self.resolve_index(raw).unwrap_or(Entity::NULL)
    }

    /// Register `T`, creating its storage if needed
    pub fn register<T: Component>(&mut self) -> ComponentTypeId {
        let (id, fresh) = self.types.get_or_insert::<T>();
        if fresh {
            debug_assert_eq!(id.index(), self.storages.len());
            self.storages.push(Box::new(ComponentStorage::<T>::new()));
            log::debug!("Registered component {} as {}", std::any::type_name::<T>(), id);
        }
        id
    }

    /// Tag of `T` if it has been registered
    pub fn component_type_id<T: Component>(&self) -> Option<ComponentTypeId> {
        self.types.get(TypeId::of::<T>())
    }

    /// Type name behind a tag
    pub fn component_name(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.types.name(id)
    }

    /// Number of registered component types
    pub fn component_type_count(&self) -> usize {
        self.types.len()
    }

    /// Storage for `T`, if `T` has been registered
    pub fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        let id = self.component_type_id::<T>()?;
        self.storages[id.index()].as_any().downcast_ref()
    }

    /// Storage for `T`, registering it on first use
    ///
    /// Components can be edited in place through the returned storage;
    /// adding and removing them goes through the registry.
    pub fn storage_mut<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        let id = self.register::<T>();
        match self.storages[id.index()].as_any_mut().downcast_mut() {
            Some(storage) => storage,
            None => unreachable!("component tag {id} does not hold {}", std::any::type_name::<T>()),
        }
    }

    pub(crate) fn erased_storage(&self, type_id: TypeId) -> Option<&dyn AnyStorage> {
        let id = self.types.get(type_id)?;
        Some(self.storages[id.index()].as_ref())
    }

    /// Attach `component` to `entity`, overwriting any existing `T`
    ///
    /// Returns `None` when the entity is not alive.
    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> Option<&mut T> {
        if !self.is_alive(entity) {
            self.liveness_violation("add", entity);
            return None;
        }
        log::trace!("Adding {} to {:?}", std::any::type_name::<T>(), entity);
        self.storage_mut::<T>().insert(entity, component)
    }

    /// Attach `component`, rejecting dead entities and duplicates
    pub fn try_add<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<&mut T> {
        if !self.is_alive(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }
        if self.has::<T>(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: std::any::type_name::<T>(),
            });
        }
        self.storage_mut::<T>()
            .insert(entity, component)
            .ok_or(EcsError::InvalidEntity(entity))
    }

    /// Detach and return the `T` of `entity`
    ///
    /// Absent components (and dead entities) yield `None`; calling this twice
    /// is the same as calling it once.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.is_alive(entity) {
            self.liveness_violation("remove", entity);
            return None;
        }
        let id = self.component_type_id::<T>()?;
        self.storages[id.index()]
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()?
            .remove(entity)
    }

    /// Detach and return the `T` of `entity`, reporting why nothing was removed
    pub fn try_remove<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        if !self.is_alive(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }
        let missing = EcsError::MissingComponent {
            entity,
            component: std::any::type_name::<T>(),
        };
        let Some(id) = self.component_type_id::<T>() else {
            return Err(missing);
        };
        self.storages[id.index()]
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
            .and_then(|storage| storage.remove(entity))
            .ok_or(missing)
    }

    /// The `T` of `entity`, if any
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// The `T` of `entity`, mutably
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let id = self.component_type_id::<T>()?;
        self.storages[id.index()]
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()?
            .get_mut(entity)
    }

    /// Whether `entity` has a `T`
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>().is_some_and(|storage| storage.contains(entity))
    }

    /// Tags of every component type `entity` currently holds
    pub fn component_types_of(&self, entity: Entity) -> Vec<ComponentTypeId> {
        (0..self.types.len())
            .filter(|&i| self.storages[i].contains(entity))
            .filter_map(|i| self.types.get_by_index(i))
            .collect()
    }

    /// Query every entity holding all components of `R`
    ///
    /// See [`View`] for ordering and invalidation rules.
    pub fn view<R: ComponentSet>(&self) -> View<'_, R> {
        View::new(self)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entities", &self.allocator.len())
            .field("capacity", &self.allocator.capacity())
            .field(
                "storages",
                &self
                    .storages
                    .iter()
                    .map(|s| (s.component_name(), s.len()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

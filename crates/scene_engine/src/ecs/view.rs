//! Views: multi-component queries over a [`Registry`]
//!
//! A view is built per use (usually once per frame per query shape), reads
//! the storages live and owns nothing. Among the required storages the one
//! with the fewest components drives iteration; every other required storage
//! and every excluded storage is probed per candidate in O(1).
//!
//! ```
//! # use scene_engine::ecs::{Registry, Component};
//! # struct Transform; impl Component for Transform {}
//! # struct MeshRenderer; impl Component for MeshRenderer {}
//! # struct Parent; impl Component for Parent {}
//! let mut registry = Registry::new();
//! let e = registry.create();
//! registry.add(e, Transform);
//! registry.add(e, MeshRenderer);
//!
//! let roots = registry
//!     .view::<(Transform, MeshRenderer)>()
//!     .exclude::<(Parent,)>();
//! assert_eq!(roots.iter().collect::<Vec<_>>(), vec![e]);
//! ```
//!
//! # Ordering
//!
//! Entities come out in the dense order of the driving storage. That is
//! insertion order perturbed by swap-removes; it is neither creation order
//! nor index order, and it changes whenever a component is removed.
//!
//! # Invalidation
//!
//! A view holds a shared borrow of the registry, so structural mutation while
//! it is alive is rejected at compile time. To mutate matching entities,
//! collect them first and then use [`Registry::get_mut`].

use super::storage::{AnyStorage, ComponentStorage};
use super::{Component, Entity, Registry};
use std::any::TypeId;

/// A tuple of component types used as a view's required or excluded set
///
/// Implemented for tuples of one to six [`Component`] types.
pub trait ComponentSet: 'static {
    /// Typed storage references, one per member
    type Storages<'r>: Copy;

    /// Component references handed out per matching entity
    type Refs<'r>;

    /// Rust type ids of the members, in declaration order
    fn type_ids() -> Vec<TypeId>;

    /// Typed storages for every member, or `None` if any is unregistered
    fn storages(registry: &Registry) -> Option<Self::Storages<'_>>;

    /// Component references of `entity`, or `None` if any is missing
    fn fetch<'r>(storages: Self::Storages<'r>, entity: Entity) -> Option<Self::Refs<'r>>;
}

macro_rules! impl_component_set {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: Component),+> ComponentSet for ($($ty,)+) {
            type Storages<'r> = ($(&'r ComponentStorage<$ty>,)+);
            type Refs<'r> = ($(&'r $ty,)+);

            fn type_ids() -> Vec<TypeId> {
                vec![$(TypeId::of::<$ty>()),+]
            }

            fn storages(registry: &Registry) -> Option<Self::Storages<'_>> {
                Some(($(registry.storage::<$ty>()?,)+))
            }

            fn fetch<'r>(storages: Self::Storages<'r>, entity: Entity) -> Option<Self::Refs<'r>> {
                let ($($var,)+) = storages;
                Some(($($var.get(entity)?,)+))
            }
        }
    };
}

impl_component_set!(A a);
impl_component_set!(A a, B b);
impl_component_set!(A a, B b, C c);
impl_component_set!(A a, B b, C c, D d);
impl_component_set!(A a, B b, C c, D d, E e);
impl_component_set!(A a, B b, C c, D d, E e, F f);

/// Query over every entity holding all of `R` and none of the excluded set
pub struct View<'r, R: ComponentSet> {
    registry: &'r Registry,
    storages: Option<R::Storages<'r>>,
    /// Driver first, then the remaining required storages.
    required: Vec<&'r dyn AnyStorage>,
    excluded: Vec<&'r dyn AnyStorage>,
}

impl<'r, R: ComponentSet> View<'r, R> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        let storages = R::storages(registry);
        let mut required: Vec<&'r dyn AnyStorage> = if storages.is_some() {
            R::type_ids()
                .into_iter()
                .filter_map(|id| registry.erased_storage(id))
                .collect()
        } else {
            Vec::new()
        };

        let driver = required
            .iter()
            .enumerate()
            .min_by_key(|(_, storage)| storage.len())
            .map(|(i, _)| i);
        if let Some(driver) = driver {
            required.swap(0, driver);
        }

        Self {
            registry,
            storages,
            required,
            excluded: Vec::new(),
        }
    }

    /// Narrow the view to entities holding none of `E`
    ///
    /// Unregistered excluded types exclude nothing.
    #[must_use]
    pub fn exclude<E: ComponentSet>(mut self) -> Self {
        let registry = self.registry;
        self.excluded.extend(
            E::type_ids()
                .into_iter()
                .filter_map(|id| registry.erased_storage(id)),
        );
        self
    }

    fn driver_entities(&self) -> &'r [Entity] {
        match self.required.first() {
            Some(&driver) => driver.entities(),
            None => &[],
        }
    }

    fn accepts_candidate(&self, entity: Entity) -> bool {
        self.required[1..].iter().all(|storage| storage.contains(entity))
            && !self.excluded.iter().any(|storage| storage.contains(entity))
    }

    /// Whether `entity` satisfies the view's predicate
    pub fn contains(&self, entity: Entity) -> bool {
        !self.required.is_empty()
            && self.required.iter().all(|storage| storage.contains(entity))
            && !self.excluded.iter().any(|storage| storage.contains(entity))
    }

    /// Matching entities in driver order
    pub fn iter(&self) -> ViewIter<'_, 'r, R> {
        ViewIter {
            view: self,
            candidates: self.driver_entities().iter(),
        }
    }

    /// Matching entities with references to their required components
    pub fn each(&self) -> EachIter<'_, 'r, R> {
        EachIter {
            storages: self.storages,
            inner: self.iter(),
        }
    }

    /// Number of matching entities (walks the driver)
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Whether nothing matches
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// First matching entity in driver order
    pub fn first(&self) -> Option<Entity> {
        self.iter().next()
    }

    /// Size of the driving storage, an upper bound on [`View::count`]
    pub fn driver_len(&self) -> usize {
        self.driver_entities().len()
    }
}

/// Iterator over the entities of a [`View`]
pub struct ViewIter<'v, 'r, R: ComponentSet> {
    view: &'v View<'r, R>,
    candidates: std::slice::Iter<'r, Entity>,
}

impl<'v, 'r, R: ComponentSet> Iterator for ViewIter<'v, 'r, R> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        let view = self.view;
        self.candidates
            .find(|&&entity| view.accepts_candidate(entity))
            .copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.candidates.len()))
    }
}

/// Iterator over `(entity, components)` of a [`View`]
pub struct EachIter<'v, 'r, R: ComponentSet> {
    storages: Option<R::Storages<'r>>,
    inner: ViewIter<'v, 'r, R>,
}

impl<'v, 'r, R: ComponentSet> Iterator for EachIter<'v, 'r, R> {
    type Item = (Entity, R::Refs<'r>);

    fn next(&mut self) -> Option<Self::Item> {
        let storages = self.storages?;
        self.inner
            .by_ref()
            .find_map(|entity| R::fetch(storages, entity).map(|refs| (entity, refs)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'v, 'r, R: ComponentSet> IntoIterator for &'v View<'r, R> {
    type Item = Entity;
    type IntoIter = ViewIter<'v, 'r, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct A(u32);
    impl Component for A {}

    #[derive(Debug, PartialEq)]
    struct B(u32);
    impl Component for B {}

    #[derive(Debug, PartialEq)]
    struct C;
    impl Component for C {}

    #[test]
    fn test_single_component_view_follows_dense_order() {
        let mut registry = Registry::new();
        let e: Vec<Entity> = (0..4).map(|_| registry.create()).collect();
        for &entity in e.iter().rev() {
            registry.add(entity, A(entity.index()));
        }

        let order: Vec<Entity> = registry.view::<(A,)>().iter().collect();
        assert_eq!(order, vec![e[3], e[2], e[1], e[0]]);

        registry.remove::<A>(e[3]);
        let order: Vec<Entity> = registry.view::<(A,)>().iter().collect();
        assert_eq!(order, vec![e[0], e[2], e[1]]);
    }

    #[test]
    fn test_smallest_storage_drives() {
        let mut registry = Registry::new();
        let entities: Vec<Entity> = (0..10).map(|_| registry.create()).collect();
        for &entity in &entities {
            registry.add(entity, A(0));
        }
        registry.add(entities[7], B(7));
        registry.add(entities[2], B(2));

        let view = registry.view::<(A, B)>();
        assert_eq!(view.driver_len(), 2);
        // Order comes from B's dense array
        assert_eq!(view.iter().collect::<Vec<_>>(), vec![entities[7], entities[2]]);
    }

    #[test]
    fn test_exclude_filters() {
        let mut registry = Registry::new();
        let x = registry.create();
        let y = registry.create();
        registry.add(x, A(1));
        registry.add(y, A(2));
        registry.add(y, C);

        let view = registry.view::<(A,)>().exclude::<(C,)>();
        assert_eq!(view.iter().collect::<Vec<_>>(), vec![x]);
        assert!(view.contains(x));
        assert!(!view.contains(y));
    }

    #[test]
    fn test_unregistered_types() {
        let mut registry = Registry::new();
        let x = registry.create();
        registry.add(x, A(1));

        assert!(registry.view::<(A, B)>().is_empty());
        assert_eq!(registry.view::<(B,)>().driver_len(), 0);
        // Excluding a never-registered type excludes nothing
        assert_eq!(registry.view::<(A,)>().exclude::<(B,)>().count(), 1);
    }

    #[test]
    fn test_each_yields_components() {
        let mut registry = Registry::new();
        let x = registry.create();
        let y = registry.create();
        registry.add(x, A(10));
        registry.add(x, B(20));
        registry.add(y, A(30));

        let rows: Vec<(Entity, u32, u32)> = registry
            .view::<(A, B)>()
            .each()
            .map(|(entity, (a, b))| (entity, a.0, b.0))
            .collect();
        assert_eq!(rows, vec![(x, 10, 20)]);
    }

    #[test]
    fn test_view_for_loop() {
        let mut registry = Registry::new();
        let x = registry.create();
        registry.add(x, A(1));

        let view = registry.view::<(A,)>();
        let mut seen = Vec::new();
        for entity in &view {
            seen.push(entity);
        }
        assert_eq!(seen, vec![x]);
        assert_eq!(view.first(), Some(x));
    }

    #[test]
    fn test_collect_then_mutate() {
        let mut registry = Registry::new();
        for i in 0..3 {
            let entity = registry.create();
            registry.add(entity, A(i));
            registry.add(entity, B(0));
        }

        let matching: Vec<Entity> = registry.view::<(A, B)>().iter().collect();
        for entity in matching {
            let a = registry.get::<A>(entity).map_or(0, |a| a.0);
            if let Some(b) = registry.get_mut::<B>(entity) {
                b.0 = a * 2;
            }
        }

        let sum: u32 = registry.view::<(B,)>().each().map(|(_, (b,))| b.0).sum();
        assert_eq!(sum, 6);
    }
}

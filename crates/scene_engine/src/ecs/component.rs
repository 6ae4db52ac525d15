//! Component trait and per-registry type tags

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

/// Marker trait for components
///
/// Components are plain data. Any `'static` type can opt in; storage lives in
/// the registry, never inside the entity.
pub trait Component: 'static {}

/// Dense per-registry tag for a component type
///
/// Assigned in registration order starting at zero, so it doubles as the
/// index of the type's storage inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(u32);

impl ComponentTypeId {
    /// Raw tag value
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Maps Rust type ids to dense component tags
#[derive(Debug, Default)]
pub(crate) struct ComponentTypes {
    ids: HashMap<TypeId, ComponentTypeId>,
    names: Vec<&'static str>,
}

impl ComponentTypes {
    pub fn get(&self, type_id: TypeId) -> Option<ComponentTypeId> {
        self.ids.get(&type_id).copied()
    }

    /// Returns the tag and whether it was newly assigned.
    pub fn get_or_insert<T: Component>(&mut self) -> (ComponentTypeId, bool) {
        if let Some(id) = self.get(TypeId::of::<T>()) {
            return (id, false);
        }
        let id = ComponentTypeId(self.names.len() as u32);
        self.ids.insert(TypeId::of::<T>(), id);
        self.names.push(std::any::type_name::<T>());
        (id, true)
    }

    pub fn get_by_index(&self, index: usize) -> Option<ComponentTypeId> {
        (index < self.names.len()).then(|| ComponentTypeId(index as u32))
    }

    pub fn name(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position;
    impl Component for Position {}

    struct Velocity;
    impl Component for Velocity {}

    #[test]
    fn test_tags_are_dense_and_stable() {
        let mut types = ComponentTypes::default();

        let (position, fresh) = types.get_or_insert::<Position>();
        assert!(fresh);
        let (velocity, _) = types.get_or_insert::<Velocity>();
        let (again, fresh) = types.get_or_insert::<Position>();

        assert!(!fresh);
        assert_eq!(position.index(), 0);
        assert_eq!(velocity.index(), 1);
        assert_eq!(again, position);
        assert_eq!(types.len(), 2);
        assert!(types.name(velocity).is_some_and(|n| n.ends_with("Velocity")));
    }
}

//! GPU-readback entity picking
//!
//! The selection pass clears an integer render target to the background id,
//! draws every pickable entity with its [`Entity::pick_id`] and the
//! translation gizmo arrows with reserved negative ids. The value read back
//! under the cursor is resolved here into something the editor can act on.

use crate::config::PickingConfig;
use crate::ecs::components::LocalToWorld;
use crate::ecs::systems::hierarchy::set_world_position;
use crate::ecs::{Entity, Registry};
use crate::foundation::math::Vec3;

/// Translation gizmo arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoAxis {
    /// X arrow
    X,
    /// Y arrow
    Y,
    /// Z arrow
    Z,
}

/// What the cursor landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickResult {
    /// Background, or an id that no longer maps to a live entity
    Nothing,
    /// A live entity
    Entity(Entity),
    /// One of the gizmo arrows
    Gizmo(GizmoAxis),
}

/// Resolves selection-buffer values
#[derive(Debug, Clone, Default)]
pub struct EntityPicker {
    config: PickingConfig,
}

impl EntityPicker {
    /// Create a picker for the given reserved ids
    pub fn new(config: PickingConfig) -> Self {
        Self { config }
    }

    /// Reserved ids in use
    pub fn config(&self) -> &PickingConfig {
        &self.config
    }

    /// Map a selection-buffer value to a pick result
    ///
    /// Stale, negative and out-of-range ids are never dereferenced; they
    /// come back as [`PickResult::Nothing`].
    pub fn resolve(&self, registry: &Registry, pixel: i32) -> PickResult {
        if pixel == self.config.background_id {
            return PickResult::Nothing;
        }
        if let Some(axis) = self.gizmo_axis(pixel) {
            return PickResult::Gizmo(axis);
        }
        match registry.resolve_index(pixel) {
            Some(entity) => PickResult::Entity(entity),
            None => {
                log::debug!("Selection buffer value {} does not map to a live entity", pixel);
                PickResult::Nothing
            }
        }
    }

    fn gizmo_axis(&self, pixel: i32) -> Option<GizmoAxis> {
        let [x, y, z] = self.config.gizmo_ids;
        match pixel {
            p if p == x => Some(GizmoAxis::X),
            p if p == y => Some(GizmoAxis::Y),
            p if p == z => Some(GizmoAxis::Z),
            _ => None,
        }
    }
}

/// Editor selection state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<Entity>,
    dragging: Option<GizmoAxis>,
}

impl Selection {
    /// Update from a click
    ///
    /// Clicking a gizmo starts a drag and keeps the selection; anything else
    /// replaces the selection (clearing it for [`PickResult::Nothing`]).
    pub fn apply(&mut self, result: PickResult) {
        match result {
            PickResult::Gizmo(axis) => self.dragging = Some(axis),
            PickResult::Entity(entity) => {
                self.selected = Some(entity);
                self.dragging = None;
            }
            PickResult::Nothing => {
                self.selected = None;
                self.dragging = None;
            }
        }
    }

    /// Select directly (e.g. from the world panel)
    pub fn select(&mut self, entity: Entity) {
        self.selected = (!entity.is_null()).then_some(entity);
        self.dragging = None;
    }

    /// Currently selected entity
    pub fn selected(&self) -> Option<Entity> {
        self.selected
    }

    /// Selected entity or [`Entity::NULL`]
    pub fn selected_or_null(&self) -> Entity {
        self.selected.unwrap_or(Entity::NULL)
    }

    /// Whether `entity` is the selection
    pub fn is_selected(&self, entity: Entity) -> bool {
        self.selected == Some(entity)
    }

    /// Gizmo arrow being dragged, if any
    pub fn dragging(&self) -> Option<GizmoAxis> {
        self.dragging
    }

    /// World position to draw the gizmo at
    pub fn gizmo_position(&self, registry: &Registry) -> Option<Vec3> {
        let selected = self.selected?;
        registry.get::<LocalToWorld>(selected).map(LocalToWorld::position)
    }

    /// Apply a gizmo drag that moved the selection to `world`
    ///
    /// Only acts while an arrow is being dragged and the selection is alive.
    /// Returns whether the entity's [`Transform`](crate::ecs::Transform) was
    /// updated.
    pub fn drag_to(&self, registry: &mut Registry, world: Vec3) -> bool {
        match (self.selected, self.dragging) {
            (Some(entity), Some(_)) if registry.is_alive(entity) => {
                set_world_position(registry, entity, world)
            }
            _ => false,
        }
    }

    /// Mouse released
    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// Clear everything
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Drop a selection whose entity has died; returns whether it was kept
    pub fn validate(&mut self, registry: &Registry) -> bool {
        match self.selected {
            Some(entity) if !registry.is_alive(entity) => {
                log::debug!("Selected entity {:?} was destroyed, clearing selection", entity);
                self.clear();
                false
            }
            Some(_) => true,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_reserved_ids() {
        let registry = Registry::new();
        let picker = EntityPicker::default();

        assert_eq!(picker.resolve(&registry, -1), PickResult::Nothing);
        assert_eq!(picker.resolve(&registry, -2), PickResult::Gizmo(GizmoAxis::X));
        assert_eq!(picker.resolve(&registry, -3), PickResult::Gizmo(GizmoAxis::Y));
        assert_eq!(picker.resolve(&registry, -4), PickResult::Gizmo(GizmoAxis::Z));
        assert_eq!(picker.resolve(&registry, -5), PickResult::Nothing);
    }

    #[test]
    fn test_resolve_entities() {
        let mut registry = Registry::new();
        let a = registry.create();
        let b = registry.create();
        let picker = EntityPicker::default();

        assert_eq!(picker.resolve(&registry, b.pick_id()), PickResult::Entity(b));

        registry.destroy(a);
        assert_eq!(picker.resolve(&registry, a.pick_id()), PickResult::Nothing);
        assert_eq!(picker.resolve(&registry, 4096), PickResult::Nothing);
    }

    #[test]
    fn test_custom_reserved_ids() {
        let registry = Registry::new();
        let picker = EntityPicker::new(PickingConfig {
            background_id: -100,
            gizmo_ids: [-7, -8, -9],
        });

        assert_eq!(picker.resolve(&registry, -8), PickResult::Gizmo(GizmoAxis::Y));
        assert_eq!(picker.resolve(&registry, -2), PickResult::Nothing);
    }

    #[test]
    fn test_selection_follows_clicks() {
        let mut registry = Registry::new();
        let e = registry.create();
        let mut selection = Selection::default();

        selection.apply(PickResult::Entity(e));
        assert!(selection.is_selected(e));

        selection.apply(PickResult::Gizmo(GizmoAxis::Z));
        assert_eq!(selection.selected(), Some(e));
        assert_eq!(selection.dragging(), Some(GizmoAxis::Z));

        selection.end_drag();
        selection.apply(PickResult::Nothing);
        assert_eq!(selection.selected_or_null(), Entity::NULL);
    }

    #[test]
    fn test_drag_moves_selected_child_in_parent_space() {
        use crate::ecs::systems::{attach, propagate_transforms};
        use crate::ecs::Transform;
        use approx::assert_relative_eq;

        let mut registry = Registry::new();
        let parent = registry.create();
        registry.add(parent, Transform::from_position(Vec3::new(0.0, 3.0, 0.0)));
        let child = registry.create();
        registry.add(child, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
        attach(&mut registry, child, parent).unwrap();
        propagate_transforms(&mut registry);

        let mut selection = Selection::default();
        selection.apply(PickResult::Entity(child));
        assert_relative_eq!(selection.gizmo_position(&registry).unwrap(), Vec3::new(1.0, 3.0, 0.0));

        // No arrow grabbed yet
        assert!(!selection.drag_to(&mut registry, Vec3::new(5.0, 3.0, 0.0)));

        selection.apply(PickResult::Gizmo(GizmoAxis::X));
        assert!(selection.drag_to(&mut registry, Vec3::new(5.0, 3.0, 0.0)));
        assert_relative_eq!(
            registry.get::<Transform>(child).unwrap().position,
            Vec3::new(5.0, 0.0, 0.0),
            epsilon = 1e-5
        );

        selection.end_drag();
        assert!(!selection.drag_to(&mut registry, Vec3::zeros()));
    }

    #[test]
    fn test_selection_validate_drops_dead_entities() {
        let mut registry = Registry::new();
        let e = registry.create();
        let mut selection = Selection::default();
        selection.select(e);

        assert!(selection.validate(&registry));
        registry.destroy(e);
        assert!(!selection.validate(&registry));
        assert_eq!(selection.selected(), None);

        selection.select(Entity::NULL);
        assert_eq!(selection.selected(), None);
    }
}

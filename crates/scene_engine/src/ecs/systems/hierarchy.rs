//! Scene hierarchy maintenance and transform propagation
//!
//! Roots are entities with a [`Transform`] and no live [`Parent`]. A child
//! whose parent was destroyed without [`destroy_recursive`] keeps a dangling
//! link; it is treated as a root until it is re-attached or detached. A
//! child's world matrix is `parent_world * child_local`; children without a
//! `Transform` inherit the parent's world matrix unchanged.

use crate::ecs::components::{Children, LocalToWorld, Parent, Transform};
use crate::ecs::{EcsError, EcsResult, Entity, Registry};
use crate::foundation::math::{Mat4, Vec3};
use std::collections::HashSet;

/// Make `child` a child of `parent`
///
/// Moves `child` away from its previous parent if it had one. Returns
/// `Ok(false)` without changing anything when the link would create a cycle
/// (including `child == parent`).
pub fn attach(registry: &mut Registry, child: Entity, parent: Entity) -> EcsResult<bool> {
    for entity in [child, parent] {
        if !registry.is_alive(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }
    }

    if is_ancestor_or_self(registry, child, parent) {
        log::warn!("Refusing to attach {:?} under {:?}: would create a cycle", child, parent);
        return Ok(false);
    }

    if registry.get::<Parent>(child).map(|p| p.entity) == Some(parent) {
        return Ok(true);
    }

    detach(registry, child);
    registry.add(child, Parent { entity: parent });
    match registry.get_mut::<Children>(parent) {
        Some(children) => children.push(child),
        None => {
            registry.add(parent, Children { entities: vec![child] });
        }
    }
    log::trace!("Attached {:?} to {:?}", child, parent);
    Ok(true)
}

/// Whether `candidate` is `entity` or one of its ancestors
fn is_ancestor_or_self(registry: &Registry, candidate: Entity, entity: Entity) -> bool {
    let mut current = entity;
    let mut steps = 0usize;
    loop {
        if current == candidate {
            return true;
        }
        match registry.get::<Parent>(current) {
            Some(parent) => current = parent.entity,
            None => return false,
        }
        steps += 1;
        if steps > registry.len() {
            // Corrupt links already form a loop
            return true;
        }
    }
}

/// Unlink `child` from its parent, turning it into a root
///
/// Returns whether there was a parent. A parent left without children loses
/// its [`Children`] component so it reads as a leaf.
pub fn detach(registry: &mut Registry, child: Entity) -> bool {
    if !registry.is_alive(child) {
        return false;
    }
    let Some(Parent { entity: parent }) = registry.remove::<Parent>(child) else {
        return false;
    };

    let now_empty = match registry.get_mut::<Children>(parent) {
        Some(children) => {
            children.remove(child);
            children.is_empty()
        }
        None => false,
    };
    if now_empty && registry.is_alive(parent) {
        registry.remove::<Children>(parent);
    }
    log::trace!("Detached {:?} from {:?}", child, parent);
    true
}

/// Destroy `root` and every descendant
///
/// Returns the number of entities destroyed.
pub fn destroy_recursive(registry: &mut Registry, root: Entity) -> usize {
    if !registry.is_alive(root) {
        return 0;
    }
    detach(registry, root);

    let mut doomed = Vec::new();
    let mut stack = vec![root];
    let mut seen = HashSet::new();
    while let Some(entity) = stack.pop() {
        if !seen.insert(entity) || !registry.is_alive(entity) {
            continue;
        }
        doomed.push(entity);
        if let Some(children) = registry.get::<Children>(entity) {
            stack.extend(children.entities.iter().rev().copied());
        }
    }

    for &entity in &doomed {
        registry.destroy(entity);
    }
    log::debug!("Destroyed subtree of {:?} ({} entities)", root, doomed.len());
    doomed.len()
}

/// Entities with a `Transform` and no live parent, in `Transform` dense order
fn roots(registry: &Registry) -> Vec<Entity> {
    registry
        .view::<(Transform,)>()
        .iter()
        .filter(|&entity| match registry.get::<Parent>(entity) {
            Some(parent) if registry.is_alive(parent.entity) => false,
            Some(parent) => {
                log::warn!("{:?} points at dead parent {:?}, treating it as a root", entity, parent.entity);
                true
            }
            None => true,
        })
        .collect()
}

/// Move `entity` so its world-space translation becomes `world`
///
/// The new local position is `world` mapped through the inverse of the live
/// parent's [`LocalToWorld`], or `world` itself for roots. This is how a
/// gizmo drag lands in the hierarchy. Returns `false` and changes nothing when
/// the entity has no [`Transform`] or the parent matrix is singular. The
/// entity's own `LocalToWorld` catches up on the next
/// [`propagate_transforms`].
pub fn set_world_position(registry: &mut Registry, entity: Entity, world: Vec3) -> bool {
    let parent_world = registry
        .get::<Parent>(entity)
        .filter(|parent| registry.is_alive(parent.entity))
        .and_then(|parent| registry.get::<LocalToWorld>(parent.entity));

    let local = match parent_world {
        Some(parent_world) => match parent_world.world_to_local_point(&world) {
            Some(local) => local,
            None => {
                log::warn!("Cannot move {:?}: parent world matrix is singular", entity);
                return false;
            }
        },
        None => world,
    };

    match registry.get_mut::<Transform>(entity) {
        Some(transform) => {
            transform.position = local;
            true
        }
        None => false,
    }
}

/// Recompute [`LocalToWorld`] for every entity reachable from a root
///
/// Adds the component where it is missing. Dead children are skipped with a
/// warning. Returns the number of matrices written.
pub fn propagate_transforms(registry: &mut Registry) -> usize {
    let roots = roots(registry);

    let mut stack: Vec<(Entity, Mat4)> = Vec::new();
    let mut visited = HashSet::new();
    let mut written = 0usize;

    for root in roots {
        stack.push((root, Mat4::identity()));

        while let Some((entity, parent_world)) = stack.pop() {
            if !registry.is_alive(entity) {
                log::warn!("Skipping dead child {:?} during transform propagation", entity);
                continue;
            }
            if !visited.insert(entity) {
                log::warn!("{:?} reached twice during transform propagation", entity);
                continue;
            }

            let world = match registry.get::<Transform>(entity) {
                Some(local) => parent_world * local.matrix(),
                None => parent_world,
            };
            registry.add(entity, LocalToWorld::new(world));
            written += 1;

            if let Some(children) = registry.get::<Children>(entity) {
                stack.extend(children.entities.iter().rev().map(|&child| (child, world)));
            }
        }
    }

    log::trace!("Propagated {} world transforms", written);
    written
}

/// One row of the editor's world panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineRow {
    /// Entity shown on this row
    pub entity: Entity,

    /// Nesting depth, 0 for roots
    pub depth: usize,

    /// No [`Children`] component
    pub is_leaf: bool,
}

/// Depth-first listing of the hierarchy
///
/// Roots come in the dense order of the `Transform` storage, children in
/// their [`Children`] order. Dead children are left out; orphans of a dead
/// parent show up as roots.
pub fn outline(registry: &Registry) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    let mut visited = HashSet::new();

    for root in roots(registry) {
        let mut stack = vec![(root, 0usize)];
        while let Some((entity, depth)) = stack.pop() {
            if !registry.is_alive(entity) || !visited.insert(entity) {
                continue;
            }
            let children = registry.get::<Children>(entity);
            rows.push(OutlineRow {
                entity,
                depth,
                is_leaf: children.is_none(),
            });
            if let Some(children) = children {
                stack.extend(children.entities.iter().rev().map(|&child| (child, depth + 1)));
            }
        }
    }
    rows
}

//! Entity-Component-System implementation
//!
//! The data plane every frame consumer works against: generational entity
//! handles, one sparse-set storage per component type, the owning
//! [`Registry`], and [`View`] queries over it.

pub mod entity;
pub mod component;
pub mod storage;
pub mod registry;
pub mod view;
pub mod error;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use entity::Entity;
pub use component::{Component, ComponentTypeId};
pub use storage::{AnyStorage, ComponentStorage};
pub use registry::Registry;
pub use view::{ComponentSet, View, ViewIter, EachIter};
pub use error::{EcsError, EcsResult};

pub use components::{
    Camera, Children, LocalToWorld, MaterialId, MeshHandle, MeshRenderer, Parent, RenderFlags,
    Transform,
};

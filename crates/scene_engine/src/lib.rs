//! # Scene Engine
//!
//! The scene data plane of a small 3D editor: a sparse-set
//! Entity-Component-System plus the per-frame systems that consume it.
//!
//! ## Features
//!
//! - **Generational entities**: stale handles never alias reused slots
//! - **Sparse-set storage**: O(1) add, remove and lookup with dense iteration
//! - **Views**: multi-component queries with exclusions, driven by the smallest storage
//! - **Frame systems**: transform propagation, draw collection and GPU picking
//! - **Configuration**: TOML or RON engine settings
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! let mut registry = Registry::new();
//! let cube = registry.create();
//! registry.add(cube, Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));
//! registry.add(cube, MeshRenderer::new(MeshHandle(0), MaterialId(0), 36));
//!
//! propagate_transforms(&mut registry);
//!
//! let mut collector = RenderCollector::new();
//! let draws = collector.collect(&registry);
//! assert_eq!(draws.opaque.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod foundation;
pub mod config;
pub mod ecs;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EngineConfig, PickingConfig, RegistryConfig},
        ecs::{
            Camera, Children, Component, EcsError, EcsResult, Entity, LocalToWorld, MaterialId,
            MeshHandle, MeshRenderer, Parent, Registry, RenderFlags, Transform, View,
        },
        ecs::systems::{
            attach, detach, destroy_recursive, outline, propagate_transforms,
            set_world_position, EntityPicker, GizmoAxis, PickResult, RenderCollector, Selection,
        },
        foundation::math::{Mat4, Quat, Vec3},
    };
}

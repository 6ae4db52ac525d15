//! Scene components
//!
//! Pure data records stored in the registry. Logic lives in
//! [`crate::ecs::systems`].

pub mod transform;
pub mod hierarchy;
pub mod mesh_renderer;
pub mod camera;

pub use transform::{Transform, LocalToWorld};
pub use hierarchy::{Parent, Children};
pub use mesh_renderer::{MeshRenderer, MeshHandle, MaterialId, RenderFlags};
pub use camera::Camera;

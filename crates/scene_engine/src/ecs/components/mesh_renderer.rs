//! Mesh renderer component
//!
//! References GPU-side mesh and material resources by handle. The resources
//! themselves belong to the rendering backend.

use crate::ecs::Component;
use bitflags::bitflags;

/// Opaque handle to an uploaded mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

/// Opaque handle to a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

bitflags! {
    /// Which passes a renderer takes part in
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u32 {
        /// Drawn in the main colour pass
        const VISIBLE = 0b0001;
        /// Drawn into the shadow map
        const CAST_SHADOWS = 0b0010;
        /// Drawn into the selection buffer
        const PICKABLE = 0b0100;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Draws a mesh with a material at the entity's [`super::LocalToWorld`]
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRenderer {
    /// Mesh to draw
    pub mesh: MeshHandle,

    /// Material to bind
    pub material: MaterialId,

    /// Number of indices in the mesh's element buffer
    pub index_count: u32,

    /// Pass participation
    pub flags: RenderFlags,
}

impl Component for MeshRenderer {}

impl MeshRenderer {
    /// Renderer taking part in every pass
    pub fn new(mesh: MeshHandle, material: MaterialId, index_count: u32) -> Self {
        Self {
            mesh,
            material,
            index_count,
            flags: RenderFlags::default(),
        }
    }

    /// Builder pattern: Replace the pass flags
    #[must_use]
    pub fn with_flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Drawn in the colour pass
    pub fn is_visible(&self) -> bool {
        self.flags.contains(RenderFlags::VISIBLE)
    }

    /// Drawn into the shadow map
    pub fn casts_shadows(&self) -> bool {
        self.flags.contains(RenderFlags::CAST_SHADOWS)
    }

    /// Drawn into the selection buffer
    pub fn is_pickable(&self) -> bool {
        self.flags.contains(RenderFlags::PICKABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags_enable_every_pass() {
        let renderer = MeshRenderer::new(MeshHandle(1), MaterialId(2), 36);
        assert!(renderer.is_visible());
        assert!(renderer.casts_shadows());
        assert!(renderer.is_pickable());
    }

    #[test]
    fn test_flags_builder() {
        let renderer = MeshRenderer::new(MeshHandle(1), MaterialId(2), 36)
            .with_flags(RenderFlags::VISIBLE | RenderFlags::PICKABLE);
        assert!(renderer.is_visible());
        assert!(!renderer.casts_shadows());
        assert!(renderer.is_pickable());
    }
}

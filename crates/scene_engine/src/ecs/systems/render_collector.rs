//! # Render Collector
//!
//! Turns the registry into per-frame draw lists for the colour pass, the
//! shadow pass and the selection pass. The GPU backend consumes the lists;
//! nothing here touches graphics APIs.

use crate::ecs::components::{LocalToWorld, MaterialId, MeshHandle, MeshRenderer};
use crate::ecs::{Entity, Registry};
use crate::foundation::math::Mat4;
use bytemuck::{Pod, Zeroable};

/// One draw of one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Entity being drawn
    pub entity: Entity,

    /// Mesh to draw
    pub mesh: MeshHandle,

    /// Material to bind
    pub material: MaterialId,

    /// Element count for the indexed draw
    pub index_count: u32,

    /// World matrix
    pub model: Mat4,
}

/// Per-instance data of the selection pass
///
/// The selection shader writes `entity_id` into an integer render target;
/// the picker later resolves the value read back under the cursor.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PickInstance {
    /// Column-major world matrix
    pub model: [[f32; 4]; 4],

    /// Entity index, see [`Entity::pick_id`]
    pub entity_id: i32,

    /// Keeps the struct 16-byte aligned for std140 arrays
    pub padding: [i32; 3],
}

impl PickInstance {
    fn new(entity: Entity, model: &Mat4) -> Self {
        Self {
            model: (*model).into(),
            entity_id: entity.pick_id(),
            padding: [0; 3],
        }
    }
}

/// Everything the passes need for one frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Colour pass draws, sorted by material then mesh
    pub opaque: Vec<DrawCommand>,

    /// Shadow map draws
    pub shadow_casters: Vec<DrawCommand>,

    /// Selection pass instances
    pub pick_instances: Vec<PickInstance>,
}

impl DrawList {
    /// Drop all draws, keeping allocations
    pub fn clear(&mut self) {
        self.opaque.clear();
        self.shadow_casters.clear();
        self.pick_instances.clear();
    }

    /// Raw bytes of the selection instances for a GPU upload
    pub fn pick_instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pick_instances)
    }
}

/// Statistics of the last collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectorStats {
    /// Entities visited by the view
    pub visited: usize,

    /// Colour pass draws
    pub opaque: usize,

    /// Shadow pass draws
    pub shadow_casters: usize,

    /// Selection pass instances
    pub pickable: usize,

    /// Material changes in the sorted colour pass
    pub material_switches: usize,
}

/// System collecting renderables into a [`DrawList`] once per frame
pub struct RenderCollector {
    draw_list: DrawList,
    stats: CollectorStats,
    enabled: bool,
}

impl RenderCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self {
            draw_list: DrawList::default(),
            stats: CollectorStats::default(),
            enabled: true,
        }
    }

    /// Enable or disable the collector
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if the collector is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Rebuild the draw list from every `(LocalToWorld, MeshRenderer)` entity
    ///
    /// A disabled collector produces an empty list.
    pub fn collect(&mut self, registry: &Registry) -> &DrawList {
        self.draw_list.clear();
        self.stats = CollectorStats::default();

        if !self.enabled {
            return &self.draw_list;
        }

        for (entity, (world, renderer)) in registry.view::<(LocalToWorld, MeshRenderer)>().each() {
            self.stats.visited += 1;

            let command = DrawCommand {
                entity,
                mesh: renderer.mesh,
                material: renderer.material,
                index_count: renderer.index_count,
                model: world.matrix,
            };

            if renderer.is_pickable() {
                self.draw_list.pick_instances.push(PickInstance::new(entity, &world.matrix));
            }
            if renderer.casts_shadows() {
                self.draw_list.shadow_casters.push(command.clone());
            }
            if renderer.is_visible() {
                self.draw_list.opaque.push(command);
            }
        }

        // Stable sort keeps view order within a batch
        self.draw_list.opaque.sort_by_key(|draw| (draw.material, draw.mesh));

        self.stats.opaque = self.draw_list.opaque.len();
        self.stats.shadow_casters = self.draw_list.shadow_casters.len();
        self.stats.pickable = self.draw_list.pick_instances.len();
        self.stats.material_switches = self
            .draw_list
            .opaque
            .windows(2)
            .filter(|pair| pair[0].material != pair[1].material)
            .count();

        log::debug!(
            "Collected {} draws ({} shadow casters, {} pickable, {} material switches)",
            self.stats.opaque,
            self.stats.shadow_casters,
            self.stats.pickable,
            self.stats.material_switches
        );
        &self.draw_list
    }

    /// Draw list of the last collection
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Statistics of the last collection
    pub fn stats(&self) -> CollectorStats {
        self.stats
    }
}

impl Default for RenderCollector {
    fn default() -> Self {
        Self::new()
    }
}

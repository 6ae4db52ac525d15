//! Scene demo application
//!
//! Builds a random scene graph, runs one frame of every system against it and
//! logs what each pass would hand to the GPU. Pass a `.toml` or `.ron`
//! config path as the first argument to override the defaults.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene_engine::foundation::logging;
use scene_engine::prelude::*;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),
}

const SEED: u64 = 0x5CE4E;
const ROOT_COUNT: usize = 4;
const CHILD_COUNT: usize = 12;

struct SceneDemo {
    registry: Registry,
    picker: EntityPicker,
    selection: Selection,
    collector: RenderCollector,
    camera: Entity,
}

impl SceneDemo {
    fn new(config: &EngineConfig) -> Self {
        let mut registry = Registry::with_config(config.registry.clone());

        let camera = registry.create();
        registry.add(camera, Transform::from_position(Vec3::new(0.0, 4.0, 12.0)));
        registry.add(camera, Camera::default());

        Self {
            registry,
            picker: EntityPicker::new(config.picking.clone()),
            selection: Selection::default(),
            collector: RenderCollector::new(),
            camera,
        }
    }

    fn populate(&mut self, rng: &mut StdRng) -> Result<(), DemoError> {
        log::info!("Populating scene with {} roots and {} children", ROOT_COUNT, CHILD_COUNT);

        let mut nodes = Vec::new();
        for i in 0..ROOT_COUNT {
            let root = self.spawn_mesh(rng, i as u32);
            nodes.push(root);
        }
        for i in 0..CHILD_COUNT {
            let child = self.spawn_mesh(rng, (ROOT_COUNT + i) as u32);
            let parent = nodes[rng.gen_range(0..nodes.len())];
            attach(&mut self.registry, child, parent)?;
            nodes.push(child);
        }
        Ok(())
    }

    fn spawn_mesh(&mut self, rng: &mut StdRng, mesh: u32) -> Entity {
        let position = Vec3::new(
            rng.gen_range(-5.0..5.0),
            rng.gen_range(0.0..3.0),
            rng.gen_range(-5.0..5.0),
        );
        let entity = self.registry.create();
        self.registry.add(
            entity,
            Transform::from_position(position).with_rotation_euler(0.0, rng.gen_range(0.0..3.0), 0.0),
        );
        let flags = if rng.gen_bool(0.2) {
            RenderFlags::VISIBLE | RenderFlags::PICKABLE
        } else {
            RenderFlags::all()
        };
        self.registry.add(
            entity,
            MeshRenderer::new(MeshHandle(mesh % 3), MaterialId(rng.gen_range(0..2)), 36).with_flags(flags),
        );
        entity
    }

    fn frame(&mut self, rng: &mut StdRng) {
        let updated = propagate_transforms(&mut self.registry);
        log::info!("Propagated {} world matrices", updated);

        if let Some((camera, pose)) = self
            .registry
            .get::<Camera>(self.camera)
            .zip(self.registry.get::<LocalToWorld>(self.camera))
        {
            let eye = pose.position();
            let view_projection = camera.view_projection(pose);
            log::debug!("Camera at {:?}, view-projection {:?}", eye, view_projection);
        }

        let draws = self.collector.collect(&self.registry);

        // Simulate a selection-buffer readback under the cursor
        let pixel = if draws.pick_instances.is_empty() || rng.gen_bool(0.25) {
            self.picker.config().background_id
        } else {
            draws.pick_instances[rng.gen_range(0..draws.pick_instances.len())].entity_id
        };
        let stats = self.collector.stats();
        log::info!(
            "Frame: {} opaque, {} shadow casters, {} pickable, {} material switches",
            stats.opaque,
            stats.shadow_casters,
            stats.pickable,
            stats.material_switches
        );

        let hit = self.picker.resolve(&self.registry, pixel);
        self.selection.apply(hit);
        log::info!("Clicked pixel id {} -> {:?}", pixel, hit);
    }

    fn log_outline(&self) {
        for row in outline(&self.registry) {
            let marker = if self.selection.is_selected(row.entity) { "*" } else { " " };
            let kind = if row.is_leaf { "" } else { "/" };
            log::info!("{}{}{:?}{}", marker, "  ".repeat(row.depth), row.entity, kind);
        }
    }

    fn nudge_selection(&mut self) {
        let Some(start) = self.selection.gizmo_position(&self.registry) else {
            return;
        };
        self.selection.apply(PickResult::Gizmo(GizmoAxis::X));
        let target = start + Vec3::new(1.5, 0.0, 0.0);
        if self.selection.drag_to(&mut self.registry, target) {
            log::info!("Dragged selection along X to {:?}", target);
        }
        self.selection.end_drag();
    }

    fn destroy_selection(&mut self) {
        if let Some(selected) = self.selection.selected() {
            let removed = destroy_recursive(&mut self.registry, selected);
            log::info!("Destroyed selected subtree of {:?} ({} entities)", selected, removed);
        }
        self.selection.validate(&self.registry);
    }
}

fn load_config() -> Result<EngineConfig, DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_filter(&config.log_filter);
    log::info!("Starting scene demo...");

    let mut rng = StdRng::seed_from_u64(SEED);
    let mut demo = SceneDemo::new(&config);
    demo.populate(&mut rng)?;

    demo.frame(&mut rng);
    demo.log_outline();

    demo.nudge_selection();
    demo.frame(&mut rng);

    demo.destroy_selection();
    demo.frame(&mut rng);
    demo.log_outline();

    log::info!(
        "Done: {} live entities, {} recycled creates",
        demo.registry.len(),
        demo.registry.recycled_count()
    );
    Ok(())
}

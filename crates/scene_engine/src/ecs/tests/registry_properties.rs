//! Randomised checks of the registry invariants
//!
//! Every sequence is driven by a seeded `StdRng`, so failures reproduce.

use crate::config::RegistryConfig;
use crate::ecs::{Component, Entity, Registry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position(i32);
impl Component for Position {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity(i32);
impl Component for Velocity {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Frozen;
impl Component for Frozen {}

fn lenient() -> Registry {
    Registry::with_config(RegistryConfig {
        strict_liveness_checks: false,
        ..RegistryConfig::default()
    })
}

/// Random create/destroy/add/remove mix over three component types
fn churn(registry: &mut Registry, rng: &mut StdRng, steps: usize) -> Vec<Entity> {
    let mut issued = Vec::new();
    for step in 0..steps {
        let live: Vec<Entity> = registry.entities().collect();
        let pick = |rng: &mut StdRng| live.get(rng.gen_range(0..live.len().max(1))).copied();

        match rng.gen_range(0..10) {
            0..=2 => issued.push(registry.create()),
            3 => {
                if let Some(e) = pick(rng) {
                    registry.destroy(e);
                }
            }
            4 | 5 => {
                if let Some(e) = pick(rng) {
                    registry.add(e, Position(step as i32));
                }
            }
            6 => {
                if let Some(e) = pick(rng) {
                    registry.add(e, Velocity(step as i32));
                }
            }
            7 => {
                if let Some(e) = pick(rng) {
                    registry.add(e, Frozen);
                }
            }
            8 => {
                if let Some(e) = pick(rng) {
                    registry.remove::<Position>(e);
                }
            }
            _ => {
                if let Some(e) = pick(rng) {
                    registry.remove::<Frozen>(e);
                }
            }
        }
    }
    issued
}

#[test]
fn test_live_identities_are_unique() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut registry = lenient();
    let mut issued = Vec::new();

    for step in 0..2000 {
        issued.extend(churn(&mut registry, &mut rng, 1));

        let live: Vec<Entity> = registry.entities().collect();
        let unique: HashSet<Entity> = live.iter().copied().collect();
        assert_eq!(live.len(), unique.len(), "step {step}");
        assert_eq!(live.len(), registry.len(), "step {step}");

        let indices: HashSet<u32> = live.iter().map(|e| e.index()).collect();
        assert_eq!(indices.len(), live.len(), "step {step}");

        // Every handle ever issued that still reads as alive is one of the live set
        let alive_issued = issued.iter().filter(|&&e| registry.is_alive(e)).count();
        assert_eq!(alive_issued, live.len(), "step {step}");
    }
}

#[test]
fn test_destroyed_handles_stay_dead() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut registry = lenient();
    let issued = churn(&mut registry, &mut rng, 2000);

    for entity in issued {
        if registry.is_alive(entity) {
            continue;
        }
        // A stale handle must never reach data of whoever reused its index
        assert!(!registry.has::<Position>(entity));
        assert!(registry.get::<Velocity>(entity).is_none());
        assert!(registry.remove::<Position>(entity).is_none());
        assert!(!registry.view::<(Position,)>().contains(entity));
    }
}

#[test]
fn test_storages_only_hold_live_entities() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut registry = lenient();
    churn(&mut registry, &mut rng, 3000);

    let storage = registry.storage::<Position>().expect("position registered");
    assert_eq!(storage.entities().len(), storage.components().len());
    for (entity, component) in storage.iter() {
        assert!(registry.is_alive(entity));
        assert_eq!(registry.get::<Position>(entity), Some(component));
    }

    let positions = registry.entities().filter(|&e| registry.has::<Position>(e)).count();
    assert_eq!(positions, storage.len());
}

#[test]
fn test_remove_leaves_other_values_untouched() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut registry = Registry::new();
    let entities: Vec<Entity> = (0..200).map(|_| registry.create()).collect();
    for &e in &entities {
        registry.add(e, Position(e.index() as i32 * 10));
    }

    let mut removed = HashSet::new();
    for _ in 0..120 {
        let e = entities[rng.gen_range(0..entities.len())];
        registry.remove::<Position>(e);
        removed.insert(e);

        assert!(!registry.has::<Position>(e));
        for &other in &entities {
            if !removed.contains(&other) {
                assert_eq!(registry.get::<Position>(other), Some(&Position(other.index() as i32 * 10)));
            }
        }
    }
}

#[test]
fn test_view_matches_brute_force() {
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut registry = lenient();
        churn(&mut registry, &mut rng, 1500);

        let expected: HashSet<Entity> = registry
            .entities()
            .filter(|&e| {
                registry.has::<Position>(e) && registry.has::<Velocity>(e) && !registry.has::<Frozen>(e)
            })
            .collect();

        let view = registry.view::<(Position, Velocity)>().exclude::<(Frozen,)>();
        let actual: Vec<Entity> = view.iter().collect();
        let actual_set: HashSet<Entity> = actual.iter().copied().collect();

        assert_eq!(actual.len(), actual_set.len(), "seed {seed} yielded duplicates");
        assert_eq!(actual_set, expected, "seed {seed}");
        assert_eq!(view.count(), expected.len());

        for (entity, (position, velocity)) in view.each() {
            assert_eq!(registry.get::<Position>(entity), Some(position));
            assert_eq!(registry.get::<Velocity>(entity), Some(velocity));
        }
    }
}

#[test]
fn test_recycling_scenario() {
    let mut registry = Registry::new();
    let first: Vec<Entity> = (0..1000).map(|_| registry.create()).collect();

    for entity in first.iter().step_by(2) {
        assert!(registry.destroy(*entity));
    }
    assert_eq!(registry.len(), 500);

    let second: Vec<Entity> = (0..500).map(|_| registry.create()).collect();
    assert_eq!(registry.recycled_count(), 500);
    assert_eq!(registry.capacity(), 1000);
    assert_eq!(registry.len(), 1000);

    let survivors: HashSet<Entity> = first.iter().skip(1).step_by(2).copied().collect();
    for entity in &second {
        assert_eq!(entity.generation(), 1);
        assert_eq!(entity.index() % 2, 0);
        assert!(!survivors.contains(entity));
    }
    for entity in first.iter().step_by(2) {
        assert!(!registry.is_alive(*entity));
    }
}

#[test]
fn test_swap_remove_reorders_view() {
    let mut registry = Registry::new();
    let entities: Vec<Entity> = (0..4).map(|_| registry.create()).collect();
    for (i, &e) in entities.iter().enumerate() {
        registry.add(e, Position(i as i32));
    }

    let before: Vec<Entity> = registry.view::<(Position,)>().iter().collect();
    assert_eq!(before, entities);

    registry.remove::<Position>(entities[0]);
    let after: Vec<Entity> = registry.view::<(Position,)>().iter().collect();

    // The last dense element fills the hole
    assert_eq!(after, vec![entities[3], entities[1], entities[2]]);
    assert_eq!(registry.get::<Position>(entities[3]), Some(&Position(3)));
}

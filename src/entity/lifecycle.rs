//! Two-phase death: mark during the tick, dispose at one sweep point
//!
//! Systems only ever set `body.dead`. [`sweep_dead`] runs once per tick
//! after every interaction rule and is the only place entities leave the
//! arena, their bucket and their parent's child list.

use crate::core::types::EntityId;
use crate::ecs::world::World;
use crate::entity::{spawn, Entity, Kind};

/// Dispose every entity marked dead. Children of a disposed entity go with
/// it whether or not they were marked. Returns how many entities left.
pub fn sweep_dead(world: &mut World) -> usize {
    let mut doomed = Vec::new();
    for kind in Kind::ALL {
        for &id in world.store.for_kind(kind) {
            if world.get(id).map(|e| e.body.dead).unwrap_or(false) {
                doomed.push(id);
            }
        }
    }

    let mut disposed = 0;
    for id in doomed {
        disposed += dispose(world, id);
    }
    if disposed > 0 {
        tracing::trace!("Swept {} entities", disposed);
    }
    disposed
}

/// Remove one entity and everything it owns
fn dispose(world: &mut World, root: EntityId) -> usize {
    let mut stack = vec![root];
    let mut count = 0;

    while let Some(id) = stack.pop() {
        let Some(entity) = world.remove_entity(id) else {
            continue;
        };
        count += 1;

        if let Some(parent) = entity.parent {
            if let Some(physics) = world.get_mut(parent).and_then(|p| p.physics.as_mut()) {
                physics.children.retain(|child| *child != id);
            }
        }

        stack.extend(entity.children().iter().copied());
        on_dispose(world, &entity);
    }
    count
}

/// Dispose hook: destroyed craft and structures leave a debris burst
fn on_dispose(world: &mut World, entity: &Entity) {
    let kind = entity.kind();
    if !(kind.is_craft() || kind == Kind::Structure) {
        return;
    }

    let count = world.config.particles.debris_count;
    let speed = world.config.particles.debris_speed;
    let lifetime = world.config.particles.lifetime;
    let origin = entity.body.position;
    let drift = entity.body.velocity * 0.5;

    for _ in 0..count {
        let scatter = world.random_unit() * (speed * world.random_f32());
        let mut debris = spawn::particle(origin, drift + scatter, lifetime, false);
        debris.body.alt_space = entity.body.alt_space;
        world.spawn_particle(debris);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::{Faction, Vec2};
    use crate::entity::{Pilot, StructureRole};

    fn world() -> World {
        let mut config = SimulationConfig::default();
        config.particles.debris_count = 0;
        World::new(config)
    }

    #[test]
    fn test_marked_entity_stays_until_sweep() {
        let mut w = world();
        let id = w.spawn(spawn::particle(Vec2::ZERO, Vec2::ZERO, 10.0, false));
        w.kill(id);
        assert!(w.store.contains(id, Kind::Particle));
        assert_eq!(sweep_dead(&mut w), 1);
        assert!(!w.contains(id));
        assert!(!w.store.contains(id, Kind::Particle));
    }

    #[test]
    fn test_parent_cascades_to_children() {
        let mut w = world();
        let config = w.config.clone();
        let hive = w.spawn(spawn::structure(
            &config,
            Faction::Hostile,
            StructureRole::Hive,
            Vec2::new(50.0, 50.0),
        ));
        let a = w.spawn(spawn::swarmer(&config, Vec2::ZERO, Some(hive)));
        let b = w.spawn(spawn::swarmer(&config, Vec2::ZERO, Some(hive)));

        w.kill(hive);
        assert_eq!(sweep_dead(&mut w), 3);
        assert!(!w.contains(a) && !w.contains(b));
        assert_eq!(w.entity_count(), 0);
    }

    #[test]
    fn test_child_detaches_from_parent() {
        let mut w = world();
        let config = w.config.clone();
        let hive = w.spawn(spawn::structure(
            &config,
            Faction::Hostile,
            StructureRole::Hive,
            Vec2::new(50.0, 50.0),
        ));
        let a = w.spawn(spawn::swarmer(&config, Vec2::ZERO, Some(hive)));
        let b = w.spawn(spawn::swarmer(&config, Vec2::ZERO, Some(hive)));

        w.kill(a);
        sweep_dead(&mut w);
        assert_eq!(w.get(hive).unwrap().children(), &[b]);
    }

    #[test]
    fn test_destroyed_craft_leaves_debris() {
        let mut config = SimulationConfig::default();
        config.particles.debris_count = 5;
        let mut w = World::new(config.clone());
        let id = w.spawn(spawn::hostile_craft(
            &config,
            Vec2::new(100.0, 100.0),
            0.0,
            Pilot::Idle,
            false,
        ));
        w.kill(id);
        sweep_dead(&mut w);
        assert_eq!(w.live_count(Kind::Particle), 5);
        assert_eq!(w.live_count(Kind::Hostile), 0);
    }
}

//! Craft abilities
//!
//! | Ability     | Effect                                              |
//! |-------------|-----------------------------------------------------|
//! | Stasis      | Damping zone at the craft, removed by a countdown   |
//! | Singularity | Collapsing well launched ahead of the craft         |
//! | Phase       | Craft moves to alternate space for a while          |
//! | Overcharge  | The next shot is high-energy                        |

use crate::core::types::{EntityId, Vec2};
use crate::ecs::world::World;
use crate::entity::AbilityKind;
use crate::force::ForceField;
use crate::simulation::events::SimulationEvent;

/// How far ahead of the nose a singularity is placed
const SINGULARITY_OFFSET: f32 = 60.0;
/// Drift speed of a launched singularity
const SINGULARITY_DRIFT: f32 = 0.5;

/// Use the craft's ability if it is off cooldown and affordable
pub fn trigger(world: &mut World, id: EntityId) -> bool {
    let (kind, position, heading, faction, slot) = {
        let Some(entity) = world.get_mut(id) else {
            return false;
        };
        if entity.body.dead {
            return false;
        }
        let position = entity.body.position;
        let heading = entity.heading();
        let faction = entity.faction();
        let slot = entity.payload.player_slot();
        let Some(vehicle) = entity.vehicle.as_mut() else {
            return false;
        };
        let cost = vehicle.ability.cost;
        if !vehicle.ability.ready() || !vehicle.spend(cost) {
            return false;
        }
        vehicle.ability.trigger();
        (vehicle.ability.kind, position, heading, faction, slot)
    };

    match kind {
        AbilityKind::Stasis => {
            let Some(faction) = faction else {
                return false;
            };
            let field_id = world.next_field_id();
            let field =
                ForceField::damping(field_id, position, &world.config.force, Some(id), faction);
            world.add_field(field);
            let duration = world.config.force.damping_duration;
            world.pending.after(duration, move |w| {
                w.mark_field_dead(field_id);
            });
        }
        AbilityKind::Singularity => {
            let forward = Vec2::from_angle(heading);
            let at = world.torus.wrap(position + forward * SINGULARITY_OFFSET);
            let mut field =
                ForceField::well(world.next_field_id(), at, &world.config.force, Some(id), faction);
            field.velocity = forward * SINGULARITY_DRIFT;
            world.add_field(field);
        }
        AbilityKind::Phase => {
            if let Some(entity) = world.get_mut(id) {
                entity.body.alt_space = true;
            }
            let duration = world.config.craft.phase_duration;
            world.pending.after(duration, move |w| {
                if let Some(entity) = w.get_mut(id) {
                    entity.body.alt_space = false;
                }
            });
        }
        AbilityKind::Overcharge => {
            if let Some(vehicle) = world.get_mut(id).and_then(|e| e.vehicle.as_mut()) {
                vehicle.overcharged = true;
            }
        }
    }

    if let Some(slot) = slot {
        tracing::debug!("Player {:?} used {:?}", slot, kind);
        world.events.push(SimulationEvent::AbilityUsed {
            slot,
            ability: kind,
        });
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::PlayerSlot;
    use crate::entity::spawn;
    use crate::schedule::run_scheduler;

    fn craft(world: &mut World, ability: AbilityKind) -> EntityId {
        let config = world.config.clone();
        world.spawn(spawn::player_craft(
            &config,
            PlayerSlot(0),
            Vec2::new(300.0, 300.0),
            0.0,
            ability,
        ))
    }

    #[test]
    fn test_cost_and_cooldown() {
        let mut world = World::new(SimulationConfig::default());
        let id = craft(&mut world, AbilityKind::Overcharge);
        assert!(trigger(&mut world, id));
        assert!(!trigger(&mut world, id));
        let vehicle = world.get(id).unwrap().vehicle.clone().unwrap();
        assert!(vehicle.overcharged);
        assert_eq!(vehicle.energy, world.config.craft.player_max_energy - world.config.craft.ability_cost);
    }

    #[test]
    fn test_stasis_zone_lives_for_duration() {
        let mut config = SimulationConfig::default();
        config.force.damping_duration = 3;
        let mut world = World::new(config);
        let id = craft(&mut world, AbilityKind::Stasis);
        assert!(trigger(&mut world, id));
        assert!(world.fields.is_empty());

        // The countdown fires on the third drain after scheduling
        run_scheduler(&mut world);
        assert_eq!(world.fields.len(), 1);
        run_scheduler(&mut world);
        assert!(!world.fields[0].dead);
        run_scheduler(&mut world);
        assert!(world.fields[0].dead);
        // Dropped at the following flush
        run_scheduler(&mut world);
        assert!(world.fields.is_empty());
    }

    #[test]
    fn test_phase_returns_after_duration() {
        let mut config = SimulationConfig::default();
        config.craft.phase_duration = 2;
        let mut world = World::new(config);
        let id = craft(&mut world, AbilityKind::Phase);
        assert!(trigger(&mut world, id));
        assert!(world.get(id).unwrap().body.alt_space);
        run_scheduler(&mut world);
        assert!(world.get(id).unwrap().body.alt_space);
        run_scheduler(&mut world);
        assert!(!world.get(id).unwrap().body.alt_space);
    }

    #[test]
    fn test_singularity_placed_ahead() {
        let mut world = World::new(SimulationConfig::default());
        let id = craft(&mut world, AbilityKind::Singularity);
        assert!(trigger(&mut world, id));
        run_scheduler(&mut world);
        let field = &world.fields[0];
        assert_eq!(field.position, Vec2::new(360.0, 300.0));
        assert_eq!(field.owner, Some(id));
    }
}

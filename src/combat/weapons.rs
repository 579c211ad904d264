//! Weapon firing

use crate::core::types::{EntityId, Vec2};
use crate::ecs::world::World;
use crate::entity::spawn::{self, Shot};
use crate::entity::ProjectileClass;
use crate::simulation::events::SimulationEvent;

/// Damage multiplier for an overcharged shot
pub const OVERCHARGE_DAMAGE: f32 = 2.0;

/// Fire the weapon of `shooter` if it is ready and affordable. The shot
/// leaves just ahead of the craft's nose, carrying the craft's velocity.
pub fn fire(world: &mut World, shooter: EntityId) -> Option<EntityId> {
    let mut shot = {
        let entity = world.get_mut(shooter)?;
        if entity.body.dead {
            return None;
        }
        let forward = Vec2::from_angle(entity.heading());
        let faction = entity.faction()?;
        let body = entity.body.clone();

        let vehicle = entity.vehicle.as_mut()?;
        let cost = vehicle.weapon.energy_cost;
        if !vehicle.weapon.ready() || !vehicle.spend(cost) {
            return None;
        }
        vehicle.weapon.trigger();

        let (class, damage) = if vehicle.overcharged {
            vehicle.overcharged = false;
            (
                ProjectileClass::HighEnergy,
                vehicle.weapon.damage * OVERCHARGE_DAMAGE,
            )
        } else {
            (vehicle.weapon.class, vehicle.weapon.damage)
        };

        let weapon = &vehicle.weapon;
        Shot {
            position: body.position + forward * (body.radius + weapon.projectile_radius + 1.0),
            velocity: body.velocity + forward * weapon.projectile_speed,
            radius: weapon.projectile_radius,
            owner: Some(shooter),
            faction,
            class,
            damage,
            ttl: weapon.ttl,
            alt_space: body.alt_space,
        }
    };

    shot.position = world.torus.wrap(shot.position);
    let class = shot.class;
    let projectile = world.spawn(spawn::projectile(&shot));
    world.events.push(SimulationEvent::Fired {
        shooter,
        projectile,
        class,
    });
    Some(projectile)
}

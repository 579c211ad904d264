//! Species constructors
//!
//! Each species is a combination of tiers plus a payload. Constructors only
//! build the record; `World::spawn` puts it into the arena and store.

use crate::core::config::SimulationConfig;
use crate::core::types::{EntityId, Faction, PlayerSlot, Vec2};
use crate::entity::body::{
    Ability, AbilityKind, Body, Physics, Propulsion, Shield, Vehicle, Weapon,
};
use crate::entity::payload::{
    Payload, PickupEffect, Pilot, ProjectileClass, ProjectileState, StructureRole,
};
use crate::entity::Entity;

fn player_weapon(config: &SimulationConfig) -> Weapon {
    let c = &config.craft;
    Weapon {
        class: ProjectileClass::Standard,
        cooldown_ticks: c.weapon_cooldown,
        remaining: 0,
        energy_cost: c.weapon_energy_cost,
        projectile_speed: c.projectile_speed,
        projectile_radius: c.projectile_radius,
        damage: c.projectile_damage,
        ttl: c.projectile_ttl,
    }
}

/// Player craft: full vehicle with kinetic shield
pub fn player_craft(
    config: &SimulationConfig,
    slot: PlayerSlot,
    position: Vec2,
    heading: f32,
    ability: AbilityKind,
) -> Entity {
    let c = &config.craft;
    let physics = Physics::new(c.player_mass)
        .with_heading(heading)
        .with_propulsion(Propulsion::new(
            c.player_thrust,
            c.player_thrust_cost,
            c.pulse_every,
        ));
    let vehicle = Vehicle {
        energy: c.player_max_energy,
        max_energy: c.player_max_energy,
        regen: c.player_regen,
        integrity: c.player_integrity,
        max_integrity: c.player_integrity,
        weapon: player_weapon(config),
        ability: Ability::new(ability, c.ability_cost, c.ability_cooldown),
        shield: Some(Shield {
            radius: c.shield_radius,
            bounce_cost: c.shield_bounce_cost,
        }),
        overcharged: false,
    };

    Entity::new(
        Body::new(position, c.player_radius),
        Payload::PlayerCraft { slot },
    )
    .with_physics(physics)
    .with_vehicle(vehicle)
}

/// Hostile craft: vehicle without shield unless asked for one
pub fn hostile_craft(
    config: &SimulationConfig,
    position: Vec2,
    heading: f32,
    pilot: Pilot,
    shielded: bool,
) -> Entity {
    let c = &config.craft;
    let physics = Physics::new(c.hostile_mass)
        .with_heading(heading)
        .with_propulsion(Propulsion::new(c.hostile_thrust, 0.0, 0));
    let mut weapon = player_weapon(config);
    weapon.cooldown_ticks = c.hostile_weapon_cooldown;
    weapon.energy_cost = 0.0;
    let vehicle = Vehicle {
        energy: c.player_max_energy,
        max_energy: c.player_max_energy,
        regen: c.player_regen,
        integrity: c.hostile_integrity,
        max_integrity: c.hostile_integrity,
        weapon,
        // Hostile pilots never trigger abilities
        ability: Ability::new(AbilityKind::Stasis, c.ability_cost, c.ability_cooldown),
        shield: shielded.then(|| Shield {
            radius: c.hostile_radius + 6.0,
            bounce_cost: c.shield_bounce_cost,
        }),
        overcharged: false,
    };

    Entity::new(
        Body::new(position, c.hostile_radius),
        Payload::HostileCraft {
            kill_value: config.combat.hostile_kill_value,
            pilot,
            target: None,
        },
    )
    .with_physics(physics)
    .with_vehicle(vehicle)
}

/// Homing swarmer, usually owned by a hive
pub fn swarmer(config: &SimulationConfig, position: Vec2, parent: Option<EntityId>) -> Entity {
    let c = &config.craft;
    let entity = Entity::new(
        Body::new(position, c.swarmer_radius),
        Payload::Swarmer {
            kill_value: config.combat.swarmer_kill_value,
            target: None,
            thrust: c.swarmer_thrust,
            max_speed: c.swarmer_max_speed,
        },
    )
    .with_physics(Physics::new(c.swarmer_mass));

    match parent {
        Some(parent) => entity.with_parent(parent),
        None => entity,
    }
}

/// Launch parameters for a projectile
#[derive(Debug, Clone)]
pub struct Shot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub owner: Option<EntityId>,
    pub faction: Faction,
    pub class: ProjectileClass,
    pub damage: f32,
    pub ttl: u32,
    pub alt_space: bool,
}

pub fn projectile(shot: &Shot) -> Entity {
    let mut body = Body::new(shot.position, shot.radius).with_velocity(shot.velocity);
    body.alt_space = shot.alt_space;
    Entity::new(
        body,
        Payload::Projectile(ProjectileState {
            owner: shot.owner,
            faction: shot.faction,
            credit: shot.faction.slot(),
            class: shot.class,
            damage: shot.damage,
            ttl: shot.ttl,
            max_ttl: shot.ttl,
            last_hit: None,
        }),
    )
}

pub fn particle(position: Vec2, velocity: Vec2, lifetime: f32, inert: bool) -> Entity {
    Entity::new(
        Body::new(position, 1.0).with_velocity(velocity),
        Payload::Particle {
            age: 0.0,
            lifetime,
            inert,
        },
    )
}

pub fn pickup(config: &SimulationConfig, position: Vec2, effect: PickupEffect) -> Entity {
    Entity::new(
        Body::new(position, config.structures.pickup_radius),
        Payload::Pickup {
            effect,
            ttl: config.structures.pickup_lifetime,
        },
    )
}

/// Stationary support structure
pub fn structure(
    config: &SimulationConfig,
    faction: Faction,
    role: StructureRole,
    position: Vec2,
) -> Entity {
    let s = &config.structures;
    Entity::new(
        Body::new(position, s.radius),
        Payload::Structure {
            faction,
            role,
            kill_value: config.combat.structure_kill_value,
            integrity: s.integrity,
        },
    )
    .with_physics(Physics::new(s.mass))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Kind;

    #[test]
    fn test_player_has_all_tiers() {
        let config = SimulationConfig::default();
        let p = player_craft(
            &config,
            PlayerSlot(0),
            Vec2::new(1.0, 2.0),
            0.0,
            AbilityKind::Stasis,
        );
        assert_eq!(p.kind(), Kind::Player);
        assert!(p.physics.is_some());
        assert!(p.vehicle.as_ref().unwrap().shield.is_some());
        assert_eq!(p.faction(), Some(Faction::Player(PlayerSlot(0))));
    }

    #[test]
    fn test_projectile_credit_follows_faction() {
        let shot = Shot {
            position: Vec2::ZERO,
            velocity: Vec2::new(1.0, 0.0),
            radius: 1.0,
            owner: None,
            faction: Faction::Player(PlayerSlot(2)),
            class: ProjectileClass::Standard,
            damage: 1.0,
            ttl: 5,
            alt_space: false,
        };
        let p = projectile(&shot);
        let state = p.payload.projectile().unwrap();
        assert_eq!(state.credit, Some(PlayerSlot(2)));
        assert_eq!(state.max_ttl, 5);
    }

    #[test]
    fn test_swarmer_parent() {
        let config = SimulationConfig::default();
        let hive = EntityId::new();
        let s = swarmer(&config, Vec2::ZERO, Some(hive));
        assert_eq!(s.parent, Some(hive));
        assert_eq!(s.kind(), Kind::Swarmer);
    }
}

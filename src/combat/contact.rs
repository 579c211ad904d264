//! Body-contact rules: ramming swarmers, pickups, relay recharge

use crate::combat::reaction::record_kill;
use crate::core::types::EntityId;
use crate::ecs::world::World;
use crate::entity::{Kind, Payload, PickupEffect, StructureRole};
use crate::simulation::events::SimulationEvent;

/// True if both are alive, share a space and overlap within `extra` margin
fn touching(world: &World, a: EntityId, b: EntityId, extra: f32) -> bool {
    let (Some(a), Some(b)) = (world.get(a), world.get(b)) else {
        return false;
    };
    if a.body.dead || b.body.dead || !a.shares_space_with(b) {
        return false;
    }
    let reach = a.body.radius + b.body.radius + extra;
    world.torus.distance_sq(a.body.position, b.body.position) < reach * reach
}

/// A swarmer that reaches a player dies on impact. The player's shield
/// soaks the hit with energy if it can, otherwise the hull takes it.
pub fn swarmer_player(world: &mut World, swarmer: EntityId, player: EntityId) {
    if !touching(world, swarmer, player, 0.0) {
        return;
    }
    let damage = world.config.combat.swarmer_contact_damage;
    let player_kill_value = world.config.combat.player_kill_value;

    world.kill(swarmer);
    world.events.push(SimulationEvent::Kill {
        victim: swarmer,
        victim_kind: Kind::Swarmer,
        credit: None,
        value: 0,
    });

    let Some(entity) = world.get_mut(player) else {
        return;
    };
    let slot = entity.payload.player_slot();
    let Some(vehicle) = entity.vehicle.as_mut() else {
        return;
    };
    let destroyed = if vehicle.active_shield().is_some() {
        vehicle.energy = (vehicle.energy - damage).max(0.0);
        false
    } else {
        vehicle.damage(damage)
    };

    if destroyed && world.kill(player) {
        record_kill(world, player, Kind::Player, None, player_kill_value, slot);
    }
}

/// Collect a pickup: apply its effect to the player and remove it
pub fn player_pickup(world: &mut World, player: EntityId, pickup: EntityId) {
    if !touching(world, player, pickup, 0.0) {
        return;
    }
    let Some(Payload::Pickup { effect, .. }) = world.get(pickup).map(|p| p.payload.clone()) else {
        return;
    };
    let Some(slot) = world.get(player).and_then(|p| p.payload.player_slot()) else {
        return;
    };

    match effect {
        PickupEffect::Energy(amount) => {
            if let Some(vehicle) = world.get_mut(player).and_then(|p| p.vehicle.as_mut()) {
                vehicle.recharge(amount);
            }
        }
        PickupEffect::Repair(amount) => {
            if let Some(vehicle) = world.get_mut(player).and_then(|p| p.vehicle.as_mut()) {
                vehicle.integrity = (vehicle.integrity + amount).min(vehicle.max_integrity);
            }
        }
        PickupEffect::Score(points) => world.scoreboard.award(slot, points),
    }

    world.kill(pickup);
    world.events.push(SimulationEvent::PickupCollected { slot, pickup });
}

/// Allied relays recharge player craft within their radius
pub fn relay_player(world: &mut World, relay: EntityId, player: EntityId) {
    let rate = world.config.structures.relay_rate;
    let radius = world.config.structures.relay_radius;

    let allied = match (world.get(relay), world.get(player)) {
        (Some(r), Some(p)) => match (&r.payload, p.faction()) {
            (
                Payload::Structure {
                    role: StructureRole::Relay,
                    faction,
                    ..
                },
                Some(player_faction),
            ) => !faction.is_hostile_to(&player_faction),
            _ => false,
        },
        _ => false,
    };
    if !allied || !touching(world, relay, player, radius) {
        return;
    }

    if let Some(vehicle) = world.get_mut(player).and_then(|p| p.vehicle.as_mut()) {
        vehicle.recharge(rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::{Faction, PlayerSlot, Vec2};
    use crate::entity::{spawn, AbilityKind};

    fn world() -> World {
        let mut config = SimulationConfig::default();
        config.particles.debris_count = 0;
        World::new(config)
    }

    fn player(world: &mut World, at: Vec2) -> EntityId {
        let config = world.config.clone();
        world.spawn(spawn::player_craft(&config, PlayerSlot(0), at, 0.0, AbilityKind::Stasis))
    }

    #[test]
    fn test_shield_soaks_swarmer() {
        let mut w = world();
        let config = w.config.clone();
        let p = player(&mut w, Vec2::new(100.0, 100.0));
        let s = w.spawn(spawn::swarmer(&config, Vec2::new(110.0, 100.0), None));

        swarmer_player(&mut w, s, p);
        assert!(!w.is_alive(s));
        let vehicle = w.get(p).unwrap().vehicle.clone().unwrap();
        assert_eq!(vehicle.energy, config.craft.player_max_energy - config.combat.swarmer_contact_damage);
        assert_eq!(vehicle.integrity, config.craft.player_integrity);
    }

    #[test]
    fn test_unshielded_hull_takes_hit() {
        let mut w = world();
        let config = w.config.clone();
        let p = player(&mut w, Vec2::new(100.0, 100.0));
        w.get_mut(p).unwrap().vehicle.as_mut().unwrap().energy = 0.0;
        let s = w.spawn(spawn::swarmer(&config, Vec2::new(110.0, 100.0), None));

        swarmer_player(&mut w, s, p);
        let vehicle = w.get(p).unwrap().vehicle.clone().unwrap();
        assert_eq!(vehicle.integrity, config.craft.player_integrity - config.combat.swarmer_contact_damage);
    }

    #[test]
    fn test_distant_swarmer_ignored() {
        let mut w = world();
        let config = w.config.clone();
        let p = player(&mut w, Vec2::new(100.0, 100.0));
        let s = w.spawn(spawn::swarmer(&config, Vec2::new(300.0, 100.0), None));
        swarmer_player(&mut w, s, p);
        assert!(w.is_alive(s));
    }

    #[test]
    fn test_pickup_score() {
        let mut w = world();
        let config = w.config.clone();
        let p = player(&mut w, Vec2::new(100.0, 100.0));
        let item = w.spawn(spawn::pickup(&config, Vec2::new(105.0, 100.0), PickupEffect::Score(25)));

        player_pickup(&mut w, p, item);
        assert!(!w.is_alive(item));
        assert_eq!(w.scoreboard.score(PlayerSlot(0)), 25);
    }

    #[test]
    fn test_relay_recharges_allies_only() {
        let mut w = world();
        let config = w.config.clone();
        let p = player(&mut w, Vec2::new(100.0, 100.0));
        w.get_mut(p).unwrap().vehicle.as_mut().unwrap().energy = 10.0;
        let ally = w.spawn(spawn::structure(
            &config,
            Faction::Player(PlayerSlot(0)),
            StructureRole::Relay,
            Vec2::new(150.0, 100.0),
        ));
        let enemy = w.spawn(spawn::structure(
            &config,
            Faction::Hostile,
            StructureRole::Relay,
            Vec2::new(150.0, 100.0),
        ));

        relay_player(&mut w, enemy, p);
        assert_eq!(w.get(p).unwrap().vehicle.as_ref().unwrap().energy, 10.0);
        relay_player(&mut w, ally, p);
        assert_eq!(
            w.get(p).unwrap().vehicle.as_ref().unwrap().energy,
            10.0 + config.structures.relay_rate
        );
    }
}

//! Arena population: players, hostiles, hives, relays and pickup drops
//!
//! Hives and pickup drops run on jittered periodic schedules. Every delay is
//! drawn from the world RNG, so a seeded world replays identically.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Faction, PlayerSlot, TaskId, Vec2};
use crate::ecs::world::World;
use crate::entity::{spawn, AbilityKind, Kind, PickupEffect, Pilot, ProjectileClass, StructureRole};
use crate::simulation::events::SimulationEvent;

/// Hostiles and hives keep at least this far from player spawn points
const SPAWN_CLEARANCE: f32 = 150.0;
/// Attempts at finding a clear spot before taking whatever came up
const PLACEMENT_TRIES: usize = 8;
/// Relays sit this far from their player's spawn point, toward the center
const RELAY_OFFSET: f32 = 80.0;

/// What to put into a fresh arena
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    /// One ability per player; the index is the player slot
    pub players: Vec<AbilityKind>,
    pub hunters: usize,
    /// Hunters among `hunters` that carry a shield and fire splitting shots
    pub shielded_hunters: usize,
    pub drifters: usize,
    pub hives: usize,
    /// One allied relay per player
    pub relays: bool,
    pub pickups: bool,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            players: vec![AbilityKind::Singularity, AbilityKind::Stasis],
            hunters: 3,
            shielded_hunters: 1,
            drifters: 2,
            hives: 1,
            relays: true,
            pickups: true,
        }
    }
}

/// Where slot `index` of `count` starts, and the heading facing the center
fn start_point(world: &World, index: usize, count: usize) -> (Vec2, f32) {
    let center = world.torus.center();
    let radius = world.torus.width.min(world.torus.height) / 3.0;
    let angle = index as f32 * TAU / count.max(1) as f32;
    let position = world.torus.wrap(center + Vec2::from_angle(angle) * radius);
    (position, (center - position).angle())
}

/// A random position clear of every live player, if one turns up
fn clear_position(world: &mut World) -> Vec2 {
    let players: Vec<Vec2> = world
        .ids(Kind::Player)
        .into_iter()
        .filter_map(|id| world.get(id))
        .filter(|e| e.is_alive())
        .map(|e| e.body.position)
        .collect();

    let mut candidate = world.random_position();
    for _ in 0..PLACEMENT_TRIES {
        let clear = players
            .iter()
            .all(|p| world.torus.distance(*p, candidate) >= SPAWN_CLEARANCE);
        if clear {
            break;
        }
        candidate = world.random_position();
    }
    candidate
}

/// Fill the arena. Returns player craft ids in slot order.
pub fn populate(world: &mut World, layout: &ArenaLayout) -> Vec<EntityId> {
    let count = layout.players.len();
    let mut players = Vec::with_capacity(count);

    for (index, ability) in layout.players.iter().enumerate() {
        let slot = PlayerSlot(index as u8);
        let (position, heading) = start_point(world, index, count);
        let craft = spawn::player_craft(&world.config, slot, position, heading, *ability);
        players.push(world.spawn(craft));
        world.scoreboard.entry(slot);

        if layout.relays {
            let toward_center = Vec2::from_angle(heading) * RELAY_OFFSET;
            let at = world.torus.wrap(position + toward_center);
            let relay = spawn::structure(&world.config, Faction::Player(slot), StructureRole::Relay, at);
            world.spawn(relay);
        }
    }

    for n in 0..layout.hunters {
        let at = clear_position(world);
        let heading = world.random_f32() * TAU;
        let shielded = n < layout.shielded_hunters;
        let mut craft = spawn::hostile_craft(&world.config, at, heading, Pilot::Hunter, shielded);
        if shielded {
            if let Some(vehicle) = craft.vehicle.as_mut() {
                vehicle.weapon.class = ProjectileClass::Splitting { generation: 2 };
            }
        }
        world.spawn(craft);
    }

    for _ in 0..layout.drifters {
        let at = clear_position(world);
        let heading = world.random_f32() * TAU;
        let mut craft = spawn::hostile_craft(&world.config, at, heading, Pilot::Idle, false);
        craft.body.velocity = world.random_unit() * 0.5;
        world.spawn(craft);
    }

    for _ in 0..layout.hives {
        let at = clear_position(world);
        let hive = world.spawn(spawn::structure(&world.config, Faction::Hostile, StructureRole::Hive, at));
        arm_hive(world, hive);
    }

    if layout.pickups {
        arm_pickup_drops(world);
    }

    tracing::info!(
        "Arena populated: {} players, {} hostiles, {} hives",
        count,
        layout.hunters + layout.drifters,
        layout.hives
    );
    players
}

fn jittered(world: &mut World, min: u32, max: u32) -> u32 {
    world.rng.gen_range(min..=max.max(min))
}

/// Start a hive's spawn schedule. The task cancels itself once the hive is
/// gone.
pub fn arm_hive(world: &mut World, hive: EntityId) -> TaskId {
    let task = world.pending.reserve_id();
    world.pending.every_keyed(
        task,
        |w| {
            let (min, max) = (w.config.structures.hive_spawn_min, w.config.structures.hive_spawn_max);
            jittered(w, min, max)
        },
        move |w| hive_spawn(w, hive, task),
    )
}

fn hive_spawn(world: &mut World, hive: EntityId, task: TaskId) {
    let (position, reach, alt_space) = {
        let Some(entity) = world.get(hive).filter(|e| e.is_alive()) else {
            world.cancel(task);
            return;
        };
        let owned = entity
            .children()
            .iter()
            .filter(|child| world.is_alive(**child))
            .count();
        if owned >= world.config.structures.hive_max_children {
            return;
        }
        (
            entity.body.position,
            entity.body.radius + world.config.craft.swarmer_radius + 2.0,
            entity.body.alt_space,
        )
    };

    let offset = world.random_unit() * reach;
    let at = world.torus.wrap(position + offset);
    let mut swarmer = spawn::swarmer(&world.config, at, Some(hive));
    swarmer.body.alt_space = alt_space;
    let child = world.spawn(swarmer);
    tracing::trace!("Hive {:?} released swarmer {:?}", hive, child);
    world.events.push(SimulationEvent::Spawned { parent: hive, child });
}

/// Drop a random pickup somewhere in the field on a jittered schedule
pub fn arm_pickup_drops(world: &mut World) -> TaskId {
    world.pending.every(
        |w| {
            let (min, max) = (
                w.config.structures.pickup_interval_min,
                w.config.structures.pickup_interval_max,
            );
            jittered(w, min, max)
        },
        |w| {
            let energy = w.config.structures.pickup_energy;
            let effect = match w.rng.gen_range(0..3) {
                0 => PickupEffect::Energy(energy),
                1 => PickupEffect::Repair(energy * 0.5),
                _ => PickupEffect::Score(w.config.structures.pickup_score),
            };
            let at = w.random_position();
            let item = spawn::pickup(&w.config, at, effect);
            w.spawn(item);
        },
    )
}

/// Bring a destroyed player back. Does nothing if the slot already has a
/// live craft.
pub fn respawn_player(world: &mut World, slot: PlayerSlot, ability: AbilityKind) -> Option<EntityId> {
    if world.player_entity(slot).is_some() {
        return None;
    }
    let at = world.random_position();
    let heading = world.random_f32() * TAU;
    let craft = spawn::player_craft(&world.config, slot, at, heading, ability);
    let id = world.spawn(craft);
    tracing::debug!("Player {:?} respawned as {:?}", slot, id);
    Some(id)
}

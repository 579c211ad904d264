//! Per-kind behavior and motion integration
//!
//! Behavior runs before force fields each tick. Aging and integration run
//! after them, so field impulses and potentials show up in the same tick.

use std::f32::consts::{PI, TAU};

use ordered_float::OrderedFloat;

use crate::combat::weapons;
use crate::core::types::{EntityId, Vec2};
use crate::ecs::world::World;
use crate::entity::{Kind, Payload, Pilot};
use crate::input;
use crate::spatial::TorusField;

/// Hunters stop closing in once this near their target
const HUNTER_STANDOFF: f32 = 120.0;
/// Idle pilots circle slowly
const IDLE_TURN: f32 = 0.01;

/// Signed smallest rotation from `from` to `to`, in `[-PI, PI)`
pub fn angle_between(from: f32, to: f32) -> f32 {
    (to - from + PI).rem_euclid(TAU) - PI
}

#[derive(Debug, Clone, Copy)]
struct Quarry {
    id: EntityId,
    position: Vec2,
    alt_space: bool,
}

fn live_players(world: &World) -> Vec<Quarry> {
    world
        .store
        .for_kind(Kind::Player)
        .iter()
        .filter_map(|id| world.get(*id))
        .filter(|e| e.is_alive())
        .map(|e| Quarry {
            id: e.id,
            position: e.body.position,
            alt_space: e.body.alt_space,
        })
        .collect()
}

fn nearest(torus: &TorusField, from: Vec2, alt_space: bool, players: &[Quarry]) -> Option<Quarry> {
    players
        .iter()
        .filter(|p| p.alt_space == alt_space)
        .min_by_key(|p| OrderedFloat(torus.distance_sq(from, p.position)))
        .copied()
}

/// Per-tick behavior: pilots, homing, regen and cooldowns
pub fn run_behaviors(world: &mut World) {
    let players = live_players(world);
    let retarget = world.clock.is_nth(world.config.timing.retarget_interval);

    pilot_hostiles(world, &players, retarget);
    steer_swarmers(world, &players, retarget);
    tick_vehicles(world);
}

fn pilot_hostiles(world: &mut World, players: &[Quarry], retarget: bool) {
    let torus = world.torus;
    let turn_rate = world.config.craft.hostile_turn_rate;
    let fire_arc = world.config.craft.hostile_fire_arc;

    for id in world.ids(Kind::Hostile) {
        let mut fire = false;
        let mut thrust = false;
        {
            let Some(entity) = world.get_mut(id) else {
                continue;
            };
            if entity.body.dead {
                continue;
            }
            let position = entity.body.position;
            let alt_space = entity.body.alt_space;
            let Payload::HostileCraft { pilot, target, .. } = &mut entity.payload else {
                continue;
            };

            let aim = match pilot {
                Pilot::Idle => None,
                Pilot::Hunter => {
                    let current = target.and_then(|t| players.iter().find(|p| p.id == t).copied());
                    let chosen = match current {
                        Some(quarry) if !retarget => Some(quarry),
                        _ => nearest(&torus, position, alt_space, players),
                    };
                    *target = chosen.map(|q| q.id);
                    chosen
                }
            };

            let Some(physics) = entity.physics.as_mut() else {
                continue;
            };
            match aim {
                Some(quarry) => {
                    let offset = torus.delta(position, quarry.position);
                    let error = angle_between(physics.heading, offset.angle());
                    physics.heading_rate = error.clamp(-turn_rate, turn_rate);
                    fire = error.abs() < fire_arc;
                    thrust = offset.length() > HUNTER_STANDOFF;
                }
                None => physics.heading_rate = IDLE_TURN,
            }
        }

        if thrust {
            input::thrust(world, id);
        }
        if fire {
            weapons::fire(world, id);
        }
    }
}

fn steer_swarmers(world: &mut World, players: &[Quarry], retarget: bool) {
    let torus = world.torus;

    for id in world.ids(Kind::Swarmer) {
        let Some(entity) = world.get_mut(id) else {
            continue;
        };
        if entity.body.dead {
            continue;
        }
        let position = entity.body.position;
        let alt_space = entity.body.alt_space;
        let Payload::Swarmer {
            target,
            thrust,
            max_speed,
            ..
        } = &mut entity.payload
        else {
            continue;
        };

        let current = target.and_then(|t| players.iter().find(|p| p.id == t).copied());
        let chosen = match current {
            Some(quarry) if !retarget => Some(quarry),
            _ => nearest(&torus, position, alt_space, players),
        };
        *target = chosen.map(|q| q.id);

        if let Some(quarry) = chosen {
            let pull = torus.direction(position, quarry.position) * *thrust;
            let limit = *max_speed;
            entity.body.velocity = (entity.body.velocity + pull).clamp_length(limit);
        }
    }
}

fn tick_vehicles(world: &mut World) {
    for kind in [Kind::Player, Kind::Hostile] {
        for id in world.ids(kind) {
            if let Some(vehicle) = world
                .get_mut(id)
                .filter(|e| e.is_alive())
                .and_then(|e| e.vehicle.as_mut())
            {
                vehicle.tick();
            }
        }
    }
}

/// Projectile and pickup lifetimes, particle aging. Particles age faster
/// out in the open and slower deep inside a field.
///
/// Reads the gravity potential written by this tick's force pass, so it
/// must run after `apply_force_fields`.
pub fn age_transients(world: &mut World) {
    for kind in [Kind::Projectile, Kind::Particle, Kind::Pickup] {
        for id in world.ids(kind) {
            let Some(entity) = world.get_mut(id) else {
                continue;
            };
            if entity.body.dead {
                continue;
            }
            let potential = entity.body.gravity_potential;
            let expired = match &mut entity.payload {
                Payload::Projectile(state) => {
                    state.ttl = state.ttl.saturating_sub(1);
                    state.ttl == 0
                }
                Payload::Particle { age, lifetime, .. } => {
                    *age += potential;
                    *age >= *lifetime
                }
                Payload::Pickup { ttl, .. } => {
                    *ttl = ttl.saturating_sub(1);
                    *ttl == 0
                }
                _ => false,
            };
            if expired {
                entity.body.dead = true;
            }
        }
    }
}

/// Heading, drag, speed caps and position. Wrapping kinds fold back into
/// the field; particles that leave it die instead.
pub fn integrate_motion(world: &mut World) {
    let torus = world.torus;
    let drag = world.config.craft.drag;
    let max_speed = world.config.craft.max_speed;

    for kind in Kind::ALL {
        for id in world.ids(kind) {
            let Some(entity) = world.get_mut(id) else {
                continue;
            };
            if entity.body.dead {
                continue;
            }

            if let Some(physics) = entity.physics.as_mut() {
                physics.heading = (physics.heading + physics.heading_rate).rem_euclid(TAU);
            }
            if kind.is_craft() {
                entity.body.velocity = (entity.body.velocity * (1.0 - drag)).clamp_length(max_speed);
            }

            let next = entity.body.position + entity.body.velocity;
            if kind.wraps() {
                entity.body.position = torus.wrap(next);
            } else if torus.is_outside(next) {
                entity.body.dead = true;
            } else {
                entity.body.position = next;
            }
        }
    }
}

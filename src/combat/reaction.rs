//! Projectile hit resolution
//!
//! Every hit is resolved in one fixed rule order:
//! 1. Default: the projectile dies
//! 2. Victim rule, chosen by `(ProjectileClass, Kind)`
//! 3. Class override (high-energy survival, splitting)
//! 4. Commit: the projectile's dead flag is written once
//!
//! Scoring, events and drawing only ever see the committed value.

use crate::core::types::{EntityId, Faction, PlayerSlot, Vec2};
use crate::ecs::world::World;
use crate::entity::spawn::{self, Shot};
use crate::entity::{Kind, Payload, ProjectileClass, ProjectileState};
use crate::simulation::events::SimulationEvent;
use crate::simulation::setup;

/// Outcome of one projectile striking one victim
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitResolution {
    /// Final value committed to the projectile's dead flag
    pub projectile_dies: bool,
    /// The victim rule demands the projectile's death regardless of class
    pub forced: bool,
    /// Reflected by a kinetic shield
    pub bounced: bool,
    pub damage: f32,
    pub victim_destroyed: bool,
    /// Generation of the children to release next tick
    pub split: Option<u8>,
}

/// Shield data captured at the moment of impact
#[derive(Debug, Clone, Copy)]
struct ShieldContact {
    center: Vec2,
    radius: f32,
    bounce_cost: f32,
}

/// Resolve a detected hit of `projectile` on `victim` at `contact`
pub fn resolve_hit(
    world: &mut World,
    projectile: EntityId,
    victim: EntityId,
    contact: Vec2,
) -> Option<HitResolution> {
    let (state, velocity, projectile_radius, alt_space) = {
        let p = world.get(projectile)?;
        (
            p.payload.projectile()?.clone(),
            p.body.velocity,
            p.body.radius,
            p.body.alt_space,
        )
    };
    let (victim_kind, shield) = {
        let v = world.get(victim)?;
        let shield = v
            .vehicle
            .as_ref()
            .and_then(|vehicle| vehicle.active_shield())
            .map(|s| ShieldContact {
                center: v.body.position,
                radius: s.radius,
                bounce_cost: s.bounce_cost,
            });
        (v.kind(), shield)
    };

    // 1. default
    let mut resolution = HitResolution {
        projectile_dies: true,
        ..Default::default()
    };

    // 2. victim rule
    match (state.class, victim_kind, shield) {
        (_, Kind::Player | Kind::Hostile, Some(shield)) => {
            bounce(world, projectile, victim, &state, velocity, projectile_radius, contact, shield);
            resolution.bounced = true;
            resolution.projectile_dies = false;
        }
        (_, Kind::Player | Kind::Hostile, None) => {
            resolution.damage = state.damage;
            resolution.victim_destroyed = world
                .get_mut(victim)
                .and_then(|v| v.vehicle.as_mut())
                .map(|vehicle| vehicle.damage(state.damage))
                .unwrap_or(false);
        }
        (_, Kind::Swarmer, _) => {
            resolution.damage = state.damage;
            resolution.victim_destroyed = true;
        }
        (_, Kind::Structure, _) => {
            resolution.damage = state.damage;
            resolution.forced = true;
            if let Some(Payload::Structure { integrity, .. }) =
                world.get_mut(victim).map(|v| &mut v.payload)
            {
                *integrity -= state.damage;
                resolution.victim_destroyed = *integrity <= 0.0;
            }
        }
        (_, Kind::Projectile | Kind::Particle | Kind::Pickup, _) => return None,
    }

    // 3. class override
    match state.class {
        ProjectileClass::HighEnergy if !resolution.forced && !resolution.bounced => {
            resolution.projectile_dies = false;
        }
        ProjectileClass::Splitting { generation } if resolution.projectile_dies && generation > 0 => {
            resolution.split = Some(generation - 1);
        }
        _ => {}
    }

    // 4. commit
    commit(world, projectile, victim, &resolution);

    if !resolution.bounced {
        world.events.push(SimulationEvent::Hit {
            projectile,
            victim,
            victim_kind,
            damage: resolution.damage,
            projectile_survived: !resolution.projectile_dies,
        });
    }
    if resolution.victim_destroyed && world.kill(victim) {
        let (value, slot) = world
            .get(victim)
            .map(|v| {
                (
                    v.payload.kill_value(world.config.combat.player_kill_value),
                    v.payload.player_slot(),
                )
            })
            .unwrap_or((0, None));
        record_kill(world, victim, victim_kind, state.credit, value, slot);
    }
    if let Some(generation) = resolution.split {
        schedule_split(world, projectile, &state, contact, velocity, projectile_radius, alt_space, generation);
    }

    Some(resolution)
}

fn commit(world: &mut World, projectile: EntityId, victim: EntityId, resolution: &HitResolution) {
    let Some(p) = world.get_mut(projectile) else {
        return;
    };
    p.body.dead = resolution.projectile_dies;
    if let Some(state) = p.payload.projectile_mut() {
        state.last_hit = Some(victim);
    }
}

/// Reflect off a shield: `r = d - 2(d·n)n`, pushed clear of the shield and
/// handed over to the shielder with a fresh lifetime
#[allow(clippy::too_many_arguments)]
fn bounce(
    world: &mut World,
    projectile: EntityId,
    shielder: EntityId,
    state: &ProjectileState,
    velocity: Vec2,
    projectile_radius: f32,
    contact: Vec2,
    shield: ShieldContact,
) {
    let torus = world.torus;
    let clearance = world.config.combat.bounce_clearance;
    let speed = velocity.length();
    let incoming = velocity.normalize();

    let mut normal = torus.direction(shield.center, contact);
    if normal == Vec2::ZERO {
        normal = -incoming;
    }
    let outgoing = incoming.reflect(&normal);
    let position = torus.wrap(shield.center + normal * (shield.radius + projectile_radius + clearance));

    let new_faction = world.get(shielder).and_then(|s| s.faction());
    if let Some(vehicle) = world.get_mut(shielder).and_then(|s| s.vehicle.as_mut()) {
        vehicle.energy = (vehicle.energy - shield.bounce_cost).max(0.0);
    }

    if let Some(p) = world.get_mut(projectile) {
        p.body.position = position;
        p.body.velocity = outgoing * speed;
        if let Some(s) = p.payload.projectile_mut() {
            s.owner = Some(shielder);
            if let Some(faction) = new_faction {
                s.faction = faction;
                s.credit = faction.slot();
            }
            s.ttl = state.max_ttl;
        }
    }

    tracing::trace!("Projectile {:?} bounced off {:?}", projectile, shielder);
    world.events.push(SimulationEvent::Bounce {
        projectile,
        shielder,
        position,
    });
}

/// Release the children of a dead splitting projectile on the next tick
#[allow(clippy::too_many_arguments)]
fn schedule_split(
    world: &mut World,
    parent: EntityId,
    state: &ProjectileState,
    origin: Vec2,
    velocity: Vec2,
    radius: f32,
    alt_space: bool,
    generation: u8,
) {
    let count = world.config.combat.split_count;
    let spread = world.config.combat.split_spread;
    let speed = velocity.length();
    let heading = velocity.angle();
    let faction = state.faction;
    let credit = state.credit;
    let damage = state.damage * 0.5;
    let ttl = (state.max_ttl / 2).max(1);

    world.pending.next_tick(move |w| {
        let half = (count.saturating_sub(1)) as f32 * 0.5;
        for i in 0..count {
            let angle = heading + (i as f32 - half) * spread;
            let shot = Shot {
                position: origin,
                velocity: Vec2::from_angle(angle) * speed,
                radius,
                owner: None,
                faction,
                class: ProjectileClass::Splitting { generation },
                damage,
                ttl,
                alt_space,
            };
            let mut child = spawn::projectile(&shot);
            if let Some(s) = child.payload.projectile_mut() {
                s.credit = credit;
            }
            w.spawn(child);
        }
        w.events.push(SimulationEvent::Split {
            parent,
            children: count as usize,
            generation,
        });
    });
}

/// Book a destruction: event, kill credit, and for player craft a death
/// plus a scheduled respawn
pub fn record_kill(
    world: &mut World,
    victim: EntityId,
    victim_kind: Kind,
    credit: Option<PlayerSlot>,
    value: i64,
    victim_slot: Option<PlayerSlot>,
) {
    // Never credit a player for their own craft
    let credit = credit.filter(|slot| Some(*slot) != victim_slot);
    if let Some(slot) = credit {
        world.scoreboard.record_kill(slot, value);
    }
    tracing::debug!("{} {:?} destroyed (credit {:?}, value {})", victim_kind, victim, credit, value);
    world.events.push(SimulationEvent::Kill {
        victim,
        victim_kind,
        credit,
        value,
    });

    if let Some(slot) = victim_slot {
        world.scoreboard.record_death(slot);
        let ability = world
            .get(victim)
            .and_then(|v| v.vehicle.as_ref())
            .map(|vehicle| vehicle.ability.kind);
        if let Some(ability) = ability {
            let delay = world.config.craft.respawn_delay;
            world.pending.after(delay, move |w| {
                setup::respawn_player(w, slot, ability);
            });
        }
    }
}

/// True if a projectile of `faction` may damage something of `other`
pub fn can_damage(faction: Faction, other: Option<Faction>) -> bool {
    other.map(|f| f.is_hostile_to(&faction)).unwrap_or(false)
}

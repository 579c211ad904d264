//! Collision and combat resolution
//!
//! Projectile hits are tested with sub-stepping and resolved through
//! [`reaction::resolve_hit`]. Contact rules cover everything that touches
//! without a projectile. All rules dispatch through `World::for_each_pair`.

pub mod collision;
pub mod contact;
pub mod reaction;
pub mod weapons;

pub use collision::{substep_count, Sweep};
pub use reaction::{record_kill, resolve_hit, HitResolution};

use crate::core::types::EntityId;
use crate::ecs::world::World;
use crate::entity::Kind;

/// Test every projectile against every target kind
pub fn resolve_projectile_hits(world: &mut World) {
    for kind in Kind::PROJECTILE_TARGETS {
        world.for_each_pair(Kind::Projectile, kind, projectile_pair);
    }
}

fn projectile_pair(world: &mut World, projectile: EntityId, victim: EntityId) {
    let threshold = world.config.combat.substep_threshold_sq;

    let contact = {
        let (Some(p), Some(v)) = (world.get(projectile), world.get(victim)) else {
            return;
        };
        if p.body.dead || v.body.dead || !p.shares_space_with(v) {
            return;
        }
        let Some(state) = p.payload.projectile() else {
            return;
        };
        if state.owner == Some(victim) || !reaction::can_damage(state.faction, v.faction()) {
            return;
        }

        let reach = v
            .vehicle
            .as_ref()
            .and_then(|vehicle| vehicle.active_shield())
            .map(|shield| shield.radius)
            .unwrap_or(v.body.radius);
        let sweep = Sweep {
            end: p.body.position,
            velocity: p.body.velocity,
            radius: p.body.radius,
        };
        let contact = sweep.first_contact(&world.torus, v.body.position, reach, threshold);

        // A survivor can hit the same victim again only after leaving it
        if state.last_hit == Some(victim) {
            if contact.is_none() {
                if let Some(state) = world
                    .get_mut(projectile)
                    .and_then(|p| p.payload.projectile_mut())
                {
                    state.last_hit = None;
                }
            }
            return;
        }
        contact
    };

    if let Some(contact) = contact {
        resolve_hit(world, projectile, victim, contact);
    }
}

/// Run the body-contact rules
pub fn resolve_contacts(world: &mut World) {
    world.for_each_pair(Kind::Swarmer, Kind::Player, contact::swarmer_player);
    world.for_each_pair(Kind::Player, Kind::Pickup, contact::player_pickup);
    world.for_each_pair(Kind::Structure, Kind::Player, contact::relay_player);
}

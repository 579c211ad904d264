//! Force field framework
//!
//! A field is a point source that acts on every live target in the buckets
//! it subscribes to. Each concrete field implements [`ForceLaw`]: a scalar
//! magnitude from target mass and distance, and a per-target response
//! (attract, repel, damp or ignore). The framework handles the wrap-aware
//! geometry, the gravity-potential accumulator and field bookkeeping.
//!
//! Fields enter and leave the active set only through the pending queue.
//! A field marked dead keeps acting until the next flush drops it.

pub mod damping;
pub mod pulse;
pub mod well;

pub use damping::DampingZone;
pub use pulse::RepulsivePulse;
pub use well::CollapsingWell;

use crate::combat::reaction::record_kill;
use crate::core::config::ForceConfig;
use crate::core::types::{EntityId, Faction, FieldId, PlayerSlot, Vec2};
use crate::ecs::world::World;
use crate::entity::{Entity, Kind, Payload};
use crate::simulation::events::SimulationEvent;

/// What a field knows about a target when choosing its response
#[derive(Debug, Clone, Copy)]
pub struct TargetInfo {
    pub kind: Kind,
    pub faction: Option<Faction>,
    /// Has a kinetic shield with enough energy to use it
    pub shielded: bool,
    pub mass: f32,
}

impl TargetInfo {
    pub fn of(entity: &Entity) -> Self {
        Self {
            kind: entity.kind(),
            faction: entity.faction(),
            shielded: entity
                .vehicle
                .as_ref()
                .map(|v| v.active_shield().is_some())
                .unwrap_or(false),
            mass: entity.mass(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    Attract,
    Repel,
    /// Scale velocity by `1 - coefficient * force`
    Damp(f32),
    Ignore,
}

pub trait ForceLaw {
    /// Scalar magnitude for a target of `mass` at `distance`
    fn force(&self, mass: f32, distance: f32) -> f32;

    fn response(&self, target: &TargetInfo) -> Response;

    /// Beyond this distance the field does nothing
    fn max_radius(&self) -> f32;

    fn subscribed(&self) -> &'static [Kind];

    /// Expensive fields skip inert particles
    fn is_expensive(&self) -> bool {
        true
    }
}

/// Multiplicative potential contribution: 0 at the source, 1 at `max_radius`
/// and beyond
pub fn inverse_potential(distance: f32, max_radius: f32) -> f32 {
    if max_radius <= 0.0 {
        return 1.0;
    }
    (distance / max_radius).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Well(CollapsingWell),
    Damping(DampingZone),
    Pulse(RepulsivePulse),
}

impl FieldKind {
    fn law(&self) -> &dyn ForceLaw {
        match self {
            FieldKind::Well(well) => well,
            FieldKind::Damping(zone) => zone,
            FieldKind::Pulse(pulse) => pulse,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Well(_) => "well",
            FieldKind::Damping(_) => "damping",
            FieldKind::Pulse(_) => "pulse",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForceField {
    pub id: FieldId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Never acted on by its own field
    pub owner: Option<EntityId>,
    pub faction: Option<Faction>,
    pub alt_space: bool,
    pub dead: bool,
    pub kind: FieldKind,
}

impl ForceField {
    pub fn new(id: FieldId, position: Vec2, kind: FieldKind) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            owner: None,
            faction: None,
            alt_space: false,
            dead: false,
            kind,
        }
    }

    pub fn well(
        id: FieldId,
        position: Vec2,
        config: &ForceConfig,
        owner: Option<EntityId>,
        faction: Option<Faction>,
    ) -> Self {
        Self {
            owner,
            faction,
            ..Self::new(id, position, FieldKind::Well(CollapsingWell::from_config(config)))
        }
    }

    pub fn damping(
        id: FieldId,
        position: Vec2,
        config: &ForceConfig,
        owner: Option<EntityId>,
        faction: Faction,
    ) -> Self {
        Self {
            owner,
            faction: Some(faction),
            ..Self::new(
                id,
                position,
                FieldKind::Damping(DampingZone::from_config(config, faction)),
            )
        }
    }

    pub fn pulse(
        id: FieldId,
        position: Vec2,
        config: &ForceConfig,
        owner: Option<EntityId>,
        faction: Option<Faction>,
        alt_space: bool,
    ) -> Self {
        Self {
            owner,
            faction,
            alt_space,
            ..Self::new(id, position, FieldKind::Pulse(RepulsivePulse::from_config(config)))
        }
    }

    pub fn law(&self) -> &dyn ForceLaw {
        self.kind.law()
    }

    /// Whether this field acts on `entity` at all this tick
    fn acts_on(&self, entity: &Entity) -> bool {
        if entity.body.dead || Some(entity.id) == self.owner {
            return false;
        }
        if entity.body.alt_space != self.alt_space {
            return false;
        }
        if self.law().is_expensive() {
            if let Payload::Particle { inert: true, .. } = entity.payload {
                return false;
            }
        }
        true
    }
}

/// What happened to a target that crossed a well's horizon
enum HorizonOutcome {
    Absorbed { kind: Kind, mass: f32 },
    Crushed { kind: Kind, value: i64, slot: Option<PlayerSlot> },
}

/// Apply every active field to its targets, then advance field state
pub fn apply_force_fields(world: &mut World) {
    for entity in world.entities_mut() {
        entity.body.gravity_potential = 1.0;
    }

    let torus = world.torus;
    let epsilon = world.config.force.epsilon;
    let player_kill_value = world.config.combat.player_kill_value;

    for index in 0..world.fields.len() {
        let mut field = world.fields[index].clone();
        let radius = field.law().max_radius();

        for &kind in field.law().subscribed() {
            for id in world.ids(kind) {
                let mut outcome = None;
                {
                    let Some(target) = world.get_mut(id) else {
                        continue;
                    };
                    if !field.acts_on(target) {
                        continue;
                    }

                    let info = TargetInfo::of(target);
                    let offset = torus.delta(target.body.position, field.position);
                    let distance = offset.length() + epsilon;
                    target.body.gravity_potential *= inverse_potential(distance, radius);
                    if distance > radius {
                        continue;
                    }

                    let toward = offset * (1.0 / distance);
                    let magnitude = field.law().force(info.mass, distance);
                    match field.law().response(&info) {
                        Response::Attract => target.body.velocity += toward * magnitude,
                        Response::Repel => target.body.velocity -= toward * magnitude,
                        Response::Damp(coefficient) => {
                            let keep = (1.0 - coefficient * magnitude).clamp(0.0, 1.0);
                            target.body.velocity *= keep;
                        }
                        Response::Ignore => {}
                    }

                    if let FieldKind::Well(well) = &mut field.kind {
                        if well.within_horizon(distance) {
                            if CollapsingWell::can_absorb(info.kind) {
                                target.body.dead = true;
                                well.absorb(info.mass);
                                outcome = Some(HorizonOutcome::Absorbed {
                                    kind: info.kind,
                                    mass: info.mass,
                                });
                            } else if let Some(vehicle) = target.vehicle.as_mut() {
                                if vehicle.damage(well.horizon_damage) {
                                    target.body.dead = true;
                                    outcome = Some(HorizonOutcome::Crushed {
                                        kind: info.kind,
                                        value: target.payload.kill_value(player_kill_value),
                                        slot: target.payload.player_slot(),
                                    });
                                }
                            }
                        }
                    }
                }

                match outcome {
                    Some(HorizonOutcome::Absorbed { kind, mass }) => {
                        tracing::debug!("Well {:?} absorbed {} (mass {:.1})", field.id, kind, mass);
                        world.events.push(SimulationEvent::Absorbed {
                            field: field.id,
                            victim: id,
                            victim_kind: kind,
                            mass,
                        });
                    }
                    Some(HorizonOutcome::Crushed { kind, value, slot }) => {
                        // Credit the well's summoner unless it crushed an ally
                        let victim_faction = world.get(id).and_then(|e| e.faction());
                        let credit = field
                            .faction
                            .filter(|f| victim_faction.map(|v| v.is_hostile_to(f)).unwrap_or(true))
                            .and_then(|f| f.slot());
                        record_kill(world, id, kind, credit, value, slot);
                    }
                    None => {}
                }
            }
        }

        advance_field(world, &mut field);
        world.fields[index] = field;
    }
}

/// Motion, decay and expiry for one field, plus its grid effect
fn advance_field(world: &mut World, field: &mut ForceField) {
    field.position = world.torus.wrap(field.position + field.velocity);
    if field.dead {
        return;
    }

    let torus = world.torus;
    match &mut field.kind {
        FieldKind::Well(well) => {
            world
                .grid
                .burst(&torus, field.position, well.radius * 0.5, -well.strength);
            if well.decay_tick() {
                field.dead = true;
                tracing::debug!("Well {:?} collapsed", field.id);
                world.events.push(SimulationEvent::WellCollapsed {
                    field: field.id,
                    position: field.position,
                });
            }
        }
        FieldKind::Pulse(pulse) => {
            world
                .grid
                .burst(&torus, field.position, pulse.radius, pulse.strength);
            if pulse.tick() {
                field.dead = true;
            }
        }
        // Zones expire through their scheduled countdown
        FieldKind::Damping(_) => {}
    }
}

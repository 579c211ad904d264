//! Input collaborator boundary
//!
//! Hosts forward raw button changes as [`InputEvent`]s. The kernel keeps the
//! held set plus the press edges seen since the last tick, and turns them
//! into craft intents during the input step of the tick.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::combat::weapons;
use crate::core::types::{EntityId, PlayerSlot, Vec2};
use crate::ecs::world::World;
use crate::entity::{spawn, Kind};
use crate::force::ForceField;
use crate::simulation::abilities;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Thrust,
    TurnLeft,
    TurnRight,
    Fire,
    Ability,
}

impl Button {
    /// Parse a console name (`thrust`, `left`, `right`, `fire`, `ability`)
    pub fn from_name(name: &str) -> Option<Button> {
        match name.to_ascii_lowercase().as_str() {
            "thrust" | "up" => Some(Button::Thrust),
            "left" | "turnleft" => Some(Button::TurnLeft),
            "right" | "turnright" => Some(Button::TurnRight),
            "fire" => Some(Button::Fire),
            "ability" => Some(Button::Ability),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub slot: PlayerSlot,
    pub button: Button,
    pub pressed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: AHashSet<(PlayerSlot, Button)>,
    pressed: AHashSet<(PlayerSlot, Button)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: InputEvent) {
        if event.pressed {
            self.press(event.slot, event.button);
        } else {
            self.release(event.slot, event.button);
        }
    }

    pub fn press(&mut self, slot: PlayerSlot, button: Button) {
        if self.held.insert((slot, button)) {
            self.pressed.insert((slot, button));
        }
    }

    pub fn release(&mut self, slot: PlayerSlot, button: Button) {
        self.held.remove(&(slot, button));
    }

    pub fn is_held(&self, slot: PlayerSlot, button: Button) -> bool {
        self.held.contains(&(slot, button))
    }

    /// Pressed since the last tick consumed the edges
    pub fn just_pressed(&self, slot: PlayerSlot, button: Button) -> bool {
        self.pressed.contains(&(slot, button))
    }

    pub fn clear_edges(&mut self) {
        self.pressed.clear();
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Intent {
    turn: f32,
    thrust: bool,
    fire: bool,
    ability: bool,
}

fn intent_for(input: &InputState, slot: PlayerSlot) -> Intent {
    let mut turn = 0.0;
    if input.is_held(slot, Button::TurnLeft) {
        turn -= 1.0;
    }
    if input.is_held(slot, Button::TurnRight) {
        turn += 1.0;
    }
    Intent {
        turn,
        thrust: input.is_held(slot, Button::Thrust),
        fire: input.is_held(slot, Button::Fire),
        ability: input.just_pressed(slot, Button::Ability),
    }
}

/// Translate the held buttons into heading, thrust, fire and ability use
/// for every live player craft, then consume the press edges.
pub fn apply_inputs(world: &mut World) {
    let turn_rate = world.config.craft.player_turn_rate;

    for id in world.ids(Kind::Player) {
        let Some(slot) = world
            .get(id)
            .filter(|e| e.is_alive())
            .and_then(|e| e.payload.player_slot())
        else {
            continue;
        };
        let intent = intent_for(&world.input, slot);

        if let Some(physics) = world.get_mut(id).and_then(|e| e.physics.as_mut()) {
            physics.heading_rate = intent.turn * turn_rate;
        }

        if intent.thrust {
            thrust(world, id);
        } else if let Some(propulsion) = world
            .get_mut(id)
            .and_then(|e| e.physics.as_mut())
            .and_then(|p| p.propulsion.as_mut())
        {
            propulsion.engaged = false;
        }

        if intent.fire {
            weapons::fire(world, id);
        }
        if intent.ability {
            abilities::trigger(world, id);
        }
    }

    world.input.clear_edges();
}

/// Accelerate along the heading while energy lasts. Every `pulse_every`
/// engaged ticks the engine also emits a repulsive pulse; exhaust
/// particles trail every tick.
pub fn thrust(world: &mut World, id: EntityId) {
    let Some(entity) = world.get_mut(id) else {
        return;
    };
    let Some(physics) = entity.physics.as_mut() else {
        return;
    };
    let Some(propulsion) = physics.propulsion.as_mut() else {
        return;
    };
    let cost = propulsion.energy_cost;
    let paid = match entity.vehicle.as_mut() {
        Some(vehicle) => vehicle.spend(cost),
        None => true,
    };
    if !paid {
        propulsion.engaged = false;
        return;
    }

    propulsion.engaged = true;
    let emit_pulse = propulsion.advance_cycle();
    let forward = Vec2::from_angle(physics.heading);
    entity.body.velocity += forward * propulsion.thrust;

    let position = entity.body.position;
    let radius = entity.body.radius;
    let alt_space = entity.body.alt_space;
    let faction = entity.faction();
    let velocity = entity.body.velocity;

    if emit_pulse {
        let field = ForceField::pulse(
            world.next_field_id(),
            position,
            &world.config.force,
            Some(id),
            faction,
            alt_space,
        );
        world.pending.add_field(field);
    }

    let exhaust_count = world.config.particles.exhaust_count;
    let lifetime = world.config.particles.lifetime;
    let tail = position - forward * radius;
    for _ in 0..exhaust_count {
        let jitter = world.random_unit() * 0.3;
        let drift = velocity * 0.5 - forward + jitter;
        world.spawn_particle(spawn::particle(tail, drift, lifetime, false));
    }
}

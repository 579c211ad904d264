//! Entity tiers: spatial body, physical frame, powered vehicle
//!
//! Every entity has a [`Body`]. Physical objects add [`Physics`]; powered
//! craft add a [`Vehicle`]. Tiers are composed on one record rather than
//! inherited.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Vec2};
use crate::entity::payload::ProjectileClass;

/// Spatial tier, shared by every entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Entities in different spaces never interact
    pub alt_space: bool,
    /// Marked for removal at the next death sweep
    pub dead: bool,
    /// Product of every field's inverse potential this tick (1.0 = untouched)
    pub gravity_potential: f32,
    /// Hit radius
    pub radius: f32,
}

impl Body {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            alt_space: false,
            dead: false,
            gravity_potential: 1.0,
            radius,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Engine state. The cycle counter advances once per thrusting tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Propulsion {
    /// Velocity added per thrust tick
    pub thrust: f32,
    /// Energy spent per thrust tick
    pub energy_cost: f32,
    /// Emit a repulsive pulse every N thrust ticks (0 = never)
    pub pulse_every: u32,
    pub cycle: u32,
    /// Thrusting this tick
    pub engaged: bool,
}

impl Propulsion {
    pub fn new(thrust: f32, energy_cost: f32, pulse_every: u32) -> Self {
        Self {
            thrust,
            energy_cost,
            pulse_every,
            cycle: 0,
            engaged: false,
        }
    }

    /// Count one thrust tick; true when this tick completes a pulse cycle
    pub fn advance_cycle(&mut self) -> bool {
        self.cycle = self.cycle.wrapping_add(1);
        self.pulse_every != 0 && self.cycle % self.pulse_every == 0
    }
}

/// Physical tier: mass, heading, engine, owned children
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Physics {
    pub mass: f32,
    pub propulsion: Option<Propulsion>,
    /// Handles of entities this one created and owns
    pub children: Vec<EntityId>,
    /// Radians, 0 = +x
    pub heading: f32,
    /// Radians per tick
    pub heading_rate: f32,
}

impl Physics {
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            propulsion: None,
            children: Vec::new(),
            heading: 0.0,
            heading_rate: 0.0,
        }
    }

    pub fn with_propulsion(mut self, propulsion: Propulsion) -> Self {
        self.propulsion = Some(propulsion);
        self
    }

    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }
}

/// Projectile launcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub class: ProjectileClass,
    pub cooldown_ticks: u32,
    /// Ticks until the weapon can fire again
    pub remaining: u32,
    pub energy_cost: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub damage: f32,
    /// Projectile lifetime in ticks
    pub ttl: u32,
}

impl Weapon {
    pub fn ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn trigger(&mut self) {
        self.remaining = self.cooldown_ticks;
    }
}

/// What a craft's primary ability does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Drop a damping zone at the craft
    Stasis,
    /// Open a collapsing well ahead of the craft
    Singularity,
    /// Shift into alternate space for a while
    Phase,
    /// Fire one high-energy shot
    Overcharge,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ability {
    pub kind: AbilityKind,
    pub cost: f32,
    pub cooldown_ticks: u32,
    pub remaining: u32,
}

impl Ability {
    pub fn new(kind: AbilityKind, cost: f32, cooldown_ticks: u32) -> Self {
        Self {
            kind,
            cost,
            cooldown_ticks,
            remaining: 0,
        }
    }

    pub fn ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn trigger(&mut self) {
        self.remaining = self.cooldown_ticks;
    }
}

/// Kinetic shield: reflects hostile projectiles while energy lasts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub radius: f32,
    pub bounce_cost: f32,
}

/// Powered tier: energy economy, hull, weapon, ability, shield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub energy: f32,
    pub max_energy: f32,
    /// Energy regained per tick
    pub regen: f32,
    pub integrity: f32,
    pub max_integrity: f32,
    pub weapon: Weapon,
    pub ability: Ability,
    pub shield: Option<Shield>,
    /// Next shot fires as a high-energy projectile
    pub overcharged: bool,
}

impl Vehicle {
    /// Spend energy if available. Returns false (and spends nothing) otherwise.
    pub fn spend(&mut self, amount: f32) -> bool {
        if self.energy >= amount {
            self.energy -= amount;
            true
        } else {
            false
        }
    }

    pub fn recharge(&mut self, amount: f32) {
        self.energy = (self.energy + amount).min(self.max_energy);
    }

    /// Apply hull damage. Returns true if the hull is gone.
    pub fn damage(&mut self, amount: f32) -> bool {
        self.integrity = (self.integrity - amount).max(0.0);
        self.integrity <= 0.0
    }

    /// Shield that can afford one more bounce
    pub fn active_shield(&self) -> Option<&Shield> {
        self.shield
            .as_ref()
            .filter(|shield| self.energy >= shield.bounce_cost)
    }

    /// Per-tick upkeep: regen and cooldowns
    pub fn tick(&mut self) {
        self.recharge(self.regen);
        self.weapon.tick();
        self.ability.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle() -> Vehicle {
        Vehicle {
            energy: 10.0,
            max_energy: 20.0,
            regen: 1.0,
            integrity: 30.0,
            max_integrity: 30.0,
            weapon: Weapon {
                class: ProjectileClass::Standard,
                cooldown_ticks: 3,
                remaining: 0,
                energy_cost: 2.0,
                projectile_speed: 5.0,
                projectile_radius: 1.0,
                damage: 10.0,
                ttl: 10,
            },
            ability: Ability::new(AbilityKind::Stasis, 5.0, 4),
            shield: Some(Shield {
                radius: 20.0,
                bounce_cost: 8.0,
            }),
            overcharged: false,
        }
    }

    #[test]
    fn test_spend_refuses_overdraft() {
        let mut v = vehicle();
        assert!(v.spend(6.0));
        assert!(!v.spend(6.0));
        assert_eq!(v.energy, 4.0);
    }

    #[test]
    fn test_shield_needs_energy() {
        let mut v = vehicle();
        assert!(v.active_shield().is_some());
        v.energy = 7.0;
        assert!(v.active_shield().is_none());
    }

    #[test]
    fn test_tick_regens_and_cools() {
        let mut v = vehicle();
        v.weapon.trigger();
        v.tick();
        assert_eq!(v.energy, 11.0);
        assert_eq!(v.weapon.remaining, 2);
        v.energy = 19.5;
        v.tick();
        assert_eq!(v.energy, 20.0);
    }

    #[test]
    fn test_damage_destroys_at_zero() {
        let mut v = vehicle();
        assert!(!v.damage(10.0));
        assert!(v.damage(25.0));
        assert_eq!(v.integrity, 0.0);
    }

    #[test]
    fn test_propulsion_cycle() {
        let mut p = Propulsion::new(0.1, 0.1, 3);
        assert!(!p.advance_cycle());
        assert!(!p.advance_cycle());
        assert!(p.advance_cycle());
        let mut never = Propulsion::new(0.1, 0.1, 0);
        assert!(!never.advance_cycle());
    }
}

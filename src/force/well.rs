//! Collapsing gravity well
//!
//! Attracts everything nearby. Objects that cross the event horizon are
//! absorbed and their mass feeds the well; craft are too big to swallow and
//! get crushed a little every tick instead. The well bleeds mass each tick
//! and collapses when it runs out, so its remaining life is always
//! `mass / decay` ticks.

use crate::core::config::ForceConfig;
use crate::entity::Kind;
use crate::force::{ForceLaw, Response, TargetInfo};

#[derive(Debug, Clone)]
pub struct CollapsingWell {
    pub mass: f32,
    pub decay: f32,
    pub strength: f32,
    pub horizon: f32,
    pub radius: f32,
    pub max_accel: f32,
    pub horizon_damage: f32,
}

impl CollapsingWell {
    pub fn from_config(config: &ForceConfig) -> Self {
        Self {
            mass: config.well_initial_mass,
            decay: config.well_decay,
            strength: config.well_strength,
            horizon: config.well_horizon,
            radius: config.well_radius,
            max_accel: config.well_max_accel,
            horizon_damage: config.well_horizon_damage,
        }
    }

    /// Ticks until collapse at the current mass
    pub fn remaining_life(&self) -> f32 {
        (self.mass / self.decay).max(0.0)
    }

    pub fn absorb(&mut self, mass: f32) {
        self.mass += mass.max(0.0);
    }

    /// Bleed one tick of mass. Returns true when the well has collapsed.
    pub fn decay_tick(&mut self) -> bool {
        self.mass -= self.decay;
        self.mass <= 0.0
    }

    pub fn within_horizon(&self, distance: f32) -> bool {
        distance < self.horizon
    }

    /// Craft resist absorption; everything else can be swallowed
    pub fn can_absorb(kind: Kind) -> bool {
        !kind.is_craft()
    }
}

impl ForceLaw for CollapsingWell {
    fn force(&self, mass: f32, distance: f32) -> f32 {
        let pull = self.strength * self.mass.max(0.0) / (distance * mass.max(0.1));
        pull.min(self.max_accel)
    }

    fn response(&self, target: &TargetInfo) -> Response {
        match target.kind {
            Kind::Structure => Response::Ignore,
            _ => Response::Attract,
        }
    }

    fn max_radius(&self) -> f32 {
        self.radius
    }

    fn subscribed(&self) -> &'static [Kind] {
        &[
            Kind::Player,
            Kind::Hostile,
            Kind::Swarmer,
            Kind::Projectile,
            Kind::Particle,
            Kind::Pickup,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well() -> CollapsingWell {
        CollapsingWell::from_config(&ForceConfig::default())
    }

    #[test]
    fn test_absorb_extends_life() {
        let mut w = well();
        let before = w.remaining_life();
        w.absorb(50.0);
        assert!(w.remaining_life() > before);
    }

    #[test]
    fn test_decay_until_collapse() {
        let mut w = well();
        w.mass = 2.5;
        w.decay = 1.0;
        assert!(!w.decay_tick());
        assert!(!w.decay_tick());
        assert!(w.decay_tick());
        assert_eq!(w.remaining_life(), 0.0);
    }

    #[test]
    fn test_force_falls_with_distance_and_caps() {
        let w = well();
        let near = w.force(1.0, 1.0);
        let far = w.force(1.0, 200.0);
        assert!(far < near);
        assert!(near <= w.max_accel);
    }

    #[test]
    fn test_craft_not_absorbable() {
        assert!(!CollapsingWell::can_absorb(Kind::Player));
        assert!(!CollapsingWell::can_absorb(Kind::Hostile));
        assert!(CollapsingWell::can_absorb(Kind::Projectile));
    }
}

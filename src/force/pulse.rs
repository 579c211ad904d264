//! Short radial push emitted by a thrusting craft's engine

use crate::core::config::ForceConfig;
use crate::entity::Kind;
use crate::force::{ForceLaw, Response, TargetInfo};

#[derive(Debug, Clone)]
pub struct RepulsivePulse {
    pub strength: f32,
    pub radius: f32,
    /// Ticks left in the active set
    pub ttl: u32,
}

impl RepulsivePulse {
    pub fn from_config(config: &ForceConfig) -> Self {
        Self {
            strength: config.pulse_strength,
            radius: config.pulse_radius,
            ttl: config.pulse_ttl,
        }
    }

    /// Returns true when the pulse has expired
    pub fn tick(&mut self) -> bool {
        self.ttl = self.ttl.saturating_sub(1);
        self.ttl == 0
    }
}

impl ForceLaw for RepulsivePulse {
    fn force(&self, mass: f32, distance: f32) -> f32 {
        let falloff = (1.0 - distance / self.radius).clamp(0.0, 1.0);
        self.strength * falloff / mass.max(1.0)
    }

    fn response(&self, _target: &TargetInfo) -> Response {
        Response::Repel
    }

    fn max_radius(&self) -> f32 {
        self.radius
    }

    fn subscribed(&self) -> &'static [Kind] {
        &[
            Kind::Player,
            Kind::Hostile,
            Kind::Swarmer,
            Kind::Particle,
            Kind::Pickup,
        ]
    }

    fn is_expensive(&self) -> bool {
        false
    }
}

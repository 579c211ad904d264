//! Tunneling-free hit testing
//!
//! A projectile's displacement this tick is its velocity, ending at its
//! current position. Fast projectiles are tested at several interpolated
//! points along that segment, in time order, so they cannot jump over a
//! thin target between two ticks.

use crate::core::types::Vec2;
use crate::spatial::TorusField;

/// Number of points to test along a displacement with squared length
/// `speed_sq`. One (the endpoint) unless the speed exceeds the threshold.
pub fn substep_count(speed_sq: f32, threshold_sq: f32) -> u32 {
    if threshold_sq > 0.0 && speed_sq > threshold_sq {
        (speed_sq / threshold_sq).floor().max(1.0) as u32
    } else {
        1
    }
}

/// Moving circle against a resting circle
#[derive(Debug, Clone, Copy)]
pub struct Sweep {
    /// Position at the end of the tick
    pub end: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

impl Sweep {
    /// Sample points for this tick, earliest first; the last one is `end`
    pub fn samples(&self, threshold_sq: f32) -> impl Iterator<Item = Vec2> + '_ {
        let steps = substep_count(self.velocity.length_sq(), threshold_sq);
        let start = self.end - self.velocity;
        (1..=steps).map(move |i| {
            if i == steps {
                self.end
            } else {
                start + self.velocity * (i as f32 / steps as f32)
            }
        })
    }

    /// First sample point within `reach + radius` of `target`
    pub fn first_contact(
        &self,
        torus: &TorusField,
        target: Vec2,
        reach: f32,
        threshold_sq: f32,
    ) -> Option<Vec2> {
        let limit = reach + self.radius;
        let limit_sq = limit * limit;
        let hit = self
            .samples(threshold_sq)
            .find(|point| torus.distance_sq(*point, target) < limit_sq);
        if let Some(point) = hit {
            tracing::trace!("Sub-step contact at ({:.1}, {:.1})", point.x, point.y);
        }
        hit
    }
}

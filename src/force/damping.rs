//! Localized velocity-damping zone

use crate::core::config::ForceConfig;
use crate::core::types::Faction;
use crate::entity::Kind;
use crate::force::{ForceLaw, Response, TargetInfo};

/// Slows things down, hardest on enemy fire, not at all on shielded allies
#[derive(Debug, Clone)]
pub struct DampingZone {
    pub faction: Faction,
    pub radius: f32,
    pub base_coefficient: f32,
    pub projectile_coefficient: f32,
}

impl DampingZone {
    pub fn from_config(config: &ForceConfig, faction: Faction) -> Self {
        Self {
            faction,
            radius: config.damping_radius,
            base_coefficient: config.damping_base,
            projectile_coefficient: config.damping_projectile,
        }
    }

    fn is_enemy(&self, target: &TargetInfo) -> bool {
        target
            .faction
            .map(|f| f.is_hostile_to(&self.faction))
            .unwrap_or(false)
    }
}

impl ForceLaw for DampingZone {
    /// Linear falloff, 1 at the center and 0 at the edge
    fn force(&self, _mass: f32, distance: f32) -> f32 {
        (1.0 - distance / self.radius).clamp(0.0, 1.0)
    }

    fn response(&self, target: &TargetInfo) -> Response {
        let enemy = self.is_enemy(target);
        match target.kind {
            Kind::Projectile if enemy => Response::Damp(self.projectile_coefficient),
            _ if !enemy && target.shielded => Response::Ignore,
            _ => Response::Damp(self.base_coefficient),
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
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PlayerSlot;

    fn zone() -> DampingZone {
        DampingZone::from_config(&ForceConfig::default(), Faction::Player(PlayerSlot(0)))
    }

    fn target(kind: Kind, faction: Option<Faction>, shielded: bool) -> TargetInfo {
        TargetInfo {
            kind,
            faction,
            shielded,
            mass: 1.0,
        }
    }

    #[test]
    fn test_enemy_projectiles_damped_hardest() {
        let z = zone();
        let enemy_shot = target(Kind::Projectile, Some(Faction::Hostile), false);
        let own_shot = target(Kind::Projectile, Some(Faction::Player(PlayerSlot(0))), false);
        assert_eq!(z.response(&enemy_shot), Response::Damp(z.projectile_coefficient));
        assert_eq!(z.response(&own_shot), Response::Damp(z.base_coefficient));
        assert!(z.projectile_coefficient > z.base_coefficient);
    }

    #[test]
    fn test_shielded_ally_untouched() {
        let z = zone();
        let ally = target(Kind::Player, Some(Faction::Player(PlayerSlot(0))), true);
        let shielded_enemy = target(Kind::Player, Some(Faction::Player(PlayerSlot(1))), true);
        assert_eq!(z.response(&ally), Response::Ignore);
        assert_eq!(z.response(&shielded_enemy), Response::Damp(z.base_coefficient));
    }

    #[test]
    fn test_falloff() {
        let z = zone();
        assert_eq!(z.force(1.0, 0.0), 1.0);
        assert_eq!(z.force(1.0, z.radius * 2.0), 0.0);
    }
}

//! Species tags used to bucket entities in the store

use serde::{Deserialize, Serialize};

/// Runtime species of an entity. Derived from its payload, never stored
/// separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    Player,
    Hostile,
    Swarmer,
    Projectile,
    Particle,
    Pickup,
    Structure,
}

impl Kind {
    /// Every kind, in death-sweep order
    pub const ALL: [Kind; 7] = [
        Kind::Player,
        Kind::Hostile,
        Kind::Swarmer,
        Kind::Projectile,
        Kind::Particle,
        Kind::Pickup,
        Kind::Structure,
    ];

    /// Kinds a projectile can hit
    pub const PROJECTILE_TARGETS: [Kind; 4] =
        [Kind::Player, Kind::Hostile, Kind::Swarmer, Kind::Structure];

    /// Craft are powered vehicles: energy, weapon, ability, optional shield
    pub fn is_craft(&self) -> bool {
        matches!(self, Kind::Player | Kind::Hostile)
    }

    /// Kinds that wrap around the field edges (particles despawn instead)
    pub fn wraps(&self) -> bool {
        !matches!(self, Kind::Particle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Player => "player",
            Kind::Hostile => "hostile",
            Kind::Swarmer => "swarmer",
            Kind::Projectile => "projectile",
            Kind::Particle => "particle",
            Kind::Pickup => "pickup",
            Kind::Structure => "structure",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

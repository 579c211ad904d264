//! Kind-specific payloads

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Faction, PlayerSlot};
use crate::entity::kind::Kind;

/// Projectile behavior on a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileClass {
    Standard,
    /// Pierces through victims unless a stronger rule forces its death
    HighEnergy,
    /// Breaks into children when it dies on a hit; each generation splits once more
    Splitting { generation: u8 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileState {
    /// Entity that fired (or last reflected) the projectile
    pub owner: Option<EntityId>,
    pub faction: Faction,
    /// Scoreboard row credited with kills. Outlives the owner.
    pub credit: Option<PlayerSlot>,
    pub class: ProjectileClass,
    pub damage: f32,
    /// Remaining lifetime in ticks
    pub ttl: u32,
    pub max_ttl: u32,
    /// Last victim hit; a surviving projectile never hits it twice in a row
    pub last_hit: Option<EntityId>,
}

/// Hostile craft steering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pilot {
    /// Drifts, never fires
    Idle,
    /// Turns toward the nearest player, thrusts, fires when aligned
    Hunter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureRole {
    /// Periodically spawns swarmers it owns
    Hive,
    /// Recharges allied craft in range
    Relay,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PickupEffect {
    Energy(f32),
    Repair(f32),
    Score(i64),
}

/// Kind-specific state. The entity's [`Kind`] is derived from this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Payload {
    PlayerCraft {
        slot: PlayerSlot,
    },
    HostileCraft {
        kill_value: i64,
        pilot: Pilot,
        target: Option<EntityId>,
    },
    Swarmer {
        kill_value: i64,
        target: Option<EntityId>,
        thrust: f32,
        max_speed: f32,
    },
    Projectile(ProjectileState),
    Particle {
        age: f32,
        lifetime: f32,
        /// Skips expensive fields (set when spawned over the particle cap)
        inert: bool,
    },
    Pickup {
        effect: PickupEffect,
        ttl: u32,
    },
    Structure {
        faction: Faction,
        role: StructureRole,
        kill_value: i64,
        integrity: f32,
    },
}

impl Payload {
    pub fn kind(&self) -> Kind {
        match self {
            Payload::PlayerCraft { .. } => Kind::Player,
            Payload::HostileCraft { .. } => Kind::Hostile,
            Payload::Swarmer { .. } => Kind::Swarmer,
            Payload::Projectile(_) => Kind::Projectile,
            Payload::Particle { .. } => Kind::Particle,
            Payload::Pickup { .. } => Kind::Pickup,
            Payload::Structure { .. } => Kind::Structure,
        }
    }

    /// Allegiance for hit and damping rules. Particles and pickups have none.
    pub fn faction(&self) -> Option<Faction> {
        match self {
            Payload::PlayerCraft { slot } => Some(Faction::Player(*slot)),
            Payload::HostileCraft { .. } | Payload::Swarmer { .. } => Some(Faction::Hostile),
            Payload::Projectile(state) => Some(state.faction),
            Payload::Structure { faction, .. } => Some(*faction),
            Payload::Particle { .. } | Payload::Pickup { .. } => None,
        }
    }

    /// Score awarded for destroying this entity
    pub fn kill_value(&self, player_kill_value: i64) -> i64 {
        match self {
            Payload::PlayerCraft { .. } => player_kill_value,
            Payload::HostileCraft { kill_value, .. }
            | Payload::Swarmer { kill_value, .. }
            | Payload::Structure { kill_value, .. } => *kill_value,
            _ => 0,
        }
    }

    pub fn projectile(&self) -> Option<&ProjectileState> {
        match self {
            Payload::Projectile(state) => Some(state),
            _ => None,
        }
    }

    pub fn projectile_mut(&mut self) -> Option<&mut ProjectileState> {
        match self {
            Payload::Projectile(state) => Some(state),
            _ => None,
        }
    }

    pub fn player_slot(&self) -> Option<PlayerSlot> {
        match self {
            Payload::PlayerCraft { slot } => Some(*slot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_payload() {
        let p = Payload::PlayerCraft { slot: PlayerSlot(0) };
        assert_eq!(p.kind(), Kind::Player);
        let s = Payload::Structure {
            faction: Faction::Hostile,
            role: StructureRole::Hive,
            kill_value: 5,
            integrity: 10.0,
        };
        assert_eq!(s.kind(), Kind::Structure);
        assert_eq!(s.kill_value(500), 5);
    }

    #[test]
    fn test_faction_of_neutral_kinds() {
        let particle = Payload::Particle {
            age: 0.0,
            lifetime: 10.0,
            inert: false,
        };
        assert_eq!(particle.faction(), None);
        let swarmer = Payload::Swarmer {
            kill_value: 1,
            target: None,
            thrust: 0.1,
            max_speed: 1.0,
        };
        assert_eq!(swarmer.faction(), Some(Faction::Hostile));
    }
}

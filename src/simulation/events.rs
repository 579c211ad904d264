//! Events produced during a simulation tick

use serde::Serialize;

use crate::core::types::{EntityId, FieldId, PlayerSlot, Tick, Vec2};
use crate::entity::{AbilityKind, Kind, ProjectileClass};

/// Events generated during a tick
///
/// Collected on the world while systems run and handed back by
/// `run_simulation_tick`, for logs, hosts and tests.
#[derive(Debug, Clone, Serialize)]
pub enum SimulationEvent {
    /// A weapon produced a projectile
    Fired {
        shooter: EntityId,
        projectile: EntityId,
        class: ProjectileClass,
    },
    /// A projectile struck something and dealt damage
    Hit {
        projectile: EntityId,
        victim: EntityId,
        victim_kind: Kind,
        damage: f32,
        /// Final state after class overrides
        projectile_survived: bool,
    },
    /// A kinetic shield reflected a projectile
    Bounce {
        projectile: EntityId,
        shielder: EntityId,
        position: Vec2,
    },
    /// Something was destroyed, possibly with kill credit
    Kill {
        victim: EntityId,
        victim_kind: Kind,
        credit: Option<PlayerSlot>,
        value: i64,
    },
    /// A collapsing well swallowed an object
    Absorbed {
        field: FieldId,
        victim: EntityId,
        victim_kind: Kind,
        mass: f32,
    },
    /// A well ran out of mass
    WellCollapsed { field: FieldId, position: Vec2 },
    /// A splitting projectile released its children
    Split {
        parent: EntityId,
        children: usize,
        generation: u8,
    },
    PickupCollected {
        slot: PlayerSlot,
        pickup: EntityId,
    },
    AbilityUsed {
        slot: PlayerSlot,
        ability: AbilityKind,
    },
    /// A hive released a swarmer
    Spawned {
        parent: EntityId,
        child: EntityId,
    },
    /// Territory shares recomputed for this tick
    Territory {
        tick: Tick,
        shares: Vec<(PlayerSlot, f32)>,
    },
}

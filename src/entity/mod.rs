//! Entity record: one flat struct with composed tiers and a kind-tagged payload

pub mod body;
pub mod kind;
pub mod lifecycle;
pub mod payload;
pub mod spawn;

pub use body::{Ability, AbilityKind, Body, Physics, Propulsion, Shield, Vehicle, Weapon};
pub use kind::Kind;
pub use payload::{Payload, PickupEffect, Pilot, ProjectileClass, ProjectileState, StructureRole};

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Faction, Vec2};

/// Mass used by field math for entities without a physical tier
pub const SPATIAL_MASS: f32 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Owner that created this entity and will dispose it
    pub parent: Option<EntityId>,
    pub body: Body,
    pub physics: Option<Physics>,
    pub vehicle: Option<Vehicle>,
    pub payload: Payload,
}

impl Entity {
    pub fn new(body: Body, payload: Payload) -> Self {
        Self {
            id: EntityId::new(),
            parent: None,
            body,
            physics: None,
            vehicle: None,
            payload,
        }
    }

    pub fn with_physics(mut self, physics: Physics) -> Self {
        self.physics = Some(physics);
        self
    }

    pub fn with_vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn kind(&self) -> Kind {
        self.payload.kind()
    }

    pub fn is_alive(&self) -> bool {
        !self.body.dead
    }

    pub fn faction(&self) -> Option<Faction> {
        self.payload.faction()
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn mass(&self) -> f32 {
        self.physics.as_ref().map(|p| p.mass).unwrap_or(SPATIAL_MASS)
    }

    pub fn heading(&self) -> f32 {
        self.physics
            .as_ref()
            .map(|p| p.heading)
            .unwrap_or_else(|| self.body.velocity.angle())
    }

    pub fn children(&self) -> &[EntityId] {
        self.physics
            .as_ref()
            .map(|p| p.children.as_slice())
            .unwrap_or(&[])
    }

    /// True if both entities live in the same space and may interact
    pub fn shares_space_with(&self, other: &Entity) -> bool {
        self.body.alt_space == other.body.alt_space
    }
}

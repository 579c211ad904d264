//! World - the explicit simulation context
//!
//! Owns every entity, the species buckets, the scheduler and its pending
//! queue, the active force fields, and the per-session services (clock,
//! torus, RNG, scoreboard). Every system and every scheduled callback
//! receives `&mut World`.

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::clock::Clock;
use crate::core::config::SimulationConfig;
use crate::core::error::{KernelError, Result};
use crate::core::types::{EntityId, FieldId, PlayerSlot, TaskId, Vec2};
use crate::ecs::store::KindStore;
use crate::entity::{Entity, Kind, Payload};
use crate::force::ForceField;
use crate::input::InputState;
use crate::schedule::{PendingQueue, Scheduler};
use crate::simulation::events::SimulationEvent;
use crate::simulation::scoreboard::Scoreboard;
use crate::spatial::{BackgroundGrid, TorusField};

pub struct World {
    pub config: SimulationConfig,
    pub clock: Clock,
    pub torus: TorusField,
    entities: AHashMap<EntityId, Entity>,
    pub store: KindStore,
    pub scheduler: Scheduler,
    pub pending: PendingQueue,
    /// Active force fields. Membership changes only at the pending flush.
    pub fields: Vec<ForceField>,
    pub grid: BackgroundGrid,
    pub input: InputState,
    pub scoreboard: Scoreboard,
    pub rng: ChaCha8Rng,
    /// Events raised by systems during the current tick
    pub events: Vec<SimulationEvent>,
    next_field: u32,
}

impl World {
    pub fn new(config: SimulationConfig) -> Self {
        let torus = TorusField::new(config.field.width, config.field.height);
        let grid = BackgroundGrid::new(&torus, config.field.grid_spacing, config.field.grid_relax);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Self {
            clock: Clock::new(),
            torus,
            entities: AHashMap::new(),
            store: KindStore::new(),
            scheduler: Scheduler::new(),
            pending: PendingQueue::new(),
            fields: Vec::new(),
            grid,
            input: InputState::new(),
            scoreboard: Scoreboard::new(),
            rng,
            events: Vec::new(),
            next_field: 0,
            config,
        }
    }

    /// Validate the configuration before building a world from it
    pub fn try_new(config: SimulationConfig) -> Result<Self> {
        config.validate().map_err(KernelError::InvalidConfig)?;
        Ok(Self::new(config))
    }

    /// Insert an entity into the arena, its bucket and its parent's
    /// children, all immediately. It is visible to bucket snapshots taken
    /// after this call, not to ones already in progress.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        let kind = entity.kind();

        if let Some(parent) = entity.parent {
            if let Some(physics) = self
                .entities
                .get_mut(&parent)
                .and_then(|p| p.physics.as_mut())
            {
                physics.children.push(id);
            }
        }

        self.store.add(id, kind);
        self.entities.insert(id, entity);
        id
    }

    /// Spawn a particle, flagging it inert once the live cap is reached
    pub fn spawn_particle(&mut self, mut entity: Entity) -> EntityId {
        if self.live_count(Kind::Particle) >= self.config.particles.max_particles {
            if let Payload::Particle { inert, .. } = &mut entity.payload {
                *inert = true;
            }
        }
        self.spawn(entity)
    }

    /// Take an entity out of the arena and its bucket. Parent links and
    /// children are the caller's business (see `entity::lifecycle`).
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        self.store.remove(id, entity.kind());
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn try_get(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(&id).ok_or(KernelError::EntityNotFound(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.get(&id).map(Entity::is_alive).unwrap_or(false)
    }

    /// Mark for removal at the next death sweep
    pub fn kill(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) if !entity.body.dead => {
                entity.body.dead = true;
                true
            }
            _ => false,
        }
    }

    /// Snapshot of a bucket, in insertion order
    pub fn ids(&self, kind: Kind) -> Vec<EntityId> {
        self.store.for_kind(kind).to_vec()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        Kind::ALL
            .iter()
            .flat_map(move |kind| self.store.for_kind(*kind))
            .filter_map(move |id| self.entities.get(id))
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entities of a kind that are not marked dead
    pub fn live_count(&self, kind: Kind) -> usize {
        self.store
            .for_kind(kind)
            .iter()
            .filter(|id| self.is_alive(**id))
            .count()
    }

    /// Run `f` once per pair across two buckets (half product without
    /// self-pairs when `a == b`). Buckets are snapshotted first so `f` can
    /// spawn and kill freely; new entities wait for the next dispatch.
    pub fn for_each_pair<F>(&mut self, a: Kind, b: Kind, mut f: F)
    where
        F: FnMut(&mut World, EntityId, EntityId),
    {
        let left = self.ids(a);
        if a == b {
            for (i, first) in left.iter().enumerate() {
                for second in &left[i + 1..] {
                    f(self, *first, *second);
                }
            }
        } else {
            let right = self.ids(b);
            for first in &left {
                for second in &right {
                    f(self, *first, *second);
                }
            }
        }
    }

    /// Live craft seated at `slot`
    pub fn player_entity(&self, slot: PlayerSlot) -> Option<EntityId> {
        self.store
            .for_kind(Kind::Player)
            .iter()
            .copied()
            .find(|id| {
                self.entities
                    .get(id)
                    .filter(|e| e.is_alive())
                    .and_then(|e| e.payload.player_slot())
                    == Some(slot)
            })
    }

    /// Cancel a task wherever it waits: pending queue, any scheduler queue,
    /// or in flight in the current drain
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.pending.cancel(id) || self.scheduler.cancel(id)
    }

    pub fn next_field_id(&mut self) -> FieldId {
        let id = FieldId(self.next_field);
        self.next_field += 1;
        id
    }

    /// Queue a field for the active set; it joins at the next flush
    pub fn add_field(&mut self, field: ForceField) -> FieldId {
        let id = field.id;
        self.pending.add_field(field);
        id
    }

    pub fn field(&self, id: FieldId) -> Option<&ForceField> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut ForceField> {
        self.fields.iter_mut().find(|field| field.id == id)
    }

    /// Mark a field dead; it keeps acting until the next flush drops it
    pub fn mark_field_dead(&mut self, id: FieldId) -> bool {
        match self.field_mut(id) {
            Some(field) => {
                field.dead = true;
                true
            }
            None => false,
        }
    }

    /// Random direction with unit length
    pub fn random_unit(&mut self) -> Vec2 {
        Vec2::from_angle(self.rng.gen_range(0.0..std::f32::consts::TAU))
    }

    /// Uniform in `[0, 1)`
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    pub fn random_position(&mut self) -> Vec2 {
        self.torus.random_position(&mut self.rng)
    }

    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::spawn;

    fn world() -> World {
        World::new(SimulationConfig::default())
    }

    #[test]
    fn test_spawn_joins_bucket_and_parent() {
        let mut w = world();
        let config = w.config.clone();
        let hive = w.spawn(spawn::structure(
            &config,
            crate::core::types::Faction::Hostile,
            crate::entity::StructureRole::Hive,
            Vec2::new(10.0, 10.0),
        ));
        let child = w.spawn(spawn::swarmer(&config, Vec2::ZERO, Some(hive)));

        assert_eq!(w.ids(Kind::Swarmer), vec![child]);
        assert_eq!(w.get(hive).unwrap().children(), &[child]);
        assert_eq!(w.entity_count(), 2);
    }

    #[test]
    fn test_kill_only_marks() {
        let mut w = world();
        let id = w.spawn(spawn::particle(Vec2::ZERO, Vec2::ZERO, 10.0, false));
        assert!(w.kill(id));
        assert!(!w.kill(id));
        assert!(w.contains(id));
        assert!(!w.is_alive(id));
        assert_eq!(w.live_count(Kind::Particle), 0);
    }

    #[test]
    fn test_particle_cap_marks_inert() {
        let mut config = SimulationConfig::default();
        config.particles.max_particles = 2;
        let mut w = World::new(config);
        let ids: Vec<_> = (0..3)
            .map(|_| w.spawn_particle(spawn::particle(Vec2::ZERO, Vec2::ZERO, 10.0, false)))
            .collect();
        let inert: Vec<bool> = ids
            .iter()
            .map(|id| matches!(w.get(*id).unwrap().payload, Payload::Particle { inert: true, .. }))
            .collect();
        assert_eq!(inert, vec![false, false, true]);
    }

    #[test]
    fn test_for_each_pair_sees_snapshot() {
        let mut w = world();
        for _ in 0..4 {
            w.spawn(spawn::particle(Vec2::ZERO, Vec2::ZERO, 10.0, false));
        }
        let mut calls = 0;
        w.for_each_pair(Kind::Particle, Kind::Particle, |world, _, _| {
            calls += 1;
            world.spawn(spawn::particle(Vec2::ZERO, Vec2::ZERO, 10.0, false));
        });
        assert_eq!(calls, 6);
        assert_eq!(w.ids(Kind::Particle).len(), 10);
    }

    #[test]
    fn test_try_new_rejects_bad_config() {
        let mut config = SimulationConfig::default();
        config.field.width = 0.0;
        assert!(matches!(
            World::try_new(config),
            Err(KernelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_try_get_missing() {
        let w = world();
        assert!(matches!(
            w.try_get(EntityId::new()),
            Err(KernelError::EntityNotFound(_))
        ));
    }
}

//! Tick system - orchestrates one simulation step
//!
//! Order within a tick:
//! scheduler (pending flush first) -> inputs -> behaviors -> force fields ->
//! aging -> motion -> projectile hits -> contacts -> death sweep -> territory ->
//! grid relax -> clock advance
//!
//! Nothing is removed from the store before the death sweep, so every
//! interaction in a tick sees the same population.

use crate::combat::{resolve_contacts, resolve_projectile_hits};
use crate::ecs::world::World;
use crate::entity::lifecycle::sweep_dead;
use crate::force::apply_force_fields;
use crate::input::apply_inputs;
use crate::schedule::run_scheduler;
use crate::simulation::behavior::{age_transients, integrate_motion, run_behaviors};
use crate::simulation::events::SimulationEvent;
use crate::territory;

/// Run one tick and hand back the events it produced
pub fn run_simulation_tick(world: &mut World) -> Vec<SimulationEvent> {
    run_scheduler(world);
    apply_inputs(world);
    run_behaviors(world);
    apply_force_fields(world);
    age_transients(world);
    integrate_motion(world);

    resolve_projectile_hits(world);
    resolve_contacts(world);

    let removed = sweep_dead(world);
    if removed > 0 {
        tracing::trace!("Tick {}: swept {} entities", world.clock.id(), removed);
    }

    territory::evaluate(world);
    world.grid.relax();
    world.clock.advance();

    std::mem::take(&mut world.events)
}

/// Run `ticks` ticks, collecting every event
pub fn run_ticks(world: &mut World, ticks: u64) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(run_simulation_tick(world));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::{PlayerSlot, Vec2};
    use crate::entity::{spawn, AbilityKind, Kind, Payload, Pilot};
    use crate::force::ForceField;
    use crate::input::Button;

    #[test]
    fn test_clock_advances_and_events_drain() {
        let mut w = World::new(SimulationConfig::default());
        let config = w.config.clone();
        w.spawn(spawn::player_craft(&config, PlayerSlot(0), Vec2::new(100.0, 100.0), 0.0, AbilityKind::Stasis));

        w.input.press(PlayerSlot(0), Button::Fire);
        let events = run_simulation_tick(&mut w);
        assert_eq!(w.clock.id(), 1);
        assert!(events.iter().any(|e| matches!(e, SimulationEvent::Fired { .. })));
        assert!(w.events.is_empty());
    }

    #[test]
    fn test_scheduled_spawn_lands_next_tick() {
        let mut w = World::new(SimulationConfig::default());
        w.pending.next_tick(|w| {
            let config = w.config.clone();
            w.spawn(spawn::hostile_craft(&config, Vec2::new(50.0, 50.0), 0.0, Pilot::Idle, false));
        });
        assert_eq!(w.ids(Kind::Hostile).len(), 0);
        run_simulation_tick(&mut w);
        assert_eq!(w.ids(Kind::Hostile).len(), 1);
    }

    #[test]
    fn test_expired_entities_leave_the_store() {
        let mut w = World::new(SimulationConfig::default());
        let id = w.spawn(spawn::particle(Vec2::new(400.0, 300.0), Vec2::ZERO, 1.0, false));
        w.get_mut(id).unwrap().body.gravity_potential = 1.0;
        run_simulation_tick(&mut w);
        assert!(!w.contains(id));
    }

    #[test]
    fn test_particle_ages_by_same_tick_potential() {
        let mut w = World::new(SimulationConfig::default());
        let id = w.spawn(spawn::particle(Vec2::new(300.0, 300.0), Vec2::ZERO, 1000.0, false));
        let field = ForceField::well(w.next_field_id(), Vec2::new(400.0, 300.0), &w.config.force, None, None);
        w.add_field(field);

        // The well joins at this tick's flush; aging must already see it
        run_simulation_tick(&mut w);
        let entity = w.get(id).unwrap();
        let potential = entity.body.gravity_potential;
        assert!(potential < 1.0);
        assert!(matches!(entity.payload, Payload::Particle { age, .. } if age == potential));
    }

    #[test]
    fn test_run_ticks_counts() {
        let mut w = World::new(SimulationConfig::default());
        run_ticks(&mut w, 5);
        assert_eq!(w.clock.id(), 5);
    }
}

//! Force field integration tests

use torus_arena::core::config::SimulationConfig;
use torus_arena::core::types::{Faction, PlayerSlot, Vec2};
use torus_arena::ecs::world::World;
use torus_arena::entity::spawn::{self, Shot};
use torus_arena::entity::{AbilityKind, Kind, Payload, PickupEffect, ProjectileClass};
use torus_arena::force::{apply_force_fields, FieldKind, ForceField};
use torus_arena::input::Button;
use torus_arena::schedule::flush_pending;
use torus_arena::simulation::{run_simulation_tick, run_ticks, SimulationEvent};

const P0: PlayerSlot = PlayerSlot(0);

fn particle_age(world: &World, id: torus_arena::core::types::EntityId) -> f32 {
    match world.get(id).map(|e| &e.payload) {
        Some(Payload::Particle { age, .. }) => *age,
        _ => panic!("not a particle"),
    }
}

#[test]
fn test_singularity_joins_next_tick_and_swallows_debris() {
    let mut world = World::new(SimulationConfig::default());
    let config = world.config.clone();
    world.spawn(spawn::player_craft(
        &config,
        P0,
        Vec2::new(300.0, 300.0),
        0.0,
        AbilityKind::Singularity,
    ));
    let debris = world.spawn(spawn::particle(Vec2::new(420.0, 300.0), Vec2::ZERO, 1000.0, false));

    world.input.press(P0, Button::Ability);
    let events = run_simulation_tick(&mut world);
    world.input.release(P0, Button::Ability);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimulationEvent::AbilityUsed { ability: AbilityKind::Singularity, .. })));
    assert!(world.fields.is_empty());

    run_simulation_tick(&mut world);
    assert_eq!(world.fields.len(), 1);
    assert!(matches!(world.fields[0].kind, FieldKind::Well(_)));

    let mut absorbed = false;
    for _ in 0..120 {
        let events = run_simulation_tick(&mut world);
        if events.iter().any(|e| {
            matches!(e, SimulationEvent::Absorbed { victim, victim_kind: Kind::Particle, .. } if *victim == debris)
        }) {
            absorbed = true;
            break;
        }
    }
    assert!(absorbed);
    assert!(!world.contains(debris));
}

#[test]
fn test_well_collapses_then_leaves_at_flush() {
    let mut config = SimulationConfig::default();
    config.force.well_initial_mass = 5.0;
    config.force.well_decay = 1.0;
    let mut world = World::new(config);
    let field = ForceField::well(world.next_field_id(), Vec2::new(400.0, 300.0), &world.config.force, None, None);
    let id = world.add_field(field);

    let mut collapsed_at = None;
    for tick in 0..5 {
        let events = run_simulation_tick(&mut world);
        if events
            .iter()
            .any(|e| matches!(e, SimulationEvent::WellCollapsed { field, .. } if *field == id))
        {
            collapsed_at = Some(tick);
        }
    }
    assert_eq!(collapsed_at, Some(4));
    // Marked dead, still present until the next flush
    assert_eq!(world.fields.len(), 1);
    assert!(world.fields[0].dead);

    run_simulation_tick(&mut world);
    assert!(world.fields.is_empty());
}

#[test]
fn test_damping_hits_enemy_fire_hardest() {
    let mut world = World::new(SimulationConfig::default());
    let config = world.config.clone();
    let zone = ForceField::damping(world.next_field_id(), Vec2::new(400.0, 300.0), &config.force, None, Faction::Player(P0));
    world.add_field(zone);
    flush_pending(&mut world);

    let at = Vec2::new(410.0, 300.0);
    let velocity = Vec2::new(4.0, 0.0);
    let shot = world.spawn(spawn::projectile(&Shot {
        position: at,
        velocity,
        radius: 2.0,
        owner: None,
        faction: Faction::Hostile,
        class: ProjectileClass::Standard,
        damage: 25.0,
        ttl: 90,
        alt_space: false,
    }));
    let mut swarmer = spawn::swarmer(&config, at, None);
    swarmer.body.velocity = velocity;
    let swarmer = world.spawn(swarmer);
    let mut ally = spawn::player_craft(&config, P0, at, 0.0, AbilityKind::Stasis);
    ally.body.velocity = velocity;
    let ally = world.spawn(ally);

    apply_force_fields(&mut world);

    let speed = |id| world.get(id).unwrap().body.velocity.length();
    assert!(speed(shot) < speed(swarmer));
    assert!(speed(swarmer) < 4.0);
    assert_eq!(speed(ally), 4.0);
}

#[test]
fn test_pulse_pushes_pickups_and_expires() {
    let mut world = World::new(SimulationConfig::default());
    let config = world.config.clone();
    let pickup = world.spawn(spawn::pickup(&config, Vec2::new(420.0, 300.0), PickupEffect::Score(5)));
    let pulse = ForceField::pulse(world.next_field_id(), Vec2::new(400.0, 300.0), &config.force, None, None, false);
    world.add_field(pulse);

    run_simulation_tick(&mut world);
    assert!(world.get(pickup).unwrap().body.velocity.x > 0.0);
    assert!(world.get(pickup).unwrap().body.position.x > 420.0);

    run_ticks(&mut world, config.force.pulse_ttl as u64);
    assert!(world.fields.is_empty());
}

#[test]
fn test_fields_ignore_other_space() {
    let mut world = World::new(SimulationConfig::default());
    let config = world.config.clone();
    let mut phased = spawn::particle(Vec2::new(350.0, 300.0), Vec2::ZERO, 100.0, false);
    phased.body.alt_space = true;
    let phased = world.spawn(phased);
    let well = ForceField::well(world.next_field_id(), Vec2::new(400.0, 300.0), &config.force, None, None);
    world.add_field(well);
    flush_pending(&mut world);

    apply_force_fields(&mut world);
    let body = &world.get(phased).unwrap().body;
    assert_eq!(body.velocity, Vec2::ZERO);
    assert_eq!(body.gravity_potential, 1.0);
}

#[test]
fn test_deep_potential_slows_particle_aging() {
    let mut world = World::new(SimulationConfig::default());
    let config = world.config.clone();
    let near = world.spawn(spawn::particle(Vec2::new(300.0, 300.0), Vec2::ZERO, 1000.0, false));
    let far = world.spawn(spawn::particle(Vec2::new(300.0, 50.0), Vec2::ZERO, 1000.0, false));
    let well = ForceField::well(world.next_field_id(), Vec2::new(400.0, 300.0), &config.force, None, None);
    world.add_field(well);

    run_ticks(&mut world, 3);
    assert!(particle_age(&world, near) < particle_age(&world, far));
    assert_eq!(particle_age(&world, far), 3.0);
}

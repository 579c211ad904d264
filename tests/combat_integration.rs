//! Combat integration tests
//!
//! Whole-tick scenarios: firing from input, fast projectiles, shields,
//! piercing shots and splitting shots.

use torus_arena::combat::resolve_projectile_hits;
use torus_arena::core::config::SimulationConfig;
use torus_arena::core::types::{EntityId, Faction, PlayerSlot, Vec2};
use torus_arena::ecs::world::World;
use torus_arena::entity::spawn::{self, Shot};
use torus_arena::entity::{AbilityKind, Kind, Pilot, ProjectileClass, StructureRole};
use torus_arena::input::Button;
use torus_arena::simulation::{run_simulation_tick, SimulationEvent};

const P0: PlayerSlot = PlayerSlot(0);

fn world() -> World {
    let mut config = SimulationConfig::default();
    config.particles.debris_count = 0;
    World::new(config)
}

fn player_shot(position: Vec2, velocity: Vec2, class: ProjectileClass) -> Shot {
    Shot {
        position,
        velocity,
        radius: 2.0,
        owner: None,
        faction: Faction::Player(P0),
        class,
        damage: 25.0,
        ttl: 90,
        alt_space: false,
    }
}

fn spawn_player(w: &mut World, position: Vec2, heading: f32) -> EntityId {
    let config = w.config.clone();
    w.spawn(spawn::player_craft(&config, P0, position, heading, AbilityKind::Stasis))
}

#[test]
fn test_player_shoots_down_idle_hostile() {
    let mut w = world();
    let config = w.config.clone();
    let center = w.torus.center();
    spawn_player(&mut w, center, 0.0);
    let hostile = w.spawn(spawn::hostile_craft(
        &config,
        center + Vec2::new(100.0, 0.0),
        std::f32::consts::PI,
        Pilot::Idle,
        false,
    ));

    w.input.press(P0, Button::Fire);
    let mut kill_tick = None;
    for tick in 0..30 {
        let events = run_simulation_tick(&mut w);
        let killed = events.iter().any(|e| {
            matches!(e, SimulationEvent::Kill { victim, credit: Some(P0), value: 100, .. } if *victim == hostile)
        });
        if killed {
            kill_tick = Some(tick);
            break;
        }
    }

    assert!(kill_tick.is_some(), "hostile survived 30 ticks of fire");
    assert!(!w.contains(hostile));
    assert_eq!(w.scoreboard.score(P0), 100);
    assert_eq!(w.scoreboard.get(P0).map(|s| s.kills), Some(1));
}

#[test]
fn test_fast_projectile_does_not_tunnel() {
    let mut w = world();
    let config = w.config.clone();
    let swarmer = w.spawn(spawn::swarmer(&config, Vec2::new(115.0, 300.0), None));
    let shot = w.spawn(spawn::projectile(&player_shot(
        Vec2::new(100.0, 300.0),
        Vec2::new(30.0, 0.0),
        ProjectileClass::Standard,
    )));

    let events = run_simulation_tick(&mut w);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimulationEvent::Hit { victim, .. } if *victim == swarmer)));
    assert!(!w.contains(swarmer));
    assert!(!w.contains(shot));
    assert_eq!(w.scoreboard.score(P0), config.combat.swarmer_kill_value);
}

#[test]
fn test_shield_reflects_and_converts_projectile() {
    let mut w = world();
    let player = spawn_player(&mut w, Vec2::new(400.0, 300.0), 0.0);
    let mut shot = player_shot(Vec2::new(385.0, 300.0), Vec2::new(5.0, 0.0), ProjectileClass::Standard);
    shot.faction = Faction::Hostile;
    let projectile = w.spawn(spawn::projectile(&shot));

    resolve_projectile_hits(&mut w);

    let p = w.get(projectile).unwrap();
    assert!(p.is_alive());
    assert!(p.body.velocity.x < 0.0);
    assert!((p.body.velocity.length() - 5.0).abs() < 1e-4);
    let state = p.payload.projectile().unwrap();
    assert_eq!(state.faction, Faction::Player(P0));
    assert_eq!(state.owner, Some(player));
    assert_eq!(state.credit, Some(P0));
    // Pushed clear of the shield
    assert!(w.torus.distance(p.body.position, Vec2::new(400.0, 300.0)) > w.config.craft.shield_radius);

    let vehicle = w.get(player).unwrap().vehicle.as_ref().unwrap();
    assert_eq!(vehicle.energy, vehicle.max_energy - w.config.craft.shield_bounce_cost);
    assert_eq!(vehicle.integrity, vehicle.max_integrity);
    assert!(w
        .events
        .iter()
        .any(|e| matches!(e, SimulationEvent::Bounce { shielder, .. } if *shielder == player)));
}

#[test]
fn test_drained_shield_lets_damage_through() {
    let mut w = world();
    let player = spawn_player(&mut w, Vec2::new(400.0, 300.0), 0.0);
    w.get_mut(player).unwrap().vehicle.as_mut().unwrap().energy = 1.0;
    let mut shot = player_shot(Vec2::new(395.0, 300.0), Vec2::new(5.0, 0.0), ProjectileClass::Standard);
    shot.faction = Faction::Hostile;
    let projectile = w.spawn(spawn::projectile(&shot));

    resolve_projectile_hits(&mut w);

    assert!(!w.is_alive(projectile));
    let vehicle = w.get(player).unwrap().vehicle.as_ref().unwrap();
    assert_eq!(vehicle.integrity, vehicle.max_integrity - 25.0);
}

#[test]
fn test_high_energy_pierces_swarmers_but_not_structures() {
    let mut w = world();
    let config = w.config.clone();
    let first = w.spawn(spawn::swarmer(&config, Vec2::new(110.0, 300.0), None));
    let second = w.spawn(spawn::swarmer(&config, Vec2::new(140.0, 300.0), None));
    let relay = w.spawn(spawn::structure(
        &config,
        Faction::Hostile,
        StructureRole::Relay,
        Vec2::new(200.0, 300.0),
    ));
    let shot = w.spawn(spawn::projectile(&player_shot(
        Vec2::new(95.0, 300.0),
        Vec2::new(10.0, 0.0),
        ProjectileClass::HighEnergy,
    )));

    let mut survived_hits = 0;
    let mut forced_death = false;
    for _ in 0..12 {
        for event in run_simulation_tick(&mut w) {
            if let SimulationEvent::Hit {
                victim_kind,
                projectile_survived,
                ..
            } = event
            {
                match victim_kind {
                    Kind::Swarmer => {
                        assert!(projectile_survived);
                        survived_hits += 1;
                    }
                    Kind::Structure => {
                        assert!(!projectile_survived);
                        forced_death = true;
                    }
                    other => panic!("unexpected victim {:?}", other),
                }
            }
        }
        if forced_death {
            break;
        }
    }

    assert_eq!(survived_hits, 2);
    assert!(forced_death);
    assert!(!w.contains(first));
    assert!(!w.contains(second));
    assert!(!w.contains(shot));
    assert!(w.contains(relay));
}

#[test]
fn test_splitting_children_arrive_next_tick() {
    let mut w = world();
    let config = w.config.clone();
    w.spawn(spawn::swarmer(&config, Vec2::new(110.0, 300.0), None));
    w.spawn(spawn::projectile(&player_shot(
        Vec2::new(100.0, 300.0),
        Vec2::new(8.0, 0.0),
        ProjectileClass::Splitting { generation: 2 },
    )));

    let events = run_simulation_tick(&mut w);
    assert!(events.iter().any(|e| matches!(e, SimulationEvent::Hit { .. })));
    assert!(!events.iter().any(|e| matches!(e, SimulationEvent::Split { .. })));
    assert_eq!(w.live_count(Kind::Projectile), 0);

    let events = run_simulation_tick(&mut w);
    assert!(events.iter().any(|e| matches!(
        e,
        SimulationEvent::Split { generation: 1, children, .. } if *children == config.combat.split_count as usize
    )));
    let children = w.ids(Kind::Projectile);
    assert_eq!(children.len(), config.combat.split_count as usize);
    for id in children {
        let state = w.get(id).unwrap().payload.projectile().unwrap();
        assert_eq!(state.class, ProjectileClass::Splitting { generation: 1 });
        assert_eq!(state.credit, Some(P0));
        assert_eq!(state.damage, 12.5);
    }
}

#[test]
fn test_last_generation_does_not_split() {
    let mut w = world();
    let config = w.config.clone();
    w.spawn(spawn::swarmer(&config, Vec2::new(110.0, 300.0), None));
    w.spawn(spawn::projectile(&player_shot(
        Vec2::new(100.0, 300.0),
        Vec2::new(8.0, 0.0),
        ProjectileClass::Splitting { generation: 0 },
    )));

    run_simulation_tick(&mut w);
    let events = run_simulation_tick(&mut w);
    assert!(!events.iter().any(|e| matches!(e, SimulationEvent::Split { .. })));
    assert_eq!(w.live_count(Kind::Projectile), 0);
}

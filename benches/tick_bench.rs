use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

use torus_arena::core::config::SimulationConfig;
use torus_arena::core::types::Vec2;
use torus_arena::ecs::world::World;
use torus_arena::entity::spawn;
use torus_arena::force::ForceField;
use torus_arena::simulation::{populate, run_simulation_tick, ArenaLayout};

/// Ticks per bench iteration
const STEPS: usize = 60;

/// Default arena plus a swarm, a particle cloud at the cap and two wells
fn crowded_world(particles: usize) -> World {
    let mut config = SimulationConfig::default();
    config.seed = 0xBEEF;
    config.particles.max_particles = particles / 2;
    let mut world = World::new(config);

    let layout = ArenaLayout {
        hunters: 8,
        drifters: 8,
        hives: 3,
        ..ArenaLayout::default()
    };
    populate(&mut world, &layout);

    for _ in 0..40 {
        let at = world.random_position();
        let swarmer = spawn::swarmer(&world.config, at, None);
        world.spawn(swarmer);
    }
    for _ in 0..particles {
        let at = world.random_position();
        let velocity = world.random_unit();
        let lifetime = world.config.particles.lifetime * 10.0;
        world.spawn_particle(spawn::particle(at, velocity, lifetime, false));
    }
    for at in [Vec2::new(200.0, 300.0), Vec2::new(600.0, 300.0)] {
        let id = world.next_field_id();
        let well = ForceField::well(id, at, &world.config.force, None, None);
        world.add_field(well);
    }
    world
}

fn bench_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_tick");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(5));

    for particles in [200_usize, 800] {
        group.bench_function(format!("steps{}_particles{}", STEPS, particles), |b| {
            b.iter_batched(
                || crowded_world(particles),
                |mut world| {
                    for _ in 0..STEPS {
                        black_box(run_simulation_tick(&mut world));
                    }
                    world
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ticks);
criterion_main!(benches);

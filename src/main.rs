//! Torus Arena - headless runner
//!
//! Runs a seeded arena for a fixed number of ticks and prints the scoreboard
//! as text or JSON. Scripted inputs replay recorded button changes at given
//! ticks. With `--interactive` it drops into a line-driven console instead.

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use torus_arena::core::clock::ClockSnapshot;
use torus_arena::core::config::SimulationConfig;
use torus_arena::core::types::PlayerSlot;
use torus_arena::ecs::world::World;
use torus_arena::entity::Kind;
use torus_arena::input::{Button, InputEvent};
use torus_arena::simulation::{populate, run_simulation_tick, ArenaLayout, PlayerScore, SimulationEvent};

/// Headless arena runner
#[derive(Parser, Debug)]
#[command(name = "torus-arena")]
#[command(about = "Run a wrap-around arena simulation and report scores")]
struct Args {
    /// Simulation config (TOML, partial files are fine)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arena layout (TOML)
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Ticks to run
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Random seed, overrides the config's
    #[arg(long)]
    seed: Option<u64>,

    /// Scripted inputs (JSON array of {tick, slot, button, pressed})
    #[arg(long)]
    script: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Line-driven console instead of a batch run
    #[arg(long, short = 'i')]
    interactive: bool,
}

/// One recorded button change
#[derive(Debug, Deserialize)]
struct ScriptedInput {
    tick: u64,
    #[serde(flatten)]
    event: InputEvent,
}

#[derive(Debug, Default, Serialize)]
struct EventTally {
    fired: usize,
    hits: usize,
    bounces: usize,
    kills: usize,
    absorbed: usize,
    splits: usize,
    pickups: usize,
    abilities: usize,
    spawned: usize,
}

impl EventTally {
    fn add(&mut self, event: &SimulationEvent) {
        match event {
            SimulationEvent::Fired { .. } => self.fired += 1,
            SimulationEvent::Hit { .. } => self.hits += 1,
            SimulationEvent::Bounce { .. } => self.bounces += 1,
            SimulationEvent::Kill { .. } => self.kills += 1,
            SimulationEvent::Absorbed { .. } => self.absorbed += 1,
            SimulationEvent::Split { .. } => self.splits += 1,
            SimulationEvent::PickupCollected { .. } => self.pickups += 1,
            SimulationEvent::AbilityUsed { .. } => self.abilities += 1,
            SimulationEvent::Spawned { .. } => self.spawned += 1,
            SimulationEvent::WellCollapsed { .. } | SimulationEvent::Territory { .. } => {}
        }
    }
}

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    clock: ClockSnapshot,
    events: EventTally,
    players: Vec<ScoreRow>,
}

#[derive(Serialize)]
struct ScoreRow {
    slot: u8,
    #[serde(flatten)]
    score: PlayerScore,
}

fn load_layout(path: &Path) -> Result<ArenaLayout, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn load_script(path: &Path) -> Result<BTreeMap<u64, Vec<InputEvent>>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    let inputs: Vec<ScriptedInput> = serde_json::from_str(&content)?;
    let mut by_tick: BTreeMap<u64, Vec<InputEvent>> = BTreeMap::new();
    for input in inputs {
        by_tick.entry(input.tick).or_default().push(input.event);
    }
    Ok(by_tick)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("torus_arena=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let layout = match &args.layout {
        Some(path) => load_layout(path)?,
        None => ArenaLayout::default(),
    };

    tracing::info!("Torus Arena starting (seed {})", config.seed);
    let seed = config.seed;
    let mut world = World::try_new(config)?;
    populate(&mut world, &layout);

    if args.interactive {
        return run_console(&mut world);
    }

    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => BTreeMap::new(),
    };

    let mut tally = EventTally::default();
    for tick in 0..args.ticks {
        if let Some(events) = script.get(&tick) {
            for event in events {
                world.input.handle(*event);
            }
        }
        for event in run_simulation_tick(&mut world) {
            tally.add(&event);
        }
    }

    let summary = RunSummary {
        seed,
        ticks: args.ticks,
        clock: world.clock.snapshot(),
        events: tally,
        players: world
            .scoreboard
            .rows()
            .into_iter()
            .map(|(slot, score)| ScoreRow { slot: slot.0, score })
            .collect(),
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("=== TORUS ARENA ===");
    println!(
        "Seed {} | {} ticks in {} ms",
        summary.seed, summary.ticks, summary.clock.timestamp_ms
    );
    let e = &summary.events;
    println!(
        "Shots {} | hits {} | bounces {} | kills {} | absorbed {} | splits {} | pickups {}",
        e.fired, e.hits, e.bounces, e.kills, e.absorbed, e.splits, e.pickups
    );
    println!();
    println!("{:<6} {:>8} {:>6} {:>7} {:>10}", "slot", "score", "kills", "deaths", "dominance");
    for row in &summary.players {
        println!(
            "{:<6} {:>8} {:>6} {:>7} {:>10.1}",
            row.slot, row.score.score, row.score.kills, row.score.deaths, row.score.dominance
        );
    }
}

fn display_status(world: &World) {
    println!("\n--- Tick {} ---", world.clock.id());
    for kind in Kind::ALL {
        let count = world.live_count(kind);
        if count > 0 {
            println!("  {:<11} {}", kind.name(), count);
        }
    }
    println!("  fields      {}", world.fields.len());
    for (slot, score) in world.scoreboard.rows() {
        println!(
            "  player {}: score {} ({} kills, {} deaths, {:.0}% territory)",
            slot.0,
            score.score,
            score.kills,
            score.deaths,
            score.area_fraction * 100.0
        );
    }
}

fn print_events(events: &[SimulationEvent]) {
    for event in events {
        match event {
            SimulationEvent::Territory { .. } | SimulationEvent::Fired { .. } => {}
            other => println!("  {:?}", other),
        }
    }
}

fn run_console(world: &mut World) -> Result<(), Box<dyn Error>> {
    println!("\n=== TORUS ARENA ===");
    println!("Commands:");
    println!("  tick / t                 - Advance one tick");
    println!("  run <n>                  - Run n ticks");
    println!("  press <slot> <button>    - Hold a button (thrust, left, right, fire, ability)");
    println!("  release <slot> <button>  - Let go of a button");
    println!("  status / s               - Show arena status");
    println!("  quit / q                 - Exit");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => continue,
            ["quit" | "q"] => break,
            ["tick" | "t"] => print_events(&run_simulation_tick(world)),
            ["run", n] => match n.parse::<u64>() {
                Ok(n) => {
                    for _ in 0..n {
                        print_events(&run_simulation_tick(world));
                    }
                    display_status(world);
                }
                Err(_) => println!("Not a tick count: {}", n),
            },
            [verb @ ("press" | "release"), slot, button] => {
                let (Ok(slot), Some(button)) = (slot.parse::<u8>(), Button::from_name(button)) else {
                    println!("Usage: {} <slot> <button>", verb);
                    continue;
                };
                world.input.handle(InputEvent {
                    slot: PlayerSlot(slot),
                    button,
                    pressed: *verb == "press",
                });
            }
            ["status" | "s"] => display_status(world),
            _ => println!("Unknown command: {}", line.trim()),
        }
    }

    tracing::info!("Torus Arena shutting down at tick {}", world.clock.id());
    Ok(())
}

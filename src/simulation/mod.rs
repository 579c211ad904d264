pub mod abilities;
pub mod behavior;
pub mod events;
pub mod scoreboard;
pub mod setup;
pub mod tick;

pub use events::SimulationEvent;
pub use scoreboard::{PlayerScore, Scoreboard};
pub use setup::{populate, respawn_player, ArenaLayout};
pub use tick::{run_simulation_tick, run_ticks};

pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::Clock;
pub use config::SimulationConfig;
pub use error::{KernelError, Result};

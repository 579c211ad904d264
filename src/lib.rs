//! Torus Arena - real-time entity simulation kernel for a wrap-around arena
//!
//! The kernel is tick-driven and single-threaded. A host owns a
//! [`ecs::world::World`], feeds it input, calls
//! [`simulation::run_simulation_tick`] at a fixed rate and draws the result
//! through [`render::DrawSurface`].

pub mod combat;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod force;
pub mod input;
pub mod render;
pub mod schedule;
pub mod simulation;
pub mod spatial;
pub mod territory;

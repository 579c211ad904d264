//! Spatial systems: the wrap-around field and its decorative lattice

pub mod grid;
pub mod torus;

pub use grid::BackgroundGrid;
pub use torus::TorusField;

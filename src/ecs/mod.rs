//! Entity storage: per-kind buckets and the world that owns them

pub mod store;
pub mod world;

pub use store::KindStore;
pub use world::World;

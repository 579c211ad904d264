use thiserror::Error;

use crate::territory::voronoi::TerritoryError;

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("Entity not found: {0:?}")]
    EntityNotFound(crate::core::types::EntityId),

    #[error("Config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Territory evaluation failed: {0}")]
    Territory(#[from] TerritoryError),
}

pub type Result<T> = std::result::Result<T, KernelError>;

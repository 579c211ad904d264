//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every section deserializes from
//! TOML with defaults, so a config file only needs the values it changes:
//!
//! ```toml
//! seed = 7
//!
//! [field]
//! width = 1024.0
//!
//! [combat]
//! hostile_kill_value = 150
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{KernelError, Result};

/// Configuration for the simulation kernel
///
/// These values have been tuned for a 60 Hz tick on an 800x600 field.
/// Changing them will affect gameplay pacing and feel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the world RNG (jittered spawns, particle scatter)
    pub seed: u64,
    pub field: FieldConfig,
    pub timing: TimingConfig,
    pub combat: CombatConfig,
    pub force: ForceConfig,
    pub craft: CraftConfig,
    pub structures: StructureConfig,
    pub particles: ParticleConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            field: FieldConfig::default(),
            timing: TimingConfig::default(),
            combat: CombatConfig::default(),
            force: ForceConfig::default(),
            craft: CraftConfig::default(),
            structures: StructureConfig::default(),
            particles: ParticleConfig::default(),
        }
    }
}

// === SPATIAL FIELD ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Field width in field units. Opposite edges are identified.
    pub width: f32,
    /// Field height in field units
    pub height: f32,
    /// Spacing of the decorative background grid lattice
    pub grid_spacing: f32,
    /// Fraction of grid displacement kept each tick (spring-back speed)
    ///
    /// At 0.85 a burst fades to ~2% within 25 ticks.
    pub grid_relax: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            grid_spacing: 40.0,
            grid_relax: 0.85,
        }
    }
}

// === CLOCK ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Nominal host tick rate. The kernel never sleeps; hosts use this.
    pub tick_hz: u32,
    /// Homing entities re-pick their target every N ticks
    ///
    /// Accuracy/cost trade-off: targets can be up to N ticks stale.
    pub retarget_interval: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            retarget_interval: 15,
        }
    }
}

// === COLLISION & COMBAT ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Squared per-tick displacement above which projectiles are sub-stepped
    ///
    /// A projectile moving at speed `s` is tested at `floor(s² / threshold)`
    /// points along its path. At 36.0 (6 units), a 12-unit/tick shot is
    /// tested at 4 points, 3 units apart.
    pub substep_threshold_sq: f32,
    /// Extra gap left between a bounced projectile and the shield surface
    pub bounce_clearance: f32,
    /// Score for destroying a hostile craft
    pub hostile_kill_value: i64,
    /// Score for destroying a swarmer
    pub swarmer_kill_value: i64,
    /// Score for destroying a structure
    pub structure_kill_value: i64,
    /// Score for destroying another player
    pub player_kill_value: i64,
    /// Hull damage a swarmer deals when it rams an unshielded player
    pub swarmer_contact_damage: f32,
    /// Child projectiles spawned when a splitting projectile dies on a hit
    pub split_count: u32,
    /// Angular spread (radians) between split children
    pub split_spread: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            substep_threshold_sq: 36.0,
            bounce_clearance: 1.0,
            hostile_kill_value: 100,
            swarmer_kill_value: 10,
            structure_kill_value: 250,
            player_kill_value: 500,
            swarmer_contact_damage: 10.0,
            split_count: 3,
            split_spread: 0.5,
        }
    }
}

// === FORCE FIELDS ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Added to every field distance before division
    pub epsilon: f32,

    /// Attraction scale of a collapsing well
    pub well_strength: f32,
    /// Mass a fresh well starts with. Life in ticks = mass / decay.
    pub well_initial_mass: f32,
    /// Mass lost per tick
    pub well_decay: f32,
    /// Objects closer than this are absorbed
    pub well_horizon: f32,
    /// Influence radius
    pub well_radius: f32,
    /// Velocity change cap per tick (keeps close passes from exploding)
    pub well_max_accel: f32,
    /// Hull damage per tick for vehicles inside the horizon
    pub well_horizon_damage: f32,

    /// Influence radius of a damping zone
    pub damping_radius: f32,
    /// Velocity fraction removed per tick from ordinary targets
    pub damping_base: f32,
    /// Velocity fraction removed per tick from hostile projectiles
    pub damping_projectile: f32,
    /// Lifetime in ticks
    pub damping_duration: u32,

    /// Radius of a propulsion pulse
    pub pulse_radius: f32,
    /// Peak push of a propulsion pulse
    pub pulse_strength: f32,
    /// Ticks a pulse stays in the active set
    pub pulse_ttl: u32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.001,

            well_strength: 0.6,
            well_initial_mass: 300.0,
            well_decay: 1.0,
            well_horizon: 12.0,
            well_radius: 250.0,
            well_max_accel: 1.5,
            well_horizon_damage: 0.5,

            damping_radius: 90.0,
            damping_base: 0.05,
            damping_projectile: 0.25,
            damping_duration: 240,

            pulse_radius: 60.0,
            pulse_strength: 1.5,
            pulse_ttl: 3,
        }
    }
}

// === CRAFT ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftConfig {
    pub player_radius: f32,
    pub player_mass: f32,
    pub player_max_energy: f32,
    /// Energy regained per tick
    pub player_regen: f32,
    pub player_integrity: f32,
    /// Velocity added per thrust tick
    pub player_thrust: f32,
    /// Energy spent per thrust tick
    pub player_thrust_cost: f32,
    /// Radians per tick while a turn button is held
    pub player_turn_rate: f32,
    /// A propulsion pulse is emitted every N thrust ticks
    pub pulse_every: u32,
    pub max_speed: f32,
    /// Fraction of velocity lost per tick for craft
    pub drag: f32,

    pub weapon_cooldown: u32,
    pub weapon_energy_cost: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_radius: f32,
    /// Projectile lifetime in ticks. Range = speed × ttl.
    pub projectile_ttl: u32,

    pub shield_radius: f32,
    /// Energy spent per reflected projectile
    pub shield_bounce_cost: f32,

    pub ability_cost: f32,
    pub ability_cooldown: u32,
    /// Ticks a phased craft stays in alternate space
    pub phase_duration: u32,
    /// Ticks before a destroyed player craft returns
    pub respawn_delay: u32,

    pub hostile_radius: f32,
    pub hostile_mass: f32,
    pub hostile_integrity: f32,
    pub hostile_thrust: f32,
    pub hostile_turn_rate: f32,
    /// Hunters fire when the target is within this angle of their heading
    pub hostile_fire_arc: f32,
    pub hostile_weapon_cooldown: u32,

    pub swarmer_radius: f32,
    pub swarmer_mass: f32,
    pub swarmer_thrust: f32,
    pub swarmer_max_speed: f32,
}

impl Default for CraftConfig {
    fn default() -> Self {
        Self {
            player_radius: 12.0,
            player_mass: 10.0,
            player_max_energy: 100.0,
            player_regen: 0.25,
            player_integrity: 100.0,
            player_thrust: 0.15,
            player_thrust_cost: 0.1,
            player_turn_rate: 0.08,
            pulse_every: 12,
            max_speed: 6.0,
            drag: 0.01,

            weapon_cooldown: 10,
            weapon_energy_cost: 5.0,
            projectile_speed: 9.0,
            projectile_damage: 25.0,
            projectile_radius: 2.0,
            projectile_ttl: 90,

            shield_radius: 20.0,
            shield_bounce_cost: 8.0,

            ability_cost: 40.0,
            ability_cooldown: 180,
            phase_duration: 120,
            respawn_delay: 120,

            hostile_radius: 14.0,
            hostile_mass: 12.0,
            hostile_integrity: 20.0,
            hostile_thrust: 0.08,
            hostile_turn_rate: 0.05,
            hostile_fire_arc: 0.2,
            hostile_weapon_cooldown: 45,

            swarmer_radius: 5.0,
            swarmer_mass: 2.0,
            swarmer_thrust: 0.12,
            swarmer_max_speed: 4.0,
        }
    }
}

// === STRUCTURES & PICKUPS ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    pub radius: f32,
    pub mass: f32,
    pub integrity: f32,
    /// Hive spawn interval is drawn uniformly from [min, max] ticks
    pub hive_spawn_min: u32,
    pub hive_spawn_max: u32,
    /// Hives stop spawning while they own this many swarmers
    pub hive_max_children: usize,
    /// Relays recharge allied craft within this radius
    pub relay_radius: f32,
    /// Energy per tick a relay gives each craft in range
    pub relay_rate: f32,

    pub pickup_radius: f32,
    pub pickup_energy: f32,
    pub pickup_score: i64,
    /// Pickup drop interval is drawn uniformly from [min, max] ticks
    pub pickup_interval_min: u32,
    pub pickup_interval_max: u32,
    /// Ticks before an uncollected pickup fades out
    pub pickup_lifetime: u32,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            radius: 24.0,
            mass: 200.0,
            integrity: 150.0,
            hive_spawn_min: 120,
            hive_spawn_max: 240,
            hive_max_children: 6,
            relay_radius: 80.0,
            relay_rate: 0.5,

            pickup_radius: 8.0,
            pickup_energy: 40.0,
            pickup_score: 25,
            pickup_interval_min: 300,
            pickup_interval_max: 600,
            pickup_lifetime: 900,
        }
    }
}

// === DECORATIVE PARTICLES ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Live particles above this count are spawned inert
    ///
    /// Inert particles still move and age but skip expensive fields
    /// (wells, damping zones), which caps the per-tick field cost.
    pub max_particles: usize,
    /// Base particle lifetime in ticks (scaled by gravity potential)
    pub lifetime: f32,
    /// Particles spawned when a craft is destroyed
    pub debris_count: u32,
    pub debris_speed: f32,
    /// Particles spawned per thrust tick
    pub exhaust_count: u32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_particles: 400,
            lifetime: 40.0,
            debris_count: 12,
            debris_speed: 2.0,
            exhaust_count: 1,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate().map_err(KernelError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.field.width <= 0.0 || self.field.height <= 0.0 {
            return Err(format!(
                "field size must be positive (got {}x{})",
                self.field.width, self.field.height
            ));
        }

        if self.field.grid_spacing <= 0.0 {
            return Err("grid_spacing must be positive".into());
        }

        if self.combat.substep_threshold_sq <= 0.0 {
            return Err("substep_threshold_sq must be positive".into());
        }

        if self.force.epsilon <= 0.0 {
            return Err("force epsilon must be positive".into());
        }

        if self.force.well_decay <= 0.0 {
            return Err("well_decay must be positive or wells never collapse".into());
        }

        if self.structures.hive_spawn_min > self.structures.hive_spawn_max {
            return Err(format!(
                "hive_spawn_min ({}) should be <= hive_spawn_max ({})",
                self.structures.hive_spawn_min, self.structures.hive_spawn_max
            ));
        }

        if self.structures.pickup_interval_min > self.structures.pickup_interval_max {
            return Err(format!(
                "pickup_interval_min ({}) should be <= pickup_interval_max ({})",
                self.structures.pickup_interval_min, self.structures.pickup_interval_max
            ));
        }

        // A shot that cannot clear its own shield radius would bounce off its owner
        if self.craft.shield_radius <= self.craft.player_radius {
            return Err(format!(
                "shield_radius ({}) should be > player_radius ({})",
                self.craft.shield_radius, self.craft.player_radius
            ));
        }

        Ok(())
    }
}

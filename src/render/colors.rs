//! Color definitions for kinds, factions and fields

use crate::core::types::{Faction, PlayerSlot};
use crate::entity::Kind;

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Darken color by a factor (0.0 = black, 1.0 = unchanged)
    pub fn darken(&self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    /// 8-bit channels, for terminal and image hosts
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}

pub const BACKGROUND: Color = Color::new(0.02, 0.02, 0.05, 1.0);
pub const GRID: Color = Color::new(0.15, 0.15, 0.3, 1.0);
pub const HOSTILE: Color = Color::new(0.9, 0.25, 0.2, 1.0);
pub const SWARMER: Color = Color::new(0.95, 0.55, 0.1, 1.0);
pub const PARTICLE: Color = Color::new(0.7, 0.7, 0.7, 1.0);
pub const PICKUP: Color = Color::new(0.9, 0.9, 0.2, 1.0);
pub const WELL: Color = Color::new(0.6, 0.2, 0.9, 1.0);
pub const DAMPING: Color = Color::new(0.2, 0.8, 0.8, 1.0);
pub const PULSE: Color = Color::new(0.5, 0.5, 0.9, 1.0);

/// Alt-space objects are drawn at this brightness
pub const ALT_SPACE_DIM: f32 = 0.45;

const PLAYER_COLORS: [Color; 4] = [
    Color::new(0.2, 0.6, 0.95, 1.0), // Blue
    Color::new(0.3, 0.9, 0.4, 1.0),  // Green
    Color::new(0.95, 0.4, 0.8, 1.0), // Pink
    Color::new(0.95, 0.95, 0.95, 1.0),
];

pub fn player_color(slot: PlayerSlot) -> Color {
    PLAYER_COLORS[slot.0 as usize % PLAYER_COLORS.len()]
}

pub fn faction_color(faction: Faction) -> Color {
    match faction {
        Faction::Player(slot) => player_color(slot),
        Faction::Hostile => HOSTILE,
    }
}

/// Base color for an entity of `kind`. Faction wins where there is one,
/// except for swarmers which keep their own color.
pub fn entity_color(kind: Kind, faction: Option<Faction>) -> Color {
    match (kind, faction) {
        (Kind::Swarmer, _) => SWARMER,
        (Kind::Particle, _) => PARTICLE,
        (Kind::Pickup, _) => PICKUP,
        (_, Some(faction)) => faction_color(faction),
        (_, None) => PARTICLE,
    }
}

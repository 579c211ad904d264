//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities (stable arena handle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Force field identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldId(pub u32);

/// Scheduled task identifier, used for cancellation and next-tick deduplication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

/// Seat of a human player (input source and scoreboard row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerSlot(pub u8);

/// Allegiance used to decide who can hurt whom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player(PlayerSlot),
    Hostile,
}

impl Faction {
    /// Two factions are hostile to each other when they differ
    pub fn is_hostile_to(&self, other: &Faction) -> bool {
        self != other
    }

    pub fn slot(&self) -> Option<PlayerSlot> {
        match self {
            Faction::Player(slot) => Some(*slot),
            Faction::Hostile => None,
        }
    }
}

/// 2D vector in field units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians, 0 = +x)
    pub fn from_angle(angle: f32) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn length_sq(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::default()
        }
    }

    /// Scale down to `max` length if longer
    pub fn clamp_length(&self, max: f32) -> Self {
        let len_sq = self.length_sq();
        if len_sq > max * max && len_sq > 0.0 {
            *self * (max / len_sq.sqrt())
        } else {
            *self
        }
    }

    /// Mirror this vector about the line through the origin with unit `normal`
    pub fn reflect(&self, normal: &Self) -> Self {
        *self - *normal * (2.0 * self.dot(normal))
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl std::ops::MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faction_hostility() {
        let a = Faction::Player(PlayerSlot(0));
        let b = Faction::Player(PlayerSlot(1));
        assert!(a.is_hostile_to(&b));
        assert!(a.is_hostile_to(&Faction::Hostile));
        assert!(!Faction::Hostile.is_hostile_to(&Faction::Hostile));
        assert!(!a.is_hostile_to(&a));
    }

    #[test]
    fn test_faction_slot() {
        assert_eq!(Faction::Player(PlayerSlot(3)).slot(), Some(PlayerSlot(3)));
        assert_eq!(Faction::Hostile.slot(), None);
    }

    #[test]
    fn test_reflect_about_axis() {
        let incoming = Vec2::new(1.0, -1.0);
        let normal = Vec2::new(0.0, 1.0);
        let out = incoming.reflect(&normal);
        assert!((out.x - 1.0).abs() < 1e-6);
        assert!((out.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_length() {
        let v = Vec2::new(30.0, 40.0).clamp_length(5.0);
        assert!((v.length() - 5.0).abs() < 1e-4);
        let short = Vec2::new(1.0, 0.0).clamp_length(5.0);
        assert_eq!(short, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_entity_ids_unique() {
        assert_ne!(EntityId::new(), EntityId::new());
    }
}

//! Toroidal coordinate space
//!
//! The play area identifies opposite edges. Every distance and direction in
//! the kernel goes through [`TorusField`]; a plain Euclidean delta reports
//! ~W for two objects sitting on either side of the seam.

use rand::Rng;

use crate::core::types::Vec2;

/// Wrap-around field of `width` × `height` units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusField {
    pub width: f32,
    pub height: f32,
}

impl TorusField {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Signed x distance from `a` to `b` along the shorter way around
    #[inline]
    pub fn dist_x(&self, a: Vec2, b: Vec2) -> f32 {
        wrapped_delta(b.x - a.x, self.width)
    }

    /// Signed y distance from `a` to `b` along the shorter way around
    #[inline]
    pub fn dist_y(&self, a: Vec2, b: Vec2) -> f32 {
        wrapped_delta(b.y - a.y, self.height)
    }

    /// Shortest vector from `a` to `b`
    #[inline]
    pub fn delta(&self, a: Vec2, b: Vec2) -> Vec2 {
        Vec2::new(self.dist_x(a, b), self.dist_y(a, b))
    }

    #[inline]
    pub fn distance_sq(&self, a: Vec2, b: Vec2) -> f32 {
        self.delta(a, b).length_sq()
    }

    #[inline]
    pub fn distance(&self, a: Vec2, b: Vec2) -> f32 {
        self.delta(a, b).length()
    }

    /// Unit vector from `a` toward `b` (zero when they coincide)
    pub fn direction(&self, a: Vec2, b: Vec2) -> Vec2 {
        self.delta(a, b).normalize()
    }

    /// Fold an x coordinate back into `[0, width)`
    pub fn mod_x(&self, x: f32) -> f32 {
        fold(x, self.width)
    }

    /// Fold a y coordinate back into `[0, height)`
    pub fn mod_y(&self, y: f32) -> f32 {
        fold(y, self.height)
    }

    pub fn wrap(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.mod_x(p.x), self.mod_y(p.y))
    }

    /// Plain rectangle test, no wrapping
    pub fn is_inside(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }

    pub fn is_outside(&self, p: Vec2) -> bool {
        !self.is_inside(p)
    }

    pub fn random_position<R: Rng>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.gen_range(0.0..self.width),
            rng.gen_range(0.0..self.height),
        )
    }
}

/// Pick the shorter of the direct and around-the-edge deltas, keeping the sign
/// of the direction travelled
#[inline]
fn wrapped_delta(direct: f32, extent: f32) -> f32 {
    let d = direct % extent;
    if d > extent * 0.5 {
        d - extent
    } else if d < -extent * 0.5 {
        d + extent
    } else {
        d
    }
}

fn fold(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let v = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if v >= extent {
        0.0
    } else {
        v
    }
}

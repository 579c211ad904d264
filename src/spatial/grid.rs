//! Decorative background lattice
//!
//! Wells and pulses shove the lattice points around; the host draws the
//! displaced lattice behind the arena. Nothing here feeds back into physics.

use crate::core::types::Vec2;
use crate::spatial::torus::TorusField;

/// Generic 2D grid of lattice cells laid over the field
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    pub cell_size: f32,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
            data: vec![T::default(); width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            Some(&self.data[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.width && y < self.height {
            Some(&mut self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Rest position of a lattice point
    pub fn anchor(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(x as f32 * self.cell_size, y as f32 * self.cell_size)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}

/// Lattice of displacement vectors relaxing back toward their anchors
#[derive(Debug, Clone)]
pub struct BackgroundGrid {
    points: Grid<Vec2>,
    relax: f32,
}

impl BackgroundGrid {
    pub fn new(torus: &TorusField, spacing: f32, relax: f32) -> Self {
        let width = (torus.width / spacing).ceil().max(1.0) as usize;
        let height = (torus.height / spacing).ceil().max(1.0) as usize;
        Self {
            points: Grid::new(width, height, spacing),
            relax,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.points.width, self.points.height)
    }

    pub fn displacement(&self, x: usize, y: usize) -> Vec2 {
        self.points.get(x, y).copied().unwrap_or_default()
    }

    /// Displaced lattice point, wrapped into the field
    pub fn point(&self, torus: &TorusField, x: usize, y: usize) -> Vec2 {
        torus.wrap(self.points.anchor(x, y) + self.displacement(x, y))
    }

    /// Push lattice points radially away from `center` (negative strength pulls)
    ///
    /// Falloff is linear to zero at `radius`.
    pub fn burst(&mut self, torus: &TorusField, center: Vec2, radius: f32, strength: f32) {
        if radius <= 0.0 {
            return;
        }
        for y in 0..self.points.height {
            for x in 0..self.points.width {
                let anchor = self.points.anchor(x, y);
                let offset = torus.delta(center, anchor);
                let distance = offset.length();
                if distance >= radius {
                    continue;
                }
                let falloff = 1.0 - distance / radius;
                if let Some(p) = self.points.get_mut(x, y) {
                    *p += offset.normalize() * (strength * falloff);
                }
            }
        }
    }

    /// Spring every point back toward its anchor
    pub fn relax(&mut self) {
        let keep = self.relax;
        for p in self.points.iter_mut() {
            *p *= keep;
        }
    }
}

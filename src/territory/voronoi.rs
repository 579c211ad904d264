//! Voronoi cells on the torus by half-plane clipping
//!
//! A site's cell always fits in the W×H rectangle centered on it: its own
//! replicas one tile away bisect exactly at the rectangle edges. Clipping
//! that rectangle against the bisectors of every other site's 9 nearest
//! replicas (offsets -1, 0, +1 tiles on each axis) leaves the cell. Cells
//! may extend past the field edges; they are not wrapped, so areas add up
//! to W·H.

use geo::{Area, Centroid, Coord, LineString, Polygon};
use thiserror::Error;

use crate::core::types::{PlayerSlot, Vec2};
use crate::spatial::TorusField;

/// Cells smaller than this are treated as empty
const MIN_AREA: f64 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerritoryError {
    #[error("sites {0:?} and {1:?} coincide")]
    CoincidentSites(PlayerSlot, PlayerSlot),

    #[error("cell of {0:?} is empty")]
    EmptyCell(PlayerSlot),

    #[error("cell of {0:?} has no centroid")]
    NoCentroid(PlayerSlot),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub slot: PlayerSlot,
    pub position: Vec2,
}

#[derive(Debug, Clone)]
pub struct TerritoryCell {
    pub slot: PlayerSlot,
    pub polygon: Polygon<f64>,
    pub area: f64,
    /// Centroid wrapped back into the field
    pub centroid: Vec2,
    /// Wrap-aware distance from the site to its centroid
    pub centroid_distance: f32,
}

fn coord(p: Vec2) -> Coord<f64> {
    Coord {
        x: p.x as f64,
        y: p.y as f64,
    }
}

/// Keep the part of a convex polygon closer to `site` than to `other`
fn clip(ring: &[Coord<f64>], site: Coord<f64>, other: Coord<f64>) -> Vec<Coord<f64>> {
    // Inside when n·x <= c, with n = other - site, c = (|other|² - |site|²) / 2
    let n = Coord {
        x: other.x - site.x,
        y: other.y - site.y,
    };
    let c = (other.x * other.x + other.y * other.y - site.x * site.x - site.y * site.y) * 0.5;
    let side = |p: &Coord<f64>| n.x * p.x + n.y * p.y - c;

    let mut out = Vec::with_capacity(ring.len() + 1);
    for (i, current) in ring.iter().enumerate() {
        let next = &ring[(i + 1) % ring.len()];
        let (a, b) = (side(current), side(next));
        if a <= 0.0 {
            out.push(*current);
        }
        if (a < 0.0 && b > 0.0) || (a > 0.0 && b < 0.0) {
            let t = a / (a - b);
            out.push(Coord {
                x: current.x + (next.x - current.x) * t,
                y: current.y + (next.y - current.y) * t,
            });
        }
    }
    out
}

fn cell_of(torus: &TorusField, site: &Site, sites: &[Site]) -> Result<TerritoryCell, TerritoryError> {
    let (w, h) = (torus.width as f64, torus.height as f64);
    let center = coord(site.position);
    let mut ring = vec![
        Coord { x: center.x - w / 2.0, y: center.y - h / 2.0 },
        Coord { x: center.x + w / 2.0, y: center.y - h / 2.0 },
        Coord { x: center.x + w / 2.0, y: center.y + h / 2.0 },
        Coord { x: center.x - w / 2.0, y: center.y + h / 2.0 },
    ];

    for other in sites.iter().filter(|o| o.slot != site.slot) {
        let base = coord(other.position);
        for dy in [-h, 0.0, h] {
            for dx in [-w, 0.0, w] {
                let replica = Coord { x: base.x + dx, y: base.y + dy };
                if replica == center {
                    return Err(TerritoryError::CoincidentSites(site.slot, other.slot));
                }
                ring = clip(&ring, center, replica);
                if ring.len() < 3 {
                    return Err(TerritoryError::EmptyCell(site.slot));
                }
            }
        }
    }

    let polygon = Polygon::new(LineString::from(ring), vec![]);
    let area = polygon.unsigned_area();
    if area < MIN_AREA {
        return Err(TerritoryError::EmptyCell(site.slot));
    }
    let centroid = polygon
        .centroid()
        .ok_or(TerritoryError::NoCentroid(site.slot))?;
    let centroid = torus.wrap(Vec2::new(centroid.x() as f32, centroid.y() as f32));

    Ok(TerritoryCell {
        slot: site.slot,
        polygon,
        area,
        centroid,
        centroid_distance: torus.distance(site.position, centroid),
    })
}

/// Compute every site's cell. Needs at least two sites.
pub fn compute_cells(torus: &TorusField, sites: &[Site]) -> Result<Vec<TerritoryCell>, TerritoryError> {
    sites.iter().map(|site| cell_of(torus, site, sites)).collect()
}

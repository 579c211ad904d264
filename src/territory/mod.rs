//! Territory control: each player owns the part of the field closer to
//! their craft than to any other player's.

pub mod voronoi;

pub use voronoi::{compute_cells, Site, TerritoryCell, TerritoryError};

use crate::core::error::Result;
use crate::ecs::world::World;
use crate::entity::Kind;
use crate::simulation::events::SimulationEvent;

/// Live player craft as territory sites, in slot order
pub fn sites(world: &World) -> Vec<Site> {
    let mut sites: Vec<Site> = world
        .ids(Kind::Player)
        .into_iter()
        .filter_map(|id| world.get(id))
        .filter(|e| e.is_alive())
        .filter_map(|e| {
            e.payload.player_slot().map(|slot| Site {
                slot,
                position: e.body.position,
            })
        })
        .collect();
    sites.sort_by_key(|s| s.slot);
    sites
}

/// Cells for the current sites, for hosts that draw territory outlines
pub fn cells(world: &World) -> Result<Vec<TerritoryCell>> {
    Ok(compute_cells(&world.torus, &sites(world))?)
}

/// Recompute territory and feed it to the scoreboard. A failed evaluation
/// leaves the previous numbers in place.
pub fn evaluate(world: &mut World) {
    let sites = sites(world);
    let total = world.torus.area();

    let shares: Vec<(Site, f32, f32)> = match sites.as_slice() {
        [] => return,
        [only] => vec![(*only, total, 0.0)],
        _ => match compute_cells(&world.torus, &sites) {
            Ok(cells) => sites
                .iter()
                .zip(cells)
                .map(|(site, cell)| (*site, cell.area as f32, cell.centroid_distance))
                .collect(),
            Err(err) => {
                tracing::debug!("Territory evaluation skipped: {}", err);
                return;
            }
        },
    };

    let mut fractions = Vec::with_capacity(shares.len());
    for (site, area, centroid_distance) in shares {
        let fraction = area / total;
        world
            .scoreboard
            .record_territory(site.slot, area, fraction, centroid_distance);
        fractions.push((site.slot, fraction));
    }
    world.events.push(SimulationEvent::Territory {
        tick: world.clock.id(),
        shares: fractions,
    });
}

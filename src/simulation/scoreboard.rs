//! Per-player score bookkeeping

use ahash::AHashMap;
use serde::Serialize;

use crate::core::types::PlayerSlot;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerScore {
    pub score: i64,
    pub kills: u32,
    pub deaths: u32,
    /// Territory area from the latest evaluation
    pub area: f32,
    pub area_fraction: f32,
    /// Wrap-aware distance between the craft and its cell centroid
    pub centroid_distance: f32,
    /// Sum of `area_fraction` over every evaluated tick
    pub dominance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    players: AHashMap<PlayerSlot, PlayerScore>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&mut self, slot: PlayerSlot) -> &mut PlayerScore {
        self.players.entry(slot).or_default()
    }

    pub fn get(&self, slot: PlayerSlot) -> Option<&PlayerScore> {
        self.players.get(&slot)
    }

    pub fn score(&self, slot: PlayerSlot) -> i64 {
        self.players.get(&slot).map(|p| p.score).unwrap_or(0)
    }

    pub fn award(&mut self, slot: PlayerSlot, points: i64) {
        self.entry(slot).score += points;
    }

    pub fn record_kill(&mut self, slot: PlayerSlot, value: i64) {
        let entry = self.entry(slot);
        entry.score += value;
        entry.kills += 1;
    }

    pub fn record_death(&mut self, slot: PlayerSlot) {
        self.entry(slot).deaths += 1;
    }

    pub fn record_territory(
        &mut self,
        slot: PlayerSlot,
        area: f32,
        area_fraction: f32,
        centroid_distance: f32,
    ) {
        let entry = self.entry(slot);
        entry.area = area;
        entry.area_fraction = area_fraction;
        entry.centroid_distance = centroid_distance;
        entry.dominance += area_fraction;
    }

    /// Rows sorted by slot
    pub fn rows(&self) -> Vec<(PlayerSlot, PlayerScore)> {
        let mut rows: Vec<_> = self
            .players
            .iter()
            .map(|(slot, score)| (*slot, score.clone()))
            .collect();
        rows.sort_by_key(|(slot, _)| *slot);
        rows
    }
}

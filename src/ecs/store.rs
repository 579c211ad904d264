//! Typed entity store: species-indexed membership
//!
//! Buckets are insertion-ordered so pair iteration is deterministic. Every
//! N×M interaction rule goes through [`KindStore::for_each_pair`] (or the
//! world-level wrapper that snapshots buckets); at a few hundred objects the
//! O(|A|·|B|) scan needs no spatial index.

use ahash::AHashMap;

use crate::core::types::EntityId;
use crate::entity::Kind;

#[derive(Debug, Default, Clone)]
pub struct KindStore {
    buckets: AHashMap<Kind, Vec<EntityId>>,
}

impl KindStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `id` in the bucket for `kind`. Adding twice is a no-op.
    pub fn add(&mut self, id: EntityId, kind: Kind) {
        let bucket = self.buckets.entry(kind).or_default();
        if !bucket.contains(&id) {
            bucket.push(id);
        }
    }

    /// Remove `id` from the bucket for `kind`. Returns whether it was present.
    pub fn remove(&mut self, id: EntityId, kind: Kind) -> bool {
        match self.buckets.get_mut(&kind) {
            Some(bucket) => match bucket.iter().position(|&e| e == id) {
                Some(index) => {
                    bucket.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    pub fn contains(&self, id: EntityId, kind: Kind) -> bool {
        self.for_kind(kind).contains(&id)
    }

    /// Live set for one species (possibly empty)
    pub fn for_kind(&self, kind: Kind) -> &[EntityId] {
        self.buckets
            .get(&kind)
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
    }

    /// Call `f` once per ordered pair across the two buckets.
    ///
    /// When `a == b` this is the half-cartesian product without self-pairs:
    /// exactly n·(n−1)/2 calls for a bucket of n.
    pub fn for_each_pair<F>(&self, a: Kind, b: Kind, mut f: F)
    where
        F: FnMut(EntityId, EntityId),
    {
        let left = self.for_kind(a);
        if a == b {
            for (i, &x) in left.iter().enumerate() {
                for &y in &left[i + 1..] {
                    f(x, y);
                }
            }
        } else {
            let right = self.for_kind(b);
            for &x in left {
                for &y in right {
                    f(x, y);
                }
            }
        }
    }

    /// Number of entities across all buckets
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.for_kind(kind).len()
    }

    /// Kinds with a non-empty bucket, in sweep order
    pub fn kinds(&self) -> Vec<Kind> {
        Kind::ALL
            .into_iter()
            .filter(|kind| self.count(*kind) > 0)
            .collect()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

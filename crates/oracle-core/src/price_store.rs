//! C1: raw observation storage, keyed by `PairKey`, with staleness eviction.
//!
//! Eviction is keyed on the *incoming* observation's timestamp, not wall
//! clock, so the store stays deterministic under replay.

use std::collections::{HashMap, HashSet};

use crate::types::{PairKey, PriceObservation};

/// Raw per-pair observation storage. Read/write access is exposed through
/// plain `&mut self` methods; callers that need to share a store across
/// threads wrap it in `parking_lot::RwLock` (see `aggregator.rs`).
#[derive(Debug, Clone, Default)]
pub struct PriceStore {
    by_pair: HashMap<PairKey, Vec<PriceObservation>>,
    known_pools: HashSet<String>,
}

impl PriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `obs`, then evicts everything at its `PairKey` older than
    /// `staleness_threshold_ms` relative to `obs.ts_ms`.
    pub fn add(&mut self, obs: PriceObservation, staleness_threshold_ms: i64) {
        self.known_pools.insert(obs.pool.clone());
        let key = PairKey::from_observation(&obs);
        let incoming_ts = obs.ts_ms;
        let entry = self.by_pair.entry(key).or_default();
        entry.push(obs);
        entry.retain(|o| incoming_ts - o.ts_ms < staleness_threshold_ms);
    }

    pub fn sources_for(&self, key: &PairKey) -> &[PriceObservation] {
        self.by_pair.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Drops every observation older than `now_ms - staleness_threshold_ms`
    /// across all pairs (C9 `clear_stale`), and removes pairs left empty.
    pub fn clear_stale(&mut self, now_ms: i64, staleness_threshold_ms: i64) {
        self.by_pair.retain(|_, sources| {
            sources.retain(|o| now_ms - o.ts_ms < staleness_threshold_ms);
            !sources.is_empty()
        });
    }

    pub fn pairs(&self) -> impl Iterator<Item = &PairKey> {
        self.by_pair.keys()
    }

    pub fn known_pools(&self) -> &HashSet<String> {
        &self.known_pools
    }

    pub fn total_observations(&self) -> usize {
        self.by_pair.values().map(|v| v.len()).sum()
    }
}

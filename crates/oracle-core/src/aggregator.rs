//! C2: volume-weighted price aggregation across sources at a pair.
//!
//! Each source is weighted by `sqrt(reserve0 * reserve1)` (pool depth, not
//! a raw reserve); best-price and spread queries read straight off the
//! same source list without re-weighting.

use parking_lot::RwLock;

use crate::config::AggregatorConfig;
use crate::price_store::PriceStore;
use crate::types::{AggregatedPrice, ChainId, PairKey, PriceObservation, PriceSpread};

/// Thread-shared wrapper around a `PriceStore`. Ingestion (`record`) takes
/// the write lock only long enough to push one observation; every read
/// method below takes a read lock, clones what it needs, and releases the
/// lock before doing any floating-point work.
pub struct PriceAggregator {
    store: RwLock<PriceStore>,
    config: AggregatorConfig,
}

impl PriceAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            store: RwLock::new(PriceStore::new()),
            config,
        }
    }

    pub fn record(&self, obs: PriceObservation) {
        self.store.write().add(obs, self.config.staleness_threshold_ms);
    }

    pub fn config(&self) -> AggregatorConfig {
        self.config
    }

    /// `None` when fewer than `min_sources` observations are live for the
    /// pair — insufficient sources is modeled as an absence, not an error.
    pub fn aggregated(&self, chain: ChainId, token0: &str, token1: &str) -> Option<AggregatedPrice> {
        let key = PairKey::new(chain, token0, token1);
        let sources: Vec<PriceObservation> = self.store.read().sources_for(&key).to_vec();
        if sources.len() < self.config.min_sources {
            return None;
        }

        let mut weighted_sum = 0.0f64;
        let mut weight_total = 0.0f64;
        for obs in &sources {
            let weight = ((obs.reserve0 as f64) * (obs.reserve1 as f64)).sqrt();
            weighted_sum += weight * obs.price as f64;
            weight_total += weight;
        }
        // `sum(L) == 0` (every source has a zero-reserve side) is degenerate:
        // there is no meaningful volume-weighted price to report.
        if weight_total <= 0.0 {
            return None;
        }
        let price = (weighted_sum / weight_total).floor() as u128;

        let confidence = coefficient_of_variation_confidence(&sources);
        let ts_ms = sources.iter().map(|o| o.ts_ms).max().unwrap_or(0);

        Some(AggregatedPrice {
            chain,
            token0: token0.to_string(),
            token1: token1.to_string(),
            price,
            confidence,
            sources,
            ts_ms,
        })
    }

    /// The observation quoting the cheapest price when `is_buy`, the
    /// richest otherwise. Looks up `(chain, token_in, token_out)` first;
    /// if nothing is live there, falls back to the reverse key
    /// `(chain, token_out, token_in)` before giving up. Unlike `aggregated`
    /// and `spread`, a single live source is enough to answer — `best` is a
    /// selection, not a blend, so `min_sources` does not gate it.
    pub fn best(
        &self,
        chain: ChainId,
        token_in: &str,
        token_out: &str,
        is_buy: bool,
    ) -> Option<PriceObservation> {
        let store = self.store.read();
        let key = PairKey::new(chain, token_in, token_out);
        let mut sources = store.sources_for(&key);
        let reverse_key = PairKey::new(chain, token_out, token_in);
        if sources.is_empty() {
            sources = store.sources_for(&reverse_key);
        }
        if sources.is_empty() {
            return None;
        }
        if is_buy {
            sources.iter().min_by_key(|o| o.price).cloned()
        } else {
            sources.iter().max_by_key(|o| o.price).cloned()
        }
    }

    /// Spread between the cheapest and richest live source at a pair.
    /// Requires at least 2 live sources — a fixed floor, not `min_sources`:
    /// a spread is meaningless with fewer than two quotes regardless of how
    /// the aggregator itself is configured to gate blending.
    pub fn spread(&self, chain: ChainId, token0: &str, token1: &str) -> Option<PriceSpread> {
        let key = PairKey::new(chain, token0, token1);
        let sources = self.store.read().sources_for(&key).to_vec();
        if sources.len() < 2 {
            return None;
        }
        let min_price = sources.iter().map(|o| o.price).min()?;
        let max_price = sources.iter().map(|o| o.price).max()?;
        let spread_bps = if min_price > 0 {
            (((max_price - min_price) * 10_000) / min_price) as u64
        } else {
            0
        };
        Some(PriceSpread {
            chain,
            token0: token0.to_string(),
            token1: token1.to_string(),
            min_price,
            max_price,
            spread_bps,
            sources: sources.len(),
        })
    }

    /// Every `PairKey` currently known on `chain`, regardless of whether it
    /// clears `min_sources`. Used to enumerate what a graph build should
    /// attempt to aggregate.
    pub fn pairs_for_chain(&self, chain: ChainId) -> Vec<PairKey> {
        self.store
            .read()
            .pairs()
            .filter(|k| k.chain == chain)
            .cloned()
            .collect()
    }

    /// Every raw observation currently live on `chain`, across every pair —
    /// what the trade graph builder iterates to emit edges. Built from
    /// individual observations, not the aggregated price, so that multiple
    /// pools on the same pair still yield distinct, separately poolable
    /// edges.
    pub fn observations_for_chain(&self, chain: ChainId) -> Vec<PriceObservation> {
        let store = self.store.read();
        let mut out = Vec::new();
        for key in store.pairs().filter(|k| k.chain == chain) {
            out.extend_from_slice(store.sources_for(key));
        }
        out
    }

    /// Every pair on `chain` whose spread is at least `min_bps`, sorted
    /// descending by `spread_bps`.
    pub fn all_spreads(&self, chain: ChainId, min_bps: u64) -> Vec<PriceSpread> {
        let store = self.store.read();
        let pairs: Vec<PairKey> = store
            .pairs()
            .filter(|k| k.chain == chain)
            .cloned()
            .collect();
        drop(store);

        let mut spreads: Vec<PriceSpread> = pairs
            .into_iter()
            .filter_map(|key| self.spread(key.chain, &key.token0, &key.token1))
            .filter(|s| s.spread_bps >= min_bps)
            .collect();
        spreads.sort_by(|a, b| b.spread_bps.cmp(&a.spread_bps));
        spreads
    }

    pub fn clear_stale(&self, now_ms: i64) {
        self.store
            .write()
            .clear_stale(now_ms, self.config.staleness_threshold_ms);
    }
}

/// Confidence falls as relative price dispersion across sources rises:
/// `confidence = max(0, 1 - coefficient_of_variation)`. A single source has
/// zero dispersion by definition, hence confidence 1.0.
fn coefficient_of_variation_confidence(sources: &[PriceObservation]) -> f64 {
    if sources.len() < 2 {
        return 1.0;
    }
    let prices: Vec<f64> = sources.iter().map(|o| o.price as f64).collect();
    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / prices.len() as f64;
    let cv = variance.sqrt() / mean;
    (1.0 - cv).max(0.0)
}

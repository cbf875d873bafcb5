//! C3: trade graph construction — turns the current set of raw price
//! observations on a chain into directed `TradeEdge`s, both the quoted
//! direction and its reverse.
//!
//! The graph is built from individual `PriceObservation`s, not the
//! aggregator's cross-source blend, so that two pools quoting the same
//! pair still contribute two separately poolable edges — this is what
//! lets a length-2 cycle exist between two DEXs on one pair.

use tracing::warn;

use crate::error::OracleError;
use crate::types::{PriceObservation, TradeEdge};

/// `10^36`, used to derive the reverse-direction price:
/// `reverse_price = floor(10^36 / price)`.
const REVERSE_PRICE_SCALE: u128 = 1_000_000_000_000_000_000_000_000_000_000_000_000;

/// Builds the directed trade graph for one chain from its current raw
/// observations. The graph itself is just the edge list — callers that
/// need adjacency (DFS) or a line-graph (MMBF) index it themselves.
#[derive(Debug, Clone, Default)]
pub struct TradeGraph {
    pub edges: Vec<TradeEdge>,
}

impl TradeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from every observation on a chain, emitting two edges
    /// per observation.
    pub fn build(observations: &[PriceObservation]) -> Self {
        let mut graph = Self::new();
        for obs in observations {
            graph.add_observation(obs);
        }
        graph
    }

    /// Appends the forward and reverse edge for one observation. Dropped
    /// entirely if `price == 0`, or if the pair is degenerate (a pool
    /// quoting a token against itself).
    pub fn add_observation(&mut self, obs: &PriceObservation) {
        if obs.token0 == obs.token1 {
            let err = OracleError::InvalidPoolPair { shared: 2 };
            warn!(pool = %obs.pool, error = %err, "skipping self-paired pool");
            return;
        }
        if obs.price == 0 {
            return;
        }

        self.edges.push(TradeEdge {
            token_in: obs.token0.clone(),
            token_out: obs.token1.clone(),
            pool: obs.pool.clone(),
            dex: obs.dex,
            rate: obs.price as f64 / 1e18,
            reserve_in: obs.reserve0,
            reserve_out: obs.reserve1,
            fee_bps: TradeEdge::DEFAULT_FEE_BPS,
        });

        // Reverse direction re-derives price from the integer quote rather
        // than inverting the forward f64 rate, matching the reference
        // implementation's `(10**36) // price` exactly.
        let reverse_price = REVERSE_PRICE_SCALE / obs.price;
        self.edges.push(TradeEdge {
            token_in: obs.token1.clone(),
            token_out: obs.token0.clone(),
            pool: obs.pool.clone(),
            dex: obs.dex,
            rate: reverse_price as f64 / 1e18,
            reserve_in: obs.reserve1,
            reserve_out: obs.reserve0,
            fee_bps: TradeEdge::DEFAULT_FEE_BPS,
        });
    }

    /// Convenience for callers building a graph edge-by-edge outside the
    /// observation pipeline (e.g. tests, benches).
    pub fn add_edge(&mut self, edge: TradeEdge) {
        self.edges.push(edge);
    }

    pub fn adjacency(&self) -> std::collections::HashMap<&str, Vec<usize>> {
        let mut map: std::collections::HashMap<&str, Vec<usize>> = std::collections::HashMap::new();
        for (idx, edge) in self.edges.iter().enumerate() {
            map.entry(edge.token_in.as_str()).or_default().push(idx);
        }
        map
    }
}

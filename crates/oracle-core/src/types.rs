//! Core data model: wire records, aggregator output, graph primitives, and
//! the two result types (`ArbitragePath`, `Opportunity`) the detectors and
//! evaluator hand off between each other.

use serde::{Deserialize, Serialize};

/// Closed set of supported chains. Mapped to EVM chain IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainId {
    Ethereum,
    Arbitrum,
    Optimism,
    Base,
    Bsc,
}

impl ChainId {
    pub fn evm_chain_id(self) -> u64 {
        match self {
            ChainId::Ethereum => 1,
            ChainId::Arbitrum => 42161,
            ChainId::Optimism => 10,
            ChainId::Base => 8453,
            ChainId::Bsc => 56,
        }
    }
}

/// Closed set of supported DEX protocols. Only a label — semantics
/// are unused by the core; dex is carried through purely for downstream
/// display and execution routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DexId {
    UniswapV3,
    Sushiswap,
    Curve,
    Balancer,
    Pancakeswap,
    Camelot,
    Velodrome,
    Aerodrome,
}

/// A single price observation from market-data ingestion. `price` is
/// token1-per-token0, scaled by 1e18.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub chain: ChainId,
    pub dex: DexId,
    pub pool: String,
    pub token0: String,
    pub token1: String,
    pub reserve0: u128,
    pub reserve1: u128,
    pub price: u128,
    pub ts_ms: i64,
}

/// `(chain, token0, token1)`. Token ordering is as-given — the aggregator
/// never canonicalizes it, so the reverse pair lives under a distinct key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub chain: ChainId,
    pub token0: String,
    pub token1: String,
}

impl PairKey {
    pub fn new(chain: ChainId, token0: impl Into<String>, token1: impl Into<String>) -> Self {
        Self {
            chain,
            token0: token0.into(),
            token1: token1.into(),
        }
    }

    pub fn from_observation(obs: &PriceObservation) -> Self {
        Self::new(obs.chain, obs.token0.clone(), obs.token1.clone())
    }
}

/// Volume-weighted aggregate across every source at a `PairKey`. Computed on
/// demand — never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedPrice {
    pub chain: ChainId,
    pub token0: String,
    pub token1: String,
    pub price: u128,
    pub confidence: f64,
    pub sources: Vec<PriceObservation>,
    pub ts_ms: i64,
}

/// Spread between the cheapest and priciest source at a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSpread {
    pub chain: ChainId,
    pub token0: String,
    pub token1: String,
    pub min_price: u128,
    pub max_price: u128,
    pub spread_bps: u64,
    pub sources: usize,
}

/// One directed edge of the trade graph: `token_in -> token_out` through a
/// specific pool, with the rate and reserves oriented for that direction.
/// Fee is carried per-edge since mixed-fee pools share the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEdge {
    pub token_in: String,
    pub token_out: String,
    pub pool: String,
    pub dex: DexId,
    pub rate: f64,
    pub reserve_in: u128,
    pub reserve_out: u128,
    pub fee_bps: u32,
}

impl TradeEdge {
    pub const DEFAULT_FEE_BPS: u32 = 30;

    /// `-ln(rate)` if `rate > 0`, else `+infinity` — a degenerate edge
    /// should never win a relaxation.
    pub fn log_rate(&self) -> f64 {
        if self.rate > 0.0 {
            -self.rate.ln()
        } else {
            f64::INFINITY
        }
    }
}

/// One vertex of the line graph: the underlying edge plus its string id
/// (`"pool:token_in:token_out"`). Internal edges reference vertices by
/// arena index; the id remains the externally observable key.
#[derive(Debug, Clone, PartialEq)]
pub struct LineVertex {
    pub id: String,
    pub edge: TradeEdge,
}

impl LineVertex {
    pub fn make_id(pool: &str, token_in: &str, token_out: &str) -> String {
        format!("{pool}:{token_in}:{token_out}")
    }
}

/// An edge of the line graph: `from` vertex's underlying edge feeds directly
/// into `to` vertex's underlying edge. Weight is `to`'s `log_rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEdge {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

/// A single swap leg within an emitted path or opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapStep {
    pub dex: DexId,
    pub pool: String,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: u128,
    pub amount_out: u128,
}

/// A profitable cycle as emitted by a cycle detector (DFS or MMBF), before
/// liquidity gating / gas netting / confidence scoring by the profit
/// evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitragePath {
    pub edges: Vec<TradeEdge>,
    pub profit_ratio: f64,
    pub profit_bps: i64,
    pub start_token: String,
    pub optimal_size: u128,
    pub gas_estimate: u64,
    pub net_profit: i128,
    pub confidence: f64,
    pub profit_usd_est: f64,
}

/// A scored, sized, gas-netted arbitrage cycle ready for external
/// consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: i64,
    pub ts_ms: i64,
    pub chain: ChainId,
    pub profit_wei: u128,
    pub gas_estimate: u64,
    pub path: Vec<SwapStep>,
    pub flash_loan_token: String,
    pub flash_loan_amount: u128,
    pub confidence: f64,
}

//! Cross-DEX arbitrage opportunity detection core.
//!
//! Ingests price observations from market-data feeds, aggregates them per
//! trading pair, and runs two independent cycle detectors over the
//! resulting trade graph: a DFS enumerator for fast, advisory scans, and a
//! Modified Moore-Bellman-Ford relaxation over a line-graph transform for
//! the authoritative pass. Candidates from either detector are sized,
//! gas-netted, and liquidity-gated by a shared profit evaluator before
//! being handed to registered handlers.
//!
//! This crate has no network, execution, or persistence concerns — feed
//! ingestion and opportunity consumption are both external to it.

pub mod aggregator;
pub mod config;
pub mod detector;
pub mod dfs_detector;
pub mod error;
pub mod graph;
pub mod handler;
pub mod line_graph;
pub mod mmbf_detector;
pub mod price_store;
pub mod profit_evaluator;
pub mod stats;
pub mod types;

pub use aggregator::PriceAggregator;
pub use config::{AggregatorConfig, BaseTokenTable, DfsConfig, MmbfConfig, TokenUsdTable};
pub use detector::ArbitrageDetector;
pub use error::OracleError;
pub use handler::{HandlerDispatcher, OpportunityHandler};
pub use stats::{Stats, StatsSnapshot};
pub use types::{
    AggregatedPrice, ArbitragePath, ChainId, DexId, LineEdge, LineVertex, Opportunity, PairKey,
    PriceObservation, PriceSpread, SwapStep, TradeEdge,
};

//! The facade most callers actually use: owns ingestion, builds the trade
//! graph for a chain on demand, and runs either cycle detector through the
//! profit evaluator to produce ranked `Opportunity` records.
//!
//! A struct that owns the stateful pieces (here, price storage and stats)
//! and exposes narrow, instrumented scan methods rather than a god-object
//! `run()`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, info, instrument, warn};

use crate::aggregator::PriceAggregator;
use crate::config::{AggregatorConfig, BaseTokenTable, DfsConfig, MmbfConfig, TokenUsdTable};
use crate::dfs_detector::DfsDetector;
use crate::error::OracleError;
use crate::graph::TradeGraph;
use crate::line_graph::LineGraph;
use crate::mmbf_detector::MmbfDetector;
use crate::profit_evaluator::ProfitEvaluator;
use crate::stats::{Stats, StatsSnapshot};
use crate::types::{ChainId, Opportunity, PriceObservation, SwapStep};

pub struct ArbitrageDetector {
    aggregator: PriceAggregator,
    stats: Stats,
    dfs_config: DfsConfig,
    mmbf_config: MmbfConfig,
    base_tokens: BaseTokenTable,
    token_usd: TokenUsdTable,
    next_opportunity_id: AtomicU64,
}

impl ArbitrageDetector {
    pub fn new(
        aggregator_config: AggregatorConfig,
        dfs_config: DfsConfig,
        mmbf_config: MmbfConfig,
        base_tokens: BaseTokenTable,
        token_usd: TokenUsdTable,
    ) -> Self {
        Self {
            aggregator: PriceAggregator::new(aggregator_config),
            stats: Stats::new(),
            dfs_config,
            mmbf_config,
            base_tokens,
            token_usd,
            next_opportunity_id: AtomicU64::new(1),
        }
    }

    pub fn ingest(&self, observation: PriceObservation) {
        self.aggregator.record(observation);
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    fn build_graph(&self, chain: ChainId) -> TradeGraph {
        TradeGraph::build(&self.aggregator.observations_for_chain(chain))
    }

    /// Advisory scan: DFS enumeration with a blanket rate-product filter,
    /// one call per base token on `chain`.
    #[instrument(skip(self))]
    pub fn scan_dfs(&self, chain: ChainId) -> Vec<Opportunity> {
        let started = Instant::now();
        let graph = self.build_graph(chain);
        let detector = DfsDetector::new(&graph, self.dfs_config);
        let evaluator = ProfitEvaluator::new(self.mmbf_config, &self.token_usd);

        let mut cycles_checked = 0u64;
        let mut raw_paths = Vec::new();
        for start_token in self.base_tokens.tokens_for(chain) {
            let found = detector.find_cycles(start_token);
            cycles_checked += found.len() as u64;
            raw_paths.extend(found);
        }

        let opportunities = self.evaluate_and_rank(raw_paths, &evaluator, chain);
        self.stats.record_scan(
            cycles_checked,
            opportunities.len() as u64,
            cycles_checked,
            started.elapsed().as_millis() as u64,
        );
        info!(chain = ?chain, found = opportunities.len(), "dfs scan complete");
        opportunities
    }

    /// Authoritative scan: builds the line graph once and runs one MMBF
    /// pass per configured base token on `chain`. An empty base-token list
    /// means this returns nothing, even if profitable cycles exist among
    /// non-base tokens — base tokens gate participation entirely, by design.
    #[instrument(skip(self))]
    pub fn scan_mmbf(&self, chain: ChainId) -> Vec<Opportunity> {
        let started = Instant::now();
        let graph = self.build_graph(chain);
        let line_graph = LineGraph::build(&graph);
        let detector = MmbfDetector::new(&line_graph, self.mmbf_config);
        let evaluator = ProfitEvaluator::new(self.mmbf_config, &self.token_usd);

        let mut raw_paths = Vec::new();
        for start_token in self.base_tokens.tokens_for(chain) {
            raw_paths.extend(detector.detect(start_token));
        }
        let cycles_checked = raw_paths.len() as u64;
        debug!(chain = ?chain, raw_cycles = cycles_checked, "mmbf relaxation complete");

        let opportunities = self.evaluate_and_rank(raw_paths, &evaluator, chain);
        self.stats.record_scan(
            cycles_checked,
            opportunities.len() as u64,
            cycles_checked,
            started.elapsed().as_millis() as u64,
        );
        info!(chain = ?chain, found = opportunities.len(), "mmbf scan complete");
        opportunities
    }

    fn evaluate_and_rank(
        &self,
        raw_paths: Vec<crate::types::ArbitragePath>,
        evaluator: &ProfitEvaluator,
        chain: ChainId,
    ) -> Vec<Opportunity> {
        let evaluated: Vec<crate::types::ArbitragePath> = raw_paths
            .into_iter()
            .filter_map(|path| evaluator.evaluate(path))
            .collect();
        ProfitEvaluator::rank(evaluated)
            .into_iter()
            .map(|path| self.to_opportunity(chain, path))
            .collect()
    }

    fn to_opportunity(&self, chain: ChainId, path: crate::types::ArbitragePath) -> Opportunity {
        let id = self.next_opportunity_id.fetch_add(1, Ordering::Relaxed) as i64;
        let ts_ms = now_ms();
        let flash_loan_token = path.start_token.clone();
        let flash_loan_amount = path.optimal_size;
        let net_profit_wei = path.net_profit.max(0) as u128;

        let mut amount = path.optimal_size;
        let swap_path: Vec<SwapStep> = path
            .edges
            .iter()
            .map(|edge| {
                let amount_in = amount;
                let amount_out = ((amount_in as f64) * edge.rate) as u128;
                amount = amount_out;
                SwapStep {
                    dex: edge.dex,
                    pool: edge.pool.clone(),
                    token_in: edge.token_in.clone(),
                    token_out: edge.token_out.clone(),
                    amount_in,
                    amount_out,
                }
            })
            .collect();

        Opportunity {
            id,
            ts_ms,
            chain,
            profit_wei: net_profit_wei,
            gas_estimate: path.gas_estimate,
            path: swap_path,
            flash_loan_token,
            flash_loan_amount,
            confidence: path.confidence,
        }
    }
}

/// Wall-clock milliseconds since the Unix epoch, or `0` with a logged
/// `ClockError` if the system clock is set before it. No error propagates
/// out of a scan; a clock fault degrades to a stamp of zero rather than
/// aborting opportunity delivery.
fn now_ms() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_millis() as i64,
        Err(_) => {
            let err = OracleError::ClockError {
                context: "opportunity timestamp".to_string(),
            };
            warn!(error = %err, "system clock error while stamping opportunity");
            0
        }
    }
}

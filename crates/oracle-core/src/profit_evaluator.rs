//! C7: turns a raw cycle (from either detector) into a sized, gas-netted,
//! scored `ArbitragePath`, or rejects it outright.
//!
//! Three gates run in order, any of which can drop the cycle: a liquidity
//! gate (every pool on the path must hold at least `min_liquidity_usd`
//! across both reserve sides), a slippage-aware sizing pass (delegated to
//! `oracle_amm::OptimalSizeCalculator`), and a gas-netting pass that
//! rejects anything whose net profit does not clear zero after
//! `gas_estimate * gas_price_gwei`, where `gas_estimate = 150_000 * hops +
//! 21_000` — the detectors' own `gas_estimate` (per-hop only) is
//! superseded here with the base transaction cost folded in.

use oracle_amm::{OptimalSizeCalculator, PathLeg, SizingConfig};

use crate::config::{MmbfConfig, TokenUsdTable};
use crate::types::ArbitragePath;

pub struct ProfitEvaluator<'t> {
    config: MmbfConfig,
    token_usd: &'t TokenUsdTable,
}

impl<'t> ProfitEvaluator<'t> {
    pub fn new(config: MmbfConfig, token_usd: &'t TokenUsdTable) -> Self {
        Self { config, token_usd }
    }

    /// Runs the liquidity gate, sizing, and gas netting on one candidate
    /// cycle. Returns `None` if the cycle fails any stage — there is no
    /// error here, a rejected candidate is simply not an opportunity.
    pub fn evaluate(&self, mut path: ArbitragePath) -> Option<ArbitragePath> {
        if !self.passes_liquidity_gate(&path) {
            return None;
        }

        let legs: Vec<PathLeg> = path
            .edges
            .iter()
            .map(|e| PathLeg {
                reserve_in: e.reserve_in,
                reserve_out: e.reserve_out,
                fee_bps: e.fee_bps,
            })
            .collect();

        let calculator = OptimalSizeCalculator::new(SizingConfig::default());
        let sizing = calculator.bisect(&legs)?;
        if sizing.gross_profit <= 0 {
            return None;
        }

        // `150000 * hops + 21000`: per-hop swap cost plus the flat base
        // transaction cost, distinct from the DFS enumerator's blanket
        // per-hop-only estimate.
        let gas_estimate = 150_000u64 * path.edges.len() as u64 + 21_000;
        let gas_cost_wei = gas_estimate as i128 * self.config.gas_price_gwei as i128 * 1_000_000_000;
        let net_profit = sizing.gross_profit - gas_cost_wei;
        if net_profit <= 0 {
            return None;
        }
        path.gas_estimate = gas_estimate;

        // `min_profit_bps` filters the rate-ratio `profit_bps` the detector
        // already computed (`floor((ratio-1)*10000)`), not a net-yield
        // figure derived from sizing — §6 documents it as a profit-*ratio*
        // filter, and profit_bps is standardized on that meaning everywhere.
        if path.profit_bps < self.config.min_profit_bps {
            return None;
        }

        path.optimal_size = sizing.optimal_size;
        path.net_profit = net_profit;
        path.confidence = confidence_from_margin(net_profit, sizing.gross_profit, path.profit_bps);
        path.profit_usd_est = (net_profit as f64 / 1e18) * self.token_usd.price_of(&path.start_token);

        Some(path)
    }

    /// Per-edge USD value is both sides of the pool, not just the inbound
    /// reserve — a pool can be thin on one leg and deep on the other, and
    /// either alone understates the liquidity gate.
    fn passes_liquidity_gate(&self, path: &ArbitragePath) -> bool {
        path.edges.iter().all(|edge| {
            let usd_in = (edge.reserve_in as f64 / 1e18) * self.token_usd.price_of(&edge.token_in);
            let usd_out = (edge.reserve_out as f64 / 1e18) * self.token_usd.price_of(&edge.token_out);
            usd_in + usd_out >= self.config.min_liquidity_usd
        })
    }

    /// Sorts opportunities by descending net profit — the order handlers
    /// and downstream consumers see them in.
    pub fn rank(mut paths: Vec<ArbitragePath>) -> Vec<ArbitragePath> {
        paths.sort_by(|a, b| b.net_profit.cmp(&a.net_profit));
        paths
    }
}

/// `margin = net/gross`; `confidence = min(0.9, margin * profit_bps/100)`.
/// Zero whenever there is no net profit to speak of — callers never reach
/// this with `net <= 0` since `evaluate` already rejects that case, but the
/// zero floor matches the rule exactly.
fn confidence_from_margin(net_profit: i128, gross_profit: i128, profit_bps: i64) -> f64 {
    if net_profit <= 0 || gross_profit <= 0 {
        return 0.0;
    }
    let margin = net_profit as f64 / gross_profit as f64;
    (margin * profit_bps as f64 / 100.0).clamp(0.0, 0.9)
}

//! C4: DFS cycle enumerator — an advisory detector, faster and cruder than
//! the MMBF pass. Walks the trade graph depth-first, forbidding pool reuse
//! (not token reuse) within a path, and scores each closed cycle with a
//! fixed-point rate product sized off the path's thinnest pool, rather
//! than per-hop slippage simulation.
//!
//! `visited_pools`, not visited tokens, is the uniqueness constraint, since
//! the same token can legitimately reappear mid-path through a different
//! pool.

use std::collections::HashMap;

use crate::config::DfsConfig;
use crate::graph::TradeGraph;
use crate::types::{ArbitragePath, TradeEdge};

/// Gas units charged per hop, an approximation of a Uniswap-v2-style swap.
const GAS_UNITS_PER_HOP: u64 = 150_000;

pub struct DfsDetector<'g> {
    graph: &'g TradeGraph,
    config: DfsConfig,
}

impl<'g> DfsDetector<'g> {
    pub fn new(graph: &'g TradeGraph, config: DfsConfig) -> Self {
        Self { graph, config }
    }

    /// Every profitable closed cycle starting and ending at `start_token`,
    /// up to `config.max_path_length` hops.
    pub fn find_cycles(&self, start_token: &str) -> Vec<ArbitragePath> {
        let adjacency = self.graph.adjacency();
        let mut found = Vec::new();
        let mut path: Vec<usize> = Vec::new();
        let mut visited_pools: std::collections::HashSet<&str> = std::collections::HashSet::new();

        self.dfs(
            start_token,
            start_token,
            &adjacency,
            &mut visited_pools,
            &mut path,
            &mut found,
        );
        found
    }

    #[allow(clippy::too_many_arguments)]
    fn dfs<'a>(
        &'a self,
        start_token: &str,
        current_token: &str,
        adjacency: &HashMap<&'a str, Vec<usize>>,
        visited_pools: &mut std::collections::HashSet<&'a str>,
        path: &mut Vec<usize>,
        found: &mut Vec<ArbitragePath>,
    ) {
        if !path.is_empty() && current_token == start_token {
            if let Some(candidate) = self.evaluate_cycle(path) {
                found.push(candidate);
            }
            return;
        }
        if path.len() >= self.config.max_path_length {
            return;
        }
        let Some(edge_indices) = adjacency.get(current_token) else {
            return;
        };
        for &idx in edge_indices {
            let edge = &self.graph.edges[idx];
            if visited_pools.contains(edge.pool.as_str()) {
                continue;
            }
            visited_pools.insert(edge.pool.as_str());
            path.push(idx);
            self.dfs(start_token, &edge.token_out, adjacency, visited_pools, path, found);
            path.pop();
            visited_pools.remove(edge.pool.as_str());
        }
    }

    /// `rate_product` in 18-decimal fixed point (`acc <- acc*rate/scale`
    /// per edge, `scale = 1e18`), sized against `1%` of the thinnest pool
    /// on the path (`min sqrt(reserve_in*reserve_out)` across edges) rather
    /// than a flat notional — a cycle through shallow pools should never
    /// price the same as one through deep ones.
    fn evaluate_cycle(&self, path: &[usize]) -> Option<ArbitragePath> {
        if path.len() < 2 {
            return None;
        }
        const SCALE: u128 = 1_000_000_000_000_000_000;

        let edges: Vec<TradeEdge> = path.iter().map(|&idx| self.graph.edges[idx].clone()).collect();

        let mut acc: u128 = SCALE;
        for edge in &edges {
            let rate_fixed = (edge.rate * SCALE as f64).max(0.0) as u128;
            acc = acc.saturating_mul(rate_fixed) / SCALE;
        }
        if acc <= SCALE {
            return None;
        }
        let profit_ratio = acc as f64 / SCALE as f64;
        let profit_bps = (((acc - SCALE) * 10_000) / SCALE) as i64;

        let min_liquidity = edges
            .iter()
            .map(|e| ((e.reserve_in as f64) * (e.reserve_out as f64)).sqrt())
            .fold(f64::INFINITY, f64::min);
        if !min_liquidity.is_finite() || min_liquidity <= 0.0 {
            return None;
        }
        let optimal_size = (0.01 * min_liquidity) as u128;
        if optimal_size == 0 {
            return None;
        }

        let gross_profit = (optimal_size.saturating_mul(acc - SCALE) / SCALE) as i128;
        let gas_units = GAS_UNITS_PER_HOP * edges.len() as u64;
        let gas_cost_wei = gas_units as i128 * self.config.gas_price_gwei as i128 * 1_000_000_000;
        let net_profit = gross_profit - gas_cost_wei;
        if net_profit < self.config.min_profit_wei as i128 {
            return None;
        }

        let start_token = edges[0].token_in.clone();
        Some(ArbitragePath {
            edges,
            profit_ratio,
            profit_bps,
            start_token,
            optimal_size,
            gas_estimate: gas_units,
            net_profit,
            confidence: 1.0,
            profit_usd_est: 0.0,
        })
    }
}

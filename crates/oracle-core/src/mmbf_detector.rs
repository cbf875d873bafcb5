//! C6: the authoritative cycle detector. A Modified Moore-Bellman-Ford
//! relaxation over the line graph in log-space: a profitable cycle is a
//! closed walk whose summed edge weights (`-ln(rate)`) are negative, i.e.
//! whose rate product exceeds 1.
//!
//! One `detect` call is scoped to a single `start_token`: the line graph's
//! SOURCE vertex is seeded only with edges into vertices whose underlying
//! trade leaves `start_token`, and a cycle closes only when a relaxed edge
//! lands on a vertex whose trade *returns* to `start_token`.
//! Each vertex carries its entire path from SOURCE, not just a predecessor
//! pointer, so a closed cycle can be read straight off `paths[u]` the
//! moment an edge would lead back to `start_token`, without consuming or
//! resetting that state — the pass keeps relaxing for longer cycles
//! afterward.

use crate::config::MmbfConfig;
use crate::line_graph::LineGraph;
use crate::types::{ArbitragePath, TradeEdge};

const GAS_UNITS_PER_HOP: u64 = 150_000;

pub struct MmbfDetector<'lg> {
    line_graph: &'lg LineGraph,
    config: MmbfConfig,
}

impl<'lg> MmbfDetector<'lg> {
    pub fn new(line_graph: &'lg LineGraph, config: MmbfConfig) -> Self {
        Self { line_graph, config }
    }

    /// Runs the relaxation for `start_token` to convergence (or
    /// `min(max_iterations, max_path_length)` passes, whichever comes
    /// first) and returns every cycle found back to `start_token` along the
    /// way, regardless of whether it clears any profit threshold — the
    /// profit evaluator does the filtering. Emitting a cycle does not
    /// consume its path; relaxation keeps going for longer cycles after.
    pub fn detect(&self, start_token: &str) -> Vec<ArbitragePath> {
        let n = self.line_graph.vertices.len();
        if n == 0 {
            return Vec::new();
        }

        let mut dist = vec![f64::INFINITY; n];
        let mut paths: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut found = Vec::new();

        for source_edge in self.line_graph.source_edges_for(start_token) {
            let v = source_edge.to;
            if source_edge.weight < dist[v] {
                dist[v] = source_edge.weight;
                paths[v] = vec![v];
            }
        }

        let max_passes = self.config.max_iterations.min(self.config.max_path_length);
        for _pass in 0..max_passes {
            let mut any_update = false;

            for edge in &self.line_graph.edges {
                let u = edge.from;
                let v = edge.to;

                if dist[u].is_infinite() {
                    continue;
                }

                // Cycle test: does relaxing into `v` return to start_token?
                // Checked unconditionally, independent of whether it would
                // also improve `dist[v]`.
                if let Some(v_vertex) = self.line_graph.vertex(v) {
                    if v_vertex.edge.token_out == start_token {
                        let mut candidate = paths[u].clone();
                        candidate.push(v);
                        if let Some(cycle) = self.materialize_cycle(&candidate, start_token) {
                            found.push(cycle);
                        }
                    }
                }

                // Standard relaxation: strict improvement only ("first
                // writer wins" on ties), and never revisit a vertex already
                // on this path.
                let candidate_dist = dist[u] + edge.weight;
                if candidate_dist < dist[v]
                    && !paths[u].contains(&v)
                    && paths[u].len() < self.config.max_path_length
                {
                    dist[v] = candidate_dist;
                    let mut new_path = paths[u].clone();
                    new_path.push(v);
                    paths[v] = new_path;
                    any_update = true;
                }
            }

            if !any_update {
                break;
            }
        }

        found
    }

    /// Builds an `ArbitragePath` from a closed line-vertex walk, or `None`
    /// if it doesn't clear the `|E| >= 2 ∧ Π rate_i > 1` bar.
    fn materialize_cycle(&self, path: &[usize], start_token: &str) -> Option<ArbitragePath> {
        if path.len() < 2 {
            return None;
        }
        let edges: Vec<TradeEdge> = path
            .iter()
            .map(|&idx| self.line_graph.vertex(idx).expect("path index in range").edge.clone())
            .collect();
        let profit_ratio: f64 = edges.iter().map(|e| e.rate).product();
        if profit_ratio <= 1.0 {
            return None;
        }

        let profit_bps = ((profit_ratio - 1.0) * 10_000.0).floor() as i64;
        let gas_estimate = GAS_UNITS_PER_HOP * edges.len() as u64;
        Some(ArbitragePath {
            edges,
            profit_ratio,
            profit_bps,
            start_token: start_token.to_string(),
            optimal_size: 0,
            gas_estimate,
            net_profit: 0,
            confidence: 1.0,
            profit_usd_est: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TradeGraph;
    use crate::types::DexId;

    fn edge(token_in: &str, token_out: &str, pool: &str, rate: f64) -> TradeEdge {
        TradeEdge {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            pool: pool.to_string(),
            dex: DexId::UniswapV3,
            rate,
            reserve_in: 1_000_000,
            reserve_out: 1_000_000,
            fee_bps: 30,
        }
    }

    fn config() -> MmbfConfig {
        MmbfConfig {
            min_profit_bps: 0,
            ..Default::default()
        }
    }

    #[test]
    fn finds_profitable_cycle_from_its_start_token() {
        let mut graph = TradeGraph::new();
        graph.add_edge(edge("WETH", "USDC", "pool-1", 2_000.0));
        graph.add_edge(edge("USDC", "DAI", "pool-2", 1.01));
        graph.add_edge(edge("DAI", "WETH", "pool-3", 1.0 / 1_990.0));

        let line_graph = LineGraph::build(&graph);
        let detector = MmbfDetector::new(&line_graph, config());
        let cycles = detector.detect("WETH");
        assert!(!cycles.is_empty());
        assert!(cycles.iter().all(|c| c.profit_ratio > 1.0));
        assert!(cycles.iter().all(|c| c.start_token == "WETH"));
    }

    #[test]
    fn no_cycle_in_fair_market() {
        let mut graph = TradeGraph::new();
        graph.add_edge(edge("WETH", "USDC", "pool-1", 2_000.0));
        graph.add_edge(edge("USDC", "DAI", "pool-2", 1.0));
        graph.add_edge(edge("DAI", "WETH", "pool-3", 1.0 / 2_000.0));

        let line_graph = LineGraph::build(&graph);
        let detector = MmbfDetector::new(&line_graph, config());
        assert!(detector.detect("WETH").is_empty());
    }

    #[test]
    fn empty_line_graph_yields_no_cycles() {
        let graph = TradeGraph::new();
        let line_graph = LineGraph::build(&graph);
        let detector = MmbfDetector::new(&line_graph, config());
        assert!(detector.detect("WETH").is_empty());
    }

    #[test]
    fn unrelated_start_token_yields_no_cycles() {
        let mut graph = TradeGraph::new();
        graph.add_edge(edge("WETH", "USDC", "pool-1", 2_000.0));
        graph.add_edge(edge("USDC", "DAI", "pool-2", 1.01));
        graph.add_edge(edge("DAI", "WETH", "pool-3", 1.0 / 1_990.0));

        let line_graph = LineGraph::build(&graph);
        let detector = MmbfDetector::new(&line_graph, config());
        // DAI never appears as a token_in of a source-reachable vertex that
        // starts a cycle back to "SOMETOKEN" — no edge returns there.
        assert!(detector.detect("SOMETOKEN").is_empty());
    }

    #[test]
    fn min_profit_bps_filters_marginal_cycles_in_the_evaluator_not_here() {
        // MMBF itself only filters on the ratio > 1 bar; bps filtering is
        // the profit evaluator's job. Confirm detect() still surfaces a
        // marginally profitable cycle unfiltered.
        let mut graph = TradeGraph::new();
        graph.add_edge(edge("WETH", "USDC", "pool-1", 2_000.0));
        graph.add_edge(edge("USDC", "DAI", "pool-2", 1.0001));
        graph.add_edge(edge("DAI", "WETH", "pool-3", 1.0 / 2_000.1));

        let line_graph = LineGraph::build(&graph);
        let detector = MmbfDetector::new(&line_graph, config());
        let cycles = detector.detect("WETH");
        assert!(!cycles.is_empty());
    }

    #[test]
    fn cannot_reuse_same_pool_in_line_graph() {
        let mut graph = TradeGraph::new();
        graph.add_edge(edge("WETH", "USDC", "pool-1", 2_000.0));
        graph.add_edge(edge("USDC", "WETH", "pool-1", 2.0));

        let line_graph = LineGraph::build(&graph);
        let detector = MmbfDetector::new(&line_graph, config());
        assert!(detector.detect("WETH").is_empty());
    }
}

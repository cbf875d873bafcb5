//! C5: line-graph construction for the Modified Moore-Bellman-Ford pass.
//!
//! Each trade-graph edge becomes a vertex; two vertices are joined when one
//! edge's output token feeds directly into the other's input token through
//! a *different* pool. Vertices and internal edges use arena indices, with
//! the id kept only as an externally observable key. The internal
//! vertex/edge set does not depend on a start token; only the synthetic
//! `SOURCE` wiring does, so a line graph is built once per chain and
//! re-seeded per base token via `source_edges_for`.

use std::collections::HashMap;

use crate::graph::TradeGraph;
use crate::types::{LineEdge, LineVertex, TradeEdge};

pub struct LineGraph {
    pub vertices: Vec<LineVertex>,
    pub edges: Vec<LineEdge>,
}

impl LineGraph {
    pub fn build(trade_graph: &TradeGraph) -> Self {
        // Duplicate ids are coalesced: the same `pool:token_in:token_out`
        // triple seen twice keeps one vertex at its first position, with
        // the later observation's edge data winning.
        let mut index_by_id: HashMap<String, usize> = HashMap::new();
        let mut vertices: Vec<LineVertex> = Vec::new();
        for edge in &trade_graph.edges {
            let id = LineVertex::make_id(&edge.pool, &edge.token_in, &edge.token_out);
            if let Some(&idx) = index_by_id.get(&id) {
                vertices[idx].edge = edge.clone();
            } else {
                index_by_id.insert(id.clone(), vertices.len());
                vertices.push(LineVertex { id, edge: edge.clone() });
            }
        }

        let mut by_token_in: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, v) in vertices.iter().enumerate() {
            by_token_in.entry(v.edge.token_in.as_str()).or_default().push(idx);
        }

        let mut edges = Vec::new();
        for (from_idx, from_vertex) in vertices.iter().enumerate() {
            let Some(candidates) = by_token_in.get(from_vertex.edge.token_out.as_str()) else {
                continue;
            };
            for &to_idx in candidates {
                let to_vertex = &vertices[to_idx];
                if to_vertex.edge.pool == from_vertex.edge.pool {
                    continue;
                }
                edges.push(LineEdge {
                    from: from_idx,
                    to: to_idx,
                    weight: to_vertex.edge.log_rate(),
                });
            }
        }

        Self { vertices, edges }
    }

    /// Index one past the last real vertex — the synthetic SOURCE.
    pub fn source_index(&self) -> usize {
        self.vertices.len()
    }

    /// Source edges for one MMBF run: `SOURCE -> v` for every vertex whose
    /// underlying edge starts at `start_token`, weighted by that vertex's
    /// own `log_rate` — not a zero weight, since the first hop's rate must
    /// count toward the cycle's profitability.
    pub fn source_edges_for(&self, start_token: &str) -> Vec<LineEdge> {
        let source = self.source_index();
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.edge.token_in == start_token)
            .map(|(idx, v)| LineEdge {
                from: source,
                to: idx,
                weight: v.edge.log_rate(),
            })
            .collect()
    }

    pub fn vertex(&self, idx: usize) -> Option<&LineVertex> {
        self.vertices.get(idx)
    }

    /// Real edges leaving `idx`. Pass `source_index()` to get nothing here —
    /// use `source_edges_for` for SOURCE's outgoing set instead.
    pub fn out_edges(&self, idx: usize) -> impl Iterator<Item = &LineEdge> {
        self.edges.iter().filter(move |e| e.from == idx)
    }

    #[allow(dead_code)]
    fn underlying(&self, idx: usize) -> Option<&TradeEdge> {
        self.vertices.get(idx).map(|v| &v.edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn connects_edges_through_shared_token() {
        let mut graph = TradeGraph::new();
        graph.add_edge(edge("WETH", "USDC", "pool-1", 2_000.0));
        graph.add_edge(edge("USDC", "DAI", "pool-2", 1.0));

        let line_graph = LineGraph::build(&graph);
        assert_eq!(line_graph.vertices.len(), 2);
        assert_eq!(line_graph.edges.len(), 1);
        assert_eq!(line_graph.edges[0].from, 0);
        assert_eq!(line_graph.edges[0].to, 1);
    }

    #[test]
    fn does_not_connect_through_the_same_pool() {
        let mut graph = TradeGraph::new();
        graph.add_edge(edge("WETH", "USDC", "pool-1", 2_000.0));
        graph.add_edge(edge("USDC", "WETH", "pool-1", 1.0 / 2_000.0));

        let line_graph = LineGraph::build(&graph);
        assert!(line_graph.edges.is_empty());
    }

    #[test]
    fn source_edges_only_reach_vertices_starting_at_the_chosen_token() {
        let mut graph = TradeGraph::new();
        graph.add_edge(edge("WETH", "USDC", "pool-1", 2_000.0));
        graph.add_edge(edge("USDC", "DAI", "pool-2", 1.0));

        let line_graph = LineGraph::build(&graph);
        let source_edges = line_graph.source_edges_for("WETH");
        assert_eq!(source_edges.len(), 1);
        assert_eq!(source_edges[0].to, 0);
        assert_eq!(source_edges[0].weight, line_graph.vertices[0].edge.log_rate());
        assert!(source_edges.iter().all(|e| e.from == line_graph.source_index()));
    }

    #[test]
    fn duplicate_vertex_ids_are_coalesced_keeping_the_later_edge() {
        let mut graph = TradeGraph::new();
        graph.add_edge(edge("WETH", "USDC", "pool-1", 2_000.0));
        graph.add_edge(edge("WETH", "USDC", "pool-1", 2_100.0)); // same id, newer quote

        let line_graph = LineGraph::build(&graph);
        assert_eq!(line_graph.vertices.len(), 1);
        assert_eq!(line_graph.vertices[0].edge.rate, 2_100.0);
    }

    #[test]
    fn source_edges_for_unknown_start_token_is_empty() {
        let mut graph = TradeGraph::new();
        graph.add_edge(edge("WETH", "USDC", "pool-1", 2_000.0));

        let line_graph = LineGraph::build(&graph);
        assert!(line_graph.source_edges_for("DAI").is_empty());
    }
}

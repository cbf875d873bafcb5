//! Property-based tests over the public graph and detector API.

use oracle_core::{ChainId, DexId, DfsConfig, PriceObservation};
use oracle_core::dfs_detector::DfsDetector;
use oracle_core::graph::TradeGraph;
use proptest::prelude::*;

fn observation(pool: &str, price: u128, reserve0: u128, reserve1: u128) -> PriceObservation {
    PriceObservation {
        chain: ChainId::Ethereum,
        dex: DexId::UniswapV3,
        pool: pool.to_string(),
        token0: "WETH".to_string(),
        token1: "USDC".to_string(),
        reserve0,
        reserve1,
        price,
        ts_ms: 0,
    }
}

proptest! {
    // Forward and reverse edges for one observation are reciprocal rates,
    // regardless of how skewed the price or reserves are.
    #[test]
    fn reverse_edge_rate_is_reciprocal_of_forward(
        price in 1u128..1_000_000_000_000_000_000_000u128,
        reserve0 in 1u128..1_000_000_000_000_000_000_000u128,
        reserve1 in 1u128..1_000_000_000_000_000_000_000u128,
    ) {
        let mut graph = TradeGraph::new();
        graph.add_observation(&observation("pool-a", price, reserve0, reserve1));

        prop_assert_eq!(graph.edges.len(), 2);
        let forward = graph.edges[0].rate;
        let reverse = graph.edges[1].rate;
        // Both sides round-trip through the same integer reciprocal, so the
        // product only needs to be close to 1, not bit-exact.
        prop_assert!((forward * reverse - 1.0).abs() < 1e-6);
    }
}

proptest! {
    // A single observation, no matter the price, never produces a
    // self-paired edge or an edge with a zero rate end-to-end.
    #[test]
    fn single_observation_never_emits_degenerate_edges(
        price in 1u128..1_000_000_000_000_000_000_000u128,
        reserve0 in 1u128..1_000_000_000_000_000_000_000u128,
        reserve1 in 1u128..1_000_000_000_000_000_000_000u128,
    ) {
        let mut graph = TradeGraph::new();
        graph.add_observation(&observation("pool-a", price, reserve0, reserve1));

        for edge in &graph.edges {
            prop_assert_ne!(&edge.token_in, &edge.token_out);
            prop_assert!(edge.rate > 0.0);
        }
    }
}

proptest! {
    // A three-pool ring, each leg a distinct pool, never yields a DFS
    // cycle that revisits a pool — the uniqueness constraint is on pools,
    // not on the tokens that happen to repeat at the ring's closure.
    #[test]
    fn dfs_cycles_never_reuse_a_pool(
        rate_ab in 1.0f64..5.0f64,
        rate_bc in 1.0f64..5.0f64,
        rate_ca in 0.01f64..5.0f64,
    ) {
        let mut graph = TradeGraph::new();
        graph.add_edge(oracle_core::TradeEdge {
            token_in: "A".to_string(),
            token_out: "B".to_string(),
            pool: "pool-ab".to_string(),
            dex: DexId::UniswapV3,
            rate: rate_ab,
            reserve_in: 1_000_000,
            reserve_out: 1_000_000,
            fee_bps: 30,
        });
        graph.add_edge(oracle_core::TradeEdge {
            token_in: "B".to_string(),
            token_out: "C".to_string(),
            pool: "pool-bc".to_string(),
            dex: DexId::UniswapV3,
            rate: rate_bc,
            reserve_in: 1_000_000,
            reserve_out: 1_000_000,
            fee_bps: 30,
        });
        graph.add_edge(oracle_core::TradeEdge {
            token_in: "C".to_string(),
            token_out: "A".to_string(),
            pool: "pool-ca".to_string(),
            dex: DexId::UniswapV3,
            rate: rate_ca,
            reserve_in: 1_000_000,
            reserve_out: 1_000_000,
            fee_bps: 30,
        });

        let detector = DfsDetector::new(&graph, DfsConfig { min_profit_wei: 0, ..Default::default() });
        let cycles = detector.find_cycles("A");

        for cycle in &cycles {
            let mut pools: Vec<&str> = cycle.edges.iter().map(|e| e.pool.as_str()).collect();
            let before = pools.len();
            pools.sort_unstable();
            pools.dedup();
            prop_assert_eq!(pools.len(), before);
        }
    }
}

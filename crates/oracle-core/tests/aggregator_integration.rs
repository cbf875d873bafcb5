//! Integration tests for `PriceAggregator` through its public API only.

use oracle_core::{AggregatorConfig, ChainId, DexId, PriceAggregator, PriceObservation};

fn observation(pool: &str, price: u128, reserve0: u128, reserve1: u128, ts_ms: i64) -> PriceObservation {
    PriceObservation {
        chain: ChainId::Ethereum,
        dex: DexId::UniswapV3,
        pool: pool.to_string(),
        token0: "WETH".to_string(),
        token1: "USDC".to_string(),
        reserve0,
        reserve1,
        price,
        ts_ms,
    }
}

#[test]
fn min_sources_gates_aggregation() {
    let aggregator = PriceAggregator::new(AggregatorConfig {
        min_sources: 2,
        staleness_threshold_ms: 60_000,
    });
    aggregator.record(observation("pool-a", 2_000, 1_000, 2_000_000, 1_000));
    assert!(aggregator.aggregated(ChainId::Ethereum, "WETH", "USDC").is_none());

    aggregator.record(observation("pool-b", 2_050, 1_000, 2_050_000, 1_100));
    assert!(aggregator.aggregated(ChainId::Ethereum, "WETH", "USDC").is_some());
}

#[test]
fn stale_sources_are_evicted_on_later_observation() {
    let aggregator = PriceAggregator::new(AggregatorConfig {
        min_sources: 1,
        staleness_threshold_ms: 1_000,
    });
    aggregator.record(observation("pool-a", 2_000, 1_000, 2_000_000, 0));
    // More than the staleness window later: pool-a's observation is evicted.
    aggregator.record(observation("pool-b", 2_100, 1_000, 2_100_000, 5_000));

    let agg = aggregator.aggregated(ChainId::Ethereum, "WETH", "USDC").unwrap();
    assert_eq!(agg.sources.len(), 1);
    assert_eq!(agg.sources[0].pool, "pool-b");
}

#[test]
fn clear_stale_drops_everything_past_the_window() {
    let aggregator = PriceAggregator::new(AggregatorConfig {
        min_sources: 1,
        staleness_threshold_ms: 1_000,
    });
    aggregator.record(observation("pool-a", 2_000, 1_000, 2_000_000, 0));
    aggregator.clear_stale(10_000);
    assert!(aggregator.aggregated(ChainId::Ethereum, "WETH", "USDC").is_none());
}

#[test]
fn spread_reflects_source_disagreement() {
    let aggregator = PriceAggregator::new(AggregatorConfig {
        min_sources: 2,
        staleness_threshold_ms: 60_000,
    });
    aggregator.record(observation("pool-a", 2_000, 1_000, 2_000_000, 0));
    aggregator.record(observation("pool-b", 2_200, 1_000, 2_200_000, 0));

    let spread = aggregator.spread(ChainId::Ethereum, "WETH", "USDC").unwrap();
    assert_eq!(spread.min_price, 2_000);
    assert_eq!(spread.max_price, 2_200);
    assert!(spread.spread_bps >= 1_000);
}

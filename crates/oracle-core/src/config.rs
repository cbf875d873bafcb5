//! Detector configuration and the two lookup tables every scan needs: which
//! tokens to start cycles from, and what a token is worth in USD.
//!
//! Defaults here mirror the per-service-default-module shape used for
//! config constants elsewhere in this stack (`alphapulse-config::service`).

use std::collections::HashMap;

use crate::types::ChainId;

/// Aggregator-level config (C1/C2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatorConfig {
    pub staleness_threshold_ms: i64,
    pub min_sources: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            staleness_threshold_ms: 5_000,
            min_sources: 2,
        }
    }
}

/// DFS cycle enumerator config (C4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DfsConfig {
    pub min_profit_wei: u128,
    pub max_path_length: usize,
    pub gas_price_gwei: u64,
}

impl Default for DfsConfig {
    fn default() -> Self {
        Self {
            min_profit_wei: 1_000_000_000_000_000, // 1e15
            max_path_length: 4,
            gas_price_gwei: 30,
        }
    }
}

/// MMBF cycle detector + profit evaluator config (C5/C6/C7).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MmbfConfig {
    pub min_profit_bps: i64,
    pub max_path_length: usize,
    pub max_iterations: usize,
    pub gas_price_gwei: u64,
    pub min_liquidity_usd: f64,
}

impl Default for MmbfConfig {
    fn default() -> Self {
        Self {
            min_profit_bps: 10,
            max_path_length: 8,
            max_iterations: 100,
            gas_price_gwei: 30,
            min_liquidity_usd: 50_000.0,
        }
    }
}

/// Per-chain list of tokens cycles are required to start and end at. An
/// empty list for a chain is intentional: the MMBF detector then finds
/// nothing on that chain, even if profitable cycles exist among non-base
/// tokens.
#[derive(Debug, Clone, Default)]
pub struct BaseTokenTable {
    by_chain: HashMap<ChainId, Vec<String>>,
}

impl BaseTokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with the canonical WETH/USDC/USDT/WBNB addresses on each
    /// supported chain.
    pub fn with_canonical_defaults() -> Self {
        let mut table = Self::new();
        table.set(
            ChainId::Ethereum,
            vec![
                "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".to_string(), // WETH
                "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".to_string(), // USDC
                "0xdAC17F958D2ee523a2206206994597C13D831ec7".to_string(), // USDT
            ],
        );
        table.set(
            ChainId::Arbitrum,
            vec![
                "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1".to_string(), // WETH
                "0xaf88d065e77c8cC2239327C5EDb3A432268e5831".to_string(), // USDC
            ],
        );
        table.set(
            ChainId::Optimism,
            vec![
                "0x4200000000000000000000000000000000000006".to_string(), // WETH
                "0x7F5c764cBc14f9669B88837ca1490cCa17c31607".to_string(), // USDC
            ],
        );
        table.set(
            ChainId::Base,
            vec![
                "0x4200000000000000000000000000000000000006".to_string(), // WETH
                "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string(), // USDC
            ],
        );
        table.set(
            ChainId::Bsc,
            vec![
                "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c".to_string(), // WBNB
                "0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d".to_string(), // USDC
            ],
        );
        table
    }

    pub fn set(&mut self, chain: ChainId, tokens: Vec<String>) {
        self.by_chain.insert(chain, tokens);
    }

    pub fn tokens_for(&self, chain: ChainId) -> &[String] {
        self.by_chain
            .get(&chain)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Token -> USD price table used by the profit evaluator's liquidity gate.
/// Missing entries are treated as $0, which fails the liquidity gate
/// rather than panicking.
///
/// Lookup tries the token exactly as given first, then falls back to a
/// case-insensitive match, since upstream feeds are inconsistent about
/// checksummed vs. lowercased addresses.
#[derive(Debug, Clone, Default)]
pub struct TokenUsdTable {
    prices: HashMap<String, f64>,
}

impl TokenUsdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, token: impl Into<String>, usd_price: f64) {
        self.prices.insert(token.into(), usd_price);
    }

    pub fn price_of(&self, token: &str) -> f64 {
        if let Some(p) = self.prices.get(token) {
            return *p;
        }
        let lower = token.to_ascii_lowercase();
        self.prices
            .iter()
            .find(|(k, _)| k.to_ascii_lowercase() == lower)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }
}

//! # Oracle AMM
//!
//! Constant-product swap math and bisection-based optimal sizing for
//! cross-pool arbitrage cycles. Kept deliberately free of any notion of
//! chains, tokens, or pools-as-identified-objects — it operates purely on
//! reserve/fee pairs so it can be reused by any caller that has assembled a
//! chain of hops, not just the detection core in this workspace.

pub mod optimal_size;
pub mod v2_math;

pub use optimal_size::{simulate_path, OptimalSizeCalculator, PathLeg, SizeResult, SizingConfig};
pub use v2_math::{AmmError, V2Math, V2PoolState};

//! Optimal position sizing for arbitrage opportunities.
//!
//! A closed-form optimal size is tractable between exactly two pools. An
//! arbitrage *cycle* is a chain of 2..N pools, and the chained
//! constant-product math has no closed form once fees and multiple hops
//! are involved — profit as a function of trade size is still unimodal
//! and concave over the profitable band, so this calculator climbs that
//! hill with bisection instead of solving for it directly.

use crate::v2_math::{AmmError, V2Math, V2PoolState};

/// One hop of a simulated cycle, in execution order.
pub type PathLeg = V2PoolState;

/// Run the full chain of legs for a given starting amount, floor-dividing at
/// every hop. Returns 0 (not an error) if any leg is degenerate or the chain
/// fails to produce output — callers treat that as "this size doesn't work",
/// not as a hard failure.
pub fn simulate_path(amount_in: u128, legs: &[PathLeg]) -> u128 {
    let mut amount = amount_in;
    for leg in legs {
        match V2Math::output_amount(amount, leg) {
            Ok(out) => amount = out,
            Err(AmmError::DegenerateReserves) => return 0,
            Err(AmmError::Overflow) => return 0,
        }
        if amount == 0 {
            return 0;
        }
    }
    amount
}

/// Configuration for the bisection search.
#[derive(Debug, Clone, Copy)]
pub struct SizingConfig {
    /// Hard cap on bisection iterations.
    pub max_iterations: u32,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self { max_iterations: 20 }
    }
}

/// Best size/profit pair found during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeResult {
    pub optimal_size: u128,
    /// `simulate_path(optimal_size, legs) as i128 - optimal_size as i128`.
    /// Negative or zero means no profitable size was found in the window.
    pub gross_profit: i128,
}

/// Finds the trade size that (approximately) maximizes cycle profit via
/// finite-difference bisection.
pub struct OptimalSizeCalculator {
    config: SizingConfig,
}

impl OptimalSizeCalculator {
    pub fn new(config: SizingConfig) -> Self {
        Self { config }
    }

    /// Bisection search for the profit-maximizing trade size.
    ///
    /// Window is `[floor(0.0001*m), floor(0.1*m)]` where `m` is the smallest
    /// reserve across every leg. At each step compares `simulate(mid)` against
    /// `simulate(mid+1)`: climbing toward whichever side is better. Tracks the
    /// best `(size, profit)` pair seen along the way, since the finite
    /// difference comparison can overshoot the true peak by one step.
    pub fn bisect(&self, legs: &[PathLeg]) -> Option<SizeResult> {
        if legs.is_empty() {
            return None;
        }

        let m = legs
            .iter()
            .flat_map(|leg| [leg.reserve_in, leg.reserve_out])
            .min()?;
        if m == 0 {
            return None;
        }

        let mut lo = (m as f64 * 0.0001) as u128;
        let mut hi = (m as f64 * 0.1) as u128;
        if lo == 0 {
            lo = 1;
        }
        if hi <= lo {
            hi = lo + 1;
        }

        let profit_at = |size: u128| -> i128 {
            simulate_path(size, legs) as i128 - size as i128
        };

        let mut best_size = lo;
        let mut best_profit = profit_at(lo);

        for _ in 0..self.config.max_iterations {
            if hi <= lo {
                break;
            }
            let mid = lo + (hi - lo) / 2;
            let profit_mid = profit_at(mid);
            let profit_mid_next = profit_at(mid + 1);

            if profit_mid > best_profit {
                best_profit = profit_mid;
                best_size = mid;
            }
            if profit_mid_next > best_profit {
                best_profit = profit_mid_next;
                best_size = mid + 1;
            }

            if profit_mid_next > profit_mid {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        Some(SizeResult {
            optimal_size: best_size,
            gross_profit: best_profit,
        })
    }
}

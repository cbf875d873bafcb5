//! Constant-product (`x*y=k`) swap math shared by the optimal-size bisection
//! and the profit evaluator's slippage simulator.
//!
//! All amounts are raw integer token units (wei-style). Every computation
//! floors rather than rounds, matching on-chain AMM semantics.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    #[error("pool has a zero or negative reserve")]
    DegenerateReserves,
    #[error("integer overflow during AMM calculation")]
    Overflow,
}

/// One side of a constant-product pool as seen by a swap going `in -> out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V2PoolState {
    pub reserve_in: u128,
    pub reserve_out: u128,
    pub fee_bps: u32,
}

pub struct V2Math;

impl V2Math {
    /// `out = floor(reserve_out * amt' / (reserve_in + amt'))` where
    /// `amt' = floor(amount_in * (10000 - fee_bps) / 10000)`.
    ///
    /// Returns `Ok(0)` rather than an error when the trade is simply too
    /// small to produce output after flooring; returns `Err` only when the
    /// pool itself is degenerate.
    pub fn output_amount(amount_in: u128, pool: &V2PoolState) -> Result<u128, AmmError> {
        if pool.reserve_in == 0 || pool.reserve_out == 0 {
            return Err(AmmError::DegenerateReserves);
        }
        if amount_in == 0 {
            return Ok(0);
        }

        let fee_bps = pool.fee_bps.min(10_000) as u128;
        let amount_after_fee = amount_in
            .checked_mul(10_000 - fee_bps)
            .ok_or(AmmError::Overflow)?
            / 10_000;

        let numerator = pool
            .reserve_out
            .checked_mul(amount_after_fee)
            .ok_or(AmmError::Overflow)?;
        let denominator = pool
            .reserve_in
            .checked_add(amount_after_fee)
            .ok_or(AmmError::Overflow)?;

        Ok(numerator / denominator)
    }

    /// Price impact of a trade in basis points: how far the effective price
    /// (`amount_out / amount_in`) falls short of the pool's spot price
    /// (`reserve_out / reserve_in`).
    pub fn price_impact_bps(amount_in: u128, pool: &V2PoolState) -> Result<u32, AmmError> {
        if amount_in == 0 {
            return Ok(0);
        }
        let out = Self::output_amount(amount_in, pool)?;
        if out == 0 {
            return Ok(10_000);
        }

        // spot = reserve_out / reserve_in, effective = out / amount_in.
        // impact = (spot - effective) / spot, all scaled by 1e4 for bps.
        let spot = pool.reserve_out as f64 / pool.reserve_in as f64;
        let effective = out as f64 / amount_in as f64;
        if spot <= 0.0 {
            return Ok(0);
        }
        let impact = ((spot - effective) / spot).max(0.0) * 10_000.0;
        Ok(impact.min(10_000.0) as u32)
    }
}

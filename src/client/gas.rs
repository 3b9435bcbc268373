//! Gas limit and fee arithmetic applied to simulation results.
//!
//! The adjustment is a margin over the simulated usage to avoid out of gas
//! failures; real execution can still exceed it.

/// `ceil(gas_used * adjustment)`
pub fn gas_limit(gas_used: u64, adjustment: f64) -> u64 {
    (gas_used as f64 * adjustment).ceil() as u64
}

/// `ceil(gas_limit * gas_price)` in the fee denom base units
pub fn fee_amount(gas_limit: u64, gas_price: f64) -> u128 {
    (gas_limit as f64 * gas_price).ceil() as u128
}

//! Amount arithmetic: decimal rescaling and basis-point bounds.
//!
//! All arithmetic floors toward zero so a computed minimum can never
//! exceed the quoted amount.

use alloy_primitives::U256;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Rescales an amount from one decimal precision to another, flooring.
pub fn scale_decimals(amount: U256, from: u8, to: u8) -> U256 {
	if from == to {
		return amount;
	}
	if to > from {
		amount * U256::from(10u64).pow(U256::from(to - from))
	} else {
		amount / U256::from(10u64).pow(U256::from(from - to))
	}
}

/// Applies a basis-point reduction: `floor(amount * (10000 - bps) / 10000)`.
pub fn apply_slippage(amount: U256, bps: u16) -> U256 {
	let bps = (bps as u64).min(BPS_DENOMINATOR);
	amount * U256::from(BPS_DENOMINATOR - bps) / U256::from(BPS_DENOMINATOR)
}

//! Quote result types.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Where a quoted amount came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteBasis {
	/// Returned by the venue's quoting entry point.
	Live,
	/// Decimal-converted amount under the pre-vetted tolerance.
	Fallback,
}

/// Quote for a single leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopQuote {
	/// Expected output amount.
	pub amount_out: U256,
	/// Minimum acceptable output, `floor(amount_out * (10000 - bps) / 10000)`.
	pub min_amount_out: U256,
	/// Tolerance applied to this leg.
	pub applied_bps: u16,
	pub basis: QuoteBasis,
}

/// Quote for a full conversion, one [`HopQuote`] per leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
	/// Expected output of the final leg.
	pub amount_out: U256,
	/// Minimum acceptable output of the final leg after combining leg
	/// tolerances.
	pub min_amount_out: U256,
	pub legs: Vec<HopQuote>,
}

//! Asset classification types.
//!
//! Every tradable asset belongs to exactly one category. Categories gate
//! routing: a conversion is only considered when the two assets are
//! economically related, either by sharing a category or because one side
//! is the category's native/wrapped counterpart.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Coarse compatibility class for a tradable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
	/// Fiat-pegged stable assets.
	Stable,
	/// Ethereum liquid-staking derivatives.
	EthLst,
	/// Wrapped-BTC variants.
	BtcWrapped,
	/// Everything else; never routed against other categories.
	Volatile,
}

/// Static registration record for a tradable asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
	/// On-chain address of the asset.
	pub address: Address,
	/// Compatibility class.
	pub category: AssetCategory,
	/// Decimal precision; must be non-zero for any routed asset.
	pub decimals: u8,
	/// Whether the asset may appear in routes at all.
	pub supported: bool,
}

/// Per-category routing policy.
///
/// The counterpart is the category's native/wrapped asset (e.g. WETH for
/// liquid-staking derivatives); it is category-compatible with every member.
/// The bridge list is the fixed, liquidity-ranked set of intermediates the
/// path finder may insert, in preference order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPolicy {
	/// Native/wrapped counterpart asset, if the category has one.
	pub counterpart: Option<Address>,
	/// Liquidity-ranked candidate bridge assets.
	#[serde(default)]
	pub bridges: Vec<Address>,
}

//! Route configuration types.
//!
//! A route binds an ordered asset pair to exactly one venue adapter. Three
//! primitive adapter kinds talk to a single venue; two composite kinds
//! describe pre-validated multi-leg conversions. Routes are either absent
//! or fully configured; there is no partial state.

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::errors::RouterError;

/// Maximum number of legs in any route, composite or discovered.
pub const MAX_HOPS: usize = 3;

/// Width of one packed path element: 3-byte fee + 20-byte token.
const PATH_ELEMENT: usize = 23;

/// Venue integration pattern for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
	/// Concentrated-liquidity exchange, fee-tiered pools.
	ConcentratedLiquidity,
	/// Constant-function exchange addressed by curve indices.
	ConstantFunction,
	/// Venue that mints the output asset directly against attached value.
	DirectIssuance,
	/// Pre-encoded multi-hop path through concentrated-liquidity pools.
	MultiHopPath,
	/// Explicit heterogeneous step list.
	MultiStepPath,
}

impl AdapterKind {
	/// Primitive kinds map to a single venue call; composite kinds expand
	/// into several.
	pub fn is_primitive(&self) -> bool {
		matches!(
			self,
			AdapterKind::ConcentratedLiquidity
				| AdapterKind::ConstantFunction
				| AdapterKind::DirectIssuance
		)
	}

	/// Fixed gas figure for one call through this adapter kind.
	pub fn gas_estimate(&self) -> u64 {
		match self {
			AdapterKind::ConcentratedLiquidity => 180_000,
			AdapterKind::ConstantFunction => 260_000,
			AdapterKind::DirectIssuance => 95_000,
			AdapterKind::MultiHopPath => 320_000,
			AdapterKind::MultiStepPath => 0,
		}
	}
}

/// One leg of an explicit multi-step route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStep {
	/// Asset produced by this leg.
	pub asset_out: Address,
	/// Primitive adapter carrying the leg.
	pub config: RouteConfig,
}

/// Fully configured venue adapter for an ordered asset pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteConfig {
	ConcentratedLiquidity {
		pool: Address,
		/// Fee tier in hundredths of a bip (e.g. 3000 = 0.3%).
		fee: u32,
	},
	ConstantFunction {
		pool: Address,
		index_in: i128,
		index_out: i128,
		/// Use the pool's underlying-asset exchange entry point.
		underlying: bool,
	},
	DirectIssuance {
		venue: Address,
	},
	MultiHopPath {
		/// Packed `token (fee token)+` bytes, at most [`MAX_HOPS`] hops.
		path: Bytes,
	},
	MultiStepPath {
		steps: Vec<RouteStep>,
	},
}

impl RouteConfig {
	pub fn kind(&self) -> AdapterKind {
		match self {
			RouteConfig::ConcentratedLiquidity { .. } => AdapterKind::ConcentratedLiquidity,
			RouteConfig::ConstantFunction { .. } => AdapterKind::ConstantFunction,
			RouteConfig::DirectIssuance { .. } => AdapterKind::DirectIssuance,
			RouteConfig::MultiHopPath { .. } => AdapterKind::MultiHopPath,
			RouteConfig::MultiStepPath { .. } => AdapterKind::MultiStepPath,
		}
	}

	/// The venue this route resolves to, when it is a single one.
	pub fn venue(&self) -> Option<Address> {
		match self {
			RouteConfig::ConcentratedLiquidity { pool, .. } => Some(*pool),
			RouteConfig::ConstantFunction { pool, .. } => Some(*pool),
			RouteConfig::DirectIssuance { venue } => Some(*venue),
			RouteConfig::MultiHopPath { .. } | RouteConfig::MultiStepPath { .. } => None,
		}
	}

	/// Derives the route for the opposite direction.
	///
	/// Fee tiers are preserved, curve indices swapped, path bytes reversed.
	/// Direct issuance and explicit step lists have no sound reverse.
	pub fn reversed(&self) -> Option<RouteConfig> {
		match self {
			RouteConfig::ConcentratedLiquidity { pool, fee } => {
				Some(RouteConfig::ConcentratedLiquidity {
					pool: *pool,
					fee: *fee,
				})
			}
			RouteConfig::ConstantFunction {
				pool,
				index_in,
				index_out,
				underlying,
			} => Some(RouteConfig::ConstantFunction {
				pool: *pool,
				index_in: *index_out,
				index_out: *index_in,
				underlying: *underlying,
			}),
			RouteConfig::MultiHopPath { path } => {
				reverse_path(path).ok().map(|path| RouteConfig::MultiHopPath { path })
			}
			RouteConfig::DirectIssuance { .. } | RouteConfig::MultiStepPath { .. } => None,
		}
	}
}

/// Packs tokens and per-hop fees into the fixed-width path layout.
///
/// `fees.len()` must be `tokens.len() - 1`.
pub fn encode_path(tokens: &[Address], fees: &[u32]) -> Result<Bytes, RouterError> {
	if tokens.len() < 2 || fees.len() != tokens.len() - 1 {
		return Err(RouterError::InvalidParameter(
			"path needs n tokens and n-1 fees".into(),
		));
	}
	if fees.len() > MAX_HOPS {
		return Err(RouterError::InvalidParameter(format!(
			"path exceeds {} hops",
			MAX_HOPS
		)));
	}
	let mut out = Vec::with_capacity(20 + fees.len() * PATH_ELEMENT);
	out.extend_from_slice(tokens[0].as_slice());
	for (token, fee) in tokens[1..].iter().zip(fees) {
		out.extend_from_slice(&fee.to_be_bytes()[1..]);
		out.extend_from_slice(token.as_slice());
	}
	Ok(out.into())
}

/// Splits packed path bytes back into tokens and fees, validating the
/// fixed-width layout and the hop budget.
pub fn decode_path(path: &[u8]) -> Result<(Vec<Address>, Vec<u32>), RouterError> {
	if path.len() < 20 + PATH_ELEMENT || (path.len() - 20) % PATH_ELEMENT != 0 {
		return Err(RouterError::InvalidParameter(
			"malformed path bytes".into(),
		));
	}
	let hops = (path.len() - 20) / PATH_ELEMENT;
	if hops > MAX_HOPS {
		return Err(RouterError::InvalidParameter(format!(
			"path exceeds {} hops",
			MAX_HOPS
		)));
	}
	let mut tokens = Vec::with_capacity(hops + 1);
	let mut fees = Vec::with_capacity(hops);
	tokens.push(Address::from_slice(&path[..20]));
	let mut offset = 20;
	for _ in 0..hops {
		let fee = u32::from_be_bytes([0, path[offset], path[offset + 1], path[offset + 2]]);
		fees.push(fee);
		tokens.push(Address::from_slice(&path[offset + 3..offset + PATH_ELEMENT]));
		offset += PATH_ELEMENT;
	}
	Ok((tokens, fees))
}

/// Reverses a packed path: token order flipped, each hop keeping its fee.
pub fn reverse_path(path: &[u8]) -> Result<Bytes, RouterError> {
	let (mut tokens, mut fees) = decode_path(path)?;
	tokens.reverse();
	fees.reverse();
	encode_path(&tokens, &fees)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn addr(n: u8) -> Address {
		Address::repeat_byte(n)
	}

	#[test]
	fn test_path_round_trip() {
		let tokens = vec![addr(1), addr(2), addr(3)];
		let fees = vec![500, 3000];
		let path = encode_path(&tokens, &fees).unwrap();
		assert_eq!(path.len(), 20 + 2 * 23);

		let (decoded_tokens, decoded_fees) = decode_path(&path).unwrap();
		assert_eq!(decoded_tokens, tokens);
		assert_eq!(decoded_fees, fees);
	}

	#[test]
	fn test_reverse_path_flips_token_order() {
		let path = encode_path(&[addr(1), addr(2), addr(3)], &[500, 3000]).unwrap();
		let reversed = reverse_path(&path).unwrap();
		let (tokens, fees) = decode_path(&reversed).unwrap();
		assert_eq!(tokens, vec![addr(3), addr(2), addr(1)]);
		assert_eq!(fees, vec![3000, 500]);
	}

	#[test]
	fn test_decode_rejects_truncated_path() {
		let path = encode_path(&[addr(1), addr(2)], &[3000]).unwrap();
		assert!(decode_path(&path[..path.len() - 1]).is_err());
	}

	#[test]
	fn test_encode_rejects_hop_budget() {
		let tokens = vec![addr(1), addr(2), addr(3), addr(4), addr(5)];
		let fees = vec![500, 500, 500, 500];
		assert!(encode_path(&tokens, &fees).is_err());
	}

	#[test]
	fn test_reversed_swaps_curve_indices() {
		let route = RouteConfig::ConstantFunction {
			pool: addr(9),
			index_in: 0,
			index_out: 2,
			underlying: true,
		};
		match route.reversed().unwrap() {
			RouteConfig::ConstantFunction {
				index_in,
				index_out,
				underlying,
				..
			} => {
				assert_eq!(index_in, 2);
				assert_eq!(index_out, 0);
				assert!(underlying);
			}
			other => panic!("unexpected reverse: {:?}", other),
		}
	}

	#[test]
	fn test_reversed_preserves_fee() {
		let route = RouteConfig::ConcentratedLiquidity {
			pool: addr(7),
			fee: 500,
		};
		match route.reversed().unwrap() {
			RouteConfig::ConcentratedLiquidity { pool, fee } => {
				assert_eq!(pool, addr(7));
				assert_eq!(fee, 500);
			}
			other => panic!("unexpected reverse: {:?}", other),
		}
	}

	#[test]
	fn test_issuance_and_steps_not_reversible() {
		assert!(RouteConfig::DirectIssuance { venue: addr(1) }.reversed().is_none());
		assert!(RouteConfig::MultiStepPath { steps: vec![] }.reversed().is_none());
	}
}

//! Execution strategies, steps and continuation plans.
//!
//! Strategies and steps are computed fresh per request and never cached:
//! upstream venue state may move between requests, so a stale minimum must
//! not survive one.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::{AdapterKind, RouteConfig};

/// Shape of a resolved conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
	/// Single configured route.
	Direct,
	/// Two legs through a bridge asset.
	Bridge,
	/// Three legs through two intermediates, or an explicit step list.
	MultiStep,
}

/// One resolved leg of a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedHop {
	pub asset_in: Address,
	pub asset_out: Address,
	pub config: RouteConfig,
}

/// A resolved conversion path with its per-leg adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStrategy {
	pub route_type: RouteType,
	pub hops: Vec<ResolvedHop>,
	/// Fixed per-adapter-kind gas figure summed over the legs.
	pub gas_estimate: u64,
}

/// Opaque venue call the Executor replays byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapInstruction {
	pub target: Address,
	pub payload: Bytes,
	/// Native value to attach; non-zero only for direct issuance.
	pub native_value: U256,
}

/// Fully priced and encoded leg, ready for replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStep {
	pub token_in: Address,
	pub token_out: Address,
	pub amount_in: U256,
	pub min_amount_out: U256,
	pub kind: AdapterKind,
	pub target: Address,
	pub payload: Bytes,
	pub native_value: U256,
}

/// Continuation descriptor for a composite conversion.
///
/// Only the first leg's minimum is final; later minimums are provisional
/// until the prior leg has run and its realized output is known. The
/// Executor feeds that amount back to obtain the next leg's refreshed
/// instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationPlan {
	pub plan_id: Uuid,
	/// Ordered asset chain, `legs.len() + 1` entries.
	pub assets: Vec<Address>,
	/// Adapter configuration per leg.
	pub legs: Vec<RouteConfig>,
	/// Provisional minimums per leg, recomputed on each continuation call.
	pub provisional_minimums: Vec<U256>,
	/// Index of the leg the next continuation call will encode.
	pub next_leg: usize,
	pub recipient: Address,
}

impl ContinuationPlan {
	pub fn is_complete(&self) -> bool {
		self.next_leg >= self.legs.len()
	}
}

/// Result of the single-call entry point: resolve, quote and encode.
///
/// For composite paths only the first leg is encoded; the continuation
/// drives the remaining legs once realized amounts are known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteAndExecution {
	pub quoted_amount: U256,
	pub min_amount_out: U256,
	/// Adapter kind of the encoded (first) leg.
	pub kind: AdapterKind,
	pub step: ExecutionStep,
	pub continuation: Option<ContinuationPlan>,
}

/// Full ordered instruction list for a resolved conversion.
///
/// Later legs' minimums are provisional: they assume every prior leg
/// realizes its quoted output, which the Executor must not rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletePlan {
	pub route_type: RouteType,
	pub steps: Vec<ExecutionStep>,
	pub expected_out: U256,
	pub min_amount_out: U256,
	pub gas_estimate: u64,
	pub continuation: Option<ContinuationPlan>,
}

//! Venue instruction encoding.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{aliases::{U160, U24}, Address, U256};
use alloy_sol_types::SolCall;
use uuid::Uuid;

use router_types::{
	ContinuationPlan, ExecutionStep, ExecutionStrategy, ResolvedHop, RouteConfig, RouterError,
	SwapInstruction,
};

use crate::abi::{
	ExactInputParams, ExactInputSingleParams, ICurvePool, IIssuanceVenue, ISwapRouter,
};

/// Encodes resolved, priced legs into replayable venue calls.
///
/// Concentrated-liquidity calls target the periphery router; constant
/// function and issuance calls target the venue itself. Every generated
/// instruction carries a deadline a fixed window from now so a stale
/// instruction cannot be replayed indefinitely.
pub struct PlanBuilder {
	swap_router: Address,
	deadline_window_secs: u64,
}

impl PlanBuilder {
	pub fn new(swap_router: Address, deadline_window_secs: u64) -> Self {
		Self {
			swap_router,
			deadline_window_secs,
		}
	}

	/// Encodes a single leg.
	pub fn build_instruction(
		&self,
		hop: &ResolvedHop,
		amount_in: U256,
		min_amount_out: U256,
		recipient: Address,
	) -> Result<SwapInstruction, RouterError> {
		match &hop.config {
			RouteConfig::ConcentratedLiquidity { fee, .. } => {
				let payload = ISwapRouter::exactInputSingleCall {
					params: ExactInputSingleParams {
						tokenIn: hop.asset_in,
						tokenOut: hop.asset_out,
						fee: U24::from(*fee),
						recipient,
						deadline: self.deadline(),
						amountIn: amount_in,
						amountOutMinimum: min_amount_out,
						sqrtPriceLimitX96: U160::ZERO,
					},
				}
				.abi_encode();
				Ok(SwapInstruction {
					target: self.swap_router,
					payload: payload.into(),
					native_value: U256::ZERO,
				})
			}
			RouteConfig::MultiHopPath { path } => {
				let payload = ISwapRouter::exactInputCall {
					params: ExactInputParams {
						path: path.clone(),
						recipient,
						deadline: self.deadline(),
						amountIn: amount_in,
						amountOutMinimum: min_amount_out,
					},
				}
				.abi_encode();
				Ok(SwapInstruction {
					target: self.swap_router,
					payload: payload.into(),
					native_value: U256::ZERO,
				})
			}
			RouteConfig::ConstantFunction {
				pool,
				index_in,
				index_out,
				underlying,
			} => {
				let payload = if *underlying {
					ICurvePool::exchange_underlyingCall {
						i: *index_in,
						j: *index_out,
						dx: amount_in,
						min_dy: min_amount_out,
					}
					.abi_encode()
				} else {
					ICurvePool::exchangeCall {
						i: *index_in,
						j: *index_out,
						dx: amount_in,
						min_dy: min_amount_out,
					}
					.abi_encode()
				};
				Ok(SwapInstruction {
					target: *pool,
					payload: payload.into(),
					native_value: U256::ZERO,
				})
			}
			RouteConfig::DirectIssuance { venue } => {
				// Amount is implicit via the attached value.
				let payload = IIssuanceVenue::depositCall { recipient }.abi_encode();
				Ok(SwapInstruction {
					target: *venue,
					payload: payload.into(),
					native_value: amount_in,
				})
			}
			RouteConfig::MultiStepPath { .. } => Err(RouterError::UnsupportedRoute),
		}
	}

	/// Encodes a leg with its pricing metadata attached.
	pub fn build_step(
		&self,
		hop: &ResolvedHop,
		amount_in: U256,
		min_amount_out: U256,
		recipient: Address,
	) -> Result<ExecutionStep, RouterError> {
		let instruction = self.build_instruction(hop, amount_in, min_amount_out, recipient)?;
		Ok(ExecutionStep {
			token_in: hop.asset_in,
			token_out: hop.asset_out,
			amount_in,
			min_amount_out,
			kind: hop.config.kind(),
			target: instruction.target,
			payload: instruction.payload,
			native_value: instruction.native_value,
		})
	}

	/// Continuation descriptor for a composite strategy, pointing past the
	/// leg that was just encoded.
	pub fn continuation(
		&self,
		strategy: &ExecutionStrategy,
		provisional_minimums: Vec<U256>,
		recipient: Address,
		next_leg: usize,
	) -> ContinuationPlan {
		let mut assets = Vec::with_capacity(strategy.hops.len() + 1);
		if let Some(first) = strategy.hops.first() {
			assets.push(first.asset_in);
		}
		assets.extend(strategy.hops.iter().map(|hop| hop.asset_out));

		ContinuationPlan {
			plan_id: Uuid::new_v4(),
			assets,
			legs: strategy.hops.iter().map(|hop| hop.config.clone()).collect(),
			provisional_minimums,
			next_leg,
			recipient,
		}
	}

	fn deadline(&self) -> U256 {
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.unwrap_or_default()
			.as_secs();
		U256::from(now + self.deadline_window_secs)
	}
}

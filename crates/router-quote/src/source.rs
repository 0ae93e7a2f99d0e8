//! Live quote sources.
//!
//! A [`LiveQuoteSource`] answers per-venue quoting calls; failures are
//! typed and recoverable, never fatal to a request. The production
//! implementation speaks JSON-RPC `eth_call` with ABI-encoded calldata.

use alloy_primitives::{aliases::U24, Address, U256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Errors from a live quote attempt. All of them select fallback pricing
/// in the engine; none abort the request.
#[derive(Debug, Error)]
pub enum QuoteError {
	#[error("Venue call failed: {0}")]
	VenueCall(String),

	#[error("Transport error: {0}")]
	Transport(String),

	#[error("Malformed response: {0}")]
	MalformedResponse(String),
}

// Quoting entry points of the supported venue families.
sol! {
	interface IQuoter {
		function quoteExactInputSingle(
			address tokenIn,
			address tokenOut,
			uint24 fee,
			uint256 amountIn,
			uint160 sqrtPriceLimitX96
		) external returns (uint256 amountOut);

		function quoteExactInput(
			bytes path,
			uint256 amountIn
		) external returns (uint256 amountOut);
	}

	interface ICurvePool {
		function get_dy(int128 i, int128 j, uint256 dx) external view returns (uint256);
		function get_dy_underlying(int128 i, int128 j, uint256 dx) external view returns (uint256);
	}
}

/// Venue-facing quoting interface.
#[async_trait]
pub trait LiveQuoteSource: Send + Sync {
	/// Concentrated-liquidity output for an exact fee tier.
	async fn concentrated_out(
		&self,
		token_in: Address,
		token_out: Address,
		fee: u32,
		amount_in: U256,
	) -> Result<U256, QuoteError>;

	/// Concentrated-liquidity output along packed path bytes.
	async fn path_out(&self, path: &[u8], amount_in: U256) -> Result<U256, QuoteError>;

	/// Constant-function output via curve indices.
	async fn constant_function_out(
		&self,
		pool: Address,
		index_in: i128,
		index_out: i128,
		underlying: bool,
		amount_in: U256,
	) -> Result<U256, QuoteError>;

	/// Direct-issuance preview; issuance venues mint one-to-one against
	/// attached value.
	async fn issuance_out(&self, venue: Address, amount_in: U256) -> Result<U256, QuoteError>;
}

/// JSON-RPC `eth_call` quote source.
pub struct RpcQuoteSource {
	client: reqwest::Client,
	rpc_url: String,
	quoter: Address,
}

impl RpcQuoteSource {
	pub fn new(rpc_url: String, quoter: Address, timeout_ms: u64) -> Result<Self, QuoteError> {
		let client = reqwest::Client::builder()
			.timeout(std::time::Duration::from_millis(timeout_ms))
			.build()
			.map_err(|e| QuoteError::Transport(e.to_string()))?;
		Ok(Self {
			client,
			rpc_url,
			quoter,
		})
	}

	async fn eth_call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, QuoteError> {
		let body = serde_json::json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "eth_call",
			"params": [
				{ "to": format!("{}", to), "data": format!("0x{}", hex::encode(&data)) },
				"latest"
			],
		});

		let response = self
			.client
			.post(&self.rpc_url)
			.json(&body)
			.send()
			.await
			.map_err(|e| QuoteError::Transport(e.to_string()))?;

		let payload: serde_json::Value = response
			.json()
			.await
			.map_err(|e| QuoteError::MalformedResponse(e.to_string()))?;

		if let Some(error) = payload.get("error") {
			debug!(target = %to, "eth_call reverted: {}", error);
			return Err(QuoteError::VenueCall(error.to_string()));
		}

		let result = payload
			.get("result")
			.and_then(|v| v.as_str())
			.ok_or_else(|| QuoteError::MalformedResponse("missing result".to_string()))?;

		hex::decode(result.trim_start_matches("0x"))
			.map_err(|e| QuoteError::MalformedResponse(e.to_string()))
	}
}

#[async_trait]
impl LiveQuoteSource for RpcQuoteSource {
	async fn concentrated_out(
		&self,
		token_in: Address,
		token_out: Address,
		fee: u32,
		amount_in: U256,
	) -> Result<U256, QuoteError> {
		let call = IQuoter::quoteExactInputSingleCall {
			tokenIn: token_in,
			tokenOut: token_out,
			fee: U24::from(fee),
			amountIn: amount_in,
			sqrtPriceLimitX96: alloy_primitives::aliases::U160::ZERO,
		};
		let raw = self.eth_call(self.quoter, call.abi_encode()).await?;
		let decoded = IQuoter::quoteExactInputSingleCall::abi_decode_returns(&raw, true)
			.map_err(|e| QuoteError::MalformedResponse(e.to_string()))?;
		Ok(decoded.amountOut)
	}

	async fn path_out(&self, path: &[u8], amount_in: U256) -> Result<U256, QuoteError> {
		let call = IQuoter::quoteExactInputCall {
			path: path.to_vec().into(),
			amountIn: amount_in,
		};
		let raw = self.eth_call(self.quoter, call.abi_encode()).await?;
		let decoded = IQuoter::quoteExactInputCall::abi_decode_returns(&raw, true)
			.map_err(|e| QuoteError::MalformedResponse(e.to_string()))?;
		Ok(decoded.amountOut)
	}

	async fn constant_function_out(
		&self,
		pool: Address,
		index_in: i128,
		index_out: i128,
		underlying: bool,
		amount_in: U256,
	) -> Result<U256, QuoteError> {
		let raw = if underlying {
			let call = ICurvePool::get_dy_underlyingCall {
				i: index_in,
				j: index_out,
				dx: amount_in,
			};
			self.eth_call(pool, call.abi_encode()).await?
		} else {
			let call = ICurvePool::get_dyCall {
				i: index_in,
				j: index_out,
				dx: amount_in,
			};
			self.eth_call(pool, call.abi_encode()).await?
		};

		let decoded = U256::try_from_be_slice(&raw)
			.ok_or_else(|| QuoteError::MalformedResponse("short word".to_string()))?;
		Ok(decoded)
	}

	async fn issuance_out(&self, _venue: Address, amount_in: U256) -> Result<U256, QuoteError> {
		// Issuance venues mint one-to-one against the attached value; there
		// is no venue-side quoting entry point to consult.
		Ok(amount_in)
	}
}

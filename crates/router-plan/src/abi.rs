//! Venue call interfaces.
//!
//! One entry point per adapter kind; the builder selects the call and the
//! target, the Executor replays the bytes unchanged.

use alloy_sol_types::sol;

sol! {
	/// Parameters for a single-pool concentrated-liquidity swap.
	struct ExactInputSingleParams {
		address tokenIn;
		address tokenOut;
		uint24 fee;
		address recipient;
		uint256 deadline;
		uint256 amountIn;
		uint256 amountOutMinimum;
		uint160 sqrtPriceLimitX96;
	}

	/// Parameters for a path-encoded multi-hop swap.
	struct ExactInputParams {
		bytes path;
		address recipient;
		uint256 deadline;
		uint256 amountIn;
		uint256 amountOutMinimum;
	}

	interface ISwapRouter {
		function exactInputSingle(ExactInputSingleParams params)
			external
			payable
			returns (uint256 amountOut);

		function exactInput(ExactInputParams params)
			external
			payable
			returns (uint256 amountOut);
	}

	interface ICurvePool {
		function exchange(int128 i, int128 j, uint256 dx, uint256 min_dy)
			external
			payable
			returns (uint256);

		function exchange_underlying(int128 i, int128 j, uint256 dx, uint256 min_dy)
			external
			payable
			returns (uint256);
	}

	interface IIssuanceVenue {
		function deposit(address recipient) external payable;
	}
}

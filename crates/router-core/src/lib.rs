//! Core engine for the asset conversion router.
//!
//! Ties the registries, path finder, quote engine, plan builder and
//! security guard together behind the single facade the service layer and
//! the Executor consume.

pub mod builder;
pub mod engine;
pub mod event_bus;

pub use builder::RouterBuilder;
pub use engine::RouterEngine;
pub use event_bus::EventBus;
pub use router_guard::CustomCallApproval;

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use alloy_primitives::{Address, U256};
	use async_trait::async_trait;

	use router_config::RouterConfig;
	use router_quote::{LiveQuoteSource, QuoteError};
	use router_types::{
		apply_slippage, AdapterKind, Credentials, RouteType, RouterError, RouterEvent,
	};

	use crate::RouterBuilder;

	// Assets: A 0x11.., B 0x22.., hub 0x33.. (all BTC-wrapped); S 0x44..
	// (stable). Routes: A->hub and hub->B through concentrated liquidity.
	const CONFIG: &str = r#"
[engine]
name = "conversion-router"
default_live_slippage_bps = 50
max_slippage_bps = 1000

[quotes]
rpc_url = "http://localhost:8545"
quoter_address = "0x61fFE014bA17989E743c5F6cB21bF9697530B21e"

[execution]
swap_router = "0xE592427A0AEce92De3Edee1F18E0157C05861564"

[governance]
admin_secret_hash = "0x1b76bd63ca25ce24a5332c6c105a4a5a1f1e9b1e0a3d41a76b9b6d1e1b2a3c4d"
cooling_off_secs = 0

[[governance.grants]]
holder = "ops"
capabilities = ["route_manager", "guardian", "venue_manager"]

[[assets]]
address = "0x1111111111111111111111111111111111111111"
category = "btc_wrapped"
decimals = 8
supported = true

[[assets]]
address = "0x2222222222222222222222222222222222222222"
category = "btc_wrapped"
decimals = 8
supported = true

[[assets]]
address = "0x3333333333333333333333333333333333333333"
category = "btc_wrapped"
decimals = 8
supported = true

[[assets]]
address = "0x4444444444444444444444444444444444444444"
category = "stable"
decimals = 6
supported = true

[categories.btc_wrapped]
bridges = ["0x3333333333333333333333333333333333333333"]

[[routes]]
asset_in = "0x1111111111111111111111111111111111111111"
asset_out = "0x3333333333333333333333333333333333333333"
kind = "concentrated_liquidity"
pool = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
fee = 500

[[routes]]
asset_in = "0x3333333333333333333333333333333333333333"
asset_out = "0x2222222222222222222222222222222222222222"
kind = "concentrated_liquidity"
pool = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"
fee = 3000

[[slippage]]
asset_in = "0x1111111111111111111111111111111111111111"
asset_out = "0x3333333333333333333333333333333333333333"
bps = 40

[[slippage]]
asset_in = "0x3333333333333333333333333333333333333333"
asset_out = "0x2222222222222222222222222222222222222222"
bps = 60

[[pools]]
address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"

[[pools]]
address = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"
"#;

	fn addr(n: u8) -> Address {
		Address::repeat_byte(n)
	}

	fn creds() -> Credentials {
		Credentials {
			holder: "ops".into(),
			secret: "rebalance-admin".into(),
		}
	}

	/// Echoes the input amount for every venue family, i.e. a live quote
	/// exactly on the naive conversion for equal-decimal pairs.
	struct EchoSource;

	#[async_trait]
	impl LiveQuoteSource for EchoSource {
		async fn concentrated_out(
			&self,
			_token_in: Address,
			_token_out: Address,
			_fee: u32,
			amount_in: U256,
		) -> Result<U256, QuoteError> {
			Ok(amount_in)
		}

		async fn path_out(&self, _path: &[u8], amount_in: U256) -> Result<U256, QuoteError> {
			Ok(amount_in)
		}

		async fn constant_function_out(
			&self,
			_pool: Address,
			_index_in: i128,
			_index_out: i128,
			_underlying: bool,
			amount_in: U256,
		) -> Result<U256, QuoteError> {
			Ok(amount_in)
		}

		async fn issuance_out(&self, _venue: Address, amount_in: U256) -> Result<U256, QuoteError> {
			Ok(amount_in)
		}
	}

	/// Every live quote fails; only fallback pricing is possible.
	struct DeadSource;

	#[async_trait]
	impl LiveQuoteSource for DeadSource {
		async fn concentrated_out(
			&self,
			_token_in: Address,
			_token_out: Address,
			_fee: u32,
			_amount_in: U256,
		) -> Result<U256, QuoteError> {
			Err(QuoteError::VenueCall("down".to_string()))
		}

		async fn path_out(&self, _path: &[u8], _amount_in: U256) -> Result<U256, QuoteError> {
			Err(QuoteError::VenueCall("down".to_string()))
		}

		async fn constant_function_out(
			&self,
			_pool: Address,
			_index_in: i128,
			_index_out: i128,
			_underlying: bool,
			_amount_in: U256,
		) -> Result<U256, QuoteError> {
			Err(QuoteError::VenueCall("down".to_string()))
		}

		async fn issuance_out(
			&self,
			_venue: Address,
			_amount_in: U256,
		) -> Result<U256, QuoteError> {
			Err(QuoteError::VenueCall("down".to_string()))
		}
	}

	fn engine_with(source: Arc<dyn LiveQuoteSource>) -> crate::RouterEngine {
		let mut config: RouterConfig = toml::from_str(CONFIG).unwrap();
		config.governance.admin_secret_hash = format!(
			"0x{}",
			hex::encode(router_registry::hash_secret("rebalance-admin"))
		);
		RouterBuilder::new(config)
			.with_quote_source(source)
			.build()
			.unwrap()
	}

	const AMOUNT: u64 = 100_000_000;

	#[tokio::test]
	async fn test_bridge_resolution_and_quote() {
		let engine = engine_with(Arc::new(EchoSource));

		assert!(engine.has_route(addr(0x11), addr(0x22)));
		let strategy = engine.find_path(addr(0x11), addr(0x22)).unwrap();
		assert_eq!(strategy.route_type, RouteType::Bridge);
		assert_eq!(strategy.hops.len(), 2);

		let result = engine
			.quote_and_execution_data(addr(0x11), addr(0x22), U256::from(AMOUNT), addr(0x77))
			.await
			.unwrap();
		assert_eq!(result.kind, AdapterKind::ConcentratedLiquidity);
		assert_eq!(result.quoted_amount, U256::from(AMOUNT));
		// Both legs live: 40 bps then 60 bps, compounded.
		assert_eq!(
			result.min_amount_out,
			apply_slippage(apply_slippage(U256::from(AMOUNT), 40), 60)
		);
		assert!(result.continuation.is_some());
		assert_eq!(result.step.amount_in, U256::from(AMOUNT));
	}

	#[tokio::test]
	async fn test_continuation_reprices_from_realized_amount() {
		let engine = engine_with(Arc::new(EchoSource));

		let result = engine
			.quote_and_execution_data(addr(0x11), addr(0x22), U256::from(AMOUNT), addr(0x77))
			.await
			.unwrap();
		let plan = result.continuation.unwrap();

		// The first leg realized less than quoted.
		let realized = U256::from(AMOUNT - 1_000);
		let (step, advanced) = engine
			.bridge_second_leg_data(&plan, realized)
			.await
			.unwrap();
		assert_eq!(step.token_in, addr(0x33));
		assert_eq!(step.token_out, addr(0x22));
		assert_eq!(step.amount_in, realized);
		assert_eq!(step.min_amount_out, apply_slippage(realized, 60));
		assert!(advanced.is_complete());

		// Driving past the final leg is rejected.
		assert!(matches!(
			engine.next_step_execution_data(&advanced, realized).await,
			Err(RouterError::PlanExhausted)
		));
	}

	#[tokio::test]
	async fn test_complete_plan_chains_amounts() {
		let engine = engine_with(Arc::new(EchoSource));

		let plan = engine
			.complete_execution_plan(addr(0x11), addr(0x22), U256::from(AMOUNT), addr(0x77))
			.await
			.unwrap();
		assert_eq!(plan.steps.len(), 2);
		assert_eq!(plan.steps[0].amount_in, U256::from(AMOUNT));
		// Second leg priced on the first leg's quoted output.
		assert_eq!(plan.steps[1].amount_in, U256::from(AMOUNT));
		assert_eq!(plan.gas_estimate, 2 * 180_000);

		// The multi-step variant accepts the same composite path.
		assert!(engine
			.complete_multi_step_plan(addr(0x11), addr(0x22), U256::from(AMOUNT), addr(0x77))
			.await
			.is_ok());
	}

	#[tokio::test]
	async fn test_dead_quote_source_uses_vetted_fallback() {
		let engine = engine_with(Arc::new(DeadSource));

		let result = engine
			.quote_and_execution_data(addr(0x11), addr(0x22), U256::from(AMOUNT), addr(0x77))
			.await
			.unwrap();
		// Fallback on both legs: tolerances summed (40 + 60), not compounded.
		assert_eq!(
			result.min_amount_out,
			apply_slippage(U256::from(AMOUNT), 100)
		);
	}

	#[tokio::test]
	async fn test_pool_pause_blocks_only_that_pool() {
		let engine = engine_with(Arc::new(EchoSource));

		engine
			.set_pool_pause(addr(0xAA), true, &creds())
			.unwrap();

		// Any path through the paused pool is blocked.
		assert!(matches!(
			engine
				.quote_and_execution_data(addr(0x11), addr(0x22), U256::from(AMOUNT), addr(0x77))
				.await,
			Err(RouterError::PoolPaused(_))
		));
		// The unrelated pair keeps working.
		assert!(engine
			.quote_and_execution_data(addr(0x33), addr(0x22), U256::from(AMOUNT), addr(0x77))
			.await
			.is_ok());

		engine
			.set_pool_pause(addr(0xAA), false, &creds())
			.unwrap();
		assert!(engine
			.validate_swap_execution(addr(0x11), addr(0x22), U256::from(AMOUNT))
			.is_ok());
	}

	#[tokio::test]
	async fn test_cross_category_swap_fails() {
		let engine = engine_with(Arc::new(EchoSource));
		assert!(matches!(
			engine
				.quote_and_execution_data(addr(0x11), addr(0x44), U256::from(AMOUNT), addr(0x77))
				.await,
			Err(RouterError::IncompatibleCategories(_, _))
		));
	}

	#[tokio::test]
	async fn test_zero_amount_fails() {
		let engine = engine_with(Arc::new(EchoSource));
		assert!(matches!(
			engine
				.quote_and_execution_data(addr(0x11), addr(0x22), U256::ZERO, addr(0x77))
				.await,
			Err(RouterError::InvalidAmount)
		));
	}

	#[tokio::test]
	async fn test_governance_publishes_events() {
		let engine = engine_with(Arc::new(EchoSource));
		let mut events = engine.event_bus().subscribe();

		engine
			.set_slippage(addr(0x11), addr(0x33), 45, &creds())
			.unwrap();

		match events.try_recv().unwrap() {
			RouterEvent::SlippageSet { bps, .. } => assert_eq!(bps, 45),
			other => panic!("unexpected event: {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_global_pause_blocks_everything() {
		let engine = engine_with(Arc::new(EchoSource));
		engine.set_global_pause(true, &creds()).unwrap();

		assert!(matches!(
			engine.validate_swap_execution(addr(0x11), addr(0x22), U256::from(AMOUNT)),
			Err(RouterError::EnginePaused)
		));

		engine.set_global_pause(false, &creds()).unwrap();
		assert!(engine
			.validate_swap_execution(addr(0x11), addr(0x22), U256::from(AMOUNT))
			.is_ok());
	}
}

//! Quote computation with deterministic fallback.

use std::sync::Arc;

use alloy_primitives::U256;
use tracing::debug;

use router_registry::{AssetRegistry, SlippageTable};
use router_types::{
	apply_slippage, scale_decimals, ExecutionStrategy, HopQuote, QuoteBasis, ResolvedHop,
	RouteConfig, RouterError, SwapQuote, BPS_DENOMINATOR,
};

use crate::source::LiveQuoteSource;

/// Fee tiers tried after a route's declared tier, in order.
const STANDARD_FEE_TIERS: [u32; 4] = [500, 3_000, 10_000, 100];

/// Acceptance band for concentrated-liquidity results, in bps of the naive
/// decimal-converted amount. Generous on the low side: tiered pools can be
/// thin without being wrong.
const WIDE_BAND: (u64, u64) = (5_000, 11_000);

/// Acceptance band for constant-function and issuance results. These
/// venues track the peg closely, so anything further out is treated as a
/// venue fault.
const TIGHT_BAND: (u64, u64) = (9_000, 11_000);

pub struct QuoteEngine {
	assets: Arc<AssetRegistry>,
	slippage: Arc<SlippageTable>,
	source: Arc<dyn LiveQuoteSource>,
	default_live_bps: u16,
}

impl QuoteEngine {
	pub fn new(
		assets: Arc<AssetRegistry>,
		slippage: Arc<SlippageTable>,
		source: Arc<dyn LiveQuoteSource>,
		default_live_bps: u16,
	) -> Self {
		Self {
			assets,
			slippage,
			source,
			default_live_bps,
		}
	}

	/// Prices a full strategy, leg by leg, each leg's quoted output feeding
	/// the next leg's input estimate. Nothing is cached across requests.
	pub async fn quote_strategy(
		&self,
		strategy: &ExecutionStrategy,
		amount_in: U256,
	) -> Result<SwapQuote, RouterError> {
		if amount_in.is_zero() {
			return Err(RouterError::InvalidAmount);
		}

		let mut legs = Vec::with_capacity(strategy.hops.len());
		let mut current = amount_in;
		for hop in &strategy.hops {
			let quote = self.quote_hop(hop, current).await?;
			current = quote.amount_out;
			legs.push(quote);
		}

		let amount_out = current;
		let min_amount_out = self.combine_minimums(amount_out, &legs);

		Ok(SwapQuote {
			amount_out,
			min_amount_out,
			legs,
		})
	}

	/// Prices one leg: live quote when the venue answers plausibly, else
	/// the decimal-converted amount under the vetted tolerance.
	pub async fn quote_hop(
		&self,
		hop: &ResolvedHop,
		amount_in: U256,
	) -> Result<HopQuote, RouterError> {
		if amount_in.is_zero() {
			return Err(RouterError::InvalidAmount);
		}
		let info_in = self.assets.require_supported(hop.asset_in)?;
		let info_out = self.assets.require_supported(hop.asset_out)?;
		let naive = scale_decimals(amount_in, info_in.decimals, info_out.decimals);

		if let Some(quoted) = self.live_quote(hop, amount_in, naive).await {
			let bps = self
				.slippage
				.get(hop.asset_in, hop.asset_out)
				.unwrap_or(self.default_live_bps);
			return Ok(HopQuote {
				amount_out: quoted,
				min_amount_out: apply_slippage(quoted, bps),
				applied_bps: bps,
				basis: QuoteBasis::Live,
			});
		}

		// Fallback fails closed on an unvetted pair.
		let bps = self
			.slippage
			.get(hop.asset_in, hop.asset_out)
			.ok_or(RouterError::NoConfiguredSlippage(hop.asset_in, hop.asset_out))?;
		debug!(
			asset_in = %hop.asset_in,
			asset_out = %hop.asset_out,
			bps,
			"live quote unavailable, using vetted fallback"
		);
		Ok(HopQuote {
			amount_out: naive,
			min_amount_out: apply_slippage(naive, bps),
			applied_bps: bps,
			basis: QuoteBasis::Fallback,
		})
	}

	/// Attempts a live quote for the leg. `None` means fallback, never an
	/// error: a venue that reverts, times out or answers outside the sanity
	/// band is simply not usable as a price source right now.
	async fn live_quote(&self, hop: &ResolvedHop, amount_in: U256, naive: U256) -> Option<U256> {
		match &hop.config {
			RouteConfig::ConcentratedLiquidity { fee, .. } => {
				for tier in fee_ladder(*fee) {
					if let Ok(out) = self
						.source
						.concentrated_out(hop.asset_in, hop.asset_out, tier, amount_in)
						.await
					{
						if within(out, naive, WIDE_BAND) {
							return Some(out);
						}
					}
				}
				None
			}
			RouteConfig::MultiHopPath { path } => self
				.source
				.path_out(path, amount_in)
				.await
				.ok()
				.filter(|out| within(*out, naive, WIDE_BAND)),
			RouteConfig::ConstantFunction {
				pool,
				index_in,
				index_out,
				underlying,
			} => self
				.source
				.constant_function_out(*pool, *index_in, *index_out, *underlying, amount_in)
				.await
				.ok()
				.filter(|out| within(*out, naive, TIGHT_BAND)),
			RouteConfig::DirectIssuance { venue } => self
				.source
				.issuance_out(*venue, amount_in)
				.await
				.ok()
				.filter(|out| within(*out, naive, TIGHT_BAND)),
			RouteConfig::MultiStepPath { .. } => None,
		}
	}

	/// Combines per-leg tolerances into the overall minimum. All legs live:
	/// tolerances compound exactly. Any fallback leg: tolerances are summed
	/// and capped at the global maximum, a deliberately conservative
	/// approximation.
	fn combine_minimums(&self, amount_out: U256, legs: &[HopQuote]) -> U256 {
		if legs.len() == 1 {
			return legs[0].min_amount_out;
		}
		let all_live = legs.iter().all(|leg| leg.basis == QuoteBasis::Live);
		if all_live {
			let mut min = amount_out;
			for leg in legs {
				min = apply_slippage(min, leg.applied_bps);
			}
			min
		} else {
			let summed: u64 = legs.iter().map(|leg| leg.applied_bps as u64).sum();
			let capped = summed
				.min(self.slippage.max_bps() as u64)
				.min(BPS_DENOMINATOR) as u16;
			apply_slippage(amount_out, capped)
		}
	}
}

/// Declared tier first, then the standard tiers, deduplicated.
fn fee_ladder(declared: u32) -> impl Iterator<Item = u32> {
	std::iter::once(declared).chain(
		STANDARD_FEE_TIERS
			.into_iter()
			.filter(move |tier| *tier != declared),
	)
}

fn within(out: U256, naive: U256, band: (u64, u64)) -> bool {
	if out.is_zero() || naive.is_zero() {
		return false;
	}
	let scaled = out * U256::from(BPS_DENOMINATOR);
	scaled >= naive * U256::from(band.0) && scaled <= naive * U256::from(band.1)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::Address;
	use async_trait::async_trait;
	use router_registry::{hash_secret, SecretHashPolicy};
	use router_types::{AssetCategory, AssetInfo, AuthorizationPolicy, Capability};

	use crate::source::QuoteError as SourceError;

	fn addr(n: u8) -> Address {
		Address::repeat_byte(n)
	}

	/// Source that answers concentrated-liquidity quotes from a fixed
	/// table and fails everything else.
	struct StaticSource {
		concentrated: Vec<((Address, Address, u32), U256)>,
	}

	#[async_trait]
	impl LiveQuoteSource for StaticSource {
		async fn concentrated_out(
			&self,
			token_in: Address,
			token_out: Address,
			fee: u32,
			_amount_in: U256,
		) -> Result<U256, SourceError> {
			self.concentrated
				.iter()
				.find(|((a, b, f), _)| *a == token_in && *b == token_out && *f == fee)
				.map(|(_, out)| *out)
				.ok_or_else(|| SourceError::VenueCall("no pool".to_string()))
		}

		async fn path_out(&self, _path: &[u8], _amount_in: U256) -> Result<U256, SourceError> {
			Err(SourceError::VenueCall("no pool".to_string()))
		}

		async fn constant_function_out(
			&self,
			_pool: Address,
			_index_in: i128,
			_index_out: i128,
			_underlying: bool,
			_amount_in: U256,
		) -> Result<U256, SourceError> {
			Err(SourceError::VenueCall("no pool".to_string()))
		}

		async fn issuance_out(&self, _venue: Address, amount_in: U256) -> Result<U256, SourceError> {
			Ok(amount_in)
		}
	}

	struct Fixture {
		engine: QuoteEngine,
		slippage: Arc<SlippageTable>,
	}

	fn fixture(concentrated: Vec<((Address, Address, u32), U256)>) -> Fixture {
		let policy: Arc<dyn AuthorizationPolicy> = Arc::new(
			SecretHashPolicy::new(hash_secret("s")).with_grant("ops", &[Capability::RouteManager]),
		);
		let assets = Arc::new(AssetRegistry::new(policy.clone()));
		assets.seed(
			(1..=4)
				.map(|n| AssetInfo {
					address: addr(n),
					category: AssetCategory::EthLst,
					decimals: 18,
					supported: true,
				})
				.collect(),
			vec![],
		);
		let slippage = Arc::new(SlippageTable::new(1_000, policy));
		let engine = QuoteEngine::new(
			assets,
			slippage.clone(),
			Arc::new(StaticSource { concentrated }),
			50,
		);
		Fixture { engine, slippage }
	}

	fn cl_hop(from: u8, to: u8, fee: u32) -> ResolvedHop {
		ResolvedHop {
			asset_in: addr(from),
			asset_out: addr(to),
			config: RouteConfig::ConcentratedLiquidity {
				pool: addr(99),
				fee,
			},
		}
	}

	fn creds() -> router_types::Credentials {
		router_types::Credentials {
			holder: "ops".into(),
			secret: "s".into(),
		}
	}

	const ONE: u64 = 1_000_000_000_000_000_000;

	#[tokio::test]
	async fn test_live_quote_within_band() {
		let quoted = U256::from(ONE) * U256::from(99u64) / U256::from(100u64);
		let f = fixture(vec![((addr(1), addr(2), 500), quoted)]);

		let q = f
			.engine
			.quote_hop(&cl_hop(1, 2, 500), U256::from(ONE))
			.await
			.unwrap();
		assert_eq!(q.basis, QuoteBasis::Live);
		assert_eq!(q.amount_out, quoted);
		assert_eq!(q.applied_bps, 50);
		assert_eq!(q.min_amount_out, apply_slippage(quoted, 50));
	}

	#[tokio::test]
	async fn test_zero_live_quote_falls_back_to_vetted_tolerance() {
		// Venue answers zero: treated as a failed source, not an error.
		let f = fixture(vec![((addr(1), addr(2), 3_000), U256::ZERO)]);
		f.slippage.set(addr(1), addr(2), 80, &creds()).unwrap();

		let q = f
			.engine
			.quote_hop(&cl_hop(1, 2, 3_000), U256::from(ONE))
			.await
			.unwrap();
		assert_eq!(q.basis, QuoteBasis::Fallback);
		assert_eq!(q.amount_out, U256::from(ONE));
		assert_eq!(q.min_amount_out, apply_slippage(U256::from(ONE), 80));
	}

	#[tokio::test]
	async fn test_fallback_without_tolerance_fails_closed() {
		let f = fixture(vec![]);
		let err = f
			.engine
			.quote_hop(&cl_hop(1, 2, 500), U256::from(ONE))
			.await
			.unwrap_err();
		assert!(matches!(err, RouterError::NoConfiguredSlippage(_, _)));
	}

	#[tokio::test]
	async fn test_fee_ladder_tries_standard_tiers() {
		// Declared tier 100 has no pool; 3000 does.
		let quoted = U256::from(ONE);
		let f = fixture(vec![((addr(1), addr(2), 3_000), quoted)]);

		let q = f
			.engine
			.quote_hop(&cl_hop(1, 2, 100), U256::from(ONE))
			.await
			.unwrap();
		assert_eq!(q.basis, QuoteBasis::Live);
		assert_eq!(q.amount_out, quoted);
	}

	#[tokio::test]
	async fn test_out_of_band_live_quote_rejected() {
		// 40% of naive is below the wide band's floor.
		let f = fixture(vec![(
			(addr(1), addr(2), 500),
			U256::from(ONE) * U256::from(40u64) / U256::from(100u64),
		)]);
		f.slippage.set(addr(1), addr(2), 30, &creds()).unwrap();

		let q = f
			.engine
			.quote_hop(&cl_hop(1, 2, 500), U256::from(ONE))
			.await
			.unwrap();
		assert_eq!(q.basis, QuoteBasis::Fallback);
	}

	#[tokio::test]
	async fn test_min_never_exceeds_quoted() {
		let quoted = U256::from(ONE);
		let f = fixture(vec![((addr(1), addr(2), 500), quoted)]);
		let q = f
			.engine
			.quote_hop(&cl_hop(1, 2, 500), U256::from(ONE))
			.await
			.unwrap();
		assert!(q.min_amount_out <= q.amount_out);
	}

	#[tokio::test]
	async fn test_bridge_all_live_compounds() {
		let out1 = U256::from(ONE);
		let out2 = U256::from(ONE) * U256::from(98u64) / U256::from(100u64);
		let f = fixture(vec![
			((addr(1), addr(3), 500), out1),
			((addr(3), addr(2), 500), out2),
		]);

		let strategy = ExecutionStrategy {
			route_type: router_types::RouteType::Bridge,
			hops: vec![cl_hop(1, 3, 500), cl_hop(3, 2, 500)],
			gas_estimate: 0,
		};
		let q = f
			.engine
			.quote_strategy(&strategy, U256::from(ONE))
			.await
			.unwrap();
		assert_eq!(q.amount_out, out2);
		assert_eq!(
			q.min_amount_out,
			apply_slippage(apply_slippage(out2, 50), 50)
		);
	}

	#[tokio::test]
	async fn test_bridge_with_fallback_sums_tolerances() {
		// First leg live, second leg has no pool and falls back at 90 bps.
		let out1 = U256::from(ONE);
		let f = fixture(vec![((addr(1), addr(3), 500), out1)]);
		f.slippage.set(addr(3), addr(2), 90, &creds()).unwrap();

		let strategy = ExecutionStrategy {
			route_type: router_types::RouteType::Bridge,
			hops: vec![cl_hop(1, 3, 500), cl_hop(3, 2, 500)],
			gas_estimate: 0,
		};
		let q = f
			.engine
			.quote_strategy(&strategy, U256::from(ONE))
			.await
			.unwrap();
		// 50 (live default) + 90 (fallback), summed not multiplied.
		assert_eq!(q.min_amount_out, apply_slippage(q.amount_out, 140));
	}

	#[tokio::test]
	async fn test_summed_tolerances_capped_at_max() {
		let f = fixture(vec![]);
		f.slippage.set(addr(1), addr(3), 600, &creds()).unwrap();
		f.slippage.set(addr(3), addr(2), 600, &creds()).unwrap();

		let strategy = ExecutionStrategy {
			route_type: router_types::RouteType::Bridge,
			hops: vec![cl_hop(1, 3, 500), cl_hop(3, 2, 500)],
			gas_estimate: 0,
		};
		let q = f
			.engine
			.quote_strategy(&strategy, U256::from(ONE))
			.await
			.unwrap();
		// 600 + 600 capped to the table's max of 1000.
		assert_eq!(q.min_amount_out, apply_slippage(q.amount_out, 1_000));
	}

	#[tokio::test]
	async fn test_zero_amount_rejected() {
		let f = fixture(vec![]);
		assert!(matches!(
			f.engine.quote_hop(&cl_hop(1, 2, 500), U256::ZERO).await,
			Err(RouterError::InvalidAmount)
		));
	}

	#[test]
	fn test_fee_ladder_dedupes_declared_tier() {
		let tiers: Vec<u32> = fee_ladder(3_000).collect();
		assert_eq!(tiers, vec![3_000, 500, 10_000, 100]);
	}
}

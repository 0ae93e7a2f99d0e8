//! The router engine facade.
//!
//! One object ties resolution, quoting, planning and the security guard
//! together behind the surface the Executor consumes, and exposes the
//! governance surface that mutates shared state. Every request runs to
//! completion as a single sequential unit; nothing is cached between
//! requests.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::instrument;

use router_guard::{CustomCallApproval, SecurityGuard};
use router_paths::PathFinder;
use router_plan::PlanBuilder;
use router_quote::QuoteEngine;
use router_registry::{AssetRegistry, RouteTable, SlippageTable};
use router_types::{
	AdapterKind, AssetInfo, CompletePlan, ContinuationPlan, Credentials, ExecutionStep,
	ExecutionStrategy, PauseScope, QuoteAndExecution, ResolvedHop, RouteConfig, RouterError,
	RouterEvent,
};

use crate::event_bus::EventBus;

pub struct RouterEngine {
	assets: Arc<AssetRegistry>,
	routes: Arc<RouteTable>,
	slippage: Arc<SlippageTable>,
	paths: PathFinder,
	quotes: QuoteEngine,
	planner: PlanBuilder,
	guard: SecurityGuard,
	event_bus: EventBus,
	max_hops: usize,
}

impl RouterEngine {
	#[allow(clippy::too_many_arguments)]
	pub(crate) fn new(
		assets: Arc<AssetRegistry>,
		routes: Arc<RouteTable>,
		slippage: Arc<SlippageTable>,
		paths: PathFinder,
		quotes: QuoteEngine,
		planner: PlanBuilder,
		guard: SecurityGuard,
		event_bus: EventBus,
		max_hops: usize,
	) -> Self {
		Self {
			assets,
			routes,
			slippage,
			paths,
			quotes,
			planner,
			guard,
			event_bus,
			max_hops,
		}
	}

	// ---- Read-only resolution ----

	pub fn has_route(&self, asset_in: Address, asset_out: Address) -> bool {
		self.paths.has_route(asset_in, asset_out, self.max_hops)
	}

	pub fn find_path(
		&self,
		asset_in: Address,
		asset_out: Address,
	) -> Result<ExecutionStrategy, RouterError> {
		self.paths.find_path(asset_in, asset_out, self.max_hops)
	}

	/// Resolution plus pause enforcement for every leg.
	fn resolve_usable(
		&self,
		asset_in: Address,
		asset_out: Address,
	) -> Result<ExecutionStrategy, RouterError> {
		let strategy = self.find_path(asset_in, asset_out)?;
		for hop in &strategy.hops {
			self.guard
				.ensure_route_usable(hop.config.venue(), hop.config.kind())?;
		}
		Ok(strategy)
	}

	// ---- Primary entry points ----

	/// Resolve, quote and encode in one step. Composite paths return the
	/// first leg's instruction plus a continuation descriptor.
	#[instrument(skip(self))]
	pub async fn quote_and_execution_data(
		&self,
		asset_in: Address,
		asset_out: Address,
		amount_in: U256,
		recipient: Address,
	) -> Result<QuoteAndExecution, RouterError> {
		if amount_in.is_zero() {
			return Err(RouterError::InvalidAmount);
		}
		let strategy = self.resolve_usable(asset_in, asset_out)?;
		let quote = self.quotes.quote_strategy(&strategy, amount_in).await?;

		let first = &strategy.hops[0];
		let step = self
			.planner
			.build_step(first, amount_in, quote.legs[0].min_amount_out, recipient)?;

		let continuation = if strategy.hops.len() > 1 {
			Some(self.planner.continuation(
				&strategy,
				quote.legs.iter().map(|leg| leg.min_amount_out).collect(),
				recipient,
				1,
			))
		} else {
			None
		};

		Ok(QuoteAndExecution {
			quoted_amount: quote.amount_out,
			min_amount_out: quote.min_amount_out,
			kind: first.config.kind(),
			step,
			continuation,
		})
	}

	/// Full ordered instruction list. Later legs are priced as if every
	/// prior leg realizes its quoted output; their minimums are provisional
	/// until replayed through the continuation calls.
	pub async fn complete_execution_plan(
		&self,
		asset_in: Address,
		asset_out: Address,
		amount_in: U256,
		recipient: Address,
	) -> Result<CompletePlan, RouterError> {
		if amount_in.is_zero() {
			return Err(RouterError::InvalidAmount);
		}
		let strategy = self.resolve_usable(asset_in, asset_out)?;
		let quote = self.quotes.quote_strategy(&strategy, amount_in).await?;

		let mut steps = Vec::with_capacity(strategy.hops.len());
		let mut current = amount_in;
		for (hop, leg) in strategy.hops.iter().zip(&quote.legs) {
			let step = self
				.planner
				.build_step(hop, current, leg.min_amount_out, recipient)?;
			current = leg.amount_out;
			steps.push(step);
		}

		let continuation = if strategy.hops.len() > 1 {
			Some(self.planner.continuation(
				&strategy,
				quote.legs.iter().map(|leg| leg.min_amount_out).collect(),
				recipient,
				1,
			))
		} else {
			None
		};

		Ok(CompletePlan {
			route_type: strategy.route_type,
			gas_estimate: strategy.gas_estimate,
			steps,
			expected_out: quote.amount_out,
			min_amount_out: quote.min_amount_out,
			continuation,
		})
	}

	/// The explicit multi-step variant of [`Self::complete_execution_plan`];
	/// rejects paths that resolved to fewer than two legs.
	pub async fn complete_multi_step_plan(
		&self,
		asset_in: Address,
		asset_out: Address,
		amount_in: U256,
		recipient: Address,
	) -> Result<CompletePlan, RouterError> {
		let plan = self
			.complete_execution_plan(asset_in, asset_out, amount_in, recipient)
			.await?;
		if plan.steps.len() < 2 {
			return Err(RouterError::UnsupportedRoute);
		}
		Ok(plan)
	}

	// ---- Continuations ----

	/// Refreshed second leg of a two-leg bridge, priced against the
	/// realized first-leg output.
	pub async fn bridge_second_leg_data(
		&self,
		plan: &ContinuationPlan,
		realized_amount: U256,
	) -> Result<(ExecutionStep, ContinuationPlan), RouterError> {
		if plan.legs.len() != 2 || plan.next_leg != 1 {
			return Err(RouterError::InvalidParameter(
				"not a bridge continuation on its second leg".into(),
			));
		}
		self.next_step_execution_data(plan, realized_amount).await
	}

	/// Re-derives the next leg's instruction from the realized output of
	/// the prior leg: fresh quote, fresh minimum, fresh deadline. Returns
	/// the advanced continuation alongside.
	pub async fn next_step_execution_data(
		&self,
		plan: &ContinuationPlan,
		realized_amount: U256,
	) -> Result<(ExecutionStep, ContinuationPlan), RouterError> {
		if realized_amount.is_zero() {
			return Err(RouterError::InvalidAmount);
		}
		if plan.is_complete() {
			return Err(RouterError::PlanExhausted);
		}

		let leg = plan.next_leg;
		let hop = ResolvedHop {
			asset_in: plan.assets[leg],
			asset_out: plan.assets[leg + 1],
			config: plan.legs[leg].clone(),
		};
		self.guard
			.ensure_route_usable(hop.config.venue(), hop.config.kind())?;

		let quote = self.quotes.quote_hop(&hop, realized_amount).await?;
		let step = self
			.planner
			.build_step(&hop, realized_amount, quote.min_amount_out, plan.recipient)?;

		let mut advanced = plan.clone();
		advanced.provisional_minimums[leg] = quote.min_amount_out;
		advanced.next_leg = leg + 1;

		Ok((step, advanced))
	}

	// ---- Read-only pre-flight checks ----

	/// Everything short of quoting: validation, resolution and pause
	/// checks. No mutation, no external reads.
	pub fn validate_swap_execution(
		&self,
		asset_in: Address,
		asset_out: Address,
		amount_in: U256,
	) -> Result<ExecutionStrategy, RouterError> {
		if amount_in.is_zero() {
			return Err(RouterError::InvalidAmount);
		}
		self.resolve_usable(asset_in, asset_out)
	}

	pub fn validate_route_configuration(
		&self,
		asset_in: Address,
		asset_out: Address,
		config: &RouteConfig,
	) -> Result<(), RouterError> {
		self.routes.validate_route(asset_in, asset_out, config)
	}

	/// Validated pass-through call for a registered external venue. The
	/// guard approves; it never executes.
	pub fn custom_dex_execution_data(
		&self,
		venue: Address,
		payload: &[u8],
	) -> Result<CustomCallApproval, RouterError> {
		self.guard.custom_call_approval(venue, payload)
	}

	// ---- Governance surface ----

	pub fn configure_route(
		&self,
		asset_in: Address,
		asset_out: Address,
		config: RouteConfig,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		let kind = config.kind();
		self.routes
			.configure_route(asset_in, asset_out, config, credentials)?;
		self.event_bus.publish(RouterEvent::RouteConfigured {
			asset_in,
			asset_out,
			kind,
		});
		Ok(())
	}

	pub fn clear_route(
		&self,
		asset_in: Address,
		asset_out: Address,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.routes.clear_route(asset_in, asset_out, credentials)?;
		self.event_bus
			.publish(RouterEvent::RouteCleared { asset_in, asset_out });
		Ok(())
	}

	pub fn register_asset(
		&self,
		info: AssetInfo,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.assets.register_asset(info, credentials)
	}

	pub fn set_slippage(
		&self,
		asset_in: Address,
		asset_out: Address,
		bps: u16,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.slippage.set(asset_in, asset_out, bps, credentials)?;
		self.event_bus.publish(RouterEvent::SlippageSet {
			asset_in,
			asset_out,
			bps,
		});
		Ok(())
	}

	pub fn set_global_pause(
		&self,
		paused: bool,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.guard.pause.set_global(paused, credentials)?;
		self.event_bus.publish(RouterEvent::PauseChanged {
			scope: PauseScope::Global,
			paused,
		});
		Ok(())
	}

	pub fn set_pool_pause(
		&self,
		pool: Address,
		paused: bool,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.guard.pools.set_paused(pool, paused, credentials)?;
		self.event_bus.publish(RouterEvent::PauseChanged {
			scope: PauseScope::Pool(pool),
			paused,
		});
		Ok(())
	}

	pub fn set_kind_pause(
		&self,
		kind: AdapterKind,
		paused: bool,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.guard.pause.set_kind(kind, paused, credentials)?;
		self.event_bus.publish(RouterEvent::PauseChanged {
			scope: PauseScope::Kind(kind),
			paused,
		});
		Ok(())
	}

	pub fn whitelist_pool(
		&self,
		pool: Address,
		token_count: u8,
		underlying: bool,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.guard.pools.add(pool, token_count, underlying, credentials)?;
		self.event_bus.publish(RouterEvent::PoolWhitelisted { pool });
		Ok(())
	}

	pub fn delist_pool(&self, pool: Address, credentials: &Credentials) -> Result<(), RouterError> {
		self.guard.pools.remove(pool, credentials)?;
		self.event_bus.publish(RouterEvent::PoolDelisted { pool });
		Ok(())
	}

	pub fn register_venue(
		&self,
		venue: Address,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		let registered_at = self.guard.venues.register(venue, credentials)?;
		self.event_bus.publish(RouterEvent::VenueRegistered {
			venue,
			registrant: credentials.holder.clone(),
			registered_at,
		});
		Ok(())
	}

	pub fn unregister_venue(
		&self,
		venue: Address,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.guard.venues.unregister(venue, credentials)?;
		self.event_bus.publish(RouterEvent::VenueUnregistered { venue });
		Ok(())
	}

	pub fn allow_selector(
		&self,
		selector: [u8; 4],
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.guard.selectors.allow(selector, credentials)?;
		self.event_bus.publish(RouterEvent::SelectorAllowed { selector });
		Ok(())
	}

	pub fn deny_selector(
		&self,
		selector: [u8; 4],
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.guard.selectors.deny(selector, credentials)?;
		self.event_bus.publish(RouterEvent::SelectorDenied { selector });
		Ok(())
	}

	// ---- Accessors ----

	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	pub fn guard(&self) -> &SecurityGuard {
		&self.guard
	}

	pub fn max_hops(&self) -> usize {
		self.max_hops
	}
}

impl std::fmt::Debug for RouterEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterEngine")
			.field("max_hops", &self.max_hops)
			.finish()
	}
}

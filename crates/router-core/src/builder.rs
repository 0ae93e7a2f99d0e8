//! Assembles a [`RouterEngine`] from configuration.

use std::sync::Arc;

use router_config::RouterConfig;
use router_guard::{PoolStatus, SecurityGuard};
use router_paths::PathFinder;
use router_plan::PlanBuilder;
use router_quote::{LiveQuoteSource, QuoteEngine, RpcQuoteSource};
use router_registry::{AssetRegistry, RouteTable, SecretHashPolicy, SlippageTable};
use router_types::{AuthorizationPolicy, RouterError};

use crate::engine::RouterEngine;
use crate::event_bus::EventBus;

const EVENT_BUS_CAPACITY: usize = 1_024;

pub struct RouterBuilder {
	config: RouterConfig,
	quote_source: Option<Arc<dyn LiveQuoteSource>>,
}

impl RouterBuilder {
	pub fn new(config: RouterConfig) -> Self {
		Self {
			config,
			quote_source: None,
		}
	}

	/// Overrides the JSON-RPC quote source, e.g. for an alternative
	/// transport.
	pub fn with_quote_source(mut self, source: Arc<dyn LiveQuoteSource>) -> Self {
		self.quote_source = Some(source);
		self
	}

	pub fn build(self) -> Result<RouterEngine, RouterError> {
		let config = self.config;

		// Authorization policy from the committed secret hash and grants.
		let committed: [u8; 32] = hex::decode(
			config.governance.admin_secret_hash.trim_start_matches("0x"),
		)
		.map_err(|e| RouterError::InvalidParameter(format!("admin secret hash: {}", e)))?
		.try_into()
		.map_err(|_| RouterError::InvalidParameter("admin secret hash must be 32 bytes".into()))?;

		let mut policy = SecretHashPolicy::new(committed);
		for grant in &config.governance.grants {
			policy = policy.with_grant(grant.holder.as_str(), &grant.capabilities);
		}
		let policy: Arc<dyn AuthorizationPolicy> = Arc::new(policy);

		// Registries, seeded before anything is exposed.
		let assets = Arc::new(AssetRegistry::new(policy.clone()));
		assets.seed(
			config.assets.clone(),
			config.categories.clone().into_iter().collect(),
		);

		let routes = Arc::new(RouteTable::new(assets.clone(), policy.clone()));
		routes.seed(
			config
				.routes
				.iter()
				.map(|entry| (entry.asset_in, entry.asset_out, entry.config.clone())),
		)?;

		let slippage = Arc::new(SlippageTable::new(
			config.engine.max_slippage_bps,
			policy.clone(),
		));
		slippage.seed(
			config
				.slippage
				.iter()
				.map(|entry| ((entry.asset_in, entry.asset_out), entry.bps)),
		);

		let guard = SecurityGuard::new(config.governance.cooling_off_secs, policy.clone());
		guard.pools.seed(config.pools.iter().map(|entry| {
			(
				entry.address,
				PoolStatus {
					paused: false,
					token_count: entry.token_count,
					underlying: entry.underlying,
				},
			)
		}));

		let source = match self.quote_source {
			Some(source) => source,
			None => Arc::new(
				RpcQuoteSource::new(
					config.quotes.rpc_url.clone(),
					config.quotes.quoter_address,
					config.quotes.timeout_ms,
				)
				.map_err(|e| RouterError::InvalidParameter(e.to_string()))?,
			),
		};

		let paths = PathFinder::new(assets.clone(), routes.clone());
		let quotes = QuoteEngine::new(
			assets.clone(),
			slippage.clone(),
			source,
			config.engine.default_live_slippage_bps,
		);
		let planner = PlanBuilder::new(
			config.execution.swap_router,
			config.engine.deadline_window_secs,
		);

		Ok(RouterEngine::new(
			assets,
			routes,
			slippage,
			paths,
			quotes,
			planner,
			guard,
			EventBus::new(EVENT_BUS_CAPACITY),
			config.engine.max_hops,
		))
	}
}

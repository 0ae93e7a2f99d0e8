//! Bounded, category-constrained path discovery.
//!
//! The search is list-driven rather than graph-driven: after the direct
//! lookup, candidates come exclusively from the per-category ranked bridge
//! lists, first for one intermediate, then for two. This trades optimality
//! for deterministic, bounded cost; a cheaper or longer valid path outside
//! the candidate lists will not be found.

use std::sync::Arc;

use alloy_primitives::Address;
use tracing::debug;

use router_registry::{AssetRegistry, RouteTable};
use router_types::{
	ExecutionStrategy, ResolvedHop, RouteConfig, RouteType, RouterError,
};

pub struct PathFinder {
	assets: Arc<AssetRegistry>,
	routes: Arc<RouteTable>,
}

impl PathFinder {
	pub fn new(assets: Arc<AssetRegistry>, routes: Arc<RouteTable>) -> Self {
		Self { assets, routes }
	}

	/// Resolves a conversion path of at most `max_hops` legs.
	pub fn find_path(
		&self,
		asset_in: Address,
		asset_out: Address,
		max_hops: usize,
	) -> Result<ExecutionStrategy, RouterError> {
		if asset_in == asset_out {
			return Err(RouterError::SameAsset);
		}
		let info_in = self.assets.require_supported(asset_in)?;
		let info_out = self.assets.require_supported(asset_out)?;
		if !self.assets.compatible(&info_in, &info_out) {
			return Err(RouterError::IncompatibleCategories(asset_in, asset_out));
		}

		// Direct route, either direction.
		if let Some((config, _reversed)) = self.routes.lookup(asset_in, asset_out) {
			return Ok(self.direct_strategy(asset_in, asset_out, config));
		}

		let candidates = self.candidate_bridges(&info_in, &info_out, asset_in, asset_out);

		// One intermediate: first ranked candidate with both legs wins.
		if max_hops >= 2 {
			for bridge in &candidates {
				let Some(first) = self.leg(asset_in, *bridge) else {
					continue;
				};
				let Some(second) = self.leg(*bridge, asset_out) else {
					continue;
				};
				debug!(bridge = %bridge, "bridge path resolved");
				return Ok(strategy(
					RouteType::Bridge,
					vec![
						hop(asset_in, *bridge, first),
						hop(*bridge, asset_out, second),
					],
				));
			}
		}

		// Two distinct intermediates: first full chain wins.
		if max_hops >= 3 {
			for first_bridge in &candidates {
				for second_bridge in &candidates {
					if first_bridge == second_bridge {
						continue;
					}
					let Some(first) = self.leg(asset_in, *first_bridge) else {
						continue;
					};
					let Some(middle) = self.leg(*first_bridge, *second_bridge) else {
						continue;
					};
					let Some(last) = self.leg(*second_bridge, asset_out) else {
						continue;
					};
					debug!(
						first = %first_bridge,
						second = %second_bridge,
						"two-intermediate path resolved"
					);
					return Ok(strategy(
						RouteType::MultiStep,
						vec![
							hop(asset_in, *first_bridge, first),
							hop(*first_bridge, *second_bridge, middle),
							hop(*second_bridge, asset_out, last),
						],
					));
				}
			}
		}

		Err(RouterError::NoRouteFound(asset_in, asset_out))
	}

	pub fn has_route(&self, asset_in: Address, asset_out: Address, max_hops: usize) -> bool {
		self.find_path(asset_in, asset_out, max_hops).is_ok()
	}

	/// A directly configured route; explicit step lists expand into their
	/// legs, everything else is a single hop.
	fn direct_strategy(
		&self,
		asset_in: Address,
		asset_out: Address,
		config: RouteConfig,
	) -> ExecutionStrategy {
		match config {
			RouteConfig::MultiStepPath { steps } => {
				let mut hops = Vec::with_capacity(steps.len());
				let mut current = asset_in;
				for step in steps {
					hops.push(hop(current, step.asset_out, step.config));
					current = step.asset_out;
				}
				strategy(RouteType::MultiStep, hops)
			}
			config => strategy(RouteType::Direct, vec![hop(asset_in, asset_out, config)]),
		}
	}

	/// Ranked candidates from both endpoint categories, endpoints excluded.
	fn candidate_bridges(
		&self,
		info_in: &router_types::AssetInfo,
		info_out: &router_types::AssetInfo,
		asset_in: Address,
		asset_out: Address,
	) -> Vec<Address> {
		let mut candidates = self.assets.bridges(info_in.category);
		if info_out.category != info_in.category {
			for bridge in self.assets.bridges(info_out.category) {
				if !candidates.contains(&bridge) {
					candidates.push(bridge);
				}
			}
		}
		candidates.retain(|c| *c != asset_in && *c != asset_out);
		candidates
	}

	/// A usable bridge leg: configured either direction, but never an
	/// explicit step list (composites do not nest).
	fn leg(&self, asset_in: Address, asset_out: Address) -> Option<RouteConfig> {
		match self.routes.lookup(asset_in, asset_out) {
			Some((RouteConfig::MultiStepPath { .. }, _)) => None,
			Some((config, _)) => Some(config),
			None => None,
		}
	}
}

fn hop(asset_in: Address, asset_out: Address, config: RouteConfig) -> ResolvedHop {
	ResolvedHop {
		asset_in,
		asset_out,
		config,
	}
}

fn strategy(route_type: RouteType, hops: Vec<ResolvedHop>) -> ExecutionStrategy {
	let gas_estimate = hops.iter().map(|h| h.config.kind().gas_estimate()).sum();
	ExecutionStrategy {
		route_type,
		hops,
		gas_estimate,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use router_registry::{hash_secret, SecretHashPolicy};
	use router_types::{
		AssetCategory, AssetInfo, AuthorizationPolicy, Capability, CategoryPolicy, Credentials,
	};

	fn addr(n: u8) -> Address {
		Address::repeat_byte(n)
	}

	fn creds() -> Credentials {
		Credentials {
			holder: "ops".into(),
			secret: "s".into(),
		}
	}

	fn cl(pool: u8) -> RouteConfig {
		RouteConfig::ConcentratedLiquidity {
			pool: addr(pool),
			fee: 3000,
		}
	}

	/// Three BTC-wrapped assets (1, 2, hub 3) plus a stable asset 4.
	fn setup() -> (Arc<AssetRegistry>, Arc<RouteTable>, PathFinder) {
		let policy: Arc<dyn AuthorizationPolicy> = Arc::new(
			SecretHashPolicy::new(hash_secret("s")).with_grant("ops", &[Capability::RouteManager]),
		);
		let assets = Arc::new(AssetRegistry::new(policy.clone()));
		let mut infos: Vec<AssetInfo> = (1..=3)
			.map(|n| AssetInfo {
				address: addr(n),
				category: AssetCategory::BtcWrapped,
				decimals: 8,
				supported: true,
			})
			.collect();
		infos.push(AssetInfo {
			address: addr(4),
			category: AssetCategory::Stable,
			decimals: 6,
			supported: true,
		});
		infos.push(AssetInfo {
			address: addr(5),
			category: AssetCategory::BtcWrapped,
			decimals: 8,
			supported: true,
		});
		assets.seed(
			infos,
			vec![(
				AssetCategory::BtcWrapped,
				CategoryPolicy {
					counterpart: None,
					bridges: vec![addr(3), addr(5)],
				},
			)],
		);
		let routes = Arc::new(RouteTable::new(assets.clone(), policy));
		let finder = PathFinder::new(assets.clone(), routes.clone());
		(assets, routes, finder)
	}

	#[test]
	fn test_direct_route_wins() {
		let (_assets, routes, finder) = setup();
		routes.configure_route(addr(1), addr(2), cl(10), &creds()).unwrap();

		let strategy = finder.find_path(addr(1), addr(2), 3).unwrap();
		assert_eq!(strategy.route_type, RouteType::Direct);
		assert_eq!(strategy.hops.len(), 1);
	}

	#[test]
	fn test_two_hop_through_hub() {
		// Neither endpoint is the hub; both endpoints route to/from it and
		// no direct route exists.
		let (_assets, routes, finder) = setup();
		routes.configure_route(addr(1), addr(3), cl(10), &creds()).unwrap();
		routes.configure_route(addr(3), addr(2), cl(11), &creds()).unwrap();

		let strategy = finder.find_path(addr(1), addr(2), 3).unwrap();
		assert_eq!(strategy.route_type, RouteType::Bridge);
		assert_eq!(strategy.hops.len(), 2);
		assert_eq!(strategy.hops[0].asset_out, addr(3));
		assert_eq!(strategy.hops[1].asset_in, addr(3));
		for hop in &strategy.hops {
			assert!(hop.config.kind().is_primitive());
		}
	}

	#[test]
	fn test_two_hop_uses_reversed_legs() {
		let (_assets, routes, finder) = setup();
		// Both legs configured in the opposite direction only.
		routes.configure_route(addr(3), addr(1), cl(10), &creds()).unwrap();
		routes.configure_route(addr(2), addr(3), cl(11), &creds()).unwrap();

		let strategy = finder.find_path(addr(1), addr(2), 2).unwrap();
		assert_eq!(strategy.route_type, RouteType::Bridge);
	}

	#[test]
	fn test_three_hop_two_intermediates() {
		let (_assets, routes, finder) = setup();
		routes.configure_route(addr(1), addr(3), cl(10), &creds()).unwrap();
		routes.configure_route(addr(3), addr(5), cl(11), &creds()).unwrap();
		routes.configure_route(addr(5), addr(2), cl(12), &creds()).unwrap();

		let strategy = finder.find_path(addr(1), addr(2), 3).unwrap();
		assert_eq!(strategy.route_type, RouteType::MultiStep);
		assert_eq!(strategy.hops.len(), 3);

		// The same request under a two-hop budget finds nothing.
		assert!(matches!(
			finder.find_path(addr(1), addr(2), 2),
			Err(RouterError::NoRouteFound(_, _))
		));
	}

	#[test]
	fn test_cross_category_rejected() {
		let (_assets, routes, finder) = setup();
		routes.configure_route(addr(1), addr(3), cl(10), &creds()).unwrap();

		assert!(matches!(
			finder.find_path(addr(1), addr(4), 3),
			Err(RouterError::IncompatibleCategories(_, _))
		));
	}

	#[test]
	fn test_same_asset_rejected() {
		let (_assets, _routes, finder) = setup();
		assert!(matches!(
			finder.find_path(addr(1), addr(1), 3),
			Err(RouterError::SameAsset)
		));
	}

	#[test]
	fn test_no_route_found() {
		let (_assets, _routes, finder) = setup();
		assert!(matches!(
			finder.find_path(addr(1), addr(2), 3),
			Err(RouterError::NoRouteFound(_, _))
		));
		assert!(!finder.has_route(addr(1), addr(2), 3));
	}
}

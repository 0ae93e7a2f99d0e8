//! Route table: one venue adapter per ordered asset pair.

use std::sync::Arc;

use alloy_primitives::Address;
use dashmap::DashMap;
use tracing::info;

use router_types::{
	decode_path, AuthorizationPolicy, Capability, Credentials, RouteConfig, RouterError,
	MAX_HOPS,
};

use crate::assets::AssetRegistry;

/// Per ordered-pair route configuration, mutated only through the
/// secret-gated administrative operations.
pub struct RouteTable {
	routes: DashMap<(Address, Address), RouteConfig>,
	assets: Arc<AssetRegistry>,
	policy: Arc<dyn AuthorizationPolicy>,
}

impl RouteTable {
	pub fn new(assets: Arc<AssetRegistry>, policy: Arc<dyn AuthorizationPolicy>) -> Self {
		Self {
			routes: DashMap::new(),
			assets,
			policy,
		}
	}

	/// Seeds routes from configuration before the engine is exposed.
	/// Structural validation still applies; only the credential gate is
	/// skipped.
	pub fn seed(
		&self,
		entries: impl IntoIterator<Item = (Address, Address, RouteConfig)>,
	) -> Result<(), RouterError> {
		for (asset_in, asset_out, config) in entries {
			self.validate_route(asset_in, asset_out, &config)?;
			self.routes.insert((asset_in, asset_out), config);
		}
		Ok(())
	}

	/// Configures (or overwrites) the route for an ordered pair.
	pub fn configure_route(
		&self,
		asset_in: Address,
		asset_out: Address,
		config: RouteConfig,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.policy
			.authorize(Capability::RouteManager, credentials)?;
		self.validate_route(asset_in, asset_out, &config)?;

		info!(
			asset_in = %asset_in,
			asset_out = %asset_out,
			kind = ?config.kind(),
			"route configured"
		);
		self.routes.insert((asset_in, asset_out), config);
		Ok(())
	}

	pub fn clear_route(
		&self,
		asset_in: Address,
		asset_out: Address,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.policy
			.authorize(Capability::RouteManager, credentials)?;
		self.routes.remove(&(asset_in, asset_out));
		info!(asset_in = %asset_in, asset_out = %asset_out, "route cleared");
		Ok(())
	}

	/// Returns the route for the pair, deriving reversed parameters when
	/// only the opposite direction is configured. The flag reports whether
	/// reversal was applied.
	pub fn lookup(&self, asset_in: Address, asset_out: Address) -> Option<(RouteConfig, bool)> {
		if let Some(config) = self.routes.get(&(asset_in, asset_out)) {
			return Some((config.clone(), false));
		}
		self.routes
			.get(&(asset_out, asset_in))
			.and_then(|config| config.reversed())
			.map(|config| (config, true))
	}

	pub fn has_route(&self, asset_in: Address, asset_out: Address) -> bool {
		self.lookup(asset_in, asset_out).is_some()
	}

	/// Structural validation shared with the read-only pre-flight check.
	pub fn validate_route(
		&self,
		asset_in: Address,
		asset_out: Address,
		config: &RouteConfig,
	) -> Result<(), RouterError> {
		if asset_in == Address::ZERO || asset_out == Address::ZERO {
			return Err(RouterError::InvalidParameter("zero asset address".into()));
		}
		if asset_in == asset_out {
			return Err(RouterError::InvalidParameter(
				"route endpoints must differ".into(),
			));
		}
		let info_in = self.assets.require_supported(asset_in)?;
		let info_out = self.assets.require_supported(asset_out)?;
		if !self.assets.compatible(&info_in, &info_out) {
			return Err(RouterError::IncompatibleCategories(asset_in, asset_out));
		}

		match config {
			RouteConfig::ConcentratedLiquidity { pool, .. }
			| RouteConfig::ConstantFunction { pool, .. } => {
				if *pool == Address::ZERO {
					return Err(RouterError::InvalidParameter("zero pool address".into()));
				}
			}
			RouteConfig::DirectIssuance { venue } => {
				if *venue == Address::ZERO {
					return Err(RouterError::InvalidParameter("zero venue address".into()));
				}
			}
			RouteConfig::MultiHopPath { path } => {
				let (tokens, _fees) = decode_path(path)?;
				if tokens.first() != Some(&asset_in) || tokens.last() != Some(&asset_out) {
					return Err(RouterError::InvalidParameter(
						"path endpoints do not match the pair".into(),
					));
				}
				self.validate_chain(&tokens)?;
			}
			RouteConfig::MultiStepPath { steps } => {
				if steps.is_empty() || steps.len() > MAX_HOPS {
					return Err(RouterError::InvalidParameter(format!(
						"step list must have 1..={} legs",
						MAX_HOPS
					)));
				}
				if steps.iter().any(|s| !s.config.kind().is_primitive()) {
					return Err(RouterError::InvalidParameter(
						"composite steps must use primitive adapters".into(),
					));
				}
				if steps.last().map(|s| s.asset_out) != Some(asset_out) {
					return Err(RouterError::InvalidParameter(
						"final step must produce the output asset".into(),
					));
				}
				let mut chain = vec![asset_in];
				chain.extend(steps.iter().map(|s| s.asset_out));
				self.validate_chain(&chain)?;
			}
		}
		Ok(())
	}

	/// Every adjacent pair in a composite chain must be supported and
	/// category-compatible.
	fn validate_chain(&self, chain: &[Address]) -> Result<(), RouterError> {
		for window in chain.windows(2) {
			let a = self.assets.require_supported(window[0])?;
			let b = self.assets.require_supported(window[1])?;
			if !self.assets.compatible(&a, &b) {
				return Err(RouterError::IncompatibleCategories(a.address, b.address));
			}
		}
		Ok(())
	}
}

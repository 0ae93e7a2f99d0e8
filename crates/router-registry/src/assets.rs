//! Asset registry: classification, precision and category policy.

use std::sync::Arc;

use alloy_primitives::Address;
use dashmap::DashMap;
use tracing::info;

use router_types::{
	AssetCategory, AssetInfo, AuthorizationPolicy, Capability, CategoryPolicy, Credentials,
	RouterError,
};

/// Static classification of every tradable asset, plus per-category
/// routing policy (counterpart asset and ranked bridge list).
pub struct AssetRegistry {
	assets: DashMap<Address, AssetInfo>,
	categories: DashMap<AssetCategory, CategoryPolicy>,
	policy: Arc<dyn AuthorizationPolicy>,
}

impl AssetRegistry {
	pub fn new(policy: Arc<dyn AuthorizationPolicy>) -> Self {
		Self {
			assets: DashMap::new(),
			categories: DashMap::new(),
			policy,
		}
	}

	/// Seeds the registry from configuration; not credential-gated because
	/// it runs before the engine is exposed to callers.
	pub fn seed(&self, assets: Vec<AssetInfo>, categories: Vec<(AssetCategory, CategoryPolicy)>) {
		for asset in assets {
			self.assets.insert(asset.address, asset);
		}
		for (category, policy) in categories {
			self.categories.insert(category, policy);
		}
	}

	pub fn register_asset(
		&self,
		info: AssetInfo,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.policy
			.authorize(Capability::RouteManager, credentials)?;
		if info.address == Address::ZERO {
			return Err(RouterError::InvalidParameter("zero asset address".into()));
		}
		if info.supported && info.decimals == 0 {
			return Err(RouterError::InvalidParameter(
				"supported asset needs non-zero decimals".into(),
			));
		}
		info!(asset = %info.address, category = ?info.category, "asset registered");
		self.assets.insert(info.address, info);
		Ok(())
	}

	pub fn get(&self, address: Address) -> Option<AssetInfo> {
		self.assets.get(&address).map(|entry| entry.clone())
	}

	/// Looks the asset up and insists it is routable.
	pub fn require_supported(&self, address: Address) -> Result<AssetInfo, RouterError> {
		match self.get(address) {
			Some(info) if info.supported && info.decimals > 0 => Ok(info),
			_ => Err(RouterError::UnsupportedAsset(address)),
		}
	}

	pub fn counterpart(&self, category: AssetCategory) -> Option<Address> {
		self.categories.get(&category).and_then(|p| p.counterpart)
	}

	pub fn bridges(&self, category: AssetCategory) -> Vec<Address> {
		self.categories
			.get(&category)
			.map(|p| p.bridges.clone())
			.unwrap_or_default()
	}

	/// Category compatibility: same category, or one side is the other
	/// category's native/wrapped counterpart.
	pub fn compatible(&self, a: &AssetInfo, b: &AssetInfo) -> bool {
		if a.category == b.category {
			return true;
		}
		self.counterpart(b.category) == Some(a.address)
			|| self.counterpart(a.category) == Some(b.address)
	}
}

//! Pool whitelist with per-pool pause flags.

use std::sync::Arc;

use alloy_primitives::Address;
use dashmap::DashMap;
use tracing::info;

use router_types::{AuthorizationPolicy, Capability, Credentials, RouterError};

/// Whitelist entry for a known pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStatus {
	pub paused: bool,
	pub token_count: u8,
	/// Pool exposes the underlying-asset exchange variant.
	pub underlying: bool,
}

pub struct PoolWhitelist {
	entries: DashMap<Address, PoolStatus>,
	policy: Arc<dyn AuthorizationPolicy>,
}

impl PoolWhitelist {
	pub fn new(policy: Arc<dyn AuthorizationPolicy>) -> Self {
		Self {
			entries: DashMap::new(),
			policy,
		}
	}

	/// Seeds entries from configuration before the engine is exposed.
	pub fn seed(&self, entries: impl IntoIterator<Item = (Address, PoolStatus)>) {
		for (pool, status) in entries {
			self.entries.insert(pool, status);
		}
	}

	pub fn add(
		&self,
		pool: Address,
		token_count: u8,
		underlying: bool,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.policy.authorize(Capability::Guardian, credentials)?;
		if pool == Address::ZERO {
			return Err(RouterError::InvalidParameter("zero pool address".into()));
		}
		self.entries.insert(
			pool,
			PoolStatus {
				paused: false,
				token_count,
				underlying,
			},
		);
		info!(pool = %pool, "pool whitelisted");
		Ok(())
	}

	pub fn remove(&self, pool: Address, credentials: &Credentials) -> Result<(), RouterError> {
		self.policy.authorize(Capability::Guardian, credentials)?;
		self.entries.remove(&pool);
		info!(pool = %pool, "pool delisted");
		Ok(())
	}

	pub fn set_paused(
		&self,
		pool: Address,
		paused: bool,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.policy.authorize(Capability::Guardian, credentials)?;
		match self.entries.get_mut(&pool) {
			Some(mut entry) => {
				entry.paused = paused;
				info!(pool = %pool, paused, "pool pause changed");
				Ok(())
			}
			None => Err(RouterError::InvalidParameter(format!(
				"pool {} is not whitelisted",
				pool
			))),
		}
	}

	pub fn status(&self, pool: Address) -> Option<PoolStatus> {
		self.entries.get(&pool).map(|entry| entry.clone())
	}

	pub fn is_paused(&self, pool: Address) -> bool {
		self.entries
			.get(&pool)
			.map(|entry| entry.paused)
			.unwrap_or(false)
	}
}

//! Pre-vetted slippage tolerances, keyed by ordered pair.
//!
//! Absence of an entry means the pair has not been vetted; fallback
//! quoting must refuse rather than guess.

use std::sync::Arc;

use alloy_primitives::Address;
use dashmap::DashMap;
use tracing::info;

use router_types::{AuthorizationPolicy, Capability, Credentials, RouterError};

pub struct SlippageTable {
	tolerances: DashMap<(Address, Address), u16>,
	max_bps: u16,
	policy: Arc<dyn AuthorizationPolicy>,
}

impl SlippageTable {
	pub fn new(max_bps: u16, policy: Arc<dyn AuthorizationPolicy>) -> Self {
		Self {
			tolerances: DashMap::new(),
			max_bps,
			policy,
		}
	}

	/// Seeds tolerances from configuration before the engine is exposed.
	pub fn seed(&self, entries: impl IntoIterator<Item = ((Address, Address), u16)>) {
		for (pair, bps) in entries {
			self.tolerances.insert(pair, bps.min(self.max_bps));
		}
	}

	pub fn set(
		&self,
		asset_in: Address,
		asset_out: Address,
		bps: u16,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.policy
			.authorize(Capability::RouteManager, credentials)?;
		if bps > self.max_bps {
			return Err(RouterError::InvalidParameter(format!(
				"{} bps exceeds max of {}",
				bps, self.max_bps
			)));
		}
		info!(asset_in = %asset_in, asset_out = %asset_out, bps, "slippage tolerance set");
		self.tolerances.insert((asset_in, asset_out), bps);
		Ok(())
	}

	pub fn get(&self, asset_in: Address, asset_out: Address) -> Option<u16> {
		self.tolerances
			.get(&(asset_in, asset_out))
			.map(|entry| *entry)
	}

	pub fn max_bps(&self) -> u16 {
		self.max_bps
	}
}

//! External venue registration with a mandatory cooling-off period.
//!
//! A freshly registered venue is inert: it cannot appear in any generated
//! instruction, and it cannot be unregistered either, until the cooling-off
//! period has elapsed since registration. The symmetric removal delay keeps
//! a compromised registrant from silently swapping venues in and out.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::Address;
use dashmap::DashMap;
use tracing::info;

use router_types::{AuthorizationPolicy, Capability, Credentials, RouterError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueRegistration {
	pub registered_at: u64,
	pub registrant: String,
}

pub struct VenueRegistry {
	venues: DashMap<Address, VenueRegistration>,
	cooling_off_secs: u64,
	policy: Arc<dyn AuthorizationPolicy>,
}

impl VenueRegistry {
	pub fn new(cooling_off_secs: u64, policy: Arc<dyn AuthorizationPolicy>) -> Self {
		Self {
			venues: DashMap::new(),
			cooling_off_secs,
			policy,
		}
	}

	pub fn register(&self, venue: Address, credentials: &Credentials) -> Result<u64, RouterError> {
		self.policy
			.authorize(Capability::VenueManager, credentials)?;
		if venue == Address::ZERO {
			return Err(RouterError::InvalidParameter("zero venue address".into()));
		}
		if self.venues.contains_key(&venue) {
			// Re-registration would reset the cooling-off timer.
			return Err(RouterError::InvalidParameter(format!(
				"venue {} is already registered",
				venue
			)));
		}
		let registered_at = unix_now();
		self.venues.insert(
			venue,
			VenueRegistration {
				registered_at,
				registrant: credentials.holder.clone(),
			},
		);
		info!(venue = %venue, registrant = %credentials.holder, "venue registered");
		Ok(registered_at)
	}

	pub fn unregister(&self, venue: Address, credentials: &Credentials) -> Result<(), RouterError> {
		self.policy
			.authorize(Capability::VenueManager, credentials)?;
		self.ensure_usable(venue)?;
		self.venues.remove(&venue);
		info!(venue = %venue, "venue unregistered");
		Ok(())
	}

	/// Registered and past the cooling-off period.
	pub fn ensure_usable(&self, venue: Address) -> Result<(), RouterError> {
		let registration = self
			.venues
			.get(&venue)
			.ok_or(RouterError::VenueNotRegistered(venue))?;
		if unix_now() < registration.registered_at + self.cooling_off_secs {
			return Err(RouterError::VenueCoolingOff(venue));
		}
		Ok(())
	}

	pub fn registration(&self, venue: Address) -> Option<VenueRegistration> {
		self.venues.get(&venue).map(|entry| entry.clone())
	}
}

fn unix_now() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs()
}

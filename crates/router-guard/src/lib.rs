//! Governance and security guard.
//!
//! Capability-gated pausing (global, per-pool, per-adapter-kind), external
//! venue registration behind a cooling-off period, and call-selector
//! allow/deny lists guarding pass-through calls to registered venues. The
//! guard validates; it never executes anything.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use router_types::{AdapterKind, AuthorizationPolicy, RouterError};

pub mod pause;
pub mod pools;
pub mod selectors;
pub mod venues;

pub use pause::PauseController;
pub use pools::{PoolStatus, PoolWhitelist};
pub use selectors::{selector_of, SelectorPolicy};
pub use venues::{VenueRegistration, VenueRegistry};

/// Validated pass-through call for a registered external venue.
///
/// Approval only: the caller (the Executor) performs the call itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCallApproval {
	pub target: Address,
	pub payload: Bytes,
	pub selector: [u8; 4],
}

pub struct SecurityGuard {
	pub pause: PauseController,
	pub pools: PoolWhitelist,
	pub venues: VenueRegistry,
	pub selectors: SelectorPolicy,
}

impl SecurityGuard {
	pub fn new(cooling_off_secs: u64, policy: Arc<dyn AuthorizationPolicy>) -> Self {
		Self {
			pause: PauseController::new(policy.clone()),
			pools: PoolWhitelist::new(policy.clone()),
			venues: VenueRegistry::new(cooling_off_secs, policy.clone()),
			selectors: SelectorPolicy::new(policy),
		}
	}

	/// Gate every instruction-producing operation: global pause first, then
	/// the resolved venue's pause flag, then the adapter kind's.
	pub fn ensure_route_usable(
		&self,
		venue: Option<Address>,
		kind: AdapterKind,
	) -> Result<(), RouterError> {
		if self.pause.is_global_paused() {
			return Err(RouterError::EnginePaused);
		}
		if let Some(venue) = venue {
			if self.pools.is_paused(venue) {
				return Err(RouterError::PoolPaused(venue));
			}
		}
		if self.pause.is_kind_paused(kind) {
			return Err(RouterError::AdapterKindPaused);
		}
		Ok(())
	}

	/// Validates a caller-proposed call against a registered venue: the
	/// venue must be registered and past cooling-off, the selector allowed
	/// and not denied, and the payload at least a selector long.
	pub fn custom_call_approval(
		&self,
		venue: Address,
		payload: &[u8],
	) -> Result<CustomCallApproval, RouterError> {
		self.venues.ensure_usable(venue)?;
		let selector = self.selectors.check(payload)?;
		Ok(CustomCallApproval {
			target: venue,
			payload: payload.to_vec().into(),
			selector,
		})
	}
}

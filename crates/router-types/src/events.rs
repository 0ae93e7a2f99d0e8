//! Events published on the router's event bus.
//!
//! Every governance mutation publishes exactly one event after the state
//! change has been applied.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::routes::AdapterKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouterEvent {
	RouteConfigured {
		asset_in: Address,
		asset_out: Address,
		kind: AdapterKind,
	},
	RouteCleared {
		asset_in: Address,
		asset_out: Address,
	},
	SlippageSet {
		asset_in: Address,
		asset_out: Address,
		bps: u16,
	},
	PauseChanged {
		scope: PauseScope,
		paused: bool,
	},
	PoolWhitelisted {
		pool: Address,
	},
	PoolDelisted {
		pool: Address,
	},
	VenueRegistered {
		venue: Address,
		registrant: String,
		registered_at: u64,
	},
	VenueUnregistered {
		venue: Address,
	},
	SelectorAllowed {
		selector: [u8; 4],
	},
	SelectorDenied {
		selector: [u8; 4],
	},
}

/// What a pause operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseScope {
	Global,
	Pool(Address),
	Kind(AdapterKind),
}

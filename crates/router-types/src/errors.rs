//! Error types for the router system.
//!
//! Every failure aborts the current request; no partial effects are ever
//! applied. Variants are grouped by the failure class they report: input
//! validation, route resolution, quoting, authorization and pausing.

use alloy_primitives::Address;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Error, Debug)]
pub enum RouterError {
	// Input validation; never retried.
	#[error("Amount must be non-zero")]
	InvalidAmount,

	#[error("Cannot swap an asset for itself")]
	SameAsset,

	#[error("Asset {0} is not supported")]
	UnsupportedAsset(Address),

	#[error("Assets {0} and {1} belong to incompatible categories")]
	IncompatibleCategories(Address, Address),

	#[error("Invalid parameter: {0}")]
	InvalidParameter(String),

	// Route resolution.
	#[error("No route found from {0} to {1}")]
	NoRouteFound(Address, Address),

	#[error("No encoding rule for this route")]
	UnsupportedRoute,

	// Quoting; raised only when the fallback itself cannot proceed.
	#[error("No vetted slippage tolerance configured for ({0}, {1})")]
	NoConfiguredSlippage(Address, Address),

	// Authorization and the security guard.
	#[error("Unauthorized: {0}")]
	Unauthorized(String),

	#[error("Venue {0} is not registered")]
	VenueNotRegistered(Address),

	#[error("Venue {0} is still in its cooling-off period")]
	VenueCoolingOff(Address),

	#[error("Selector {0:#010x} is denied")]
	SelectorDenied(u32),

	#[error("Selector {0:#010x} is not on the allow list")]
	SelectorNotAllowed(u32),

	#[error("Call payload shorter than a selector")]
	PayloadTooShort,

	// Pausing.
	#[error("Routing is globally paused")]
	EnginePaused,

	#[error("Pool {0} is paused")]
	PoolPaused(Address),

	#[error("Adapter kind is paused")]
	AdapterKindPaused,

	// Continuations.
	#[error("Continuation has no remaining legs")]
	PlanExhausted,
}

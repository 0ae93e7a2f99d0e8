//! Authorization primitives for the governance surface.
//!
//! Mutating operations present [`Credentials`] which an injectable
//! [`AuthorizationPolicy`] checks against the capability the operation
//! requires. The concrete policy lives with the registry; everything else
//! only sees the trait.

use serde::{Deserialize, Serialize};

use crate::errors::RouterError;

/// Capability a governance operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
	/// Configure and clear routes, set slippage tolerances.
	RouteManager,
	/// Pause and unpause; manage the pool whitelist.
	Guardian,
	/// Register and unregister external venues; manage selector lists.
	VenueManager,
}

/// Credentials presented by a caller of a governance operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
	/// Identity the caller claims; capabilities are granted per holder.
	pub holder: String,
	/// Shared secret; authenticated against a pre-committed hash.
	pub secret: String,
}

/// Policy deciding whether credentials satisfy a required capability.
pub trait AuthorizationPolicy: Send + Sync {
	fn authorize(&self, required: Capability, credentials: &Credentials)
		-> Result<(), RouterError>;
}

//! Call-selector allow and deny lists.
//!
//! Deny always wins. A fixed set of high-risk selectors is seeded into the
//! deny list on first use of the mechanism, so even an empty configuration
//! can never forward ownership transfers, upgrades, self-destruction or
//! re-initialization.

use std::sync::{Arc, Once};

use dashmap::DashSet;
use sha3::{Digest, Keccak256};
use tracing::info;

use router_types::{AuthorizationPolicy, Capability, Credentials, RouterError};

/// Signatures whose selectors are never forwarded.
const HIGH_RISK_SIGNATURES: [&str; 5] = [
	"transferOwnership(address)",
	"upgradeTo(address)",
	"upgradeToAndCall(address,bytes)",
	"destroy()",
	"initialize()",
];

pub struct SelectorPolicy {
	allow: DashSet<[u8; 4]>,
	deny: DashSet<[u8; 4]>,
	seed: Once,
	policy: Arc<dyn AuthorizationPolicy>,
}

impl SelectorPolicy {
	pub fn new(policy: Arc<dyn AuthorizationPolicy>) -> Self {
		Self {
			allow: DashSet::new(),
			deny: DashSet::new(),
			seed: Once::new(),
			policy,
		}
	}

	pub fn allow(&self, selector: [u8; 4], credentials: &Credentials) -> Result<(), RouterError> {
		self.policy
			.authorize(Capability::VenueManager, credentials)?;
		self.ensure_seeded();
		self.allow.insert(selector);
		info!(selector = %format_selector(selector), "selector allowed");
		Ok(())
	}

	pub fn deny(&self, selector: [u8; 4], credentials: &Credentials) -> Result<(), RouterError> {
		self.policy
			.authorize(Capability::VenueManager, credentials)?;
		self.ensure_seeded();
		self.deny.insert(selector);
		info!(selector = %format_selector(selector), "selector denied");
		Ok(())
	}

	/// Validates a payload's selector. Deny is checked before allow.
	pub fn check(&self, payload: &[u8]) -> Result<[u8; 4], RouterError> {
		self.ensure_seeded();
		if payload.len() < 4 {
			return Err(RouterError::PayloadTooShort);
		}
		let selector = [payload[0], payload[1], payload[2], payload[3]];
		if self.deny.contains(&selector) {
			return Err(RouterError::SelectorDenied(u32::from_be_bytes(selector)));
		}
		if !self.allow.contains(&selector) {
			return Err(RouterError::SelectorNotAllowed(u32::from_be_bytes(
				selector,
			)));
		}
		Ok(selector)
	}

	fn ensure_seeded(&self) {
		self.seed.call_once(|| {
			for signature in HIGH_RISK_SIGNATURES {
				self.deny.insert(selector_of(signature));
			}
			info!("high-risk selectors seeded into deny list");
		});
	}
}

/// First four bytes of the keccak256 of a function signature.
pub fn selector_of(signature: &str) -> [u8; 4] {
	let mut hasher = Keccak256::new();
	hasher.update(signature.as_bytes());
	let digest = hasher.finalize();
	[digest[0], digest[1], digest[2], digest[3]]
}

fn format_selector(selector: [u8; 4]) -> String {
	format!("{:#010x}", u32::from_be_bytes(selector))
}

#[cfg(test)]
mod tests {
	use super::*;
	use router_types::AuthorizationPolicy;

	struct AllowAll;

	impl AuthorizationPolicy for AllowAll {
		fn authorize(&self, _: Capability, _: &Credentials) -> Result<(), RouterError> {
			Ok(())
		}
	}

	fn creds() -> Credentials {
		Credentials {
			holder: "ops".into(),
			secret: "s".into(),
		}
	}

	fn policy() -> SelectorPolicy {
		SelectorPolicy::new(Arc::new(AllowAll))
	}

	#[test]
	fn test_deny_wins_over_allow() {
		let selectors = policy();
		let selector = selector_of("swap(uint256)");
		selectors.allow(selector, &creds()).unwrap();
		selectors.deny(selector, &creds()).unwrap();

		let mut payload = selector.to_vec();
		payload.extend_from_slice(&[0u8; 32]);
		assert!(matches!(
			selectors.check(&payload),
			Err(RouterError::SelectorDenied(_))
		));
	}

	#[test]
	fn test_high_risk_seeded_even_if_allowed() {
		let selectors = policy();
		let transfer_ownership = selector_of("transferOwnership(address)");
		selectors.allow(transfer_ownership, &creds()).unwrap();

		assert!(matches!(
			selectors.check(&transfer_ownership),
			Err(RouterError::SelectorDenied(_))
		));
	}

	#[test]
	fn test_unlisted_selector_rejected() {
		let selectors = policy();
		assert!(matches!(
			selectors.check(&selector_of("swap(uint256)")),
			Err(RouterError::SelectorNotAllowed(_))
		));
	}

	#[test]
	fn test_short_payload_rejected() {
		let selectors = policy();
		assert!(matches!(
			selectors.check(&[0x12, 0x34]),
			Err(RouterError::PayloadTooShort)
		));
	}

	#[test]
	fn test_allowed_selector_passes() {
		let selectors = policy();
		let selector = selector_of("swap(uint256)");
		selectors.allow(selector, &creds()).unwrap();
		assert_eq!(selectors.check(&selector).unwrap(), selector);
	}
}

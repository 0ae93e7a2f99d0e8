//! Secret-hash authorization policy.
//!
//! Credentials are authenticated by hashing the presented secret and
//! comparing against a hash committed at configuration time; the secret
//! itself is never stored. Authorization is a per-holder capability grant.

use std::collections::{HashMap, HashSet};

use sha3::{Digest, Keccak256};

use router_types::{AuthorizationPolicy, Capability, Credentials, RouterError};

/// Hashes an administrative secret the way the policy will check it.
pub fn hash_secret(secret: &str) -> [u8; 32] {
	let mut hasher = Keccak256::new();
	hasher.update(secret.as_bytes());
	hasher.finalize().into()
}

/// Capability check against a pre-committed secret hash.
pub struct SecretHashPolicy {
	committed: [u8; 32],
	grants: HashMap<String, HashSet<Capability>>,
}

impl SecretHashPolicy {
	pub fn new(committed: [u8; 32]) -> Self {
		Self {
			committed,
			grants: HashMap::new(),
		}
	}

	pub fn with_grant(mut self, holder: impl Into<String>, capabilities: &[Capability]) -> Self {
		self.grants
			.entry(holder.into())
			.or_default()
			.extend(capabilities.iter().copied());
		self
	}
}

impl AuthorizationPolicy for SecretHashPolicy {
	fn authorize(
		&self,
		required: Capability,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		let digest = hash_secret(&credentials.secret);
		if digest != self.committed {
			return Err(RouterError::Unauthorized("secret mismatch".to_string()));
		}

		let granted = self
			.grants
			.get(&credentials.holder)
			.is_some_and(|caps| caps.contains(&required));
		if !granted {
			return Err(RouterError::Unauthorized(format!(
				"{} lacks {:?}",
				credentials.holder, required
			)));
		}

		Ok(())
	}
}

//! Global and per-adapter-kind pausing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::warn;

use router_types::{AdapterKind, AuthorizationPolicy, Capability, Credentials, RouterError};

pub struct PauseController {
	global: AtomicBool,
	kinds: DashMap<AdapterKind, bool>,
	policy: Arc<dyn AuthorizationPolicy>,
}

impl PauseController {
	pub fn new(policy: Arc<dyn AuthorizationPolicy>) -> Self {
		Self {
			global: AtomicBool::new(false),
			kinds: DashMap::new(),
			policy,
		}
	}

	pub fn set_global(&self, paused: bool, credentials: &Credentials) -> Result<(), RouterError> {
		self.policy.authorize(Capability::Guardian, credentials)?;
		self.global.store(paused, Ordering::SeqCst);
		warn!(paused, "global pause changed");
		Ok(())
	}

	pub fn set_kind(
		&self,
		kind: AdapterKind,
		paused: bool,
		credentials: &Credentials,
	) -> Result<(), RouterError> {
		self.policy.authorize(Capability::Guardian, credentials)?;
		self.kinds.insert(kind, paused);
		warn!(?kind, paused, "adapter kind pause changed");
		Ok(())
	}

	pub fn is_global_paused(&self) -> bool {
		self.global.load(Ordering::SeqCst)
	}

	pub fn is_kind_paused(&self, kind: AdapterKind) -> bool {
		self.kinds.get(&kind).map(|entry| *entry).unwrap_or(false)
	}
}

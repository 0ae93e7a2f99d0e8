//! Event bus for governance notifications.
//!
//! A broadcast channel carrying one event per applied governance mutation.
//! Subscribers observe configuration changes without coupling to the
//! registries that apply them.

use tokio::sync::broadcast;

use router_types::RouterEvent;

pub struct EventBus {
	sender: broadcast::Sender<RouterEvent>,
}

impl EventBus {
	/// Creates a new bus with the specified channel capacity. Old events
	/// are dropped once the channel is full.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<RouterEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers. An error here only
	/// means nobody is listening, which is not a fault.
	pub fn publish(&self, event: RouterEvent) {
		let _ = self.sender.send(event);
	}
}

impl Clone for EventBus {
	fn clone(&self) -> Self {
		Self {
			sender: self.sender.clone(),
		}
	}
}

//! Host-side event fan-out.
//!
//! Fire-and-forget: emission never waits on a listener, delivery order per
//! listener is emission order, and a dead or full listener never blocks the
//! ones registered after it.

use parking_lot::Mutex;
use quill_wire::{Event, EventKind};
use tokio::sync::mpsc;

struct Sink {
	/// `None` subscribes to every kind.
	kind: Option<EventKind>,
	tx: mpsc::UnboundedSender<Event>,
}

/// Registry of event listeners on the host side.
///
/// The wire pump subscribes to everything and forwards frames to the UI;
/// in-process listeners (and tests) can subscribe to single kinds.
#[derive(Default)]
pub struct EventHub {
	sinks: Mutex<Vec<Sink>>,
}

impl EventHub {
	/// Creates an empty hub.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Subscribes to one event kind. Dropping the stream unsubscribes.
	pub fn subscribe(&self, kind: EventKind) -> EventStream {
		self.register(Some(kind))
	}

	/// Subscribes to every event kind.
	pub fn subscribe_all(&self) -> EventStream {
		self.register(None)
	}

	fn register(&self, kind: Option<EventKind>) -> EventStream {
		let (tx, rx) = mpsc::unbounded_channel();
		self.sinks.lock().push(Sink { kind, tx });
		EventStream { rx }
	}

	/// Delivers `event` to matching listeners in registration order.
	///
	/// Listeners whose receiver has been dropped are pruned here; their
	/// failure does not affect delivery to later listeners.
	pub fn emit(&self, event: &Event) {
		let kind = event.kind();
		let mut sinks = self.sinks.lock();
		sinks.retain(|sink| {
			if sink.kind.is_some_and(|k| k != kind) {
				return !sink.tx.is_closed();
			}
			sink.tx.send(event.clone()).is_ok()
		});
	}

	/// Number of live listeners, for diagnostics.
	#[must_use]
	pub fn listener_count(&self) -> usize {
		self.sinks.lock().len()
	}
}

/// Receiving end of a subscription.
pub struct EventStream {
	rx: mpsc::UnboundedReceiver<Event>,
}

impl EventStream {
	/// Awaits the next event; `None` once the hub is gone.
	pub async fn recv(&mut self) -> Option<Event> {
		self.rx.recv().await
	}

	/// Non-blocking receive, for draining in tests.
	pub fn try_recv(&mut self) -> Option<Event> {
		self.rx.try_recv().ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn delivery_is_fifo_per_listener() {
		let hub = EventHub::new();
		let mut stream = hub.subscribe_all();
		hub.emit(&Event::MenuNewFile);
		hub.emit(&Event::MenuSave);
		assert_eq!(stream.recv().await, Some(Event::MenuNewFile));
		assert_eq!(stream.recv().await, Some(Event::MenuSave));
	}

	#[tokio::test]
	async fn kind_filter_applies() {
		let hub = EventHub::new();
		let mut saves = hub.subscribe(EventKind::MenuSave);
		hub.emit(&Event::MenuNewFile);
		hub.emit(&Event::MenuSave);
		assert_eq!(saves.recv().await, Some(Event::MenuSave));
		assert!(saves.try_recv().is_none());
	}

	#[tokio::test]
	async fn dead_listener_does_not_block_later_ones() {
		let hub = EventHub::new();
		let dead = hub.subscribe_all();
		let mut live = hub.subscribe_all();
		drop(dead);
		hub.emit(&Event::MenuSave);
		assert_eq!(live.recv().await, Some(Event::MenuSave));
		assert_eq!(hub.listener_count(), 1);
	}
}

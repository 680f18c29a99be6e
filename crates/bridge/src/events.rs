//! UI-side event subscription.
//!
//! Listeners are typed channels rather than bare callbacks: `subscribe`
//! hands back a stream, and dropping the stream is the disposer. Delivery
//! is fan-out in registration order; a listener that stopped reading is
//! pruned and never blocks the ones after it.

use parking_lot::Mutex;
use quill_wire::{Event, EventKind};
use tokio::sync::mpsc;

struct Sink {
	/// `None` receives every kind.
	kind: Option<EventKind>,
	tx: mpsc::UnboundedSender<Event>,
}

/// Registry the client pump dispatches inbound events through.
#[derive(Default)]
pub(crate) struct EventRouter {
	sinks: Mutex<Vec<Sink>>,
}

impl EventRouter {
	pub(crate) fn subscribe(&self, kind: Option<EventKind>) -> EventStream {
		let (tx, rx) = mpsc::unbounded_channel();
		self.sinks.lock().push(Sink { kind, tx });
		EventStream { rx }
	}

	/// Delivers one event to matching listeners in registration order.
	pub(crate) fn dispatch(&self, event: &Event) {
		let kind = event.kind();
		let mut sinks = self.sinks.lock();
		sinks.retain(|sink| {
			if sink.kind.is_some_and(|k| k != kind) {
				return !sink.tx.is_closed();
			}
			sink.tx.send(event.clone()).is_ok()
		});
	}

	/// Ends every stream; called when the transport dies.
	pub(crate) fn close(&self) {
		self.sinks.lock().clear();
	}
}

/// Receiving end of one subscription. Drop it to unsubscribe.
pub struct EventStream {
	rx: mpsc::UnboundedReceiver<Event>,
}

impl EventStream {
	/// Builds a stream from a raw channel.
	///
	/// Exists so fakes of [`crate::Surface`] can emit events in UI tests.
	#[must_use]
	pub fn channel() -> (mpsc::UnboundedSender<Event>, Self) {
		let (tx, rx) = mpsc::unbounded_channel();
		(tx, Self { rx })
	}

	/// Awaits the next event; `None` once the transport is gone.
	pub async fn recv(&mut self) -> Option<Event> {
		self.rx.recv().await
	}

	/// Non-blocking receive.
	pub fn try_recv(&mut self) -> Option<Event> {
		self.rx.try_recv().ok()
	}
}

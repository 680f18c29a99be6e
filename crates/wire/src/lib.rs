//! Message contract between the sandboxed UI process and the privileged host.
//!
//! The UI never touches the OS directly; every capability it has is one of
//! the operations declared here, invoked over a framed JSON stream. This
//! crate owns the three things both sides must agree on:
//!
//! * the operation and event catalogs ([`OpRequest`], [`Event`]) with
//!   explicit typed argument/payload records,
//! * the reply envelope (`{ "success": bool, ..payload, "error"?: string }`)
//!   and the error taxonomy behind it ([`HostError`], [`ErrorKind`]),
//! * the Content-Length framed codec ([`codec`]) used on the wire.
//!
//! The operation set is closed: adding a capability means adding a variant
//! here, and nothing callable exists on the UI side that is not enumerated
//! in this crate.

#![warn(missing_docs)]

pub mod codec;
pub mod envelope;
pub mod error;
pub mod event;
pub mod ops;

pub use envelope::{ReplyBody, WireMessage};
pub use error::{ErrorKind, HostError};
pub use event::{Event, EventKind};
pub use ops::OpRequest;

/// Monotonic request-id generator used by the bridge side.
///
/// Ids only need to be unique within one connection; the counter is never
/// shared across connections.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestIdGen(u64);

impl RequestIdGen {
	/// Creates a generator starting at 0.
	#[must_use]
	pub const fn new() -> Self {
		Self(0)
	}

	/// Returns the next unused id.
	#[allow(clippy::should_implement_trait, reason = "convention")]
	pub fn next(&mut self) -> u64 {
		let id = self.0;
		self.0 += 1;
		id
	}
}

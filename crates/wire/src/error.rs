//! Error taxonomy shared by every capability handler.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Classification of a failed operation.
///
/// Every fault a handler can hit maps onto exactly one of these; the UI
/// keys retry/reporting behavior off the kind and shows the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// The named path or target does not exist.
	NotFound,
	/// The OS refused access to the target.
	PermissionDenied,
	/// The caller supplied a malformed argument (bad path type, empty
	/// command, disallowed URL scheme, empty commit message).
	InvalidArgument,
	/// A bounded operation exceeded its deadline and was terminated.
	Timeout,
	/// A required external tool or capability is not present.
	Unavailable,
	/// Catch-all; the message always carries the underlying cause.
	Unknown,
}

impl ErrorKind {
	/// Stable wire name of the kind.
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::NotFound => "NotFound",
			Self::PermissionDenied => "PermissionDenied",
			Self::InvalidArgument => "InvalidArgument",
			Self::Timeout => "Timeout",
			Self::Unavailable => "Unavailable",
			Self::Unknown => "Unknown",
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ErrorKind {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"NotFound" => Self::NotFound,
			"PermissionDenied" => Self::PermissionDenied,
			"InvalidArgument" => Self::InvalidArgument,
			"Timeout" => Self::Timeout,
			"Unavailable" => Self::Unavailable,
			"Unknown" => Self::Unknown,
			_ => return Err(()),
		})
	}
}

/// A structured failure crossing the bridge.
///
/// Serialized on the wire as the single string `"<Kind>: <message>"`; the
/// message is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct HostError {
	/// Failure classification.
	pub kind: ErrorKind,
	/// Human-readable cause, always non-empty.
	pub message: String,
}

impl HostError {
	/// Creates an error, substituting a placeholder if `message` is blank so
	/// the wire contract's never-empty guarantee holds.
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		let message = message.into();
		let message = if message.trim().is_empty() {
			"no further detail".to_string()
		} else {
			message
		};
		Self { kind, message }
	}

	/// Shorthand for a missing-path failure with the canonical message shape.
	pub fn not_found(path: &Path) -> Self {
		Self::new(ErrorKind::NotFound, format!("{} does not exist", path.display()))
	}

	/// Shorthand for an [`ErrorKind::InvalidArgument`] failure.
	pub fn invalid(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::InvalidArgument, message)
	}

	/// Shorthand for an [`ErrorKind::Unavailable`] failure.
	pub fn unavailable(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::Unavailable, message)
	}

	/// Shorthand for an [`ErrorKind::Unknown`] failure.
	pub fn unknown(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::Unknown, message)
	}

	/// Maps an I/O fault on `path` onto the taxonomy.
	pub fn from_io(path: &Path, err: &std::io::Error) -> Self {
		match err.kind() {
			std::io::ErrorKind::NotFound => Self::not_found(path),
			std::io::ErrorKind::PermissionDenied => {
				Self::new(ErrorKind::PermissionDenied, format!("{}: permission denied", path.display()))
			}
			std::io::ErrorKind::TimedOut => Self::new(ErrorKind::Timeout, format!("{}: timed out", path.display())),
			_ => Self::new(ErrorKind::Unknown, format!("{}: {err}", path.display())),
		}
	}

	/// Parses the wire string form back into a structured error.
	///
	/// Strings that do not carry a recognized kind prefix come back as
	/// [`ErrorKind::Unknown`] with the whole string as the message.
	#[must_use]
	pub fn parse_wire(s: &str) -> Self {
		if let Some((kind, rest)) = s.split_once(": ")
			&& let Ok(kind) = kind.parse::<ErrorKind>()
		{
			return Self::new(kind, rest);
		}
		Self::new(ErrorKind::Unknown, s)
	}
}

#[cfg(test)]
mod tests {
	use std::path::Path;

	use super::*;

	#[test]
	fn not_found_matches_contract_message() {
		let err = HostError::not_found(Path::new("/tmp/missing.txt"));
		assert_eq!(err.to_string(), "NotFound: /tmp/missing.txt does not exist");
	}

	#[test]
	fn wire_string_round_trips() {
		let err = HostError::new(ErrorKind::Timeout, "command timed out after 30s");
		assert_eq!(HostError::parse_wire(&err.to_string()), err);
	}

	#[test]
	fn unrecognized_prefix_becomes_unknown() {
		let err = HostError::parse_wire("something exploded");
		assert_eq!(err.kind, ErrorKind::Unknown);
		assert_eq!(err.message, "something exploded");
	}

	#[test]
	fn blank_message_is_replaced() {
		let err = HostError::new(ErrorKind::Unknown, "  ");
		assert!(!err.message.trim().is_empty());
	}
}

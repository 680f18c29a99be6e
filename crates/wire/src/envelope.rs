//! Reply envelope and wire-level message classification.
//!
//! Replies cross the boundary as `{ "success": bool, ..payload fields,
//! "error"?: string }` — that inner shape is consumed verbatim by the UI
//! layer and must not change. Inbound frames are classified by which fields
//! they carry rather than by an explicit tag, mirroring how the host and UI
//! distinguish requests, replies and events.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::HostError;
use crate::event::Event;
use crate::ops::OpRequest;

/// A frame could not be interpreted.
#[derive(Debug, Error)]
pub enum DecodeError {
	/// The JSON was valid but not one of the three message shapes.
	#[error("malformed message: {0}")]
	Malformed(String),
	/// The payload inside a structurally valid frame failed to decode.
	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

/// Outcome half of a reply: a payload object or a structured failure.
///
/// Exactly one of these is produced per request id.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
	/// Success; the map holds the operation-specific payload fields.
	Ok(Map<String, Value>),
	/// Failure; serialized as `success: false` plus the error string.
	Failed(HostError),
}

impl ReplyBody {
	/// Builds a success body from any serializable payload.
	///
	/// Payloads that do not serialize to a JSON object (there are none in
	/// the catalog) are reported as an internal failure rather than
	/// corrupting the envelope.
	pub fn ok<T: serde::Serialize>(payload: &T) -> Self {
		match serde_json::to_value(payload) {
			Ok(Value::Object(map)) => Self::Ok(map),
			Ok(other) => Self::Failed(HostError::unknown(format!("non-object payload: {other}"))),
			Err(e) => Self::Failed(HostError::unknown(format!("payload serialization failed: {e}"))),
		}
	}

	/// Serializes into the `{ success, .. }` envelope object.
	#[must_use]
	pub fn to_value(&self) -> Value {
		let mut map = Map::new();
		match self {
			Self::Ok(fields) => {
				map.insert("success".into(), Value::Bool(true));
				for (k, v) in fields {
					map.insert(k.clone(), v.clone());
				}
			}
			Self::Failed(err) => {
				map.insert("success".into(), Value::Bool(false));
				map.insert("error".into(), Value::String(err.to_string()));
			}
		}
		Value::Object(map)
	}

	/// Parses an envelope object back into a body.
	pub fn from_value(value: Value) -> Result<Self, DecodeError> {
		let Value::Object(mut map) = value else {
			return Err(DecodeError::Malformed("reply is not an object".into()));
		};
		match map.remove("success") {
			Some(Value::Bool(true)) => Ok(Self::Ok(map)),
			Some(Value::Bool(false)) => {
				let error = map
					.remove("error")
					.and_then(|v| v.as_str().map(str::to_owned))
					.unwrap_or_else(|| "unspecified failure".into());
				Ok(Self::Failed(HostError::parse_wire(&error)))
			}
			_ => Err(DecodeError::Malformed("reply missing boolean 'success'".into())),
		}
	}

	/// Converts into `Result`, decoding the payload on success.
	pub fn into_result<T: serde::de::DeserializeOwned>(self) -> Result<T, HostError> {
		match self {
			Self::Ok(map) => serde_json::from_value(Value::Object(map))
				.map_err(|e| HostError::unknown(format!("payload decode failed: {e}"))),
			Self::Failed(err) => Err(err),
		}
	}
}

/// Any frame travelling between the two processes.
#[derive(Debug, Clone, PartialEq)]
pub enum WireMessage {
	/// UI → host invocation.
	Request {
		/// Correlation id, unique per connection.
		id: u64,
		/// The operation and its arguments.
		op: OpRequest,
	},
	/// Host → UI answer to the request with the same id.
	Reply {
		/// Correlation id of the request being answered.
		id: u64,
		/// Outcome envelope.
		reply: ReplyBody,
	},
	/// Host → UI unsolicited notification; no id.
	Event(Event),
}

impl WireMessage {
	/// Serializes into the on-wire JSON object.
	pub fn to_value(&self) -> Result<Value, DecodeError> {
		match self {
			Self::Request { id, op } => {
				let mut map = match serde_json::to_value(op)? {
					Value::Object(map) => map,
					other => return Err(DecodeError::Malformed(format!("request serialized to {other}"))),
				};
				map.insert("id".into(), Value::from(*id));
				Ok(Value::Object(map))
			}
			Self::Reply { id, reply } => {
				let mut map = Map::new();
				map.insert("id".into(), Value::from(*id));
				map.insert("reply".into(), reply.to_value());
				Ok(Value::Object(map))
			}
			Self::Event(event) => Ok(serde_json::to_value(event)?),
		}
	}

	/// Classifies a decoded JSON object by its fields.
	pub fn from_value(value: Value) -> Result<Self, DecodeError> {
		let Value::Object(map) = &value else {
			return Err(DecodeError::Malformed("frame is not an object".into()));
		};
		if map.contains_key("op") {
			let id = read_id(map)?;
			let op: OpRequest = serde_json::from_value(value)?;
			return Ok(Self::Request { id, op });
		}
		if map.contains_key("reply") {
			let id = read_id(map)?;
			let Value::Object(mut map) = value else { unreachable!() };
			let reply = ReplyBody::from_value(map.remove("reply").unwrap_or(Value::Null))?;
			return Ok(Self::Reply { id, reply });
		}
		if map.contains_key("event") {
			let event: Event = serde_json::from_value(value)?;
			return Ok(Self::Event(event));
		}
		Err(DecodeError::Malformed("frame has none of 'op', 'reply', 'event'".into()))
	}
}

fn read_id(map: &Map<String, Value>) -> Result<u64, DecodeError> {
	map.get("id")
		.and_then(Value::as_u64)
		.ok_or_else(|| DecodeError::Malformed("frame missing numeric 'id'".into()))
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::error::{ErrorKind, HostError};
	use crate::ops::{ExecOutput, ReadFileArgs};

	#[test]
	fn ok_reply_envelope_shape() {
		let body = ReplyBody::ok(&ExecOutput {
			stdout: "hi\n".into(),
			stderr: String::new(),
			exit_code: 0,
			cwd: "/tmp".into(),
		});
		assert_eq!(
			body.to_value(),
			json!({ "success": true, "stdout": "hi\n", "stderr": "", "exitCode": 0, "cwd": "/tmp" })
		);
	}

	#[test]
	fn failed_reply_envelope_shape() {
		let body = ReplyBody::Failed(HostError::new(ErrorKind::NotFound, "/tmp/missing.txt does not exist"));
		assert_eq!(
			body.to_value(),
			json!({ "success": false, "error": "NotFound: /tmp/missing.txt does not exist" })
		);
	}

	#[test]
	fn envelope_round_trips_through_classification() {
		let msg = WireMessage::Request {
			id: 7,
			op: OpRequest::FsReadFile(ReadFileArgs { path: "/tmp/a".into() }),
		};
		let back = WireMessage::from_value(msg.to_value().unwrap()).unwrap();
		assert_eq!(back, msg);
	}

	#[test]
	fn reply_resolves_to_typed_payload() {
		let body = ReplyBody::from_value(json!({ "success": true, "content": "x" })).unwrap();
		let payload: crate::ops::FileContent = body.into_result().unwrap();
		assert_eq!(payload.content, "x");
	}

	#[test]
	fn failed_reply_resolves_to_structured_error() {
		let body = ReplyBody::from_value(json!({ "success": false, "error": "Timeout: command timed out" })).unwrap();
		let err = body.into_result::<crate::ops::Ack>().unwrap_err();
		assert_eq!(err.kind, ErrorKind::Timeout);
	}

	#[test]
	fn junk_frame_is_rejected() {
		assert!(WireMessage::from_value(json!({ "ping": 1 })).is_err());
		assert!(WireMessage::from_value(json!([1, 2])).is_err());
	}
}

//! Content-Length framed JSON over any async byte stream.
//!
//! Frames look like `Content-Length: N\r\n\r\n<json>`. Between the two
//! processes this runs over stdio pipes; tests run it over
//! `tokio::io::duplex`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::envelope::{DecodeError, WireMessage};

/// Upper bound on a frame body. Large enough for a capped exec capture
/// after JSON string escaping; anything bigger is a corrupt or hostile
/// header, rejected before the buffer is allocated.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Transport-level failure while reading or writing a frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
	/// The underlying stream failed.
	#[error(transparent)]
	Io(#[from] std::io::Error),
	/// The frame body was not a valid message.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// The frame header was missing or unparsable.
	#[error("invalid frame header: {0}")]
	Header(String),
}

impl From<serde_json::Error> for FrameError {
	fn from(e: serde_json::Error) -> Self {
		Self::Decode(DecodeError::Json(e))
	}
}

/// Reads one frame, returning `None` on clean EOF at a frame boundary.
pub async fn read_frame(reader: &mut (impl AsyncBufRead + Unpin)) -> Result<Option<WireMessage>, FrameError> {
	let mut content_length: Option<usize> = None;
	let mut line = String::new();
	loop {
		line.clear();
		let n = reader.read_line(&mut line).await?;
		if n == 0 {
			return if content_length.is_none() {
				Ok(None)
			} else {
				Err(FrameError::Header("EOF inside frame header".into()))
			};
		}
		let trimmed = line.trim();
		if trimmed.is_empty() {
			if content_length.is_some() {
				break;
			}
			// Tolerate stray blank lines between frames.
			continue;
		}
		if let Some(len) = trimmed.strip_prefix("Content-Length: ") {
			content_length = Some(
				len.parse()
					.map_err(|_| FrameError::Header(format!("bad Content-Length: {len:?}")))?,
			);
		}
	}

	let length = content_length.ok_or_else(|| FrameError::Header("missing Content-Length".into()))?;
	if length > MAX_FRAME_LEN {
		return Err(FrameError::Header(format!("Content-Length {length} exceeds limit {MAX_FRAME_LEN}")));
	}
	let mut body = vec![0u8; length];
	reader.read_exact(&mut body).await?;

	let value: serde_json::Value = serde_json::from_slice(&body)?;
	Ok(Some(WireMessage::from_value(value)?))
}

/// Writes one frame and flushes.
pub async fn write_frame(writer: &mut (impl AsyncWrite + Unpin), msg: &WireMessage) -> Result<(), FrameError> {
	let json = serde_json::to_string(&msg.to_value()?)?;
	let framed = format!("Content-Length: {}\r\n\r\n{json}", json.len());
	writer.write_all(framed.as_bytes()).await?;
	writer.flush().await?;
	Ok(())
}

//! The host-side message pump.
//!
//! A dedicated reader task decodes frames and feeds them through a channel,
//! so the select loop only ever awaits cancel-safe channel receives; frames
//! can never be torn by a concurrently completing arm. Each request runs in
//! its own [`JoinSet`] task so slow operations never block fast ones, and
//! replies and events funnel through the single writer. Replies correlate
//! by id only; two concurrent requests may complete in either order. A
//! panicking handler is converted into an `Unknown` reply at the join
//! point, so every request gets exactly one reply for as long as the
//! transport lives.
//!
//! Dropping the `run_host` future tears the whole connection down: the
//! reader task sits behind an abort-on-drop guard and in-flight request
//! tasks live in the [`JoinSet`], so both transport halves are released
//! and the peer observes EOF.

use std::collections::HashMap;
use std::sync::Arc;

use quill_wire::HostError;
use quill_wire::codec::{self, FrameError};
use quill_wire::envelope::{ReplyBody, WireMessage};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use crate::context::HostContext;
use crate::dispatch;

/// Aborts the wrapped task when dropped, including when the owning future
/// is cancelled instead of run to completion.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
	fn drop(&mut self) {
		self.0.abort();
	}
}

/// Serves the bridge over one transport until the UI side closes it.
///
/// Returns `Ok(())` on clean EOF; transport faults are fatal for the
/// connection and bubble up.
pub async fn run_host(
	ctx: Arc<HostContext>,
	reader: impl AsyncRead + Unpin + Send + 'static,
	mut writer: impl AsyncWrite + Unpin + Send,
) -> Result<(), FrameError> {
	let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
	let _reader_guard = AbortOnDrop(tokio::spawn(read_loop(reader, frame_tx)));

	let mut events = ctx.events.subscribe_all();
	let mut requests: JoinSet<(u64, ReplyBody)> = JoinSet::new();
	// Maps task ids back to request ids for handlers that panicked.
	let mut in_flight: HashMap<tokio::task::Id, u64> = HashMap::new();

	loop {
		tokio::select! {
			inbound = frame_rx.recv() => {
				match inbound {
					Some(Ok(WireMessage::Request { id, op })) => {
						tracing::debug!(id, op = op.id(), "request received");
						let ctx = ctx.clone();
						let task = requests.spawn(async move { (id, dispatch::handle(ctx, op).await) });
						in_flight.insert(task.id(), id);
					}
					Some(Ok(other)) => {
						tracing::warn!(?other, "ignoring non-request frame from UI");
					}
					Some(Err(e)) => {
						tracing::error!(error = %e, "failed to read frame; terminating pump");
						return Err(e);
					}
					None => {
						tracing::info!("UI closed the connection");
						return Ok(());
					}
				}
			}

			Some(joined) = requests.join_next_with_id() => {
				let (id, reply) = match joined {
					Ok((task_id, (id, reply))) => {
						in_flight.remove(&task_id);
						(id, reply)
					}
					Err(join_err) => {
						let Some(id) = in_flight.remove(&join_err.id()) else {
							tracing::error!(error = %join_err, "handler task failed with no request attached");
							continue;
						};
						tracing::error!(id, error = %join_err, "handler task failed");
						(id, ReplyBody::Failed(HostError::unknown(format!("handler failed: {join_err}"))))
					}
				};
				// Write failure is fatal: the UI is gone and in-flight
				// replies have nowhere to go.
				if let Err(e) = codec::write_frame(&mut writer, &WireMessage::Reply { id, reply }).await {
					tracing::error!(error = %e, "reply write failed; terminating pump");
					return Err(e);
				}
			}

			Some(event) = events.recv() => {
				if let Err(e) = codec::write_frame(&mut writer, &WireMessage::Event(event)).await {
					tracing::error!(error = %e, "event write failed; terminating pump");
					return Err(e);
				}
			}
		}
	}
}

/// Decodes frames off the transport until EOF or a transport fault.
///
/// Runs as its own task so the select loop never cancels a read
/// mid-frame.
async fn read_loop(
	reader: impl AsyncRead + Unpin + Send,
	frame_tx: mpsc::UnboundedSender<Result<WireMessage, FrameError>>,
) {
	let mut reader = BufReader::new(reader);
	loop {
		match codec::read_frame(&mut reader).await {
			Ok(Some(msg)) => {
				if frame_tx.send(Ok(msg)).is_err() {
					break;
				}
			}
			Ok(None) => break,
			Err(e) => {
				let _ = frame_tx.send(Err(e));
				break;
			}
		}
	}
}

//! The UI-side message pump.
//!
//! Requests travel through the pump's outbound queue so writes are
//! sequential; the pending map correlates each reply id back to the oneshot
//! the caller awaits. Frames are decoded by a dedicated reader task and
//! arrive over a channel, so the select loop only awaits cancel-safe
//! receives and a frame can never be torn by a concurrently completing
//! arm. When the transport dies every pending call is resolved with a
//! transport error rather than left hanging, and the event router is
//! closed so subscription streams end.

use std::collections::HashMap;
use std::sync::Arc;

use quill_wire::codec;
use quill_wire::envelope::{ReplyBody, WireMessage};
use quill_wire::{HostError, OpRequest};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::events::EventRouter;

/// Aborts the reader task when dropped, so cancelling the pump releases
/// its half of the transport and the host observes EOF.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
	fn drop(&mut self) {
		self.0.abort();
	}
}

pub(crate) struct Outbound {
	pub id: u64,
	pub op: OpRequest,
	pub reply_tx: oneshot::Sender<Result<ReplyBody, HostError>>,
}

/// The only error the bridge itself synthesizes.
pub(crate) fn transport_dead() -> HostError {
	HostError::unknown("host connection closed")
}

pub(crate) async fn run_client_io(
	reader: impl AsyncRead + Unpin + Send + 'static,
	mut writer: impl AsyncWrite + Unpin + Send,
	mut req_rx: mpsc::UnboundedReceiver<Outbound>,
	router: Arc<EventRouter>,
) {
	let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
	let _reader_guard = AbortOnDrop(tokio::spawn(read_loop(reader, frame_tx)));

	let mut pending: HashMap<u64, oneshot::Sender<Result<ReplyBody, HostError>>> = HashMap::new();

	loop {
		tokio::select! {
			Some(out) = req_rx.recv() => {
				let msg = WireMessage::Request { id: out.id, op: out.op };
				match codec::write_frame(&mut writer, &msg).await {
					Ok(()) => {
						pending.insert(out.id, out.reply_tx);
					}
					Err(e) => {
						tracing::error!(error = %e, "request write failed; terminating pump");
						let _ = out.reply_tx.send(Err(transport_dead()));
						break;
					}
				}
			}

			inbound = frame_rx.recv() => {
				match inbound {
					Some(WireMessage::Reply { id, reply }) => {
						match pending.remove(&id) {
							Some(tx) => {
								let _ = tx.send(Ok(reply));
							}
							None => tracing::warn!(id, "reply without a pending request"),
						}
					}
					Some(WireMessage::Event(event)) => {
						router.dispatch(&event);
					}
					Some(WireMessage::Request { id, .. }) => {
						tracing::warn!(id, "ignoring request frame from host");
					}
					None => {
						tracing::info!("host connection ended");
						break;
					}
				}
			}
		}
	}

	// Resolve everything still waiting instead of leaving calls hanging.
	for (_, tx) in pending.drain() {
		let _ = tx.send(Err(transport_dead()));
	}
	req_rx.close();
	while let Ok(out) = req_rx.try_recv() {
		let _ = out.reply_tx.send(Err(transport_dead()));
	}
	router.close();
}

/// Decodes frames until EOF or a transport fault; faults end the stream
/// after being logged, which the select loop observes as channel closure.
async fn read_loop(reader: impl AsyncRead + Unpin + Send, frame_tx: mpsc::UnboundedSender<WireMessage>) {
	let mut reader = BufReader::new(reader);
	loop {
		match codec::read_frame(&mut reader).await {
			Ok(Some(msg)) => {
				if frame_tx.send(msg).is_err() {
					break;
				}
			}
			Ok(None) => break,
			Err(e) => {
				tracing::error!(error = %e, "failed to read frame from host");
				break;
			}
		}
	}
}

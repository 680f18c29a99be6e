//! UI-side surface of the capability bridge.
//!
//! [`Bridge`] is the sandboxed process's only route to the OS: a fixed set
//! of typed async operations ([`Surface`]) plus typed event subscription.
//! Each call is marshalled into a framed request, correlated back to its
//! caller by id, and resolved exactly once — with the operation's payload,
//! the host's structured error, or (only if the transport itself died) a
//! synthesized `Unknown` transport error.
//!
//! Construct it with [`Bridge::connect`] over the host's stdio pipes and
//! hand it to the UI layer explicitly; nothing here is a global.

#![warn(missing_docs)]

mod events;
mod pump;
mod surface;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use quill_wire::ops::{
	DetectArgs, DialogSelection, DirListing, ExecArgs, ExecOutput, FileContent, FileTree, GitCommitArgs,
	GitCommitOutput, GitStatusArgs, GitStatusSummary, OpenExternalArgs, ProjectInfo, PwdArgs, ReadDirArgs,
	ReadDirRecursiveArgs, ReadFileArgs, WorkingDir, WriteFileArgs, WrittenFile,
};
use quill_wire::{EventKind, HostError, OpRequest, RequestIdGen};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};

pub use events::EventStream;
pub use surface::Surface;

use pump::Outbound;

/// Handle to a live host connection.
///
/// Cheap to clone; all clones share one pump and one id space.
#[derive(Clone)]
pub struct Bridge {
	req_tx: mpsc::UnboundedSender<Outbound>,
	router: Arc<events::EventRouter>,
	ids: Arc<Mutex<RequestIdGen>>,
}

impl Bridge {
	/// Connects over a transport and spawns the client pump.
	///
	/// Must be called within a tokio runtime.
	pub fn connect(
		reader: impl AsyncRead + Unpin + Send + 'static,
		writer: impl AsyncWrite + Unpin + Send + 'static,
	) -> Self {
		let (req_tx, req_rx) = mpsc::unbounded_channel();
		let router = Arc::new(events::EventRouter::default());
		tokio::spawn(pump::run_client_io(reader, writer, req_rx, router.clone()));
		Self {
			req_tx,
			router,
			ids: Arc::new(Mutex::new(RequestIdGen::new())),
		}
	}

	/// Issues one request and awaits its single reply.
	async fn call<T: serde::de::DeserializeOwned>(&self, op: OpRequest) -> Result<T, HostError> {
		let id = self.ids.lock().next();
		let (reply_tx, reply_rx) = oneshot::channel();
		self.req_tx
			.send(Outbound { id, op, reply_tx })
			.map_err(|_| pump::transport_dead())?;
		let body = reply_rx.await.map_err(|_| pump::transport_dead())??;
		body.into_result()
	}
}

#[async_trait]
impl Surface for Bridge {
	async fn minimize_window(&self) -> Result<(), HostError> {
		self.call::<quill_wire::ops::Ack>(OpRequest::WindowMinimize).await?;
		Ok(())
	}

	async fn maximize_window(&self) -> Result<(), HostError> {
		self.call::<quill_wire::ops::Ack>(OpRequest::WindowMaximize).await?;
		Ok(())
	}

	async fn close_window(&self) -> Result<(), HostError> {
		self.call::<quill_wire::ops::Ack>(OpRequest::WindowClose).await?;
		Ok(())
	}

	async fn open_file_dialog(&self) -> Result<DialogSelection, HostError> {
		self.call(OpRequest::DialogOpenFile).await
	}

	async fn open_folder_dialog(&self) -> Result<DialogSelection, HostError> {
		self.call(OpRequest::DialogOpenFolder).await
	}

	async fn read_file(&self, path: &str) -> Result<FileContent, HostError> {
		self.call(OpRequest::FsReadFile(ReadFileArgs { path: path.into() })).await
	}

	async fn write_file(&self, path: &str, content: &str) -> Result<WrittenFile, HostError> {
		self.call(OpRequest::FsWriteFile(WriteFileArgs {
			path: path.into(),
			content: content.into(),
		}))
		.await
	}

	async fn read_dir(&self, path: &str) -> Result<DirListing, HostError> {
		self.call(OpRequest::FsReadDir(ReadDirArgs { path: path.into() })).await
	}

	async fn read_dir_recursive(&self, path: &str, depth: Option<u32>) -> Result<FileTree, HostError> {
		self.call(OpRequest::FsReadDirRecursive(ReadDirRecursiveArgs {
			path: path.into(),
			depth,
		}))
		.await
	}

	async fn exec(&self, command: &str, cwd: Option<&str>) -> Result<ExecOutput, HostError> {
		self.call(OpRequest::ShellExec(ExecArgs {
			command: command.into(),
			cwd: cwd.map(Into::into),
		}))
		.await
	}

	async fn pwd(&self, cwd: Option<&str>) -> Result<WorkingDir, HostError> {
		self.call(OpRequest::ShellPwd(PwdArgs { cwd: cwd.map(Into::into) })).await
	}

	async fn open_external(&self, url: &str) -> Result<(), HostError> {
		self.call::<quill_wire::ops::Ack>(OpRequest::ShellOpenExternal(OpenExternalArgs { url: url.into() }))
			.await?;
		Ok(())
	}

	async fn git_status(&self, cwd: &str) -> Result<GitStatusSummary, HostError> {
		self.call(OpRequest::GitStatus(GitStatusArgs { cwd: cwd.into() })).await
	}

	async fn git_commit(&self, cwd: &str, message: &str) -> Result<GitCommitOutput, HostError> {
		self.call(OpRequest::GitCommit(GitCommitArgs {
			cwd: cwd.into(),
			message: message.into(),
		}))
		.await
	}

	async fn detect_project(&self, path: &str) -> Result<ProjectInfo, HostError> {
		self.call(OpRequest::ProjectDetect(DetectArgs { path: path.into() })).await
	}

	fn subscribe(&self, kind: EventKind) -> EventStream {
		self.router.subscribe(Some(kind))
	}
}

impl Bridge {
	/// Subscribes to every event kind.
	pub fn subscribe_all(&self) -> EventStream {
		self.router.subscribe(None)
	}
}

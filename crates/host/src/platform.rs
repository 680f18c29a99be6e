//! Seams to the windowing shell and the OS.
//!
//! The handlers never reach the window system or the desktop environment
//! directly; they go through these traits so the embedding shell supplies
//! the real implementations and tests supply fakes. [`Headless`] is the
//! implementation used by the plain stdio host binary.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use quill_wire::HostError;
use url::Url;

/// Window control exposed to the UI.
///
/// All faults surface as a single generic `Unavailable` error; the window
/// operations have no payload.
#[async_trait]
pub trait WindowOps: Send + Sync {
	/// Minimizes the application window.
	async fn minimize(&self) -> Result<(), HostError>;
	/// Maximizes the window, or restores it if already maximized.
	async fn maximize(&self) -> Result<(), HostError>;
	/// Closes the application window.
	async fn close(&self) -> Result<(), HostError>;
}

/// Native file/folder pickers.
#[async_trait]
pub trait DialogOps: Send + Sync {
	/// Shows an open-file dialog; `None` means the user cancelled.
	async fn pick_file(&self) -> Result<Option<PathBuf>, HostError>;
	/// Shows an open-folder dialog; `None` means the user cancelled.
	async fn pick_folder(&self) -> Result<Option<PathBuf>, HostError>;
}

/// Remaining OS-level capabilities.
#[async_trait]
pub trait SystemOps: Send + Sync {
	/// Opens an already-validated URL in the default external handler.
	async fn open_external(&self, url: &Url) -> Result<(), HostError>;
}

/// Platform implementation for a host with no window attached.
///
/// Window operations fail `Unavailable`, dialogs report no selection, and
/// URLs are handed to the platform opener binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

#[async_trait]
impl WindowOps for Headless {
	async fn minimize(&self) -> Result<(), HostError> {
		Err(HostError::unavailable("no window attached to this host"))
	}

	async fn maximize(&self) -> Result<(), HostError> {
		Err(HostError::unavailable("no window attached to this host"))
	}

	async fn close(&self) -> Result<(), HostError> {
		Err(HostError::unavailable("no window attached to this host"))
	}
}

#[async_trait]
impl DialogOps for Headless {
	async fn pick_file(&self) -> Result<Option<PathBuf>, HostError> {
		Ok(None)
	}

	async fn pick_folder(&self) -> Result<Option<PathBuf>, HostError> {
		Ok(None)
	}
}

#[async_trait]
impl SystemOps for Headless {
	async fn open_external(&self, url: &Url) -> Result<(), HostError> {
		let opener = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
		let opener = which::which(opener)
			.map_err(|_| HostError::unavailable(format!("{opener} not found on PATH")))?;
		tokio::process::Command::new(opener)
			.arg(url.as_str())
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::null())
			.spawn()
			.map_err(|e| HostError::unknown(format!("failed to launch opener: {e}")))?;
		Ok(())
	}
}

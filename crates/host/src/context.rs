//! Shared state handed to every capability handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::HostConfig;
use crate::events::EventHub;
use crate::platform::{DialogOps, Headless, SystemOps, WindowOps};

/// Everything a handler may touch: read-only config, the platform seams,
/// and the event hub. Handlers hold no other shared state; the filesystem
/// and spawned processes are the only shared mutable resources.
pub struct HostContext {
	/// Read-only after startup.
	pub config: HostConfig,
	/// Window control seam.
	pub window: Arc<dyn WindowOps>,
	/// Native dialog seam.
	pub dialogs: Arc<dyn DialogOps>,
	/// Remaining OS capabilities.
	pub system: Arc<dyn SystemOps>,
	/// Host-to-UI notification fan-out.
	pub events: EventHub,
}

impl HostContext {
	/// Builds a context with the given platform implementations.
	pub fn new(
		config: HostConfig,
		window: Arc<dyn WindowOps>,
		dialogs: Arc<dyn DialogOps>,
		system: Arc<dyn SystemOps>,
	) -> Self {
		Self {
			config,
			window,
			dialogs,
			system,
			events: EventHub::new(),
		}
	}

	/// Builds a headless context: no window, cancelling dialogs.
	pub fn headless(config: HostConfig) -> Self {
		Self::new(config, Arc::new(Headless), Arc::new(Headless), Arc::new(Headless))
	}

	/// Resolves a caller-supplied path against the workspace root.
	///
	/// Absolute paths pass through untouched.
	#[must_use]
	pub fn resolve_path(&self, path: &str) -> PathBuf {
		let p = Path::new(path);
		if p.is_absolute() {
			p.to_path_buf()
		} else {
			self.config.resolved_root().join(p)
		}
	}

	/// Resolves an optional working directory, defaulting to the root.
	#[must_use]
	pub fn resolve_cwd(&self, cwd: Option<&str>) -> PathBuf {
		match cwd {
			Some(dir) => self.resolve_path(dir),
			None => self.config.resolved_root(),
		}
	}
}

//! Capability handlers, one module per operation namespace.
//!
//! Every handler takes untrusted arguments, validates them, performs the
//! privileged action and returns `Result<Payload, HostError>`. No fault is
//! allowed past the handler boundary as anything but a `HostError`.

pub mod fs;
pub mod git;
pub mod project;
pub mod shell;
pub mod ui;

use std::path::Path;

use quill_wire::HostError;

/// Validates that `path` exists and is a directory.
pub(crate) async fn require_dir(path: &Path) -> Result<(), HostError> {
	let meta = tokio::fs::metadata(path)
		.await
		.map_err(|e| HostError::from_io(path, &e))?;
	if !meta.is_dir() {
		return Err(HostError::invalid(format!("{} is not a directory", path.display())));
	}
	Ok(())
}

/// Validates that `path` exists and is a regular file.
pub(crate) async fn require_file(path: &Path) -> Result<(), HostError> {
	let meta = tokio::fs::metadata(path)
		.await
		.map_err(|e| HostError::from_io(path, &e))?;
	if meta.is_dir() {
		return Err(HostError::invalid(format!("{} is a directory, not a file", path.display())));
	}
	Ok(())
}

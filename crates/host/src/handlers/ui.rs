//! Window control and native dialogs.
//!
//! Dialog cancellation is a successful empty selection. A confirmed file
//! pick also reads the file and emits `file.opened`, and a folder pick
//! emits `folder.opened`, matching what the menu shortcuts do.

use quill_wire::ops::{Ack, DialogSelection};
use quill_wire::{Event, HostError};

use crate::context::HostContext;

/// `window.minimize`
pub async fn minimize(ctx: &HostContext) -> Result<Ack, HostError> {
	ctx.window.minimize().await.map_err(generic)?;
	Ok(Ack {})
}

/// `window.maximize`
pub async fn maximize(ctx: &HostContext) -> Result<Ack, HostError> {
	ctx.window.maximize().await.map_err(generic)?;
	Ok(Ack {})
}

/// `window.close`
pub async fn close(ctx: &HostContext) -> Result<Ack, HostError> {
	ctx.window.close().await.map_err(generic)?;
	Ok(Ack {})
}

/// Window faults collapse onto the single generic kind the contract allows.
fn generic(err: HostError) -> HostError {
	HostError::unavailable(err.message)
}

/// `dialog.openFile`
pub async fn open_file(ctx: &HostContext) -> Result<DialogSelection, HostError> {
	let Some(path) = ctx.dialogs.pick_file().await? else {
		return Ok(DialogSelection::default());
	};
	let content = tokio::fs::read_to_string(&path)
		.await
		.map_err(|e| HostError::from_io(&path, &e))?;
	let path = path.display().to_string();
	ctx.events.emit(&Event::FileOpened {
		path: path.clone(),
		content,
	});
	Ok(DialogSelection { path: Some(path) })
}

/// `dialog.openFolder`
pub async fn open_folder(ctx: &HostContext) -> Result<DialogSelection, HostError> {
	let Some(path) = ctx.dialogs.pick_folder().await? else {
		return Ok(DialogSelection::default());
	};
	let path = path.display().to_string();
	ctx.events.emit(&Event::FolderOpened { path: path.clone() });
	Ok(DialogSelection { path: Some(path) })
}

//! Unsolicited host-to-UI notifications.

use serde::{Deserialize, Serialize};

/// A one-directional notification pushed from the host.
///
/// Events carry no correlation id; delivery is at-most-once, FIFO per
/// listener, with no buffering across UI restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum Event {
	/// The user picked File → New File in the application menu.
	#[serde(rename = "menu.newFile")]
	MenuNewFile,
	/// The user requested a save from the application menu.
	#[serde(rename = "menu.save")]
	MenuSave,
	/// A file was opened outside the UI (menu or OS association).
	#[serde(rename = "file.opened")]
	FileOpened {
		/// Absolute path of the opened file.
		path: String,
		/// Its UTF-8 content at open time.
		content: String,
	},
	/// A folder was opened outside the UI.
	#[serde(rename = "folder.opened")]
	FolderOpened {
		/// Absolute path of the opened folder.
		path: String,
	},
}

impl Event {
	/// The kind used for subscription routing.
	#[must_use]
	pub const fn kind(&self) -> EventKind {
		match self {
			Self::MenuNewFile => EventKind::MenuNewFile,
			Self::MenuSave => EventKind::MenuSave,
			Self::FileOpened { .. } => EventKind::FileOpened,
			Self::FolderOpened { .. } => EventKind::FolderOpened,
		}
	}
}

/// Subscription key for one event variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// `menu.newFile`
	MenuNewFile,
	/// `menu.save`
	MenuSave,
	/// `file.opened`
	FileOpened,
	/// `folder.opened`
	FolderOpened,
}

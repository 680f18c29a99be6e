//! The fixed operation set the UI layer programs against.

use async_trait::async_trait;
use quill_wire::ops::{
	DialogSelection, DirListing, ExecOutput, FileContent, FileTree, GitCommitOutput, GitStatusSummary, ProjectInfo,
	WorkingDir, WrittenFile,
};
use quill_wire::{EventKind, HostError};

use crate::events::EventStream;

/// Everything the UI can do, and nothing else.
///
/// The UI layer takes this as an explicit dependency (`Arc<dyn Surface>`)
/// so tests can substitute a fake; there is no process-wide bridge
/// singleton. The set of methods is fixed: it mirrors the wire catalog
/// one-to-one and cannot be extended from the UI side.
#[async_trait]
pub trait Surface: Send + Sync {
	/// `window.minimize`
	async fn minimize_window(&self) -> Result<(), HostError>;
	/// `window.maximize`
	async fn maximize_window(&self) -> Result<(), HostError>;
	/// `window.close`
	async fn close_window(&self) -> Result<(), HostError>;

	/// `dialog.openFile`
	async fn open_file_dialog(&self) -> Result<DialogSelection, HostError>;
	/// `dialog.openFolder`
	async fn open_folder_dialog(&self) -> Result<DialogSelection, HostError>;

	/// `fs.readFile`
	async fn read_file(&self, path: &str) -> Result<FileContent, HostError>;
	/// `fs.writeFile`
	///
	/// Concurrent writes to the same path are last-writer-wins; the bridge
	/// does not serialize them.
	async fn write_file(&self, path: &str, content: &str) -> Result<WrittenFile, HostError>;
	/// `fs.readDir`
	async fn read_dir(&self, path: &str) -> Result<DirListing, HostError>;
	/// `fs.readDirRecursive`
	async fn read_dir_recursive(&self, path: &str, depth: Option<u32>) -> Result<FileTree, HostError>;

	/// `shell.exec`
	async fn exec(&self, command: &str, cwd: Option<&str>) -> Result<ExecOutput, HostError>;
	/// `shell.pwd`
	async fn pwd(&self, cwd: Option<&str>) -> Result<WorkingDir, HostError>;
	/// `shell.openExternal`
	async fn open_external(&self, url: &str) -> Result<(), HostError>;

	/// `git.status`
	async fn git_status(&self, cwd: &str) -> Result<GitStatusSummary, HostError>;
	/// `git.commit`
	async fn git_commit(&self, cwd: &str, message: &str) -> Result<GitCommitOutput, HostError>;

	/// `project.detect`
	async fn detect_project(&self, path: &str) -> Result<ProjectInfo, HostError>;

	/// Subscribes to one event kind; dropping the stream unsubscribes.
	fn subscribe(&self, kind: EventKind) -> EventStream;
}

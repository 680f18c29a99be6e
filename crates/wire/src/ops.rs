//! The closed operation catalog and its typed argument/payload records.
//!
//! Field names on the wire are camelCase (`isDirectory`, `exitCode`, …)
//! because the UI layer consumes the reply objects verbatim.

use serde::{Deserialize, Serialize};

/// One invocation request, tagged with its stable dotted operation id.
///
/// Serializes as `"op": "<namespace.verb>"` plus an `"args"` object for
/// operations that take arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args")]
pub enum OpRequest {
	/// `window.minimize` — minimize the application window.
	#[serde(rename = "window.minimize")]
	WindowMinimize,
	/// `window.maximize` — maximize the window, or restore it if already
	/// maximized.
	#[serde(rename = "window.maximize")]
	WindowMaximize,
	/// `window.close` — close the application window.
	#[serde(rename = "window.close")]
	WindowClose,
	/// `dialog.openFile` — native open-file dialog.
	#[serde(rename = "dialog.openFile")]
	DialogOpenFile,
	/// `dialog.openFolder` — native open-folder dialog.
	#[serde(rename = "dialog.openFolder")]
	DialogOpenFolder,
	/// `fs.readFile` — read a UTF-8 file.
	#[serde(rename = "fs.readFile")]
	FsReadFile(ReadFileArgs),
	/// `fs.writeFile` — write a UTF-8 file, creating parent directories.
	#[serde(rename = "fs.writeFile")]
	FsWriteFile(WriteFileArgs),
	/// `fs.readDir` — flat directory listing.
	#[serde(rename = "fs.readDir")]
	FsReadDir(ReadDirArgs),
	/// `fs.readDirRecursive` — bounded-depth directory tree.
	#[serde(rename = "fs.readDirRecursive")]
	FsReadDirRecursive(ReadDirRecursiveArgs),
	/// `shell.exec` — run a command under the user's shell.
	#[serde(rename = "shell.exec")]
	ShellExec(ExecArgs),
	/// `shell.pwd` — resolve a working directory.
	#[serde(rename = "shell.pwd")]
	ShellPwd(PwdArgs),
	/// `shell.openExternal` — open an allow-listed URL externally.
	#[serde(rename = "shell.openExternal")]
	ShellOpenExternal(OpenExternalArgs),
	/// `git.status` — porcelain status of the repository at cwd.
	#[serde(rename = "git.status")]
	GitStatus(GitStatusArgs),
	/// `git.commit` — stage everything and commit.
	#[serde(rename = "git.commit")]
	GitCommit(GitCommitArgs),
	/// `project.detect` — manifest-sniffing project classification.
	#[serde(rename = "project.detect")]
	ProjectDetect(DetectArgs),
}

impl OpRequest {
	/// Stable dotted id of this operation.
	#[must_use]
	pub const fn id(&self) -> &'static str {
		match self {
			Self::WindowMinimize => "window.minimize",
			Self::WindowMaximize => "window.maximize",
			Self::WindowClose => "window.close",
			Self::DialogOpenFile => "dialog.openFile",
			Self::DialogOpenFolder => "dialog.openFolder",
			Self::FsReadFile(_) => "fs.readFile",
			Self::FsWriteFile(_) => "fs.writeFile",
			Self::FsReadDir(_) => "fs.readDir",
			Self::FsReadDirRecursive(_) => "fs.readDirRecursive",
			Self::ShellExec(_) => "shell.exec",
			Self::ShellPwd(_) => "shell.pwd",
			Self::ShellOpenExternal(_) => "shell.openExternal",
			Self::GitStatus(_) => "git.status",
			Self::GitCommit(_) => "git.commit",
			Self::ProjectDetect(_) => "project.detect",
		}
	}
}

/// Arguments for `fs.readFile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFileArgs {
	/// Untrusted path; the host validates it before reading.
	pub path: String,
}

/// Arguments for `fs.writeFile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteFileArgs {
	/// Target path; relative paths resolve against the workspace root.
	pub path: String,
	/// Full file content.
	pub content: String,
}

/// Arguments for `fs.readDir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadDirArgs {
	/// Directory to list.
	pub path: String,
}

/// Arguments for `fs.readDirRecursive`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadDirRecursiveArgs {
	/// Root of the traversal.
	pub path: String,
	/// Maximum depth; omitted means the host default, and the host clamps
	/// it to its configured ceiling either way.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub depth: Option<u32>,
}

/// Arguments for `shell.exec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecArgs {
	/// Command line, run via `$SHELL -c`.
	pub command: String,
	/// Working directory; omitted means the workspace root.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cwd: Option<String>,
}

/// Arguments for `shell.pwd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwdArgs {
	/// Directory to resolve; omitted means the workspace root.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cwd: Option<String>,
}

/// Arguments for `shell.openExternal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenExternalArgs {
	/// URL; only `http`, `https` and `mailto` schemes are accepted.
	pub url: String,
}

/// Arguments for `git.status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitStatusArgs {
	/// Repository working directory.
	pub cwd: String,
}

/// Arguments for `git.commit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitCommitArgs {
	/// Repository working directory.
	pub cwd: String,
	/// Commit message; must be non-blank.
	pub message: String,
}

/// Arguments for `project.detect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectArgs {
	/// Directory whose manifests are inspected.
	pub path: String,
}

/// Empty payload for operations that only acknowledge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {}

/// Payload of `dialog.openFile` / `dialog.openFolder`.
///
/// `path` is absent when the user cancelled; cancellation is not a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSelection {
	/// Chosen path, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,
}

/// Payload of `fs.readFile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
	/// UTF-8 file content.
	pub content: String,
}

/// Payload of `fs.writeFile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenFile {
	/// Absolute path the content landed at.
	pub path: String,
}

/// One entry of a flat `fs.readDir` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirEntry {
	/// File name without the directory prefix.
	pub name: String,
	/// Full path.
	pub path: String,
	/// Whether this entry is a directory.
	pub is_directory: bool,
}

/// Payload of `fs.readDir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirListing {
	/// Entries in directory order as returned by the OS.
	pub files: Vec<DirEntry>,
}

/// One node of a recursive `fs.readDirRecursive` tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
	/// File name without the directory prefix.
	pub name: String,
	/// Full path.
	pub path: String,
	/// Whether this node is a directory.
	pub is_directory: bool,
	/// Children, present only on directories.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub children: Option<Vec<FileNode>>,
}

/// Payload of `fs.readDirRecursive`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTree {
	/// Top-level nodes, directories first, then by name.
	pub files: Vec<FileNode>,
}

/// Payload of `shell.exec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecOutput {
	/// Captured stdout, truncated at the host's output cap.
	pub stdout: String,
	/// Captured stderr, truncated at the host's output cap.
	pub stderr: String,
	/// Process exit code.
	pub exit_code: i32,
	/// Working directory the command ran in.
	pub cwd: String,
}

/// Payload of `shell.pwd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDir {
	/// Canonicalized working directory.
	pub cwd: String,
}

/// One entry of a `git.status` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitFileStatus {
	/// Two-letter porcelain status, trimmed.
	pub status: String,
	/// Path relative to the repository root.
	pub path: String,
}

/// Payload of `git.status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitStatusSummary {
	/// Changed files in porcelain order.
	pub files: Vec<GitFileStatus>,
}

/// Payload of `git.commit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitCommitOutput {
	/// Raw stdout of the commit command.
	pub output: String,
}

/// Payload of `project.detect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
	/// Best-effort classification (`node`, `python`, `rust`, …, or
	/// `unknown`). Unknown is a successful outcome, not a failure.
	pub project_type: String,
	/// Detected package manager, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub package_manager: Option<String>,
	/// Detected framework, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub framework: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn request_with_args_uses_dotted_tag() {
		let op = OpRequest::FsReadFile(ReadFileArgs { path: "/tmp/a.txt".into() });
		let json = serde_json::to_value(&op).unwrap();
		assert_eq!(json["op"], "fs.readFile");
		assert_eq!(json["args"]["path"], "/tmp/a.txt");
	}

	#[test]
	fn unit_request_carries_no_args() {
		let json = serde_json::to_value(OpRequest::WindowMinimize).unwrap();
		assert_eq!(json, serde_json::json!({ "op": "window.minimize" }));
	}

	#[test]
	fn payload_fields_are_camel_case() {
		let out = ExecOutput {
			stdout: "hi\n".into(),
			stderr: String::new(),
			exit_code: 0,
			cwd: "/tmp".into(),
		};
		let json = serde_json::to_value(&out).unwrap();
		assert_eq!(json["exitCode"], 0);

		let entry = DirEntry {
			name: "src".into(),
			path: "/p/src".into(),
			is_directory: true,
		};
		assert_eq!(serde_json::to_value(&entry).unwrap()["isDirectory"], true);
	}

	#[test]
	fn optional_depth_round_trips() {
		let op = OpRequest::FsReadDirRecursive(ReadDirRecursiveArgs {
			path: "/p".into(),
			depth: None,
		});
		let json = serde_json::to_string(&op).unwrap();
		let back: OpRequest = serde_json::from_str(&json).unwrap();
		assert_eq!(back, op);
	}
}

//! Host configuration.
//!
//! Every knob here is read once at startup and never mutated afterwards;
//! handlers see the config through a shared reference on the context.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default `shell.exec` deadline.
const DEFAULT_EXEC_TIMEOUT_MS: u64 = 30_000;
/// Default per-stream capture cap for `shell.exec` (10 MiB).
const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;
/// Default `fs.readDirRecursive` depth when the caller omits one.
const DEFAULT_TREE_DEPTH: u32 = 3;
/// Hard ceiling on `fs.readDirRecursive` depth regardless of the caller.
const DEFAULT_MAX_TREE_DEPTH: u32 = 8;

/// Errors that can occur when loading host configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Process-wide host settings, read-only after startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct HostConfig {
	/// `shell.exec` deadline in milliseconds; on expiry the child is killed
	/// and the call fails with `Timeout`.
	pub exec_timeout_ms: u64,
	/// Per-stream capture cap for `shell.exec`; output past the cap is
	/// truncated, not an error.
	pub max_output_bytes: usize,
	/// Depth used by `fs.readDirRecursive` when the caller omits one.
	pub default_tree_depth: u32,
	/// Ceiling the caller-supplied depth is clamped to.
	pub max_tree_depth: u32,
	/// Directory names skipped by recursive listings.
	pub skip_dirs: Vec<String>,
	/// Root that relative paths and missing cwd arguments resolve against.
	/// Defaults to the host process working directory.
	pub workspace_root: Option<PathBuf>,
}

impl Default for HostConfig {
	fn default() -> Self {
		Self {
			exec_timeout_ms: DEFAULT_EXEC_TIMEOUT_MS,
			max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
			default_tree_depth: DEFAULT_TREE_DEPTH,
			max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
			skip_dirs: ["node_modules", ".git", "dist", "build", "__pycache__", ".venv"]
				.map(String::from)
				.to_vec(),
			workspace_root: None,
		}
	}
}

impl HostConfig {
	/// Parses a TOML document, filling unset fields with defaults.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Loads configuration from a file.
	pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	/// `shell.exec` deadline as a [`Duration`].
	#[must_use]
	pub const fn exec_timeout(&self) -> Duration {
		Duration::from_millis(self.exec_timeout_ms)
	}

	/// Resolves the effective workspace root.
	#[must_use]
	pub fn resolved_root(&self) -> PathBuf {
		self.workspace_root
			.clone()
			.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")))
	}

	/// Clamps a caller-supplied recursion depth to the configured ceiling.
	#[must_use]
	pub fn clamp_depth(&self, requested: Option<u32>) -> u32 {
		requested.unwrap_or(self.default_tree_depth).min(self.max_tree_depth)
	}
}

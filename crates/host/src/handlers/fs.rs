//! Filesystem operations.
//!
//! Paths are untrusted input: existence and type are checked before use,
//! and the recursive listing bounds its depth and breaks symlink cycles by
//! tracking visited canonical paths. Concurrent writes to the same path are
//! last-writer-wins at the filesystem level; the bridge does not serialize
//! them.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use quill_wire::HostError;
use quill_wire::ops::{
	DirEntry, DirListing, FileContent, FileNode, FileTree, ReadDirArgs, ReadDirRecursiveArgs, ReadFileArgs,
	WriteFileArgs, WrittenFile,
};

use super::{require_dir, require_file};
use crate::context::HostContext;

/// `fs.readFile`
pub async fn read_file(ctx: &HostContext, args: ReadFileArgs) -> Result<FileContent, HostError> {
	let path = ctx.resolve_path(&args.path);
	require_file(&path).await?;
	let content = tokio::fs::read_to_string(&path)
		.await
		.map_err(|e| HostError::from_io(&path, &e))?;
	Ok(FileContent { content })
}

/// `fs.writeFile`
///
/// Relative paths resolve against the workspace root; missing parent
/// directories are created.
pub async fn write_file(ctx: &HostContext, args: WriteFileArgs) -> Result<WrittenFile, HostError> {
	let path = ctx.resolve_path(&args.path);
	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		tokio::fs::create_dir_all(parent)
			.await
			.map_err(|e| HostError::from_io(parent, &e))?;
	}
	tokio::fs::write(&path, args.content.as_bytes())
		.await
		.map_err(|e| HostError::from_io(&path, &e))?;
	tracing::debug!(path = %path.display(), "file written");
	Ok(WrittenFile {
		path: path.display().to_string(),
	})
}

/// `fs.readDir`
pub async fn read_dir(ctx: &HostContext, args: ReadDirArgs) -> Result<DirListing, HostError> {
	let dir = ctx.resolve_path(&args.path);
	require_dir(&dir).await?;
	let mut rd = tokio::fs::read_dir(&dir).await.map_err(|e| HostError::from_io(&dir, &e))?;
	let mut files = Vec::new();
	while let Some(entry) = rd.next_entry().await.map_err(|e| HostError::from_io(&dir, &e))? {
		let is_directory = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
		files.push(DirEntry {
			name: entry.file_name().to_string_lossy().into_owned(),
			path: entry.path().display().to_string(),
			is_directory,
		});
	}
	Ok(DirListing { files })
}

/// `fs.readDirRecursive`
///
/// Depth is clamped to the configured ceiling. Well-known junk directories
/// are skipped, symlinked directories are descended at most once per
/// canonical target, and unreadable subdirectories yield empty children
/// rather than failing the whole listing.
pub async fn read_dir_recursive(ctx: &HostContext, args: ReadDirRecursiveArgs) -> Result<FileTree, HostError> {
	let root = ctx.resolve_path(&args.path);
	require_dir(&root).await?;
	let depth = ctx.config.clamp_depth(args.depth);

	let mut visited = HashSet::new();
	if let Ok(canon) = tokio::fs::canonicalize(&root).await {
		visited.insert(canon);
	}
	let files = walk(ctx, root, depth, &mut visited).await;
	Ok(FileTree { files })
}

fn walk<'a>(
	ctx: &'a HostContext,
	dir: PathBuf,
	depth: u32,
	visited: &'a mut HashSet<PathBuf>,
) -> Pin<Box<dyn Future<Output = Vec<FileNode>> + Send + 'a>> {
	Box::pin(async move {
		if depth == 0 {
			return Vec::new();
		}
		let Ok(mut rd) = tokio::fs::read_dir(&dir).await else {
			return Vec::new();
		};

		let mut nodes = Vec::new();
		while let Ok(Some(entry)) = rd.next_entry().await {
			let name = entry.file_name().to_string_lossy().into_owned();
			if ctx.config.skip_dirs.iter().any(|d| d == &name) {
				continue;
			}
			let path = entry.path();
			// metadata() follows symlinks, so a link to a directory is
			// listed as one; the visited set stops cycles.
			let is_directory = tokio::fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false);

			let children = if is_directory {
				match descend(&path, visited).await {
					Descend::Recurse => Some(walk(ctx, path.clone(), depth - 1, visited).await),
					Descend::AlreadyVisited => Some(Vec::new()),
				}
			} else {
				None
			};

			nodes.push(FileNode {
				name,
				path: path.display().to_string(),
				is_directory,
				children,
			});
		}

		nodes.sort_by(|a, b| {
			b.is_directory
				.cmp(&a.is_directory)
				.then_with(|| a.name.cmp(&b.name))
		});
		nodes
	})
}

enum Descend {
	Recurse,
	AlreadyVisited,
}

async fn descend(path: &Path, visited: &mut HashSet<PathBuf>) -> Descend {
	match tokio::fs::canonicalize(path).await {
		Ok(canon) => {
			if visited.insert(canon) {
				Descend::Recurse
			} else {
				Descend::AlreadyVisited
			}
		}
		// Canonicalization failing means the target is gone; nothing to
		// descend into.
		Err(_) => Descend::AlreadyVisited,
	}
}

#[cfg(test)]
mod tests {
	use quill_wire::ErrorKind;

	use super::*;
	use crate::config::HostConfig;

	fn ctx() -> HostContext {
		HostContext::headless(HostConfig::default())
	}

	#[tokio::test]
	async fn read_missing_file_is_not_found_with_contract_message() {
		let err = read_file(
			&ctx(),
			ReadFileArgs {
				path: "/tmp/missing.txt".into(),
			},
		)
		.await
		.unwrap_err();
		assert_eq!(err.to_string(), "NotFound: /tmp/missing.txt does not exist");
	}

	#[tokio::test]
	async fn read_directory_as_file_is_invalid_argument() {
		let tmp = tempfile::tempdir().unwrap();
		let err = read_file(
			&ctx(),
			ReadFileArgs {
				path: tmp.path().display().to_string(),
			},
		)
		.await
		.unwrap_err();
		assert_eq!(err.kind, ErrorKind::InvalidArgument);
	}

	#[tokio::test]
	async fn write_then_read_returns_written_content() {
		let tmp = tempfile::tempdir().unwrap();
		let target = tmp.path().join("nested/dir/out.txt");
		let ctx = ctx();
		let written = write_file(
			&ctx,
			WriteFileArgs {
				path: target.display().to_string(),
				content: "hello".into(),
			},
		)
		.await
		.unwrap();
		let read = read_file(&ctx, ReadFileArgs { path: written.path }).await.unwrap();
		assert_eq!(read.content, "hello");
	}

	#[tokio::test]
	async fn relative_write_resolves_against_workspace_root() {
		let tmp = tempfile::tempdir().unwrap();
		let ctx = HostContext::headless(HostConfig {
			workspace_root: Some(tmp.path().to_path_buf()),
			..HostConfig::default()
		});
		let written = write_file(
			&ctx,
			WriteFileArgs {
				path: "notes.txt".into(),
				content: "x".into(),
			},
		)
		.await
		.unwrap();
		assert!(written.path.starts_with(&tmp.path().display().to_string()));
	}

	#[tokio::test]
	async fn flat_listing_reports_types() {
		let tmp = tempfile::tempdir().unwrap();
		tokio::fs::create_dir(tmp.path().join("sub")).await.unwrap();
		tokio::fs::write(tmp.path().join("a.txt"), "x").await.unwrap();
		let listing = read_dir(
			&ctx(),
			ReadDirArgs {
				path: tmp.path().display().to_string(),
			},
		)
		.await
		.unwrap();
		assert_eq!(listing.files.len(), 2);
		let sub = listing.files.iter().find(|f| f.name == "sub").unwrap();
		assert!(sub.is_directory);
	}

	#[tokio::test]
	async fn recursive_listing_sorts_and_skips() {
		let tmp = tempfile::tempdir().unwrap();
		tokio::fs::create_dir(tmp.path().join("node_modules")).await.unwrap();
		tokio::fs::create_dir(tmp.path().join("src")).await.unwrap();
		tokio::fs::write(tmp.path().join("src/main.rs"), "").await.unwrap();
		tokio::fs::write(tmp.path().join("a.txt"), "").await.unwrap();

		let tree = read_dir_recursive(
			&ctx(),
			ReadDirRecursiveArgs {
				path: tmp.path().display().to_string(),
				depth: None,
			},
		)
		.await
		.unwrap();

		let names: Vec<_> = tree.files.iter().map(|n| n.name.as_str()).collect();
		assert_eq!(names, ["src", "a.txt"], "directories first, junk skipped");
		let src = &tree.files[0];
		assert_eq!(src.children.as_ref().unwrap()[0].name, "main.rs");
	}

	#[tokio::test]
	async fn depth_zero_yields_empty_tree() {
		let tmp = tempfile::tempdir().unwrap();
		tokio::fs::write(tmp.path().join("a.txt"), "").await.unwrap();
		let tree = read_dir_recursive(
			&ctx(),
			ReadDirRecursiveArgs {
				path: tmp.path().display().to_string(),
				depth: Some(0),
			},
		)
		.await
		.unwrap();
		assert!(tree.files.is_empty());
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn symlink_cycle_terminates() {
		let tmp = tempfile::tempdir().unwrap();
		let inner = tmp.path().join("inner");
		tokio::fs::create_dir(&inner).await.unwrap();
		std::os::unix::fs::symlink(tmp.path(), inner.join("loop")).unwrap();

		let tree = read_dir_recursive(
			&ctx(),
			ReadDirRecursiveArgs {
				path: tmp.path().display().to_string(),
				depth: Some(8),
			},
		)
		.await
		.unwrap();

		// The link back to the root is listed but not descended into.
		let inner_node = tree.files.iter().find(|n| n.name == "inner").unwrap();
		let loop_node = inner_node
			.children
			.as_ref()
			.unwrap()
			.iter()
			.find(|n| n.name == "loop")
			.unwrap();
		assert!(loop_node.is_directory);
		assert_eq!(loop_node.children.as_deref(), Some(&[][..]));
	}
}

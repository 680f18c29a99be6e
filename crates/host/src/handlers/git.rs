//! Version-control queries via the external `git` binary.
//!
//! Absence of the binary is `Unavailable`; absence of a repository at the
//! working directory is `NotFound`. Both are clean failures the UI keeps
//! running through, never crashes.

use std::path::Path;
use std::process::Stdio;

use quill_wire::ops::{GitCommitArgs, GitCommitOutput, GitFileStatus, GitStatusArgs, GitStatusSummary};
use quill_wire::{ErrorKind, HostError};

use super::require_dir;
use crate::context::HostContext;

/// `git.status`
pub async fn status(ctx: &HostContext, args: GitStatusArgs) -> Result<GitStatusSummary, HostError> {
	let cwd = ctx.resolve_cwd(Some(&args.cwd));
	require_dir(&cwd).await?;
	let output = run_git(ctx, &cwd, &["status", "--porcelain"]).await?;
	if !output.status.success() {
		return Err(classify_git_failure(&cwd, &output));
	}
	let stdout = String::from_utf8_lossy(&output.stdout);
	Ok(GitStatusSummary {
		files: parse_porcelain(&stdout),
	})
}

/// `git.commit`
///
/// Stages everything, then commits. An empty message or an empty index is
/// `InvalidArgument`, not a hard failure.
pub async fn commit(ctx: &HostContext, args: GitCommitArgs) -> Result<GitCommitOutput, HostError> {
	if args.message.trim().is_empty() {
		return Err(HostError::invalid("empty commit message"));
	}
	let cwd = ctx.resolve_cwd(Some(&args.cwd));
	require_dir(&cwd).await?;

	let add = run_git(ctx, &cwd, &["add", "."]).await?;
	if !add.status.success() {
		return Err(classify_git_failure(&cwd, &add));
	}

	let commit = run_git(ctx, &cwd, &["commit", "-m", &args.message]).await?;
	if !commit.status.success() {
		return Err(classify_git_failure(&cwd, &commit));
	}
	Ok(GitCommitOutput {
		output: String::from_utf8_lossy(&commit.stdout).into_owned(),
	})
}

async fn run_git(ctx: &HostContext, cwd: &Path, args: &[&str]) -> Result<std::process::Output, HostError> {
	let git = which::which("git").map_err(|_| HostError::unavailable("git binary not found on PATH"))?;
	let mut cmd = tokio::process::Command::new(git);
	cmd.args(args)
		.current_dir(cwd)
		.stdin(Stdio::null())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.kill_on_drop(true);

	// kill_on_drop reaps the child if the deadline fires and the output
	// future is dropped.
	match tokio::time::timeout(ctx.config.exec_timeout(), cmd.output()).await {
		Ok(Ok(output)) => Ok(output),
		Ok(Err(e)) => Err(HostError::unknown(format!("failed to run git: {e}"))),
		Err(_) => Err(HostError::new(
			ErrorKind::Timeout,
			format!("git timed out after {}ms", ctx.config.exec_timeout_ms),
		)),
	}
}

fn classify_git_failure(cwd: &Path, output: &std::process::Output) -> HostError {
	let stderr = String::from_utf8_lossy(&output.stderr);
	let stdout = String::from_utf8_lossy(&output.stdout);
	let combined = format!("{stdout}{stderr}");
	let lower = combined.to_lowercase();
	if lower.contains("not a git repository") {
		return HostError::new(ErrorKind::NotFound, format!("no git repository at {}", cwd.display()));
	}
	if lower.contains("nothing to commit") || lower.contains("nothing added to commit") {
		return HostError::invalid("nothing to commit");
	}
	HostError::unknown(combined.trim().to_string())
}

fn parse_porcelain(stdout: &str) -> Vec<GitFileStatus> {
	stdout
		.lines()
		.filter(|line| line.len() > 3)
		.map(|line| GitFileStatus {
			status: line[..2].trim().to_string(),
			path: line[3..].to_string(),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::HostConfig;

	fn ctx() -> HostContext {
		HostContext::headless(HostConfig::default())
	}

	fn git_present() -> bool {
		which::which("git").is_ok()
	}

	#[test]
	fn porcelain_parsing() {
		let parsed = parse_porcelain(" M src/lib.rs\n?? notes.txt\n");
		assert_eq!(parsed.len(), 2);
		assert_eq!(parsed[0].status, "M");
		assert_eq!(parsed[0].path, "src/lib.rs");
		assert_eq!(parsed[1].status, "??");
		assert_eq!(parsed[1].path, "notes.txt");
	}

	#[tokio::test]
	async fn status_outside_a_repository_is_not_found() {
		if !git_present() {
			return;
		}
		let tmp = tempfile::tempdir().unwrap();
		let err = status(
			&ctx(),
			GitStatusArgs {
				cwd: tmp.path().display().to_string(),
			},
		)
		.await
		.unwrap_err();
		assert_eq!(err.kind, ErrorKind::NotFound);
		assert!(err.message.contains("no git repository"));
	}

	#[tokio::test]
	async fn empty_commit_message_is_invalid_argument() {
		let tmp = tempfile::tempdir().unwrap();
		let err = commit(
			&ctx(),
			GitCommitArgs {
				cwd: tmp.path().display().to_string(),
				message: "  ".into(),
			},
		)
		.await
		.unwrap_err();
		assert_eq!(err.kind, ErrorKind::InvalidArgument);
	}

	#[tokio::test]
	async fn status_in_fresh_repository_lists_untracked() {
		if !git_present() {
			return;
		}
		let tmp = tempfile::tempdir().unwrap();
		let run = |args: &[&str]| {
			std::process::Command::new("git")
				.args(args)
				.current_dir(tmp.path())
				.output()
				.unwrap()
		};
		assert!(run(&["init", "-q"]).status.success());
		std::fs::write(tmp.path().join("new.txt"), "x").unwrap();

		let summary = status(
			&ctx(),
			GitStatusArgs {
				cwd: tmp.path().display().to_string(),
			},
		)
		.await
		.unwrap();
		assert_eq!(summary.files.len(), 1);
		assert_eq!(summary.files[0].status, "??");
		assert_eq!(summary.files[0].path, "new.txt");
	}
}

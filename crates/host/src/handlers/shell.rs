//! Shell execution, working-directory resolution and external URL opening.

use std::process::Stdio;

use quill_wire::HostError;
use quill_wire::ops::{Ack, ExecArgs, ExecOutput, OpenExternalArgs, PwdArgs, WorkingDir};
use tokio::io::{AsyncRead, AsyncReadExt};
use url::Url;

use super::require_dir;
use crate::context::HostContext;

/// Schemes `shell.openExternal` will hand to the OS. Anything else —
/// `javascript:`, `file:`, custom handlers — is rejected outright.
const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// `shell.exec`
///
/// Runs the command under `$SHELL -c` (falling back to `/bin/sh`), captures
/// stdout/stderr up to the configured cap and enforces the configured
/// deadline: on expiry the child is killed and the call fails `Timeout`.
/// Exit status 1 still counts as success — line-filter tools use it for
/// "no matches" — while anything above is a failure carrying the status.
pub async fn exec(ctx: &HostContext, args: ExecArgs) -> Result<ExecOutput, HostError> {
	if args.command.trim().is_empty() {
		return Err(HostError::invalid("empty command"));
	}
	let cwd = ctx.resolve_cwd(args.cwd.as_deref());
	require_dir(&cwd).await?;

	let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".into());
	let mut child = tokio::process::Command::new(&shell)
		.arg("-c")
		.arg(&args.command)
		.current_dir(&cwd)
		.stdin(Stdio::null())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.kill_on_drop(true)
		.spawn()
		.map_err(|e| match e.kind() {
			std::io::ErrorKind::NotFound => HostError::unavailable(format!("shell {shell} not found")),
			_ => HostError::unknown(format!("failed to spawn {shell}: {e}")),
		})?;

	let stdout = child.stdout.take().ok_or_else(|| HostError::unknown("stdout not piped"))?;
	let stderr = child.stderr.take().ok_or_else(|| HostError::unknown("stderr not piped"))?;
	let cap = ctx.config.max_output_bytes;

	let run = async {
		let (out, err) = tokio::join!(read_capped(stdout, cap), read_capped(stderr, cap));
		let status = child.wait().await;
		(out, err, status)
	};

	let (stdout, stderr, status) = match tokio::time::timeout(ctx.config.exec_timeout(), run).await {
		Ok(done) => done,
		Err(_) => {
			let _ = child.start_kill();
			let _ = child.wait().await;
			tracing::warn!(command = %args.command, timeout_ms = ctx.config.exec_timeout_ms, "command timed out");
			return Err(HostError::new(
				quill_wire::ErrorKind::Timeout,
				format!("command timed out after {}ms", ctx.config.exec_timeout_ms),
			));
		}
	};

	let status = status.map_err(|e| HostError::unknown(format!("failed to reap child: {e}")))?;
	let exit_code = status.code().unwrap_or(-1);
	tracing::debug!(command = %args.command, exit_code, "command completed");

	if exit_code > 1 {
		let tail = stderr.lines().last().unwrap_or("").trim();
		return Err(HostError::unknown(format!("command exited with status {exit_code}: {tail}")));
	}

	Ok(ExecOutput {
		stdout,
		stderr,
		exit_code,
		cwd: cwd.display().to_string(),
	})
}

/// Reads a stream up to `cap` bytes, then drains the remainder so the
/// child never blocks on a full pipe.
async fn read_capped(mut stream: impl AsyncRead + Unpin, cap: usize) -> String {
	let mut buf = Vec::new();
	let _ = (&mut stream).take(cap as u64).read_to_end(&mut buf).await;
	let _ = tokio::io::copy(&mut stream, &mut tokio::io::sink()).await;
	String::from_utf8_lossy(&buf).into_owned()
}

/// `shell.pwd`
pub async fn pwd(ctx: &HostContext, args: PwdArgs) -> Result<WorkingDir, HostError> {
	let cwd = ctx.resolve_cwd(args.cwd.as_deref());
	let canonical = tokio::fs::canonicalize(&cwd)
		.await
		.map_err(|e| HostError::from_io(&cwd, &e))?;
	Ok(WorkingDir {
		cwd: canonical.display().to_string(),
	})
}

/// `shell.openExternal`
///
/// Validation happens here; actually launching the handler is delegated to
/// the platform seam so this path can never run an arbitrary local command.
pub async fn open_external(ctx: &HostContext, args: OpenExternalArgs) -> Result<Ack, HostError> {
	let url = Url::parse(&args.url).map_err(|e| HostError::invalid(format!("malformed URL {:?}: {e}", args.url)))?;
	if !ALLOWED_SCHEMES.contains(&url.scheme()) {
		return Err(HostError::invalid(format!(
			"scheme {:?} is not allowed (expected one of {})",
			url.scheme(),
			ALLOWED_SCHEMES.join(", ")
		)));
	}
	ctx.system.open_external(&url).await?;
	Ok(Ack {})
}

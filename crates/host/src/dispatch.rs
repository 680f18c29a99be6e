//! Maps one decoded request onto its handler and seals the outcome into a
//! reply body. Nothing past this point can observe a handler fault as
//! anything but a `Failed` reply.

use std::sync::Arc;

use quill_wire::envelope::ReplyBody;
use quill_wire::{HostError, OpRequest};

use crate::context::HostContext;
use crate::handlers::{fs, git, project, shell, ui};

/// Executes `op` against the context and returns the reply envelope body.
pub async fn handle(ctx: Arc<HostContext>, op: OpRequest) -> ReplyBody {
	let op_id = op.id();
	let reply = match op {
		OpRequest::WindowMinimize => seal(ui::minimize(&ctx).await),
		OpRequest::WindowMaximize => seal(ui::maximize(&ctx).await),
		OpRequest::WindowClose => seal(ui::close(&ctx).await),
		OpRequest::DialogOpenFile => seal(ui::open_file(&ctx).await),
		OpRequest::DialogOpenFolder => seal(ui::open_folder(&ctx).await),
		OpRequest::FsReadFile(args) => seal(fs::read_file(&ctx, args).await),
		OpRequest::FsWriteFile(args) => seal(fs::write_file(&ctx, args).await),
		OpRequest::FsReadDir(args) => seal(fs::read_dir(&ctx, args).await),
		OpRequest::FsReadDirRecursive(args) => seal(fs::read_dir_recursive(&ctx, args).await),
		OpRequest::ShellExec(args) => seal(shell::exec(&ctx, args).await),
		OpRequest::ShellPwd(args) => seal(shell::pwd(&ctx, args).await),
		OpRequest::ShellOpenExternal(args) => seal(shell::open_external(&ctx, args).await),
		OpRequest::GitStatus(args) => seal(git::status(&ctx, args).await),
		OpRequest::GitCommit(args) => seal(git::commit(&ctx, args).await),
		OpRequest::ProjectDetect(args) => seal(project::detect(&ctx, args).await),
	};
	if let ReplyBody::Failed(err) = &reply {
		tracing::debug!(op = op_id, error = %err, "operation failed");
	}
	reply
}

fn seal<T: serde::Serialize>(result: Result<T, HostError>) -> ReplyBody {
	match result {
		Ok(payload) => ReplyBody::ok(&payload),
		Err(err) => ReplyBody::Failed(err),
	}
}

#[cfg(test)]
mod tests {
	use quill_wire::ops::ReadFileArgs;

	use super::*;
	use crate::config::HostConfig;

	#[tokio::test]
	async fn failure_is_sealed_into_the_envelope() {
		let ctx = Arc::new(HostContext::headless(HostConfig::default()));
		let reply = handle(
			ctx,
			OpRequest::FsReadFile(ReadFileArgs {
				path: "/tmp/missing.txt".into(),
			}),
		)
		.await;
		assert_eq!(
			reply.to_value(),
			serde_json::json!({
				"success": false,
				"error": "NotFound: /tmp/missing.txt does not exist",
			})
		);
	}
}

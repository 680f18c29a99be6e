//! Stdio entry point for the host process.
//!
//! The UI process spawns this binary and speaks the framed protocol over
//! its stdin/stdout; logs go to stderr so they never corrupt the stream.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use quill_host::{HostConfig, HostContext};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "quill-host", about = "Privileged host process for the Quill editor")]
struct Args {
	/// Path to a TOML config file; defaults apply when omitted.
	#[arg(long)]
	config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.init();

	let args = Args::parse();
	let config = match &args.config {
		Some(path) => HostConfig::load(path).with_context(|| format!("loading config from {}", path.display()))?,
		None => HostConfig::default(),
	};

	let ctx = Arc::new(HostContext::headless(config));
	tracing::info!(root = %ctx.config.resolved_root().display(), "host ready");

	quill_host::run_host(ctx, tokio::io::stdin(), tokio::io::stdout())
		.await
		.context("bridge transport failed")?;
	Ok(())
}

//! End-to-end tests: a real host pump and a real bridge talking over an
//! in-memory duplex transport, exactly as they would over stdio pipes.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use quill_bridge::{Bridge, Surface};
use quill_host::{DialogOps, Headless, HostConfig, HostContext, SystemOps};
use quill_wire::{ErrorKind, Event, EventKind, HostError};
use url::Url;

fn headless_ctx() -> Arc<HostContext> {
	Arc::new(HostContext::headless(HostConfig::default()))
}

/// Spawns a host serving `ctx` and returns a connected bridge plus the
/// host task handle.
fn connect(ctx: Arc<HostContext>) -> (Bridge, tokio::task::JoinHandle<()>) {
	let (ui_side, host_side) = tokio::io::duplex(64 * 1024);
	let (ui_read, ui_write) = tokio::io::split(ui_side);
	let (host_read, host_write) = tokio::io::split(host_side);
	let host = tokio::spawn(async move {
		let _ = quill_host::run_host(ctx, host_read, host_write).await;
	});
	(Bridge::connect(ui_read, ui_write), host)
}

#[tokio::test]
async fn missing_file_returns_the_contract_error_string() {
	let (bridge, _host) = connect(headless_ctx());
	let err = bridge.read_file("/tmp/missing.txt").await.unwrap_err();
	assert_eq!(err.to_string(), "NotFound: /tmp/missing.txt does not exist");
	assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn echo_scenario_matches_the_contract() {
	let (bridge, _host) = connect(headless_ctx());
	let out = bridge.exec("echo hi", Some("/tmp")).await.unwrap();
	assert_eq!(out.stdout, "hi\n");
	assert_eq!(out.stderr, "");
	assert_eq!(out.exit_code, 0);
}

#[tokio::test]
async fn write_then_read_is_consistent() {
	let tmp = tempfile::tempdir().unwrap();
	let path = tmp.path().join("doc.md").display().to_string();
	let (bridge, _host) = connect(headless_ctx());

	bridge.write_file(&path, "# notes\n").await.unwrap();
	let read = bridge.read_file(&path).await.unwrap();
	assert_eq!(read.content, "# notes\n");
}

#[tokio::test]
async fn concurrent_requests_each_resolve_exactly_once() {
	let tmp = tempfile::tempdir().unwrap();
	let (bridge, _host) = connect(headless_ctx());

	// Seed distinct files, then read them all at once.
	for i in 0..32 {
		let path = tmp.path().join(format!("f{i}.txt"));
		tokio::fs::write(&path, format!("payload-{i}")).await.unwrap();
	}

	let mut tasks = Vec::new();
	for i in 0..32 {
		let bridge = bridge.clone();
		let path = tmp.path().join(format!("f{i}.txt")).display().to_string();
		tasks.push(tokio::spawn(async move { (i, bridge.read_file(&path).await) }));
	}

	for task in tasks {
		let (i, result) = task.await.unwrap();
		assert_eq!(result.unwrap().content, format!("payload-{i}"));
	}
}

#[tokio::test]
async fn slow_request_does_not_block_fast_one() {
	let (bridge, _host) = connect(headless_ctx());

	let slow = {
		let bridge = bridge.clone();
		tokio::spawn(async move { bridge.exec("sleep 1 && echo done", None).await })
	};
	// The quick call completes while the slow one is still running.
	let quick = tokio::time::timeout(std::time::Duration::from_millis(500), bridge.pwd(Some("/tmp")))
		.await
		.expect("quick call starved by slow one")
		.unwrap();
	assert!(!quick.cwd.is_empty());
	assert_eq!(slow.await.unwrap().unwrap().stdout, "done\n");
}

#[tokio::test]
async fn headless_window_ops_fail_unavailable() {
	let (bridge, _host) = connect(headless_ctx());
	let err = bridge.minimize_window().await.unwrap_err();
	assert_eq!(err.kind, ErrorKind::Unavailable);
}

#[derive(Default)]
struct RecordingSystem {
	opened: Mutex<Vec<String>>,
}

#[async_trait]
impl SystemOps for RecordingSystem {
	async fn open_external(&self, url: &Url) -> Result<(), HostError> {
		self.opened.lock().push(url.to_string());
		Ok(())
	}
}

#[tokio::test]
async fn url_allow_list_is_enforced_across_the_wire() {
	let system = Arc::new(RecordingSystem::default());
	let ctx = Arc::new(HostContext::new(
		HostConfig::default(),
		Arc::new(Headless),
		Arc::new(Headless),
		system.clone(),
	));
	let (bridge, _host) = connect(ctx);

	for url in ["javascript:alert(1)", "file:///etc/passwd"] {
		let err = bridge.open_external(url).await.unwrap_err();
		assert_eq!(err.kind, ErrorKind::InvalidArgument, "{url}");
	}
	bridge.open_external("https://example.com").await.unwrap();
	assert_eq!(system.opened.lock().as_slice(), ["https://example.com/"]);
}

#[tokio::test]
async fn git_status_outside_a_repo_fails_cleanly_and_bridge_keeps_working() {
	if which::which("git").is_err() {
		return;
	}
	let tmp = tempfile::tempdir().unwrap();
	let (bridge, _host) = connect(headless_ctx());

	let err = bridge.git_status(&tmp.path().display().to_string()).await.unwrap_err();
	assert_eq!(err.kind, ErrorKind::NotFound);
	assert!(!err.message.is_empty());

	// The failure was an ordinary reply; the connection is still healthy.
	let info = bridge.detect_project(&tmp.path().display().to_string()).await.unwrap();
	assert_eq!(info.project_type, "unknown");
}

struct FixedDialogs {
	file: Option<PathBuf>,
}

#[async_trait]
impl DialogOps for FixedDialogs {
	async fn pick_file(&self) -> Result<Option<PathBuf>, HostError> {
		Ok(self.file.clone())
	}

	async fn pick_folder(&self) -> Result<Option<PathBuf>, HostError> {
		Ok(None)
	}
}

#[tokio::test]
async fn host_events_reach_bridge_subscribers_in_order() {
	let tmp = tempfile::tempdir().unwrap();
	let picked = tmp.path().join("picked.txt");
	std::fs::write(&picked, "hello").unwrap();

	let ctx = Arc::new(HostContext::new(
		HostConfig::default(),
		Arc::new(Headless),
		Arc::new(FixedDialogs { file: Some(picked.clone()) }),
		Arc::new(Headless),
	));
	let (bridge, _host) = connect(ctx.clone());

	let mut all = bridge.subscribe_all();
	let mut opened = bridge.subscribe(EventKind::FileOpened);

	// Delivery is at-most-once with no buffering, so the host pump must be
	// subscribed to the hub before anything is emitted. A completed
	// round-trip proves its select loop is live.
	bridge.pwd(None).await.unwrap();

	// Menu events come straight from the host side.
	ctx.events.emit(&Event::MenuNewFile);
	ctx.events.emit(&Event::MenuSave);
	// A confirmed dialog emits file.opened.
	let selection = bridge.open_file_dialog().await.unwrap();
	assert_eq!(selection.path.as_deref(), Some(picked.display().to_string().as_str()));

	assert_eq!(all.recv().await, Some(Event::MenuNewFile));
	assert_eq!(all.recv().await, Some(Event::MenuSave));
	match all.recv().await.unwrap() {
		Event::FileOpened { path, content } => {
			assert_eq!(path, picked.display().to_string());
			assert_eq!(content, "hello");
		}
		other => panic!("unexpected event {other:?}"),
	}

	// The filtered stream saw only the file.opened emission.
	match opened.recv().await.unwrap() {
		Event::FileOpened { .. } => {}
		other => panic!("unexpected event {other:?}"),
	}
	assert!(opened.try_recv().is_none());
}

#[tokio::test]
async fn host_death_resolves_pending_calls_instead_of_hanging() {
	let (bridge, host) = connect(headless_ctx());

	let pending = {
		let bridge = bridge.clone();
		tokio::spawn(async move { bridge.exec("sleep 30", None).await })
	};
	// Give the request time to cross the wire, then kill the host.
	tokio::time::sleep(std::time::Duration::from_millis(100)).await;
	host.abort();

	let err = tokio::time::timeout(std::time::Duration::from_secs(5), pending)
		.await
		.expect("pending call left hanging")
		.unwrap()
		.unwrap_err();
	assert_eq!(err.kind, ErrorKind::Unknown);
	assert_eq!(err.message, "host connection closed");

	// Later calls fail the same way rather than panicking.
	let err = bridge.pwd(None).await.unwrap_err();
	assert_eq!(err.kind, ErrorKind::Unknown);
}

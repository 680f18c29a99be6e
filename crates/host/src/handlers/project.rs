//! Project-type detection from manifest files.
//!
//! Best-effort by design: a directory with no recognizable manifest is
//! classified `unknown`, which is a successful outcome.

use std::collections::HashSet;
use std::path::Path;

use quill_wire::HostError;
use quill_wire::ops::{DetectArgs, ProjectInfo};

use super::require_dir;
use crate::context::HostContext;

/// `project.detect`
pub async fn detect(ctx: &HostContext, args: DetectArgs) -> Result<ProjectInfo, HostError> {
	let dir = ctx.resolve_path(&args.path);
	require_dir(&dir).await?;

	let mut names = HashSet::new();
	let mut rd = tokio::fs::read_dir(&dir).await.map_err(|e| HostError::from_io(&dir, &e))?;
	while let Some(entry) = rd.next_entry().await.map_err(|e| HostError::from_io(&dir, &e))? {
		names.insert(entry.file_name().to_string_lossy().into_owned());
	}

	let mut info = ProjectInfo {
		project_type: "unknown".into(),
		package_manager: None,
		framework: None,
	};

	if names.contains("package.json") {
		info.project_type = "node".into();
		info.package_manager = Some(if names.contains("yarn.lock") {
			"yarn"
		} else if names.contains("pnpm-lock.yaml") {
			"pnpm"
		} else {
			"npm"
		}
		.into());
		info.framework = node_framework(&dir).await;
	} else if names.contains("requirements.txt") || names.contains("setup.py") {
		info.project_type = "python".into();
		if names.contains("manage.py") {
			info.framework = Some("django".into());
		}
	} else if names.contains("pom.xml") {
		info.project_type = "maven".into();
	} else if names.contains("build.gradle") || names.contains("build.gradle.kts") {
		info.project_type = "gradle".into();
	} else if names.contains("Cargo.toml") {
		info.project_type = "rust".into();
	} else if names.contains("go.mod") {
		info.project_type = "go".into();
	}

	Ok(info)
}

/// Framework markers checked against the merged dependency maps, most
/// specific first (next implies react).
const NODE_FRAMEWORKS: [(&str, &str); 6] = [
	("next", "nextjs"),
	("react", "react"),
	("vue", "vue"),
	("@angular/core", "angular"),
	("express", "express"),
	("@nestjs/core", "nestjs"),
];

async fn node_framework(dir: &Path) -> Option<String> {
	let raw = tokio::fs::read_to_string(dir.join("package.json")).await.ok()?;
	let pkg: serde_json::Value = serde_json::from_str(&raw).ok()?;
	let empty = serde_json::Map::new();
	let deps = pkg.get("dependencies").and_then(|v| v.as_object()).unwrap_or(&empty);
	let dev_deps = pkg.get("devDependencies").and_then(|v| v.as_object()).unwrap_or(&empty);

	NODE_FRAMEWORKS
		.iter()
		.find(|(dep, _)| deps.contains_key(*dep) || dev_deps.contains_key(*dep))
		.map(|(_, framework)| (*framework).to_string())
}

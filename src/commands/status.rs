use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::EXTRACT_MANIFEST_PREFIX;
use crate::cli::StatusArgs;
use crate::model::ExtractRunSummary;

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_dir = args.cache_root.join("manifests");

    info!(cache_root = %args.cache_root.display(), "status requested");

    let Some(manifest_path) = latest_extract_manifest(&manifest_dir)? else {
        warn!(path = %manifest_dir.display(), "no extract run manifest found");
        return Ok(());
    };

    let raw = fs::read(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let summary: ExtractRunSummary = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

    info!(
        path = %manifest_path.display(),
        run_id = %summary.run_id.unwrap_or_default(),
        status = %summary.status.unwrap_or_default(),
        updated_at = %summary.updated_at.unwrap_or_default(),
        command = %summary.command.unwrap_or_default(),
        output_path = %summary.output_path.unwrap_or_default(),
        source = %summary.source.as_ref().map(|source| source.path.clone()).unwrap_or_default(),
        source_sha256 = %summary.source.as_ref().map(|source| source.sha256.clone()).unwrap_or_default(),
        mode = %summary.acquisition.as_ref().map(|acquisition| acquisition.mode.clone()).unwrap_or_default(),
        pages = summary.acquisition.as_ref().map(|acquisition| acquisition.page_count).unwrap_or_default(),
        articles = summary.structure.as_ref().map(|counts| counts.article_count).unwrap_or_default(),
        rules = summary.structure.as_ref().map(|counts| counts.rule_count).unwrap_or_default(),
        dropped = summary.structure.as_ref().map(|counts| counts.dropped_line_count).unwrap_or_default(),
        "loaded extract run manifest"
    );

    for message in &summary.warnings {
        warn!(path = %manifest_path.display(), "{message}");
    }

    Ok(())
}

/// Manifest names embed a compact UTC stamp, so the lexically largest is
/// the most recent.
fn latest_extract_manifest(manifest_dir: &Path) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;

    let mut latest: Option<PathBuf> = None;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();

        let is_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(EXTRACT_MANIFEST_PREFIX) && name.ends_with(".json"))
            .unwrap_or(false);
        if !is_manifest {
            continue;
        }

        if latest.as_ref().is_none_or(|current| path > *current) {
            latest = Some(path);
        }
    }

    Ok(latest)
}

// src/tools/core/search.rs
// Recursive file search by exact name

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::{display, fs_output, require_dir};
use crate::error::{self, FileFlowError};
use crate::mcp::responses::{FsData, FsOutput, Json, SearchData};

/// Walk `path` recursively and report the first entry named exactly `name`.
pub async fn search_file(path: String, name: String) -> Result<Json<FsOutput>, String> {
    Ok(fs_output("search_file", search_inner(PathBuf::from(path), name).await))
}

async fn search_inner(root: PathBuf, name: String) -> error::Result<(String, FsData)> {
    require_dir(&root).await?;
    if name.is_empty() {
        return Err(FileFlowError::InvalidPath("Invalid name: ''".to_string()));
    }

    let matches = tokio::task::spawn_blocking(move || find_all(&root, &name))
        .await
        .map_err(|e| FileFlowError::Failed {
            context: "Search failed",
            source: std::io::Error::other(e),
        })?;

    let Some(first) = matches.first() else {
        return Err(FileFlowError::NotFound("File not found".to_string()));
    };

    let found = display(first);
    info!(path = %found, matches = matches.len(), "Search matched");
    Ok((
        found.clone(),
        FsData::Search(SearchData {
            path: found,
            matches: matches.len(),
        }),
    ))
}

/// Every entry under `root` whose file name equals `name`, in sorted walk order
fn find_all(root: &Path, name: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                // Unreadable subdirectories are skipped, not fatal
                debug!(error = %e, "Skipping entry during search");
                None
            }
        })
        .filter(|entry| entry.file_name() == name)
        .map(|entry| entry.into_path())
        .collect()
}

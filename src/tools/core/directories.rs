// src/tools/core/directories.rs
// Directory tools: create, recursive delete

use std::path::Path;

use tracing::info;

use super::{display, fs_output, require_dir, validate_name};
use crate::error::{self, FileFlowError, IoContext};
use crate::mcp::responses::{FsData, FsOutput, Json, PathData};

/// Create a directory inside an existing parent.
pub async fn create_dir(path: String, name: String) -> Result<Json<FsOutput>, String> {
    Ok(fs_output(
        "create_dir",
        create_dir_inner(Path::new(&path), &name).await,
    ))
}

async fn create_dir_inner(parent: &Path, name: &str) -> error::Result<(String, FsData)> {
    require_dir(parent).await?;
    validate_name(name)?;

    let full_path = parent.join(name);
    if tokio::fs::symlink_metadata(&full_path).await.is_ok() {
        return Err(FileFlowError::NameConflict(
            "Directory already exists".to_string(),
        ));
    }

    tokio::fs::create_dir(&full_path)
        .await
        .context("Failed to create directory")?;

    info!(path = %full_path.display(), "Created directory");
    Ok((
        "Directory successfully created".to_string(),
        FsData::Path(PathData {
            path: display(&full_path),
        }),
    ))
}

/// Delete a directory and everything under it.
pub async fn delete_dir(path: String, name: String) -> Result<Json<FsOutput>, String> {
    Ok(fs_output(
        "delete_dir",
        delete_dir_inner(Path::new(&path), &name).await,
    ))
}

async fn delete_dir_inner(parent: &Path, name: &str) -> error::Result<(String, FsData)> {
    require_dir(parent).await?;
    validate_name(name)?;

    let full_path = parent.join(name);
    // symlink_metadata so a link to a directory is not followed and emptied
    match tokio::fs::symlink_metadata(&full_path).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(FileFlowError::InvalidPath(format!(
                "Not a directory: {}",
                full_path.display()
            )));
        }
        Err(_) => {
            return Err(FileFlowError::NotFound(
                "Directory does not exist".to_string(),
            ));
        }
    }

    tokio::fs::remove_dir_all(&full_path)
        .await
        .context("Failed to delete directory")?;

    info!(path = %full_path.display(), "Deleted directory");
    Ok((
        "Directory successfully deleted".to_string(),
        FsData::Path(PathData {
            path: display(&full_path),
        }),
    ))
}

// src/tools/core/files.rs
// File tools: create, overwrite, delete

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::info;

use super::{display, fs_output, require_dir, validate_name};
use crate::error::{self, FileFlowError, IoContext};
use crate::mcp::responses::{FsData, FsOutput, Json, PathData, WrittenData};

pub const FILE_DOES_NOT_EXIST: &str = "File does not exist";

/// Create an empty file, refusing names equal to or contained in an existing entry name.
pub async fn create_file(path: String, filename: String) -> Result<Json<FsOutput>, String> {
    Ok(fs_output(
        "create_file",
        create_file_inner(Path::new(&path), &filename).await,
    ))
}

async fn create_file_inner(dir: &Path, filename: &str) -> error::Result<(String, FsData)> {
    require_dir(dir).await?;
    validate_name(filename)?;

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .context("Failed to create file")?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .context("Failed to create file")?
    {
        let existing = entry.file_name();
        if existing.to_string_lossy().contains(filename) {
            return Err(FileFlowError::NameConflict(
                "File already exists or is similar to an existing file".to_string(),
            ));
        }
    }

    let full_path = dir.join(filename);
    tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&full_path)
        .await
        .context("Failed to create file")?;

    info!(path = %full_path.display(), "Created file");
    Ok((
        "File successfully created".to_string(),
        FsData::Path(PathData {
            path: display(&full_path),
        }),
    ))
}

/// Replace the contents of an existing regular file.
pub async fn write_file(
    path: String,
    filename: String,
    content: String,
) -> Result<Json<FsOutput>, String> {
    Ok(fs_output(
        "write_file",
        write_file_inner(Path::new(&path), &filename, content.as_bytes()).await,
    ))
}

async fn write_file_inner(
    dir: &Path,
    filename: &str,
    content: &[u8],
) -> error::Result<(String, FsData)> {
    require_dir(dir).await?;
    validate_name(filename)?;

    let full_path = dir.join(filename);
    let meta = existing_file(&full_path).await?;

    replace_contents(&full_path, content, meta.permissions())
        .await
        .context("Failed to write file")?;

    info!(path = %full_path.display(), bytes = content.len(), "Wrote file");
    Ok((
        "File successfully written".to_string(),
        FsData::Written(WrittenData {
            path: display(&full_path),
            bytes_written: content.len() as u64,
        }),
    ))
}

/// Write to a sibling temp file then rename over the target, keeping its permissions.
async fn replace_contents(
    path: &Path,
    bytes: &[u8],
    permissions: std::fs::Permissions,
) -> std::io::Result<()> {
    let temp_path = temp_sibling(path);

    let mut file = tokio::fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&temp_path)
        .await?;

    let written = async {
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::set_permissions(&temp_path, permissions).await?;
        tokio::fs::rename(&temp_path, path).await
    }
    .await;

    if written.is_err() {
        let _ = tokio::fs::remove_file(&temp_path).await;
    }
    written
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple()))
}

/// Remove a regular file.
pub async fn delete_file(path: String, filename: String) -> Result<Json<FsOutput>, String> {
    Ok(fs_output(
        "delete_file",
        delete_file_inner(Path::new(&path), &filename).await,
    ))
}

async fn delete_file_inner(dir: &Path, filename: &str) -> error::Result<(String, FsData)> {
    require_dir(dir).await?;
    validate_name(filename)?;

    let full_path = dir.join(filename);
    existing_file(&full_path).await?;

    tokio::fs::remove_file(&full_path)
        .await
        .context("Failed to delete file")?;

    info!(path = %full_path.display(), "Deleted file");
    Ok((
        "File successfully deleted".to_string(),
        FsData::Path(PathData {
            path: display(&full_path),
        }),
    ))
}

/// Metadata of `path`, failing unless it is a regular file
async fn existing_file(path: &Path) -> error::Result<std::fs::Metadata> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(meta),
        Ok(_) => Err(FileFlowError::InvalidPath(format!(
            "Not a file: {}",
            path.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(FileFlowError::NotFound(FILE_DOES_NOT_EXIST.to_string()))
        }
        Err(e) => Err(FileFlowError::Failed {
            context: "Failed to access file",
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::responses::Status;
    use crate::tools::core::test_utils::path_arg;

    #[tokio::test]
    async fn test_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let Json(out) = create_file(path_arg(&dir), "notes.txt".into()).await.unwrap();

        assert_eq!(out.status, Status::Ok);
        assert_eq!(out.message, "File successfully created");
        let created = dir.path().join("notes.txt");
        assert!(created.is_file());
        assert_eq!(std::fs::read(&created).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_create_file_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope").to_string_lossy().into_owned();
        let Json(out) = create_file(missing, "a.txt".into()).await.unwrap();

        assert_eq!(out.status, Status::InvalidPath);
        assert_eq!(out.message, "Path does not exist");
    }

    #[tokio::test]
    async fn test_create_file_exact_conflict() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        let Json(out) = create_file(path_arg(&dir), "notes.txt".into()).await.unwrap();
        assert_eq!(out.status, Status::NameConflict);
        assert_eq!(
            out.message,
            "File already exists or is similar to an existing file"
        );
        assert_eq!(std::fs::read_to_string(dir.path().join("notes.txt")).unwrap(), "keep");
    }

    #[tokio::test]
    async fn test_create_file_substring_conflict() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report_final.txt"), "").unwrap();

        let Json(out) = create_file(path_arg(&dir), "report".into()).await.unwrap();
        assert_eq!(out.status, Status::NameConflict);
        assert!(!dir.path().join("report").exists());
    }

    #[tokio::test]
    async fn test_create_file_superstring_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("log"), "").unwrap();

        // "log" is contained in "log.txt", not the other way round
        let Json(out) = create_file(path_arg(&dir), "log.txt".into()).await.unwrap();
        assert_eq!(out.status, Status::Ok);
    }

    #[tokio::test]
    async fn test_write_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "old contents that are longer").unwrap();

        let Json(out) = write_file(path_arg(&dir), "a.txt".into(), "new".into())
            .await
            .unwrap();
        assert_eq!(out.status, Status::Ok);
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "new");
        match out.data {
            Some(FsData::Written(w)) => assert_eq!(w.bytes_written, 3),
            other => panic!("unexpected data: {:?}", other),
        }

        // No temp files left behind
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_write_file_refuses_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let Json(out) = write_file(path_arg(&dir), "ghost.txt".into(), "x".into())
            .await
            .unwrap();

        assert_eq!(out.status, Status::NotFound);
        assert_eq!(out.message, FILE_DOES_NOT_EXIST);
        assert!(!dir.path().join("ghost.txt").exists());
    }

    #[tokio::test]
    async fn test_write_file_refuses_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let Json(out) = write_file(path_arg(&dir), "sub".into(), "x".into())
            .await
            .unwrap();
        assert_eq!(out.status, Status::InvalidPath);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_file_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("script.sh");
        std::fs::write(&target, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o750)).unwrap();

        write_file(path_arg(&dir), "script.sh".into(), "#!/bin/sh\necho hi\n".into())
            .await
            .unwrap();
        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    #[tokio::test]
    async fn test_delete_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("trash.txt"), "").unwrap();

        let Json(out) = delete_file(path_arg(&dir), "trash.txt".into()).await.unwrap();
        assert_eq!(out.status, Status::Ok);
        assert!(!dir.path().join("trash.txt").exists());

        let Json(out) = delete_file(path_arg(&dir), "trash.txt".into()).await.unwrap();
        assert_eq!(out.status, Status::NotFound);
    }

    #[tokio::test]
    async fn test_delete_file_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("keep")).unwrap();

        let Json(out) = delete_file(path_arg(&dir), "keep".into()).await.unwrap();
        assert_eq!(out.status, Status::InvalidPath);
        assert!(dir.path().join("keep").is_dir());
    }

    #[tokio::test]
    async fn test_invalid_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let Json(out) = create_file(path_arg(&dir), "../escape.txt".into())
            .await
            .unwrap();
        assert_eq!(out.status, Status::InvalidPath);
    }
}

// src/tools/core/moves.rs
// Move tools for files and directories

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{display, fs_output, validate_name};
use crate::error::{self, FileFlowError, IoContext};
use crate::mcp::responses::{FsData, FsOutput, Json, MovedData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
}

impl EntryKind {
    fn noun(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Dir => "Directory",
        }
    }
}

/// Move a file. `name` selects an entry inside `source` when given.
pub async fn move_file(
    source: String,
    name: Option<String>,
    destination: String,
) -> Result<Json<FsOutput>, String> {
    Ok(fs_output(
        "move_file",
        move_entry(EntryKind::File, &source, name.as_deref(), &destination).await,
    ))
}

/// Move a directory with its contents. `name` selects an entry inside `source` when given.
pub async fn move_dir(
    source: String,
    name: Option<String>,
    destination: String,
) -> Result<Json<FsOutput>, String> {
    Ok(fs_output(
        "move_dir",
        move_entry(EntryKind::Dir, &source, name.as_deref(), &destination).await,
    ))
}

async fn move_entry(
    kind: EntryKind,
    source: &str,
    name: Option<&str>,
    destination: &str,
) -> error::Result<(String, FsData)> {
    let from = match name {
        Some(name) => {
            validate_name(name)?;
            Path::new(source).join(name)
        }
        None => PathBuf::from(source),
    };

    let meta = tokio::fs::symlink_metadata(&from)
        .await
        .map_err(|_| FileFlowError::NotFound("Source does not exist".to_string()))?;
    let matches_kind = match kind {
        EntryKind::File => !meta.is_dir(),
        EntryKind::Dir => meta.is_dir(),
    };
    if !matches_kind {
        return Err(FileFlowError::InvalidPath(format!(
            "Source is not a {}",
            kind.noun().to_lowercase()
        )));
    }

    let to = resolve_target(&from, Path::new(destination)).await?;

    if kind == EntryKind::Dir && is_inside(&from, &to).await {
        return Err(FileFlowError::InvalidPath(
            "Cannot move a directory into itself".to_string(),
        ));
    }

    rename_or_copy(kind, &from, &to).await?;

    info!(from = %from.display(), to = %to.display(), "Moved {}", kind.noun().to_lowercase());
    Ok((
        format!("{} successfully moved", kind.noun()),
        FsData::Moved(MovedData {
            from: display(&from),
            to: display(&to),
        }),
    ))
}

/// An existing directory receives the entry under its own name; anything else is the target path.
async fn resolve_target(from: &Path, destination: &Path) -> error::Result<PathBuf> {
    let to = match tokio::fs::metadata(destination).await {
        Ok(meta) if meta.is_dir() => {
            let file_name = from.file_name().ok_or_else(|| {
                FileFlowError::InvalidPath(format!("Cannot move {}", from.display()))
            })?;
            destination.join(file_name)
        }
        _ => destination.to_path_buf(),
    };

    let parent_ok = match to.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            matches!(tokio::fs::metadata(parent).await, Ok(m) if m.is_dir())
        }
        _ => true,
    };
    if !parent_ok {
        return Err(FileFlowError::InvalidPath(
            "Destination does not exist".to_string(),
        ));
    }

    if tokio::fs::symlink_metadata(&to).await.is_ok() {
        return Err(FileFlowError::NameConflict(
            "Destination already exists".to_string(),
        ));
    }

    Ok(to)
}

async fn is_inside(dir: &Path, target: &Path) -> bool {
    let Ok(dir) = tokio::fs::canonicalize(dir).await else {
        return false;
    };
    // The target doesn't exist yet; canonicalize its parent
    let Some(parent) = target.parent() else {
        return false;
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    match tokio::fs::canonicalize(parent).await {
        Ok(parent) => parent.starts_with(&dir),
        Err(_) => false,
    }
}

async fn rename_or_copy(kind: EntryKind, from: &Path, to: &Path) -> error::Result<()> {
    let context = match kind {
        EntryKind::File => "Failed to move file",
        EntryKind::Dir => "Failed to move directory",
    };

    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            debug!(from = %from.display(), to = %to.display(), "Rename crosses devices, copying");
            let (from, to) = (from.to_path_buf(), to.to_path_buf());
            tokio::task::spawn_blocking(move || copy_then_remove(kind, &from, &to))
                .await
                .map_err(|e| FileFlowError::Failed {
                    context,
                    source: std::io::Error::other(e),
                })?
                .context(context)
        }
        Err(e) => Err(FileFlowError::Failed { context, source: e }),
    }
}

fn copy_then_remove(kind: EntryKind, from: &Path, to: &Path) -> std::io::Result<()> {
    match kind {
        EntryKind::File => {
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)
        }
        EntryKind::Dir => {
            for entry in walkdir::WalkDir::new(from) {
                let entry = entry.map_err(std::io::Error::other)?;
                let rel = entry
                    .path()
                    .strip_prefix(from)
                    .map_err(std::io::Error::other)?;
                let target = to.join(rel);
                if entry.file_type().is_dir() {
                    std::fs::create_dir_all(&target)?;
                } else {
                    std::fs::copy(entry.path(), &target)?;
                }
            }
            std::fs::remove_dir_all(from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::responses::Status;

    fn s(p: &Path) -> String {
        p.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_move_file_into_directory_keeps_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "payload").unwrap();
        std::fs::create_dir(dir.path().join("archive")).unwrap();

        let Json(out) = move_file(
            s(dir.path()),
            Some("a.txt".into()),
            s(&dir.path().join("archive")),
        )
        .await
        .unwrap();

        assert_eq!(out.status, Status::Ok);
        assert_eq!(out.message, "File successfully moved");
        assert!(!dir.path().join("a.txt").exists());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("archive").join("a.txt")).unwrap(),
            "payload"
        );
    }

    #[tokio::test]
    async fn test_move_file_to_new_path_renames() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("old.txt");
        std::fs::write(&from, "x").unwrap();

        let Json(out) = move_file(s(&from), None, s(&dir.path().join("new.txt")))
            .await
            .unwrap();
        assert_eq!(out.status, Status::Ok);
        assert!(dir.path().join("new.txt").exists());
        match out.data {
            Some(FsData::Moved(m)) => assert!(m.to.ends_with("new.txt")),
            other => panic!("unexpected data: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_move_file_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();

        let Json(out) = move_file(
            s(&dir.path().join("a.txt")),
            None,
            s(&dir.path().join("b.txt")),
        )
        .await
        .unwrap();
        assert_eq!(out.status, Status::NameConflict);
        assert_eq!(std::fs::read_to_string(dir.path().join("b.txt")).unwrap(), "b");
    }

    #[tokio::test]
    async fn test_move_file_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let Json(out) = move_file(s(dir.path()), Some("ghost".into()), s(dir.path()))
            .await
            .unwrap();
        assert_eq!(out.status, Status::NotFound);
        assert_eq!(out.message, "Source does not exist");
    }

    #[tokio::test]
    async fn test_move_file_rejects_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let Json(out) = move_file(
            s(dir.path()),
            Some("sub".into()),
            s(&dir.path().join("elsewhere")),
        )
        .await
        .unwrap();
        assert_eq!(out.status, Status::InvalidPath);
    }

    #[tokio::test]
    async fn test_move_dir_with_contents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src").join("inner")).unwrap();
        std::fs::write(dir.path().join("src").join("inner").join("f.txt"), "f").unwrap();
        std::fs::create_dir(dir.path().join("dest")).unwrap();

        let Json(out) = move_dir(
            s(dir.path()),
            Some("src".into()),
            s(&dir.path().join("dest")),
        )
        .await
        .unwrap();

        assert_eq!(out.status, Status::Ok);
        assert_eq!(out.message, "Directory successfully moved");
        assert!(dir.path().join("dest/src/inner/f.txt").exists());
        assert!(!dir.path().join("src").exists());
    }

    #[tokio::test]
    async fn test_move_dir_into_itself_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("top").join("child")).unwrap();

        let Json(out) = move_dir(
            s(&dir.path().join("top")),
            None,
            s(&dir.path().join("top").join("child")),
        )
        .await
        .unwrap();
        assert_eq!(out.status, Status::InvalidPath);
        assert!(dir.path().join("top").join("child").is_dir());
    }

    #[tokio::test]
    async fn test_move_to_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        let Json(out) = move_file(
            s(&dir.path().join("a.txt")),
            None,
            s(&dir.path().join("no").join("such").join("b.txt")),
        )
        .await
        .unwrap();
        assert_eq!(out.status, Status::InvalidPath);
        assert_eq!(out.message, "Destination does not exist");
    }

    #[test]
    fn test_copy_then_remove_directory() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("from");
        std::fs::create_dir_all(from.join("a")).unwrap();
        std::fs::write(from.join("a").join("x.txt"), "x").unwrap();
        let to = dir.path().join("to");

        copy_then_remove(EntryKind::Dir, &from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(std::fs::read_to_string(to.join("a").join("x.txt")).unwrap(), "x");
    }
}

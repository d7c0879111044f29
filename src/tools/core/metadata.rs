// src/tools/core/metadata.rs
// Size and timestamps of a file or directory

use std::io;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use super::{display, fs_output, require_dir, validate_name};
use crate::error::{self, FileFlowError};
use crate::mcp::responses::{FsData, FsOutput, Json, MetadataData};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const UNAVAILABLE: &str = "unavailable";

/// Report size, type and timestamps of `path/name`.
pub async fn meta_data(path: String, name: String) -> Result<Json<FsOutput>, String> {
    Ok(fs_output(
        "meta_data",
        meta_data_inner(Path::new(&path), &name).await,
    ))
}

async fn meta_data_inner(dir: &Path, name: &str) -> error::Result<(String, FsData)> {
    require_dir(dir).await?;
    validate_name(name)?;

    let full_path = dir.join(name);
    let meta = tokio::fs::metadata(&full_path).await.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FileFlowError::NotFound("File does not exist".to_string()),
        _ => FileFlowError::Failed {
            context: "Failed to read metadata",
            source: e,
        },
    })?;

    let data = MetadataData {
        path: display(&full_path),
        kind: kind_of(&meta).to_string(),
        size: meta.len(),
        readonly: meta.permissions().readonly(),
        created: format_time(meta.created()),
        modified: format_time(meta.modified()),
        accessed: format_time(meta.accessed()),
    };

    let message = format!(
        "Size: {} bytes\nCreated: {}\nModified: {}\nAccessed: {}",
        data.size,
        data.created.as_deref().unwrap_or(UNAVAILABLE),
        data.modified.as_deref().unwrap_or(UNAVAILABLE),
        data.accessed.as_deref().unwrap_or(UNAVAILABLE),
    );

    Ok((message, FsData::Metadata(data)))
}

fn kind_of(meta: &std::fs::Metadata) -> &'static str {
    if meta.is_dir() {
        "directory"
    } else if meta.is_file() {
        "file"
    } else {
        "other"
    }
}

/// Local time, or `None` where the platform doesn't record the timestamp
fn format_time(time: io::Result<SystemTime>) -> Option<String> {
    time.ok()
        .map(|t| DateTime::<Local>::from(t).format(TIME_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::responses::Status;
    use crate::tools::core::test_utils::path_arg;

    #[tokio::test]
    async fn test_file_metadata_block() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.bin"), vec![0u8; 42]).unwrap();

        let Json(out) = meta_data(path_arg(&dir), "data.bin".into()).await.unwrap();
        assert_eq!(out.status, Status::Ok);

        let lines: Vec<&str> = out.message.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Size: 42 bytes");
        assert!(lines[1].starts_with("Created: "));
        assert!(lines[2].starts_with("Modified: "));
        assert!(lines[3].starts_with("Accessed: "));

        match out.data {
            Some(FsData::Metadata(m)) => {
                assert_eq!(m.kind, "file");
                assert_eq!(m.size, 42);
                let modified = m.modified.expect("modified time is always recorded");
                assert!(chrono::NaiveDateTime::parse_from_str(&modified, TIME_FORMAT).is_ok());
            }
            other => panic!("unexpected data: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_directory_metadata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let Json(out) = meta_data(path_arg(&dir), "sub".into()).await.unwrap();
        match out.data {
            Some(FsData::Metadata(m)) => assert_eq!(m.kind, "directory"),
            other => panic!("unexpected data: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let Json(out) = meta_data(path_arg(&dir), "ghost".into()).await.unwrap();
        assert_eq!(out.status, Status::NotFound);
    }

    #[test]
    fn test_unsupported_timestamp_is_none() {
        let unsupported = Err(io::Error::new(io::ErrorKind::Unsupported, "no btime"));
        assert_eq!(format_time(unsupported), None);
    }
}

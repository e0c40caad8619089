//! # 文件大小探测
//!
//! 统一的文件大小查询，屏蔽平台 stat 差异，错误归一为 `BatchError`。
//!
//! ## 依赖关系
//! - 被 `batch/collector.rs`, `batch/job.rs` 使用

use crate::error::{BatchError, Result};

use std::io::{self, ErrorKind};
use std::path::Path;

/// 查询文件大小（字节），跟随符号链接
pub fn size_of(path: &Path) -> Result<u64> {
    std::fs::metadata(path)
        .map(|meta| meta.len())
        .map_err(|e| classify_io_error(path, e))
}

/// 将 I/O 错误归一为 `NotFound` / `PermissionDenied` / `FileReadError`
fn classify_io_error(path: &Path, e: io::Error) -> BatchError {
    match e.kind() {
        ErrorKind::NotFound => BatchError::FileNotFound {
            path: path.display().to_string(),
        },
        ErrorKind::PermissionDenied => BatchError::PermissionDenied {
            path: path.display().to_string(),
        },
        _ => BatchError::FileReadError {
            path: path.display().to_string(),
            source: e,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_of_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.warc");
        std::fs::write(&path, vec![0u8; 1024]).unwrap();
        assert_eq!(size_of(&path).unwrap(), 1024);
    }

    #[test]
    fn test_size_of_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = size_of(&dir.path().join("missing.warc")).unwrap_err();
        assert!(matches!(err, BatchError::FileNotFound { .. }));
    }

    #[test]
    fn test_classify_permission_denied() {
        let path = Path::new("/archive/locked.warc");
        let err = classify_io_error(path, io::Error::from(ErrorKind::PermissionDenied));
        match err {
            BatchError::PermissionDenied { path } => assert_eq!(path, "/archive/locked.warc"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classify_other_io_error() {
        let err = classify_io_error(Path::new("a.warc"), io::Error::from(ErrorKind::InvalidData));
        assert!(matches!(err, BatchError::FileReadError { .. }));
        let err = classify_io_error(Path::new("a.warc"), io::Error::from(ErrorKind::NotFound));
        assert!(matches!(err, BatchError::FileNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_size_of_unreadable_dir() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::write(locked.join("a.warc"), b"x").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // root 不受目录权限限制
        let access_blocked = std::fs::read_dir(&locked).is_err();
        let result = size_of(&locked.join("a.warc"));
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        if access_blocked {
            assert!(matches!(result, Err(BatchError::PermissionDenied { .. })));
        }
    }
}

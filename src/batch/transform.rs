//! # 外部转换调用
//!
//! 每个作业对单个输入调用一次转换：`<program> <args...> <input> <output>`。
//!
//! ## 功能
//! - `Transform` trait：调度层与具体转换实现之间的接缝
//! - `CommandTransform`：调用外部可执行程序，捕获 stderr
//! - 运行前检查可执行程序是否存在
//!
//! ## 依赖关系
//! - 被 `batch/job.rs` 调用
//! - 被 `commands/run.rs` 构造

use crate::batch::cancel::CancelToken;
use crate::error::{BatchError, Result};

use std::ffi::OsStr;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// 子进程轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 单文件转换
pub trait Transform: Send + Sync {
    /// 将 `input` 转换写入 `output`，失败返回错误
    fn transform(&self, input: &Path, output: &Path, cancel: &CancelToken) -> Result<()>;
}

impl<F> Transform for F
where
    F: Fn(&Path, &Path) -> Result<()> + Send + Sync,
{
    fn transform(&self, input: &Path, output: &Path, _cancel: &CancelToken) -> Result<()> {
        self(input, output)
    }
}

/// 外部命令转换
#[derive(Debug, Clone)]
pub struct CommandTransform {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandTransform {
    /// 解析可执行程序并创建转换器，找不到时返回 `DependencyMissing`
    pub fn new(program: &str, args: Vec<String>) -> Result<Self> {
        let program = resolve_program(program)?;
        Ok(Self { program, args })
    }

    fn display_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

impl Transform for CommandTransform {
    fn transform(&self, input: &Path, output: &Path, cancel: &CancelToken) -> Result<()> {
        let name = self.display_name();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => BatchError::DependencyMissing {
                    command: name.clone(),
                },
                _ => BatchError::TransformFailed {
                    command: name.clone(),
                    detail: e.to_string(),
                },
            })?;

        // stderr 在独立线程中读取，避免管道写满阻塞子进程
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = String::new();
                stderr.read_to_string(&mut buf).ok();
                buf
            })
        });

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if cancel.is_cancelled() => {
                    debug!(input = %input.display(), "killing transform after cancellation");
                    child.kill().ok();
                    child.wait().ok();
                    if let Some(handle) = stderr_reader {
                        handle.join().ok();
                    }
                    return Err(BatchError::Cancelled);
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    return Err(BatchError::TransformFailed {
                        command: name,
                        detail: e.to_string(),
                    })
                }
            }
        };

        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty());
            let detail = match (last_line, status.code()) {
                (Some(line), _) => line.trim().to_string(),
                (None, Some(code)) => format!("exit status {}", code),
                (None, None) => "terminated by signal".to_string(),
            };
            Err(BatchError::TransformFailed {
                command: name,
                detail,
            })
        }
    }
}

/// 解析可执行程序路径
///
/// 含路径分隔符时直接检查文件，否则在 `PATH` 中查找第一个可执行的候选。
pub fn resolve_program(program: &str) -> Result<PathBuf> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    resolve_in(program, &path_var)
}

/// 在给定的 `PATH` 值中解析可执行程序
fn resolve_in(program: &str, path_var: &OsStr) -> Result<PathBuf> {
    let missing = || BatchError::DependencyMissing {
        command: program.to_string(),
    };

    if program.is_empty() {
        return Err(missing());
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(missing())
        };
    }

    std::env::split_paths(path_var)
        .flat_map(|dir| executable_candidates(&dir, program))
        .find(|p| is_executable(p))
        .ok_or_else(missing)
}

/// 普通文件且至少有一个执行位
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(not(windows))]
fn executable_candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program)]
}

#[cfg(windows)]
fn executable_candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program), dir.join(format!("{}.exe", program))]
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolve_missing_program() {
        let err = resolve_program("definitely-not-a-real-warc-tool").unwrap_err();
        assert!(matches!(err, BatchError::DependencyMissing { .. }));
        assert!(resolve_program("").is_err());
        assert!(resolve_program("/no/such/dir/tool").is_err());
    }

    fn write_tool(dir: &Path, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("warc-tool");
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_resolve_skips_non_executable_candidate() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_tool(first.path(), 0o644);
        let runnable = write_tool(second.path(), 0o755);

        let path_var = std::env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(resolve_in("warc-tool", &path_var).unwrap(), runnable);
    }

    #[test]
    fn test_resolve_only_non_executable_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let plain = write_tool(dir.path(), 0o644);

        let path_var = std::env::join_paths([dir.path()]).unwrap();
        let err = resolve_in("warc-tool", &path_var).unwrap_err();
        assert!(matches!(err, BatchError::DependencyMissing { .. }));
        assert!(resolve_in(plain.to_str().unwrap(), &path_var).is_err());
    }

    #[test]
    fn test_resolve_from_path() {
        assert!(resolve_program("sh").is_ok());
    }

    #[test]
    fn test_command_transform_success() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.warc");
        let output = dir.path().join("a.warc.txt");
        fs::write(&input, "payload").unwrap();

        let transform =
            CommandTransform::new("sh", vec!["-c".into(), "cp \"$0\" \"$1\"".into()]).unwrap();
        transform
            .transform(&input, &output, &CancelToken::new())
            .unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "payload");
    }

    #[test]
    fn test_command_transform_failure_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let transform = CommandTransform::new(
            "sh",
            vec!["-c".into(), "echo 'bad record' >&2; exit 3".into()],
        )
        .unwrap();
        let err = transform
            .transform(
                &dir.path().join("a.warc"),
                &dir.path().join("a.txt"),
                &CancelToken::new(),
            )
            .unwrap_err();
        match err {
            BatchError::TransformFailed { command, detail } => {
                assert_eq!(command, "sh");
                assert_eq!(detail, "bad record");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_command_transform_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let transform =
            CommandTransform::new("sh", vec!["-c".into(), "exec sleep 30".into()]).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = transform
            .transform(
                &dir.path().join("a.warc"),
                &dir.path().join("a.txt"),
                &cancel,
            )
            .unwrap_err();
        assert!(matches!(err, BatchError::Cancelled));
    }
}

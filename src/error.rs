//! # 统一错误处理模块
//!
//! 定义 warc-batch 的所有错误类型，使用 `thiserror` 派生。
//!
//! 致命错误（依赖缺失、参数错误、输入目录不存在）由 `main` 打印并退出；
//! 单个作业内的错误由 `batch::job` 捕获并转为 `Outcome::Error`，不会向上传播。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// warc-batch 统一错误类型
#[derive(Error, Debug)]
pub enum BatchError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Input directory not found: {path}")]
    InputNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("Required command '{command}' not found in PATH")]
    DependencyMissing { command: String },

    #[error("Transform '{command}' failed: {detail}")]
    TransformFailed { command: String, detail: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("Job cancelled")]
    Cancelled,
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, BatchError>;

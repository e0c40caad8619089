//! # 工具函数模块
//!
//! 提供美化输出、进度条、格式化、文件大小探测与日志初始化。
//!
//! ## 依赖关系
//! - 被 `batch/` 与 `commands/` 模块使用
//! - 子模块: format, fs, logging, output, progress

pub mod format;
pub mod fs;
pub mod logging;
pub mod output;
pub mod progress;

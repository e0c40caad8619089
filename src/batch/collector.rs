//! # 输入文件收集器
//!
//! 递归枚举输入目录中可识别的 WARC 文件。
//!
//! ## 功能
//! - 后缀过滤（`.warc` / `.warc.gz`，区分大小写）
//! - 递归目录搜索，结果按路径排序
//! - 计数阶段与调度阶段共用同一枚举结果
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `utils/fs.rs` 探测文件大小
//! - 使用 `walkdir` 遍历目录

use crate::error::{BatchError, Result};
use crate::models::InputFile;
use crate::utils::fs::size_of;

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 可识别的输入后缀：未压缩归档与 gzip 压缩归档
pub const RECOGNIZED_SUFFIXES: [&str; 2] = [".warc", ".warc.gz"];

/// 输入文件收集器
pub struct InputCollector {
    /// 输入根目录
    root: PathBuf,
    /// 后缀列表
    suffixes: Vec<String>,
}

impl InputCollector {
    /// 创建新的收集器，使用默认后缀
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            suffixes: RECOGNIZED_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 收集所有匹配文件
    ///
    /// 输入根不存在或不是目录时返回 `InputNotFound`；
    /// 无法读取大小的文件跳过并记录警告。
    pub fn collect(&self) -> Result<Vec<InputFile>> {
        if !self.root.is_dir() {
            return Err(BatchError::InputNotFound {
                path: self.root.display().to_string(),
            });
        }

        let root = self.root.canonicalize().map_err(|e| BatchError::FileReadError {
            path: self.root.display().to_string(),
            source: e,
        })?;

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file());

        for entry in walker {
            let path = entry.path();
            if !self.matches_suffix(path) {
                continue;
            }
            match size_of(path) {
                Ok(size) => {
                    let rel = path.strip_prefix(&root).unwrap_or(path);
                    files.push(InputFile::new(path, rel, size));
                }
                Err(e) => warn!("skipping {}: {}", path.display(), e),
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(count = files.len(), root = %root.display(), "enumerated inputs");
        Ok(files)
    }

    /// 检查文件名是否以任一后缀结尾
    fn matches_suffix(&self, path: &Path) -> bool {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        self.suffixes
            .iter()
            .any(|suffix| filename.len() > suffix.len() && filename.ends_with(suffix.as_str()))
    }
}

/// 输入集合的总字节数
pub fn total_bytes(files: &[InputFile]) -> u64 {
    files.iter().map(|f| f.size).sum()
}

//! # 作业数据模型
//!
//! - `InputFile`: 枚举阶段发现的输入文件，运行期间不可变
//! - `JobResult`: 每个作业恰好产生一个，经结果通道移交给聚合器
//! - `RunTotals`: 运行统计，仅由聚合器修改
//!
//! ## 依赖关系
//! - 被 `batch/` 各模块使用
//! - 无外部模块依赖

use std::path::{Path, PathBuf};

/// 待处理的输入文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// 绝对路径
    pub path: PathBuf,
    /// 相对输入根目录的路径，用于派生输出路径
    pub rel_path: PathBuf,
    /// 显示用标识（`/` 分隔，非 UTF-8 部分有损替换）
    pub relative: String,
    /// 文件大小（字节）
    pub size: u64,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>, rel_path: impl Into<PathBuf>, size: u64) -> Self {
        let rel_path = rel_path.into();
        InputFile {
            path: path.into(),
            relative: display_id(&rel_path),
            rel_path,
            size,
        }
    }

    /// 派生输出路径: `<output_root>/<rel_path>.<ext>`
    ///
    /// 在原始 `OsString` 上追加后缀，不经过有损转换；
    /// 追加而不是替换扩展名，`a.warc` 与 `a.warc.gz` 不会落到同一输出。
    pub fn output_path(&self, output_root: &Path, ext: &str) -> PathBuf {
        let mut name = self.rel_path.clone().into_os_string();
        name.push(".");
        name.push(ext);
        output_root.join(name)
    }
}

/// 相对路径的显示标识，统一使用 `/` 分隔
fn display_id(rel_path: &Path) -> String {
    rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// 单个作业的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// 失败原因（单行）
    Error(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// 进度事件：作业完成后发送给聚合器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub id: String,
    pub size: u64,
    pub outcome: Outcome,
}

/// 运行统计
///
/// 不变量: `processed == succeeded + errored`，`processed <= total_files`，
/// `bytes_processed` 单调不减。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub total_files: usize,
    pub total_bytes: u64,
    pub processed: usize,
    pub succeeded: usize,
    pub errored: usize,
    pub bytes_processed: u64,
    pub elapsed_secs: u64,
}

impl RunTotals {
    pub fn new(total_files: usize, total_bytes: u64) -> Self {
        RunTotals {
            total_files,
            total_bytes,
            ..Default::default()
        }
    }

    /// 记录一个作业结果，超出总数的结果被忽略并返回 false
    pub fn record(&mut self, result: &JobResult) -> bool {
        if self.processed >= self.total_files {
            return false;
        }
        self.processed += 1;
        match result.outcome {
            Outcome::Success => self.succeeded += 1,
            Outcome::Error(_) => self.errored += 1,
        }
        self.bytes_processed = self.bytes_processed.saturating_add(result.size);
        true
    }

    /// 完成百分比（整数截断），空输入视为 100%
    pub fn percent(&self) -> u64 {
        if self.total_files == 0 {
            return 100;
        }
        (self.processed as u64 * 100) / self.total_files as u64
    }

    /// 当前速率（字节/秒）
    pub fn rate(&self) -> u64 {
        compute_rate(self.bytes_processed, self.elapsed_secs)
    }

    /// 预计剩余时间（秒）
    pub fn eta_secs(&self) -> u64 {
        compute_eta(self.bytes_processed, self.total_bytes, self.elapsed_secs)
    }

    /// 全程平均速率: `total_bytes / (elapsed + 1)`
    pub fn average_rate(&self) -> u64 {
        self.total_bytes / (self.elapsed_secs + 1)
    }

    pub fn is_complete(&self) -> bool {
        self.processed >= self.total_files
    }
}

/// 速率 = 已处理字节 / 已用秒数（整数截断），elapsed 为 0 时返回 0
pub fn compute_rate(bytes_processed: u64, elapsed_secs: u64) -> u64 {
    if elapsed_secs == 0 {
        return 0;
    }
    bytes_processed / elapsed_secs
}

/// ETA = 剩余字节 / 速率
///
/// 已处理为 0、elapsed 为 0 或速率截断为 0 时返回 0。
pub fn compute_eta(processed_bytes: u64, total_bytes: u64, elapsed_secs: u64) -> u64 {
    if processed_bytes == 0 || elapsed_secs == 0 {
        return 0;
    }
    let rate = compute_rate(processed_bytes, elapsed_secs);
    if rate == 0 {
        return 0;
    }
    total_bytes.saturating_sub(processed_bytes) / rate
}

/// 运行结束后的汇总
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub totals: RunTotals,
    /// 因取消而未启动的作业数
    pub cancelled: usize,
    /// 失败详情 (相对标识, 原因)
    pub failures: Vec<(String, String)>,
}

impl RunSummary {
    /// 全部作业成功且无取消
    pub fn is_success(&self) -> bool {
        self.totals.errored == 0 && self.cancelled == 0
    }
}

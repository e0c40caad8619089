//! # 数据模型模块
//!
//! 定义批处理作业的输入、结果与运行统计数据模型。
//!
//! ## 依赖关系
//! - 被 `batch/` 和 `commands/` 使用
//! - 子模块: job

pub mod job;

pub use job::{InputFile, JobResult, Outcome, RunSummary, RunTotals};

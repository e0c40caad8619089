//! # 批量处理模块
//!
//! 枚举输入、有界并发调度、单作业执行与进度聚合。
//!
//! ## 数据流
//! ```text
//! InputCollector ──> [InputFile] ──┬──> ProgressAggregator (Counting)
//!                                  └──> Dispatcher ──> JobRunner ×N
//!                                                        │
//!                          JobResult (crossbeam 通道)    │
//! ProgressAggregator (Monitoring) <──────────────────────┘
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `rayon` 线程池、`crossbeam` 通道、`indicatif` 状态行

pub mod aggregator;
pub mod cancel;
pub mod collector;
pub mod job;
pub mod runner;
pub mod transform;

pub use aggregator::{ProgressAggregator, StatusDisplay, TerminalDisplay};
pub use cancel::CancelToken;
pub use collector::InputCollector;
pub use job::JobRunner;
pub use runner::Dispatcher;
pub use transform::{CommandTransform, Transform};

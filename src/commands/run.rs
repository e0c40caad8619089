//! # 批处理命令实现
//!
//! ## 流程
//! 1. 预检：转换程序存在、输入目录存在、创建输出目录（任一失败即中止，不输出进度）
//! 2. 枚举输入（此时尚无进度输出），聚合器计算总量
//! 3. 调度器在独立线程中运行，聚合器在当前线程消费结果通道
//! 4. 输出汇总
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `batch/` 全部子模块
//! - 使用 `utils/output.rs`

use crate::batch::{
    CancelToken, CommandTransform, Dispatcher, InputCollector, JobRunner, ProgressAggregator,
    StatusDisplay, TerminalDisplay, Transform,
};
use crate::cli::run::RunArgs;
use crate::error::{BatchError, Result};
use crate::models::RunSummary;
use crate::utils::output;

use crossbeam::channel;
use std::fs;
use std::path::PathBuf;
use std::thread;
use tracing::debug;

/// 生效的运行配置
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// worker 数量，0 表示 CPU 核心数
    pub jobs: usize,
    pub verbose: bool,
    pub transform: String,
    pub transform_args: Vec<String>,
    pub output_ext: String,
    pub fail_fast: bool,
}

impl From<RunArgs> for RunConfig {
    fn from(args: RunArgs) -> Self {
        RunConfig {
            input: args.input,
            output: args.output,
            jobs: args.jobs.unwrap_or_else(num_cpus::get),
            verbose: args.verbose,
            transform: args.transform,
            transform_args: args.transform_args,
            output_ext: args.output_ext,
            fail_fast: args.fail_fast,
        }
    }
}

/// 执行批处理命令
pub fn execute(config: RunConfig) -> Result<RunSummary> {
    let transform = CommandTransform::new(&config.transform, config.transform_args.clone())?;
    debug!(?transform, "transform resolved");
    execute_with(&config, &transform, TerminalDisplay::new(config.verbose))
}

/// 使用给定转换与状态输出执行批处理
pub fn execute_with<D: StatusDisplay>(
    config: &RunConfig,
    transform: &dyn Transform,
    display: D,
) -> Result<RunSummary> {
    if config.output_ext.is_empty() {
        return Err(BatchError::InvalidArgument(
            "output extension must not be empty".to_string(),
        ));
    }

    if !config.input.is_dir() {
        return Err(BatchError::InputNotFound {
            path: config.input.display().to_string(),
        });
    }

    fs::create_dir_all(&config.output).map_err(|e| BatchError::FileWriteError {
        path: config.output.display().to_string(),
        source: e,
    })?;

    let cancel = CancelToken::new();
    let dispatcher = Dispatcher::new(config.jobs)
        .fail_fast(config.fail_fast)
        .with_cancel(cancel.clone());

    // 枚举在任何进度输出之前完成，失败时不留下部分输出
    let inputs = InputCollector::new(config.input.clone()).collect()?;
    output::print_info(&format!(
        "Found {} file(s) under {} ({} concurrent job(s))",
        inputs.len(),
        config.input.display(),
        dispatcher.jobs()
    ));

    let mut aggregator = ProgressAggregator::new(display);
    aggregator.count(&inputs);

    let runner = JobRunner::new(transform, &config.output, &config.output_ext, cancel);
    let (tx, rx) = channel::unbounded();

    let report = thread::scope(|scope| {
        let handle = scope.spawn(|| dispatcher.run(&inputs, &runner, tx));
        aggregator.monitor(&rx);
        handle.join()
    })
    .map_err(|_| BatchError::WorkerPool("dispatcher thread panicked".to_string()))??;

    let summary = aggregator.finalize();
    debug!(
        ?report,
        phase = ?aggregator.phase(),
        processed = aggregator.totals().processed,
        "run finished"
    );

    if summary.totals.total_files == 0 {
        output::print_warning(&format!(
            "No .warc or .warc.gz files found under {}",
            config.input.display()
        ));
    } else if report.is_success() && summary.is_success() {
        output::print_done(&format!(
            "Processed {} file(s) into '{}'",
            summary.totals.total_files,
            config.output.display()
        ));
    } else if summary.totals.errored > 0 {
        output::print_warning(&format!(
            "{} of {} file(s) failed",
            summary.totals.errored, summary.totals.total_files
        ));
    }

    Ok(summary)
}

//! # 进度聚合器
//!
//! 结果通道的唯一消费者，也是 `RunTotals` 的唯一修改者，因此无需加锁。
//!
//! ## 状态
//! - `Counting`: 根据枚举结果计算文件总数与总字节数
//! - `Monitoring`: 逐个接收 `JobResult`，更新统计并刷新状态行
//! - `Finalized`: 输出永久汇总，之后不再工作
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `utils/format.rs` 格式化，`utils/progress.rs` 绘制状态行

use crate::batch::collector::total_bytes;
use crate::models::{InputFile, JobResult, Outcome, RunSummary, RunTotals};
use crate::utils::format::{format_bytes, format_duration, format_rate};
use crate::utils::{output, progress};

use colored::Colorize;
use crossbeam::channel::Receiver;
use indicatif::ProgressBar;
use std::time::Instant;
use tracing::{debug, warn};

/// 聚合器所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Counting,
    Monitoring,
    Finalized,
}

/// 状态输出接缝，终端实现见 `TerminalDisplay`
pub trait StatusDisplay {
    /// 进入计数阶段
    fn counting(&mut self) {}

    /// 刷新单行状态
    fn update(&mut self, line: &str, totals: &RunTotals);

    /// 单个作业失败
    fn failure(&mut self, id: &str, reason: &str);

    /// 输出永久汇总
    fn finish(&mut self, summary: &RunSummary);
}

impl<D: StatusDisplay + ?Sized> StatusDisplay for &mut D {
    fn counting(&mut self) {
        (**self).counting()
    }

    fn update(&mut self, line: &str, totals: &RunTotals) {
        (**self).update(line, totals)
    }

    fn failure(&mut self, id: &str, reason: &str) {
        (**self).failure(id, reason)
    }

    fn finish(&mut self, summary: &RunSummary) {
        (**self).finish(summary)
    }
}

/// 渲染状态行
pub fn render_status(totals: &RunTotals) -> String {
    format!(
        "[{:>3}%] {}/{} files | {} / {} | ok {} | err {} | {} | ETA {}",
        totals.percent(),
        totals.processed,
        totals.total_files,
        format_bytes(totals.bytes_processed),
        format_bytes(totals.total_bytes),
        totals.succeeded,
        totals.errored,
        format_rate(totals.rate()),
        format_duration(totals.eta_secs()),
    )
}

/// 进度聚合器
pub struct ProgressAggregator<D: StatusDisplay> {
    phase: Phase,
    totals: RunTotals,
    failures: Vec<(String, String)>,
    started: Instant,
    display: D,
}

impl<D: StatusDisplay> ProgressAggregator<D> {
    pub fn new(mut display: D) -> Self {
        display.counting();
        Self {
            phase: Phase::Counting,
            totals: RunTotals::default(),
            failures: Vec::new(),
            started: Instant::now(),
            display,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn totals(&self) -> &RunTotals {
        &self.totals
    }

    #[cfg(test)]
    pub fn display(&self) -> &D {
        &self.display
    }

    /// 计算总量并输出初始状态行，进入 `Monitoring`
    ///
    /// 必须传入与调度器相同的枚举结果。计时从此刻开始。
    pub fn count(&mut self, inputs: &[InputFile]) {
        if self.phase != Phase::Counting {
            warn!(phase = ?self.phase, "count called outside counting phase");
            return;
        }
        self.totals = RunTotals::new(inputs.len(), total_bytes(inputs));
        self.started = Instant::now();
        self.phase = Phase::Monitoring;
        self.refresh();
    }

    /// 消费结果直到收满总数或通道关闭
    pub fn monitor(&mut self, results: &Receiver<JobResult>) {
        if self.phase != Phase::Monitoring {
            warn!(phase = ?self.phase, "monitor called outside monitoring phase");
            return;
        }
        while !self.totals.is_complete() {
            match results.recv() {
                Ok(result) => self.apply(result),
                Err(_) => {
                    debug!(
                        received = self.totals.processed,
                        total = self.totals.total_files,
                        "result channel closed early"
                    );
                    break;
                }
            }
        }
    }

    /// 应用单个结果
    pub fn apply(&mut self, result: JobResult) {
        if !self.totals.record(&result) {
            warn!(id = %result.id, "result beyond expected total ignored");
            return;
        }
        if let Outcome::Error(reason) = result.outcome {
            self.display.failure(&result.id, &reason);
            self.failures.push((result.id, reason));
        }
        self.refresh();
    }

    /// 输出汇总并进入 `Finalized`
    pub fn finalize(&mut self) -> RunSummary {
        self.totals.elapsed_secs = self.started.elapsed().as_secs();
        let summary = RunSummary {
            totals: self.totals.clone(),
            cancelled: self.totals.total_files - self.totals.processed,
            failures: self.failures.clone(),
        };
        if self.phase != Phase::Finalized {
            self.display.finish(&summary);
            self.phase = Phase::Finalized;
        }
        summary
    }

    fn refresh(&mut self) {
        self.totals.elapsed_secs = self.started.elapsed().as_secs();
        let line = render_status(&self.totals);
        self.display.update(&line, &self.totals);
    }
}

/// 终端状态输出：indicatif 单行状态 + colored 汇总
pub struct TerminalDisplay {
    bar: ProgressBar,
    verbose: bool,
}

impl TerminalDisplay {
    pub fn new(verbose: bool) -> Self {
        Self {
            bar: progress::create_status_line(),
            verbose,
        }
    }
}

impl StatusDisplay for TerminalDisplay {
    fn update(&mut self, line: &str, _totals: &RunTotals) {
        self.bar.set_message(line.to_string());
    }

    fn failure(&mut self, id: &str, reason: &str) {
        if self.verbose {
            self.bar.suspend(|| output::print_failure(id, reason));
        }
    }

    fn finish(&mut self, summary: &RunSummary) {
        self.bar.finish();

        let totals = &summary.totals;
        output::print_header("Batch Summary");
        output::print_field("Succeeded", &totals.succeeded.to_string().green().to_string());
        let failed = if totals.errored > 0 {
            totals.errored.to_string().red().to_string()
        } else {
            totals.errored.to_string()
        };
        output::print_field("Failed", &failed);
        if summary.cancelled > 0 {
            output::print_field("Cancelled", &summary.cancelled.to_string().yellow().to_string());
        }
        output::print_field("Total files", &totals.total_files.to_string());
        output::print_field("Total size", &format_bytes(totals.total_bytes));
        output::print_field("Elapsed", &format_duration(totals.elapsed_secs));
        output::print_field("Average rate", &format_rate(totals.average_rate()));

        if !summary.failures.is_empty() {
            output::print_separator();
            for (id, reason) in &summary.failures {
                output::print_failure(id, reason);
            }
        }
        output::print_separator();
    }
}

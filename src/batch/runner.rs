//! # 批量调度器
//!
//! 在固定大小的 worker 池中并行执行作业。
//!
//! ## 功能
//! - 基于 rayon 线程池，恰好 `jobs` 个 worker 从共享队列按枚举顺序取作业
//! - 作业相互独立，单个失败不影响其他作业
//! - 每个启动的作业恰好发送一个结果；所有 worker 退出后结果通道关闭
//! - 每次取作业前检查取消令牌，`fail_fast` 时首个失败即取消
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `batch/job.rs` 执行单个作业
//! - 使用 `rayon` 线程池与 `crossbeam` 通道

use crate::batch::cancel::CancelToken;
use crate::batch::job::JobRunner;
use crate::error::{BatchError, Result};
use crate::models::{InputFile, JobResult};

use crossbeam::channel::{self, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// 调度统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// 已启动的作业数
    pub dispatched: usize,
    /// 失败的作业数
    pub failed: usize,
    /// 因取消而未启动的作业数
    pub skipped: usize,
}

impl DispatchReport {
    /// 无失败且无跳过
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

/// 批量调度器
pub struct Dispatcher {
    /// worker 数量
    jobs: usize,
    /// 首个失败后取消剩余作业
    fail_fast: bool,
    cancel: CancelToken,
}

impl Dispatcher {
    /// 创建新的调度器，`jobs == 0` 时使用 CPU 核心数
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            fail_fast: false,
            cancel: CancelToken::new(),
        }
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 执行全部作业，阻塞直到所有 worker 退出
    ///
    /// `results` 在返回前被丢弃，接收端据此得知不会再有结果。
    pub fn run(
        &self,
        inputs: &[InputFile],
        runner: &JobRunner<'_>,
        results: Sender<JobResult>,
    ) -> Result<DispatchReport> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|i| format!("warc-worker-{}", i))
            .build()
            .map_err(|e| BatchError::WorkerPool(e.to_string()))?;

        // 作业队列一次性填满，worker 按枚举顺序取用
        let (queue_tx, queue_rx) = channel::unbounded::<&InputFile>();
        for input in inputs {
            queue_tx
                .send(input)
                .map_err(|e| BatchError::WorkerPool(e.to_string()))?;
        }
        drop(queue_tx);

        let dispatched = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);

        debug!(jobs = self.jobs, total = inputs.len(), "dispatching");

        pool.scope(|scope| {
            for _ in 0..self.jobs {
                let queue = queue_rx.clone();
                let results = results.clone();
                let (dispatched, failed, skipped) = (&dispatched, &failed, &skipped);
                scope.spawn(move |_| {
                    while let Ok(input) = queue.recv() {
                        if self.cancel.is_cancelled() {
                            skipped.fetch_add(1, Ordering::SeqCst);
                            continue;
                        }
                        dispatched.fetch_add(1, Ordering::SeqCst);

                        if !runner.run(input, &results).is_success() {
                            failed.fetch_add(1, Ordering::SeqCst);
                            if self.fail_fast {
                                debug!(id = %input.relative, "fail-fast: cancelling remaining jobs");
                                self.cancel.cancel();
                            }
                        }
                    }
                });
            }
        });
        drop(results);

        Ok(DispatchReport {
            dispatched: dispatched.into_inner(),
            failed: failed.into_inner(),
            skipped: skipped.into_inner(),
        })
    }
}

//! # 单作业执行器
//!
//! 对一个输入文件执行一次转换，并恰好发送一个 `JobResult`。
//!
//! ## 功能
//! - 探测输入大小
//! - 创建输出父目录（幂等）
//! - 调用转换，将任何失败（含 panic）转为 `Outcome::Error`
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `batch/transform.rs`, `utils/fs.rs`

use crate::batch::cancel::CancelToken;
use crate::batch::transform::Transform;
use crate::error::{BatchError, Result};
use crate::models::{InputFile, JobResult, Outcome};
use crate::utils::fs::size_of;

use crossbeam::channel::Sender;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 单作业执行器，在所有 worker 间共享
pub struct JobRunner<'a> {
    transform: &'a dyn Transform,
    output_root: PathBuf,
    output_ext: String,
    cancel: CancelToken,
}

impl<'a> JobRunner<'a> {
    pub fn new(
        transform: &'a dyn Transform,
        output_root: impl Into<PathBuf>,
        output_ext: impl Into<String>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            transform,
            output_root: output_root.into(),
            output_ext: output_ext.into(),
            cancel,
        }
    }

    /// 执行作业并将结果发送到结果通道，返回作业结果状态
    ///
    /// 无论成功与否都会发送。
    pub fn run(&self, input: &InputFile, results: &Sender<JobResult>) -> Outcome {
        let result = self.execute(input);
        let outcome = result.outcome.clone();
        if results.send(result).is_err() {
            warn!(id = %input.relative, "result channel closed, dropping result");
        }
        outcome
    }

    /// 执行作业，不会向外传播错误或 panic
    pub fn execute(&self, input: &InputFile) -> JobResult {
        let (size, sized) = match size_of(&input.path) {
            Ok(size) => (size, Ok(())),
            Err(e) => (input.size, Err(e)),
        };

        let output = input.output_path(&self.output_root, &self.output_ext);
        let attempt = sized.and_then(|_| self.invoke(&input.path, &output));

        let outcome = match attempt {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::Error(e.to_string()),
        };
        debug!(id = %input.relative, size, ?outcome, "job finished");

        JobResult {
            id: input.relative.clone(),
            size,
            outcome,
        }
    }

    fn invoke(&self, input: &Path, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| BatchError::FileWriteError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        panic::catch_unwind(AssertUnwindSafe(|| {
            self.transform.transform(input, output, &self.cancel)
        }))
        .unwrap_or_else(|_| {
            Err(BatchError::TransformFailed {
                command: "transform".to_string(),
                detail: "panicked".to_string(),
            })
        })
    }
}

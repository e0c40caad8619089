//! # 取消令牌
//!
//! 调度器在每个作业启动前检查；外部转换进程在运行中轮询，尽力终止。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `batch/transform.rs` 使用

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 可克隆的取消令牌，所有克隆共享同一状态
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

//! # 进度条工具
//!
//! 封装 `indicatif` 提供统一的状态行样式。
//!
//! ## 依赖关系
//! - 被 `batch/aggregator.rs` 使用
//! - 使用 `indicatif` crate

use indicatif::{ProgressBar, ProgressStyle};

/// 创建原地刷新的单行状态栏，内容完全由 message 决定
pub fn create_status_line() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}

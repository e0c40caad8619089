//! # 诊断日志
//!
//! 初始化 `tracing` 订阅者，输出到 stderr。
//! 默认级别 `warn`，`--verbose` 时本 crate 为 `debug`，`RUST_LOG` 优先。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default = if verbose { "warn,warc_batch=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // 测试或重复初始化时已有全局订阅者，忽略即可
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

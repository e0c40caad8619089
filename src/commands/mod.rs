//! # 命令执行模块
//!
//! 实现批处理命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `models/`, `utils/`
//! - 子模块: run

pub mod run;

use crate::cli::Cli;
use crate::error::Result;
use crate::models::RunSummary;

/// 执行命令
pub fn run(cli: Cli) -> Result<RunSummary> {
    run::execute(run::RunConfig::from(cli.run))
}

//! # warc-batch - WARC 归档批处理
//!
//! 递归发现输入目录中的 `.warc` / `.warc.gz` 文件，在有界 worker 池中
//! 对每个文件调用外部转换程序，并实时汇总进度（吞吐、ETA、成功/失败计数）。
//!
//! ## 退出码
//! - `0`: 全部作业成功
//! - `1`: 任一作业失败、被取消，或预检失败
//! - `2`: 参数错误（由 clap 输出用法）
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     └── batch/     (枚举、调度、执行、聚合)
//!   ├── models/     (数据模型)
//!   ├── utils/      (输出、格式化、日志)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.run.verbose);

    match commands::run(cli) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            utils::output::print_error(&format!("{}", e));
            ExitCode::from(1)
        }
    }
}

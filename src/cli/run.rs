//! # 批处理参数定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use clap::builder::RangedU64ValueParser;
use clap::Args;
use std::path::PathBuf;

/// 批处理参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input directory, searched recursively for *.warc and *.warc.gz
    #[arg(short, long, env = "WARC_BATCH_INPUT")]
    pub input: PathBuf,

    /// Output directory (created if absent)
    #[arg(short, long, env = "WARC_BATCH_OUTPUT")]
    pub output: PathBuf,

    /// Maximum number of concurrent jobs [default: number of CPUs]
    #[arg(
        short,
        long,
        env = "WARC_BATCH_JOBS",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub jobs: Option<usize>,

    /// Print a line for every failed file and enable debug logging
    #[arg(short, long, env = "WARC_BATCH_VERBOSE", default_value_t = false)]
    pub verbose: bool,

    /// Transform program, invoked as `<program> [ARGS...] <input> <output>`
    #[arg(short, long, env = "WARC_BATCH_TRANSFORM", default_value = "warc-processor")]
    pub transform: String,

    /// Extra argument passed to the transform before the paths (repeatable)
    #[arg(long = "transform-arg", allow_hyphen_values = true)]
    pub transform_args: Vec<String>,

    /// Extension appended to each input's relative path to form its output path
    #[arg(long, default_value = "txt")]
    pub output_ext: String,

    /// Stop dispatching new jobs after the first failure
    #[arg(long, default_value_t = false)]
    pub fail_fast: bool,
}

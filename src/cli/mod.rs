//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数，每个参数都可由环境变量提供。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: run

pub mod run;

use clap::Parser;

/// warc-batch - WARC 归档批处理
#[derive(Parser, Debug)]
#[command(name = "warc-batch")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Run an external transform over every WARC archive in a directory tree, in parallel, with live progress",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub run: run::RunArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_required_arguments() {
        assert!(Cli::try_parse_from(["warc-batch"]).is_err());
        assert!(Cli::try_parse_from(["warc-batch", "-i", "in"]).is_err());
        assert!(Cli::try_parse_from(["warc-batch", "-i", "in", "-o", "out"]).is_ok());
    }

    #[test]
    fn test_jobs_must_be_positive() {
        assert!(Cli::try_parse_from(["warc-batch", "-i", "in", "-o", "out", "-j", "0"]).is_err());
        let cli = Cli::try_parse_from(["warc-batch", "-i", "in", "-o", "out", "-j", "4"]).unwrap();
        assert_eq!(cli.run.jobs, Some(4));
    }

    #[test]
    fn test_transform_args_allow_hyphens() {
        let cli = Cli::try_parse_from([
            "warc-batch",
            "-i",
            "in",
            "-o",
            "out",
            "--transform",
            "python3",
            "--transform-arg",
            "warc_processor_main.py",
            "--transform-arg",
            "--parser=lxml",
        ])
        .unwrap();
        assert_eq!(cli.run.transform, "python3");
        assert_eq!(cli.run.transform_args, vec!["warc_processor_main.py", "--parser=lxml"]);
        assert!(!cli.run.verbose);
    }
}

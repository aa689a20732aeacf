//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use super::constants::defaults;
use super::formatter::integrated_table;
use super::utils::extract_filename_lossy;
use crate::config::AnalysisPlan;
use crate::core::SpeciesRegistry;
use crate::processing::{ExecutionMode, RunSummary};
use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 运行配置文件（YAML）
    pub config_path: PathBuf,

    /// 衰变事件数据集（JSON Lines 或 JSON 数组）
    pub input_path: PathBuf,

    /// 输出目录
    pub output_dir: PathBuf,

    /// 是否显示详细信息
    pub verbose: bool,

    /// 粒子对并行度（None 表示串行）
    pub parallel_pairs: Option<usize>,

    /// 是否输出图表规格
    pub charts: bool,
}

impl AppConfig {
    #[inline]
    pub fn execution_mode(&self) -> ExecutionMode {
        match self.parallel_pairs {
            Some(degree) => ExecutionMode::Parallel(degree),
            None => ExecutionMode::Serial,
        }
    }
}

fn build_command() -> Command {
    Command::new("bhadron-dbr")
        .version(VERSION)
        .about(DESCRIPTION)
        .arg(
            Arg::new("CONFIG")
                .help("运行配置文件 (YAML: pdgCodeB, pdgCodeD, binning) / run configuration")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("INPUT")
                .help("衰变事件数据集 (.jsonl / .ndjson / .json) / decay event dataset")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .short('o')
                .help("报告输出目录 / output directory")
                .value_name("DIR")
                .default_value(defaults::OUTPUT_DIR),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .help("粒子对并行度 (1-16) / pair parallelism")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("4"),
        )
        .arg(
            Arg::new("serial")
                .long("serial")
                .help("串行处理所有粒子对 / process pairs serially")
                .action(ArgAction::SetTrue)
                .conflicts_with("parallel"),
        )
        .arg(
            Arg::new("no-charts")
                .long("no-charts")
                .help("不输出图表规格 / skip chart specs")
                .action(ArgAction::SetTrue),
        )
}

/// 从给定参数解析配置（便于测试）
pub fn parse_args_from<I, T>(args: I) -> Result<AppConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_command().try_get_matches_from(args)?;

    let parallel_pairs = if matches.get_flag("serial") {
        None
    } else {
        Some(
            matches
                .get_one::<usize>("parallel")
                .copied()
                .unwrap_or(defaults::PARALLEL_PAIRS_DEGREE),
        )
    };

    Ok(AppConfig {
        config_path: matches
            .get_one::<String>("CONFIG")
            .map(PathBuf::from)
            .unwrap_or_default(),
        input_path: matches
            .get_one::<String>("INPUT")
            .map(PathBuf::from)
            .unwrap_or_default(),
        output_dir: matches
            .get_one::<String>("output-dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(defaults::OUTPUT_DIR)),
        verbose: matches.get_flag("verbose"),
        parallel_pairs,
        charts: !matches.get_flag("no-charts"),
    })
}

/// 解析命令行参数并创建配置（参数错误时由clap打印用法并退出）
pub fn parse_args() -> AppConfig {
    parse_args_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    println!("🚀 bhadron-dbr v{VERSION} 启动");
    println!("📝 {DESCRIPTION}");
    println!(
        "   配置 / config: {}",
        extract_filename_lossy(&config.config_path)
    );
    println!(
        "   数据集 / dataset: {}",
        extract_filename_lossy(&config.input_path)
    );
    if config.verbose {
        match config.parallel_pairs {
            Some(degree) => println!("   并行度 / parallelism: {degree}"),
            None => println!("   串行模式 / serial mode"),
        }
        println!("   输出目录 / output dir: {}", config.output_dir.display());
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(
    config: &AppConfig,
    summary: &RunSummary,
    plan: &AnalysisPlan,
    registry: &SpeciesRegistry,
    written: &[PathBuf],
) {
    println!("{}", integrated_table(summary, plan, registry));
    println!();
    println!(
        "📊 粒子对 / pairs: {} 成功 / succeeded, {} 失败 / failed",
        summary.stats.succeeded, summary.stats.failed
    );
    if config.verbose {
        for path in written {
            println!("   [OK] {}", path.display());
        }
    }
    println!(
        "✅ 已写出 {} 个文件到 / {} files written to {}",
        written.len(),
        written.len(),
        config.output_dir.display()
    );
}

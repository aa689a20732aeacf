//! bhadron-dbr - 主程序入口
//!
//! 纯流程控制器，负责协调各个模块完成分支比分析任务。

use anyhow::Context;
use bhadron_dbr::{
    RunConfig, SpeciesRegistry,
    dataset::load_dataset,
    error::{BrError, ErrorCategory},
    processing::run_analysis,
    tools::{self, AppConfig, ReportOptions},
};
use std::process;
use tracing_subscriber::EnvFilter;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误（I/O等）
    pub const GENERAL_ERROR: i32 = 1;
    /// 配置错误
    pub const CONFIG_ERROR: i32 = 2;
    /// 输入无效
    pub const INPUT_ERROR: i32 = 3;
    /// 数据格式/结构错误
    pub const DATA_ERROR: i32 = 4;
    /// 资源/并发错误
    pub const RESOURCE_ERROR: i32 = 5;
}

/// 获取错误建议文本
fn get_error_suggestion(error: &BrError) -> &'static str {
    match error {
        BrError::ResourceError(_) => {
            "资源不可用，请重试；若持续失败请使用 --serial 串行模式 / Resource unavailable, retry; if it continues to fail, use --serial"
        }
        _ => match ErrorCategory::from_br_error(error) {
            ErrorCategory::Config => {
                "检查配置文件中的 pdgCodeB / pdgCodeD 是否为已注册的粒子代码 / Check that pdgCodeB / pdgCodeD in the config use registered species codes"
            }
            ErrorCategory::Input => {
                "数据集中没有所需母粒子的事件，请检查数据集与配置是否匹配 / The dataset has no events for the requested parents, check that dataset and config match"
            }
            ErrorCategory::Data => {
                "确保数据集为 JSON Lines (.jsonl/.ndjson) 或 JSON 数组 (.json) / Ensure the dataset is JSON Lines (.jsonl/.ndjson) or a JSON array (.json)"
            }
            ErrorCategory::Io => {
                "检查文件路径是否正确，文件是否存在且可读，输出目录是否可写 / Check that paths are correct, files are readable and the output directory is writable"
            }
            ErrorCategory::Other => {
                "请检查输入文件和参数设置 / Please check input files and parameter settings"
            }
        },
    }
}

/// 错误处理和建议
fn handle_error(error: anyhow::Error) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error:#}");

    let exit_code = match error.downcast_ref::<BrError>() {
        Some(br_error) => {
            eprintln!(
                "[INFO] 建议 / Suggestion: {}",
                get_error_suggestion(br_error)
            );
            match br_error {
                BrError::ResourceError(_) => exit_codes::RESOURCE_ERROR,
                _ => match ErrorCategory::from_br_error(br_error) {
                    ErrorCategory::Config => exit_codes::CONFIG_ERROR,
                    ErrorCategory::Input => exit_codes::INPUT_ERROR,
                    ErrorCategory::Data => exit_codes::DATA_ERROR,
                    ErrorCategory::Io | ErrorCategory::Other => exit_codes::GENERAL_ERROR,
                },
            }
        }
        None => exit_codes::GENERAL_ERROR,
    };

    process::exit(exit_code);
}

/// 初始化日志（RUST_LOG 优先，否则 --verbose 为 debug，默认 info）
fn init_logging(config: &AppConfig) {
    let default_level = if config.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// 应用程序主逻辑（便于测试和复用）
fn run(config: &AppConfig) -> anyhow::Result<()> {
    let registry = SpeciesRegistry::builtin();

    // 1. 读取并解析运行配置（任何配置错误都在计算开始前中止）
    let plan = RunConfig::from_path(&config.config_path)
        .and_then(|run_config| run_config.resolve(&registry))
        .with_context(|| format!("无法加载运行配置 {}", config.config_path.display()))?;

    // 2. 读取数据集
    let dataset = load_dataset(&config.input_path)
        .with_context(|| format!("无法读取数据集 {}", config.input_path.display()))?;
    if !dataset.skipped.is_empty() {
        println!(
            "[WARNING] 跳过 {} 个结构错误的事件 / skipped {} malformed events",
            dataset.skipped.len(),
            dataset.skipped.len()
        );
    }

    // 3. 执行所有粒子对的估计
    let summary = run_analysis(&dataset.table, &plan, config.execution_mode())
        .context("分支比分析失败 / branching ratio analysis failed")?;

    // 4. 写出报告
    let options = ReportOptions {
        output_dir: config.output_dir.clone(),
        charts: config.charts,
    };
    let written = tools::emit_reports(
        &summary,
        &plan,
        &registry,
        &dataset.skipped,
        &config.input_path,
        &options,
    )
    .with_context(|| format!("无法写出报告到 {}", config.output_dir.display()))?;

    tools::show_completion_info(config, &summary, &plan, &registry, &written);
    Ok(())
}

fn main() {
    let config = tools::parse_args();

    init_logging(&config);
    tools::show_startup_info(&config);

    if let Err(error) = run(&config) {
        handle_error(error);
    }
}

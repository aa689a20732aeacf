//! 工具模块集合
//!
//! 包含CLI、格式化、图表规格、报告输出等工具模块，支持main.rs的流程控制。

pub mod charts;
pub mod cli;
pub mod constants;
pub mod formatter;
pub mod report;
pub mod utils;

// 重新导出主要的公共接口
pub use charts::{ChartSpec, SeriesSpec, differential_chart, integrated_chart};
pub use cli::{AppConfig, parse_args, parse_args_from, show_completion_info, show_startup_info};
pub use formatter::{
    format_differential_table, format_summary_report, integrated_table, write_differential_table,
};
pub use report::{ReportOptions, emit_reports};
pub use utils::path;

//! 报告输出模块
//!
//! 将一次运行的结果写入输出目录：
//! - 每个成功的粒子对一份微分分支比文本表 `{Bname}to{Dname}.txt`
//! - 每个有结果的母粒子两份图表规格 `BRint{Bname}.json` / `BRvspstar{Bname}.json`
//! - 一份汇总报告 `BRint_summary.txt`

use super::charts::{differential_chart, integrated_chart};
use super::constants::output::SUMMARY_FILE_NAME;
use super::formatter::{format_summary_report, write_differential_table};
use super::utils::path;
use crate::config::AnalysisPlan;
use crate::core::{SpeciesPair, SpeciesRegistry};
use crate::dataset::SkippedEvent;
use crate::error::BrResult;
use crate::processing::RunSummary;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 报告输出选项
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    /// 是否输出图表规格
    pub charts: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(super::constants::defaults::OUTPUT_DIR),
            charts: true,
        }
    }
}

/// 写出全部报告，返回已写出的文件路径（按写出顺序）
pub fn emit_reports(
    summary: &RunSummary,
    plan: &AnalysisPlan,
    registry: &SpeciesRegistry,
    skipped: &[SkippedEvent],
    dataset: &Path,
    options: &ReportOptions,
) -> BrResult<Vec<PathBuf>> {
    let dir = options.output_dir.as_path();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();

    for &parent_code in &plan.parents {
        let parent = registry.require_parent(parent_code)?;

        // 1️⃣ 微分分支比表（按配置中的子粒子顺序）
        let mut has_results = false;
        for &daughter_code in &plan.daughters {
            let pair = SpeciesPair::new(parent_code, daughter_code);
            let Some(result) = summary.results.get(&pair) else {
                continue;
            };
            let daughter = registry.require_daughter(daughter_code)?;

            let table_path = path::differential_table_path(dir, parent.name, daughter.name);
            write_differential_table(&table_path, &result.differential)?;
            debug!(%pair, path = %table_path.display(), "differential table written");
            written.push(table_path);
            has_results = true;
        }

        // 2️⃣ 图表规格（没有任何结果的母粒子不出图）
        if options.charts && has_results {
            let int_path = path::integrated_chart_path(dir, parent.name);
            integrated_chart(parent, summary, plan, registry)?.write_json(&int_path)?;
            written.push(int_path);

            let diff_path = path::differential_chart_path(dir, parent.name);
            differential_chart(parent, summary, plan, registry)?.write_json(&diff_path)?;
            written.push(diff_path);
        }
    }

    // 3️⃣ 汇总报告
    let summary_path = dir.join(SUMMARY_FILE_NAME);
    std::fs::write(
        &summary_path,
        format_summary_report(summary, plan, registry, skipped, dataset),
    )?;
    written.push(summary_path);

    info!(
        files = written.len(),
        dir = %dir.display(),
        "reports written"
    );

    Ok(written)
}

//! 输出格式化模块
//!
//! 负责分支比结果的文本输出：
//! - 每个粒子对的微分分支比表（`pstar_min pstar_max BR BRunc`，空格分隔，8位小数）
//! - 积分分支比汇总表（comfy-table）
//! - 运行汇总报告（结果表 + 失败列表 + 跳过事件列表 + 统计）

use super::constants::output::{DECIMAL_PLACES, TABLE_COLUMNS};
use super::utils::number;
use crate::config::AnalysisPlan;
use crate::core::{DifferentialBranchingRatioResult, SpeciesPair, SpeciesRegistry};
use crate::dataset::SkippedEvent;
use crate::error::BrResult;
use crate::processing::RunSummary;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use std::path::Path;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 格式化微分分支比表
pub fn format_differential_table(results: &[DifferentialBranchingRatioResult]) -> String {
    let mut output = String::with_capacity((results.len() + 1) * 48);

    output.push_str(&TABLE_COLUMNS.join(" "));
    output.push('\n');

    for r in results {
        output.push_str(&format!(
            "{} {} {} {}\n",
            number::fixed(r.bin.min, DECIMAL_PLACES),
            number::fixed(r.bin.max, DECIMAL_PLACES),
            number::fixed(r.value, DECIMAL_PLACES),
            number::fixed(r.uncertainty, DECIMAL_PLACES),
        ));
    }

    output
}

/// 写出微分分支比表
pub fn write_differential_table(
    path: &Path,
    results: &[DifferentialBranchingRatioResult],
) -> BrResult<()> {
    std::fs::write(path, format_differential_table(results))?;
    Ok(())
}

fn display_names(registry: &SpeciesRegistry, pair: SpeciesPair) -> (String, String) {
    let parent = registry
        .parent(pair.parent)
        .map(|p| p.name.to_string())
        .unwrap_or_else(|| pair.parent.to_string());
    let daughter = registry
        .daughter(pair.daughter)
        .map(|d| d.name.to_string())
        .unwrap_or_else(|| pair.daughter.to_string());
    (parent, daughter)
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// 积分分支比汇总表（按计划顺序，失败的组合显示为 FAILED）
pub fn integrated_table(
    summary: &RunSummary,
    plan: &AnalysisPlan,
    registry: &SpeciesRegistry,
) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["B", "D", "N(B)", "N(D)", "BR", "Var(BR)", "σ(BR)"]);

    for pair in plan.pairs() {
        let (parent_name, daughter_name) = display_names(registry, pair);
        match summary.results.get(&pair) {
            Some(result) => {
                let br = &result.integrated;
                table.add_row(vec![
                    Cell::new(parent_name),
                    Cell::new(daughter_name),
                    right(br.total_parent_events.to_string()),
                    right(br.numerator_count.to_string()),
                    right(number::fixed(br.value, 6)),
                    right(number::scientific(br.variance)),
                    right(number::scientific(br.std_dev())),
                ]);
            }
            None => {
                let total = summary
                    .parent_event_counts
                    .get(&pair.parent)
                    .copied()
                    .unwrap_or(0);
                table.add_row(vec![
                    Cell::new(parent_name),
                    Cell::new(daughter_name),
                    right(total.to_string()),
                    right("-".to_string()),
                    Cell::new("FAILED"),
                    Cell::new(""),
                    Cell::new(""),
                ]);
            }
        }
    }

    table
}

/// 创建汇总报告头部信息
pub fn create_summary_header(dataset: &Path) -> String {
    let mut output = String::new();

    output.push_str("=====================================\n");
    output.push_str("   B → D + X Branching Ratio Report\n");
    output.push_str("   分支比分析结果\n");
    output.push_str("=====================================\n\n");

    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    output.push_str(&format!("生成时间 / log date: {now}\n"));
    output.push_str(&format!("数据集 / dataset: {}\n\n", dataset.display()));

    output
}

/// 生成完整的汇总报告
pub fn format_summary_report(
    summary: &RunSummary,
    plan: &AnalysisPlan,
    registry: &SpeciesRegistry,
    skipped: &[SkippedEvent],
    dataset: &Path,
) -> String {
    let mut output = create_summary_header(dataset);

    // 1️⃣ 母粒子事件数
    output.push_str("母粒子事件数 / parent populations:\n");
    for (parent, count) in &summary.parent_event_counts {
        let name = registry
            .parent(*parent)
            .map(|p| p.name)
            .unwrap_or("unknown");
        output.push_str(&format!("   {name} ({parent}): {count}\n"));
    }
    output.push('\n');

    // 2️⃣ 积分分支比表
    output.push_str(&integrated_table(summary, plan, registry).to_string());
    output.push_str("\n\n");

    // 3️⃣ 失败列表
    if !summary.failures.is_empty() {
        output.push_str("失败的粒子对 / failed pairs:\n");
        for failure in &summary.failures {
            output.push_str(&format!(
                "   [{}] {}: {}\n",
                failure.category.display_name(),
                failure.pair,
                failure.message
            ));
        }
        output.push('\n');
    }

    // 4️⃣ 跳过的事件
    if !skipped.is_empty() {
        output.push_str(&format!(
            "跳过的事件 / skipped events: {}\n",
            skipped.len()
        ));
        for event in skipped {
            output.push_str(&format!("   #{}: {}\n", event.record, event.reason));
        }
        output.push('\n');
    }

    output.push_str(&create_summary_footer(summary));
    output
}

/// 生成汇总报告的统计信息
pub fn create_summary_footer(summary: &RunSummary) -> String {
    let stats = &summary.stats;
    let mut output = String::new();

    output.push_str("=====================================\n");
    output.push_str("批量处理统计 / batch statistics:\n");
    output.push_str(&format!("   粒子对总数: {}\n", stats.total()));
    output.push_str(&format!("   成功估计: {}\n", stats.succeeded));
    output.push_str(&format!("   估计失败: {}\n", stats.failed));
    if stats.total() > 0 {
        output.push_str(&format!(
            "   成功率: {:.1}%\n",
            stats.succeeded as f64 / stats.total() as f64 * 100.0
        ));
    }
    output.push('\n');
    output.push_str(&format!("生成工具: bhadron-dbr v{VERSION}\n"));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MomentumBin, MomentumBinning};

    #[test]
    fn test_differential_table_format() {
        let results = vec![
            DifferentialBranchingRatioResult {
                bin: MomentumBin { min: 0.0, max: 0.01 },
                raw_count: 0,
                value: 0.0,
                uncertainty: 0.0,
            },
            DifferentialBranchingRatioResult {
                bin: MomentumBin {
                    min: 1.23,
                    max: 1.24,
                },
                raw_count: 50,
                value: 0.05,
                uncertainty: 50f64.sqrt() / 1000.0,
            },
        ];

        let text = format_differential_table(&results);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "pstar_min pstar_max BR BRunc");
        assert_eq!(lines[1], "0.00000000 0.01000000 0.00000000 0.00000000");
        assert_eq!(lines[2], "1.23000000 1.24000000 0.05000000 0.00707107");
    }

    #[test]
    fn test_standard_table_has_all_bins() {
        let binning = MomentumBinning::standard();
        let results: Vec<_> = binning
            .bins()
            .iter()
            .map(|&bin| DifferentialBranchingRatioResult {
                bin,
                raw_count: 0,
                value: 0.0,
                uncertainty: 0.0,
            })
            .collect();

        let text = format_differential_table(&results);
        assert_eq!(text.lines().count(), 301);
        assert!(text.ends_with("2.99000000 3.00000000 0.00000000 0.00000000\n"));
    }
}

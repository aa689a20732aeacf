//! 图表规格
//!
//! 不直接渲染图像，而是输出绘图友好的 JSON 规格（数组优先，扁平结构），
//! 由外部绘图工具渲染：
//! - 每个母粒子一张积分分支比散点图（每个子粒子一个点，对数纵轴）
//! - 每个母粒子一张微分分支比直方图（叠加所有子粒子曲线，对数纵轴）

use super::constants::charts::{
    DIFFERENTIAL_Y_RANGE, FIGURE_SIZE, FILL_ALPHA, FONT_SIZE, INTEGRATED_Y_RANGE,
    MOMENTUM_AXIS_LABEL,
};
use crate::config::AnalysisPlan;
use crate::core::{ParentSpecies, SpeciesPair, SpeciesRegistry};
use crate::error::BrResult;
use crate::processing::RunSummary;
use serde::Serialize;
use std::path::Path;

/// 规格版本
pub const CHART_SCHEMA_VERSION: &str = "bhadron_dbr_chart_v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Scatter,
    Histogram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    Linear,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub scale: AxisScale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    pub font_size: f64,
}

/// 单条数据序列
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeriesSpec {
    /// 分类散点（积分分支比）
    Points {
        label: String,
        color: String,
        category: String,
        value: f64,
        /// 二项方差的平方根
        uncertainty: f64,
    },
    /// 加权直方图（微分分支比），先画半透明填充再画轮廓线
    Histogram {
        label: String,
        color: String,
        bin_edges: Vec<f64>,
        bin_centers: Vec<f64>,
        values: Vec<f64>,
        uncertainties: Vec<f64>,
        fill_alpha: f64,
    },
}

/// 完整的图表规格
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub schema_version: String,
    pub kind: ChartKind,
    /// 母粒子文件名安全名称
    pub parent: String,
    pub figure_size: [f64; 2],
    pub grid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<String>,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub series: Vec<SeriesSpec>,
}

impl ChartSpec {
    fn new(kind: ChartKind, parent: &ParentSpecies, x_axis: AxisSpec, y_axis: AxisSpec) -> Self {
        Self {
            schema_version: CHART_SCHEMA_VERSION.to_string(),
            kind,
            parent: parent.name.to_string(),
            figure_size: [FIGURE_SIZE.0, FIGURE_SIZE.1],
            grid: kind == ChartKind::Scatter,
            legend: (kind == ChartKind::Histogram).then(|| "best".to_string()),
            x_axis,
            y_axis,
            series: Vec::new(),
        }
    }

    pub fn write_json(&self, path: &Path) -> BrResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn decay_label(parent: &ParentSpecies) -> String {
    format!(r"BR({} $\rightarrow$ D+X)", parent.label)
}

/// 积分分支比散点图：按配置顺序每个成功的子粒子一个点
pub fn integrated_chart(
    parent: &ParentSpecies,
    summary: &RunSummary,
    plan: &AnalysisPlan,
    registry: &SpeciesRegistry,
) -> BrResult<ChartSpec> {
    let x_axis = AxisSpec {
        label: None,
        scale: AxisScale::Linear,
        range: None,
        font_size: FONT_SIZE,
    };
    let y_axis = AxisSpec {
        label: Some(decay_label(parent)),
        scale: AxisScale::Log,
        range: Some([INTEGRATED_Y_RANGE.0, INTEGRATED_Y_RANGE.1]),
        font_size: FONT_SIZE,
    };
    let mut chart = ChartSpec::new(ChartKind::Scatter, parent, x_axis, y_axis);

    for &daughter_code in &plan.daughters {
        let Some(result) = summary
            .results
            .get(&SpeciesPair::new(parent.code, daughter_code))
        else {
            continue;
        };
        let daughter = registry.require_daughter(daughter_code)?;

        chart.series.push(SeriesSpec::Points {
            label: daughter.label.to_string(),
            color: daughter.color.to_string(),
            category: daughter.label.to_string(),
            value: result.integrated.value,
            uncertainty: result.integrated.std_dev(),
        });
    }

    Ok(chart)
}

/// 微分分支比直方图：叠加该母粒子下所有成功的子粒子曲线
pub fn differential_chart(
    parent: &ParentSpecies,
    summary: &RunSummary,
    plan: &AnalysisPlan,
    registry: &SpeciesRegistry,
) -> BrResult<ChartSpec> {
    let bin_edges = plan.binning.edges();
    let bin_centers: Vec<f64> = plan.binning.bins().iter().map(|b| b.center()).collect();

    let x_axis = AxisSpec {
        label: Some(MOMENTUM_AXIS_LABEL.to_string()),
        scale: AxisScale::Linear,
        range: bin_edges.first().zip(bin_edges.last()).map(|(lo, hi)| [*lo, *hi]),
        font_size: FONT_SIZE,
    };
    let y_axis = AxisSpec {
        label: Some(format!(
            "{} per {} GeV/$c$",
            decay_label(parent),
            plan.binning.width()
        )),
        scale: AxisScale::Log,
        range: Some([DIFFERENTIAL_Y_RANGE.0, DIFFERENTIAL_Y_RANGE.1]),
        font_size: FONT_SIZE,
    };
    let mut chart = ChartSpec::new(ChartKind::Histogram, parent, x_axis, y_axis);

    for &daughter_code in &plan.daughters {
        let Some(result) = summary
            .results
            .get(&SpeciesPair::new(parent.code, daughter_code))
        else {
            continue;
        };
        let daughter = registry.require_daughter(daughter_code)?;

        chart.series.push(SeriesSpec::Histogram {
            label: format!(r"{} $\rightarrow$ {} + X", parent.label, daughter.label),
            color: daughter.color.to_string(),
            bin_edges: bin_edges.clone(),
            bin_centers: bin_centers.clone(),
            values: result.differential.iter().map(|r| r.value).collect(),
            uncertainties: result.differential.iter().map(|r| r.uncertainty).collect(),
            fill_alpha: FILL_ALPHA,
        });
    }

    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Candidate, Event, EventTable, MomentumBinning};
    use crate::processing::{ExecutionMode, run_analysis};

    fn bzero_summary(daughters: Vec<i32>) -> (RunSummary, AnalysisPlan) {
        let table = EventTable::from(vec![
            Event::new(511, vec![Candidate::new(0.255, 0.0, 421)]),
            Event::without_candidates(511),
        ]);
        let plan = AnalysisPlan {
            parents: vec![511],
            daughters,
            binning: MomentumBinning::uniform(0.5, 3.0).unwrap(),
        };
        let summary = run_analysis(&table, &plan, ExecutionMode::Serial).unwrap();
        (summary, plan)
    }

    #[test]
    fn test_integrated_chart_points_follow_plan_order() {
        let registry = SpeciesRegistry::builtin();
        let (summary, plan) = bzero_summary(vec![411, 421]);
        let parent = registry.require_parent(511).unwrap();

        let chart = integrated_chart(parent, &summary, &plan, &registry).unwrap();

        assert_eq!(chart.kind, ChartKind::Scatter);
        assert!(chart.grid);
        assert_eq!(chart.series.len(), 2);
        match &chart.series[1] {
            SeriesSpec::Points { value, uncertainty, .. } => {
                assert_eq!(*value, 0.5);
                assert_eq!(*uncertainty, 0.125f64.sqrt());
            }
            other => panic!("unexpected series {other:?}"),
        }
    }

    #[test]
    fn test_differential_chart_uses_plan_binning() {
        let registry = SpeciesRegistry::builtin();
        let (summary, plan) = bzero_summary(vec![421]);
        let parent = registry.require_parent(511).unwrap();

        let chart = differential_chart(parent, &summary, &plan, &registry).unwrap();

        assert_eq!(chart.x_axis.range, Some([0.0, 3.0]));
        assert_eq!(chart.legend.as_deref(), Some("best"));
        assert!(
            chart
                .y_axis
                .label
                .as_deref()
                .is_some_and(|l| l.ends_with("per 0.5 GeV/$c$"))
        );
        match &chart.series[0] {
            SeriesSpec::Histogram {
                bin_edges,
                bin_centers,
                values,
                ..
            } => {
                assert_eq!(bin_edges.len(), 7);
                assert_eq!(bin_centers[0], 0.25);
                assert_eq!(values, &vec![0.5, 0.0, 0.0, 0.0, 0.0, 0.0]);
            }
            other => panic!("unexpected series {other:?}"),
        }
    }
}

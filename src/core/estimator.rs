//! 分支比估计器
//!
//! 两个纯函数：
//! - 积分分支比：`BR = N_D / N_B`，二项比例方差 `BR(1-BR)/N_B`
//! - 微分分支比：按动量分箱计数，每个bin的泊松误差 `sqrt(N_i)`，再统一除以 `N_B`
//!
//! `N_B` 是该母粒子的事件总数，同一母粒子下所有子粒子、两个估计器共用同一个值。

use super::binning::MomentumBin;
use super::histogram::MomentumHistogram;
use super::selector::SelectedCandidate;
use crate::error::{BrError, BrResult};
use serde::Serialize;
use tracing::debug;

/// 积分分支比结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BranchingRatioResult {
    /// 分支比（当一个事件含多个同种子粒子时可以大于1，不做截断）
    pub value: f64,

    /// 二项比例方差估计
    pub variance: f64,

    /// 分子：选中的候选数
    pub numerator_count: u64,

    /// 分母：母粒子事件总数
    pub total_parent_events: u64,
}

impl BranchingRatioResult {
    /// 标准差（方差为负时按0处理）
    pub fn std_dev(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }
}

/// 单个动量bin的微分分支比
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifferentialBranchingRatioResult {
    pub bin: MomentumBin,

    /// 归一化前的原始计数
    pub raw_count: u64,

    pub value: f64,

    /// 标准差（非负）
    pub uncertainty: f64,
}

fn require_parent_events(total_parent_events: u64) -> BrResult<f64> {
    if total_parent_events == 0 {
        return Err(BrError::InvalidInput(
            "母粒子事件数为零，无法归一化 / zero parent events, cannot normalize".to_string(),
        ));
    }
    Ok(total_parent_events as f64)
}

/// 积分分支比
///
/// # 错误
///
/// * `BrError::InvalidInput` - `total_parent_events == 0`
pub fn estimate_integrated(
    numerator: &[SelectedCandidate],
    total_parent_events: u64,
) -> BrResult<BranchingRatioResult> {
    let n = require_parent_events(total_parent_events)?;

    let numerator_count = numerator.len() as u64;
    let value = numerator_count as f64 / n;
    let variance = value * (1.0 - value) / n;

    Ok(BranchingRatioResult {
        value,
        variance,
        numerator_count,
        total_parent_events,
    })
}

/// 微分分支比，输出与 `bins` 一一对应
///
/// 区间外的候选不计入任何bin（不是错误）。空bin得到 `value = 0, uncertainty = 0`。
///
/// # 错误
///
/// * `BrError::InvalidInput` - `total_parent_events == 0` 或 `bins` 为空
pub fn estimate_differential(
    numerator: &[SelectedCandidate],
    total_parent_events: u64,
    bins: &[MomentumBin],
) -> BrResult<Vec<DifferentialBranchingRatioResult>> {
    let n = require_parent_events(total_parent_events)?;
    if bins.is_empty() {
        return Err(BrError::InvalidInput(
            "动量分箱为空 / empty momentum partition".to_string(),
        ));
    }

    // 1️⃣ 按输入顺序计数
    let mut histogram = MomentumHistogram::new(bins);
    histogram.fill_all(numerator.iter().map(SelectedCandidate::momentum));

    if histogram.out_of_range() > 0 {
        debug!(
            binned = histogram.total_entries(),
            underflow = histogram.underflow(),
            overflow = histogram.overflow(),
            "candidates outside the momentum partition were excluded"
        );
    }

    // 2️⃣ 泊松误差，再统一归一化
    let raw_uncertainties = histogram.poisson_uncertainties();

    Ok(bins
        .iter()
        .zip(histogram.counts())
        .zip(raw_uncertainties)
        .map(
            |((bin, &raw_count), raw_uncertainty)| DifferentialBranchingRatioResult {
                bin: *bin,
                raw_count,
                value: raw_count as f64 / n,
                uncertainty: raw_uncertainty / n,
            },
        )
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binning::MomentumBinning;
    use crate::core::event::Candidate;

    fn candidates_at(momenta: &[f64]) -> Vec<SelectedCandidate> {
        momenta
            .iter()
            .enumerate()
            .map(|(i, &p)| SelectedCandidate {
                event_index: i,
                parent_species: 511,
                candidate: Candidate::new(p, 0.0, 421),
            })
            .collect()
    }

    #[test]
    fn test_integrated_zero_parent_events() {
        let result = estimate_integrated(&[], 0);
        assert!(matches!(result, Err(BrError::InvalidInput(_))));
    }

    #[test]
    fn test_integrated_empty_numerator() {
        let result = estimate_integrated(&[], 10).unwrap();
        assert_eq!(result.value, 0.0);
        assert_eq!(result.variance, 0.0);
        assert_eq!(result.std_dev(), 0.0);
    }

    #[test]
    fn test_integrated_value_above_one_is_kept() {
        let numerator = candidates_at(&[0.1, 0.2, 0.3]);
        let result = estimate_integrated(&numerator, 2).unwrap();

        assert_eq!(result.value, 1.5);
        assert!(result.variance < 0.0);
        assert_eq!(result.std_dev(), 0.0);
    }

    #[test]
    fn test_differential_rejects_empty_partition() {
        let numerator = candidates_at(&[0.5]);
        assert!(matches!(
            estimate_differential(&numerator, 1, &[]),
            Err(BrError::InvalidInput(_))
        ));
        assert!(matches!(
            estimate_differential(&numerator, 0, MomentumBinning::standard().bins()),
            Err(BrError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_differential_normalizes_by_parent_events() {
        let binning = MomentumBinning::uniform(1.0, 3.0).unwrap();
        let numerator = candidates_at(&[0.5, 0.5, 0.5, 0.5, 2.5, 9.0]);

        let results = estimate_differential(&numerator, 8, binning.bins()).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].raw_count, 4);
        assert_eq!(results[0].value, 0.5);
        assert_eq!(results[0].uncertainty, 2.0 / 8.0);
        assert_eq!(results[1].value, 0.0);
        assert_eq!(results[1].uncertainty, 0.0);
        assert_eq!(results[2].value, 1.0 / 8.0);
    }
}

//! 动量分箱
//!
//! 固定宽度的半开区间 `[min, max)` 划分。标准划分覆盖 `[0, 3.0)` GeV/c，宽度 0.01，共300个bin。
//!
//! 边界按 `i * width` 直接计算而不是逐步累加，保证同一个边界值在相邻两个bin中
//! 完全相同（`min_i == max_{i-1}`），落在边界上的动量只会进入上方的bin。

use crate::error::{BrError, BrResult};
use serde::Serialize;

/// 标准分箱宽度（GeV/c）
pub const STANDARD_BIN_WIDTH: f64 = 0.01;

/// 标准分箱上边界（GeV/c）
pub const STANDARD_P_MAX: f64 = 3.0;

/// 单个划分允许的最大bin数
pub const MAX_BINS: usize = 1_000_000;

/// 分箱上边界必须是宽度整数倍时允许的相对误差
const EDGE_TOLERANCE: f64 = 1e-9;

/// 单个动量区间 `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MomentumBin {
    pub min: f64,
    pub max: f64,
}

impl MomentumBin {
    #[inline]
    pub fn contains(&self, momentum: f64) -> bool {
        self.min <= momentum && momentum < self.max
    }

    #[inline]
    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// 有序、连续、不重叠的动量划分
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumBinning {
    bins: Vec<MomentumBin>,
    width: f64,
}

impl MomentumBinning {
    /// 标准划分：`[0, 3.0)`，宽度0.01，300个bin
    pub fn standard() -> Self {
        Self::build(STANDARD_BIN_WIDTH, 300)
    }

    /// 从0开始的均匀划分，`p_max` 必须是 `width` 的整数倍
    pub fn uniform(width: f64, p_max: f64) -> BrResult<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(BrError::InvalidInput(format!(
                "分箱宽度必须为正数: {width}"
            )));
        }
        if !(p_max.is_finite() && p_max > 0.0) {
            return Err(BrError::InvalidInput(format!(
                "分箱上边界必须为正数: {p_max}"
            )));
        }

        let n_bins = (p_max / width).round();
        if n_bins < 1.0 || ((n_bins * width) - p_max).abs() > EDGE_TOLERANCE * p_max {
            return Err(BrError::InvalidInput(format!(
                "分箱上边界 {p_max} 不是宽度 {width} 的整数倍"
            )));
        }

        if n_bins > MAX_BINS as f64 {
            return Err(BrError::InvalidInput(format!(
                "分箱数量 {n_bins:.0} 超过上限 {MAX_BINS} (width={width}, pMax={p_max})"
            )));
        }

        Ok(Self::build(width, n_bins as usize))
    }

    fn build(width: f64, n_bins: usize) -> Self {
        let bins = (0..n_bins)
            .map(|i| MomentumBin {
                min: i as f64 * width,
                max: (i + 1) as f64 * width,
            })
            .collect();
        Self { bins, width }
    }

    pub fn bins(&self) -> &[MomentumBin] {
        &self.bins
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// 所有边界（`len() + 1` 个，含闭合边界）
    pub fn edges(&self) -> Vec<f64> {
        let mut edges: Vec<f64> = self.bins.iter().map(|b| b.min).collect();
        if let Some(last) = self.bins.last() {
            edges.push(last.max);
        }
        edges
    }

    pub fn locate(&self, momentum: f64) -> Option<usize> {
        locate_bin(&self.bins, momentum)
    }
}

impl Default for MomentumBinning {
    fn default() -> Self {
        Self::standard()
    }
}

/// 查找包含 `momentum` 的唯一bin索引
///
/// 要求 `bins` 按顺序排列且互不重叠。区间外（以及NaN）返回 `None`。
pub fn locate_bin(bins: &[MomentumBin], momentum: f64) -> Option<usize> {
    let index = bins.partition_point(|b| b.max <= momentum);
    bins.get(index)
        .filter(|b| b.min <= momentum)
        .map(|_| index)
}

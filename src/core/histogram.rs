//! 动量直方图
//!
//! 按输入顺序把候选动量计入一组有序bin，区间外的值不计入任何bin，只在溢出计数中体现。

use super::binning::{MomentumBin, locate_bin};

/// 基于任意有序划分的计数直方图
///
/// - 每个bin统计落在 `[min, max)` 内的条目数
/// - 低于首个下边界的条目计入 underflow
/// - 其余未落入任何bin的条目（高于上边界、NaN）计入 overflow
#[derive(Debug, Clone)]
pub struct MomentumHistogram<'a> {
    bins: &'a [MomentumBin],

    /// 每个bin的计数器
    counts: Vec<u64>,

    /// 落入某个bin的条目总数
    total_entries: u64,

    underflow: u64,
    overflow: u64,
}

impl<'a> MomentumHistogram<'a> {
    pub fn new(bins: &'a [MomentumBin]) -> Self {
        Self {
            bins,
            counts: vec![0; bins.len()],
            total_entries: 0,
            underflow: 0,
            overflow: 0,
        }
    }

    /// 计入单个动量值
    pub fn fill(&mut self, momentum: f64) {
        match locate_bin(self.bins, momentum) {
            Some(index) => {
                self.counts[index] += 1;
                self.total_entries += 1;
            }
            None => {
                let below = self.bins.first().is_some_and(|b| momentum < b.min);
                if below {
                    self.underflow += 1;
                } else {
                    self.overflow += 1;
                }
            }
        }
    }

    /// 按迭代顺序计入全部动量值
    pub fn fill_all<I: IntoIterator<Item = f64>>(&mut self, momenta: I) {
        for momentum in momenta {
            self.fill(momentum);
        }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total_entries(&self) -> u64 {
        self.total_entries
    }

    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// 未计入任何bin的条目数
    pub fn out_of_range(&self) -> u64 {
        self.underflow + self.overflow
    }

    /// 每个bin的泊松计数误差 `sqrt(N)`（空bin为0）
    pub fn poisson_uncertainties(&self) -> Vec<f64> {
        self.counts.iter().map(|&n| (n as f64).sqrt()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binning::MomentumBinning;

    #[test]
    fn test_histogram_creation() {
        let binning = MomentumBinning::standard();
        let histogram = MomentumHistogram::new(binning.bins());

        assert_eq!(histogram.counts().len(), 300);
        assert_eq!(histogram.total_entries(), 0);
        assert_eq!(histogram.out_of_range(), 0);
    }

    #[test]
    fn test_fill_and_overflow() {
        let binning = MomentumBinning::uniform(1.0, 3.0).unwrap();
        let mut histogram = MomentumHistogram::new(binning.bins());

        histogram.fill_all([0.0, 0.5, 1.0, 2.9, 3.0, 7.5, -0.1, f64::NAN]);

        assert_eq!(histogram.counts(), &[2, 1, 1]);
        assert_eq!(histogram.total_entries(), 4);
        assert_eq!(histogram.underflow(), 1);
        assert_eq!(histogram.overflow(), 3);
    }

    #[test]
    fn test_poisson_uncertainties() {
        let binning = MomentumBinning::uniform(1.0, 2.0).unwrap();
        let mut histogram = MomentumHistogram::new(binning.bins());

        histogram.fill_all(std::iter::repeat_n(0.5, 4));

        assert_eq!(histogram.poisson_uncertainties(), vec![2.0, 0.0]);
    }
}

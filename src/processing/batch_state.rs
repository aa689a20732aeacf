//! 批处理状态管理模块
//!
//! 统计每个 (母粒子, 子粒子) 组合的成功/失败，支持串行和并行两种模式。

use crate::core::SpeciesPair;
use crate::error::ErrorCategory;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// 批处理统计快照
#[derive(Debug, Clone, Default)]
pub struct PairStatsSnapshot {
    /// 成功估计的组合数
    pub succeeded: usize,
    /// 失败的组合数
    pub failed: usize,
    /// 错误分类统计（错误类型 -> 失败组合列表）
    pub error_stats: HashMap<ErrorCategory, Vec<SpeciesPair>>,
}

impl PairStatsSnapshot {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// 串行批处理统计（单线程）
#[derive(Debug, Default)]
pub struct SerialPairStats {
    succeeded: usize,
    failed: usize,
    error_stats: HashMap<ErrorCategory, Vec<SpeciesPair>>,
}

impl SerialPairStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn inc_succeeded(&mut self) -> usize {
        self.succeeded += 1;
        self.succeeded
    }

    /// 增加失败计数并记录错误分类
    #[inline]
    pub fn inc_failed(&mut self, category: ErrorCategory, pair: SpeciesPair) -> usize {
        self.failed += 1;
        self.error_stats.entry(category).or_default().push(pair);
        self.failed
    }

    /// 统计快照（失败组合排序，与并行版本一致）
    pub fn snapshot(&self) -> PairStatsSnapshot {
        let mut error_stats = self.error_stats.clone();
        for pairs in error_stats.values_mut() {
            pairs.sort();
        }
        PairStatsSnapshot {
            succeeded: self.succeeded,
            failed: self.failed,
            error_stats,
        }
    }
}

/// 并行批处理统计（多线程安全）
///
/// 克隆后共享同一份计数。
#[derive(Debug, Clone)]
pub struct ParallelPairStats {
    succeeded: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
    error_stats: Arc<Mutex<HashMap<ErrorCategory, Vec<SpeciesPair>>>>,
}

impl ParallelPairStats {
    pub fn new() -> Self {
        Self {
            succeeded: Arc::new(AtomicUsize::new(0)),
            failed: Arc::new(AtomicUsize::new(0)),
            error_stats: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[inline]
    pub fn inc_succeeded(&self) -> usize {
        self.succeeded.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// 增加失败计数并记录错误分类（线程安全）
    pub fn inc_failed(&self, category: ErrorCategory, pair: SpeciesPair) -> usize {
        let count = self.failed.fetch_add(1, Ordering::Relaxed) + 1;

        self.error_stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(category)
            .or_default()
            .push(pair);

        count
    }

    /// 获取统计快照
    ///
    /// 并行写入顺序不确定，快照中每个类别的组合列表按键排序。
    pub fn snapshot(&self) -> PairStatsSnapshot {
        let mut error_stats = self
            .error_stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for pairs in error_stats.values_mut() {
            pairs.sort();
        }

        PairStatsSnapshot {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            error_stats,
        }
    }
}

impl Default for ParallelPairStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrError;

    fn input_category() -> ErrorCategory {
        ErrorCategory::from_br_error(&BrError::InvalidInput("zero parent events".to_string()))
    }

    #[test]
    fn test_serial_stats_basic() {
        let mut stats = SerialPairStats::new();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total(), 0);
        assert!(snapshot.error_stats.is_empty());

        assert_eq!(stats.inc_succeeded(), 1);
        assert_eq!(stats.inc_succeeded(), 2);

        let category = input_category();
        assert_eq!(stats.inc_failed(category, SpeciesPair::new(531, 421)), 1);
        assert_eq!(stats.inc_failed(category, SpeciesPair::new(531, 411)), 2);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.succeeded, 2);
        assert_eq!(snapshot.failed, 2);
        assert_eq!(snapshot.error_stats[&category].len(), 2);
    }

    #[test]
    fn test_parallel_stats_concurrent_updates() {
        use rayon::prelude::*;

        let stats = ParallelPairStats::new();
        let category = input_category();

        (0..100).into_par_iter().for_each(|_| {
            stats.inc_succeeded();
        });
        (0..50).into_par_iter().for_each(|i| {
            stats.inc_failed(category, SpeciesPair::new(511, i));
        });

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.succeeded, 100);
        assert_eq!(snapshot.failed, 50);

        let pairs = &snapshot.error_stats[&category];
        assert_eq!(pairs.len(), 50);
        assert!(pairs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_parallel_stats_survive_poisoned_lock() {
        let stats = ParallelPairStats::new();
        let category = input_category();

        let poisoner = stats.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.error_stats.lock().unwrap();
            panic!("worker panicked while holding the stats lock");
        })
        .join();
        assert!(stats.error_stats.is_poisoned());

        assert_eq!(stats.inc_failed(category, SpeciesPair::new(5122, 421)), 1);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.failed, 1);
        assert_eq!(
            snapshot.error_stats[&category],
            vec![SpeciesPair::new(5122, 421)]
        );
    }

    #[test]
    fn test_parallel_stats_clone_shares_state() {
        let stats1 = ParallelPairStats::new();
        stats1.inc_succeeded();

        let stats2 = stats1.clone();
        stats2.inc_succeeded();

        assert_eq!(stats1.snapshot().succeeded, 2);
        assert_eq!(stats2.snapshot().succeeded, 2);
    }
}

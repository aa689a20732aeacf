//! 分析处理模块
//!
//! 粒子对级别的分析流水线与批处理统计。

pub mod batch_state;
pub mod pipeline;

pub use batch_state::{PairStatsSnapshot, ParallelPairStats, SerialPairStats};
pub use pipeline::{
    ExecutionMode, PairFailure, PairResult, RunSummary, analyze_pair, run_analysis,
};

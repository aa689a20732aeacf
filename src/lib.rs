//! B → D + X Branching Ratio Analysis Tool
//!
//! 从模拟衰变事件中估计 B 强子（B⁰、B⁺、B_s⁰、Λ_b⁰）到粲介子（D⁰、D⁺、D_s⁺ 及其反粒子）的分支比。
//!
//! ## 核心特性
//! - 积分分支比：BR = N(D) / N(B)，二项方差 Var = BR·(1−BR)/N(B)
//! - 微分分支比：按 D 介子动量 p* 分箱（默认 300 个 0.01 GeV/c 宽度的箱），
//!   每箱 BR = count / N(B)，不确定度 = √count / N(B)
//! - 同一母粒子下所有子粒子共享同一个事件总数
//! - 粒子对之间独立，支持rayon并行处理
//! - 文本表、图表规格（JSON）和汇总报告输出

pub mod config;
pub mod core;
pub mod dataset;
pub mod error;
pub mod processing;
pub mod tools;

// 重新导出核心类型
pub use config::{AnalysisPlan, RunConfig};
pub use crate::core::{
    BranchingRatioResult, DifferentialBranchingRatioResult, EventTable, MomentumBinning,
    SpeciesPair, SpeciesRegistry,
};
pub use dataset::{LoadedDataset, load_dataset};
pub use error::{BrError, BrResult, ErrorCategory};
pub use processing::{ExecutionMode, RunSummary, run_analysis};

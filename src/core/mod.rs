//! 核心算法模块
//!
//! 包含事件数据模型、粒子种类注册表、动量分箱、事件选择/展开以及两个分支比估计器。

pub mod binning;
pub mod estimator;
pub mod event;
pub mod histogram;
pub mod selector;
pub mod species;

// 重新导出公共接口
pub use binning::{MomentumBin, MomentumBinning};
pub use estimator::{
    BranchingRatioResult, DifferentialBranchingRatioResult, estimate_differential,
    estimate_integrated,
};
pub use event::{Candidate, Event, EventTable};
pub use histogram::MomentumHistogram;
pub use selector::{
    SelectedCandidate, flatten_and_filter, parent_event_count, select, select_candidates,
};
pub use species::{DaughterSpecies, ParentSpecies, SpeciesPair, SpeciesRegistry};

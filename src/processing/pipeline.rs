//! 分支比分析流水线
//!
//! 对分析计划中的每个 (母粒子, 子粒子) 组合执行 选择 → 展开 → 积分/微分估计。
//! 组合之间互不依赖，共享同一张只读事件表，可以使用rayon线程池并行处理。
//!
//! 单个组合失败不会影响其他组合，失败信息汇总在 `RunSummary` 中；
//! 只有全部组合都失败时整个运行才失败。

use super::batch_state::{PairStatsSnapshot, ParallelPairStats, SerialPairStats};
use crate::config::AnalysisPlan;
use crate::core::{
    BranchingRatioResult, DifferentialBranchingRatioResult, Event, EventTable, MomentumBinning,
    SpeciesPair, estimate_differential, estimate_integrated, parent_event_count,
    select_candidates,
};
use crate::error::{BrError, BrResult, ErrorCategory};
use crate::tools::utils;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// 执行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Serial,
    /// 并行（请求的并发度，实际值会被限制在合法范围内）
    Parallel(usize),
}

/// 单个组合的完整结果
#[derive(Debug, Clone, PartialEq)]
pub struct PairResult {
    pub pair: SpeciesPair,
    pub total_parent_events: u64,
    pub integrated: BranchingRatioResult,
    /// 与分箱一一对应
    pub differential: Vec<DifferentialBranchingRatioResult>,
}

/// 单个组合的失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFailure {
    pub pair: SpeciesPair,
    pub category: ErrorCategory,
    pub message: String,
}

/// 一次运行的汇总
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// 按组合排序的结果
    pub results: BTreeMap<SpeciesPair, PairResult>,
    /// 失败列表（按计划顺序）
    pub failures: Vec<PairFailure>,
    /// 每个母粒子的事件总数（同一母粒子下所有组合共用）
    pub parent_event_counts: BTreeMap<i32, u64>,
    pub stats: PairStatsSnapshot,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        !self.results.is_empty()
    }

    /// 某个母粒子的全部成功结果（按子粒子代码排序）
    pub fn results_for_parent(&self, parent: i32) -> impl Iterator<Item = &PairResult> {
        self.results
            .values()
            .filter(move |result| result.pair.parent == parent)
    }
}

/// 有序结果容器（保证输出顺序）
struct OrderedOutcome {
    /// 计划中的位置
    index: usize,
    pair: SpeciesPair,
    result: BrResult<PairResult>,
}

/// 估计单个组合
///
/// `total_parent_events` 由调用方对每个母粒子计算一次后传入。
pub fn analyze_pair(
    events: &[Event],
    pair: SpeciesPair,
    total_parent_events: u64,
    binning: &MomentumBinning,
) -> BrResult<PairResult> {
    let numerator = select_candidates(events, pair.parent, pair.daughter);

    let integrated = estimate_integrated(&numerator, total_parent_events)?;
    let differential = estimate_differential(&numerator, total_parent_events, binning.bins())?;

    Ok(PairResult {
        pair,
        total_parent_events,
        integrated,
        differential,
    })
}

/// 执行完整分析
///
/// # 错误
///
/// * `BrError::InvalidInput` - 没有任何组合产生结果
pub fn run_analysis(
    table: &EventTable,
    plan: &AnalysisPlan,
    mode: ExecutionMode,
) -> BrResult<RunSummary> {
    let events = table.events();

    // 1️⃣ 每个母粒子的事件数只统计一次
    let parent_event_counts: BTreeMap<i32, u64> = plan
        .parents
        .iter()
        .map(|&parent| (parent, parent_event_count(events, parent)))
        .collect();

    for (&parent, &count) in &parent_event_counts {
        if count == 0 {
            warn!(parent, "no events found for parent species");
        } else {
            debug!(parent, events = count, "parent population");
        }
    }

    // 2️⃣ 执行所有组合
    let jobs = plan.pairs();
    let (mut outcomes, stats) = match mode {
        ExecutionMode::Serial => execute_serial(events, &jobs, &parent_event_counts, plan),
        ExecutionMode::Parallel(requested) => {
            let degree = utils::effective_parallel_degree(requested, Some(jobs.len()));
            if degree == 1 {
                debug!("parallel degree is 1, using serial execution");
                execute_serial(events, &jobs, &parent_event_counts, plan)
            } else {
                // 线程池不可用时降级串行
                match execute_parallel(events, &jobs, &parent_event_counts, plan, degree) {
                    Ok(done) => done,
                    Err(e) => {
                        warn!(error = %e, "parallel execution unavailable, falling back to serial");
                        execute_serial(events, &jobs, &parent_event_counts, plan)
                    }
                }
            }
        }
    };

    // 3️⃣ 按计划顺序汇总（关键：串行/并行输出一致）
    outcomes.sort_by_key(|o| o.index);

    let mut results = BTreeMap::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(result) => {
                results.insert(outcome.pair, result);
            }
            Err(e) => {
                warn!(pair = %outcome.pair, error = %e, "pair estimation failed");
                failures.push(PairFailure {
                    pair: outcome.pair,
                    category: ErrorCategory::from_br_error(&e),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        succeeded = stats.succeeded,
        failed = stats.failed,
        "branching ratio analysis finished"
    );

    if results.is_empty() {
        let details: Vec<String> = failures
            .iter()
            .map(|f| format!("({}) {}", f.pair, f.message))
            .collect();
        return Err(BrError::InvalidInput(format!(
            "没有任何粒子对产生结果 / no pair produced a result: {}",
            details.join("; ")
        )));
    }

    Ok(RunSummary {
        results,
        failures,
        parent_event_counts,
        stats,
    })
}

fn parent_total(counts: &BTreeMap<i32, u64>, parent: i32) -> u64 {
    counts.get(&parent).copied().unwrap_or(0)
}

fn execute_serial(
    events: &[Event],
    jobs: &[SpeciesPair],
    counts: &BTreeMap<i32, u64>,
    plan: &AnalysisPlan,
) -> (Vec<OrderedOutcome>, PairStatsSnapshot) {
    let mut stats = SerialPairStats::new();

    let outcomes: Vec<OrderedOutcome> = jobs
        .iter()
        .enumerate()
        .map(|(index, &pair)| {
            let total = parent_total(counts, pair.parent);
            let result = analyze_pair(events, pair, total, &plan.binning);
            match &result {
                Ok(r) => {
                    let done = stats.inc_succeeded();
                    debug!(%pair, done, br = r.integrated.value, "pair estimated");
                }
                Err(e) => {
                    stats.inc_failed(ErrorCategory::from_br_error(e), pair);
                }
            }
            OrderedOutcome {
                index,
                pair,
                result,
            }
        })
        .collect();

    (outcomes, stats.snapshot())
}

fn execute_parallel(
    events: &[Event],
    jobs: &[SpeciesPair],
    counts: &BTreeMap<i32, u64>,
    plan: &AnalysisPlan,
    degree: usize,
) -> BrResult<(Vec<OrderedOutcome>, PairStatsSnapshot)> {
    info!(degree, pairs = jobs.len(), "parallel pair estimation");

    let stats = ParallelPairStats::new();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(degree)
        .thread_name(|i| format!("br-worker-{i}"))
        .build()
        .map_err(|e| BrError::ResourceError(format!("线程池创建失败: {e}")))?;

    let outcomes: Vec<OrderedOutcome> = pool.install(|| {
        jobs.par_iter()
            .enumerate()
            .map(|(index, &pair)| {
                let result =
                    analyze_pair(events, pair, parent_total(counts, pair.parent), &plan.binning);
                match &result {
                    Ok(r) => {
                        let done = stats.inc_succeeded();
                        debug!(%pair, done, br = r.integrated.value, "pair estimated");
                    }
                    Err(e) => {
                        stats.inc_failed(ErrorCategory::from_br_error(e), pair);
                    }
                }
                OrderedOutcome {
                    index,
                    pair,
                    result,
                }
            })
            .collect()
    });

    Ok((outcomes, stats.snapshot()))
}

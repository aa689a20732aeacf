//! 工具函数模块
//!
//! 并发度计算、数值格式化、输出路径处理等通用工具函数。

use super::constants::parallel_limits::{MAX_PARALLEL_DEGREE, MIN_PARALLEL_DEGREE};

/// 计算实际并发度
///
/// 请求值被限制在 [MIN_PARALLEL_DEGREE, MAX_PARALLEL_DEGREE] 内，
/// 并且不超过任务数量（任务数为0时按1处理）。
pub fn effective_parallel_degree(requested: usize, job_count: Option<usize>) -> usize {
    let clamped = requested.clamp(MIN_PARALLEL_DEGREE, MAX_PARALLEL_DEGREE);
    match job_count {
        Some(jobs) => clamped.min(jobs.max(MIN_PARALLEL_DEGREE)),
        None => clamped,
    }
}

/// 数值格式化工具函数
pub mod number {
    /// 定点格式（固定小数位数）
    #[inline]
    pub fn fixed(value: f64, decimals: usize) -> String {
        format!("{value:.decimals$}")
    }

    /// 科学计数格式（用于控制台汇总表）
    #[inline]
    pub fn scientific(value: f64) -> String {
        format!("{value:.4e}")
    }
}

/// 输出路径处理工具函数
pub mod path {
    use std::path::{Path, PathBuf};

    /// 微分分支比文本表文件名：`{Bname}to{Dname}.txt`
    #[inline]
    pub fn differential_table_path(dir: &Path, parent_name: &str, daughter_name: &str) -> PathBuf {
        dir.join(format!("{parent_name}to{daughter_name}.txt"))
    }

    /// 积分分支比图表规格文件名：`BRint{Bname}.json`
    #[inline]
    pub fn integrated_chart_path(dir: &Path, parent_name: &str) -> PathBuf {
        dir.join(format!("BRint{parent_name}.json"))
    }

    /// 微分分支比图表规格文件名：`BRvspstar{Bname}.json`
    #[inline]
    pub fn differential_chart_path(dir: &Path, parent_name: &str) -> PathBuf {
        dir.join(format!("BRvspstar{parent_name}.json"))
    }

    /// 提取文件名（返回String，用于日志显示）
    #[inline]
    pub fn extract_filename_lossy(path: &Path) -> String {
        path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

pub use path::extract_filename_lossy;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_effective_parallel_degree() {
        assert_eq!(effective_parallel_degree(0, None), 1);
        assert_eq!(effective_parallel_degree(64, None), 16);
        assert_eq!(effective_parallel_degree(8, Some(3)), 3);
        assert_eq!(effective_parallel_degree(4, Some(0)), 1);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number::fixed(0.05, 8), "0.05000000");
        assert_eq!(number::fixed(1.0 / 3.0, 3), "0.333");
        assert_eq!(number::scientific(4.75e-5), "4.7500e-5");
    }

    #[test]
    fn test_output_paths() {
        let dir = Path::new("out");
        assert_eq!(
            path::differential_table_path(dir, "Bzero", "Dzerobar"),
            Path::new("out/BzerotoDzerobar.txt")
        );
        assert_eq!(
            path::integrated_chart_path(dir, "Lb"),
            Path::new("out/BRintLb.json")
        );
        assert_eq!(
            path::differential_chart_path(dir, "Bplus"),
            Path::new("out/BRvspstarBplus.json")
        );
        assert_eq!(extract_filename_lossy(Path::new("a/b/c.jsonl")), "c.jsonl");
    }
}

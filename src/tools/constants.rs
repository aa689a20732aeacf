//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 报告输出常量
pub mod output {
    /// 微分分支比文本表的小数位数
    pub const DECIMAL_PLACES: usize = 8;

    /// 微分分支比文本表的列名
    pub const TABLE_COLUMNS: [&str; 4] = ["pstar_min", "pstar_max", "BR", "BRunc"];

    /// 积分分支比汇总报告文件名
    pub const SUMMARY_FILE_NAME: &str = "BRint_summary.txt";
}

/// 图表规格常量
pub mod charts {
    /// 积分分支比散点图的纵轴范围（对数轴）
    pub const INTEGRATED_Y_RANGE: (f64, f64) = (1.0e-3, 1.0);

    /// 微分分支比直方图的纵轴范围（对数轴）
    pub const DIFFERENTIAL_Y_RANGE: (f64, f64) = (1.0e-5, 1.0);

    /// 直方图填充透明度
    pub const FILL_ALPHA: f64 = 0.25;

    /// 图尺寸（英寸）
    pub const FIGURE_SIZE: (f64, f64) = (7.0, 7.0);

    /// 坐标轴字号
    pub const FONT_SIZE: f64 = 14.0;

    /// 动量轴标签
    pub const MOMENTUM_AXIS_LABEL: &str = "p* (GeV/c)";
}

/// 默认配置值
pub mod defaults {
    /// 默认粒子对并行度
    ///
    /// 粒子对之间完全独立，4并发度在多数场景下提供良好的性能/资源平衡
    pub const PARALLEL_PAIRS_DEGREE: usize = 4;

    /// 默认输出目录
    pub const OUTPUT_DIR: &str = ".";
}

/// 并发度限制常量
pub mod parallel_limits {
    /// 最小并发度
    pub const MIN_PARALLEL_DEGREE: usize = 1;

    /// 最大并发度
    ///
    /// 限制最大并发度为16，避免过度并发导致的上下文切换开销
    pub const MAX_PARALLEL_DEGREE: usize = 16;
}

//! 统一错误处理框架
//!
//! 分支比分析流程中所有错误类型的定义，以及批量统计使用的错误分类。

use std::fmt;
use std::io;
use thiserror::Error;

/// 分支比分析相关的统一错误类型
#[derive(Debug, Error)]
pub enum BrError {
    /// 配置错误：未知的粒子种类代码、配置文件无法解析等（致命，计算开始前中止）
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 输入无效：母粒子事件数为零、分箱为空等（按粒子对报告，不影响其他粒子对）
    #[error("输入验证失败: {0}")]
    InvalidInput(String),

    /// 事件记录结构错误：并行数组长度不一致、动量非法等（按事件跳过并计数）
    #[error("事件记录结构错误: {0}")]
    DataShapeError(String),

    /// 文件I/O错误
    #[error("文件I/O错误: {0}")]
    IoError(#[from] io::Error),

    /// 数据集容器格式错误
    #[error("数据格式错误: {0}")]
    FormatError(String),

    /// 资源访问错误（线程池等）
    #[error("资源访问错误: {0}")]
    ResourceError(String),
}

impl From<serde_json::Error> for BrError {
    fn from(err: serde_json::Error) -> Self {
        BrError::FormatError(format!("JSON解析错误: {err}"))
    }
}

impl From<serde_yaml::Error> for BrError {
    fn from(err: serde_yaml::Error) -> Self {
        BrError::ConfigError(format!("YAML解析错误: {err}"))
    }
}

/// 分支比分析操作的标准Result类型
pub type BrResult<T> = Result<T, BrError>;

// ==================== 错误转换Helper函数 ====================

/// 创建配置错误的helper函数
#[inline]
pub fn config_error<E: fmt::Display>(context: &str, err: E) -> BrError {
    BrError::ConfigError(format!("{context}: {err}"))
}

/// 创建格式错误的helper函数
#[inline]
pub fn format_error<E: fmt::Display>(context: &str, err: E) -> BrError {
    BrError::FormatError(format!("{context}: {err}"))
}

/// 创建事件结构错误的helper函数
#[inline]
pub fn data_shape_error<E: fmt::Display>(context: &str, err: E) -> BrError {
    BrError::DataShapeError(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================

/// 错误类别枚举（用于批量统计和退出码映射）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum ErrorCategory {
    /// 配置相关错误
    Config,
    /// 输入相关错误（零事件数、空分箱）
    Input,
    /// 事件结构或数据格式错误
    Data,
    /// I/O相关错误
    Io,
    /// 其他未分类错误
    Other,
}

impl ErrorCategory {
    /// 从BrError提取错误类别
    pub fn from_br_error(e: &BrError) -> Self {
        match e {
            BrError::ConfigError(_) => Self::Config,
            BrError::InvalidInput(_) => Self::Input,
            BrError::DataShapeError(_) | BrError::FormatError(_) => Self::Data,
            BrError::IoError(_) => Self::Io,
            BrError::ResourceError(_) => Self::Other,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Config => "配置错误 / Config",
            Self::Input => "输入无效 / InvalidInput",
            Self::Data => "数据错误 / DataShape",
            Self::Io => "I/O错误 / I/O",
            Self::Other => "其他错误 / Other",
        }
    }
}

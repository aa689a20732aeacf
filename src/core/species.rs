//! 粒子种类注册表
//!
//! 母粒子（B强子）与子粒子（D介子）的静态查找表：显示标签、绘图颜色、文件名安全名称。
//! 注册表在进程启动时构建一次，显式传递给需要显示元数据的组件（报告输出），
//! 计算核心本身只处理整数代码。

use crate::error::{BrError, BrResult};
use serde::Serialize;
use std::fmt;

/// 母粒子种类条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentSpecies {
    pub code: i32,
    /// 图表标签（matplotlib mathtext）
    pub label: &'static str,
    /// 文件名安全名称
    pub name: &'static str,
}

/// 子粒子种类条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaughterSpecies {
    pub code: i32,
    pub label: &'static str,
    /// 绘图颜色（命名颜色）
    pub color: &'static str,
    pub name: &'static str,
}

/// (母粒子, 子粒子) 组合，作为结果表的扁平键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SpeciesPair {
    pub parent: i32,
    pub daughter: i32,
}

impl SpeciesPair {
    pub fn new(parent: i32, daughter: i32) -> Self {
        Self { parent, daughter }
    }
}

impl fmt::Display for SpeciesPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.parent, self.daughter)
    }
}

const BUILTIN_PARENTS: &[ParentSpecies] = &[
    ParentSpecies {
        code: 511,
        label: r"B$^{0}$",
        name: "Bzero",
    },
    ParentSpecies {
        code: 521,
        label: r"B$^{+}$",
        name: "Bplus",
    },
    ParentSpecies {
        code: 531,
        label: r"B$_{\rm s}^{0}$",
        name: "Bszero",
    },
    ParentSpecies {
        code: 5122,
        label: r"L$_{\rm b}^{+}$",
        name: "Lb",
    },
];

const BUILTIN_DAUGHTERS: &[DaughterSpecies] = &[
    DaughterSpecies {
        code: 421,
        label: r"D$^{0}$",
        color: "red",
        name: "Dzero",
    },
    DaughterSpecies {
        code: -421,
        label: r"$\overline{\rm D}^{0}$",
        color: "darkred",
        name: "Dzerobar",
    },
    DaughterSpecies {
        code: 431,
        label: r"D$_{\rm s}^{+}$",
        color: "darkorange",
        name: "Dsplus",
    },
    DaughterSpecies {
        code: -431,
        label: r"D$_{\rm s}^{-}$",
        color: "gold",
        name: "Dsminus",
    },
    DaughterSpecies {
        code: 411,
        label: r"D$^{+}$",
        color: "forestgreen",
        name: "Dplus",
    },
    DaughterSpecies {
        code: -411,
        label: r"D$^{-}$",
        color: "teal",
        name: "Dminus",
    },
];

/// 不可变的种类注册表
#[derive(Debug, Clone)]
pub struct SpeciesRegistry {
    parents: Vec<ParentSpecies>,
    daughters: Vec<DaughterSpecies>,
}

impl SpeciesRegistry {
    /// 内置注册表（B⁰、B⁺、Bs⁰、Λb 与 D⁰/D̄⁰、Ds±、D±）
    pub fn builtin() -> Self {
        Self::new(BUILTIN_PARENTS.to_vec(), BUILTIN_DAUGHTERS.to_vec())
    }

    pub fn new(parents: Vec<ParentSpecies>, daughters: Vec<DaughterSpecies>) -> Self {
        Self { parents, daughters }
    }

    pub fn parent(&self, code: i32) -> Option<&ParentSpecies> {
        self.parents.iter().find(|p| p.code == code)
    }

    pub fn daughter(&self, code: i32) -> Option<&DaughterSpecies> {
        self.daughters.iter().find(|d| d.code == code)
    }

    /// 查找母粒子，未注册时返回 `ConfigError`
    pub fn require_parent(&self, code: i32) -> BrResult<&ParentSpecies> {
        self.parent(code).ok_or_else(|| {
            BrError::ConfigError(format!(
                "母粒子代码 {code} 未在注册表中 / parent code {code} is not registered"
            ))
        })
    }

    /// 查找子粒子，未注册时返回 `ConfigError`
    pub fn require_daughter(&self, code: i32) -> BrResult<&DaughterSpecies> {
        self.daughter(code).ok_or_else(|| {
            BrError::ConfigError(format!(
                "子粒子代码 {code} 未在注册表中 / daughter code {code} is not registered"
            ))
        })
    }

    pub fn parents(&self) -> &[ParentSpecies] {
        &self.parents
    }

    pub fn daughters(&self) -> &[DaughterSpecies] {
        &self.daughters
    }
}

impl Default for SpeciesRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

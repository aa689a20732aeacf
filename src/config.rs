//! 运行配置
//!
//! YAML 配置文件指定需要处理的母粒子与子粒子代码，可选地覆盖动量分箱：
//!
//! ```yaml
//! pdgCodeB: [511, 521, 531, 5122]
//! pdgCodeD: [421, -421, 431, -431, 411, -411]
//! binning:
//!   width: 0.01
//!   pMax: 3.0
//! ```
//!
//! 配置中的每个代码都必须在注册表中存在，否则在任何计算开始之前以 `ConfigError` 中止。

use crate::core::binning::{STANDARD_BIN_WIDTH, STANDARD_P_MAX};
use crate::core::{MomentumBinning, SpeciesPair, SpeciesRegistry};
use crate::error::{BrError, BrResult, config_error};
use serde::Deserialize;
use std::path::Path;

/// 动量分箱配置
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BinningConfig {
    pub width: f64,
    pub p_max: f64,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            width: STANDARD_BIN_WIDTH,
            p_max: STANDARD_P_MAX,
        }
    }
}

/// 原始运行配置（反序列化结果，尚未校验）
///
/// 模拟程序的配置文件中还有 `nDecaysPerSpecies` 等字段，这里忽略未知字段以便共用同一个文件。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    pub pdg_code_b: Vec<i32>,
    pub pdg_code_d: Vec<i32>,
    #[serde(default)]
    pub binning: BinningConfig,
}

/// 校验后的分析计划
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPlan {
    /// 母粒子代码（去重，保持配置顺序）
    pub parents: Vec<i32>,
    /// 子粒子代码（去重，保持配置顺序）
    pub daughters: Vec<i32>,
    pub binning: MomentumBinning,
}

impl AnalysisPlan {
    /// 所有 (母粒子, 子粒子) 组合，母粒子优先
    pub fn pairs(&self) -> Vec<SpeciesPair> {
        self.parents
            .iter()
            .flat_map(|&parent| {
                self.daughters
                    .iter()
                    .map(move |&daughter| SpeciesPair::new(parent, daughter))
            })
            .collect()
    }
}

fn dedup_in_order(codes: &[i32]) -> Vec<i32> {
    let mut unique = Vec::with_capacity(codes.len());
    for &code in codes {
        if !unique.contains(&code) {
            unique.push(code);
        }
    }
    unique
}

impl RunConfig {
    pub fn from_yaml_str(content: &str) -> BrResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> BrResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| config_error(&format!("无法读取配置文件 {}", path.display()), e))?;
        Self::from_yaml_str(&content)
    }

    /// 对照注册表校验配置
    ///
    /// # 错误
    ///
    /// * `BrError::ConfigError` - 种类列表为空、代码未注册、分箱参数非法
    pub fn resolve(&self, registry: &SpeciesRegistry) -> BrResult<AnalysisPlan> {
        if self.pdg_code_b.is_empty() {
            return Err(BrError::ConfigError(
                "pdgCodeB 不能为空 / pdgCodeB must not be empty".to_string(),
            ));
        }
        if self.pdg_code_d.is_empty() {
            return Err(BrError::ConfigError(
                "pdgCodeD 不能为空 / pdgCodeD must not be empty".to_string(),
            ));
        }

        let parents = dedup_in_order(&self.pdg_code_b);
        let daughters = dedup_in_order(&self.pdg_code_d);

        for &code in &parents {
            registry.require_parent(code)?;
        }
        for &code in &daughters {
            registry.require_daughter(code)?;
        }

        let binning = MomentumBinning::uniform(self.binning.width, self.binning.p_max)
            .map_err(|e| config_error("动量分箱配置无效", e))?;

        Ok(AnalysisPlan {
            parents,
            daughters,
            binning,
        })
    }
}

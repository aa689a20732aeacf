//! 衰变树读取器
//!
//! 读取模拟程序导出的衰变树（每行一个事件的 JSON Lines，或一个 JSON 数组），
//! 逐事件校验后构建不可变的 `EventTable`。
//!
//! 单个事件的结构错误（并行数组长度不一致、动量非法、无法解析的记录）不会中止读取：
//! 该事件被跳过并记录在 `skipped` 中。只有整个文件无法读取时才返回错误。

use crate::core::{Candidate, Event, EventTable};
use crate::error::{BrError, BrResult, data_shape_error, format_error};
use serde::Deserialize;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info, warn};

/// 模拟程序对没有D介子的事件写入的占位代码
const NO_CANDIDATE_SENTINEL: i32 = -1;

/// 数据集容器格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// 每行一个事件
    JsonLines,
    /// 单个事件数组
    JsonArray,
}

impl DatasetFormat {
    /// 根据扩展名识别格式
    pub fn from_path(path: &Path) -> BrResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "jsonl" | "ndjson" => Ok(Self::JsonLines),
            "json" => Ok(Self::JsonArray),
            _ => Err(BrError::FormatError(format!(
                "不支持的数据集格式 / unsupported dataset format: {} (支持 .jsonl, .ndjson, .json)",
                path.display()
            ))),
        }
    }
}

/// 衰变树中的一条原始记录（字段名与模拟输出一致）
///
/// 母粒子运动学（`ptB`、`pB`、`yB`）不参与分支比计算，读取时直接忽略。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub pdg_b: i32,
    /// 只用于校验候选数组长度
    #[serde(default)]
    pub pt_d: Option<Vec<f64>>,
    #[serde(default)]
    pub p_d: Vec<f64>,
    #[serde(default)]
    pub y_d: Vec<f64>,
    #[serde(default)]
    pub pdg_d: Vec<i32>,
}

impl RawEvent {
    /// 校验并转换为事件
    ///
    /// # 错误
    ///
    /// * `BrError::DataShapeError` - 并行数组长度不一致，或动量不是有限非负数
    pub fn into_event(self) -> BrResult<Event> {
        let n = self.pdg_d.len();
        if self.p_d.len() != n || self.y_d.len() != n {
            return Err(BrError::DataShapeError(format!(
                "候选数组长度不一致 / mismatched candidate arrays: pD={}, yD={}, pdgD={}",
                self.p_d.len(),
                self.y_d.len(),
                n
            )));
        }
        if let Some(pt_d) = &self.pt_d
            && pt_d.len() != n
        {
            return Err(BrError::DataShapeError(format!(
                "候选数组长度不一致 / mismatched candidate arrays: ptD={}, pdgD={n}",
                pt_d.len()
            )));
        }

        // 占位候选：没有任何D介子的事件
        if n == 1 && self.pdg_d[0] == NO_CANDIDATE_SENTINEL {
            return Ok(Event::without_candidates(self.pdg_b));
        }

        let mut candidates = Vec::with_capacity(n);
        let columns = self.p_d.iter().zip(&self.y_d).zip(&self.pdg_d);
        for ((&momentum, &rapidity), &species) in columns {
            if !momentum.is_finite() || momentum < 0.0 {
                return Err(BrError::DataShapeError(format!(
                    "候选动量非法 / invalid candidate momentum: {momentum}"
                )));
            }
            candidates.push(Candidate::new(momentum, rapidity, species));
        }

        Ok(Event::new(self.pdg_b, candidates))
    }
}

/// 被跳过的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEvent {
    /// 记录序号（JSON Lines 为行号，从1开始；JSON 数组为元素下标，从0开始）
    pub record: usize,
    pub reason: String,
}

/// 读取结果
#[derive(Debug, Clone, Default)]
pub struct LoadedDataset {
    pub table: EventTable,
    pub skipped: Vec<SkippedEvent>,
}

/// 逐条记录构建事件表，出错的记录计入跳过列表
#[derive(Debug, Default)]
struct TableBuilder {
    events: Vec<Event>,
    skipped: Vec<SkippedEvent>,
}

impl TableBuilder {
    fn push(&mut self, record: usize, parsed: BrResult<RawEvent>) {
        match parsed.and_then(RawEvent::into_event) {
            Ok(event) => self.events.push(event),
            Err(e) => {
                warn!(record, error = %e, "skipping malformed event record");
                self.skipped.push(SkippedEvent {
                    record,
                    reason: e.to_string(),
                });
            }
        }
    }

    fn finish(self) -> LoadedDataset {
        LoadedDataset {
            table: EventTable::new(self.events),
            skipped: self.skipped,
        }
    }
}

fn parse_record(parsed: Result<RawEvent, serde_json::Error>) -> BrResult<RawEvent> {
    parsed.map_err(|e| data_shape_error("无法解析的事件记录 / undecodable record", e))
}

/// 从 JSON Lines 流读取
pub fn read_json_lines<R: BufRead>(reader: R) -> BrResult<LoadedDataset> {
    let mut builder = TableBuilder::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        builder.push(index + 1, parse_record(serde_json::from_str::<RawEvent>(trimmed)));
    }

    Ok(builder.finish())
}

/// 从 JSON 数组读取
///
/// # 错误
///
/// * `BrError::FormatError` - 顶层不是数组
pub fn read_json_array(content: &str) -> BrResult<LoadedDataset> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(content).map_err(|e| format_error("事件数组解析失败", e))?;

    let mut builder = TableBuilder::default();
    for (index, value) in records.into_iter().enumerate() {
        builder.push(index, parse_record(serde_json::from_value::<RawEvent>(value)));
    }

    Ok(builder.finish())
}

/// 读取数据集文件
pub fn load_dataset(path: &Path) -> BrResult<LoadedDataset> {
    let format = DatasetFormat::from_path(path)?;
    debug!(path = %path.display(), ?format, "reading decay dataset");

    let loaded = match format {
        DatasetFormat::JsonLines => {
            let file = std::fs::File::open(path)?;
            read_json_lines(std::io::BufReader::new(file))?
        }
        DatasetFormat::JsonArray => read_json_array(&std::fs::read_to_string(path)?)?,
    };

    info!(
        events = loaded.table.len(),
        candidates = loaded.table.candidate_count(),
        skipped = loaded.skipped.len(),
        "decay dataset loaded"
    );

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            DatasetFormat::from_path(Path::new("decays.jsonl")).unwrap(),
            DatasetFormat::JsonLines
        );
        assert_eq!(
            DatasetFormat::from_path(Path::new("decays.NDJSON")).unwrap(),
            DatasetFormat::JsonLines
        );
        assert_eq!(
            DatasetFormat::from_path(Path::new("decays.json")).unwrap(),
            DatasetFormat::JsonArray
        );
        assert!(matches!(
            DatasetFormat::from_path(Path::new("Bhadrons_diffBRtoD.root")),
            Err(BrError::FormatError(_))
        ));
    }

    #[test]
    fn test_sentinel_becomes_empty_event() {
        let raw: RawEvent =
            serde_json::from_str(r#"{"pdgB":511,"pD":[-1],"yD":[-1],"pdgD":[-1]}"#).unwrap();
        let event = raw.into_event().unwrap();

        assert_eq!(event.parent_species, 511);
        assert!(event.candidates.is_empty());
    }

    #[test]
    fn test_mismatched_arrays() {
        let raw: RawEvent =
            serde_json::from_str(r#"{"pdgB":511,"pD":[1.0,2.0],"yD":[0.1],"pdgD":[421,421]}"#)
                .unwrap();
        assert!(matches!(raw.into_event(), Err(BrError::DataShapeError(_))));

        let raw: RawEvent = serde_json::from_str(
            r#"{"pdgB":511,"ptD":[0.5],"pD":[1.0,2.0],"yD":[0.1,0.2],"pdgD":[421,421]}"#,
        )
        .unwrap();
        assert!(matches!(raw.into_event(), Err(BrError::DataShapeError(_))));
    }

    #[test]
    fn test_parent_kinematics_are_ignored() {
        let raw: RawEvent = serde_json::from_str(
            r#"{"pdgB":521,"ptB":3.1,"pB":40.2,"yB":1.5,"ptD":[0.4],"pD":[2.0],"yD":[0.3],"pdgD":[421]}"#,
        )
        .unwrap();
        let event = raw.into_event().unwrap();

        assert_eq!(event.parent_species, 521);
        assert_eq!(event.candidates, vec![Candidate::new(2.0, 0.3, 421)]);
    }

    #[test]
    fn test_negative_momentum_rejected() {
        let raw: RawEvent =
            serde_json::from_str(r#"{"pdgB":521,"pD":[-0.5],"yD":[0.0],"pdgD":[421]}"#).unwrap();
        assert!(matches!(raw.into_event(), Err(BrError::DataShapeError(_))));
    }

    #[test]
    fn test_json_lines_skips_bad_records() {
        let input = concat!(
            r#"{"pdgB":511,"pD":[1.23],"yD":[0.1],"pdgD":[421]}"#,
            "\n\n",
            "not json\n",
            r#"{"pdgB":511,"pD":[1.0],"yD":[],"pdgD":[421]}"#,
            "\n",
            r#"{"pdgB":521,"pD":[-1],"yD":[-1],"pdgD":[-1]}"#,
            "\n",
        );

        let loaded = read_json_lines(input.as_bytes()).unwrap();

        assert_eq!(loaded.table.len(), 2);
        assert_eq!(loaded.skipped.len(), 2);
        assert_eq!(loaded.skipped[0].record, 3);
        assert_eq!(loaded.skipped[1].record, 4);
    }

    #[test]
    fn test_json_array() {
        let input = r#"[
            {"pdgB":511,"pD":[0.5,0.6],"yD":[0.0,0.1],"pdgD":[421,-411]},
            {"pdgB":"oops"},
            {"pdgB":531}
        ]"#;

        let loaded = read_json_array(input).unwrap();

        assert_eq!(loaded.table.len(), 2);
        assert_eq!(loaded.table.candidate_count(), 2);
        assert_eq!(loaded.skipped[0].record, 1);

        assert!(matches!(
            read_json_array(r#"{"pdgB":511}"#),
            Err(BrError::FormatError(_))
        ));
    }
}

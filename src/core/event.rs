//! 衰变事件数据模型
//!
//! 一个事件对应一次模拟的B强子衰变：母粒子种类代码 + 重建出的D介子候选列表。
//! 事件表加载完成后只读，在整个分析过程中作为不可变快照共享。

/// 单个D介子候选
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// 动量 p*（GeV/c，非负）
    pub momentum: f64,

    /// 快度
    pub rapidity: f64,

    /// 粒子种类代码（PDG）
    pub species: i32,
}

impl Candidate {
    pub fn new(momentum: f64, rapidity: f64, species: i32) -> Self {
        Self {
            momentum,
            rapidity,
            species,
        }
    }
}

/// 单个衰变事件
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// 母粒子种类代码（PDG）
    pub parent_species: i32,

    /// 候选列表（可以为空）
    pub candidates: Vec<Candidate>,
}

impl Event {
    pub fn new(parent_species: i32, candidates: Vec<Candidate>) -> Self {
        Self {
            parent_species,
            candidates,
        }
    }

    /// 没有任何D介子候选的事件
    pub fn without_candidates(parent_species: i32) -> Self {
        Self::new(parent_species, Vec::new())
    }
}

/// 不可变事件表
///
/// 由数据集读取器构建一次，之后只通过共享引用访问。
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    events: Vec<Event>,
}

impl EventTable {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 全部候选数量（诊断用）
    pub fn candidate_count(&self) -> usize {
        self.events.iter().map(|e| e.candidates.len()).sum()
    }
}

impl From<Vec<Event>> for EventTable {
    fn from(events: Vec<Event>) -> Self {
        Self::new(events)
    }
}

//! 事件选择与候选展开
//!
//! 1. `select`：按母粒子种类筛选事件（保持原始顺序）
//! 2. `flatten_and_filter`：把每个事件的候选列表展开为逐候选记录，只保留指定子粒子种类
//!
//! 两步都是惰性迭代器，整个事件表不会被复制。没有候选的事件展开后不产生任何记录，
//! 分支比的分母由 `parent_event_count` 单独统计，而不是展开后的行数。

use super::event::{Candidate, Event};

/// 展开后的单条候选记录
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedCandidate {
    /// 所属事件在事件表中的位置
    pub event_index: usize,

    /// 所属事件的母粒子种类
    pub parent_species: i32,

    pub candidate: Candidate,
}

impl SelectedCandidate {
    #[inline]
    pub fn momentum(&self) -> f64 {
        self.candidate.momentum
    }

    #[inline]
    pub fn species(&self) -> i32 {
        self.candidate.species
    }
}

/// 按母粒子种类筛选事件，返回 `(事件索引, 事件)`
pub fn select(events: &[Event], parent_species: i32) -> impl Iterator<Item = (usize, &Event)> {
    events
        .iter()
        .enumerate()
        .filter(move |(_, event)| event.parent_species == parent_species)
}

/// 母粒子事件总数（所有分支比的归一化分母）
pub fn parent_event_count(events: &[Event], parent_species: i32) -> u64 {
    select(events, parent_species).count() as u64
}

/// 展开候选列表并按子粒子种类过滤
///
/// 事件内的候选顺序保持不变。
pub fn flatten_and_filter<'a, I>(
    events: I,
    daughter_species: i32,
) -> impl Iterator<Item = SelectedCandidate> + 'a
where
    I: IntoIterator<Item = (usize, &'a Event)>,
    I::IntoIter: 'a,
{
    events
        .into_iter()
        .flat_map(|(event_index, event)| {
            event
                .candidates
                .iter()
                .map(move |candidate| SelectedCandidate {
                    event_index,
                    parent_species: event.parent_species,
                    candidate: *candidate,
                })
        })
        .filter(move |selected| selected.species() == daughter_species)
}

/// 物化单个 (母粒子, 子粒子) 组合的候选表
pub fn select_candidates(
    events: &[Event],
    parent_species: i32,
    daughter_species: i32,
) -> Vec<SelectedCandidate> {
    flatten_and_filter(select(events, parent_species), daughter_species).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<Event> {
        vec![
            Event::new(
                511,
                vec![
                    Candidate::new(1.0, 0.1, 421),
                    Candidate::new(2.0, 0.2, -411),
                    Candidate::new(0.5, 0.3, 421),
                ],
            ),
            Event::new(521, vec![Candidate::new(1.5, 0.0, 421)]),
            Event::without_candidates(511),
            Event::new(511, vec![Candidate::new(0.7, -0.4, 421)]),
        ]
    }

    #[test]
    fn test_select_preserves_order() {
        let events = sample_events();
        let indices: Vec<usize> = select(&events, 511).map(|(i, _)| i).collect();

        assert_eq!(indices, vec![0, 2, 3]);
        assert_eq!(parent_event_count(&events, 511), 3);
        assert_eq!(parent_event_count(&events, 531), 0);
    }

    #[test]
    fn test_flatten_keeps_within_event_order() {
        let events = sample_events();
        let selected = select_candidates(&events, 511, 421);

        let momenta: Vec<f64> = selected.iter().map(|c| c.momentum()).collect();
        assert_eq!(momenta, vec![1.0, 0.5, 0.7]);
        assert_eq!(selected[0].event_index, 0);
        assert_eq!(selected[2].event_index, 3);
        assert!(selected.iter().all(|c| c.parent_species == 511));
    }

    #[test]
    fn test_empty_event_contributes_no_rows() {
        let events = vec![Event::without_candidates(511), Event::without_candidates(511)];

        assert!(select_candidates(&events, 511, 421).is_empty());
        assert_eq!(parent_event_count(&events, 511), 2);
    }

    #[test]
    fn test_flatten_is_lazy_over_selection() {
        let events = sample_events();
        let mut iter = flatten_and_filter(select(&events, 511), -411);

        let first = iter.next().unwrap();
        assert_eq!(first.candidate.rapidity, 0.2);
        assert!(iter.next().is_none());
    }
}

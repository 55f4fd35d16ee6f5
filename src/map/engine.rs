//! 插入引擎 - 按探测序列在表上查找空槽位并写入

use crate::{
    error::{ProbeError, Result},
    hash::strategy::ProbeStrategy,
    log_debug,
    map::table::Table,
    types::{InsertionTrace, ProbeStep},
};

/// 插入引擎
///
/// 无内部状态：每次调用返回新的轨迹，表是唯一被修改的对象。
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionEngine;

impl InsertionEngine {
    /// 插入键并返回完整探测轨迹
    ///
    /// 序列走完仍无空槽位时返回 `success == false`，表保持不变；
    /// 只有配置错误才会返回 `Err`。
    pub fn insert<S>(table: &mut Table, key: &str, strategy: &S) -> Result<InsertionTrace>
    where
        S: ProbeStrategy + ?Sized,
    {
        let trace = Self::preview(table, key, strategy)?;
        if let Some(position) = trace.final_position() {
            let written = table.occupy(position, key);
            debug_assert!(written, "预演找到的槽位应为空");
        }

        log_debug!(
            "{} insert key={} probes={} success={} load_factor={:.3}",
            strategy.strategy_kind(),
            key,
            trace.probe_count,
            trace.success,
            table.load_factor()
        );
        Ok(trace)
    }

    /// 计算插入轨迹但不写入表
    pub fn preview<S>(table: &Table, key: &str, strategy: &S) -> Result<InsertionTrace>
    where
        S: ProbeStrategy + ?Sized,
    {
        let sequence = strategy.probe_sequence_with_capacity(key, table.capacity())?;
        let mut steps = Vec::with_capacity(sequence.len());

        for (index, position) in sequence.into_iter().enumerate() {
            let was_occupied = table.is_occupied(position);
            steps.push(ProbeStep {
                position,
                probe_number: index + 1,
                was_occupied,
                is_success: !was_occupied,
                level: strategy.step_level(index),
            });
            if !was_occupied {
                break;
            }
        }

        Ok(InsertionTrace::from_steps(steps, Some(strategy.strategy_kind())))
    }

    /// 依次插入给定键
    pub fn fill_with_keys<S, I, K>(table: &mut Table, strategy: &S, keys: I) -> Result<Vec<InsertionTrace>>
    where
        S: ProbeStrategy + ?Sized,
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .map(|key| Self::insert(table, key.as_ref(), strategy))
            .collect()
    }

    /// 清空表后按负载因子填充 `A0..Z0, A1..` 形式的键
    pub fn fill<S>(table: &mut Table, strategy: &S, load_factor: f64) -> Result<Vec<InsertionTrace>>
    where
        S: ProbeStrategy + ?Sized,
    {
        if !(0.0..=1.0).contains(&load_factor) {
            return Err(ProbeError::invalid_config(format!(
                "填充负载因子 {} 超出 [0, 1]",
                load_factor
            )));
        }
        table.reset();
        let count = (table.capacity() as f64 * load_factor).floor() as usize;
        Self::fill_with_keys(table, strategy, (0..count).map(fill_key))
    }
}

/// 第 `i` 个填充键：字母 `i mod 26`，数字 `i / 26`
pub fn fill_key(i: usize) -> String {
    let letter = char::from(b'A' + (i % 26) as u8);
    format!("{}{}", letter, i / 26)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::strategy::create_strategy;

    #[test]
    fn test_insert_into_empty_table() {
        let mut table = Table::new(8).unwrap();
        let strategy = create_strategy("uniform", 8).unwrap();
        let trace = InsertionEngine::insert(&mut table, "B", &strategy).unwrap();

        assert!(trace.success);
        assert_eq!(trace.probe_count, 1);
        assert_eq!(trace.final_position(), Some(2));
        assert_eq!(table.get(2), Some("B"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_success_invariants() {
        let mut table = Table::with_occupied(8, 2..=6).unwrap();
        let strategy = create_strategy("uniform", 8).unwrap();
        let trace = InsertionEngine::insert(&mut table, "B", &strategy).unwrap();

        let last = trace.steps.last().unwrap();
        assert!(last.is_success && !last.was_occupied);
        assert!(trace.steps[..trace.probe_count - 1]
            .iter()
            .all(|step| step.was_occupied && !step.is_success));
        let numbers: Vec<_> = trace.steps.iter().map(|step| step.probe_number).collect();
        assert_eq!(numbers, (1..=trace.probe_count).collect::<Vec<_>>());
    }

    #[test]
    fn test_failure_leaves_table_untouched() {
        let mut table = Table::with_occupied(2, [0, 1]).unwrap();
        let before = table.clone();
        let strategy = create_strategy("uniform", 2).unwrap();
        let trace = InsertionEngine::insert(&mut table, "X", &strategy).unwrap();

        assert!(!trace.success);
        assert_eq!(trace.probe_count, 2);
        assert!(trace.steps.iter().all(|step| step.was_occupied));
        assert_eq!(table, before);
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let table = Table::with_occupied(8, 2..=6).unwrap();
        let strategy = create_strategy("funnel", 8).unwrap();
        let trace = InsertionEngine::preview(&table, "B", &strategy).unwrap();
        assert_eq!(trace.final_position(), Some(7));
        assert!(!table.is_occupied(7));
    }

    #[test]
    fn test_step_levels_recorded() {
        let mut table = Table::with_occupied(8, 2..=6).unwrap();
        let strategy = create_strategy("layered", 8).unwrap();
        let trace = InsertionEngine::insert(&mut table, "B", &strategy).unwrap();
        let levels: Vec<_> = trace.steps.iter().map(|step| step.level).collect();
        assert_eq!(levels, vec![Some(0), Some(1), Some(1), Some(2)]);
    }

    #[test]
    fn test_strategy_capacity_follows_table() {
        // 策略绑定容量与表不同时，以表容量为准
        let mut table = Table::new(4).unwrap();
        let strategy = create_strategy("uniform", 64).unwrap();
        let trace = InsertionEngine::insert(&mut table, "B", &strategy).unwrap();
        assert_eq!(trace.final_position(), Some(2));
    }

    #[test]
    fn test_fill() {
        let mut table = Table::new(64).unwrap();
        let strategy = create_strategy("uniform", 64).unwrap();
        let traces = InsertionEngine::fill(&mut table, &strategy, 0.7).unwrap();

        assert_eq!(traces.len(), 44);
        assert!(traces.iter().all(|trace| trace.success));
        assert_eq!(table.len(), 44);

        assert!(InsertionEngine::fill(&mut table, &strategy, 1.5).is_err());
    }

    #[test]
    fn test_fill_key() {
        assert_eq!(fill_key(0), "A0");
        assert_eq!(fill_key(25), "Z0");
        assert_eq!(fill_key(26), "A1");
        assert_eq!(fill_key(53), "B2");
    }
}

//! 批量模拟 - 扫描一组 δ，多次试验统计各策略的实测探测代价
//!
//! 每个 δ 点是一次完整的计算单元：[`Sweep`] 每次 `next()` 只计算一个点，
//! 调用方在点与点之间重新获得控制权，可以刷新界面或取消。

use once_cell::sync::Lazy;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    error::{ProbeError, Result},
    hash::{
        hasher::HashAlgorithm,
        strategy::{ProbeStrategy, Strategy, StrategyFactory},
    },
    log_debug, log_info, log_warn,
    map::{InsertionEngine, Table},
    stats::{
        complexity::validate_delta,
        recorder::{InsertionStats, InsertionStatsSnapshot},
    },
    types::StrategyKind,
};

/// 默认 δ 扫描：0.01, 0.03, …, 0.49
pub static DEFAULT_DELTA_SWEEP: Lazy<Vec<f64>> = Lazy::new(|| {
    (0..25)
        .map(|k| ((0.01 + 0.02 * k as f64) * 1000.0).round() / 1000.0)
        .collect()
});

/// 全局默认模拟配置
pub static DEFAULT_SIMULATION_CONFIG: Lazy<SimulationConfig> = Lazy::new(SimulationConfig::default);

/// 批量模拟配置
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// 每次试验新建表的容量
    pub capacity: usize,
    /// 每个 δ 点、每个策略的试验次数
    pub trials: usize,
    /// 按顺序扫描的 δ 值
    pub delta_sweep: Vec<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            trials: 10,
            delta_sweep: DEFAULT_DELTA_SWEEP.clone(),
        }
    }
}

impl SimulationConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ProbeError::invalid_config("模拟表容量必须大于0"));
        }
        if self.trials == 0 {
            return Err(ProbeError::invalid_config("试验次数必须大于0"));
        }
        self.delta_sweep.iter().try_for_each(|&delta| validate_delta(delta))
    }

    /// 某个 δ 下每次试验插入的键数 `floor(capacity * (1 - δ))`
    pub fn items_to_insert(&self, delta: f64) -> usize {
        (self.capacity as f64 * (1.0 - delta)).floor() as usize
    }
}

/// 单个策略在整个扫描上的实测结果
///
/// 四个向量按 δ 顺序一一对应。
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub strategy: StrategyKind,
    pub delta_values: Vec<f64>,
    pub avg_probes: Vec<f64>,
    pub max_probes: Vec<u64>,
    pub success_rate_percent: Vec<f64>,
}

impl BatchResult {
    fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            delta_values: Vec::new(),
            avg_probes: Vec::new(),
            max_probes: Vec::new(),
            success_rate_percent: Vec::new(),
        }
    }

    fn push(&mut self, delta: f64, snapshot: &InsertionStatsSnapshot) {
        self.delta_values.push(delta);
        self.avg_probes.push(snapshot.average_probes);
        self.max_probes.push(snapshot.max_probes);
        self.success_rate_percent.push(snapshot.success_rate_percent);
    }

    /// 已完成的 δ 点数
    pub fn len(&self) -> usize {
        self.delta_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delta_values.is_empty()
    }
}

/// 一个 δ 点的计算结果
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    /// 在扫描中的下标
    pub index: usize,
    pub delta: f64,
    /// 与模拟器策略顺序一致
    pub stats: Vec<(StrategyKind, InsertionStatsSnapshot)>,
}

/// 进度回调参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepProgress {
    pub completed: usize,
    pub total: usize,
    pub delta: f64,
}

impl SweepProgress {
    /// 完成比例
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// 取消令牌，可跨线程克隆
///
/// 模拟器在每个 δ 点开始前检查一次。
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// 批量模拟器
#[derive(Debug, Clone)]
pub struct BatchSimulator {
    strategies: Vec<Strategy>,
    config: SimulationConfig,
}

impl BatchSimulator {
    /// 创建模拟器，所有参数在此一次性校验
    pub fn new<S: AsRef<str>>(strategy_ids: &[S], config: SimulationConfig) -> Result<Self> {
        Self::with_hash_algorithm(strategy_ids, config, HashAlgorithm::default())
    }

    /// 使用指定哈希算法创建模拟器
    pub fn with_hash_algorithm<S: AsRef<str>>(
        strategy_ids: &[S],
        config: SimulationConfig,
        algorithm: HashAlgorithm,
    ) -> Result<Self> {
        let validated = Self::validate(strategy_ids, &config, algorithm);
        if let Err(ref err) = validated {
            log_warn!("batch simulation rejected: {}", err);
        }
        Ok(Self {
            strategies: validated?,
            config,
        })
    }

    fn validate<S: AsRef<str>>(
        strategy_ids: &[S],
        config: &SimulationConfig,
        algorithm: HashAlgorithm,
    ) -> Result<Vec<Strategy>> {
        if strategy_ids.is_empty() {
            return Err(ProbeError::invalid_config("至少需要一个探测策略"));
        }
        config.validate()?;
        let factory = StrategyFactory::new(algorithm);
        strategy_ids
            .iter()
            .map(|id| factory.create_by_id(id.as_ref(), config.capacity))
            .collect()
    }

    /// 一次性运行整个扫描
    pub fn run<S: AsRef<str>>(
        strategy_ids: &[S],
        capacity: usize,
        delta_sweep: &[f64],
        trials: usize,
        on_progress: Option<&mut dyn FnMut(&SweepProgress)>,
    ) -> Result<Vec<BatchResult>> {
        let config = SimulationConfig {
            capacity,
            trials,
            delta_sweep: delta_sweep.to_vec(),
        };
        Self::new(strategy_ids, config)?.execute(&CancellationToken::new(), on_progress)
    }

    /// 运行扫描，每个点完成后回调进度，取消后返回已累积的部分结果
    pub fn execute(
        &self,
        cancel: &CancellationToken,
        mut on_progress: Option<&mut dyn FnMut(&SweepProgress)>,
    ) -> Result<Vec<BatchResult>> {
        let mut results: Vec<BatchResult> = self
            .strategy_kinds()
            .into_iter()
            .map(BatchResult::new)
            .collect();
        let total = self.config.delta_sweep.len();

        log_info!(
            "batch simulation started: strategies={:?} capacity={} trials={} points={}",
            self.strategy_kinds(),
            self.config.capacity,
            self.config.trials,
            total
        );

        let mut sweep = self.sweep();
        loop {
            if cancel.is_cancelled() {
                log_info!("batch simulation cancelled after {}/{} points", sweep.completed(), total);
                break;
            }
            let point = match sweep.next() {
                Some(point) => point?,
                None => break,
            };

            for (result, (_, snapshot)) in results.iter_mut().zip(&point.stats) {
                result.push(point.delta, snapshot);
            }
            if let Some(callback) = on_progress.as_deref_mut() {
                callback(&SweepProgress {
                    completed: point.index + 1,
                    total,
                    delta: point.delta,
                });
            }
        }

        Ok(results)
    }

    /// 逐点计算的扫描迭代器
    pub fn sweep(&self) -> Sweep<'_> {
        Sweep {
            simulator: self,
            next_index: 0,
        }
    }

    /// 参与模拟的策略类型，按传入顺序
    pub fn strategy_kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.strategy_kind()).collect()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn simulate_point(&self, strategy: &Strategy, delta: f64) -> Result<InsertionStats> {
        let items = self.config.items_to_insert(delta);
        let mut stats = InsertionStats::new();

        for trial in 0..self.config.trials {
            let mut table = Table::new(self.config.capacity)?;
            for i in 0..items {
                let key = format!("key_{}_{}", trial, i);
                let trace = InsertionEngine::insert(&mut table, &key, strategy)?;
                stats.record(&trace);
            }
        }
        Ok(stats)
    }
}

/// 扫描迭代器，每次 `next()` 计算一个 δ 点
pub struct Sweep<'a> {
    simulator: &'a BatchSimulator,
    next_index: usize,
}

impl Sweep<'_> {
    /// 已完成的点数
    pub fn completed(&self) -> usize {
        self.next_index
    }
}

impl Iterator for Sweep<'_> {
    type Item = Result<SweepPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index;
        let delta = *self.simulator.config.delta_sweep.get(index)?;
        self.next_index += 1;

        let stats = self
            .simulator
            .strategies
            .iter()
            .map(|strategy| -> Result<(StrategyKind, InsertionStatsSnapshot)> {
                let stats = self.simulator.simulate_point(strategy, delta)?;
                Ok((strategy.strategy_kind(), stats.snapshot()))
            })
            .collect::<Result<Vec<_>>>();

        Some(stats.map(|stats| {
            log_debug!("sweep point {} δ={} done", index, delta);
            SweepPoint { index, delta, stats }
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.simulator.config.delta_sweep.len() - self.next_index;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            capacity: 16,
            trials: 3,
            delta_sweep: vec![0.5, 0.25, 0.1],
        }
    }

    #[test]
    fn test_default_sweep() {
        let sweep = &*DEFAULT_DELTA_SWEEP;
        assert_eq!(sweep.len(), 25);
        assert_eq!(sweep[0], 0.01);
        assert_eq!(sweep[1], 0.03);
        assert_eq!(sweep[24], 0.49);

        let config = &*DEFAULT_SIMULATION_CONFIG;
        assert_eq!(config.capacity, 64);
        assert_eq!(config.trials, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_items_to_insert() {
        let config = SimulationConfig::default();
        assert_eq!(config.items_to_insert(0.01), 63);
        assert_eq!(config.items_to_insert(0.5), 32);
        assert_eq!(config.items_to_insert(1.0), 0);
    }

    #[test]
    fn test_validation() {
        let bad_capacity = SimulationConfig { capacity: 0, ..small_config() };
        assert!(BatchSimulator::new(&["uniform"], bad_capacity).unwrap_err().is_config_error());

        let bad_trials = SimulationConfig { trials: 0, ..small_config() };
        assert!(BatchSimulator::new(&["uniform"], bad_trials).is_err());

        let bad_delta = SimulationConfig { delta_sweep: vec![0.5, 0.0], ..small_config() };
        assert!(BatchSimulator::new(&["uniform"], bad_delta).is_err());

        let empty: [&str; 0] = [];
        assert!(BatchSimulator::new(&empty, small_config()).is_err());

        let err = BatchSimulator::new(&["uniform", "robin_hood"], small_config()).unwrap_err();
        assert_eq!(err, ProbeError::unknown_strategy("robin_hood"));
    }

    #[test]
    fn test_sweep_yields_one_point_per_delta() {
        let simulator = BatchSimulator::new(&["uniform", "funnel"], small_config()).unwrap();
        let mut sweep = simulator.sweep();
        assert_eq!(sweep.size_hint(), (3, Some(3)));

        let first = sweep.next().unwrap().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.delta, 0.5);
        assert_eq!(first.stats.len(), 2);
        assert_eq!(first.stats[0].0, StrategyKind::Uniform);
        assert_eq!(first.stats[0].1.total_insertions, 3 * 8);
        assert_eq!(sweep.completed(), 1);

        assert_eq!(sweep.count(), 2);
    }

    #[test]
    fn test_uniform_always_succeeds_below_full() {
        let results = BatchSimulator::run(&["uniform"], 16, &[0.5, 0.1], 2, None).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].success_rate_percent, vec![100.0, 100.0]);
    }

    #[test]
    fn test_progress_callback() {
        let mut seen = Vec::new();
        let mut callback = |progress: &SweepProgress| seen.push((progress.completed, progress.total));
        let results =
            BatchSimulator::run(&["layered"], 16, &[0.5, 0.25, 0.1], 1, Some(&mut callback)).unwrap();
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(results[0].len(), 3);
    }

    #[test]
    fn test_cancellation_keeps_partial_results() {
        let simulator = BatchSimulator::new(&["uniform", "layered"], small_config()).unwrap();
        let token = CancellationToken::new();
        let handle = token.clone();
        let mut callback = |progress: &SweepProgress| {
            if progress.completed == 2 {
                handle.cancel();
            }
        };
        let results = simulator.execute(&token, Some(&mut callback)).unwrap();
        assert!(token.is_cancelled());
        for result in &results {
            assert_eq!(result.delta_values, vec![0.5, 0.25]);
            assert_eq!(result.avg_probes.len(), 2);
        }
    }

    #[test]
    fn test_cancelled_before_start() {
        let simulator = BatchSimulator::new(&["funnel"], small_config()).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let results = simulator.execute(&token, None).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_empty());
    }

    #[test]
    fn test_result_invariants() {
        let results =
            BatchSimulator::run(&["uniform", "layered", "funnel"], 32, &[0.49, 0.2, 0.05, 0.01], 4, None)
                .unwrap();
        for result in &results {
            for i in 0..result.len() {
                assert!(result.avg_probes[i] <= result.max_probes[i] as f64);
                assert!((0.0..=100.0).contains(&result.success_rate_percent[i]));
            }
        }
    }

    #[test]
    fn test_progress_fraction() {
        let progress = SweepProgress { completed: 1, total: 4, delta: 0.1 };
        assert_eq!(progress.fraction(), 0.25);
        let empty = SweepProgress { completed: 0, total: 0, delta: 0.1 };
        assert_eq!(empty.fraction(), 1.0);
    }
}

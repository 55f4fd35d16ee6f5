//! 探测策略模块 - 定义探测序列生成接口与策略工厂

use crate::{
    error::{ProbeError, Result},
    hash::{
        funnel::FunnelProbeStrategy,
        hasher::{HashAlgorithm, KeyHasher},
        layered::LayeredProbeStrategy,
        linear_probe::UniformProbeStrategy,
    },
    log_debug,
    types::{ProbeSequence, StrategyKind},
};
use ahash::AHashSet;

/// 分层与漏斗策略共用的参考 δ
///
/// 固定常量，与表当前的 δ 无关。
pub const REFERENCE_DELTA: f64 = 0.05;

/// 探测策略特征
pub trait ProbeStrategy {
    /// 获取策略类型
    fn strategy_kind(&self) -> StrategyKind;

    /// 创建时绑定的容量
    fn capacity(&self) -> usize;

    /// 使用的键哈希器
    fn hasher(&self) -> &KeyHasher;

    /// 给定容量下的序列长度上限（实数，生成时满足 `len < cap` 才继续）
    fn probe_cap(&self, capacity: usize) -> f64;

    /// 从起始槽位生成序列，长度不超过 `limit`
    fn generate(&self, home: usize, capacity: usize, limit: f64) -> ProbeSequence;

    /// 使用指定容量生成探测序列
    fn probe_sequence_with_capacity(&self, key: &str, capacity: usize) -> Result<ProbeSequence> {
        let home = self.hasher().hash(key, capacity)?;
        Ok(self.generate(home, capacity, self.probe_cap(capacity)))
    }

    /// 使用绑定容量生成探测序列
    fn probe_sequence(&self, key: &str) -> Result<ProbeSequence> {
        self.probe_sequence_with_capacity(key, self.capacity())
    }

    /// 以 `max_probes` 取代策略自身上限生成序列
    ///
    /// 结果仍只包含策略实际产生的候选位置，`max_probes == 0` 得到空序列。
    fn probe_sequence_limited(
        &self,
        key: &str,
        capacity: usize,
        max_probes: usize,
    ) -> Result<ProbeSequence> {
        let home = self.hasher().hash(key, capacity)?;
        Ok(self.generate(home, capacity, max_probes.min(capacity) as f64))
    }

    /// 第 `probe_index`（从0开始）次探测所在层级
    fn step_level(&self, probe_index: usize) -> Option<u32> {
        if self.strategy_kind().is_leveled() {
            Some((probe_index + 1).ilog2())
        } else {
            None
        }
    }
}

/// 三种探测策略的封闭集合
#[derive(Debug, Clone)]
pub enum Strategy {
    Uniform(UniformProbeStrategy),
    Layered(LayeredProbeStrategy),
    Funnel(FunnelProbeStrategy),
}

macro_rules! dispatch {
    ($self:ident, $inner:ident => $body:expr) => {
        match $self {
            Strategy::Uniform($inner) => $body,
            Strategy::Layered($inner) => $body,
            Strategy::Funnel($inner) => $body,
        }
    };
}

impl Strategy {
    /// 按类型创建策略
    pub fn new(kind: StrategyKind, capacity: usize, algorithm: HashAlgorithm) -> Result<Self> {
        let strategy = match kind {
            StrategyKind::Uniform => Self::Uniform(UniformProbeStrategy::new(capacity, algorithm)?),
            StrategyKind::Layered => Self::Layered(LayeredProbeStrategy::new(capacity, algorithm)?),
            StrategyKind::Funnel => Self::Funnel(FunnelProbeStrategy::new(capacity, algorithm)?),
        };
        Ok(strategy)
    }
}

impl ProbeStrategy for Strategy {
    fn strategy_kind(&self) -> StrategyKind {
        dispatch!(self, s => s.strategy_kind())
    }

    fn capacity(&self) -> usize {
        dispatch!(self, s => s.capacity())
    }

    fn hasher(&self) -> &KeyHasher {
        dispatch!(self, s => s.hasher())
    }

    fn probe_cap(&self, capacity: usize) -> f64 {
        dispatch!(self, s => s.probe_cap(capacity))
    }

    fn generate(&self, home: usize, capacity: usize, limit: f64) -> ProbeSequence {
        dispatch!(self, s => s.generate(home, capacity, limit))
    }
}

/// 探测策略工厂
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyFactory {
    hash_algorithm: HashAlgorithm,
}

impl StrategyFactory {
    /// 创建新工厂
    pub fn new(hash_algorithm: HashAlgorithm) -> Self {
        Self { hash_algorithm }
    }

    /// 按类型创建策略
    pub fn create(&self, kind: StrategyKind, capacity: usize) -> Result<Strategy> {
        Strategy::new(kind, capacity, self.hash_algorithm)
    }

    /// 按标识创建策略
    pub fn create_by_id(&self, id: &str, capacity: usize) -> Result<Strategy> {
        let kind: StrategyKind = id.parse()?;
        log_debug!("creating {} strategy with capacity {}", kind, capacity);
        self.create(kind, capacity)
    }
}

/// 使用默认多项式哈希按标识创建策略
pub fn create_strategy(id: &str, capacity: usize) -> Result<Strategy> {
    StrategyFactory::default().create_by_id(id, capacity)
}

/// 使用指定哈希算法按标识创建策略
pub fn create_strategy_with_algorithm(
    id: &str,
    capacity: usize,
    algorithm: HashAlgorithm,
) -> Result<Strategy> {
    StrategyFactory::new(algorithm).create_by_id(id, capacity)
}

pub(crate) fn ensure_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(ProbeError::invalid_config("探测容量必须大于0"));
    }
    Ok(())
}

/// 去重的序列收集器
pub(crate) struct SequenceBuilder {
    sequence: ProbeSequence,
    seen: AHashSet<usize>,
    limit: f64,
}

impl SequenceBuilder {
    pub(crate) fn new(limit: f64) -> Self {
        Self {
            sequence: Vec::new(),
            seen: AHashSet::new(),
            limit,
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.sequence.len() as f64 >= self.limit
    }

    /// 已出现的位置直接跳过
    pub(crate) fn push(&mut self, position: usize) {
        if self.seen.insert(position) {
            self.sequence.push(position);
        }
    }

    pub(crate) fn finish(self) -> ProbeSequence {
        self.sequence
    }
}

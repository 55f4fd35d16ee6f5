//! 线性探测策略 - 均匀探测的基线实现

use crate::{
    error::Result,
    hash::{
        hasher::{HashAlgorithm, KeyHasher},
        strategy::{ensure_capacity, ProbeStrategy},
    },
    types::{ProbeSequence, StrategyKind},
};

/// 线性探测策略
///
/// `seq[i] = (hash + i) mod capacity`，遍历整张表。
#[derive(Debug, Clone)]
pub struct UniformProbeStrategy {
    hasher: KeyHasher,
    capacity: usize,
}

impl UniformProbeStrategy {
    /// 创建新线性探测策略
    pub fn new(capacity: usize, algorithm: HashAlgorithm) -> Result<Self> {
        ensure_capacity(capacity)?;
        Ok(Self {
            hasher: KeyHasher::new(algorithm),
            capacity,
        })
    }
}

impl ProbeStrategy for UniformProbeStrategy {
    fn strategy_kind(&self) -> StrategyKind {
        StrategyKind::Uniform
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn hasher(&self) -> &KeyHasher {
        &self.hasher
    }

    fn probe_cap(&self, capacity: usize) -> f64 {
        capacity as f64
    }

    fn generate(&self, home: usize, capacity: usize, limit: f64) -> ProbeSequence {
        let count = capacity.min(limit.ceil() as usize);
        (0..count).map(|i| (home + i) % capacity).collect()
    }
}

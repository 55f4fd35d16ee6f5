//! 分层探测策略 - 弹性哈希探测形状的示意实现
//!
//! 只模拟分层几何偏移的"形状"，不实现真正的弹性哈希（多子数组、批次插入、
//! 摊还 O(1) 保证）。

use crate::{
    error::Result,
    hash::{
        hasher::{HashAlgorithm, KeyHasher},
        strategy::{ensure_capacity, ProbeStrategy, SequenceBuilder, REFERENCE_DELTA},
    },
    types::{ProbeSequence, StrategyKind},
};

/// 分层探测策略
///
/// 第 `layer` 层取 `2^(layer+1)` 个候选，步长 `max(1, capacity / 2^(layer+1))`，
/// 层数为 `ceil(log2(capacity))`。
#[derive(Debug, Clone)]
pub struct LayeredProbeStrategy {
    hasher: KeyHasher,
    capacity: usize,
    layers: u32,
}

impl LayeredProbeStrategy {
    /// 创建新分层探测策略
    pub fn new(capacity: usize, algorithm: HashAlgorithm) -> Result<Self> {
        ensure_capacity(capacity)?;
        Ok(Self {
            hasher: KeyHasher::new(algorithm),
            capacity,
            layers: layer_count(capacity),
        })
    }

    /// 绑定容量下的层数
    pub fn layers(&self) -> u32 {
        self.layers
    }
}

/// `ceil(log2(capacity))`，容量为1时为0层
pub fn layer_count(capacity: usize) -> u32 {
    if capacity <= 1 {
        0
    } else {
        usize::BITS - (capacity - 1).leading_zeros()
    }
}

impl ProbeStrategy for LayeredProbeStrategy {
    fn strategy_kind(&self) -> StrategyKind {
        StrategyKind::Layered
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn hasher(&self) -> &KeyHasher {
        &self.hasher
    }

    /// `min(capacity, 2·ln(1/δ_ref))`
    fn probe_cap(&self, capacity: usize) -> f64 {
        (capacity as f64).min(2.0 * REFERENCE_DELTA.recip().ln())
    }

    fn generate(&self, home: usize, capacity: usize, limit: f64) -> ProbeSequence {
        let mut builder = SequenceBuilder::new(limit);

        for layer in 0..layer_count(capacity) {
            if builder.is_full() {
                break;
            }
            let layer_size = 1usize.checked_shl(layer + 1).unwrap_or(usize::MAX);
            let step = (capacity / layer_size).max(1);

            for i in 0..layer_size {
                if builder.is_full() {
                    break;
                }
                builder.push((home + i * step) % capacity);
            }
        }

        builder.finish()
    }
}

//! 漏斗探测策略 - 几何子数组探测形状的示意实现
//!
//! 只模拟漏斗哈希逐级缩小的子数组形状，不实现其最坏 O(log²(1/δ)) 保证。

use once_cell::sync::Lazy;

use crate::{
    error::Result,
    hash::{
        hasher::{HashAlgorithm, KeyHasher},
        strategy::{ensure_capacity, ProbeStrategy, SequenceBuilder, REFERENCE_DELTA},
    },
    types::{ProbeSequence, StrategyKind},
};

/// 层间的空间偏移，`level * LEVEL_OFFSET`
pub const LEVEL_OFFSET: usize = 3;

/// `ceil(log2(log2(1/δ_ref)))`，δ_ref = 0.05 时为3
pub static FUNNEL_LEVELS: Lazy<u32> =
    Lazy::new(|| REFERENCE_DELTA.recip().log2().log2().ceil() as u32);

/// 漏斗探测策略
///
/// 第 `level` 级取 `2^level` 个候选，步长 `max(1, capacity / 2^(level+1))`，
/// 每级额外偏移 `level * 3`。
#[derive(Debug, Clone)]
pub struct FunnelProbeStrategy {
    hasher: KeyHasher,
    capacity: usize,
}

impl FunnelProbeStrategy {
    /// 创建新漏斗探测策略
    pub fn new(capacity: usize, algorithm: HashAlgorithm) -> Result<Self> {
        ensure_capacity(capacity)?;
        Ok(Self {
            hasher: KeyHasher::new(algorithm),
            capacity,
        })
    }

    /// 漏斗级数
    pub fn levels(&self) -> u32 {
        *FUNNEL_LEVELS
    }
}

impl ProbeStrategy for FunnelProbeStrategy {
    fn strategy_kind(&self) -> StrategyKind {
        StrategyKind::Funnel
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn hasher(&self) -> &KeyHasher {
        &self.hasher
    }

    /// `min(capacity, ln(1/δ_ref)^2)`
    fn probe_cap(&self, capacity: usize) -> f64 {
        (capacity as f64).min(REFERENCE_DELTA.recip().ln().powi(2))
    }

    fn generate(&self, home: usize, capacity: usize, limit: f64) -> ProbeSequence {
        let mut builder = SequenceBuilder::new(limit);

        for level in 0..*FUNNEL_LEVELS {
            if builder.is_full() {
                break;
            }
            let level_size = 1usize << level;
            let step = (capacity / (level_size * 2)).max(1);
            let offset = level as usize * LEVEL_OFFSET;

            for i in 0..level_size {
                if builder.is_full() {
                    break;
                }
                builder.push((home + i * step + offset) % capacity);
            }
        }

        builder.finish()
    }
}

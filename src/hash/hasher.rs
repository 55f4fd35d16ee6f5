//! 键哈希 - 字符串到槽位的确定性映射

use crate::error::{ProbeError, Result};
use ahash::RandomState;
use std::hash::{BuildHasher, Hash, Hasher};

/// 多项式滚动哈希的乘数
pub const POLYNOMIAL_BASE: u128 = 31;

const AHASH_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];
const XXHASH_SEED: u64 = 42;

/// 哈希算法选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// `acc = (acc * 31 + c) mod capacity`
    #[default]
    Polynomial,
    /// 固定种子的 aHash
    AHash,
    /// 固定种子的 XxHash64
    XxHash,
}

/// 键哈希器
///
/// 同一 `(key, capacity)` 永远得到同一槽位。
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyHasher {
    algorithm: HashAlgorithm,
}

impl KeyHasher {
    /// 创建指定算法的哈希器
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// 当前算法
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// 计算键在 `[0, capacity)` 内的起始槽位
    pub fn hash(&self, key: &str, capacity: usize) -> Result<usize> {
        if capacity == 0 {
            return Err(ProbeError::invalid_config("哈希容量必须大于0"));
        }
        let slot = match self.algorithm {
            HashAlgorithm::Polynomial => polynomial_hash(key, capacity),
            HashAlgorithm::AHash => {
                let state = RandomState::with_seeds(
                    AHASH_SEEDS[0],
                    AHASH_SEEDS[1],
                    AHASH_SEEDS[2],
                    AHASH_SEEDS[3],
                );
                let mut hasher = state.build_hasher();
                key.hash(&mut hasher);
                (hasher.finish() % capacity as u64) as usize
            }
            HashAlgorithm::XxHash => {
                let mut hasher = twox_hash::XxHash64::with_seed(XXHASH_SEED);
                key.hash(&mut hasher);
                (hasher.finish() % capacity as u64) as usize
            }
        };
        Ok(slot)
    }
}

/// 默认多项式哈希
pub fn hash(key: &str, capacity: usize) -> Result<usize> {
    KeyHasher::default().hash(key, capacity)
}

// 按 UTF-16 码元迭代；累加器始终小于 capacity，用 u128 避免乘法溢出
fn polynomial_hash(key: &str, capacity: usize) -> usize {
    let modulus = capacity as u128;
    key.encode_utf16().fold(0u128, |acc, unit| {
        (acc * POLYNOMIAL_BASE + unit as u128) % modulus
    }) as usize
}

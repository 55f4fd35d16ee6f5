//! 哈希模块 - 键哈希与探测序列策略

pub mod hasher;
pub mod strategy;
pub mod linear_probe;
pub mod layered;
pub mod funnel;

pub use hasher::{hash, HashAlgorithm, KeyHasher};
pub use strategy::{
    create_strategy, create_strategy_with_algorithm, ProbeStrategy, Strategy, StrategyFactory,
    REFERENCE_DELTA,
};
pub use linear_probe::UniformProbeStrategy;
pub use layered::LayeredProbeStrategy;
pub use funnel::FunnelProbeStrategy;


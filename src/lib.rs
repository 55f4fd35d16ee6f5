//! 开放寻址哈希表探测模拟库
//!
//! 在定长表上模拟三种探测策略（均匀/线性、分层、漏斗）的插入过程，给出每次插入的
//! 完整探测轨迹，并提供按 δ（空闲比例）计算的理论复杂度与批量实测统计。
//!
//! 分层与漏斗策略只是弹性哈希、漏斗哈希探测"形状"的确定性示意，
//! 并非论文中的真实算法。
//!
//! ## 快速开始
//!
//! ```rust
//! use probe_hashtable::*;
//!
//! fn main() -> Result<()> {
//!     let mut table = Table::new(8)?;
//!     let strategy = create_strategy("funnel", 8)?;
//!
//!     let trace = InsertionEngine::insert(&mut table, "B", &strategy)?;
//!     assert!(trace.success);
//!     assert_eq!(trace.final_position(), Some(2));
//!
//!     let estimate = ComplexityModel::estimate(StrategyKind::Layered, table.delta())?;
//!     println!("{} / {}", estimate.notation.amortized, estimate.notation.worst_case);
//!
//!     let results = BatchSimulator::run(&["uniform", "layered"], 32, &[0.5, 0.1], 2, None)?;
//!     assert_eq!(results[0].avg_probes.len(), 2);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}
// 核心模块导出
pub mod error;
pub mod types;
pub mod hash;
pub mod map;
pub mod stats;

// 公共接口导出
pub use crate::{
    error::{ProbeError, Result},
    hash::{
        create_strategy,
        create_strategy_with_algorithm,
        hash,
        FunnelProbeStrategy,
        HashAlgorithm,
        KeyHasher,
        LayeredProbeStrategy,
        ProbeStrategy,
        Strategy,
        StrategyFactory,
        UniformProbeStrategy,
        REFERENCE_DELTA,
    },
    map::{InsertionEngine, Table},
    stats::{
        BatchResult,
        BatchSimulator,
        CancellationToken,
        ComplexityEstimate,
        ComplexityModel,
        InsertionStats,
        SimulationConfig,
        SweepProgress,
    },
    types::{InsertionTrace, ProbeSequence, ProbeStep, StrategyKind},
};

/// 对同一组键分别用多个策略在各自的新表上插入
///
/// 返回顺序与 `kinds` 一致，每项为该策略插入全部键后的表与轨迹。
pub fn compare_strategies<K: AsRef<str>>(
    kinds: &[StrategyKind],
    capacity: usize,
    keys: &[K],
) -> Result<Vec<(StrategyKind, Table, Vec<InsertionTrace>)>> {
    let factory = StrategyFactory::default();
    kinds
        .iter()
        .map(|&kind| -> Result<(StrategyKind, Table, Vec<InsertionTrace>)> {
            let strategy = factory.create(kind, capacity)?;
            let mut table = Table::new(capacity)?;
            let traces = InsertionEngine::fill_with_keys(&mut table, &strategy, keys)?;
            log_info!("{} compared: {} keys, load_factor={:.3}", kind, keys.len(), table.load_factor());
            Ok((kind, table, traces))
        })
        .collect()
}

//! 统计模块 - 理论复杂度、插入统计与批量模拟

pub mod complexity;
pub mod recorder;
pub mod batch;

pub use complexity::{ComplexityEstimate, ComplexityModel, ComplexityNotation, TheoreticalCurve};
pub use recorder::{InsertionStats, InsertionStatsSnapshot};
pub use batch::{
    BatchResult, BatchSimulator, CancellationToken, SimulationConfig, Sweep, SweepPoint,
    SweepProgress, DEFAULT_DELTA_SWEEP, DEFAULT_SIMULATION_CONFIG,
};

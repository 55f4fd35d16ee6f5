//! 表与插入模块 - 定长槽位表及驱动探测策略的插入引擎

pub mod table;
pub mod engine;

pub use table::Table;
pub use engine::{fill_key, InsertionEngine};

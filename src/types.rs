//! 核心类型定义 - 策略标识、探测步骤与插入轨迹

use std::{fmt, str::FromStr};

use crate::error::ProbeError;

/// 探测序列：互不重复的槽位下标
pub type ProbeSequence = Vec<usize>;

/// 探测策略类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// 线性探测（传统均匀探测的基线）
    Uniform,
    /// 分层几何偏移（弹性哈希的示意版本）
    Layered,
    /// 几何子数组（漏斗哈希的示意版本）
    Funnel,
}

impl StrategyKind {
    /// 按展示顺序列出全部策略
    pub const ALL: [StrategyKind; 3] = [Self::Uniform, Self::Layered, Self::Funnel];

    /// 规范标识
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Layered => "layered",
            Self::Funnel => "funnel",
        }
    }

    /// 展示名称
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Uniform => "Uniform Probing",
            Self::Layered => "Elastic Hashing",
            Self::Funnel => "Funnel Hashing",
        }
    }

    /// 该策略的探测步骤是否带层级信息
    pub const fn is_leveled(&self) -> bool {
        !matches!(self, Self::Uniform)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ProbeError;

    /// 解析策略标识，忽略大小写与首尾空白
    ///
    /// `elastic` 与 `linear` 分别作为 `layered` 与 `uniform` 的别名。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" | "linear" => Ok(Self::Uniform),
            "layered" | "elastic" => Ok(Self::Layered),
            "funnel" => Ok(Self::Funnel),
            _ => Err(ProbeError::unknown_strategy(s)),
        }
    }
}

/// 单次探测步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeStep {
    /// 探测的槽位
    pub position: usize,
    /// 第几次探测，从1开始
    pub probe_number: usize,
    /// 探测前该槽位是否已被占用
    pub was_occupied: bool,
    /// 是否为写入成功的步骤
    pub is_success: bool,
    /// 分层/漏斗策略中的层级，均匀探测为 `None`
    pub level: Option<u32>,
}

/// 一次插入的完整探测轨迹
///
/// 每次调用新建，返回后不再变化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionTrace {
    pub steps: Vec<ProbeStep>,
    pub probe_count: usize,
    pub success: bool,
    pub strategy: Option<StrategyKind>,
}

impl InsertionTrace {
    /// 由步骤列表构造轨迹
    pub fn from_steps(steps: Vec<ProbeStep>, strategy: Option<StrategyKind>) -> Self {
        let success = steps.last().map_or(false, |step| step.is_success);
        Self {
            probe_count: steps.len(),
            steps,
            success,
            strategy,
        }
    }

    /// 成功时写入的槽位
    pub fn final_position(&self) -> Option<usize> {
        self.steps
            .last()
            .filter(|step| step.is_success)
            .map(|step| step.position)
    }

    /// 按顺序列出探测过的槽位
    pub fn positions(&self) -> Vec<usize> {
        self.steps.iter().map(|step| step.position).collect()
    }

    /// 探测时遇到的已占用槽位数
    pub fn collisions(&self) -> usize {
        self.steps.iter().filter(|step| step.was_occupied).count()
    }
}

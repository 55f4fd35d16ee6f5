// src/stats/recorder.rs
//! 插入统计记录器 - 累计探测次数、最大探测与成功率

use crate::types::{InsertionTrace, StrategyKind};

/// 插入统计快照
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct InsertionStatsSnapshot {
    pub total_insertions: u64,
    pub successful_insertions: u64,
    pub total_probes: u64,
    pub max_probes: u64,
    pub collisions: u64,
    pub average_probes: f64,
    pub success_rate_percent: f64,
}

/// 插入统计
///
/// 由调用方独占持有，逐条记录插入轨迹。
#[derive(Debug, Default, Clone)]
pub struct InsertionStats {
    total_insertions: u64,
    successful_insertions: u64,
    total_probes: u64,
    max_probes: u64,
    collisions: u64,
}

impl InsertionStats {
    /// 创建新统计
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次插入
    pub fn record(&mut self, trace: &InsertionTrace) {
        let probes = trace.probe_count as u64;
        self.total_insertions += 1;
        self.total_probes += probes;
        self.max_probes = self.max_probes.max(probes);
        self.collisions += trace.collisions() as u64;
        if trace.success {
            self.successful_insertions += 1;
        }
    }

    /// 合并另一份统计
    pub fn merge(&mut self, other: &InsertionStats) {
        self.total_insertions += other.total_insertions;
        self.successful_insertions += other.successful_insertions;
        self.total_probes += other.total_probes;
        self.max_probes = self.max_probes.max(other.max_probes);
        self.collisions += other.collisions;
    }

    /// 平均探测次数，无记录时为0
    pub fn average_probes(&self) -> f64 {
        if self.total_insertions == 0 {
            0.0
        } else {
            self.total_probes as f64 / self.total_insertions as f64
        }
    }

    /// 成功率百分比，无记录时为100
    pub fn success_rate_percent(&self) -> f64 {
        if self.total_insertions == 0 {
            100.0
        } else {
            self.successful_insertions as f64 / self.total_insertions as f64 * 100.0
        }
    }

    pub fn max_probes(&self) -> u64 {
        self.max_probes
    }

    pub fn total_insertions(&self) -> u64 {
        self.total_insertions
    }

    /// 获取统计快照
    pub fn snapshot(&self) -> InsertionStatsSnapshot {
        InsertionStatsSnapshot {
            total_insertions: self.total_insertions,
            successful_insertions: self.successful_insertions,
            total_probes: self.total_probes,
            max_probes: self.max_probes,
            collisions: self.collisions,
            average_probes: self.average_probes(),
            success_rate_percent: self.success_rate_percent(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self, strategy: StrategyKind) -> String {
        let label = strategy.as_str();
        let counters = [
            ("insertions_total", "Total insert calls", self.total_insertions),
            ("insertions_successful", "Inserts that found an empty slot", self.successful_insertions),
            ("probes_total", "Total probes over all inserts", self.total_probes),
            ("collisions_total", "Probes that hit an occupied slot", self.collisions),
        ];

        let mut output = String::new();
        for (name, help, value) in counters {
            output.push_str(&format!("# HELP probe_{} {}\n", name, help));
            output.push_str(&format!("# TYPE probe_{} counter\n", name));
            output.push_str(&format!("probe_{}{{strategy=\"{}\"}} {}\n", name, label, value));
        }

        output.push_str("# HELP probe_max_probes Longest probe walk of a single insert\n");
        output.push_str("# TYPE probe_max_probes gauge\n");
        output.push_str(&format!(
            "probe_max_probes{{strategy=\"{}\"}} {}\n",
            label, self.max_probes
        ));
        output
    }
}

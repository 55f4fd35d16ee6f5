//! 理论复杂度模型 - 以 δ 为参数的闭式公式

use crate::{
    error::{ProbeError, Result},
    types::StrategyKind,
};

/// 复杂度记号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityNotation {
    pub amortized: &'static str,
    pub worst_case: &'static str,
}

/// 理论探测代价
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexityEstimate {
    pub amortized: f64,
    pub worst_case: f64,
    pub notation: ComplexityNotation,
}

/// 单个策略在一组 δ 上的理论曲线
#[derive(Debug, Clone, PartialEq)]
pub struct TheoreticalCurve {
    pub strategy: StrategyKind,
    pub delta_values: Vec<f64>,
    pub amortized: Vec<f64>,
    pub worst_case: Vec<f64>,
}

/// 复杂度模型
pub struct ComplexityModel;

impl ComplexityModel {
    /// 计算给定 δ ∈ (0, 1] 下的理论代价
    pub fn estimate(kind: StrategyKind, delta: f64) -> Result<ComplexityEstimate> {
        validate_delta(delta)?;
        let log_inv = delta.recip().ln();

        let estimate = match kind {
            StrategyKind::Uniform => ComplexityEstimate {
                amortized: log_inv,
                worst_case: delta.recip(),
                notation: ComplexityNotation {
                    amortized: "Θ(log(1/δ))",
                    worst_case: "Θ(1/δ)",
                },
            },
            StrategyKind::Layered => ComplexityEstimate {
                amortized: 1.0,
                worst_case: log_inv,
                notation: ComplexityNotation {
                    amortized: "O(1)",
                    worst_case: "O(log(1/δ))",
                },
            },
            StrategyKind::Funnel => ComplexityEstimate {
                amortized: log_inv.powi(2),
                worst_case: log_inv.powi(2),
                notation: ComplexityNotation {
                    amortized: "O(log²(1/δ))",
                    worst_case: "O(log²(1/δ))",
                },
            },
        };
        Ok(estimate)
    }

    /// 按策略标识计算
    pub fn estimate_by_id(id: &str, delta: f64) -> Result<ComplexityEstimate> {
        Self::estimate(id.parse()?, delta)
    }

    /// 按 δ 序列生成各策略的理论曲线
    pub fn theoretical_curves(kinds: &[StrategyKind], deltas: &[f64]) -> Result<Vec<TheoreticalCurve>> {
        kinds
            .iter()
            .map(|&strategy| -> Result<TheoreticalCurve> {
                let mut curve = TheoreticalCurve {
                    strategy,
                    delta_values: Vec::with_capacity(deltas.len()),
                    amortized: Vec::with_capacity(deltas.len()),
                    worst_case: Vec::with_capacity(deltas.len()),
                };
                for &delta in deltas {
                    let estimate = Self::estimate(strategy, delta)?;
                    curve.delta_values.push(delta);
                    curve.amortized.push(estimate.amortized);
                    curve.worst_case.push(estimate.worst_case);
                }
                Ok(curve)
            })
            .collect()
    }
}

/// δ 必须落在 (0, 1]
pub fn validate_delta(delta: f64) -> Result<()> {
    if delta > 0.0 && delta <= 1.0 {
        Ok(())
    } else {
        Err(ProbeError::invalid_config(format!("δ = {} 超出 (0, 1]", delta)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_layered_at_tenth() {
        let estimate = ComplexityModel::estimate_by_id("layered", 0.1).unwrap();
        assert_eq!(estimate.amortized, 1.0);
        assert!((estimate.worst_case - 2.302585).abs() < 1e-6);
        assert_eq!(estimate.notation.amortized, "O(1)");
        assert_eq!(estimate.notation.worst_case, "O(log(1/δ))");
    }

    #[test]
    fn test_uniform_and_funnel() {
        let uniform = ComplexityModel::estimate(StrategyKind::Uniform, 0.25).unwrap();
        assert!((uniform.amortized - 4f64.ln()).abs() < EPS);
        assert!((uniform.worst_case - 4.0).abs() < EPS);
        assert_eq!(uniform.notation.worst_case, "Θ(1/δ)");

        let funnel = ComplexityModel::estimate(StrategyKind::Funnel, 0.25).unwrap();
        assert!((funnel.amortized - 4f64.ln().powi(2)).abs() < EPS);
        assert_eq!(funnel.amortized, funnel.worst_case);
    }

    #[test]
    fn test_full_delta_is_cheapest() {
        for kind in StrategyKind::ALL {
            let estimate = ComplexityModel::estimate(kind, 1.0).unwrap();
            assert!(estimate.amortized >= 0.0 && estimate.worst_case >= 0.0);
        }
    }

    #[test]
    fn test_invalid_delta() {
        for delta in [0.0, -0.5, 1.5, f64::NAN] {
            let err = ComplexityModel::estimate(StrategyKind::Uniform, delta).unwrap_err();
            assert!(err.is_config_error(), "δ = {} 应被拒绝", delta);
        }
        assert!(ComplexityModel::estimate_by_id("cuckoo", 0.5).is_err());
    }

    #[test]
    fn test_non_increasing_in_delta() {
        let deltas: Vec<f64> = (1..=100).map(|i| i as f64 / 100.0).collect();
        for kind in StrategyKind::ALL {
            let curves = ComplexityModel::theoretical_curves(&[kind], &deltas).unwrap();
            let curve = &curves[0];
            for pair in curve.amortized.windows(2) {
                assert!(pair[1] <= pair[0] + EPS, "{} 摊还代价应随 δ 增大而不增", kind);
            }
            for pair in curve.worst_case.windows(2) {
                assert!(pair[1] <= pair[0] + EPS, "{} 最坏代价应随 δ 增大而不增", kind);
            }
        }
    }

    #[test]
    fn test_theoretical_curves_shape() {
        let curves =
            ComplexityModel::theoretical_curves(&StrategyKind::ALL, &[0.01, 0.1, 0.5]).unwrap();
        assert_eq!(curves.len(), 3);
        for curve in &curves {
            assert_eq!(curve.delta_values, vec![0.01, 0.1, 0.5]);
            assert_eq!(curve.amortized.len(), 3);
            assert_eq!(curve.worst_case.len(), 3);
        }
        assert!(ComplexityModel::theoretical_curves(&StrategyKind::ALL, &[0.0]).is_err());
    }
}

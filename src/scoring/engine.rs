use serde::Serialize;

use super::factors::{efficiency_index, Factor, MetricKind, MetricVector, BASELINE};
use crate::design::DesignState;

/// Derived scores for one design. Always recomputed from the design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub throughput: f64,
    pub cost_index: f64,
    pub congestion_risk: f64,
    pub scalability: f64,
    pub labor_sensitivity: f64,
    pub efficiency_index: f64,
}

impl Metrics {
    fn from_clamped(v: MetricVector) -> Self {
        Self {
            throughput: v.throughput,
            cost_index: v.cost_index,
            congestion_risk: v.congestion_risk,
            scalability: v.scalability,
            labor_sensitivity: v.labor_sensitivity,
            efficiency_index: efficiency_index(&v),
        }
    }

    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Throughput => self.throughput,
            MetricKind::CostIndex => self.cost_index,
            MetricKind::CongestionRisk => self.congestion_risk,
            MetricKind::Scalability => self.scalability,
            MetricKind::LaborSensitivity => self.labor_sensitivity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FactorContribution {
    pub decision: &'static str, // e.g. "Storage", "Fulfilment", "Automation"
    pub option: &'static str,   // e.g. "Hybrid", "Continuous Flow"
    pub delta: MetricVector,
    pub before: MetricVector, // Running total before this factor
    pub after: MetricVector,  // Running total after this factor
}

#[derive(Debug, Clone)]
pub struct ClampAdjustment {
    pub metric: MetricKind,
    pub raw: f64,
    pub clamped: f64,
}

#[derive(Debug, Clone)]
pub struct MetricsBreakdown {
    pub baseline: MetricVector,
    pub factors: Vec<FactorContribution>,
    pub raw: MetricVector,
    pub clamps: Vec<ClampAdjustment>,
    pub metrics: Metrics,
}

/// Raw (unclamped) totals for a design: baseline plus one delta per decision.
pub fn raw_totals(design: &DesignState) -> MetricVector {
    BASELINE
        + design.storage_model.delta()
        + design.fulfilment_logic.delta()
        + design.automation_level.delta()
}

/// Score a design.
pub fn calculate_metrics(design: &DesignState) -> Metrics {
    Metrics::from_clamped(raw_totals(design).clamped())
}

fn push_factor<F: Factor>(factors: &mut Vec<FactorContribution>, running: &mut MetricVector, option: F) {
    let before = *running;
    let delta = option.delta();
    *running = before + delta;
    factors.push(FactorContribution {
        decision: F::DECISION,
        option: option.option_label(),
        delta,
        before,
        after: *running,
    });
}

/// Score a design and record how each decision moved the totals.
pub fn explain_metrics(design: &DesignState) -> MetricsBreakdown {
    let mut running = BASELINE;
    let mut factors = Vec::with_capacity(3);

    push_factor(&mut factors, &mut running, design.storage_model);
    push_factor(&mut factors, &mut running, design.fulfilment_logic);
    push_factor(&mut factors, &mut running, design.automation_level);

    let clamped = running.clamped();
    let clamps = running
        .components()
        .iter()
        .zip(clamped.components().iter())
        .filter(|((_, raw), (_, after))| raw != after)
        .map(|((metric, raw), (_, after))| ClampAdjustment {
            metric: *metric,
            raw: *raw,
            clamped: *after,
        })
        .collect();

    MetricsBreakdown {
        baseline: BASELINE,
        factors,
        raw: running,
        clamps,
        metrics: Metrics::from_clamped(clamped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{AutomationLevel, FulfilmentLogic, StorageModel};
    use crate::scoring::search::enumerate_designs;

    fn design(s: StorageModel, f: FulfilmentLogic, a: AutomationLevel) -> DesignState {
        DesignState::new(s, f, a)
    }

    #[test]
    fn test_default_design_scores() {
        let metrics = calculate_metrics(&DesignState::default());
        assert_eq!(metrics.throughput, 86.0);
        assert_eq!(metrics.cost_index, 59.0);
        assert_eq!(metrics.congestion_risk, 44.0);
        assert_eq!(metrics.scalability, 83.0);
        assert_eq!(metrics.labor_sensitivity, 48.0);
        // 25.8 + 20.75 + 8.2 + 8.4 + 5.2
        assert!((metrics.efficiency_index - 68.35).abs() < 1e-9);
    }

    #[test]
    fn test_all_designs_within_bands() {
        for d in enumerate_designs() {
            let metrics = calculate_metrics(&d);
            for kind in MetricKind::ALL {
                let value = metrics.value(kind);
                assert!(
                    kind.band().contains(value),
                    "{} = {} out of band for {}",
                    kind.label(),
                    value,
                    d
                );
            }
        }
    }

    #[test]
    fn test_deterministic_bit_exact() {
        for d in enumerate_designs() {
            let a = calculate_metrics(&d);
            let b = calculate_metrics(&d);
            assert_eq!(a.efficiency_index.to_bits(), b.efficiency_index.to_bits());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_delta_order_does_not_matter() {
        for d in enumerate_designs() {
            let s = d.storage_model.delta();
            let f = d.fulfilment_logic.delta();
            let a = d.automation_level.delta();
            let orders = [
                [s, f, a],
                [s, a, f],
                [f, s, a],
                [f, a, s],
                [a, s, f],
                [a, f, s],
            ];
            let expected = raw_totals(&d);
            for order in orders {
                let total = order.iter().fold(BASELINE, |acc, delta| acc + *delta);
                assert_eq!(total, expected, "order changed totals for {}", d);
            }
        }
    }

    #[test]
    fn test_labor_clamps_at_ceiling() {
        let d = design(
            StorageModel::HighDensity,
            FulfilmentLogic::Wave,
            AutomationLevel::LabourDriven,
        );
        assert_eq!(raw_totals(&d).labor_sensitivity, 102.0);
        assert_eq!(calculate_metrics(&d).labor_sensitivity, 100.0);
    }

    #[test]
    fn test_labor_clamps_at_floor() {
        let d = design(
            StorageModel::HighAccessibility,
            FulfilmentLogic::ContinuousFlow,
            AutomationLevel::MechanizationHeavy,
        );
        assert_eq!(raw_totals(&d).labor_sensitivity, 3.0);
        assert_eq!(calculate_metrics(&d).labor_sensitivity, 8.0);
    }

    #[test]
    fn test_explain_agrees_with_calculate() {
        for d in enumerate_designs() {
            let breakdown = explain_metrics(&d);
            assert_eq!(breakdown.metrics, calculate_metrics(&d));
            assert_eq!(breakdown.raw, raw_totals(&d));
        }
    }

    #[test]
    fn test_explain_records_factor_chain() {
        let breakdown = explain_metrics(&DesignState::default());
        assert_eq!(breakdown.factors.len(), 3);
        assert_eq!(breakdown.factors[0].decision, "Storage");
        assert_eq!(breakdown.factors[0].option, "Hybrid");
        assert_eq!(breakdown.factors[0].before, BASELINE);
        assert_eq!(breakdown.factors[1].before, breakdown.factors[0].after);
        assert_eq!(breakdown.factors[2].before, breakdown.factors[1].after);
        assert_eq!(breakdown.factors[2].after, breakdown.raw);
        assert!(breakdown.clamps.is_empty());
    }

    #[test]
    fn test_explain_reports_clamps() {
        let d = design(
            StorageModel::HighDensity,
            FulfilmentLogic::Wave,
            AutomationLevel::LabourDriven,
        );
        let breakdown = explain_metrics(&d);
        assert_eq!(breakdown.clamps.len(), 1);
        assert_eq!(breakdown.clamps[0].metric, MetricKind::LaborSensitivity);
        assert_eq!(breakdown.clamps[0].raw, 102.0);
        assert_eq!(breakdown.clamps[0].clamped, 100.0);
    }
}

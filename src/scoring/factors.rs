use std::ops::Add;

use crate::design::{AutomationLevel, FulfilmentLogic, StorageModel};

/// The five raw sub-scores, in table order:
/// throughput, cost index, congestion risk, scalability, labor sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricVector {
    pub throughput: f64,
    pub cost_index: f64,
    pub congestion_risk: f64,
    pub scalability: f64,
    pub labor_sensitivity: f64,
}

impl MetricVector {
    pub const fn new(
        throughput: f64,
        cost_index: f64,
        congestion_risk: f64,
        scalability: f64,
        labor_sensitivity: f64,
    ) -> Self {
        Self {
            throughput,
            cost_index,
            congestion_risk,
            scalability,
            labor_sensitivity,
        }
    }

    /// Clamp every component into its band.
    pub fn clamped(&self) -> Self {
        Self {
            throughput: Band::THROUGHPUT.clamp(self.throughput),
            cost_index: Band::COST_INDEX.clamp(self.cost_index),
            congestion_risk: Band::CONGESTION_RISK.clamp(self.congestion_risk),
            scalability: Band::SCALABILITY.clamp(self.scalability),
            labor_sensitivity: Band::LABOR_SENSITIVITY.clamp(self.labor_sensitivity),
        }
    }

    /// Components paired with their metric kind, in table order.
    pub fn components(&self) -> [(MetricKind, f64); 5] {
        [
            (MetricKind::Throughput, self.throughput),
            (MetricKind::CostIndex, self.cost_index),
            (MetricKind::CongestionRisk, self.congestion_risk),
            (MetricKind::Scalability, self.scalability),
            (MetricKind::LaborSensitivity, self.labor_sensitivity),
        ]
    }
}

impl Add for MetricVector {
    type Output = MetricVector;

    fn add(self, rhs: MetricVector) -> MetricVector {
        MetricVector {
            throughput: self.throughput + rhs.throughput,
            cost_index: self.cost_index + rhs.cost_index,
            congestion_risk: self.congestion_risk + rhs.congestion_risk,
            scalability: self.scalability + rhs.scalability,
            labor_sensitivity: self.labor_sensitivity + rhs.labor_sensitivity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Throughput,
    CostIndex,
    CongestionRisk,
    Scalability,
    LaborSensitivity,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Throughput,
        MetricKind::CostIndex,
        MetricKind::CongestionRisk,
        MetricKind::Scalability,
        MetricKind::LaborSensitivity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Throughput => "Throughput",
            MetricKind::CostIndex => "Cost index",
            MetricKind::CongestionRisk => "Congestion risk",
            MetricKind::Scalability => "Scalability",
            MetricKind::LaborSensitivity => "Labor sensitivity",
        }
    }

    /// Burdens count against the efficiency index (lower is better).
    pub fn is_burden(self) -> bool {
        matches!(
            self,
            MetricKind::CostIndex | MetricKind::CongestionRisk | MetricKind::LaborSensitivity
        )
    }

    pub fn band(self) -> Band {
        match self {
            MetricKind::Throughput => Band::THROUGHPUT,
            MetricKind::CostIndex => Band::COST_INDEX,
            MetricKind::CongestionRisk => Band::CONGESTION_RISK,
            MetricKind::Scalability => Band::SCALABILITY,
            MetricKind::LaborSensitivity => Band::LABOR_SENSITIVITY,
        }
    }

    /// Weight of this metric in the efficiency index.
    pub fn weight(self) -> f64 {
        match self {
            MetricKind::Throughput => 0.30,
            MetricKind::Scalability => 0.25,
            MetricKind::CostIndex => 0.20,
            MetricKind::CongestionRisk => 0.15,
            MetricKind::LaborSensitivity => 0.10,
        }
    }
}

/// Inclusive clamp range for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const THROUGHPUT: Band = Band { min: 10.0, max: 100.0 };
    pub const COST_INDEX: Band = Band { min: 15.0, max: 100.0 };
    pub const CONGESTION_RISK: Band = Band { min: 5.0, max: 100.0 };
    pub const SCALABILITY: Band = Band { min: 10.0, max: 100.0 };
    pub const LABOR_SENSITIVITY: Band = Band { min: 8.0, max: 100.0 };

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Starting point for every design before any decision is applied.
pub const BASELINE: MetricVector = MetricVector::new(58.0, 52.0, 50.0, 56.0, 54.0);

/// A decision option that shifts the raw sub-scores by a fixed amount.
pub trait Factor: Copy {
    /// Name of the decision this option belongs to, e.g. "Storage".
    const DECISION: &'static str;

    fn delta(self) -> MetricVector;

    fn option_label(self) -> &'static str;
}

impl Factor for StorageModel {
    const DECISION: &'static str = "Storage";

    fn delta(self) -> MetricVector {
        match self {
            StorageModel::HighDensity => MetricVector::new(2.0, -6.0, 14.0, -4.0, 10.0),
            StorageModel::HighAccessibility => MetricVector::new(10.0, 8.0, -10.0, 4.0, -10.0),
            StorageModel::Hybrid => MetricVector::new(8.0, 1.0, 2.0, 9.0, 1.0),
        }
    }

    fn option_label(self) -> &'static str {
        self.label()
    }
}

impl Factor for FulfilmentLogic {
    const DECISION: &'static str = "Fulfilment";

    fn delta(self) -> MetricVector {
        match self {
            FulfilmentLogic::Wave => MetricVector::new(-4.0, -2.0, 12.0, -2.0, 8.0),
            FulfilmentLogic::ContinuousFlow => MetricVector::new(12.0, 4.0, -4.0, 9.0, -1.0),
            FulfilmentLogic::Batch => MetricVector::new(4.0, -5.0, 6.0, 3.0, 4.0),
        }
    }

    fn option_label(self) -> &'static str {
        self.label()
    }
}

impl Factor for AutomationLevel {
    const DECISION: &'static str = "Automation";

    fn delta(self) -> MetricVector {
        match self {
            AutomationLevel::LabourDriven => MetricVector::new(-10.0, -8.0, 6.0, -12.0, 30.0),
            AutomationLevel::SelectiveAutomation => MetricVector::new(8.0, 2.0, -4.0, 9.0, -6.0),
            AutomationLevel::MechanizationHeavy => MetricVector::new(18.0, 26.0, -8.0, 14.0, -40.0),
        }
    }

    fn option_label(self) -> &'static str {
        self.label()
    }
}

/// Weighted composite of clamped sub-scores. Burdens are inverted.
pub fn efficiency_index(v: &MetricVector) -> f64 {
    MetricKind::Throughput.weight() * v.throughput
        + MetricKind::Scalability.weight() * v.scalability
        + MetricKind::CostIndex.weight() * (100.0 - v.cost_index)
        + MetricKind::CongestionRisk.weight() * (100.0 - v.congestion_risk)
        + MetricKind::LaborSensitivity.weight() * (100.0 - v.labor_sensitivity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_clamp() {
        assert_eq!(Band::COST_INDEX.clamp(3.0), 15.0);
        assert_eq!(Band::COST_INDEX.clamp(120.0), 100.0);
        assert_eq!(Band::COST_INDEX.clamp(40.0), 40.0);
        assert_eq!(Band::LABOR_SENSITIVITY.clamp(-2.0), 8.0);
    }

    #[test]
    fn test_band_contains_is_inclusive() {
        assert!(Band::LABOR_SENSITIVITY.contains(8.0));
        assert!(Band::LABOR_SENSITIVITY.contains(100.0));
        assert!(!Band::LABOR_SENSITIVITY.contains(7.9));
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = MetricKind::ALL.iter().map(|k| k.weight()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_burdens() {
        assert!(!MetricKind::Throughput.is_burden());
        assert!(!MetricKind::Scalability.is_burden());
        assert!(MetricKind::CostIndex.is_burden());
        assert!(MetricKind::CongestionRisk.is_burden());
        assert!(MetricKind::LaborSensitivity.is_burden());
    }

    #[test]
    fn test_vector_add() {
        let sum = BASELINE + StorageModel::Hybrid.delta();
        assert_eq!(sum, MetricVector::new(66.0, 53.0, 52.0, 65.0, 55.0));
    }

    #[test]
    fn test_clamped_only_changes_out_of_band_components() {
        let v = MetricVector::new(120.0, 10.0, 50.0, 0.0, 102.0).clamped();
        assert_eq!(v, MetricVector::new(100.0, 15.0, 50.0, 10.0, 100.0));
    }

    #[test]
    fn test_efficiency_index_of_neutral_vector() {
        // Everything at 50: 0.30*50 + 0.25*50 + 0.20*50 + 0.15*50 + 0.10*50
        let v = MetricVector::new(50.0, 50.0, 50.0, 50.0, 50.0);
        assert!((efficiency_index(&v) - 50.0).abs() < 1e-9);
    }
}

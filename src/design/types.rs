use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How pallets and totes are laid out in the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageModel {
    HighDensity,
    HighAccessibility,
    Hybrid,
}

/// How orders are released to the pick floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FulfilmentLogic {
    Wave,
    ContinuousFlow,
    Batch,
}

/// How much of the handling is done by machines rather than people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutomationLevel {
    LabourDriven,
    SelectiveAutomation,
    MechanizationHeavy,
}

/// Normalize user input so "High Density", "high_density" and "high-density"
/// all compare equal.
fn normalize_key(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            ' ' | '_' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

macro_rules! design_option {
    ($ty:ident, $field:literal, [$(($variant:ident, $key:literal, $label:literal)),+ $(,)?]) => {
        impl $ty {
            /// All options in enumeration order.
            pub const ALL: [$ty; 3] = [$($ty::$variant),+];

            /// Stable key used in config files and on the command line.
            pub fn key(self) -> &'static str {
                match self {
                    $($ty::$variant => $key),+
                }
            }

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $($ty::$variant => $label),+
                }
            }

            /// Position in `ALL`.
            pub fn index(self) -> usize {
                Self::ALL.iter().position(|o| *o == self).unwrap_or(0)
            }

            /// Next option, wrapping around.
            pub fn next(self) -> Self {
                Self::ALL[(self.index() + 1) % Self::ALL.len()]
            }

            /// Previous option, wrapping around.
            pub fn previous(self) -> Self {
                Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = normalize_key(s);
                for option in Self::ALL {
                    if option.key() == wanted || normalize_key(option.label()) == wanted {
                        return Ok(option);
                    }
                }
                let valid: Vec<&str> = Self::ALL.iter().map(|o| o.key()).collect();
                bail!(
                    "unknown {} '{}' (expected one of: {})",
                    $field,
                    s.trim(),
                    valid.join(", ")
                )
            }
        }
    };
}

design_option!(StorageModel, "storage model", [
    (HighDensity, "high-density", "High Density"),
    (HighAccessibility, "high-accessibility", "High Accessibility"),
    (Hybrid, "hybrid", "Hybrid"),
]);

design_option!(FulfilmentLogic, "fulfilment logic", [
    (Wave, "wave", "Wave"),
    (ContinuousFlow, "continuous-flow", "Continuous Flow"),
    (Batch, "batch", "Batch"),
]);

design_option!(AutomationLevel, "automation level", [
    (LabourDriven, "labour-driven", "Labour Driven"),
    (SelectiveAutomation, "selective-automation", "Selective Automation"),
    (MechanizationHeavy, "mechanization-heavy", "Mechanization Heavy"),
]);

/// A complete warehouse configuration: one choice per decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DesignState {
    pub storage_model: StorageModel,
    pub fulfilment_logic: FulfilmentLogic,
    pub automation_level: AutomationLevel,
}

impl Default for DesignState {
    fn default() -> Self {
        Self {
            storage_model: StorageModel::Hybrid,
            fulfilment_logic: FulfilmentLogic::ContinuousFlow,
            automation_level: AutomationLevel::SelectiveAutomation,
        }
    }
}

impl DesignState {
    pub fn new(
        storage_model: StorageModel,
        fulfilment_logic: FulfilmentLogic,
        automation_level: AutomationLevel,
    ) -> Self {
        Self {
            storage_model,
            fulfilment_logic,
            automation_level,
        }
    }

    /// Compact one-line description, e.g. "Hybrid / Continuous Flow / Selective Automation"
    pub fn summary(&self) -> String {
        format!(
            "{} / {} / {}",
            self.storage_model, self.fulfilment_logic, self.automation_level
        )
    }

    /// Apply field-by-field overrides (from CLI flags) on top of this design.
    pub fn with_overrides(
        mut self,
        storage_model: Option<StorageModel>,
        fulfilment_logic: Option<FulfilmentLogic>,
        automation_level: Option<AutomationLevel>,
    ) -> Self {
        if let Some(s) = storage_model {
            self.storage_model = s;
        }
        if let Some(f) = fulfilment_logic {
            self.fulfilment_logic = f;
        }
        if let Some(a) = automation_level {
            self.automation_level = a;
        }
        self
    }
}

impl fmt::Display for DesignState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

//! Common valuation output and fallback provenance

use super::breakdown::{CostCategory, YearlyBreakdown};
use super::maintenance::MaintenanceClamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where the annual energy figure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergySource {
    Explicit,
    ClassEstimate,
    Default,
}

/// Where the repair cost/count came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairSource {
    Explicit,
    Default,
}

/// A substitution or adjustment made while valuing a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FallbackNote {
    /// Price was missing or not a positive number and was treated as 0
    PriceCoerced { raw: Option<f64> },

    /// Annual consumption was not given explicitly
    EnergyEstimated { source: EnergySource, kwh_per_year: f64 },

    /// Repair cost and/or count came from category defaults
    RepairProfileDefaulted { average_repair_cost: f64, expected_repairs: u32 },

    /// Maintenance NPV exceeded the purchase price
    MaintenanceClamped(MaintenanceClamp),

    /// Clothing material did not identify a quality tier
    MaterialUnrecognized { lifespan_years: u32 },

    /// A vehicle attribute was missing and a default was used
    VehicleDefault { field: String, value: f64 },
}

impl FallbackNote {
    /// Log the note and append it to `notes`
    pub(crate) fn record(self, label: &str, notes: &mut Vec<FallbackNote>) {
        log::warn!("{}: {}", label, self);
        notes.push(self);
    }
}

impl fmt::Display for FallbackNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackNote::PriceCoerced { raw: Some(raw) } => {
                write!(f, "invalid price {} treated as 0", raw)
            }
            FallbackNote::PriceCoerced { raw: None } => write!(f, "missing price treated as 0"),
            FallbackNote::EnergyEstimated { source, kwh_per_year } => {
                write!(f, "energy consumption {:.0} kWh/year from {:?}", kwh_per_year, source)
            }
            FallbackNote::RepairProfileDefaulted {
                average_repair_cost,
                expected_repairs,
            } => write!(
                f,
                "default repair profile: {} repairs at {:.2}",
                expected_repairs, average_repair_cost
            ),
            FallbackNote::MaintenanceClamped(clamp) => write!(
                f,
                "maintenance NPV {:.2} clamped to purchase price {:.2}",
                clamp.uncapped, clamp.cap
            ),
            FallbackNote::MaterialUnrecognized { lifespan_years } => write!(
                f,
                "material not recognised, assuming medium quality over {} years",
                lifespan_years
            ),
            FallbackNote::VehicleDefault { field, value } => {
                write!(f, "missing {} defaulted to {}", field, value)
            }
        }
    }
}

/// Accept a positive finite price, otherwise 0 with a note
pub(crate) fn resolve_price(raw: Option<f64>, label: &str, notes: &mut Vec<FallbackNote>) -> f64 {
    match raw {
        Some(price) if price.is_finite() && price > 0.0 => price,
        other => {
            FallbackNote::PriceCoerced { raw: other }.record(label, notes);
            0.0
        }
    }
}

/// Which valuation policy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuationKind {
    Appliance,
    Clothing,
    Vehicle,
}

/// Category-independent valuation output consumed by comparison and reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub label: String,

    pub kind: ValuationKind,

    pub purchase_price: f64,

    /// Cost components as included in the total (discounted where the policy discounts)
    pub components: BTreeMap<CostCategory, f64>,

    /// Lifetime cost (appliances, clothing) or ownership cost (vehicles)
    pub total_cost: f64,

    pub horizon_years: u32,

    /// Total spread over the ownership months (vehicles only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_cost: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_breakdown: Option<YearlyBreakdown>,

    #[serde(default)]
    pub fallbacks: Vec<FallbackNote>,
}

impl ValuationResult {
    /// Total cost spread evenly over the horizon
    pub fn annualized_cost(&self) -> f64 {
        self.total_cost / self.horizon_years as f64
    }

    /// Component amount, 0 if the policy has no such component
    pub fn component(&self, category: CostCategory) -> f64 {
        self.components.get(&category).copied().unwrap_or(0.0)
    }

    pub fn has_fallbacks(&self) -> bool {
        !self.fallbacks.is_empty()
    }

    /// Drop the ledger, e.g. for compact batch output
    pub fn without_breakdown(mut self) -> Self {
        self.yearly_breakdown = None;
        self
    }
}

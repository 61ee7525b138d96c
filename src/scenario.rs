//! Sensitivity runner for repeated valuations
//!
//! Holds one set of base preferences and re-values products under varied
//! discount or electricity rates, or values whole batches in parallel.

use crate::preferences::Preferences;
use crate::product::ProductInput;
use crate::valuation::{current_year, ValuationEngine, ValuationResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Which assumption a sensitivity run varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensitivityAxis {
    DiscountRate,
    ElectricityRate,
}

/// One point of a sensitivity run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityPoint {
    pub axis: SensitivityAxis,
    pub value: f64,
    pub result: ValuationResult,
}

/// Pre-configured runner for sensitivity and batch valuations
///
/// # Example
/// ```ignore
/// let runner = SensitivityRunner::new(Preferences::default());
/// for point in runner.vary_discount_rate(&input, &[0.0, 0.02, 0.05]) {
///     println!("{:.2} -> {:.2}", point.value, point.result.total_cost);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SensitivityRunner {
    base_preferences: Preferences,
    valuation_year: i32,
}

impl SensitivityRunner {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            base_preferences: preferences,
            valuation_year: current_year(),
        }
    }

    pub fn with_valuation_year(mut self, year: i32) -> Self {
        self.valuation_year = year;
        self
    }

    fn engine(&self, preferences: Preferences) -> ValuationEngine {
        ValuationEngine::new(preferences).with_valuation_year(self.valuation_year)
    }

    /// Value one product under the base preferences
    pub fn run(&self, input: &ProductInput) -> ValuationResult {
        self.engine(self.base_preferences.clone()).value(input)
    }

    /// Value many products in parallel; output order matches input order
    pub fn run_batch(&self, inputs: &[ProductInput]) -> Vec<ValuationResult> {
        let engine = self.engine(self.base_preferences.clone());
        inputs.par_iter().map(|input| engine.value(input)).collect()
    }

    /// Re-value a product once per value of the chosen assumption
    pub fn vary(
        &self,
        input: &ProductInput,
        axis: SensitivityAxis,
        values: &[f64],
    ) -> Vec<SensitivityPoint> {
        values
            .iter()
            .map(|&value| {
                let base = self.base_preferences.clone();
                let prefs = match axis {
                    SensitivityAxis::DiscountRate => base.with_discount_rate(value),
                    SensitivityAxis::ElectricityRate => base.with_electricity_rate(value),
                };
                SensitivityPoint {
                    axis,
                    value,
                    result: self.engine(prefs).value(input),
                }
            })
            .collect()
    }

    pub fn vary_discount_rate(&self, input: &ProductInput, rates: &[f64]) -> Vec<SensitivityPoint> {
        self.vary(input, SensitivityAxis::DiscountRate, rates)
    }

    pub fn vary_electricity_rate(
        &self,
        input: &ProductInput,
        rates: &[f64],
    ) -> Vec<SensitivityPoint> {
        self.vary(input, SensitivityAxis::ElectricityRate, rates)
    }

    pub fn preferences(&self) -> &Preferences {
        &self.base_preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.base_preferences
    }
}

impl Default for SensitivityRunner {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}
